//! List-cache key derivation.
//!
//! A list query is identified by the MD5 of the JSON encoding of
//! `{"filter":…,"sort":…,"pagination":…}`, absent parts omitted. Typed inputs
//! serialize their fields in declaration order and `serde_json::Value` maps
//! serialize sorted, so equal inputs always produce equal hashes.

use md5::{Digest, Md5};
use serde::Serialize;

/// Reserved list hash for the parameterless "currently running" event query
pub const ONGOING: &str = "ongoing";

#[derive(Serialize)]
struct ListQuery<'a, F, S, P> {
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<&'a F>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sort: Option<&'a S>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pagination: Option<&'a P>,
}

/// Hash of a full `{filter, sort, pagination}` query (32 lowercase hex chars)
#[must_use]
pub fn filter_hash<F, S, P>(filter: Option<&F>, sort: Option<&S>, pagination: Option<&P>) -> String
where
    F: Serialize,
    S: Serialize,
    P: Serialize,
{
    let query = ListQuery {
        filter,
        sort,
        pagination,
    };
    // Serializing plain data structs with string keys cannot fail; an empty
    // payload still yields a stable hash.
    let json = serde_json::to_string(&query).unwrap_or_default();
    hex::encode(Md5::digest(json.as_bytes()))
}

/// Hash of a filter-only query
#[must_use]
pub fn filter_only_hash<F: Serialize>(filter: Option<&F>) -> String {
    filter_hash::<F, (), ()>(filter, None, None)
}
