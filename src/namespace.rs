//! Namespace alias lookup (`_KEVA_NS_` records).

use log::warn;

use crate::index::{Index, Order, Query};
use crate::record::{checksum, ALIAS_KEY, FIELD_CRC32_NAMESPACE};

/// Candidates fetched per lookup; more than one only matters on checksum collisions.
const ALIAS_CANDIDATES: u64 = 10;

/// Query used to find the alias of `namespace`.
pub fn alias_query(namespace: &str) -> Query {
    Query::new(ALIAS_KEY)
        .filter(FIELD_CRC32_NAMESPACE, checksum(namespace))
        .sort("time", Order::Desc)
        .page(0, ALIAS_CANDIDATES)
}

/// Display name of a namespace: its newest alias value, or the id itself.
///
/// Never fails: backend errors are logged and treated as "no alias".
pub fn resolve<I: Index + ?Sized>(index: &I, namespace: &str) -> String {
    let candidates = match index.get(&alias_query(namespace)) {
        Ok(v) => v,
        Err(e) => {
            warn!("alias lookup for {} failed: {:#}", namespace, e);
            return namespace.to_string();
        }
    };
    candidates
        .into_iter()
        .find(|r| r.is_alias() && r.namespace == namespace)
        .map(|r| r.value)
        .unwrap_or_else(|| namespace.to_string())
}
