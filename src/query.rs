//! Index queries issued by the listing and transaction routes.

use crate::index::{Order, Query};
use crate::pagination::Pagination;
use crate::record::{checksum, FIELD_CRC32_NAMESPACE, FIELD_CRC32_TRANSACTION};

/// Candidate set size for a transaction lookup (checksum collisions).
pub const TRANSACTION_CANDIDATES: u64 = 10;

/// Listing query: optional search term AND optional namespace, newest first.
pub fn listing(search: &str, namespace: Option<&str>, page: &Pagination) -> Query {
    let mut q = Query::new(search)
        .sort("time", Order::Desc)
        .page(page.offset(), page.limit);
    if let Some(ns) = namespace {
        q = q.filter(FIELD_CRC32_NAMESPACE, checksum(ns));
    }
    q
}

/// Candidates for a transaction hash; the caller must verify the exact hash.
pub fn transaction(hash: &str) -> Query {
    Query::new("")
        .filter(FIELD_CRC32_TRANSACTION, checksum(hash))
        .sort("time", Order::Desc)
        .page(0, TRANSACTION_CANDIDATES)
}
