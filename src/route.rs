//! Request path classification.
//!
//! Matchers are evaluated top-to-bottom, first match wins:
//!   1. empty path                              -> Root (redirect to "/")
//!   2. "/" or "/N<33 alnum>" anywhere          -> Listing(namespace?)
//!   3. "/<64 hex>" anywhere                    -> Transaction(hash)
//!   4. "/search"                               -> Search
//!   5. otherwise                               -> NotFound

use crate::record::{NAMESPACE_LEN, TRANSACTION_LEN};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Root,
    Listing { namespace: Option<String> },
    Transaction { hash: String },
    Search,
    NotFound,
}

type Matcher = fn(&str) -> Option<Route>;

const MATCHERS: &[Matcher] = &[match_root, match_listing, match_transaction, match_search];

impl Route {
    pub fn classify(path: Option<&str>) -> Route {
        let path = path.unwrap_or("");
        MATCHERS
            .iter()
            .find_map(|m| m(path))
            .unwrap_or(Route::NotFound)
    }

    /// Short name for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Route::Root => "root",
            Route::Listing { .. } => "listing",
            Route::Transaction { .. } => "transaction",
            Route::Search => "search",
            Route::NotFound => "not_found",
        }
    }
}

fn match_root(path: &str) -> Option<Route> {
    path.is_empty().then_some(Route::Root)
}

fn match_listing(path: &str) -> Option<Route> {
    if let Some(ns) = find_namespace(path) {
        return Some(Route::Listing {
            namespace: Some(ns.to_string()),
        });
    }
    (path == "/").then_some(Route::Listing { namespace: None })
}

fn match_transaction(path: &str) -> Option<Route> {
    find_transaction(path).map(|h| Route::Transaction { hash: h.to_string() })
}

fn match_search(path: &str) -> Option<Route> {
    (path == "/search").then_some(Route::Search)
}

/// First "/N" followed by 33 ASCII alphanumerics (trailing characters allowed).
pub fn find_namespace(path: &str) -> Option<&str> {
    find_after_slash(path, NAMESPACE_LEN, |i, b| {
        if i == 0 {
            b == b'N'
        } else {
            b.is_ascii_alphanumeric()
        }
    })
}

/// First "/" followed by 64 hex digits (trailing characters allowed).
pub fn find_transaction(path: &str) -> Option<&str> {
    find_after_slash(path, TRANSACTION_LEN, |_, b| b.is_ascii_hexdigit())
}

fn find_after_slash(path: &str, len: usize, accept: impl Fn(usize, u8) -> bool) -> Option<&str> {
    let bytes = path.as_bytes();
    for (pos, &b) in bytes.iter().enumerate() {
        if b != b'/' {
            continue;
        }
        let start = pos + 1;
        let end = start + len;
        if end > bytes.len() {
            break;
        }
        if bytes[start..end].iter().enumerate().all(|(i, &c)| accept(i, c)) {
            // all accepted bytes are ASCII, so the slice is on char boundaries
            return path.get(start..end);
        }
    }
    None
}
