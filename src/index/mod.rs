//! index — read side of the record index.
//!
//! Раскладка:
//! - mod.rs       — Query (term/filter/sort/offset/limit) и трейт Index.
//! - manticore.rs — клиент Manticore HTTP JSON API (production backend).
//! - memory.rs    — in-process индекс (тесты, демо, локальная отладка).
//!
//! Implementations must be safe for concurrent use: the router calls `get`
//! from many connection threads through a shared reference.

use anyhow::Result;
use std::collections::BTreeMap;
use std::fmt;

use crate::record::Record;

pub mod manticore;
pub mod memory;

pub use manticore::ManticoreIndex;
pub use memory::MemoryIndex;

/// Sort direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

impl Order {
    pub fn as_str(self) -> &'static str {
        match self {
            Order::Asc => "asc",
            Order::Desc => "desc",
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One lookup against the index.
///
/// `term` is a full-text term (empty matches everything); `filter` holds exact
/// u32 equality conditions on derived checksum fields.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Query {
    pub term: String,
    pub filter: BTreeMap<String, u32>,
    pub sort: Vec<(String, Order)>,
    pub offset: u64,
    pub limit: u64,
}

impl Query {
    pub fn new<S: Into<String>>(term: S) -> Self {
        Self {
            term: term.into(),
            ..Self::default()
        }
    }

    pub fn filter<S: Into<String>>(mut self, field: S, value: u32) -> Self {
        self.filter.insert(field.into(), value);
        self
    }

    pub fn sort<S: Into<String>>(mut self, field: S, order: Order) -> Self {
        self.sort.push((field.into(), order));
        self
    }

    pub fn page(mut self, offset: u64, limit: u64) -> Self {
        self.offset = offset;
        self.limit = limit;
        self
    }
}

/// Read-only index backend.
pub trait Index: Send + Sync {
    /// Ordered list of matching records (already sorted/paged by the backend).
    fn get(&self, query: &Query) -> Result<Vec<Record>>;
}

impl<T: Index + ?Sized> Index for Box<T> {
    fn get(&self, query: &Query) -> Result<Vec<Record>> {
        (**self).get(query)
    }
}

impl<T: Index + ?Sized> Index for std::sync::Arc<T> {
    fn get(&self, query: &Query) -> Result<Vec<Record>> {
        (**self).get(query)
    }
}
