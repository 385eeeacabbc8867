//! In-process index over a fixed set of records.
//!
//! Mirrors the backend contract closely enough for routing tests:
//! checksum filters are exact u32 comparisons (collisions included), the term
//! is a case-insensitive substring over key/value/transaction/namespace.

use anyhow::{anyhow, Result};
use std::cmp::Ordering;

use super::{Index, Order, Query};
use crate::record::Record;

#[derive(Clone, Debug, Default)]
pub struct MemoryIndex {
    records: Vec<Record>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records<I: IntoIterator<Item = Record>>(records: I) -> Self {
        Self {
            records: records.into_iter().collect(),
        }
    }

    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn matches_term(r: &Record, term_lc: &str) -> bool {
    if term_lc.is_empty() {
        return true;
    }
    [&r.key, &r.value, &r.transaction, &r.namespace]
        .iter()
        .any(|f| f.to_lowercase().contains(term_lc))
}

fn compare_by(a: &Record, b: &Record, field: &str) -> Result<Ordering> {
    match field {
        "time" => Ok(a.time.cmp(&b.time)),
        "block" => Ok(a.block.cmp(&b.block)),
        other => Err(anyhow!("memory index: unsupported sort field '{}'", other)),
    }
}

impl Index for MemoryIndex {
    fn get(&self, query: &Query) -> Result<Vec<Record>> {
        let term_lc = query.term.trim().to_lowercase();

        let mut hits: Vec<&Record> = Vec::new();
        'rec: for r in &self.records {
            for (field, want) in &query.filter {
                match r.filter_field(field) {
                    Some(have) if have == *want => {}
                    Some(_) => continue 'rec,
                    None => return Err(anyhow!("memory index: unknown filter field '{}'", field)),
                }
            }
            if matches_term(r, &term_lc) {
                hits.push(r);
            }
        }

        // validate sort fields up-front so sort_by can stay infallible
        for (field, _) in &query.sort {
            if let Some(first) = hits.first() {
                compare_by(first, first, field)?;
            }
        }
        hits.sort_by(|a, b| {
            for (field, order) in &query.sort {
                let ord = compare_by(a, b, field).unwrap_or(Ordering::Equal);
                let ord = match order {
                    Order::Asc => ord,
                    Order::Desc => ord.reverse(),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            Ordering::Equal
        });

        Ok(hits
            .into_iter()
            .skip(query.offset as usize)
            .take(query.limit as usize)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{checksum, FIELD_CRC32_NAMESPACE};

    fn rec(key: &str, ns: &str, time: i64) -> Record {
        Record {
            key: key.into(),
            value: format!("value of {}", key),
            transaction: format!("{:064x}", time),
            block: time as u64,
            time,
            namespace: ns.into(),
        }
    }

    #[test]
    fn filter_sort_page() {
        let a = format!("N{}", "a".repeat(33));
        let b = format!("N{}", "b".repeat(33));
        let idx = MemoryIndex::with_records(vec![
            rec("one", &a, 1),
            rec("two", &a, 2),
            rec("three", &b, 3),
            rec("four", &a, 4),
        ]);

        let q = Query::new("")
            .filter(FIELD_CRC32_NAMESPACE, checksum(&a))
            .sort("time", Order::Desc)
            .page(1, 10);
        let got: Vec<_> = idx.get(&q).unwrap().into_iter().map(|r| r.key).collect();
        assert_eq!(got, vec!["two", "one"]);

        let q = Query::new("THR").sort("time", Order::Asc).page(0, 10);
        let got = idx.get(&q).unwrap();
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].key, "three");
    }

    #[test]
    fn unknown_fields_are_errors() {
        let idx = MemoryIndex::with_records(vec![rec("x", "N", 1)]);
        assert!(idx.get(&Query::new("").filter("nope", 1).page(0, 1)).is_err());
        assert!(idx.get(&Query::new("").sort("nope", Order::Asc).page(0, 1)).is_err());
    }
}
