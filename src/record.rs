//! record — документ индекса Kevacoin (key/value запись в namespace).
//!
//! Поля совпадают с документом Manticore-индекса. crc32_* — производные
//! поля для сужения выборки; они НЕ уникальны, поэтому результат, отобранный
//! по checksum, всегда перепроверяется по точной строке.

use serde::{Deserialize, Serialize};

/// Sentinel key of a namespace alias record.
pub const ALIAS_KEY: &str = "_KEVA_NS_";

/// Filter field names understood by the index backend.
pub const FIELD_CRC32_NAMESPACE: &str = "crc32_namespace";
pub const FIELD_CRC32_TRANSACTION: &str = "crc32_transaction";

/// Length of a namespace id: 'N' + 33 alphanumerics.
pub const NAMESPACE_LEN: usize = 34;

/// Length of a transaction id (hex).
pub const TRANSACTION_LEN: usize = 64;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub value: String,
    pub transaction: String,
    #[serde(default)]
    pub block: u64,
    #[serde(default)]
    pub time: i64,
    pub namespace: String,
}

impl Record {
    #[inline]
    pub fn crc32_namespace(&self) -> u32 {
        checksum(&self.namespace)
    }

    #[inline]
    pub fn crc32_transaction(&self) -> u32 {
        checksum(&self.transaction)
    }

    /// Value of a derived filter field by name (None for unknown fields).
    pub fn filter_field(&self, name: &str) -> Option<u32> {
        match name {
            FIELD_CRC32_NAMESPACE => Some(self.crc32_namespace()),
            FIELD_CRC32_TRANSACTION => Some(self.crc32_transaction()),
            _ => None,
        }
    }

    pub fn is_alias(&self) -> bool {
        self.key == ALIAS_KEY
    }
}

/// CRC32 (IEEE) of a string, same value the indexer stores in crc32_* fields.
#[inline]
pub fn checksum(s: &str) -> u32 {
    crc32fast::hash(s.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checksum_matches_ieee_crc32() {
        // crc32("The quick brown fox jumps over the lazy dog") = 0x414FA339
        assert_eq!(
            checksum("The quick brown fox jumps over the lazy dog"),
            0x414F_A339
        );
        assert_eq!(checksum(""), 0);
    }

    #[test]
    fn filter_field_names() {
        let r = Record {
            key: "k".into(),
            value: "v".into(),
            transaction: "ab".repeat(32),
            block: 1,
            time: 0,
            namespace: format!("N{}", "a".repeat(33)),
        };
        assert_eq!(r.filter_field(FIELD_CRC32_NAMESPACE), Some(checksum(&r.namespace)));
        assert_eq!(r.filter_field(FIELD_CRC32_TRANSACTION), Some(checksum(&r.transaction)));
        assert_eq!(r.filter_field("block"), None);
        assert!(!r.is_alias());
    }
}
