//! Listing pagination: 1-based part number -> offset/limit and nav links.

use crate::util::urlencode;

/// Page position of one listing request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based part as requested (values <= 1 behave as the first page).
    pub part: u64,
    pub limit: u64,
}

impl Pagination {
    pub fn new(part: u64, limit: u64) -> Self {
        Self { part, limit }
    }

    /// Parse the raw `part` parameter. Absent or non-numeric -> 1.
    pub fn parse_part(raw: Option<&str>) -> u64 {
        raw.and_then(|s| {
            let s = s.trim();
            let digits = s.strip_prefix('+').unwrap_or(s);
            let end = digits
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(digits.len());
            // leading-digits semantics: "3abc" -> 3, "-2"/"abc" -> 0
            digits[..end].parse::<u64>().ok()
        })
        .unwrap_or(1)
    }

    #[inline]
    pub fn is_first(&self) -> bool {
        self.part <= 1
    }

    pub fn offset(&self) -> u64 {
        if self.part > 1 {
            (self.part - 1).saturating_mul(self.limit)
        } else {
            0
        }
    }

    /// Query fragment of the "older" link (always present).
    pub fn older(&self, search: &str) -> String {
        fragment(search, self.part.max(1).saturating_add(1))
    }

    /// Query fragment of the "newer" link (absent on the first page).
    pub fn newer(&self, search: &str) -> Option<String> {
        (!self.is_first()).then(|| fragment(search, self.part - 1))
    }
}

fn fragment(search: &str, part: u64) -> String {
    if search.is_empty() {
        format!("part={}", part)
    } else {
        format!("search={}&part={}", urlencode(search), part)
    }
}
