//! Browse / search / namespace page.

use super::text::{collapse_whitespace, format_date};
use super::Page;
use crate::config::Strings;
use crate::pagination::Pagination;
use crate::record::Record;

const TITLE_SEPARATOR: &str = " · ";

/// Everything the listing page depends on.
#[derive(Clone, Copy, Debug)]
pub struct Listing<'a> {
    pub strings: &'a Strings,
    /// Footer links of the root page.
    pub links: &'a [String],
    /// Decoded search term ("" when not searching).
    pub search: &'a str,
    pub namespace: Option<&'a str>,
    /// Resolved display name of `namespace`.
    pub alias: Option<&'a str>,
    pub page: Pagination,
    pub records: &'a [Record],
}

impl<'a> Listing<'a> {
    fn part_label(&self) -> Option<String> {
        (!self.page.is_first()).then(|| format!("{} {}", self.strings.part, self.page.part))
    }

    fn title(&self) -> Vec<String> {
        let s = self.strings;
        let mut h1 = Vec::with_capacity(3);
        if !self.search.is_empty() {
            h1.push(self.search.to_string());
            h1.push(s.search.clone());
            h1.extend(self.part_label());
        } else if let Some(ns) = self.namespace {
            h1.push(self.alias.unwrap_or(ns).to_string());
            h1.extend(self.part_label());
        } else {
            h1.push(s.title.clone());
            h1.push(self.part_label().unwrap_or_else(|| s.description.clone()));
        }
        h1
    }

    /// Root page without filters shows the full link list.
    fn is_front(&self) -> bool {
        self.namespace.is_none() && self.search.is_empty() && self.page.is_first()
    }

    fn nav_target(&self, fragment: &str) -> String {
        format!("/{}?{}", self.namespace.unwrap_or(""), fragment)
    }
}

pub fn render_listing(l: &Listing<'_>) -> String {
    let s = l.strings;
    let mut page = Page::new();

    // h1 keeps to one line even if the term or alias carries newlines
    page.h1(&collapse_whitespace(&l.title().join(TITLE_SEPARATOR)));

    // menu
    page.link("/search", &s.search);
    if l.is_front() {
        page.line("");
        for link in l.links {
            page.line(format!("=> {}", link));
        }
    } else {
        page.link("/", &s.main);
    }

    page.h2(if l.search.is_empty() { &s.latest } else { &s.results });

    if l.records.is_empty() {
        page.line(s.nothing.as_str());
        return page.finish();
    }

    for r in l.records {
        let label = format!("{} {}", format_date(r.time), collapse_whitespace(&r.key));
        page.link(&format!("/{}", r.transaction), label.trim_end());
    }

    page.h2(&s.navigation);
    page.link(&l.nav_target(&l.page.older(l.search)), &s.older);
    if let Some(newer) = l.page.newer(l.search) {
        page.link(&l.nav_target(&newer), &s.newer);
    }

    page.finish()
}
