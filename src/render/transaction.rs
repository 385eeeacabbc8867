//! Single record page (reader / raw).

use super::text::{
    collapse_whitespace, escape_fence, format_date, format_datetime, reader_body, FENCE,
};
use super::Page;
use crate::config::Strings;
use crate::record::Record;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Reader,
    Raw,
}

impl Mode {
    /// Literal `raw` query selects raw mode, anything else is reader mode.
    pub fn from_query(query: Option<&str>) -> Mode {
        match query {
            Some("raw") => Mode::Raw,
            _ => Mode::Reader,
        }
    }
}

/// First candidate whose transaction equals `hash` exactly.
///
/// Candidates come from a checksum filter and may contain collisions.
pub fn select<'r>(candidates: &'r [Record], hash: &str) -> Option<&'r Record> {
    candidates.iter().find(|r| r.transaction == hash)
}

/// Render the record matching `hash`; empty string when nothing matches.
pub fn render_transaction(strings: &Strings, candidates: &[Record], hash: &str, mode: Mode) -> String {
    let Some(record) = select(candidates, hash) else {
        return String::new();
    };

    let mut page = Page::new();
    match mode {
        Mode::Raw => raw(&mut page, strings, record),
        Mode::Reader => reader(&mut page, strings, record),
    }

    page.h2(&strings.navigation);
    match mode {
        Mode::Raw => page.link(&format!("/{}", record.transaction), &strings.reader),
        Mode::Reader => page.link(&format!("/{}?raw", record.transaction), &strings.raw),
    };
    page.link(&format!("/{}", record.namespace), &strings.namespace)
        .link("/search", &strings.search)
        .link("/", &strings.main);

    page.finish()
}

fn raw(page: &mut Page, s: &Strings, r: &Record) {
    page.h1(&r.transaction);

    page.h2(&s.data)
        .h3(&s.key)
        .pre("", &escape_fence(&r.key))
        .h3(&s.value)
        .pre("", &escape_fence(&r.value));

    page.h2(&s.meta)
        .line(format!("* {}: {}", s.time, format_datetime(r.time)))
        .line(format!("* {}: {}", s.block, r.block));
}

fn reader(page: &mut Page, s: &Strings, r: &Record) {
    let title = collapse_whitespace(&r.key);
    page.h1(if title.is_empty() { &r.transaction } else { &title });

    let body = reader_body(&r.value);
    let open_fence = body.lines().filter(|l| l.starts_with(FENCE)).count() % 2 == 1;
    page.line(body);
    if open_fence {
        page.line(FENCE);
    }

    page.line(format!("{} · {} {}", format_date(r.time), s.block, r.block));
}
