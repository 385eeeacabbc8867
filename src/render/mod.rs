//! render — gemtext-страницы.
//!
//! - text.rs        — экранирование, свёртка пробелов, даты.
//! - listing.rs     — лента / поиск / namespace (много записей).
//! - transaction.rs — одна запись (reader / raw).
//!
//! Pages are built as an ordered list of lines and joined with '\n' at the end.

pub mod listing;
pub mod text;
pub mod transaction;

pub use listing::{render_listing, Listing};
pub use transaction::{render_transaction, Mode};

/// Ordered gemtext lines.
#[derive(Clone, Debug, Default)]
pub struct Page {
    lines: Vec<String>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line<S: Into<String>>(&mut self, s: S) -> &mut Self {
        self.lines.push(s.into());
        self
    }

    pub fn h1(&mut self, s: &str) -> &mut Self {
        self.line(format!("# {}", s))
    }

    pub fn h2(&mut self, s: &str) -> &mut Self {
        self.line(format!("## {}", s))
    }

    pub fn h3(&mut self, s: &str) -> &mut Self {
        self.line(format!("### {}", s))
    }

    /// `=> target label` (label omitted when empty).
    pub fn link(&mut self, target: &str, label: &str) -> &mut Self {
        if label.is_empty() {
            self.line(format!("=> {}", target))
        } else {
            self.line(format!("=> {} {}", target, label))
        }
    }

    /// Preformatted block; `body` must already be fence-escaped.
    pub fn pre(&mut self, alt: &str, body: &str) -> &mut Self {
        if alt.is_empty() {
            self.line(text::FENCE);
        } else {
            self.line(format!("{} {}", text::FENCE, alt));
        }
        self.line(body);
        self.line(text::FENCE)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn finish(self) -> String {
        self.lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_builder() {
        let mut p = Page::new();
        p.h1("T").link("/search", "Search").link("gemini://x", "").pre("alt", "body");
        assert_eq!(
            p.finish(),
            "# T\n=> /search Search\n=> gemini://x\n``` alt\nbody\n```"
        );
        assert_eq!(Page::new().finish(), "");
    }
}
