//! Text helpers for gemtext output: whitespace folding, escaping, dates.

use chrono::DateTime;

/// Gemtext preformat toggle.
pub const FENCE: &str = "```";

/// Collapse every whitespace run to a single space and trim.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// CRLF / CR -> LF.
pub fn normalize_newlines(s: &str) -> String {
    s.replace("\r\n", "\n").replace('\r', "\n")
}

/// Prefix fence lines with a space so they cannot close a preformatted block.
pub fn escape_fence(s: &str) -> String {
    normalize_newlines(s)
        .split('\n')
        .map(|line| {
            if line.starts_with(FENCE) {
                format!(" {}", line)
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Break heading markers and leading hashtags: a space is inserted after the
/// leading whitespace of every line whose first visible character is '#'.
pub fn escape_headings(s: &str) -> String {
    s.split('\n')
        .map(|line| {
            let body = line.trim_start();
            if body.starts_with('#') {
                let indent = &line[..line.len() - body.len()];
                format!("{} {}", indent, body)
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Runs of 3+ line breaks become exactly one blank line.
pub fn collapse_breaks(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut run = 0usize;
    for c in s.chars() {
        if c == '\n' {
            run += 1;
            continue;
        }
        flush_breaks(&mut out, run);
        run = 0;
        out.push(c);
    }
    flush_breaks(&mut out, run);
    out
}

fn flush_breaks(out: &mut String, run: usize) {
    let n = if run >= 3 { 2 } else { run };
    for _ in 0..n {
        out.push('\n');
    }
}

/// Value as shown in reader mode.
pub fn reader_body(value: &str) -> String {
    collapse_breaks(&escape_headings(&normalize_newlines(value)))
}

/// `YYYY-MM-DD` (UTC). Out-of-range timestamps render as the raw number.
pub fn format_date(time: i64) -> String {
    DateTime::from_timestamp(time, 0)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| time.to_string())
}

/// `YYYY-MM-DD HH:MM:SS` (UTC).
pub fn format_datetime(time: i64) -> String {
    DateTime::from_timestamp(time, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| time.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace() {
        assert_eq!(collapse_whitespace("  a \n\t b   c \r\n"), "a b c");
        assert_eq!(collapse_whitespace(" \n "), "");
    }

    #[test]
    fn fences() {
        assert_eq!(escape_fence("a\n```\nb\n ```"), "a\n ```\nb\n ```");
        assert_eq!(escape_fence("```rust\r\nx"), " ```rust\nx");
    }

    #[test]
    fn headings() {
        assert_eq!(escape_headings("# h1\n## h2\ntext #tag"), " # h1\n ## h2\ntext #tag");
        assert_eq!(escape_headings("  #tag\n\t##x"), "   #tag\n\t ##x");
        assert_eq!(escape_headings("plain"), "plain");
    }

    #[test]
    fn breaks() {
        assert_eq!(collapse_breaks("a\n\n\n\nb"), "a\n\nb");
        assert_eq!(collapse_breaks("a\n\n\nb"), "a\n\nb");
        assert_eq!(collapse_breaks("a\n\nb\nc"), "a\n\nb\nc");
        assert_eq!(collapse_breaks("a\n\n\n"), "a\n\n");
    }

    #[test]
    fn reader_value() {
        assert_eq!(reader_body("## x\r\n\r\n\r\n\r\ny"), " ## x\n\ny");
    }

    #[test]
    fn dates() {
        assert_eq!(format_date(0), "1970-01-01");
        assert_eq!(format_date(1_700_000_000), "2023-11-14");
        assert_eq!(format_datetime(1_700_000_000), "2023-11-14 22:13:20");
        assert_eq!(format_date(i64::MAX), i64::MAX.to_string());
    }
}
