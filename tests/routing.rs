use anyhow::Result;

use kvazar_gemini::config::Config;
use kvazar_gemini::{Context, MemoryIndex, Record, Response, Status, ALIAS_KEY, MIME_GEMTEXT};

fn ns(c: char) -> String {
    format!("N{}", c.to_string().repeat(33))
}

fn tx(n: u64) -> String {
    format!("{:064x}", n)
}

fn record(key: &str, value: &str, n: u64, namespace: &str) -> Record {
    Record {
        key: key.into(),
        value: value.into(),
        transaction: tx(n),
        block: 1000 + n,
        time: 1_700_000_000 + n as i64 * 60,
        namespace: namespace.into(),
    }
}

fn ctx(records: Vec<Record>) -> Context {
    Context::new(
        Config::default().with_limit(10).with_links(["gemini://kevacoin.example Kevacoin"]),
        MemoryIndex::with_records(records),
    )
}

#[test]
fn empty_path_redirects_to_root() -> Result<()> {
    let c = ctx(vec![]);
    assert_eq!(c.handle(None, None), Response::redirect("/"));
    assert_eq!(c.handle(Some(""), Some("x")), Response::redirect("/"));
    Ok(())
}

#[test]
fn search_prompt_and_redirect() -> Result<()> {
    let c = ctx(vec![]);

    let r = c.handle(Some("/search"), None);
    assert_eq!(r.status, Status::Input);
    assert_eq!(r.meta, c.config.geminiapp.string.search);

    let r = c.handle(Some("/search"), Some(""));
    assert_eq!(r.status, Status::Input);

    let r = c.handle(Some("/search"), Some("needle"));
    assert_eq!(r.status, Status::Redirect);
    assert_eq!(r.meta, "/?search=needle");
    Ok(())
}

#[test]
fn unknown_path_is_not_found() -> Result<()> {
    let c = ctx(vec![]);
    let r = c.handle(Some("/robots.txt"), None);
    assert_eq!(r.status, Status::NotFound);
    assert_eq!(r.meta, c.config.geminiapp.string.nothing);
    assert!(r.content.is_empty());
    Ok(())
}

#[test]
fn root_listing_is_gemtext() -> Result<()> {
    let a = ns('a');
    let c = ctx(vec![record("first", "1", 1, &a), record("second", "2", 2, &a)]);
    let r = c.handle(Some("/"), None);
    assert_eq!(r.status, Status::Success);
    assert_eq!(r.meta, MIME_GEMTEXT);

    let lines: Vec<&str> = r.content.lines().collect();
    assert_eq!(lines[0], "# Kvazar · Kevacoin key/value explorer");
    assert!(lines.contains(&"=> gemini://kevacoin.example Kevacoin"));
    // newest first
    let first = lines.iter().position(|l| l.ends_with(" second")).unwrap();
    let second = lines.iter().position(|l| l.ends_with(" first")).unwrap();
    assert!(first < second);
    assert!(lines.contains(&"=> /?part=2 Older"));
    assert!(!r.content.contains("Newer"));
    Ok(())
}

#[test]
fn namespace_alias_in_title() -> Result<()> {
    let a = ns('a');
    let b = ns('b');
    let alias = record(ALIAS_KEY, "Poems", 1, &a);
    let c = ctx(vec![alias, record("verse", "...", 2, &a), record("other", "...", 3, &b)]);

    let r = c.handle(Some(&format!("/{}", a)), None);
    assert_eq!(r.status, Status::Success);
    assert!(r.content.starts_with("# Poems\n"));
    assert!(r.content.contains("\n=> / Main\n"));
    assert!(r.content.contains(" verse"));
    assert!(!r.content.contains(" other"));
    Ok(())
}

#[test]
fn namespace_without_alias_uses_id() -> Result<()> {
    let b = ns('b');
    let c = ctx(vec![record("k", "v", 1, &b)]);
    let r = c.handle(Some(&format!("/{}", b)), None);
    assert!(r.content.starts_with(&format!("# {}\n", b)));
    Ok(())
}

#[test]
fn search_listing_pages() -> Result<()> {
    let a = ns('a');
    let records: Vec<Record> = (1..=25)
        .map(|n| record(&format!("cat {}", n), "meow", n, &a))
        .collect();
    let c = ctx(records);

    let r = c.handle(Some("/"), Some("search=cat&part=3"));
    assert_eq!(r.status, Status::Success);
    assert!(r.content.starts_with("# cat · Search · Part 3\n"));
    assert!(r.content.contains("## Results"));
    // 25 hits, 10 per page: third page holds the 5 oldest
    let hits = r.content.lines().filter(|l| l.starts_with("=> /0")).count();
    assert_eq!(hits, 5);
    assert!(r.content.contains("=> /?search=cat&part=4 Older"));
    assert!(r.content.contains("=> /?search=cat&part=2 Newer"));
    Ok(())
}

#[test]
fn empty_listing_has_no_pagination() -> Result<()> {
    let c = ctx(vec![]);
    let r = c.handle(Some("/"), Some("search=absent"));
    assert_eq!(r.status, Status::Success);
    assert!(r.content.contains(&c.config.geminiapp.string.nothing));
    assert!(!r.content.contains("part="));
    assert!(!r.content.contains("## Navigation"));
    Ok(())
}

#[test]
fn malformed_part_is_first_page() -> Result<()> {
    let a = ns('a');
    let c = ctx(vec![record("k", "v", 1, &a)]);
    let r = c.handle(Some("/"), Some("part=banana"));
    assert_eq!(r.status, Status::Success);
    assert!(r.content.contains("=> /?part=2 Older"));
    assert!(!r.content.contains("Newer"));
    Ok(())
}

#[test]
fn transaction_route_reader_and_raw() -> Result<()> {
    let a = ns('a');
    let rec = record("Hello", "## heading\nbody", 7, &a);
    let c = ctx(vec![rec.clone()]);

    let r = c.handle(Some(&format!("/{}", rec.transaction)), None);
    assert_eq!(r.status, Status::Success);
    assert!(r.content.starts_with("# Hello\n ## heading\nbody\n"));
    assert!(r.content.contains(&format!("=> /{}?raw Raw view", rec.transaction)));

    let r = c.handle(Some(&format!("/{}", rec.transaction)), Some("raw"));
    assert!(r.content.starts_with(&format!("# {}\n", rec.transaction)));
    assert!(r.content.contains(&format!("=> /{} Reader view", rec.transaction)));
    assert!(r.content.contains(&format!("=> /{} Namespace", a)));
    Ok(())
}

#[test]
fn absent_transaction_is_empty_success() -> Result<()> {
    let a = ns('a');
    let c = ctx(vec![record("k", "v", 1, &a)]);
    let r = c.handle(Some(&format!("/{}", tx(999))), None);
    assert_eq!(r.status, Status::Success);
    assert_eq!(r.content, "");
    Ok(())
}
