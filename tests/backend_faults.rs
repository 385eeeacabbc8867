use std::sync::Arc;
use std::thread;

use anyhow::{anyhow, Result};

use kvazar_gemini::config::Config;
use kvazar_gemini::record::FIELD_CRC32_TRANSACTION;
use kvazar_gemini::{Context, Index, Query, Record, Status};

/// Backend that always fails (connection refused / timeout).
struct Unreachable;

impl Index for Unreachable {
    fn get(&self, _: &Query) -> Result<Vec<Record>> {
        Err(anyhow!("manticore request: operation timed out"))
    }
}

/// Backend that ignores the checksum value and returns every record,
/// i.e. behaves as if all transaction checksums collided.
struct Colliding {
    records: Vec<Record>,
}

impl Index for Colliding {
    fn get(&self, q: &Query) -> Result<Vec<Record>> {
        assert!(q.filter.contains_key(FIELD_CRC32_TRANSACTION));
        Ok(self.records.clone())
    }
}

fn rec(key: &str, tx: char) -> Record {
    Record {
        key: key.into(),
        value: format!("value of {}", key),
        transaction: tx.to_string().repeat(64),
        block: 42,
        time: 1_600_000_000,
        namespace: format!("N{}", "x".repeat(33)),
    }
}

#[test]
fn backend_failure_is_temporary_failure() -> Result<()> {
    let c = Context::new(Config::default(), Unreachable);

    let r = c.handle(Some("/"), None);
    assert_eq!(r.status, Status::TemporaryFailure);
    assert_eq!(r.meta, c.config.geminiapp.string.failure);
    assert!(r.content.is_empty());

    let r = c.handle(Some(&format!("/{}", "a".repeat(64))), None);
    assert_eq!(r.status, Status::TemporaryFailure);

    // routes without index access are unaffected
    assert_eq!(c.handle(Some("/search"), None).status, Status::Input);
    assert_eq!(c.handle(Some("/nope"), None).status, Status::NotFound);
    Ok(())
}

#[test]
fn collision_renders_exact_match_only() -> Result<()> {
    let idx = Colliding {
        records: vec![rec("decoy", 'b'), rec("target", 'c')],
    };
    let c = Context::new(Config::default(), idx);

    let r = c.handle(Some(&format!("/{}", "c".repeat(64))), None);
    assert_eq!(r.status, Status::Success);
    assert!(r.content.starts_with("# target\n"));
    assert!(!r.content.contains("decoy"));

    let r = c.handle(Some(&format!("/{}", "d".repeat(64))), None);
    assert_eq!(r.status, Status::Success);
    assert_eq!(r.content, "");
    Ok(())
}

#[test]
fn concurrent_requests_share_context() -> Result<()> {
    let records: Vec<Record> = "0123456789".chars().map(|c| rec(&format!("k{}", c), c)).collect();
    let c = Arc::new(Context::new(
        Config::default(),
        Colliding { records },
    ));

    let handles: Vec<_> = "0123456789"
        .chars()
        .map(|ch| {
            let c = Arc::clone(&c);
            thread::spawn(move || {
                let r = c.handle(Some(&format!("/{}", ch.to_string().repeat(64))), Some("raw"));
                (ch, r)
            })
        })
        .collect();

    for h in handles {
        let (ch, r) = h.join().map_err(|_| anyhow!("worker panicked"))?;
        assert_eq!(r.status, Status::Success);
        assert!(r.content.contains(&format!("k{}", ch)));
    }
    Ok(())
}
