//! server — Gemini over TLS.
//!
//! - request.rs — чтение/разбор строки запроса.
//! - tls.rs     — загрузка сертификата/ключа (native-tls).
//!
//! Model: blocking accept loop, one thread per connection, shared
//! `Arc<Context>`. Connection failures are logged and never stop the loop.

use anyhow::{anyhow, Result};
use log::{debug, info, warn};
use native_tls::TlsAcceptor;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::metrics;
use crate::response::{Response, Status};
use crate::router::Context;

pub mod request;
pub mod tls;

pub use request::{parse_request_line, read_request_line, Request};

/// Socket read/write timeout per connection.
pub const IO_TIMEOUT: Duration = Duration::from_secs(30);

/// Connections served concurrently; extra ones are closed right away.
pub const MAX_CONNECTIONS: usize = 512;

static ACTIVE: AtomicUsize = AtomicUsize::new(0);

struct ActiveGuard;

impl ActiveGuard {
    fn acquire() -> Option<Self> {
        let prev = ACTIVE.fetch_add(1, Ordering::AcqRel);
        if prev >= MAX_CONNECTIONS {
            ACTIVE.fetch_sub(1, Ordering::AcqRel);
            return None;
        }
        Some(ActiveGuard)
    }
}

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        ACTIVE.fetch_sub(1, Ordering::AcqRel);
    }
}

/// Bind `addr` and serve forever.
pub fn serve(addr: &str, acceptor: TlsAcceptor, ctx: Arc<Context>) -> Result<()> {
    let listener = TcpListener::bind(addr).map_err(|e| anyhow!("bind {}: {}", addr, e))?;
    info!("listening on {}", addr);
    serve_listener(listener, acceptor, ctx)
}

pub fn serve_listener(listener: TcpListener, acceptor: TlsAcceptor, ctx: Arc<Context>) -> Result<()> {
    let acceptor = Arc::new(acceptor);
    for stream in listener.incoming() {
        let stream = match stream {
            Ok(s) => s,
            Err(e) => {
                warn!("accept error: {}", e);
                continue;
            }
        };
        metrics::record_connection();

        let Some(guard) = ActiveGuard::acquire() else {
            warn!("connection limit ({}) reached, dropping {:?}", MAX_CONNECTIONS, stream.peer_addr().ok());
            continue;
        };

        let acceptor = Arc::clone(&acceptor);
        let ctx = Arc::clone(&ctx);
        let spawned = thread::Builder::new()
            .name("gemini-conn".into())
            .spawn(move || {
                let _guard = guard;
                if let Err(e) = handle_connection(stream, &acceptor, &ctx) {
                    warn!("connection: {:#}", e);
                }
            });
        if let Err(e) = spawned {
            warn!("spawn connection thread: {}", e);
        }
    }
    Ok(())
}

fn handle_connection(stream: TcpStream, acceptor: &TlsAcceptor, ctx: &Context) -> Result<()> {
    let peer = stream.peer_addr().ok();
    stream.set_read_timeout(Some(IO_TIMEOUT))?;
    stream.set_write_timeout(Some(IO_TIMEOUT))?;

    let mut tls = acceptor.accept(stream).map_err(|e| {
        metrics::record_tls_handshake_error();
        anyhow!("tls handshake ({:?}): {}", peer, e)
    })?;

    let response = respond(&mut tls, ctx);
    let bytes = response.to_bytes();
    tls.write_all(&bytes)?;
    tls.flush()?;
    metrics::record_response(response.status, bytes.len());
    debug!("{:?} -> {} {}", peer, response.status, response.meta);

    let _ = tls.shutdown();
    Ok(())
}

/// Read one request from `io` and produce its response.
pub fn respond<S: Read>(io: &mut S, ctx: &Context) -> Response {
    let parsed = read_request_line(io).and_then(|line| parse_request_line(&line));
    match parsed {
        Ok(req) => ctx.handle(Some(&req.path), req.query.as_deref()),
        Err(e) => {
            debug!("bad request: {:#}", e);
            Response::with_status(Status::BadRequest, "Bad request")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::index::MemoryIndex;
    use std::io::Cursor;

    fn ctx() -> Context {
        Context::new(Config::default(), MemoryIndex::new())
    }

    #[test]
    fn respond_routes_request() {
        let c = ctx();
        let r = respond(&mut Cursor::new(b"gemini://h\r\n".to_vec()), &c);
        assert_eq!(r, Response::redirect("/"));

        let r = respond(&mut Cursor::new(b"gemini://h/search?cats\r\n".to_vec()), &c);
        assert_eq!(r.status, Status::Redirect);
        assert_eq!(r.meta, "/?search=cats");
    }

    #[test]
    fn respond_bad_request() {
        let c = ctx();
        let r = respond(&mut Cursor::new(b"http://h/\r\n".to_vec()), &c);
        assert_eq!(r.status, Status::BadRequest);
        let r = respond(&mut Cursor::new(b"gemini://h/".to_vec()), &c);
        assert_eq!(r.status, Status::BadRequest);
    }

    #[test]
    fn guard_releases_slot() {
        let before = ACTIVE.load(Ordering::Acquire);
        {
            let _g = ActiveGuard::acquire().unwrap();
            assert!(ACTIVE.load(Ordering::Acquire) >= 1);
        }
        assert!(ACTIVE.load(Ordering::Acquire) <= before + 1);
    }
}
