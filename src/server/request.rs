//! Gemini request line: `gemini://host[:port]/path[?query]\r\n`, max 1024 bytes of URL.

use anyhow::{anyhow, Result};
use std::io::{ErrorKind, Read};

/// Maximum URL length permitted by the protocol (CRLF excluded).
pub const MAX_URL_LEN: usize = 1024;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Request {
    pub host: String,
    /// URL path as received (may be empty).
    pub path: String,
    /// Raw query string, not decoded; None when the URL has no '?'.
    pub query: Option<String>,
}

/// Read bytes up to CRLF. Fails on EOF, over-long lines or invalid UTF-8.
pub fn read_request_line<R: Read>(r: &mut R) -> Result<String> {
    let mut buf: Vec<u8> = Vec::with_capacity(128);
    let mut byte = [0u8; 1];
    loop {
        match r.read(&mut byte) {
            Ok(0) => return Err(anyhow!("connection closed before CRLF")),
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(anyhow!("read request: {}", e)),
        }
        buf.push(byte[0]);
        if buf.ends_with(b"\r\n") {
            buf.truncate(buf.len() - 2);
            break;
        }
        if buf.len() > MAX_URL_LEN + 1 {
            return Err(anyhow!("request line exceeds {} bytes", MAX_URL_LEN));
        }
    }
    String::from_utf8(buf).map_err(|_| anyhow!("request line is not UTF-8"))
}

/// Split an absolute gemini URL into host, path and raw query.
pub fn parse_request_line(line: &str) -> Result<Request> {
    if line.len() > MAX_URL_LEN {
        return Err(anyhow!("request line exceeds {} bytes", MAX_URL_LEN));
    }
    let (scheme, rest) = line
        .split_once("://")
        .ok_or_else(|| anyhow!("not an absolute URL: {:?}", line))?;
    if !scheme.eq_ignore_ascii_case("gemini") {
        return Err(anyhow!("unsupported scheme: {}", scheme));
    }

    // fragment is never sent to handlers
    let rest = rest.split('#').next().unwrap_or("");

    let authority_end = rest.find(['/', '?']).unwrap_or(rest.len());
    let authority = &rest[..authority_end];
    let host = authority.rsplit('@').next().unwrap_or(authority);
    if host.is_empty() {
        return Err(anyhow!("empty host in URL"));
    }

    let tail = &rest[authority_end..];
    let (path, query) = match tail.split_once('?') {
        Some((p, q)) => (p, Some(q.to_string())),
        None => (tail, None),
    };

    Ok(Request {
        host: host.to_string(),
        path: path.to_string(),
        query,
    })
}
