//! Lightweight global metrics for the gateway.
//!
//! Потокобезопасные атомарные счётчики:
//! - запросы (всего / по статусам)
//! - ошибки backend'а (Manticore)
//! - транспорт (TLS handshake, плохие запросы)

use std::sync::atomic::{AtomicU64, Ordering};

use crate::response::Status;

// ----- Requests -----
static REQUESTS_TOTAL: AtomicU64 = AtomicU64::new(0);
static STATUS_INPUT: AtomicU64 = AtomicU64::new(0);
static STATUS_SUCCESS: AtomicU64 = AtomicU64::new(0);
static STATUS_REDIRECT: AtomicU64 = AtomicU64::new(0);
static STATUS_TEMPORARY_FAILURE: AtomicU64 = AtomicU64::new(0);
static STATUS_NOT_FOUND: AtomicU64 = AtomicU64::new(0);
static STATUS_BAD_REQUEST: AtomicU64 = AtomicU64::new(0);

// ----- Backend -----
static BACKEND_ERRORS: AtomicU64 = AtomicU64::new(0);

// ----- Transport -----
static CONNECTIONS_TOTAL: AtomicU64 = AtomicU64::new(0);
static TLS_HANDSHAKE_ERRORS: AtomicU64 = AtomicU64::new(0);
static BYTES_SENT: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Default)]
pub struct MetricsSnapshot {
    pub requests_total: u64,
    pub status_input: u64,
    pub status_success: u64,
    pub status_redirect: u64,
    pub status_temporary_failure: u64,
    pub status_not_found: u64,
    pub status_bad_request: u64,

    pub backend_errors: u64,

    pub connections_total: u64,
    pub tls_handshake_errors: u64,
    pub bytes_sent: u64,
}

impl MetricsSnapshot {
    /// Share of requests that ended in 40 (0.0..=1.0).
    pub fn failure_ratio(&self) -> f64 {
        if self.requests_total == 0 {
            0.0
        } else {
            self.status_temporary_failure as f64 / self.requests_total as f64
        }
    }
}

// ----- Recorders -----
pub fn record_response(status: Status, bytes: usize) {
    REQUESTS_TOTAL.fetch_add(1, Ordering::Relaxed);
    BYTES_SENT.fetch_add(bytes as u64, Ordering::Relaxed);
    let slot = match status {
        Status::Input => &STATUS_INPUT,
        Status::Success => &STATUS_SUCCESS,
        Status::Redirect => &STATUS_REDIRECT,
        Status::TemporaryFailure => &STATUS_TEMPORARY_FAILURE,
        Status::NotFound => &STATUS_NOT_FOUND,
        Status::BadRequest => &STATUS_BAD_REQUEST,
    };
    slot.fetch_add(1, Ordering::Relaxed);
}

pub fn record_backend_error() {
    BACKEND_ERRORS.fetch_add(1, Ordering::Relaxed);
}

pub fn record_connection() {
    CONNECTIONS_TOTAL.fetch_add(1, Ordering::Relaxed);
}

pub fn record_tls_handshake_error() {
    TLS_HANDSHAKE_ERRORS.fetch_add(1, Ordering::Relaxed);
}

pub fn snapshot() -> MetricsSnapshot {
    MetricsSnapshot {
        requests_total: REQUESTS_TOTAL.load(Ordering::Relaxed),
        status_input: STATUS_INPUT.load(Ordering::Relaxed),
        status_success: STATUS_SUCCESS.load(Ordering::Relaxed),
        status_redirect: STATUS_REDIRECT.load(Ordering::Relaxed),
        status_temporary_failure: STATUS_TEMPORARY_FAILURE.load(Ordering::Relaxed),
        status_not_found: STATUS_NOT_FOUND.load(Ordering::Relaxed),
        status_bad_request: STATUS_BAD_REQUEST.load(Ordering::Relaxed),
        backend_errors: BACKEND_ERRORS.load(Ordering::Relaxed),
        connections_total: CONNECTIONS_TOTAL.load(Ordering::Relaxed),
        tls_handshake_errors: TLS_HANDSHAKE_ERRORS.load(Ordering::Relaxed),
        bytes_sent: BYTES_SENT.load(Ordering::Relaxed),
    }
}

/// Prometheus text exposition of the current snapshot.
pub fn render_prometheus() -> String {
    let m = snapshot();
    let mut out = String::new();

    let ver = env!("CARGO_PKG_VERSION");
    out.push_str("# HELP kvazar_gemini_build_info Build info.\n");
    out.push_str("# TYPE kvazar_gemini_build_info gauge\n");
    out.push_str(&format!("kvazar_gemini_build_info{{version=\"{}\"}} 1\n", ver));

    // --- Requests ---
    out.push_str("# HELP kvazar_gemini_requests_total Gemini requests answered.\n");
    out.push_str("# TYPE kvazar_gemini_requests_total counter\n");
    out.push_str(&format!("kvazar_gemini_requests_total {}\n", m.requests_total));

    out.push_str("# HELP kvazar_gemini_responses_total Responses by status code.\n");
    out.push_str("# TYPE kvazar_gemini_responses_total counter\n");
    for (code, n) in [
        (Status::Input, m.status_input),
        (Status::Success, m.status_success),
        (Status::Redirect, m.status_redirect),
        (Status::TemporaryFailure, m.status_temporary_failure),
        (Status::NotFound, m.status_not_found),
        (Status::BadRequest, m.status_bad_request),
    ] {
        out.push_str(&format!(
            "kvazar_gemini_responses_total{{status=\"{}\"}} {}\n",
            code, n
        ));
    }

    out.push_str("# HELP kvazar_gemini_failure_ratio Temporary failures (percent of requests).\n");
    out.push_str("# TYPE kvazar_gemini_failure_ratio gauge\n");
    out.push_str(&format!("kvazar_gemini_failure_ratio {:.2}\n", m.failure_ratio() * 100.0));

    // --- Backend ---
    out.push_str("# HELP kvazar_gemini_backend_errors_total Failed index queries.\n");
    out.push_str("# TYPE kvazar_gemini_backend_errors_total counter\n");
    out.push_str(&format!("kvazar_gemini_backend_errors_total {}\n", m.backend_errors));

    // --- Transport ---
    out.push_str("# HELP kvazar_gemini_connections_total Accepted TCP connections.\n");
    out.push_str("# TYPE kvazar_gemini_connections_total counter\n");
    out.push_str(&format!("kvazar_gemini_connections_total {}\n", m.connections_total));

    out.push_str("# HELP kvazar_gemini_tls_handshake_errors_total Failed TLS handshakes.\n");
    out.push_str("# TYPE kvazar_gemini_tls_handshake_errors_total counter\n");
    out.push_str(&format!("kvazar_gemini_tls_handshake_errors_total {}\n", m.tls_handshake_errors));

    out.push_str("# HELP kvazar_gemini_bytes_sent_total Response bytes written.\n");
    out.push_str("# TYPE kvazar_gemini_bytes_sent_total counter\n");
    out.push_str(&format!("kvazar_gemini_bytes_sent_total {}\n", m.bytes_sent));

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_move() {
        // global counters are shared with other tests: compare deltas only
        let before = snapshot();
        record_response(Status::NotFound, 10);
        record_backend_error();
        let after = snapshot();
        assert!(after.requests_total >= before.requests_total + 1);
        assert!(after.status_not_found >= before.status_not_found + 1);
        assert!(after.backend_errors >= before.backend_errors + 1);
        assert!(after.bytes_sent >= before.bytes_sent + 10);
    }

    #[test]
    fn prometheus_text() {
        let text = render_prometheus();
        assert!(text.contains("kvazar_gemini_requests_total "));
        assert!(text.contains("kvazar_gemini_responses_total{status=\"51\"} "));
        assert!(text.ends_with('\n'));
    }
}
