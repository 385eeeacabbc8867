//! Prometheus exporter (tiny_http) running beside the Gemini listener.

use anyhow::{anyhow, Result};
use log::{info, warn};
use tiny_http::{Header, Response, Server};

use kvazar_gemini::metrics;

pub fn spawn(addr: &str) -> Result<()> {
    let server = Server::http(addr).map_err(|e| anyhow!("bind http at {}: {}", addr, e))?;
    info!("metrics exporter listening on {}", addr);
    std::thread::Builder::new()
        .name("metrics-exporter".into())
        .spawn(move || run(server))
        .map_err(|e| anyhow!("spawn exporter thread: {}", e))?;
    Ok(())
}

fn run(server: Server) {
    loop {
        let rq = match server.recv() {
            Ok(rq) => rq,
            Err(e) => {
                warn!("http recv error: {}", e);
                continue;
            }
        };

        let url = rq.url().to_string();
        let method = rq.method().as_str().to_string();

        if method == "GET" && (url == "/" || url == "/health" || url == "/ready") {
            let resp = Response::from_string("OK\n").with_status_code(200);
            let _ = rq.respond(resp);
            continue;
        }

        if method == "GET" && url == "/metrics" {
            let mut resp = Response::from_string(metrics::render_prometheus());
            if let Ok(ct) = Header::from_bytes(b"Content-Type", b"text/plain; version=0.0.4") {
                resp.add_header(ct);
            }
            let _ = rq.respond(resp);
            continue;
        }

        let resp = Response::from_string("not found\n").with_status_code(404);
        let _ = rq.respond(resp);
    }
}
