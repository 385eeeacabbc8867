use clap::Parser;
use std::path::PathBuf;

/// Gemini gateway for the Kevacoin key/value index
#[derive(Parser, Debug)]
#[command(name = "kvazar_gemini", version, about = "Kvazar Gemini gateway")]
pub struct Cli {
    /// Configured host name (directory under --root with cert.pem, key.rsa, config.json)
    pub host: String,

    /// Directory holding per-host configuration
    #[arg(long, default_value = "host")]
    pub root: PathBuf,

    /// Optional Prometheus exporter address, e.g. 127.0.0.1:9899
    #[arg(long)]
    pub metrics_addr: Option<String>,
}

/// Files of one configured host.
#[derive(Debug, Clone)]
pub struct HostFiles {
    pub cert: PathBuf,
    pub key: PathBuf,
    pub config: PathBuf,
}

impl Cli {
    pub fn host_files(&self) -> HostFiles {
        let dir = self.root.join(&self.host);
        HostFiles {
            cert: dir.join("cert.pem"),
            key: dir.join("key.rsa"),
            config: dir.join("config.json"),
        }
    }
}
