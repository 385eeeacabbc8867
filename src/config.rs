//! Host configuration for the gateway.
//!
//! Layout follows `host/<name>/config.json`:
//! - geminiapp.server     — listen address
//! - geminiapp.pagination — page size for listings
//! - geminiapp.string     — every user-facing label (each has an English default)
//! - geminiapp.links      — footer links of the root page
//! - manticore            — index backend connection
//!
//! ENV overrides are applied on top of the file (see `apply_env`), so a single
//! config.json can be reused across deployments:
//!   KVAZAR_PAGINATION_LIMIT, KVAZAR_LISTEN_HOST, KVAZAR_LISTEN_PORT,
//!   KVAZAR_MANTICORE_HOST, KVAZAR_MANTICORE_PORT, KVAZAR_MANTICORE_TIMEOUT_MS

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fmt;
use std::path::Path;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub geminiapp: GeminiApp,
    #[serde(default)]
    pub manticore: Manticore,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct GeminiApp {
    #[serde(default)]
    pub server: Listen,
    #[serde(default)]
    pub pagination: Pagination,
    #[serde(default)]
    pub string: Strings,
    #[serde(default)]
    pub links: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Listen {
    #[serde(default = "default_listen_host")]
    pub host: String,
    #[serde(default = "default_listen_port")]
    pub port: u16,
}

impl Default for Listen {
    fn default() -> Self {
        Self {
            host: default_listen_host(),
            port: default_listen_port(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self { limit: default_limit() }
    }
}

/// Display strings. Missing entries fall back to English defaults.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Strings {
    pub title: String,
    pub description: String,
    pub search: String,
    pub part: String,
    pub main: String,
    pub older: String,
    pub newer: String,
    pub navigation: String,
    pub results: String,
    pub latest: String,
    pub nothing: String,
    pub namespace: String,
    pub data: String,
    pub key: String,
    pub value: String,
    pub meta: String,
    pub time: String,
    pub block: String,
    pub reader: String,
    pub raw: String,
    pub failure: String,
}

impl Default for Strings {
    fn default() -> Self {
        Self {
            title: "Kvazar".into(),
            description: "Kevacoin key/value explorer".into(),
            search: "Search".into(),
            part: "Part".into(),
            main: "Main".into(),
            older: "Older".into(),
            newer: "Newer".into(),
            navigation: "Navigation".into(),
            results: "Results".into(),
            latest: "Latest".into(),
            nothing: "Nothing found".into(),
            namespace: "Namespace".into(),
            data: "Data".into(),
            key: "Key".into(),
            value: "Value".into(),
            meta: "Meta".into(),
            time: "Time".into(),
            block: "Block".into(),
            reader: "Reader view".into(),
            raw: "Raw view".into(),
            failure: "Temporary failure".into(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Manticore {
    #[serde(default)]
    pub server: ManticoreServer,
    #[serde(default)]
    pub index: ManticoreIndex,
    /// Per-query timeout (connect + response).
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for Manticore {
    fn default() -> Self {
        Self {
            server: ManticoreServer::default(),
            index: ManticoreIndex::default(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct ManticoreServer {
    #[serde(default = "default_manticore_host")]
    pub host: String,
    #[serde(default = "default_manticore_port")]
    pub port: u16,
}

impl Default for ManticoreServer {
    fn default() -> Self {
        Self {
            host: default_manticore_host(),
            port: default_manticore_port(),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ManticoreIndex {
    #[serde(default)]
    pub document: ManticoreDocument,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ManticoreDocument {
    #[serde(default = "default_index_name")]
    pub name: String,
}

impl Default for ManticoreDocument {
    fn default() -> Self {
        Self { name: default_index_name() }
    }
}

fn default_listen_host() -> String {
    "127.0.0.1".into()
}
fn default_listen_port() -> u16 {
    1965
}
fn default_limit() -> u64 {
    20
}
fn default_manticore_host() -> String {
    "127.0.0.1".into()
}
fn default_manticore_port() -> u16 {
    9308
}
fn default_index_name() -> String {
    "kvazar".into()
}
fn default_timeout_ms() -> u64 {
    5000
}

impl Config {
    /// Parse config.json contents (no ENV overrides, no validation).
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| anyhow!("parse config: {}", e))
    }

    /// Read config.json, apply ENV overrides and validate.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let cfg = Self::from_json(&text)
            .with_context(|| format!("config {}", path.display()))?
            .apply_env();
        cfg.validate()?;
        Ok(cfg)
    }

    /// Override selected fields from the environment. Unparseable values are ignored.
    pub fn apply_env(mut self) -> Self {
        if let Ok(v) = std::env::var("KVAZAR_PAGINATION_LIMIT") {
            if let Ok(n) = v.trim().parse::<u64>() {
                self.geminiapp.pagination.limit = n;
            }
        }
        if let Ok(v) = std::env::var("KVAZAR_LISTEN_HOST") {
            let s = v.trim();
            if !s.is_empty() {
                self.geminiapp.server.host = s.to_string();
            }
        }
        if let Ok(v) = std::env::var("KVAZAR_LISTEN_PORT") {
            if let Ok(n) = v.trim().parse::<u16>() {
                self.geminiapp.server.port = n;
            }
        }
        if let Ok(v) = std::env::var("KVAZAR_MANTICORE_HOST") {
            let s = v.trim();
            if !s.is_empty() {
                self.manticore.server.host = s.to_string();
            }
        }
        if let Ok(v) = std::env::var("KVAZAR_MANTICORE_PORT") {
            if let Ok(n) = v.trim().parse::<u16>() {
                self.manticore.server.port = n;
            }
        }
        if let Ok(v) = std::env::var("KVAZAR_MANTICORE_TIMEOUT_MS") {
            if let Ok(n) = v.trim().parse::<u64>() {
                self.manticore.timeout_ms = n;
            }
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.geminiapp.pagination.limit == 0 {
            return Err(anyhow!("geminiapp.pagination.limit must be > 0"));
        }
        if self.manticore.index.document.name.trim().is_empty() {
            return Err(anyhow!("manticore.index.document.name must not be empty"));
        }
        Ok(())
    }

    /// Listen address "host:port" (IPv6 literals are bracketed).
    pub fn listen_addr(&self) -> String {
        join_host_port(&self.geminiapp.server.host, self.geminiapp.server.port)
    }

    /// Base URL of the Manticore HTTP API.
    pub fn manticore_url(&self) -> String {
        format!(
            "http://{}",
            join_host_port(&self.manticore.server.host, self.manticore.server.port)
        )
    }

    // Fluent setters, mostly for tests and embedding.

    pub fn with_limit(mut self, limit: u64) -> Self {
        self.geminiapp.pagination.limit = limit;
        self
    }

    pub fn with_links<I, S>(mut self, links: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.geminiapp.links = links.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_strings(mut self, strings: Strings) -> Self {
        self.geminiapp.string = strings;
        self
    }
}

fn join_host_port(host: &str, port: u16) -> String {
    if host.contains(':') && !host.starts_with('[') {
        format!("[{}]:{}", host, port)
    } else {
        format!("{}:{}", host, port)
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Config {{ listen: {}, limit: {}, links: {}, manticore: {}, index: {}, timeout_ms: {} }}",
            self.listen_addr(),
            self.geminiapp.pagination.limit,
            self.geminiapp.links.len(),
            self.manticore_url(),
            self.manticore.index.document.name,
            self.manticore.timeout_ms,
        )
    }
}
