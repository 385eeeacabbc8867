//! Manticore Search backend (HTTP JSON API, `POST /search`).
//!
//! Запрос:
//!   {"index": <name>,
//!    "query": {"bool": {"must": [<match_all | query_string>, {"equals": {field: n}}, ...]}},
//!    "sort": [{field: "asc"|"desc"}], "offset": o, "limit": l}
//! Ответ:
//!   {"hits": {"hits": [{"_id": .., "_source": {<record fields>}}]}}
//!
//! One blocking client is shared by all connection threads; reqwest pools
//! connections internally and every call is bounded by the configured timeout.

use anyhow::{anyhow, Context, Result};
use log::debug;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::time::Duration;

use super::{Index, Query};
use crate::config::Config;
use crate::record::Record;

pub struct ManticoreIndex {
    client: reqwest::blocking::Client,
    endpoint: String,
    index: String,
}

impl ManticoreIndex {
    pub fn new(base_url: &str, index: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .user_agent(concat!("kvazar-gemini/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| anyhow!("manticore client build: {}", e))?;
        Ok(Self {
            client,
            endpoint: format!("{}/search", base_url.trim_end_matches('/')),
            index: index.to_string(),
        })
    }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        Self::new(
            &cfg.manticore_url(),
            &cfg.manticore.index.document.name,
            Duration::from_millis(cfg.manticore.timeout_ms.max(1)),
        )
    }
}

impl Index for ManticoreIndex {
    fn get(&self, query: &Query) -> Result<Vec<Record>> {
        let body = build_search_body(&self.index, query);
        debug!("manticore search: {}", body);

        let resp = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .with_context(|| format!("manticore request {}", self.endpoint))?;

        let status = resp.status();
        let text = resp
            .text()
            .with_context(|| format!("manticore response body ({})", status))?;
        if !status.is_success() {
            return Err(anyhow!("manticore HTTP {}: {}", status.as_u16(), text.trim()));
        }
        parse_search_response(&text)
    }
}

/// JSON body of a `/search` request.
pub fn build_search_body(index: &str, query: &Query) -> Value {
    let mut must: Vec<Value> = Vec::with_capacity(1 + query.filter.len());

    let term = query.term.trim();
    if term.is_empty() {
        must.push(json!({ "match_all": {} }));
    } else {
        must.push(json!({ "query_string": escape_term(term) }));
    }
    for (field, value) in &query.filter {
        must.push(json!({ "equals": single(field, json!(value)) }));
    }

    let sort: Vec<Value> = query
        .sort
        .iter()
        .map(|(field, order)| single(field, json!(order.as_str())))
        .collect();

    json!({
        "index": index,
        "query": { "bool": { "must": must } },
        "sort": sort,
        "offset": query.offset,
        "limit": query.limit,
    })
}

/// `{field: value}` object.
fn single(field: &str, value: Value) -> Value {
    let mut m = Map::new();
    m.insert(field.to_string(), value);
    Value::Object(m)
}

/// Escape Manticore full-text operators so the term is matched literally.
pub fn escape_term(term: &str) -> String {
    const SPECIAL: &[char] = &[
        '\\', '(', ')', '|', '-', '!', '@', '~', '"', '&', '/', '^', '$', '=', '<', '>',
    ];
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if SPECIAL.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    hits: Option<Hits>,
    #[serde(default)]
    error: Option<Value>,
}

#[derive(Deserialize)]
struct Hits {
    #[serde(default)]
    hits: Vec<Hit>,
}

#[derive(Deserialize)]
struct Hit {
    #[serde(rename = "_source")]
    source: Record,
}

/// Decode a `/search` response into records, preserving backend order.
pub fn parse_search_response(text: &str) -> Result<Vec<Record>> {
    let resp: SearchResponse =
        serde_json::from_str(text).map_err(|e| anyhow!("manticore response decode: {}", e))?;
    if let Some(err) = resp.error {
        return Err(anyhow!("manticore error: {}", err));
    }
    Ok(resp
        .hits
        .map(|h| h.hits.into_iter().map(|hit| hit.source).collect())
        .unwrap_or_default())
}
