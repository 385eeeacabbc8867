//! Request router: (path, query) -> Response.
//!
//! Stateless: every call reads the shared, immutable `Context` only.
//! Backend failures degrade the single request to status 40.

use anyhow::Result;
use log::{debug, warn};

use crate::config::Config;
use crate::index::Index;
use crate::pagination::Pagination;
use crate::query;
use crate::render::{render_listing, render_transaction, Listing, Mode};
use crate::response::{Response, Status};
use crate::route::Route;
use crate::util::query_param;

/// Shared, read-only state built once at startup.
pub struct Context {
    pub config: Config,
    pub index: Box<dyn Index>,
}

impl Context {
    pub fn new<I: Index + 'static>(config: Config, index: I) -> Self {
        Self {
            config,
            index: Box::new(index),
        }
    }

    /// Handle one request. `query` is the raw (still encoded) query string.
    pub fn handle(&self, path: Option<&str>, query: Option<&str>) -> Response {
        let route = Route::classify(path);
        debug!("route {} for path {:?} query {:?}", route.kind(), path, query);

        let result = match route {
            Route::Root => Ok(Response::redirect("/")),
            Route::Listing { namespace } => self.listing(namespace.as_deref(), query.unwrap_or("")),
            Route::Transaction { hash } => self.transaction(&hash, query),
            Route::Search => Ok(self.search(query)),
            Route::NotFound => Ok(Response::with_status(
                Status::NotFound,
                self.config.geminiapp.string.nothing.as_str(),
            )),
        };

        result.unwrap_or_else(|e| {
            warn!("index backend failure on {:?}: {:#}", path, e);
            crate::metrics::record_backend_error();
            Response::with_status(
                Status::TemporaryFailure,
                self.config.geminiapp.string.failure.as_str(),
            )
        })
    }

    fn listing(&self, namespace: Option<&str>, raw_query: &str) -> Result<Response> {
        let app = &self.config.geminiapp;
        let search = query_param(raw_query, "search").unwrap_or_default();
        let part = Pagination::parse_part(query_param(raw_query, "part").as_deref());
        let page = Pagination::new(part, app.pagination.limit);

        let alias = match namespace {
            Some(ns) if search.is_empty() => Some(crate::namespace::resolve(self.index.as_ref(), ns)),
            _ => None,
        };

        let records = self.index.get(&query::listing(&search, namespace, &page))?;

        let content = render_listing(&Listing {
            strings: &app.string,
            links: &app.links,
            search: &search,
            namespace,
            alias: alias.as_deref(),
            page,
            records: &records,
        });
        Ok(Response::success(content))
    }

    fn transaction(&self, hash: &str, raw_query: Option<&str>) -> Result<Response> {
        let candidates = self.index.get(&query::transaction(hash))?;
        let content = render_transaction(
            &self.config.geminiapp.string,
            &candidates,
            hash,
            Mode::from_query(raw_query),
        );
        Ok(Response::success(content))
    }

    fn search(&self, raw_query: Option<&str>) -> Response {
        match raw_query {
            Some(q) if !q.is_empty() => Response::redirect(format!("/?search={}", q)),
            _ => Response::with_status(Status::Input, self.config.geminiapp.string.search.as_str()),
        }
    }
}
