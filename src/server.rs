// src/server.rs
// =============================================================================
// HTTP front end for the crawler.
//
//   GET /crawl?url=https://example.com&depth=2
//
// - url:   required, absolute http/https seed URL
// - depth: optional integer >= 0, defaults to 2
//
// Responses:
// - 200 with the page tree as JSON
// - 400 {"error": "..."} for a missing/invalid url or depth
// - 504 {"error": "..."} if the configured crawl deadline expires
//
// Pages that fail to load don't change the status code; their branches are
// just shallower.
// =============================================================================

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tokio::net::TcpListener;
use tracing::info;

use crate::cli::DEFAULT_DEPTH;
use crate::crawl::Crawler;
use crate::error::CrawlError;

#[derive(Clone)]
pub struct AppState {
    crawler: Arc<Crawler>,
    deadline: Option<Duration>,
}

impl AppState {
    pub fn new(crawler: Crawler, deadline: Option<Duration>) -> Self {
        Self {
            crawler: Arc::new(crawler),
            deadline,
        }
    }
}

// Query parameters arrive as raw strings so we can answer 400 with our own
// message instead of axum's rejection text
#[derive(Debug, Deserialize)]
pub struct CrawlParams {
    url: Option<String>,
    depth: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/crawl", get(handle_crawl))
        .with_state(state)
}

/// Binds `addr` and serves until the process is stopped
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("listening on http://{addr}");

    axum::serve(listener, router(state))
        .await
        .context("HTTP server stopped unexpectedly")
}

async fn handle_crawl(
    State(state): State<AppState>,
    Query(params): Query<CrawlParams>,
) -> Response {
    let Some(url) = params.url.filter(|u| !u.trim().is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "missing 'url' query parameter");
    };

    let depth = match params.depth.as_deref().map(str::trim) {
        None | Some("") => DEFAULT_DEPTH,
        Some(raw) => match raw.parse::<i64>() {
            Ok(depth) => depth,
            Err(_) => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    &format!("invalid depth '{raw}': expected an integer"),
                )
            }
        },
    };

    match state
        .crawler
        .crawl_with_deadline(&url, depth, state.deadline)
        .await
    {
        Ok(tree) => Json(tree).into_response(),
        Err(e @ CrawlError::DeadlineExceeded(_)) => {
            error_response(StatusCode::GATEWAY_TIMEOUT, &e.to_string())
        }
        Err(e) => error_response(StatusCode::BAD_REQUEST, &e.to_string()),
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
