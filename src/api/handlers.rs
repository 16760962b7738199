//! API Handlers
//!
//! HTTP request handlers for the content server. Files are served through
//! the shared LRU cache; saving a file marks its cached copy dirty so the
//! next read reloads it.

use std::path::Path;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use rand::Rng;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::cache::{Cache, PutOutcome};
use crate::config::Config;
use crate::content::{files, mime_type_for};
use crate::error::{CacheError, Result};
use crate::models::{SaveResponse, StatsResponse};

/// Page served for unknown files, looked up under `server_files`.
pub const NOT_FOUND_PAGE: &str = "404.html";

/// Application state shared across all handlers.
///
/// The cache is not synchronized internally; the lock serializes every
/// access to it.
///
/// Lock order is `files` before `cache`. Saves hold `files` exclusively
/// across the write and the dirty mark. Reloads hold it shared across the
/// read and the `put`, so a reload never caches bytes older than a save
/// that has already returned.
#[derive(Clone)]
pub struct AppState {
    /// Shared cache, guarded by a single lock
    pub cache: Arc<RwLock<Cache>>,
    /// Orders disk reloads against saves under the served root
    pub files: Arc<RwLock<()>>,
    /// Server configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates a new AppState with the given cache and configuration.
    pub fn new(cache: Cache, config: Config) -> Self {
        Self {
            cache: Arc::new(RwLock::new(cache)),
            files: Arc::new(RwLock::new(())),
            config: Arc::new(config),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Fails if the cache cannot be built from the configured sizes.
    pub fn from_config(config: &Config) -> Result<Self> {
        let cache = Cache::new(config.cache_max_size, config.cache_index_hint)?;
        Ok(Self::new(cache, config.clone()))
    }
}

/// Handler for GET /d20
///
/// Returns a random integer between 1 and 20 inclusive as plain text.
pub async fn d20_handler() -> Response {
    let roll: u32 = rand::thread_rng().gen_range(1..=20);
    content_response(StatusCode::OK, "text/plain", roll.to_string().into_bytes())
}

/// Handler for GET /stats
///
/// Returns current cache statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let cache = state.cache.read().await;
    Json(StatsResponse::new(&cache.stats(), cache.max_size()))
}

/// Fallback handler for every other path.
///
/// - GET serves the file through the cache
/// - POST overwrites the file with the request body
/// - anything else is a 404
pub async fn content_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response {
    match method {
        Method::GET => serve_file(&state, uri.path()).await,
        Method::POST => save_file(&state, uri.path(), &body).await,
        _ => not_found_page(&state).await,
    }
}

// == Serve ==
async fn serve_file(state: &AppState, request_path: &str) -> Response {
    let path = match files::resolve(&state.config.server_root, request_path) {
        Ok(path) => path,
        Err(err) => return err.into_response(),
    };
    let key = cache_key(&path);

    // Write lock: a hit reorders the recency list.
    {
        let mut cache = state.cache.write().await;
        if let Some(entry) = cache.get(&key) {
            if !entry.is_dirty() {
                debug!(key = %key, "cache hit");
                return content_response(
                    StatusCode::OK,
                    entry.content_type(),
                    entry.content().to_vec(),
                );
            }
            debug!(key = %key, "cached entry is dirty, reloading");
        } else {
            debug!(key = %key, "cache miss");
        }
    }

    // Held until the loaded bytes are in the cache.
    let _files = state.files.read().await;

    let data = match files::load(&path).await {
        Ok(data) => data,
        Err(CacheError::NotFound(_)) => return not_found_page(state).await,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "failed to load file");
            return err.into_response();
        }
    };
    let mime_type = mime_type_for(&path);

    {
        let mut cache = state.cache.write().await;
        match cache.put(&key, mime_type, &data) {
            Ok(PutOutcome::Inserted { evicted: Some(old) }) => {
                debug!(key = %key, evicted = %old.key(), "cached file, evicted LRU entry");
            }
            Ok(PutOutcome::Inserted { evicted: None }) => debug!(key = %key, "cached file"),
            Ok(PutOutcome::Refreshed) => debug!(key = %key, "refreshed dirty entry"),
            Ok(PutOutcome::Unchanged) => {}
            Err(err) => warn!(key = %key, error = %err, "failed to cache file"),
        }
    }

    content_response(StatusCode::OK, mime_type, data)
}

// == Save ==
async fn save_file(state: &AppState, request_path: &str, body: &[u8]) -> Response {
    let path = match files::resolve(&state.config.server_root, request_path) {
        Ok(path) => path,
        Err(err) => return err.into_response(),
    };

    let _files = state.files.write().await;

    match files::save(&path, body).await {
        Ok(()) => {}
        Err(CacheError::NotFound(_)) => {
            return CacheError::InvalidArgument(format!("cannot save to {}", request_path))
                .into_response()
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "failed to save file");
            return err.into_response();
        }
    }

    let key = cache_key(&path);
    if let Some(entry) = state.cache.write().await.get(&key) {
        entry.mark_dirty();
        debug!(key = %key, "marked cached entry dirty");
    }

    (
        StatusCode::OK,
        [(header::DATE, http_date())],
        Json(SaveResponse::ok()),
    )
        .into_response()
}

// == Not Found ==
async fn not_found_page(state: &AppState) -> Response {
    let path = state.config.server_files.join(NOT_FOUND_PAGE);
    match files::load(&path).await {
        Ok(page) => content_response(StatusCode::NOT_FOUND, mime_type_for(&path), page),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "cannot find 404 page");
            content_response(StatusCode::NOT_FOUND, "text/plain", b"Not Found".to_vec())
        }
    }
}

// == Helpers ==
/// Cache key for a resolved file path.
fn cache_key(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn content_response(status: StatusCode, content_type: &str, body: Vec<u8>) -> Response {
    (
        status,
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::DATE, http_date()),
        ],
        body,
    )
        .into_response()
}

/// Current time in IMF-fixdate form, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`.
fn http_date() -> String {
    chrono::Utc::now()
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}
