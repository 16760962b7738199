//! API Module
//!
//! HTTP handlers and routing for the content server.
//!
//! # Endpoints
//! - `GET /d20` - Random roll between 1 and 20
//! - `GET /stats` - Cache statistics
//! - `GET /<path>` - Serve a file through the cache
//! - `POST /<path>` - Overwrite a file and mark its cached copy dirty

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
