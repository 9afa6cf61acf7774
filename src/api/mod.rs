//! API Module
//!
//! HTTP handlers and routing for the cache API.
//!
//! # Endpoints
//! - `GET|PUT|DELETE /api/cache/:key` - Cached JSON documents
//! - `GET /stats` - Helper statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
