//! API Module
//!
//! HTTP handlers and routing for the cache gateway REST API.
//!
//! # Endpoints
//! - `GET /cache/:key` - Retrieve a value
//! - `PUT /cache/:key` - Store a value
//! - `POST /cache/:key/add` - Store a value only if absent
//! - `GET /cache/:key/exists` - Check for a live entry
//! - `DELETE /cache/:key` - Delete a key
//! - `DELETE /cache` - Clear the cache
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
