//! HTTP API layer for stayhub-rs.
//!
//! This crate provides the REST API and real-time chat streaming:
//!
//! - **Endpoints**: auth, catalog, bookings, reviews, chat, AI, admin
//! - **Extractors**: authenticated-account extraction
//! - **Middleware**: bearer-token authentication, rate limiting
//! - **Streaming**: WebSocket chat fan-out
//!
//! Built on Axum 0.8 with Tower middleware stack.

// Allow dead_code for API compatibility fields in request structs
#![allow(dead_code)]

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod rate_limit;
pub mod response;
pub mod streaming;

pub use endpoints::router;
pub use rate_limit::{ApiRateLimiter, RateLimitConfig, RateLimiterState};
pub use streaming::{ChatStreamState, chat_ws_handler};
