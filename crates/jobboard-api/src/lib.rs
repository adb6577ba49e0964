//! HTTP API for the job board.
//!
//! This crate provides:
//! - Job and application endpoints over the document store
//! - Cookie-based session tokens for owner-scoped reads
//! - Security headers, request ids and request logging
//! - Prometheus metrics

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use services::ApplicationService;
pub use state::AppState;
