//! Service layer for the team-mixer service
//!
//! This module contains the main application state, the HTTP API server,
//! health checks and background task management for the production service.

pub mod app;
pub mod health;
pub mod http;

pub use app::{AppState, ServiceError};
pub use health::{HealthCheck, HealthStatus};
pub use http::{HttpServer, HttpServerConfig, HttpServerState, MixRequest, MixResponse};
