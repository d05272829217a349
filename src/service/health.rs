//! Health check endpoints and monitoring
//!
//! This module provides health check functionality for the team-mixer
//! service, including readiness and liveness probes.

use crate::service::http::HttpServerState;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Health check status
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthStatus::Healthy => write!(f, "✅ healthy"),
            HealthStatus::Degraded => write!(f, "⚠️  degraded"),
            HealthStatus::Unhealthy => write!(f, "❌ unhealthy"),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheck {
    /// Overall service status
    pub status: HealthStatus,
    /// Service name
    pub service: String,
    /// Service version
    pub version: String,
    /// Current timestamp
    pub timestamp: DateTime<Utc>,
    /// Detailed component checks
    pub checks: Vec<ComponentCheck>,
    /// Service statistics
    pub stats: ServiceStats,
}

/// Individual component health check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentCheck {
    /// Component name
    pub name: String,
    /// Component status
    pub status: HealthStatus,
    /// Optional error message if unhealthy
    pub message: Option<String>,
    /// Check duration in milliseconds
    pub duration_ms: u64,
}

/// Service statistics for health reporting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceStats {
    /// Number of mix sessions currently stored
    pub active_sessions: usize,
    /// Total mixes created since service start
    pub mixes_created: u64,
    /// Total reshuffles served since service start
    pub reshuffles: u64,
    /// Total commands handled since service start
    pub commands_handled: u64,
    /// Total mix requests rejected since service start
    pub rejected: u64,
    /// Service uptime information
    pub uptime_info: String,
}

impl HealthCheck {
    /// Perform a comprehensive health check of the service
    pub async fn check(state: &HttpServerState) -> Result<Self> {
        let mut checks = Vec::new();
        let mut overall_status = HealthStatus::Healthy;

        // Check if service is running
        let service_check = Self::check_service_running(state).await;
        if service_check.status != HealthStatus::Healthy {
            overall_status = HealthStatus::Unhealthy;
        }
        checks.push(service_check);

        // Check session store
        let session_check = Self::check_session_store(state);
        if session_check.status == HealthStatus::Unhealthy {
            overall_status = HealthStatus::Unhealthy;
        } else if session_check.status == HealthStatus::Degraded
            && overall_status == HealthStatus::Healthy
        {
            overall_status = HealthStatus::Degraded;
        }
        checks.push(session_check);

        // Check command handler counters
        let handler_check = Self::check_command_handler(state);
        if handler_check.status == HealthStatus::Unhealthy {
            overall_status = HealthStatus::Unhealthy;
        } else if handler_check.status == HealthStatus::Degraded
            && overall_status == HealthStatus::Healthy
        {
            overall_status = HealthStatus::Degraded;
        }
        checks.push(handler_check);

        // Gather service statistics
        let stats = Self::gather_service_stats(state);

        Ok(HealthCheck {
            status: overall_status,
            service: state.service_name.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now(),
            checks,
            stats,
        })
    }

    /// Simple liveness check, just verify service is running
    pub async fn liveness_check(state: &HttpServerState) -> HealthStatus {
        if *state.is_running.read().await {
            HealthStatus::Healthy
        } else {
            HealthStatus::Unhealthy
        }
    }

    /// Readiness check, verify service can handle mix requests
    pub async fn readiness_check(state: &HttpServerState) -> HealthStatus {
        // Service must be running
        if !*state.is_running.read().await {
            return HealthStatus::Unhealthy;
        }

        // Session store must be accessible
        Self::check_session_store(state).status
    }

    /// Check if service is running
    async fn check_service_running(state: &HttpServerState) -> ComponentCheck {
        let start = std::time::Instant::now();

        let (status, message) = if *state.is_running.read().await {
            (HealthStatus::Healthy, None)
        } else {
            (
                HealthStatus::Unhealthy,
                Some("Service is not running".to_string()),
            )
        };

        ComponentCheck {
            name: "service_running".to_string(),
            status,
            message,
            duration_ms: start.elapsed().as_millis() as u64,
        }
    }

    /// Check session store health
    fn check_session_store(state: &HttpServerState) -> ComponentCheck {
        let start = std::time::Instant::now();

        let (status, message) = match state.command_handler.sessions().len() {
            Ok(_count) => (HealthStatus::Healthy, None),
            Err(e) => (
                HealthStatus::Unhealthy,
                Some(format!("Cannot access session store: {}", e)),
            ),
        };

        ComponentCheck {
            name: "session_store".to_string(),
            status,
            message,
            duration_ms: start.elapsed().as_millis() as u64,
        }
    }

    /// Check command handler counters
    fn check_command_handler(state: &HttpServerState) -> ComponentCheck {
        let start = std::time::Instant::now();

        let (status, message) = match state.command_handler.stats() {
            Ok(_stats) => (HealthStatus::Healthy, None),
            Err(e) => (
                HealthStatus::Degraded,
                Some(format!("Stats check failed: {}", e)),
            ),
        };

        ComponentCheck {
            name: "command_handler".to_string(),
            status,
            message,
            duration_ms: start.elapsed().as_millis() as u64,
        }
    }

    /// Gather current service statistics
    fn gather_service_stats(state: &HttpServerState) -> ServiceStats {
        let default_stats = ServiceStats {
            active_sessions: 0,
            mixes_created: 0,
            reshuffles: 0,
            commands_handled: 0,
            rejected: 0,
            uptime_info: "Service running".to_string(),
        };

        let active_sessions = match state.command_handler.sessions().len() {
            Ok(count) => count,
            Err(e) => {
                debug!("Failed to count sessions for health check: {}", e);
                return default_stats;
            }
        };

        match state.command_handler.stats() {
            Ok(stats) => ServiceStats {
                active_sessions,
                mixes_created: stats.mixes_created,
                reshuffles: stats.reshuffles,
                commands_handled: stats.commands_handled,
                rejected: stats.rejected,
                uptime_info: format_uptime(state.started_at),
            },
            Err(e) => {
                debug!("Failed to get handler stats for health check: {}", e);
                default_stats
            }
        }
    }
}

/// Render uptime since `started_at` as a compact human string
fn format_uptime(started_at: DateTime<Utc>) -> String {
    let seconds = Utc::now()
        .signed_duration_since(started_at)
        .num_seconds()
        .max(0);
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    format!("up {}h {}m {}s", hours, minutes, seconds % 60)
}
