//! Main application state and service coordination
//!
//! This module contains the production AppState that wires the command
//! handler, session storage, metrics and the HTTP server together and
//! owns the background maintenance tasks.

use crate::command::{CommandHandler, SessionStore};
use crate::config::AppConfig;
use crate::metrics::MetricsCollector;
use crate::service::http::{HttpServer, HttpServerConfig, HttpServerState};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tracing::{debug, error, info, warn};

/// Service-level errors
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Service initialization error: {message}")]
    Initialization { message: String },

    #[error("Background task error: {message}")]
    BackgroundTask { message: String },
}

/// Main application state containing all service components
pub struct AppState {
    /// Application configuration
    config: AppConfig,

    /// Stored mix sessions, shared with the command handler
    session_store: Arc<SessionStore>,

    /// Command processor shared with the HTTP layer
    command_handler: Arc<CommandHandler>,

    /// Metrics collector for monitoring
    metrics_collector: Arc<MetricsCollector>,

    /// HTTP server for the mix API and health endpoints
    http_server: Arc<HttpServer>,

    /// Background task handles
    background_tasks: Vec<JoinHandle<()>>,

    /// Service status
    is_running: Arc<RwLock<bool>>,
}

impl AppState {
    /// Initialize the application with all dependencies
    pub fn new(config: AppConfig) -> Result<Self, ServiceError> {
        info!("Initializing team-mixer service");
        info!(
            "Configuration: service={}, team_size={}, http_port={}",
            config.service.name, config.mix.team_size, config.service.http_port
        );

        crate::config::validate_config(&config).map_err(|e| ServiceError::Configuration {
            message: e.to_string(),
        })?;

        let metrics_collector =
            Arc::new(
                MetricsCollector::new().map_err(|e| ServiceError::Initialization {
                    message: format!("Failed to create metrics collector: {}", e),
                })?,
            );

        let session_store = Arc::new(SessionStore::new(&config.mix));
        let command_handler = Arc::new(CommandHandler::new(
            config.mix.clone(),
            session_store.clone(),
            metrics_collector.clone(),
        ));

        let is_running = Arc::new(RwLock::new(false));

        let http_config = HttpServerConfig {
            port: config.service.http_port,
            host: "0.0.0.0".to_string(),
        };
        let http_state = HttpServerState::new(
            command_handler.clone(),
            metrics_collector.clone(),
            is_running.clone(),
            config.service.name.clone(),
        );
        let http_server = Arc::new(HttpServer::new(http_config, http_state));

        Ok(Self {
            config,
            session_store,
            command_handler,
            metrics_collector,
            http_server,
            background_tasks: Vec::new(),
            is_running,
        })
    }

    /// Start the HTTP server and background services
    pub async fn start(&mut self) -> Result<(), ServiceError> {
        info!("Starting team-mixer service");

        // Mark as running so health checks report ready
        *self.is_running.write().await = true;

        // Start HTTP server first
        self.start_http_server().await?;

        // Start background tasks
        self.start_background_tasks().await?;

        self.metrics_collector.update_health_status(2); // 2 = healthy

        info!("✅ Team-mixer service started successfully");
        Ok(())
    }

    /// Perform graceful shutdown
    pub async fn shutdown(&mut self) -> Result<(), ServiceError> {
        info!("Starting graceful shutdown of team-mixer service");

        // Mark as not running
        *self.is_running.write().await = false;
        self.metrics_collector.update_health_status(0); // 0 = unhealthy

        // Ask the HTTP server to drain in-flight requests
        if let Err(e) = self.http_server.stop().await {
            warn!("Failed to stop HTTP server: {}", e);
        } else {
            info!("✅ HTTP server stopped");
        }

        // Stop background tasks (including the HTTP server task)
        self.stop_background_tasks().await;

        // Get final statistics
        let final_stats = self
            .command_handler
            .stats()
            .map_err(|e| ServiceError::BackgroundTask {
                message: format!("Failed to get final stats: {}", e),
            })?;

        info!("Final service statistics: {:?}", final_stats);
        info!("✅ Team-mixer service shutdown completed");

        Ok(())
    }

    /// Get service configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Check if service is running
    pub async fn is_running(&self) -> bool {
        *self.is_running.read().await
    }

    /// Get the command handler for direct message processing
    pub fn command_handler(&self) -> Arc<CommandHandler> {
        self.command_handler.clone()
    }

    /// Get the session store for operations
    pub fn session_store(&self) -> Arc<SessionStore> {
        self.session_store.clone()
    }

    /// Get the metrics collector
    pub fn metrics_collector(&self) -> Arc<MetricsCollector> {
        self.metrics_collector.clone()
    }

    /// Spawn the HTTP server as a background task
    async fn start_http_server(&mut self) -> Result<(), ServiceError> {
        info!(
            "Starting HTTP server on port {}",
            self.config.service.http_port
        );

        let http_server = self.http_server.clone();
        let http_task = tokio::spawn(async move {
            if let Err(e) = http_server.start().await {
                error!("HTTP server failed: {}", e);
            } else {
                info!("HTTP server task completed");
            }
        });

        // Add the handle to background tasks for proper shutdown
        self.background_tasks.push(http_task);

        // Give the server a moment to start up
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;

        info!(
            "✅ HTTP server started on port {}",
            self.config.service.http_port
        );
        Ok(())
    }

    /// Start background maintenance tasks
    async fn start_background_tasks(&mut self) -> Result<(), ServiceError> {
        info!("Starting background maintenance tasks...");

        // Session pruning task
        info!(
            "Starting session pruning task ({}s interval)...",
            self.config.mix.prune_interval().as_secs()
        );
        let prune_task = {
            let session_store = self.session_store.clone();
            let metrics_collector = self.metrics_collector.clone();
            let prune_interval = self.config.mix.prune_interval();
            let is_running = self.is_running.clone();

            tokio::spawn(async move {
                let mut interval = tokio::time::interval(prune_interval);
                info!("Session pruning task started");

                while *is_running.read().await {
                    interval.tick().await;

                    match session_store.prune_expired() {
                        Ok(pruned) => {
                            if pruned > 0 {
                                info!("Pruned {} expired mix sessions", pruned);
                                match session_store.len() {
                                    Ok(active) => metrics_collector.set_active_sessions(active),
                                    Err(e) => {
                                        warn!("Failed to count sessions after pruning: {}", e)
                                    }
                                }
                            } else {
                                debug!("Prune check completed - no expired sessions found");
                            }
                        }
                        Err(e) => {
                            warn!("Session pruning failed: {}", e);
                        }
                    }
                }

                info!("Session pruning task stopped");
            })
        };

        // Service health metrics task
        info!("Starting health metrics task (60s interval)...");
        let health_metrics_task = {
            let metrics_collector = self.metrics_collector.clone();
            let is_running = self.is_running.clone();

            tokio::spawn(async move {
                let mut interval = tokio::time::interval(Duration::from_secs(60));
                let start_time = tokio::time::Instant::now();
                info!("Health metrics task started");

                while *is_running.read().await {
                    interval.tick().await;

                    // Update service uptime
                    let uptime_seconds = start_time.elapsed().as_secs() as i64;
                    metrics_collector
                        .service()
                        .uptime_seconds
                        .set(uptime_seconds);

                    debug!(
                        "Updated service health metrics - uptime: {}s",
                        uptime_seconds
                    );

                    metrics_collector.update_health_status(2); // 2 = healthy
                    metrics_collector.update_component_health("http_server", true);
                    metrics_collector.update_component_health("session_store", true);
                    metrics_collector.update_component_health("metrics", true);
                }

                info!("Health metrics task stopped");
            })
        };

        self.background_tasks.push(prune_task);
        self.background_tasks.push(health_metrics_task);

        info!("2 background maintenance tasks started successfully");
        Ok(())
    }

    /// Stop all background tasks
    async fn stop_background_tasks(&mut self) {
        let task_count = self.background_tasks.len();
        if task_count == 0 {
            info!("No background tasks to stop");
            return;
        }

        info!("Stopping {} background tasks...", task_count);

        // Cancel all background tasks
        for (i, task) in self.background_tasks.drain(..).enumerate() {
            debug!("Aborting background task {}/{}", i + 1, task_count);
            task.abort();
        }

        // Give tasks time to clean up gracefully
        info!("Waiting for background tasks to complete shutdown...");
        tokio::time::sleep(std::time::Duration::from_millis(500)).await;

        info!("✅ All {} background tasks stopped", task_count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandContext;

    #[tokio::test]
    async fn test_app_state_initializes_stopped() {
        let app = AppState::new(AppConfig::default()).expect("init failed");

        assert!(!app.is_running().await);
        assert_eq!(app.config().service.name, "team-mixer");
        assert!(app
            .session_store()
            .is_empty()
            .expect("session store inaccessible"));
    }

    #[tokio::test]
    async fn test_components_are_shared() {
        let app = AppState::new(AppConfig::default()).expect("init failed");

        app.command_handler()
            .handle("!mix ana, bob", &CommandContext::default())
            .expect("mix failed");

        // The handler writes into the same store the app state owns
        assert_eq!(app.session_store().len().expect("len failed"), 1);
    }

    #[tokio::test]
    async fn test_shutdown_without_start_is_clean() {
        let mut app = AppState::new(AppConfig::default()).expect("init failed");

        app.shutdown().await.expect("shutdown failed");
        assert!(!app.is_running().await);
    }
}
