//! Metrics collection using Prometheus
//!
//! This module provides metrics collection for the team-mixer service using
//! Prometheus metrics.

use crate::types::TeamAssignment;
use anyhow::Result;
use prometheus::{
    Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, IntGaugeVec, Opts, Registry,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Main metrics collector for the team-mixer service
#[derive(Clone)]
pub struct MetricsCollector {
    /// Prometheus registry
    registry: Arc<Registry>,

    /// Service-level metrics
    service_metrics: ServiceMetrics,

    /// Command-related metrics
    command_metrics: CommandMetrics,

    /// Mix-related metrics
    mix_metrics: MixMetrics,
}

/// Service-level metrics
#[derive(Clone)]
pub struct ServiceMetrics {
    /// Service uptime in seconds
    pub uptime_seconds: IntGauge,

    /// Health check status (0=unhealthy, 1=degraded, 2=healthy)
    pub health_status: IntGauge,

    /// Component health status
    pub component_health: IntGaugeVec,

    /// HTTP requests served, by endpoint and status
    pub http_requests_total: IntCounterVec,
}

/// Command-related metrics
#[derive(Clone)]
pub struct CommandMetrics {
    /// Total commands handled, by command name
    pub commands_total: IntCounterVec,

    /// Commands rejected before mixing, by reason
    pub rejections_total: IntCounterVec,
}

/// Mix-related metrics
#[derive(Clone)]
pub struct MixMetrics {
    /// Total mixes rendered
    pub mixes_total: IntCounter,

    /// Total reshuffles of stored mixes
    pub reshuffles_total: IntCounter,

    /// Roster size distribution
    pub roster_size: Histogram,

    /// Total players sent to the waitlist
    pub waitlisted_total: IntCounter,

    /// Reshuffle sessions currently retained
    pub active_sessions: IntGauge,

    /// Time spent rendering one mix
    pub mix_duration_seconds: Histogram,
}

impl MetricsCollector {
    /// Create a new metrics collector with default registry
    pub fn new() -> Result<Self> {
        let registry = Arc::new(Registry::new());
        Self::with_registry(registry)
    }

    /// Create a new metrics collector with custom registry
    pub fn with_registry(registry: Arc<Registry>) -> Result<Self> {
        let service_metrics = ServiceMetrics::new(&registry)?;
        let command_metrics = CommandMetrics::new(&registry)?;
        let mix_metrics = MixMetrics::new(&registry)?;

        Ok(Self {
            registry,
            service_metrics,
            command_metrics,
            mix_metrics,
        })
    }

    /// Get the Prometheus registry
    pub fn registry(&self) -> Arc<Registry> {
        self.registry.clone()
    }

    /// Get service metrics
    pub fn service(&self) -> &ServiceMetrics {
        &self.service_metrics
    }

    /// Get command metrics
    pub fn command(&self) -> &CommandMetrics {
        &self.command_metrics
    }

    /// Get mix metrics
    pub fn mix(&self) -> &MixMetrics {
        &self.mix_metrics
    }

    /// Record a handled command
    pub fn record_command(&self, command: &str) {
        self.command_metrics
            .commands_total
            .with_label_values(&[command])
            .inc();
    }

    /// Record a command rejected before any mixing happened
    pub fn record_rejection(&self, reason: &str) {
        self.command_metrics
            .rejections_total
            .with_label_values(&[reason])
            .inc();
    }

    /// Record a rendered mix
    pub fn record_mix(&self, assignment: &TeamAssignment, duration: Duration) {
        self.mix_metrics.mixes_total.inc();
        self.mix_metrics
            .roster_size
            .observe(assignment.total_players() as f64);
        self.mix_metrics
            .waitlisted_total
            .inc_by(assignment.waitlist.len() as u64);
        self.mix_metrics
            .mix_duration_seconds
            .observe(duration.as_secs_f64());
    }

    /// Record a reshuffle of a stored mix
    pub fn record_reshuffle(&self) {
        self.mix_metrics.reshuffles_total.inc();
    }

    /// Update the retained-session gauge
    pub fn set_active_sessions(&self, count: usize) {
        self.mix_metrics.active_sessions.set(count as i64);
    }

    /// Record an HTTP request
    pub fn record_http_request(&self, endpoint: &str, status: u16) {
        self.service_metrics
            .http_requests_total
            .with_label_values(&[endpoint, &status.to_string()])
            .inc();
    }

    /// Update health status
    pub fn update_health_status(&self, status: u8) {
        self.service_metrics.health_status.set(status as i64);
    }

    /// Update component health
    pub fn update_component_health(&self, component: &str, healthy: bool) {
        let status = if healthy { 1 } else { 0 };
        self.service_metrics
            .component_health
            .with_label_values(&[component])
            .set(status);
    }

    /// Create a timer for measuring operation duration
    pub fn start_timer(&self) -> MetricsTimer {
        MetricsTimer::new()
    }
}

/// Timer for measuring operation durations
pub struct MetricsTimer {
    start: Instant,
}

impl MetricsTimer {
    fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get the elapsed duration
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Stop the timer and return the duration
    pub fn stop(self) -> Duration {
        self.elapsed()
    }
}

impl ServiceMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let uptime_seconds =
            IntGauge::new("team_mixer_uptime_seconds", "Service uptime in seconds")?;
        registry.register(Box::new(uptime_seconds.clone()))?;

        let health_status = IntGauge::new(
            "team_mixer_health_status",
            "Health status (0=unhealthy, 1=degraded, 2=healthy)",
        )?;
        registry.register(Box::new(health_status.clone()))?;

        let component_health = IntGaugeVec::new(
            Opts::new("team_mixer_component_health", "Component health status"),
            &["component"],
        )?;
        registry.register(Box::new(component_health.clone()))?;

        let http_requests_total = IntCounterVec::new(
            Opts::new("team_mixer_http_requests_total", "Total HTTP requests"),
            &["endpoint", "status"],
        )?;
        registry.register(Box::new(http_requests_total.clone()))?;

        Ok(Self {
            uptime_seconds,
            health_status,
            component_health,
            http_requests_total,
        })
    }
}

impl CommandMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let commands_total = IntCounterVec::new(
            Opts::new("team_mixer_commands_total", "Total commands handled"),
            &["command"],
        )?;
        registry.register(Box::new(commands_total.clone()))?;

        let rejections_total = IntCounterVec::new(
            Opts::new(
                "team_mixer_rejections_total",
                "Commands rejected before mixing",
            ),
            &["reason"],
        )?;
        registry.register(Box::new(rejections_total.clone()))?;

        Ok(Self {
            commands_total,
            rejections_total,
        })
    }
}

impl MixMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let mixes_total = IntCounter::new("team_mixer_mixes_total", "Total mixes rendered")?;
        registry.register(Box::new(mixes_total.clone()))?;

        let reshuffles_total = IntCounter::new(
            "team_mixer_reshuffles_total",
            "Total reshuffles of stored mixes",
        )?;
        registry.register(Box::new(reshuffles_total.clone()))?;

        let roster_size = Histogram::with_opts(
            HistogramOpts::new("team_mixer_roster_size", "Roster size distribution")
                .buckets(vec![2.0, 4.0, 6.0, 8.0, 10.0, 12.0, 16.0, 24.0]),
        )?;
        registry.register(Box::new(roster_size.clone()))?;

        let waitlisted_total = IntCounter::new(
            "team_mixer_waitlisted_total",
            "Total players sent to the waitlist",
        )?;
        registry.register(Box::new(waitlisted_total.clone()))?;

        let active_sessions = IntGauge::new(
            "team_mixer_active_sessions",
            "Reshuffle sessions currently retained",
        )?;
        registry.register(Box::new(active_sessions.clone()))?;

        let mix_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "team_mixer_mix_duration_seconds",
                "Time spent rendering one mix",
            )
            .buckets(vec![0.0001, 0.001, 0.005, 0.01, 0.05, 0.1]),
        )?;
        registry.register(Box::new(mix_duration_seconds.clone()))?;

        Ok(Self {
            mixes_total,
            reshuffles_total,
            roster_size,
            waitlisted_total,
            active_sessions,
            mix_duration_seconds,
        })
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new().expect("Failed to create default metrics collector")
    }
}
