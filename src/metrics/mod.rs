//! Metrics and monitoring for the team-mixer service
//!
//! This module provides metrics collection and performance tracking for the
//! mixing service. The HTTP endpoints that expose them live in
//! [`crate::service::http`].

pub mod collector;

pub use collector::{
    CommandMetrics, MetricsCollector, MetricsTimer, MixMetrics, ServiceMetrics,
};
