//! Two-team balancing with anti-stacking dispersion

pub mod balancer;

pub use balancer::balance;
