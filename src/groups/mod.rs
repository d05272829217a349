//! Anti-stacking group extraction from bracketed spans

pub mod extract;

pub use extract::extract_groups;
