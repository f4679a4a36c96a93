//! SLA Lens: Feature Importance for SLA Breaches
//!
//! A library for generating synthetic transaction timings, labelling them
//! against an SLA threshold and ranking the timing fields by how strongly
//! they predict a breach.

pub mod cli;
pub mod oracle;
pub mod pipeline;
pub mod report;
pub mod utils;
