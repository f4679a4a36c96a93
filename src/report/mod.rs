//! Report module - ranking output, charts and exports

pub mod chart;
pub mod export;
pub mod ranking;
pub mod summary;

pub use chart::*;
pub use export::*;
pub use ranking::*;
pub use summary::*;
