//! Pipeline module - generation, labelling and ranking stages

pub mod config;
pub mod error;
pub mod features;
pub mod generator;
pub mod labels;
pub mod ranker;
pub mod run;

pub use config::*;
pub use error::PipelineError;
pub use features::FeatureTable;
pub use generator::*;
pub use labels::*;
pub use ranker::*;
pub use run::*;
