//! Error types for the SLA importance pipeline.
//!
//! `PipelineError` separates the three outcomes callers need to tell apart:
//! invalid configuration (rejected before any data is generated), degenerate
//! inputs (the ranking would be meaningless), and failures propagated from the
//! classification oracle.

use polars::prelude::PolarsError;
use thiserror::Error;

use crate::oracle::OracleError;

/// Errors raised by the generate → label → rank pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Configuration rejected up front.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The feature table has no columns or no rows.
    #[error("Feature table is empty - nothing to rank")]
    EmptyFeatureTable,

    /// Every record carries the same label, so no feature can separate the classes.
    #[error("Degenerate labels: all {count} record(s) have concern={class}")]
    DegenerateLabels {
        /// The single class present
        class: i32,
        /// Number of records
        count: usize,
    },

    /// The oracle returned importances that carry no signal: non-finite,
    /// negative, or summing to (near) zero. A uniform spread is not flagged,
    /// since fields that are equally informative legitimately score alike.
    #[error("Degenerate importances: the classifier found no informative split")]
    DegenerateImportances,

    /// A column the stage depends on is not present.
    #[error("Column '{0}' not found")]
    MissingColumn(String),

    /// A column exists but cannot be used.
    #[error("Column '{column}' is not usable: {reason}")]
    InvalidColumn {
        /// Column name
        column: String,
        /// Why the column was rejected
        reason: String,
    },

    /// Failure raised by the classification oracle, propagated unchanged.
    #[error(transparent)]
    Oracle(#[from] OracleError),

    /// Failure raised by polars while building or reading the table.
    #[error(transparent)]
    Polars(#[from] PolarsError),
}

impl PipelineError {
    /// True for outcomes where the run completed but the ranking would be meaningless.
    pub fn is_degenerate(&self) -> bool {
        matches!(
            self,
            PipelineError::DegenerateLabels { .. } | PipelineError::DegenerateImportances
        )
    }

    /// True for configuration errors.
    pub fn is_config(&self) -> bool {
        matches!(self, PipelineError::InvalidConfig(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_labels_display() {
        let err = PipelineError::DegenerateLabels {
            class: 0,
            count: 25,
        };
        assert_eq!(
            err.to_string(),
            "Degenerate labels: all 25 record(s) have concern=0"
        );
        assert!(err.is_degenerate());
        assert!(!err.is_config());
    }

    #[test]
    fn test_invalid_config_display() {
        let err = PipelineError::InvalidConfig("transactions must be at least 2".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid configuration: transactions must be at least 2"
        );
        assert!(err.is_config());
        assert!(!err.is_degenerate());
    }

    #[test]
    fn test_oracle_error_is_transparent() {
        let err: PipelineError = OracleError::EmptyInput.into();
        assert_eq!(err.to_string(), OracleError::EmptyInput.to_string());
        assert!(!err.is_degenerate());
    }

    #[test]
    fn test_missing_column_display() {
        let err = PipelineError::MissingColumn("total_time".to_string());
        assert_eq!(err.to_string(), "Column 'total_time' not found");
    }
}
