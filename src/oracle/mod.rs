//! Classification oracle: the capability the importance ranker depends on.
//!
//! The ranker never looks inside a model. It fits a [`Classifier`] on a
//! [`FeatureTable`] and reads normalized importances plus the per-estimator
//! importances it needs for a spread estimate.

pub mod forest;

pub use forest::{ForestParams, MaxFeatures, RandomForest, RandomForestModel};

use thiserror::Error;

use crate::pipeline::FeatureTable;

/// Errors raised while fitting a classifier on malformed input.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum OracleError {
    #[error("Classifier input is empty")]
    EmptyInput,

    #[error("Length mismatch: {what} has {actual} entries, expected {expected}")]
    LengthMismatch {
        what: String,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid label {value} at row {row}: labels must be 0 or 1")]
    InvalidLabel { row: usize, value: i32 },

    #[error("Non-finite value in column '{column}' at row {row}")]
    NonFiniteValue { column: String, row: usize },

    #[error("Invalid classifier parameters: {0}")]
    InvalidParams(String),

    #[error("Tree fitting failed: {0}")]
    Fit(String),
}

/// A supervised binary classifier that can be fitted on a feature table.
pub trait Classifier {
    type Model: FittedModel;

    /// Fit on `features` (one column per feature) against 0/1 `labels`.
    fn fit(&self, features: &FeatureTable, labels: &[i32]) -> Result<Self::Model, OracleError>;
}

/// A fitted ensemble model exposing impurity-based importances.
pub trait FittedModel {
    /// One score per feature column, in column order, summing to 1.0.
    /// All zeros when the model carries no signal.
    fn feature_importances(&self) -> Vec<f64>;

    /// Importances of each individual estimator, in estimator order.
    fn per_estimator_importances(&self) -> &[Vec<f64>];
}

/// Check that a feature table and label vector are well-formed for binary fitting.
pub(crate) fn validate_inputs(features: &FeatureTable, labels: &[i32]) -> Result<(), OracleError> {
    let n_rows = features.n_rows();
    if features.n_features() == 0 || n_rows == 0 {
        return Err(OracleError::EmptyInput);
    }

    for (name, values) in features.columns() {
        if values.len() != n_rows {
            return Err(OracleError::LengthMismatch {
                what: format!("column '{}'", name),
                expected: n_rows,
                actual: values.len(),
            });
        }
        if let Some(row) = values.iter().position(|v| !v.is_finite()) {
            return Err(OracleError::NonFiniteValue {
                column: name.to_string(),
                row,
            });
        }
    }

    if labels.len() != n_rows {
        return Err(OracleError::LengthMismatch {
            what: "label vector".to_string(),
            expected: n_rows,
            actual: labels.len(),
        });
    }

    if let Some((row, &value)) = labels
        .iter()
        .enumerate()
        .find(|(_, &v)| v != 0 && v != 1)
    {
        return Err(OracleError::InvalidLabel { row, value });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> FeatureTable {
        FeatureTable::new(vec![
            ("a".to_string(), vec![0.1, 0.2, 0.3]),
            ("b".to_string(), vec![1.0, 2.0, 3.0]),
        ])
    }

    #[test]
    fn test_validate_ok() {
        assert!(validate_inputs(&table(), &[0, 1, 0]).is_ok());
    }

    #[test]
    fn test_validate_label_length() {
        let err = validate_inputs(&table(), &[0, 1]).unwrap_err();
        assert!(matches!(err, OracleError::LengthMismatch { expected: 3, actual: 2, .. }));
    }

    #[test]
    fn test_validate_label_values() {
        let err = validate_inputs(&table(), &[0, 2, 1]).unwrap_err();
        assert_eq!(err, OracleError::InvalidLabel { row: 1, value: 2 });
    }

    #[test]
    fn test_validate_non_finite() {
        let table = FeatureTable::new(vec![("a".to_string(), vec![0.1, f64::NAN])]);
        let err = validate_inputs(&table, &[0, 1]).unwrap_err();
        assert!(err.to_string().contains("column 'a' at row 1"));
    }

    #[test]
    fn test_validate_ragged_columns() {
        let table = FeatureTable::new(vec![
            ("a".to_string(), vec![0.1, 0.2]),
            ("b".to_string(), vec![0.1]),
        ]);
        assert!(matches!(
            validate_inputs(&table, &[0, 1]),
            Err(OracleError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn test_validate_empty() {
        let table = FeatureTable::new(Vec::new());
        assert_eq!(validate_inputs(&table, &[]), Err(OracleError::EmptyInput));
    }
}
