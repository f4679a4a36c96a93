//! Feature table: the step columns handed to the classifier

use polars::prelude::*;

use super::config::{CONCERN_COLUMN, ID_COLUMN, TOTAL_COLUMN};
use super::error::PipelineError;

/// Ordered `(name, values)` columns. Column position is the feature index
/// reported by the ranker.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    columns: Vec<(String, Vec<f64>)>,
}

impl FeatureTable {
    pub fn new(columns: Vec<(String, Vec<f64>)>) -> Self {
        Self { columns }
    }

    /// Extract the named step columns from a transaction table, in the given order.
    ///
    /// The identifier, the aggregate and the label can never be features: the
    /// aggregate is a function of the steps and the label is a function of the
    /// aggregate.
    pub fn from_dataframe(df: &DataFrame, names: &[String]) -> Result<Self, PipelineError> {
        let mut columns = Vec::with_capacity(names.len());

        for name in names {
            if [ID_COLUMN, TOTAL_COLUMN, CONCERN_COLUMN].contains(&name.as_str()) {
                return Err(PipelineError::InvalidColumn {
                    column: name.clone(),
                    reason: "derived columns cannot be used as features".to_string(),
                });
            }
            columns.push((name.clone(), float_values(df, name)?));
        }

        Ok(Self { columns })
    }

    pub fn n_features(&self) -> usize {
        self.columns.len()
    }

    pub fn n_rows(&self) -> usize {
        self.columns.first().map_or(0, |(_, values)| values.len())
    }

    pub fn is_empty(&self) -> bool {
        self.n_features() == 0 || self.n_rows() == 0
    }

    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn name(&self, index: usize) -> &str {
        &self.columns[index].0
    }

    pub fn column(&self, index: usize) -> &[f64] {
        &self.columns[index].1
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.columns
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }
}

/// Read a column as non-null f64 values
pub(crate) fn float_values(df: &DataFrame, name: &str) -> Result<Vec<f64>, PipelineError> {
    let column = df
        .column(name)
        .map_err(|_| PipelineError::MissingColumn(name.to_string()))?;

    if !column.dtype().is_primitive_numeric() {
        return Err(PipelineError::InvalidColumn {
            column: name.to_string(),
            reason: format!("expected a numeric column, found {}", column.dtype()),
        });
    }
    if column.null_count() > 0 {
        return Err(PipelineError::InvalidColumn {
            column: name.to_string(),
            reason: format!("contains {} null value(s)", column.null_count()),
        });
    }

    let float_col = column.cast(&DataType::Float64)?;
    Ok(float_col.f64()?.into_iter().flatten().collect())
}
