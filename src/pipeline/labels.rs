//! Aggregate computation and SLA concern labelling
//!
//! `total_time` is the sum of a record's step fields. A record is of concern
//! when its total strictly exceeds the SLA threshold; a total exactly at the
//! threshold is not a breach.

use polars::prelude::*;
use serde::Serialize;

use super::config::{CONCERN_COLUMN, TOTAL_COLUMN};
use super::error::PipelineError;
use super::features::float_values;

/// Binary label for one total: 1 when `total > threshold`, else 0
#[inline]
pub fn concern_label(total: f64, threshold: f64) -> i32 {
    if total > threshold {
        1
    } else {
        0
    }
}

/// Append `total_time`, the sum of `step_names` per record (summed in the given order).
///
/// Fails if the aggregate already exists: it is computed exactly once.
pub fn add_total_time(mut df: DataFrame, step_names: &[String]) -> Result<DataFrame, PipelineError> {
    if df.column(TOTAL_COLUMN).is_ok() {
        return Err(PipelineError::InvalidColumn {
            column: TOTAL_COLUMN.to_string(),
            reason: "aggregate has already been computed".to_string(),
        });
    }
    if step_names.is_empty() {
        return Err(PipelineError::EmptyFeatureTable);
    }

    let mut totals = vec![0.0f64; df.height()];
    for name in step_names {
        let values = float_values(&df, name)?;
        for (total, value) in totals.iter_mut().zip(values) {
            *total += value;
        }
    }

    df.with_column(Column::new(TOTAL_COLUMN.into(), totals))?;
    Ok(df)
}

/// Append the `concern` label derived from `total_time`.
///
/// Must run after [`add_total_time`]; a table without the aggregate is rejected.
pub fn assign_concern(mut df: DataFrame, threshold: f64) -> Result<DataFrame, PipelineError> {
    let totals = float_values(&df, TOTAL_COLUMN)?;
    let labels: Vec<i32> = totals
        .iter()
        .map(|&total| concern_label(total, threshold))
        .collect();

    df.with_column(Column::new(CONCERN_COLUMN.into(), labels))?;
    Ok(df)
}

/// Read the `concern` column as a 0/1 label vector
pub fn concern_labels(df: &DataFrame) -> Result<Vec<i32>, PipelineError> {
    let column = df
        .column(CONCERN_COLUMN)
        .map_err(|_| PipelineError::MissingColumn(CONCERN_COLUMN.to_string()))?;

    let cast = column.cast(&DataType::Int32)?;
    let labels: Vec<i32> = cast.i32()?.into_iter().flatten().collect();

    if labels.len() != df.height() {
        return Err(PipelineError::InvalidColumn {
            column: CONCERN_COLUMN.to_string(),
            reason: "contains null values".to_string(),
        });
    }
    Ok(labels)
}

/// Class balance of a labelled table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LabelStats {
    pub total: usize,
    /// Records with concern = 1
    pub concern: usize,
    /// Records with concern = 0
    pub clear: usize,
}

impl LabelStats {
    pub fn from_labels(labels: &[i32]) -> Self {
        let concern = labels.iter().filter(|&&l| l == 1).count();
        Self {
            total: labels.len(),
            concern,
            clear: labels.len() - concern,
        }
    }

    /// Share of records of concern, 0.0 for an empty table
    pub fn concern_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.concern as f64 / self.total as f64
        }
    }

    /// The single class present, if the labels are all the same
    pub fn single_class(&self) -> Option<i32> {
        match (self.concern, self.clear) {
            (0, n) if n > 0 => Some(0),
            (n, 0) if n > 0 => Some(1),
            _ => None,
        }
    }
}

/// Count concern / clear records in a labelled table
pub fn label_stats(df: &DataFrame) -> Result<LabelStats, PipelineError> {
    Ok(LabelStats::from_labels(&concern_labels(df)?))
}
