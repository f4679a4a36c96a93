//! Feature importance ranking
//!
//! Fits the classification oracle on the step columns and orders the columns
//! by descending importance. Ties keep the original column order.

use serde::Serialize;
use std::cmp::Ordering;

use super::error::PipelineError;
use super::features::FeatureTable;
use super::labels::LabelStats;
use crate::oracle::{Classifier, FittedModel, OracleError};

/// Importances summing to less than this carry no signal
const MIN_TOTAL_IMPORTANCE: f64 = 1e-12;

/// One feature's position in the ranking
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedFeature {
    /// 1-based rank
    pub rank: usize,
    /// Column position in the feature table
    pub index: usize,
    pub name: String,
    /// Normalized importance in [0, 1]
    pub importance: f64,
    /// Population standard deviation of the per-estimator importances
    pub std: f64,
}

/// Features ordered by descending importance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportanceRanking {
    pub features: Vec<RankedFeature>,
}

impl ImportanceRanking {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn top(&self) -> Option<&RankedFeature> {
        self.features.first()
    }

    /// Feature names in rank order
    pub fn names(&self) -> Vec<&str> {
        self.features.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn importance_of(&self, name: &str) -> Option<f64> {
        self.features
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.importance)
    }

    /// Summed importance of the named features; unknown names contribute nothing
    pub fn share_of<S: AsRef<str>>(&self, names: &[S]) -> f64 {
        names
            .iter()
            .filter_map(|name| self.importance_of(name.as_ref()))
            .sum()
    }

    pub fn total_importance(&self) -> f64 {
        self.features.iter().map(|f| f.importance).sum()
    }
}

/// Indices of `importances` sorted by descending value, ties by ascending index
pub fn rank_order(importances: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..importances.len()).collect();
    order.sort_by(|&a, &b| {
        importances[b]
            .partial_cmp(&importances[a])
            .unwrap_or(Ordering::Equal)
            .then(a.cmp(&b))
    });
    order
}

/// Population standard deviation of feature `index` across estimators
pub fn importance_std(per_estimator: &[Vec<f64>], index: usize) -> f64 {
    let values: Vec<f64> = per_estimator
        .iter()
        .filter_map(|imp| imp.get(index).copied())
        .collect();
    if values.is_empty() {
        return 0.0;
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

/// Fit `classifier` on `table` and rank its columns.
///
/// Errors:
/// - `EmptyFeatureTable` when there is nothing to rank
/// - `DegenerateLabels` when every label is the same class (checked before fitting)
/// - `DegenerateImportances` when the fitted model carries no signal
/// - `Oracle` for malformed input, propagated from the classifier
pub fn rank_features<C: Classifier>(
    classifier: &C,
    table: &FeatureTable,
    labels: &[i32],
) -> Result<ImportanceRanking, PipelineError> {
    if table.is_empty() {
        return Err(PipelineError::EmptyFeatureTable);
    }
    if labels.len() != table.n_rows() {
        return Err(OracleError::LengthMismatch {
            what: "label vector".to_string(),
            expected: table.n_rows(),
            actual: labels.len(),
        }
        .into());
    }

    // Labels outside {0, 1} are left for the oracle to reject
    let binary = labels.iter().all(|&l| l == 0 || l == 1);
    if let Some(class) = LabelStats::from_labels(labels).single_class().filter(|_| binary) {
        return Err(PipelineError::DegenerateLabels {
            class,
            count: labels.len(),
        });
    }

    let model = classifier.fit(table, labels)?;
    let importances = model.feature_importances();

    if importances.len() != table.n_features() {
        return Err(OracleError::LengthMismatch {
            what: "importance vector".to_string(),
            expected: table.n_features(),
            actual: importances.len(),
        }
        .into());
    }

    let total: f64 = importances.iter().sum();
    if !total.is_finite() || total < MIN_TOTAL_IMPORTANCE || importances.iter().any(|v| *v < 0.0)
    {
        return Err(PipelineError::DegenerateImportances);
    }

    let per_estimator = model.per_estimator_importances();
    let features = rank_order(&importances)
        .into_iter()
        .enumerate()
        .map(|(position, index)| RankedFeature {
            rank: position + 1,
            index,
            name: table.name(index).to_string(),
            importance: importances[index],
            std: importance_std(per_estimator, index),
        })
        .collect();

    Ok(ImportanceRanking { features })
}
