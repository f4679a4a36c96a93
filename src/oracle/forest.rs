//! Bagged forest of linfa decision trees
//!
//! Each tree is a `linfa_trees::DecisionTree` grown on a bootstrap sample over a
//! shuffled subset of the feature columns. Feature importance is the
//! sample-weighted decrease in Gini impurity (per tree, normalized), averaged
//! across the trees that found a split.

use indicatif::ProgressBar;
use linfa::prelude::*;
use linfa_trees::{DecisionTree, SplitQuality, TreeNode};
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::{validate_inputs, Classifier, FittedModel, OracleError};
use crate::pipeline::FeatureTable;

/// Number of feature columns each tree is grown on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaxFeatures {
    /// Every feature
    #[default]
    All,
    /// floor(sqrt(n_features)), at least 1
    Sqrt,
    /// A fixed count, clamped to 1..=n_features
    Count(usize),
}

impl MaxFeatures {
    pub fn resolve(self, n_features: usize) -> usize {
        let count = match self {
            MaxFeatures::All => n_features,
            MaxFeatures::Sqrt => (n_features as f64).sqrt().floor() as usize,
            MaxFeatures::Count(count) => count,
        };
        count.clamp(1, n_features.max(1))
    }
}

/// Forest hyperparameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForestParams {
    pub n_estimators: usize,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub max_features: MaxFeatures,
    pub bootstrap: bool,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: MaxFeatures::All,
            bootstrap: true,
            seed: 0,
        }
    }
}

impl ForestParams {
    fn validate(&self) -> Result<(), OracleError> {
        if self.n_estimators == 0 {
            return Err(OracleError::InvalidParams(
                "n_estimators must be at least 1".to_string(),
            ));
        }
        if self.max_depth == Some(0) {
            return Err(OracleError::InvalidParams(
                "max_depth must be at least 1".to_string(),
            ));
        }
        if self.min_samples_split < 2 {
            return Err(OracleError::InvalidParams(format!(
                "min_samples_split must be at least 2, got {}",
                self.min_samples_split
            )));
        }
        if self.min_samples_leaf == 0 {
            return Err(OracleError::InvalidParams(
                "min_samples_leaf must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Random forest classifier. Fitting is parallel across trees and deterministic
/// for a fixed seed.
#[derive(Clone)]
pub struct RandomForest {
    params: ForestParams,
    progress: Option<ProgressBar>,
}

impl RandomForest {
    pub fn new(params: ForestParams) -> Self {
        Self {
            params,
            progress: None,
        }
    }

    /// Advance `pb` by one for every fitted tree
    pub fn with_progress(mut self, pb: ProgressBar) -> Self {
        self.progress = Some(pb);
        self
    }

    pub fn params(&self) -> &ForestParams {
        &self.params
    }

    /// Grow one tree on a bootstrap sample over a shuffled column subset.
    ///
    /// Column order is shuffled so that ties between equally good splits fall
    /// on a random feature rather than always the leftmost one.
    fn fit_tree(
        &self,
        features: &FeatureTable,
        labels: &[i32],
        seed: u64,
    ) -> Result<TreeImportance, OracleError> {
        let mut rng = StdRng::seed_from_u64(seed);
        let n_rows = features.n_rows();
        let n_features = features.n_features();

        let rows: Vec<usize> = if self.params.bootstrap {
            (0..n_rows).map(|_| rng.gen_range(0..n_rows)).collect()
        } else {
            (0..n_rows).collect()
        };
        let mut columns: Vec<usize> = (0..n_features).collect();
        columns.shuffle(&mut rng);
        columns.truncate(self.params.max_features.resolve(n_features));

        let records = Array2::from_shape_fn((rows.len(), columns.len()), |(i, j)| {
            features.column(columns[j])[rows[i]]
        });
        let targets = Array1::from_iter(rows.iter().map(|&row| labels[row] as usize));
        let dataset = DatasetBase::new(records, targets);

        let tree = DecisionTree::<f64, usize>::params()
            .split_quality(SplitQuality::Gini)
            .max_depth(self.params.max_depth)
            .min_weight_split(self.params.min_samples_split as f32)
            .min_weight_leaf(self.params.min_samples_leaf as f32)
            .fit(&dataset)
            .map_err(|e| OracleError::Fit(e.to_string()))?;

        Ok(TreeImportance::from_tree(
            &tree,
            dataset.records(),
            &columns,
            n_features,
        ))
    }
}

impl Classifier for RandomForest {
    type Model = RandomForestModel;

    fn fit(&self, features: &FeatureTable, labels: &[i32]) -> Result<Self::Model, OracleError> {
        self.params.validate()?;
        validate_inputs(features, labels)?;

        // Seeds are drawn up front so results do not depend on thread scheduling
        let mut master = StdRng::seed_from_u64(self.params.seed);
        let seeds: Vec<u64> = (0..self.params.n_estimators)
            .map(|_| master.gen())
            .collect();

        let trees: Vec<TreeImportance> = seeds
            .par_iter()
            .map(|&seed| {
                let tree = self.fit_tree(features, labels, seed);
                if let Some(pb) = &self.progress {
                    pb.inc(1);
                }
                tree
            })
            .collect::<Result<_, _>>()?;

        Ok(RandomForestModel::from_trees(trees, features.n_features()))
    }
}

/// Impurity importances of one fitted tree, indexed by the full column order
#[derive(Debug, Clone)]
struct TreeImportance {
    importances: Vec<f64>,
    n_splits: usize,
}

impl TreeImportance {
    /// Route the training rows down `tree` and credit each split with
    /// `rows reaching the node * impurity decrease`, then normalize.
    fn from_tree(
        tree: &DecisionTree<f64, usize>,
        records: &Array2<f64>,
        columns: &[usize],
        n_features: usize,
    ) -> Self {
        let mut importances = vec![0.0; n_features];
        let mut n_splits = 0;

        let mut stack: Vec<(&TreeNode<f64, usize>, Vec<usize>)> =
            vec![(tree.root_node(), (0..records.nrows()).collect())];
        while let Some((node, rows)) = stack.pop() {
            if node.is_leaf() {
                continue;
            }
            let (feature, threshold, decrease) = node.split();
            importances[columns[feature]] += rows.len() as f64 * decrease;
            n_splits += 1;

            // Same routing rule the tree was grown with
            let (left, right): (Vec<usize>, Vec<usize>) = rows
                .into_iter()
                .partition(|&row| records[(row, feature)] <= threshold);
            for (child, rows) in node.children().into_iter().zip([left, right]) {
                if let Some(child) = child {
                    stack.push((&**child, rows));
                }
            }
        }

        let total: f64 = importances.iter().sum();
        if total > 0.0 {
            for imp in &mut importances {
                *imp /= total;
            }
        }

        Self {
            importances,
            n_splits,
        }
    }
}

/// A fitted forest
#[derive(Debug, Clone)]
pub struct RandomForestModel {
    importances: Vec<f64>,
    per_tree: Vec<Vec<f64>>,
}

impl RandomForestModel {
    fn from_trees(trees: Vec<TreeImportance>, n_features: usize) -> Self {
        // Trees that never split carry no information and are left out of the mean
        let mut importances = vec![0.0; n_features];
        for tree in trees.iter().filter(|t| t.n_splits > 0) {
            for (acc, imp) in importances.iter_mut().zip(&tree.importances) {
                *acc += imp;
            }
        }

        let total: f64 = importances.iter().sum();
        if total > 0.0 {
            for imp in &mut importances {
                *imp /= total;
            }
        }

        Self {
            importances,
            per_tree: trees.into_iter().map(|t| t.importances).collect(),
        }
    }

    pub fn n_estimators(&self) -> usize {
        self.per_tree.len()
    }
}

impl FittedModel for RandomForestModel {
    fn feature_importances(&self) -> Vec<f64> {
        self.importances.clone()
    }

    fn per_estimator_importances(&self) -> &[Vec<f64>] {
        &self.per_tree
    }
}
