//! Pipeline configuration: field groups, error injection and model settings

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::error::PipelineError;
use super::generator::faulty_record_count;
use crate::oracle::ForestParams;

/// Column holding the record identifier
pub const ID_COLUMN: &str = "transaction_id";

/// Column holding the derived aggregate
pub const TOTAL_COLUMN: &str = "total_time";

/// Column holding the binary label
pub const CONCERN_COLUMN: &str = "concern";

/// Smallest accepted transaction count. A single record always yields a
/// single-class label vector.
pub const MIN_TRANSACTIONS: usize = 2;

/// How a step field's values are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Uniform noise, independent of the label
    Clean,
    /// Uniform noise plus an intermittent large delay on selected records
    Faulty,
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldKind::Clean => write!(f, "clean"),
            FieldKind::Faulty => write!(f, "faulty"),
        }
    }
}

impl std::str::FromStr for FieldKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "clean" => Ok(FieldKind::Clean),
            "faulty" => Ok(FieldKind::Faulty),
            _ => Err(format!("Unknown field kind: '{}'. Use 'clean' or 'faulty'.", s)),
        }
    }
}

/// A named component made of one or more processing steps.
///
/// Step columns are named `<group>_step_<n>` with `n` starting at 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldGroup {
    pub name: String,
    pub steps: Vec<FieldKind>,
}

impl FieldGroup {
    pub fn new(name: impl Into<String>, steps: Vec<FieldKind>) -> Self {
        Self {
            name: name.into(),
            steps,
        }
    }

    /// Column names of this group's steps, in order
    pub fn column_names(&self) -> Vec<String> {
        (1..=self.steps.len())
            .map(|i| format!("{}_step_{}", self.name, i))
            .collect()
    }
}

/// Parses `name=kind,kind,...`, e.g. `component_2=clean,faulty,faulty`.
impl std::str::FromStr for FieldGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, steps) = s
            .split_once('=')
            .ok_or_else(|| format!("Invalid group '{}'. Expected name=kind,kind,...", s))?;

        let name = name.trim();
        if name.is_empty() {
            return Err(format!("Group '{}' has an empty name", s));
        }

        let steps = steps
            .split(',')
            .filter(|k| !k.trim().is_empty())
            .map(str::parse)
            .collect::<Result<Vec<FieldKind>, _>>()?;

        if steps.is_empty() {
            return Err(format!("Group '{}' has no steps", name));
        }

        Ok(FieldGroup::new(name, steps))
    }
}

/// One step column with its group and kind
#[derive(Debug, Clone, PartialEq)]
pub struct StepField {
    pub name: String,
    pub group: String,
    pub kind: FieldKind,
}

/// Every parameter of a run. Nothing is read from the environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Number of transactions to generate
    pub transactions: usize,
    /// Field groups in column order
    pub groups: Vec<FieldGroup>,
    /// Faulty fields get the injected delay when `transaction_id % error_period == 0`
    pub error_period: usize,
    /// Total time above which a transaction is of concern
    pub sla_threshold: f64,
    /// Number of trees in the forest
    pub n_estimators: usize,
    /// Optional depth limit for each tree
    pub max_depth: Option<usize>,
    /// Seed for data generation and model fitting
    pub seed: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::sla_scenario()
    }
}

impl PipelineConfig {
    /// Reference scenario: two components, the second carrying two faulty steps
    /// that receive a 2-5 unit delay on every tenth transaction.
    pub fn sla_scenario() -> Self {
        Self {
            transactions: 10_000,
            groups: vec![
                FieldGroup::new(
                    "component_1",
                    vec![FieldKind::Clean, FieldKind::Clean, FieldKind::Clean],
                ),
                FieldGroup::new(
                    "component_2",
                    vec![FieldKind::Clean, FieldKind::Faulty, FieldKind::Faulty],
                ),
            ],
            error_period: 10,
            sla_threshold: 5.0,
            n_estimators: 100,
            max_depth: None,
            seed: 42,
        }
    }

    /// Same layout with every faulty step turned clean (no injected fault)
    pub fn without_faults(mut self) -> Self {
        for group in &mut self.groups {
            for kind in &mut group.steps {
                *kind = FieldKind::Clean;
            }
        }
        self
    }

    /// All step fields in column order
    pub fn step_fields(&self) -> Vec<StepField> {
        self.groups
            .iter()
            .flat_map(|group| {
                group
                    .column_names()
                    .into_iter()
                    .zip(group.steps.iter())
                    .map(move |(name, &kind)| StepField {
                        name,
                        group: group.name.clone(),
                        kind,
                    })
            })
            .collect()
    }

    /// Step column names in column order
    pub fn step_names(&self) -> Vec<String> {
        self.step_fields().into_iter().map(|f| f.name).collect()
    }

    /// Names of steps of the given kind
    pub fn names_of_kind(&self, kind: FieldKind) -> Vec<String> {
        self.step_fields()
            .into_iter()
            .filter(|f| f.kind == kind)
            .map(|f| f.name)
            .collect()
    }

    /// Records that receive the injected delay; zero when no step is faulty
    pub fn injected_records(&self) -> usize {
        if self.step_fields().iter().any(|f| f.kind == FieldKind::Faulty) {
            faulty_record_count(self.transactions, self.error_period)
        } else {
            0
        }
    }

    /// Forest settings derived from this configuration
    pub fn forest_params(&self) -> ForestParams {
        ForestParams {
            n_estimators: self.n_estimators,
            max_depth: self.max_depth,
            seed: self.seed,
            ..ForestParams::default()
        }
    }

    /// Reject invalid configurations before any data is generated.
    pub fn validate(&self) -> Result<(), PipelineError> {
        let invalid = |msg: String| Err(PipelineError::InvalidConfig(msg));

        if self.transactions < MIN_TRANSACTIONS {
            return invalid(format!(
                "transactions must be at least {}, got {}",
                MIN_TRANSACTIONS, self.transactions
            ));
        }
        if self.groups.is_empty() {
            return invalid("at least one field group is required".to_string());
        }
        if let Some(group) = self.groups.iter().find(|g| g.steps.is_empty()) {
            return invalid(format!("field group '{}' has no steps", group.name));
        }
        if let Some(group) = self.groups.iter().find(|g| g.name.trim().is_empty()) {
            return invalid(format!(
                "field group with {} step(s) has an empty name",
                group.steps.len()
            ));
        }
        if self.error_period == 0 {
            return invalid("error period must be at least 1".to_string());
        }
        if !self.sla_threshold.is_finite() || self.sla_threshold <= 0.0 {
            return invalid(format!(
                "SLA threshold must be a positive finite number, got {}",
                self.sla_threshold
            ));
        }
        if self.n_estimators == 0 {
            return invalid("estimator count must be at least 1".to_string());
        }
        if self.max_depth == Some(0) {
            return invalid("max depth must be at least 1 when set".to_string());
        }

        let mut seen = HashSet::new();
        for name in self.step_names() {
            if !seen.insert(name.clone()) {
                return invalid(format!("duplicate step name '{}'", name));
            }
        }

        Ok(())
    }
}
