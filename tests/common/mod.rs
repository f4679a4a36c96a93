//! Shared test utilities and fixture generators

#![allow(dead_code)]

use polars::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sla_lens::pipeline::{FeatureTable, FieldGroup, FieldKind, PipelineConfig};
use std::path::PathBuf;
use tempfile::TempDir;

/// Reference scenario sized for tests: bounded depth and fewer trees
pub fn scenario_config(transactions: usize, n_estimators: usize) -> PipelineConfig {
    PipelineConfig {
        transactions,
        n_estimators,
        max_depth: Some(8),
        ..PipelineConfig::sla_scenario()
    }
}

/// Every step clean, threshold near the median of the sum of six U[0,1) steps
/// so both classes are well populated
pub fn all_clean_config(transactions: usize, n_estimators: usize) -> PipelineConfig {
    PipelineConfig {
        sla_threshold: 3.0,
        ..scenario_config(transactions, n_estimators).without_faults()
    }
}

/// A single group with the given kinds
pub fn single_group_config(kinds: Vec<FieldKind>, transactions: usize) -> PipelineConfig {
    PipelineConfig {
        transactions,
        groups: vec![FieldGroup::new("svc", kinds)],
        n_estimators: 10,
        max_depth: Some(6),
        ..PipelineConfig::sla_scenario()
    }
}

/// Small hand-written timing table with two step columns
pub fn create_timing_dataframe() -> DataFrame {
    df! {
        "transaction_id" => [0i64, 1, 2, 3, 4],
        "svc_step_1" => [0.5f64, 1.0, 2.5, 0.25, 3.0],
        "svc_step_2" => [0.5f64, 4.0, 2.5, 0.25, 2.0],
    }
    .unwrap()
}

/// Feature table where `signal` determines the label and `noise` does not.
/// Labels are 1 for every fifth row.
pub fn create_separable_table(n: usize, seed: u64) -> (FeatureTable, Vec<i32>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let labels: Vec<i32> = (0..n).map(|i| (i % 5 == 0) as i32).collect();

    let noise_a: Vec<f64> = (0..n).map(|_| rng.gen()).collect();
    let signal: Vec<f64> = labels
        .iter()
        .map(|&l| rng.gen::<f64>() + if l == 1 { 2.0 } else { 0.0 })
        .collect();
    let noise_b: Vec<f64> = (0..n).map(|_| rng.gen()).collect();

    let table = FeatureTable::new(vec![
        ("noise_a".to_string(), noise_a),
        ("signal".to_string(), signal),
        ("noise_b".to_string(), noise_b),
    ]);
    (table, labels)
}

/// Temporary directory plus a path inside it
pub fn temp_path(file_name: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(file_name);
    (temp_dir, path)
}

/// Assert that a DataFrame has the expected columns
pub fn assert_has_columns(df: &DataFrame, expected: &[&str]) {
    let actual: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    for col in expected {
        assert!(
            actual.contains(&col.to_string()),
            "Expected column '{}' not found. Available: {:?}",
            col,
            actual
        );
    }
}

/// Column as f64 values
pub fn float_column(df: &DataFrame, name: &str) -> Vec<f64> {
    df.column(name)
        .unwrap()
        .cast(&DataType::Float64)
        .unwrap()
        .f64()
        .unwrap()
        .into_iter()
        .map(|v| v.unwrap())
        .collect()
}
