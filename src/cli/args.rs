//! Command-line argument definitions using clap

use clap::Parser;
use std::path::PathBuf;

use crate::pipeline::{FieldGroup, PipelineConfig, MIN_TRANSACTIONS};

/// SLA Lens - rank timing fields by how strongly they predict SLA breaches
#[derive(Parser, Debug)]
#[command(name = "sla-lens")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Number of synthetic transactions to generate
    #[arg(short = 'n', long, default_value = "10000", value_parser = validate_transactions)]
    pub transactions: usize,

    /// SLA threshold - a transaction whose total time exceeds this is of concern
    #[arg(short = 't', long, default_value = "5.0", value_parser = validate_threshold)]
    pub threshold: f64,

    /// Inject the delay into faulty steps of every N-th transaction
    #[arg(long, default_value = "10", value_parser = validate_positive)]
    pub error_period: usize,

    /// Number of trees in the forest
    #[arg(long, default_value = "100", value_parser = validate_positive)]
    pub estimators: usize,

    /// Maximum depth of each tree (unlimited when omitted)
    #[arg(long, value_parser = validate_positive)]
    pub max_depth: Option<usize>,

    /// Seed for data generation and model fitting
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Field group as name=kind,kind,... where kind is clean or faulty.
    /// Repeat for several groups. Defaults to the two-component SLA scenario.
    #[arg(short, long = "group", value_name = "NAME=KINDS")]
    pub groups: Vec<FieldGroup>,

    /// Turn every faulty step clean (baseline run without an injected fault)
    #[arg(long, default_value = "false")]
    pub all_clean: bool,

    /// Write the importance analysis as JSON to this path
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Write the importance chart as SVG to this path
    #[arg(long)]
    pub chart_svg: Option<PathBuf>,

    /// Save the generated dataset (CSV or Parquet, by extension)
    #[arg(long)]
    pub save_dataset: Option<PathBuf>,

    /// Print only the ranking lines
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,
}

impl Cli {
    /// Build the run configuration from the parsed arguments
    pub fn to_config(&self) -> PipelineConfig {
        let scenario = PipelineConfig::sla_scenario();
        let groups = if self.groups.is_empty() {
            scenario.groups
        } else {
            self.groups.clone()
        };

        let config = PipelineConfig {
            transactions: self.transactions,
            groups,
            error_period: self.error_period,
            sla_threshold: self.threshold,
            n_estimators: self.estimators,
            max_depth: self.max_depth,
            seed: self.seed,
        };

        if self.all_clean {
            config.without_faults()
        } else {
            config
        }
    }
}

/// Validator for the transaction count
fn validate_transactions(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid count", s))?;

    if value < MIN_TRANSACTIONS {
        Err(format!(
            "transactions must be at least {}, got {}",
            MIN_TRANSACTIONS, value
        ))
    } else {
        Ok(value)
    }
}

/// Validator for the SLA threshold
fn validate_threshold(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if !value.is_finite() || value <= 0.0 {
        Err(format!(
            "threshold must be a positive number, got {}",
            value
        ))
    } else {
        Ok(value)
    }
}

/// Validator for counts that must be at least 1
fn validate_positive(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid count", s))?;

    if value == 0 {
        Err("value must be at least 1".to_string())
    } else {
        Ok(value)
    }
}
