//! End-to-end run: generate → aggregate → label → fit → rank

use indicatif::ProgressBar;
use polars::prelude::DataFrame;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::config::PipelineConfig;
use super::error::PipelineError;
use super::features::FeatureTable;
use super::generator::generate_transactions;
use super::labels::{add_total_time, assign_concern, concern_labels, LabelStats};
use super::ranker::{rank_features, ImportanceRanking};
use crate::oracle::RandomForest;

/// Everything a run produces
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Generated table with `total_time` and `concern` appended
    pub dataset: DataFrame,
    pub stats: LabelStats,
    pub ranking: ImportanceRanking,
    /// Records that received the injected delay
    pub faulty_records: usize,
}

/// Draw the step timings for `config`, seeded from `config.seed`
pub fn generate_dataset(config: &PipelineConfig) -> Result<DataFrame, PipelineError> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    generate_transactions(config, &mut rng)
}

/// Append `total_time` and the `concern` label to a generated table
pub fn label_dataset(config: &PipelineConfig, df: DataFrame) -> Result<DataFrame, PipelineError> {
    let df = add_total_time(df, &config.step_names())?;
    assign_concern(df, config.sla_threshold)
}

/// Generate the transaction table and label it
pub fn prepare_dataset(config: &PipelineConfig) -> Result<DataFrame, PipelineError> {
    label_dataset(config, generate_dataset(config)?)
}

/// Rank the step columns of a labelled table with a forest built from `config`
pub fn rank_dataset(
    config: &PipelineConfig,
    dataset: &DataFrame,
    progress: Option<ProgressBar>,
) -> Result<ImportanceRanking, PipelineError> {
    let table = FeatureTable::from_dataframe(dataset, &config.step_names())?;
    let labels = concern_labels(dataset)?;

    let mut forest = RandomForest::new(config.forest_params());
    if let Some(pb) = progress {
        forest = forest.with_progress(pb);
    }
    rank_features(&forest, &table, &labels)
}

/// Run the whole pipeline for `config`
pub fn run_pipeline(config: &PipelineConfig) -> Result<PipelineOutput, PipelineError> {
    config.validate()?;

    let dataset = prepare_dataset(config)?;
    let stats = LabelStats::from_labels(&concern_labels(&dataset)?);
    let ranking = rank_dataset(config, &dataset, None)?;

    Ok(PipelineOutput {
        dataset,
        stats,
        ranking,
        faulty_records: config.injected_records(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_config_rejected_up_front() {
        let config = PipelineConfig {
            transactions: 1,
            ..PipelineConfig::sla_scenario()
        };
        let err = run_pipeline(&config).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_prepare_dataset_columns() {
        let config = PipelineConfig {
            transactions: 50,
            ..PipelineConfig::sla_scenario()
        };
        let df = prepare_dataset(&config).unwrap();

        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(names.first().map(String::as_str), Some("transaction_id"));
        assert_eq!(names[names.len() - 2], "total_time");
        assert_eq!(names[names.len() - 1], "concern");
        assert_eq!(names.len(), 1 + 6 + 2);
        assert_eq!(df.height(), 50);
    }

    #[test]
    fn test_prepare_matches_separate_steps() {
        let config = PipelineConfig {
            transactions: 200,
            ..PipelineConfig::sla_scenario()
        };
        let generated = generate_dataset(&config).unwrap();
        assert_eq!(generated.width(), 1 + 6);

        let labelled = label_dataset(&config, generated).unwrap();
        assert!(labelled.equals(&prepare_dataset(&config).unwrap()));
    }
}
