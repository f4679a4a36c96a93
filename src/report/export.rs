//! JSON export of the importance analysis and dataset output

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use polars::prelude::{CsvWriter, DataFrame, ParquetWriter, SerWriter};
use serde::Serialize;

use crate::pipeline::{FieldKind, ImportanceRanking, LabelStats, PipelineConfig, RankedFeature};

/// Metadata about the run
#[derive(Serialize)]
pub struct AnalysisMetadata {
    /// Timestamp of the run (RFC 3339)
    pub timestamp: String,
    pub sla_lens_version: String,
    /// Full configuration, so the run can be reproduced
    pub config: PipelineConfig,
}

/// Headline numbers of the run
#[derive(Serialize)]
pub struct AnalysisSummary {
    pub transactions: usize,
    pub faulty_records: usize,
    pub concern_records: usize,
    pub concern_rate: f64,
    pub features_ranked: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_feature: Option<String>,
    /// Summed importance of the steps configured as faulty
    pub faulty_share: f64,
}

/// Complete export: metadata, summary and the ranked features
#[derive(Serialize)]
pub struct ImportanceExport<'a> {
    pub metadata: AnalysisMetadata,
    pub summary: AnalysisSummary,
    pub features: &'a [RankedFeature],
}

/// Inputs for the metadata block
pub struct ExportParams<'a> {
    pub config: &'a PipelineConfig,
    pub faulty_records: usize,
}

/// Write `ranking` and the label balance to `output_path` as pretty JSON
pub fn export_importance_analysis(
    ranking: &ImportanceRanking,
    stats: &LabelStats,
    output_path: &Path,
    params: &ExportParams,
) -> Result<()> {
    let faulty_names = params.config.names_of_kind(FieldKind::Faulty);

    let export = ImportanceExport {
        metadata: AnalysisMetadata {
            timestamp: Utc::now().to_rfc3339(),
            sla_lens_version: env!("CARGO_PKG_VERSION").to_string(),
            config: params.config.clone(),
        },
        summary: AnalysisSummary {
            transactions: stats.total,
            faulty_records: params.faulty_records,
            concern_records: stats.concern,
            concern_rate: stats.concern_rate(),
            features_ranked: ranking.len(),
            top_feature: ranking.top().map(|f| f.name.clone()),
            faulty_share: ranking.share_of(&faulty_names),
        },
        features: &ranking.features,
    };

    let json = serde_json::to_string_pretty(&export)
        .context("Failed to serialize importance analysis to JSON")?;

    std::fs::write(output_path, json).with_context(|| {
        format!(
            "Failed to write importance analysis to {}",
            output_path.display()
        )
    })?;

    Ok(())
}

/// Save the generated table (CSV or Parquet based on extension)
pub fn save_dataset(df: &mut DataFrame, path: &Path) -> Result<()> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "csv" => {
            let mut file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            CsvWriter::new(&mut file)
                .finish(df)
                .with_context(|| format!("Failed to write CSV file: {}", path.display()))?;
        }
        "parquet" => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            ParquetWriter::new(file)
                .finish(df)
                .with_context(|| format!("Failed to write Parquet file: {}", path.display()))?;
        }
        _ => anyhow::bail!(
            "Unsupported dataset format: '{}'. Supported formats: csv, parquet",
            extension
        ),
    }

    Ok(())
}
