//! Run summary table

use std::time::Duration;

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use crate::pipeline::{ImportanceRanking, LabelStats};

/// Faulty-group share at or above which the fault is considered isolated
const ISOLATED_SHARE: f64 = 0.8;

/// Summary of an importance run
#[derive(Debug, Default)]
pub struct PipelineSummary {
    pub transactions: usize,
    pub faulty_records: usize,
    pub concern_records: usize,
    pub features_ranked: usize,
    pub top_feature: Option<(String, f64)>,
    /// Summed importance of the faulty steps, when any are configured
    pub faulty_share: Option<f64>,
    pub generate_time: Duration,
    pub label_time: Duration,
    pub rank_time: Duration,
}

impl PipelineSummary {
    pub fn new(transactions: usize, faulty_records: usize) -> Self {
        Self {
            transactions,
            faulty_records,
            ..Default::default()
        }
    }

    pub fn set_labels(&mut self, stats: &LabelStats) {
        self.concern_records = stats.concern;
    }

    pub fn set_ranking(&mut self, ranking: &ImportanceRanking, faulty_names: &[String]) {
        self.features_ranked = ranking.len();
        self.top_feature = ranking.top().map(|f| (f.name.clone(), f.importance));
        self.faulty_share = if faulty_names.is_empty() {
            None
        } else {
            Some(ranking.share_of(faulty_names))
        };
    }

    pub fn set_generate_time(&mut self, elapsed: Duration) {
        self.generate_time = elapsed;
    }

    pub fn set_label_time(&mut self, elapsed: Duration) {
        self.label_time = elapsed;
    }

    pub fn set_rank_time(&mut self, elapsed: Duration) {
        self.rank_time = elapsed;
    }

    pub fn concern_rate(&self) -> f64 {
        if self.transactions == 0 {
            0.0
        } else {
            self.concern_records as f64 / self.transactions as f64
        }
    }

    pub fn total_time(&self) -> Duration {
        self.generate_time + self.label_time + self.rank_time
    }

    pub fn to_table(&self) -> Table {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![
            Cell::new("📁 Transactions"),
            Cell::new(self.transactions),
        ]);
        table.add_row(vec![
            Cell::new("💥 Injected faults"),
            Cell::new(self.faulty_records),
        ]);
        table.add_row(vec![
            Cell::new("🚨 Of concern"),
            Cell::new(format!(
                "{} ({:.1}%)",
                self.concern_records,
                self.concern_rate() * 100.0
            ))
            .fg(Color::Yellow),
        ]);
        table.add_row(vec![
            Cell::new("📊 Features ranked"),
            Cell::new(self.features_ranked),
        ]);

        if let Some((name, importance)) = &self.top_feature {
            table.add_row(vec![
                Cell::new("🥇 Top feature"),
                Cell::new(format!("{} ({:.3})", name, importance))
                    .fg(Color::Green)
                    .add_attribute(Attribute::Bold),
            ]);
        }

        if let Some(share) = self.faulty_share {
            let color = if share >= ISOLATED_SHARE {
                Color::Green
            } else {
                Color::Red
            };
            table.add_row(vec![
                Cell::new("🎯 Faulty-step share"),
                Cell::new(format!("{:.1}%", share * 100.0))
                    .fg(color)
                    .add_attribute(Attribute::Bold),
            ]);
        }

        table.add_row(vec![
            Cell::new("⏱️  Total time"),
            Cell::new(format!(
                "{:.2}s (generate {:.2}s, label {:.2}s, rank {:.2}s)",
                self.total_time().as_secs_f64(),
                self.generate_time.as_secs_f64(),
                self.label_time.as_secs_f64(),
                self.rank_time.as_secs_f64()
            ))
            .fg(Color::DarkGrey),
        ]);

        table
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("IMPORTANCE SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        for line in self.to_table().to_string().lines() {
            println!("    {}", line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::RankedFeature;

    #[test]
    fn test_summary_from_ranking() {
        let ranking = ImportanceRanking {
            features: vec![
                RankedFeature {
                    rank: 1,
                    index: 1,
                    name: "b".to_string(),
                    importance: 0.9,
                    std: 0.0,
                },
                RankedFeature {
                    rank: 2,
                    index: 0,
                    name: "a".to_string(),
                    importance: 0.1,
                    std: 0.0,
                },
            ],
        };
        let mut summary = PipelineSummary::new(100, 10);
        summary.set_labels(&LabelStats::from_labels(&[1, 0, 0, 0]));
        summary.set_ranking(&ranking, &["b".to_string()]);

        assert_eq!(summary.features_ranked, 2);
        assert_eq!(summary.top_feature, Some(("b".to_string(), 0.9)));
        assert_eq!(summary.faulty_share, Some(0.9));
        assert!(summary.to_table().to_string().contains("90.0%"));
    }

    #[test]
    fn test_no_faulty_share_without_faulty_steps() {
        let mut summary = PipelineSummary::new(10, 0);
        summary.set_ranking(&ImportanceRanking { features: vec![] }, &[]);
        assert_eq!(summary.faulty_share, None);
        assert_eq!(summary.concern_rate(), 0.0);
    }
}
