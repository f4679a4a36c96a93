//! Ranking lines and table

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Color, Table};

use crate::pipeline::ImportanceRanking;

/// Importance at or above which a feature is highlighted
const HIGHLIGHT_IMPORTANCE: f64 = 0.2;

/// One line per feature: `"{rank}. feature {index} ({name}): {importance:.3}"`
pub fn format_ranking(ranking: &ImportanceRanking) -> Vec<String> {
    ranking
        .features
        .iter()
        .map(|f| {
            format!(
                "{}. feature {} ({}): {:.3}",
                f.rank, f.index, f.name, f.importance
            )
        })
        .collect()
}

/// Tabular view of the ranking
pub fn ranking_table(ranking: &ImportanceRanking) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Rank").add_attribute(Attribute::Bold),
        Cell::new("Index").add_attribute(Attribute::Bold),
        Cell::new("Feature").add_attribute(Attribute::Bold),
        Cell::new("Importance").add_attribute(Attribute::Bold),
        Cell::new("Std").add_attribute(Attribute::Bold),
    ]);

    for feature in &ranking.features {
        let importance = Cell::new(format!("{:.3}", feature.importance))
            .set_alignment(CellAlignment::Right);
        let importance = if feature.importance >= HIGHLIGHT_IMPORTANCE {
            importance.fg(Color::Green).add_attribute(Attribute::Bold)
        } else {
            importance
        };

        table.add_row(vec![
            Cell::new(feature.rank),
            Cell::new(feature.index),
            Cell::new(&feature.name),
            importance,
            Cell::new(format!("{:.3}", feature.std))
                .fg(Color::DarkGrey)
                .set_alignment(CellAlignment::Right),
        ]);
    }

    table
}

/// Print the table indented like the other report blocks
pub fn display_ranking_table(ranking: &ImportanceRanking) {
    for line in ranking_table(ranking).to_string().lines() {
        println!("    {}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::RankedFeature;

    fn ranking() -> ImportanceRanking {
        ImportanceRanking {
            features: vec![
                RankedFeature {
                    rank: 1,
                    index: 4,
                    name: "component_2_step_2".to_string(),
                    importance: 0.4861,
                    std: 0.02,
                },
                RankedFeature {
                    rank: 2,
                    index: 0,
                    name: "component_1_step_1".to_string(),
                    importance: 0.0139,
                    std: 0.001,
                },
            ],
        }
    }

    #[test]
    fn test_format_ranking() {
        let lines = format_ranking(&ranking());
        assert_eq!(lines[0], "1. feature 4 (component_2_step_2): 0.486");
        assert_eq!(lines[1], "2. feature 0 (component_1_step_1): 0.014");
    }

    #[test]
    fn test_ranking_table_has_row_per_feature() {
        let table = ranking_table(&ranking());
        assert_eq!(table.row_iter().count(), 2);
        assert!(table.to_string().contains("component_2_step_2"));
    }
}
