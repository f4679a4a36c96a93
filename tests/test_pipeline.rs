//! Integration tests for the full generate → label → rank pipeline

use sla_lens::pipeline::*;

#[path = "common/mod.rs"]
mod common;

use common::*;

#[test]
fn test_sla_scenario_isolates_faulty_steps() {
    let config = scenario_config(10_000, 30);
    let output = run_pipeline(&config).unwrap();

    let rate = output.stats.concern_rate();
    assert!((0.09..=0.11).contains(&rate), "concern rate {}", rate);
    assert_eq!(output.faulty_records, 1_000);

    let ranking = &output.ranking;
    let mut top_two: Vec<&str> = ranking.names()[..2].to_vec();
    top_two.sort();
    assert_eq!(top_two, vec!["component_2_step_2", "component_2_step_3"]);

    let faulty = config.names_of_kind(FieldKind::Faulty);
    let share = ranking.share_of(&faulty);
    assert!(share >= 0.9, "faulty share {}", share);

    for name in config.names_of_kind(FieldKind::Clean) {
        let importance = ranking.importance_of(&name).unwrap();
        assert!(importance < 0.05, "{} importance {}", name, importance);
    }
}

#[test]
fn test_default_scenario_isolates_faulty_steps() {
    // Shipped defaults: 100 trees, unlimited depth
    let config = PipelineConfig::sla_scenario();
    let output = run_pipeline(&config).unwrap();

    let mut top_two: Vec<&str> = output.ranking.names()[..2].to_vec();
    top_two.sort();
    assert_eq!(top_two, vec!["component_2_step_2", "component_2_step_3"]);

    let share = output.ranking.share_of(&config.names_of_kind(FieldKind::Faulty));
    assert!(share >= 0.9, "faulty share {}", share);
    for name in config.names_of_kind(FieldKind::Clean) {
        let importance = output.ranking.importance_of(&name).unwrap();
        assert!(importance < 0.05, "{} importance {}", name, importance);
    }
}

#[test]
fn test_all_clean_scenario_has_no_dominant_field() {
    let config = all_clean_config(10_000, 30);
    let output = run_pipeline(&config).unwrap();

    assert_eq!(output.faulty_records, 0);
    assert_eq!(output.stats.single_class(), None);
    for feature in &output.ranking.features {
        assert!(
            feature.importance <= 0.3,
            "{} importance {}",
            feature.name,
            feature.importance
        );
    }
}

#[test]
fn test_pipeline_is_deterministic() {
    let config = scenario_config(2_000, 15);
    let a = run_pipeline(&config).unwrap();
    let b = run_pipeline(&config).unwrap();

    assert!(a.dataset.equals(&b.dataset));
    assert_eq!(a.ranking, b.ranking);
    assert_eq!(a.stats, b.stats);
}

#[test]
fn test_importances_sum_to_one() {
    let output = run_pipeline(&scenario_config(2_000, 15)).unwrap();
    assert!((output.ranking.total_importance() - 1.0).abs() < 1e-6);
    assert_eq!(output.ranking.len(), 6);
}

#[test]
fn test_ranked_features_map_to_columns() {
    let config = scenario_config(1_000, 10);
    let output = run_pipeline(&config).unwrap();
    let names = config.step_names();

    for feature in &output.ranking.features {
        assert_eq!(names[feature.index], feature.name);
    }
}

#[test]
fn test_two_transactions_accepted() {
    let config = scenario_config(2, 25);
    let output = run_pipeline(&config).unwrap();

    // Record 0 carries the injected delay, record 1 does not
    assert_eq!(output.stats.concern, 1);
    assert_eq!(output.stats.clear, 1);
    assert_eq!(output.ranking.len(), 6);
}

#[test]
fn test_one_transaction_rejected() {
    let err = run_pipeline(&scenario_config(1, 10)).unwrap_err();
    assert!(err.is_config());
    assert!(err.to_string().contains("at least 2"));
}

#[test]
fn test_unreachable_threshold_is_degenerate() {
    let config = PipelineConfig {
        sla_threshold: 1_000.0,
        ..scenario_config(500, 10)
    };
    let err = run_pipeline(&config).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::DegenerateLabels { class: 0, count: 500 }
    ));
}

#[test]
fn test_dataset_keeps_derived_columns() {
    let output = run_pipeline(&scenario_config(300, 5)).unwrap();
    assert_has_columns(&output.dataset, &[ID_COLUMN, TOTAL_COLUMN, CONCERN_COLUMN]);
    assert_eq!(output.dataset.width(), 9);
}
