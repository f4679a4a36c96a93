//! SLA Lens: Feature Importance CLI Tool
//!
//! Generates synthetic transaction timings, labels them against an SLA
//! threshold and ranks the timing fields by forest importance.

use std::io;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use indicatif::ProgressBar;

use sla_lens::cli::Cli;
use sla_lens::pipeline::{
    generate_dataset, label_dataset, label_stats, rank_dataset, FieldKind,
};
use sla_lens::report::{
    display_ranking_table, export_importance_analysis, format_ranking, render_ranking,
    save_dataset, ExportParams, PipelineSummary, SvgBarChart, TextBarChart,
};
use sla_lens::utils::{
    create_progress_bar, create_spinner, finish_with_success, finish_with_warning,
    hidden_progress_bar, print_banner, print_completion, print_config, print_count, print_info,
    print_step_header, print_step_time, print_success, print_warning,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let quiet = cli.quiet;

    let config = cli.to_config();
    config.validate()?;

    let faulty_names = config.names_of_kind(FieldKind::Faulty);
    let faulty_records = config.injected_records();
    let mut summary = PipelineSummary::new(config.transactions, faulty_records);

    if !quiet {
        print_banner(env!("CARGO_PKG_VERSION"));
        print_config(&config);
    }

    // Step 1: Generate transactions
    if !quiet {
        print_step_header(1, "Generate Transactions");
    }
    let step_start = Instant::now();
    let spinner = step_spinner(quiet, "Drawing step timings...");
    let df = generate_dataset(&config)?;
    finish_with_success(&spinner, "Transactions generated");

    if !quiet {
        print_count(
            "step field(s)",
            config.step_names().len(),
            Some(&format!("across {} group(s)", config.groups.len())),
        );
        if faulty_names.is_empty() {
            print_info("No faulty steps configured - no delay injected");
        } else {
            print_count(
                "record(s) with an injected delay",
                faulty_records,
                Some(&format!("(1 in {})", config.error_period)),
            );
        }
    }
    let generate_elapsed = step_start.elapsed();
    summary.set_generate_time(generate_elapsed);
    if !quiet {
        print_step_time(generate_elapsed);
    }

    // Step 2: Aggregate and label
    if !quiet {
        print_step_header(2, "Label SLA Breaches");
    }
    let step_start = Instant::now();
    let mut df = label_dataset(&config, df)?;
    let stats = label_stats(&df)?;
    summary.set_labels(&stats);

    if !quiet {
        print_count(
            "transaction(s) of concern",
            stats.concern,
            Some(&format!(
                "({:.1}% above {})",
                stats.concern_rate() * 100.0,
                config.sla_threshold
            )),
        );
    }
    if let Some(class) = stats.single_class() {
        print_warning(&format!(
            "Every transaction has concern={} - try a different threshold",
            class
        ));
    }
    let label_elapsed = step_start.elapsed();
    summary.set_label_time(label_elapsed);
    if !quiet {
        print_step_time(label_elapsed);
    }

    // Step 3: Fit the forest and rank
    if !quiet {
        print_step_header(3, "Rank Feature Importance");
        println!();
    }
    let step_start = Instant::now();
    let pb = if quiet {
        hidden_progress_bar(config.n_estimators as u64)
    } else {
        create_progress_bar(config.n_estimators as u64, "Fitting trees")
    };

    let ranking = match rank_dataset(&config, &df, Some(pb.clone())) {
        Ok(ranking) => {
            finish_with_success(&pb, "Forest fitted");
            ranking
        }
        Err(e) if e.is_degenerate() => {
            finish_with_warning(&pb, "No ranking produced");
            print_warning(&e.to_string());
            return Err(e).context("Importance ranking is not meaningful for this run");
        }
        Err(e) => return Err(e.into()),
    };
    summary.set_ranking(&ranking, &faulty_names);

    let rank_elapsed = step_start.elapsed();
    summary.set_rank_time(rank_elapsed);
    if !quiet {
        print_step_time(rank_elapsed);
    }

    // Step 4: Report
    if !quiet {
        print_step_header(4, "Feature Ranking");
        println!();
    }
    for line in format_ranking(&ranking) {
        if quiet {
            println!("{}", line);
        } else {
            println!("    {}", line);
        }
    }

    if !quiet {
        println!();
        display_ranking_table(&ranking);

        println!("\n    {} Importance by rank:", style("✧").cyan());
        let mut chart = TextBarChart::new(io::stdout().lock());
        render_ranking(&mut chart, &ranking)?;
    }

    if let Some(path) = &cli.json {
        let params = ExportParams {
            config: &config,
            faulty_records,
        };
        export_importance_analysis(&ranking, &stats, path, &params)?;
        if !quiet {
            print_success(&format!("Importance analysis saved to {}", path.display()));
        }
    }

    if let Some(path) = &cli.chart_svg {
        let mut chart = SvgBarChart::new(path).with_title(format!(
            "Feature importance (N={}, T={})",
            config.transactions, config.sla_threshold
        ));
        render_ranking(&mut chart, &ranking)?;
        if !quiet {
            print_success(&format!("Chart saved to {}", path.display()));
        }
    }

    if let Some(path) = &cli.save_dataset {
        let spinner = step_spinner(quiet, "Writing dataset...");
        save_dataset(&mut df, path)?;
        finish_with_success(&spinner, &format!("Dataset saved to {}", path.display()));
    }

    if !quiet {
        summary.display();
        print_completion();
    }

    Ok(())
}

/// Spinner that stays hidden in quiet mode
fn step_spinner(quiet: bool, message: &str) -> ProgressBar {
    if quiet {
        ProgressBar::hidden()
    } else {
        create_spinner(message)
    }
}

