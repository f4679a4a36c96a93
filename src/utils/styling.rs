//! Terminal styling for the step-by-step report

use console::{style, Emoji};
use std::time::Duration;

use crate::pipeline::{FieldKind, PipelineConfig};

// Emoji icons with fallbacks for terminals that don't support them
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", ">> ");
pub static CHART: Emoji<'_, '_> = Emoji("📊 ", "");
pub static CLOCK: Emoji<'_, '_> = Emoji("⏱️  ", "");
pub static TARGET: Emoji<'_, '_> = Emoji("🎯 ", "");
pub static TREE: Emoji<'_, '_> = Emoji("🌲 ", "");
pub static SEED: Emoji<'_, '_> = Emoji("🎲 ", "");

const CARD_WIDTH: usize = 56;

/// Print the application banner
pub fn print_banner(version: &str) {
    let banner = r#"
     ____  _        _      _
    / ___|| |      / \    | |    ___ _ __  ___
    \___ \| |     / _ \   | |   / _ \ '_ \/ __|
     ___) | |___ / ___ \  | |__|  __/ | | \__ \
    |____/|_____/_/   \_\ |_____\___|_| |_|___/
    "#;

    println!();
    println!("{}", style(banner).cyan().bold());
    println!(
        "    {}",
        style("Which timing field drives your SLA breaches?").dim()
    );
    println!("    {}", style(format!("v{}", version)).dim());
    println!("    {}", style("━".repeat(50)).dim());
    println!();
}

/// Print the configuration card
pub fn print_config(config: &PipelineConfig) {
    let line = "─".repeat(CARD_WIDTH - 2);

    println!("    ┌{}┐", line);
    println!(
        "    │ {}{}│",
        style("⚙️  Configuration").cyan().bold(),
        " ".repeat(CARD_WIDTH - 20)
    );
    println!("    ├{}┤", line);
    card_row(CHART, "Transactions:", config.transactions.to_string());
    card_row(
        CLOCK,
        "Fault period:",
        format!("1 in {}", config.error_period),
    );
    card_row(TARGET, "SLA threshold:", format!("{}", config.sla_threshold));
    println!("    ├{}┤", line);
    card_row(TREE, "Estimators:", config.n_estimators.to_string());
    card_row(
        TREE,
        "Max depth:",
        config
            .max_depth
            .map_or_else(|| "unlimited".to_string(), |d| d.to_string()),
    );
    card_row(SEED, "Seed:", config.seed.to_string());
    println!("    ├{}┤", line);
    for group in &config.groups {
        let faulty = group
            .steps
            .iter()
            .filter(|&&k| k == FieldKind::Faulty)
            .count();
        let value = format!("{} step(s), {} faulty", group.steps.len(), faulty);
        println!(
            "    │  {:<22} {:<29}│",
            truncate_string(&group.name, 22),
            style(value).yellow()
        );
    }
    println!("    └{}┘", line);
    println!();
}

fn card_row(icon: Emoji<'_, '_>, label: &str, value: String) {
    println!(
        "    │  {} {:<15} {:<33}│",
        icon,
        label,
        style(value).yellow()
    );
}

/// Print a step header
pub fn print_step_header(step_num: u8, title: &str) {
    println!();
    println!(
        "    {} {} {}",
        style(format!("STEP {}", step_num)).cyan().bold(),
        style("│").dim(),
        style(title).white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
}

pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

pub fn print_info(message: &str) {
    println!("    {} {}", INFO, message);
}

/// Warnings go to stderr so they survive output redirection
pub fn print_warning(message: &str) {
    eprintln!("    {} {}", WARN, style(message).yellow());
}

/// Print how long a step took
pub fn print_step_time(elapsed: Duration) {
    println!(
        "      {}",
        style(format!("({:.2}s)", elapsed.as_secs_f64())).dim()
    );
}

/// Print the final completion message
pub fn print_completion() {
    println!();
    println!(
        "    {} {}",
        ROCKET,
        style("SLA Lens analysis complete!").green().bold()
    );
    println!();
}

/// Print a styled count message
pub fn print_count(description: &str, count: usize, detail: Option<&str>) {
    match detail {
        Some(info) => println!(
            "      Found {} {} {}",
            style(count).yellow().bold(),
            description,
            style(info).dim()
        ),
        None => println!("      Found {} {}", style(count).yellow().bold(), description),
    }
}

fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let tail: String = s
            .chars()
            .rev()
            .take(max_len.saturating_sub(3))
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        format!("...{}", tail)
    }
}
