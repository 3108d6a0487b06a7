// Colored terminal output for influence reports.
//
// This module handles all terminal-specific formatting: highlighted prompts,
// distance tables, paragraph summaries. The command bodies in main.rs
// delegate here.

use colored::Colorize;
use std::collections::HashSet;

use crate::output::truncate_chars;
use crate::pipeline::analyze::InfluenceReport;

/// Display a full influence report: the prompt with its influential words
/// highlighted, the selected words, a response preview, and optionally the
/// per-word distance table.
pub fn display_report(report: &InfluenceReport, show_distances: bool) {
    println!("\n{}", format!("Prompt: {}", highlight_prompt(report)).bold());

    if report.words.is_empty() {
        println!("  {}", "(empty prompt, nothing to score)".dimmed());
        return;
    }

    if report.influential.is_empty() {
        println!("  Influential tokens: {}", "(none)".dimmed());
    } else {
        println!(
            "  Influential tokens: {}",
            report.influential.join(", ").red().bold()
        );
    }

    if !report.base_response.is_empty() {
        println!(
            "  {}",
            format!(
                "Response: \"{}\"",
                truncate_chars(&report.base_response, 120)
            )
            .dimmed()
        );
    }

    if show_distances {
        display_distance_table(report);
    }
}

/// Display the per-word distance table, highest drift first.
fn display_distance_table(report: &InfluenceReport) {
    let influential: HashSet<&str> = report.influential.iter().map(String::as_str).collect();

    println!();
    println!("  {:>4}  {:<24} {:>9}", "Rank".dimmed(), "Word".dimmed(), "Distance".dimmed());
    println!("  {}", "-".repeat(42).dimmed());

    let mut ranked: Vec<(usize, f64)> = report.distances.iter().copied().enumerate().collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    for (rank, (position, distance)) in ranked.iter().enumerate() {
        let word = &report.words[*position];
        let shown = if influential.contains(word.as_str()) {
            word.red().bold().to_string()
        } else {
            word.normal().to_string()
        };
        println!("  {:>4}. {:<24} {:>9.4}", rank + 1, shown, distance);
    }
}

/// Render the prompt with influential words highlighted in place.
fn highlight_prompt(report: &InfluenceReport) -> String {
    let influential: HashSet<&str> = report.influential.iter().map(String::as_str).collect();
    report
        .words
        .iter()
        .map(|word| {
            if influential.contains(word.as_str()) {
                word.red().bold().to_string()
            } else {
                word.clone()
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
