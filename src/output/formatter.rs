use std::io::IsTerminal;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use terminal_size::{terminal_size, Width};

use crate::catalog::{Catalog, Feature};
use crate::scoring::{FeatureContribution, ScoredResult};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a suitability score as a percentage ("100%", "93.4%")
pub fn format_score(score: f64) -> String {
    let formatted = format!("{:.1}%", score * 100.0);
    formatted.replace(".0%", "%")
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate text to fit available width, accounting for Unicode
pub(crate) fn truncate(text: &str, max_width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_width {
        text.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

fn score_colored(text: &str, score: f64) -> String {
    if score >= 0.9 {
        text.green().bold().to_string()
    } else if score >= 0.7 {
        text.yellow().to_string()
    } else {
        text.red().to_string()
    }
}

/// Format ranked results as a table with columns: Index, Score, Name, Rationale
/// No headers. The rationale is truncated to the terminal width.
pub fn format_ranked_table(results: &[ScoredResult], use_colors: bool) -> String {
    if results.is_empty() {
        return "No crops in catalog.".to_string();
    }

    let term_width = get_terminal_width();

    // Index column: 3 chars ("99."). Unclamped scores can be wider than "100.0%".
    let index_width = 3;
    let scores: Vec<String> = results.iter().map(|r| format_score(r.score)).collect();
    let score_width = scores
        .iter()
        .map(|s| s.chars().count())
        .max()
        .unwrap_or(0)
        .max(6);
    let separator = "  ";
    let name_width = results
        .iter()
        .map(|r| r.item.name.chars().count())
        .max()
        .unwrap_or(0);

    results
        .iter()
        .enumerate()
        .map(|(idx, result)| {
            let index_str = format!("{:>width$}.", idx + 1, width = index_width - 1);
            let score_padded = format!("{:>width$}", scores[idx], width = score_width);
            let name_padded = format!("{:<width$}", result.item.name, width = name_width);

            let fixed_width = index_width + 1 + score_width + name_width + separator.len() * 2;
            let rationale = match term_width {
                Some(width) if width > fixed_width + 10 => {
                    truncate(&result.rationale, width - fixed_width)
                }
                // Very narrow terminal
                Some(_) => truncate(&result.rationale, 20),
                None => result.rationale.clone(),
            };

            if use_colors {
                format!(
                    "{} {}{}{}{}{}",
                    index_str.dimmed(),
                    score_colored(&score_padded, result.score),
                    separator,
                    name_padded.bold(),
                    separator,
                    rationale.dimmed()
                )
            } else {
                format!(
                    "{} {}{}{}{}{}",
                    index_str, score_padded, separator, name_padded, separator, rationale
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format results as tab-separated values for scripting
/// Columns: score, name, rationale (no headers, no colors)
pub fn format_tsv(results: &[ScoredResult]) -> String {
    results
        .iter()
        .map(|r| format!("{:.4}\t{}\t{}", r.score, r.item.name, r.rationale))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format results as pretty-printed JSON
pub fn format_json(results: &[ScoredResult]) -> Result<String> {
    serde_json::to_string_pretty(results).context("Failed to serialize results")
}

/// Per-feature breakdown for verbose mode
pub fn format_breakdown(contributions: &[FeatureContribution], use_colors: bool) -> String {
    contributions
        .iter()
        .map(|c| {
            let line = format!(
                "    {}: {} (ideal {}-{}) -> {:.3}",
                c.label,
                c.value,
                c.ideal.lo(),
                c.ideal.hi(),
                c.contribution
            );
            match (use_colors, c.deviation) {
                (true, Some(_)) => line.red().to_string(),
                (true, None) => line.dimmed().to_string(),
                (false, _) => line,
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn feature_line(feature: &Feature) -> String {
    let unit = feature
        .unit
        .as_deref()
        .map(|u| format!(" {}", u))
        .unwrap_or_default();
    format!(
        "{:<6} {:<12} {}-{}{}  (default {})",
        feature.key,
        feature.label,
        feature.min,
        feature.max,
        unit,
        feature.default_value()
    )
}

/// One line per feature: key, label, domain, unit, default
pub fn format_features(features: &[Feature]) -> String {
    features
        .iter()
        .map(feature_line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Every item with its ideal ranges, in catalog feature order
pub fn format_catalog(catalog: &Catalog, use_colors: bool) -> String {
    catalog
        .items
        .iter()
        .map(|item| {
            let ranges = catalog
                .features
                .iter()
                .filter_map(|f| {
                    item.range(&f.key)
                        .map(|r| format!("{} {}-{}", f.key, r.lo(), r.hi()))
                })
                .collect::<Vec<_>>()
                .join(", ");
            if use_colors {
                format!("{}: {}", item.name.bold(), ranges)
            } else {
                format!("{}: {}", item.name, ranges)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
