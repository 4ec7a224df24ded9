use owo_colors::OwoColorize;

use crate::simulate::{EmgSession, PricePoint, TrendAnalysis, TrendDirection};

const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Render values as a one-line bar chart scaled to their own min/max
pub fn sparkline(values: &[f64]) -> String {
    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(*v), hi.max(*v))
        });
    let span = max - min;

    values
        .iter()
        .map(|v| {
            if span <= f64::EPSILON {
                BARS[BARS.len() / 2]
            } else {
                let level = ((v - min) / span * (BARS.len() - 1) as f64).round() as usize;
                BARS[level.min(BARS.len() - 1)]
            }
        })
        .collect()
}

/// Price history chart plus trend summary
pub fn format_stock_report(
    ticker: &str,
    history: &[PricePoint],
    analysis: &TrendAnalysis,
    use_colors: bool,
) -> String {
    let prices: Vec<f64> = history.iter().map(|p| p.price).collect();
    let first = history.first().map(|p| p.time.as_str()).unwrap_or("");
    let last = history.last().map(|p| p.time.as_str()).unwrap_or("");

    let chart = sparkline(&prices);
    let predicted = format!("{:.2}", analysis.predicted);
    let (chart, predicted) = if use_colors {
        match analysis.direction {
            TrendDirection::Upward => (chart.green().to_string(), predicted.green().to_string()),
            TrendDirection::Downward => (chart.red().to_string(), predicted.red().to_string()),
            TrendDirection::Flat => (chart, predicted),
        }
    } else {
        (chart, predicted)
    };

    let ticker = if use_colors {
        ticker.bold().to_string()
    } else {
        ticker.to_string()
    };

    format!(
        "{}  {} -> {}\n{}\nCurrent: {:.2}  Predicted: {}  Change: {:+.2}%\n{}",
        ticker,
        first,
        last,
        chart,
        analysis.current,
        predicted,
        analysis.change_pct,
        analysis.summary
    )
}

/// Price history as tab-separated `time\tprice` lines
pub fn format_history_tsv(history: &[PricePoint]) -> String {
    history
        .iter()
        .map(|p| format!("{}\t{:.2}", p.time, p.price))
        .collect::<Vec<_>>()
        .join("\n")
}

/// One sparkline per channel plus the controller's final angle
pub fn format_emg_report(session: &EmgSession, use_colors: bool) -> String {
    let mut lines: Vec<String> = session
        .channels
        .iter()
        .enumerate()
        .map(|(i, points)| {
            let values: Vec<f64> = points.iter().map(|p| p.value).collect();
            let label = format!("Channel {}", i + 1);
            let label = if use_colors {
                label.dimmed().to_string()
            } else {
                label
            };
            format!("{}  {}", label, sparkline(&values))
        })
        .collect();

    lines.push(format!(
        "Arm angle: {:.1}° (target {:.0}°, error {:+.1}°)",
        session.final_angle,
        session.target,
        session.target - session.final_angle
    ));
    lines.join("\n")
}
