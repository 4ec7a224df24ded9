pub mod charts;
pub mod formatter;

pub use charts::{format_emg_report, format_history_tsv, format_stock_report, sparkline};
pub use formatter::{
    format_breakdown, format_catalog, format_features, format_json, format_ranked_table,
    format_score, format_tsv, should_use_colors,
};
