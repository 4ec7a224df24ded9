use super::config::ScoringOptions;
use super::engine::{breakdown, FeatureContribution};
use super::error::InvalidInput;
use super::input::UserInput;
use crate::catalog::{Feature, Item};

/// Rationale when nothing pulls the score down
pub const WITHIN_IDEAL_RANGES: &str = "All inputs within ideal ranges";

const MAX_CLAUSES: usize = 3;
const SEPARATOR: &str = "; ";
const ELLIPSIS: &str = "…";

/// Short explanation of which features fall outside `item`'s ideal ranges.
///
/// Values exactly on a range boundary count as inside.
pub fn explain(
    input: &UserInput,
    item: &Item,
    features: &[Feature],
) -> Result<String, InvalidInput> {
    // Deviations do not depend on the floor
    let contributions = breakdown(input, item, features, &ScoringOptions::default())?;
    Ok(rationale(&contributions))
}

/// Build the rationale string from an already computed breakdown.
pub fn rationale(contributions: &[FeatureContribution]) -> String {
    let clauses: Vec<String> = contributions
        .iter()
        .filter_map(|c| {
            c.deviation.map(|d| {
                format!(
                    "{} {} (ideal {}-{})",
                    c.label,
                    d.as_str(),
                    c.ideal.lo(),
                    c.ideal.hi()
                )
            })
        })
        .collect();

    if clauses.is_empty() {
        return WITHIN_IDEAL_RANGES.to_string();
    }

    let mut text = clauses
        .iter()
        .take(MAX_CLAUSES)
        .cloned()
        .collect::<Vec<_>>()
        .join(SEPARATOR);
    if clauses.len() > MAX_CLAUSES {
        text.push_str(SEPARATOR);
        text.push_str(ELLIPSIS);
    }
    text
}
