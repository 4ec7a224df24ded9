use serde::{Deserialize, Serialize};

/// Lowest contribution a single feature may add to an item's mean.
pub const DEFAULT_CONTRIBUTION_FLOOR: f64 = 0.0;

/// Scoring options.
///
/// Example YAML:
/// ```yaml
/// contribution_floor: 0.0   # null lets far-off values go negative
/// ```
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringOptions {
    /// Per-feature contributions below this value are raised to it.
    /// `None` keeps raw contributions, which can be negative for values far
    /// outside a narrow domain.
    #[serde(default = "default_floor")]
    pub contribution_floor: Option<f64>,
}

fn default_floor() -> Option<f64> {
    Some(DEFAULT_CONTRIBUTION_FLOOR)
}

impl Default for ScoringOptions {
    fn default() -> Self {
        Self {
            contribution_floor: default_floor(),
        }
    }
}

impl ScoringOptions {
    pub fn unclamped() -> Self {
        Self {
            contribution_floor: None,
        }
    }

    /// Apply the floor to a raw contribution
    pub fn floor(&self, contribution: f64) -> f64 {
        match self.contribution_floor {
            Some(floor) => contribution.max(floor),
            None => contribution,
        }
    }
}
