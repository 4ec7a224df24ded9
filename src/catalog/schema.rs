use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A measured quantity the user supplies, with its global domain.
///
/// The domain width (`max - min`) normalizes how far an out-of-range value
/// is from an item's ideal range.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Feature {
    /// Lookup key used in input assignments and ideal ranges (e.g. "ph")
    pub key: String,

    /// Human-readable name used in rationale strings (e.g. "pH")
    pub label: String,

    pub min: f64,
    pub max: f64,

    /// Value the CLI starts from before `--set` overrides.
    /// Falls back to the domain midpoint when omitted.
    #[serde(default)]
    pub default: Option<f64>,

    /// Display unit (e.g. "kg/ha")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl Feature {
    pub fn new(key: &str, label: &str, min: f64, max: f64) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            min,
            max,
            default: None,
            unit: None,
        }
    }

    pub fn with_default(mut self, default: f64) -> Self {
        self.default = Some(default);
        self
    }

    pub fn with_unit(mut self, unit: &str) -> Self {
        self.unit = Some(unit.to_string());
        self
    }

    /// Width of the global domain
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn default_value(&self) -> f64 {
        self.default.unwrap_or((self.min + self.max) / 2.0)
    }
}

/// Inclusive `[lo, hi]` interval, serialized as a two-element sequence.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct IdealRange(pub f64, pub f64);

impl From<[f64; 2]> for IdealRange {
    fn from([lo, hi]: [f64; 2]) -> Self {
        IdealRange(lo, hi)
    }
}

impl From<IdealRange> for [f64; 2] {
    fn from(range: IdealRange) -> Self {
        [range.0, range.1]
    }
}

impl IdealRange {
    pub fn lo(&self) -> f64 {
        self.0
    }

    pub fn hi(&self) -> f64 {
        self.1
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.0 && value <= self.1
    }

    /// Closest point of the range to `value`
    pub fn nearest(&self, value: f64) -> f64 {
        value.max(self.0).min(self.1)
    }
}

/// One catalog entry.
///
/// Example YAML:
/// ```yaml
/// name: Rice
/// ideal_ranges:
///   ph: [5.5, 7.0]
///   rain: [180, 300]
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Item {
    pub name: String,

    /// Ideal range per feature key. Features without an entry do not
    /// take part in this item's score.
    pub ideal_ranges: BTreeMap<String, IdealRange>,
}

impl Item {
    pub fn new(name: &str, ranges: &[(&str, f64, f64)]) -> Self {
        Self {
            name: name.to_string(),
            ideal_ranges: ranges
                .iter()
                .map(|(key, lo, hi)| (key.to_string(), IdealRange(*lo, *hi)))
                .collect(),
        }
    }

    pub fn range(&self, key: &str) -> Option<&IdealRange> {
        self.ideal_ranges.get(key)
    }
}

/// The full set of features and items the scorer ranks against.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Catalog {
    pub features: Vec<Feature>,
    pub items: Vec<Item>,
}

impl Catalog {
    pub fn feature(&self, key: &str) -> Option<&Feature> {
        self.features.iter().find(|f| f.key == key)
    }

    pub fn item(&self, name: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.name.eq_ignore_ascii_case(name))
    }
}
