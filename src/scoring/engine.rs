use super::config::ScoringOptions;
use super::error::InvalidInput;
use super::explain::rationale;
use super::input::UserInput;
use super::validation::validate_options;
use crate::catalog::{validate_catalog, Catalog, Feature, IdealRange, Item};
use serde::Serialize;

/// Which side of the ideal range a value fell on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Deviation {
    Low,
    High,
}

impl Deviation {
    pub fn of(value: f64, range: &IdealRange) -> Option<Self> {
        if value < range.lo() {
            Some(Deviation::Low)
        } else if value > range.hi() {
            Some(Deviation::High)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Deviation::Low => "low",
            Deviation::High => "high",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureContribution {
    pub key: String,
    pub label: String,
    pub value: f64,
    pub ideal: IdealRange,
    pub contribution: f64, // After the floor is applied
    pub deviation: Option<Deviation>,
}

/// One item's place in a ranking. Borrowed from the catalog it was scored
/// against and rebuilt on every call.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredResult<'a> {
    pub item: &'a Item,
    pub score: f64,
    pub rationale: String,
    pub breakdown: Vec<FeatureContribution>,
}

/// Contribution of one feature: 1.0 inside `range`, otherwise one minus the
/// distance to the nearest bound as a fraction of the feature's global domain.
pub fn feature_contribution(
    value: f64,
    range: &IdealRange,
    feature: &Feature,
    options: &ScoringOptions,
) -> f64 {
    if range.contains(value) {
        return 1.0;
    }
    let distance = (value - range.nearest(value)).abs() / feature.span();
    options.floor(1.0 - distance)
}

/// Per-feature contributions for `item`, in catalog feature order.
pub fn breakdown(
    input: &UserInput,
    item: &Item,
    features: &[Feature],
    options: &ScoringOptions,
) -> Result<Vec<FeatureContribution>, InvalidInput> {
    input.validate(features)?;
    collect_contributions(input, item, features, options)
}

/// Suitability of `item` for `input`: the unweighted mean of its feature
/// contributions.
pub fn score(
    input: &UserInput,
    item: &Item,
    features: &[Feature],
    options: &ScoringOptions,
) -> Result<f64, InvalidInput> {
    let contributions = breakdown(input, item, features, options)?;
    Ok(mean(&contributions))
}

fn collect_contributions(
    input: &UserInput,
    item: &Item,
    features: &[Feature],
    options: &ScoringOptions,
) -> Result<Vec<FeatureContribution>, InvalidInput> {
    features
        .iter()
        .filter_map(|feature| item.range(&feature.key).map(|range| (feature, range)))
        .map(|(feature, range)| {
            let value = input.require(&feature.key)?;
            Ok::<_, InvalidInput>(FeatureContribution {
                key: feature.key.clone(),
                label: feature.label.clone(),
                value,
                ideal: *range,
                contribution: feature_contribution(value, range, feature, options),
                deviation: Deviation::of(value, range),
            })
        })
        .collect()
}

fn mean(contributions: &[FeatureContribution]) -> f64 {
    if contributions.is_empty() {
        return 0.0;
    }
    contributions.iter().map(|c| c.contribution).sum::<f64>() / contributions.len() as f64
}

/// Score and rank every item of `catalog`.
///
/// The input is validated once up front; an invalid input fails the whole
/// pass. Sorting is stable, so equal scores keep catalog order.
pub fn rank<'a>(
    input: &UserInput,
    catalog: &'a Catalog,
    options: &ScoringOptions,
) -> Result<Vec<ScoredResult<'a>>, InvalidInput> {
    input.validate(&catalog.features)?;

    let mut results = catalog
        .items
        .iter()
        .map(|item| {
            let breakdown = collect_contributions(input, item, &catalog.features, options)?;
            Ok::<_, InvalidInput>(ScoredResult {
                item,
                score: mean(&breakdown),
                rationale: rationale(&breakdown),
                breakdown,
            })
        })
        .collect::<Result<Vec<_>, InvalidInput>>()?;

    // Scores are finite after validation, so partial_cmp only fails on NaN
    results.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    tracing::debug!(
        items = results.len(),
        top = results.first().map(|r| r.item.name.as_str()).unwrap_or("-"),
        "ranked catalog"
    );

    Ok(results)
}

/// A validated catalog together with the options it is scored with.
///
/// Built once at startup and shared by reference; it holds no mutable state.
#[derive(Debug, Clone)]
pub struct Scorer {
    catalog: Catalog,
    options: ScoringOptions,
}

impl Scorer {
    /// Validate `catalog` and `options`, reporting every problem at once.
    pub fn new(catalog: Catalog, options: ScoringOptions) -> Result<Self, Vec<String>> {
        let mut errors = Vec::new();
        if let Err(mut e) = validate_catalog(&catalog) {
            errors.append(&mut e);
        }
        if let Err(mut e) = validate_options(&options) {
            errors.append(&mut e);
        }

        if errors.is_empty() {
            Ok(Self { catalog, options })
        } else {
            Err(errors)
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn options(&self) -> &ScoringOptions {
        &self.options
    }

    pub fn features(&self) -> &[Feature] {
        &self.catalog.features
    }

    /// Input holding every feature's default value
    pub fn default_input(&self) -> UserInput {
        UserInput::from_defaults(&self.catalog.features)
    }

    pub fn score(&self, input: &UserInput, item: &Item) -> Result<f64, InvalidInput> {
        score(input, item, &self.catalog.features, &self.options)
    }

    pub fn breakdown(
        &self,
        input: &UserInput,
        item: &Item,
    ) -> Result<Vec<FeatureContribution>, InvalidInput> {
        breakdown(input, item, &self.catalog.features, &self.options)
    }

    pub fn explain(&self, input: &UserInput, item: &Item) -> Result<String, InvalidInput> {
        super::explain::explain(input, item, &self.catalog.features)
    }

    pub fn rank(&self, input: &UserInput) -> Result<Vec<ScoredResult<'_>>, InvalidInput> {
        rank(input, &self.catalog, &self.options)
    }
}
