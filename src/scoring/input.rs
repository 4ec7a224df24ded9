use super::error::InvalidInput;
use crate::catalog::Feature;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A user's feature vector: one value per feature key.
///
/// Values outside a feature's `[min, max]` are allowed and simply score
/// poorly. Use [`UserInput::validate`] before scoring.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(transparent)]
pub struct UserInput {
    values: BTreeMap<String, f64>,
}

impl UserInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from every feature's default value
    pub fn from_defaults(features: &[Feature]) -> Self {
        Self {
            values: features
                .iter()
                .map(|f| (f.key.clone(), f.default_value()))
                .collect(),
        }
    }

    pub fn set(&mut self, key: &str, value: f64) {
        self.values.insert(key.to_string(), value);
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Apply a `key=value` assignment as given on the command line.
    pub fn apply_assignment(&mut self, assignment: &str) -> Result<(), InvalidInput> {
        let (key, value) = parse_assignment(assignment)?;
        self.values.insert(key, value);
        Ok(())
    }

    /// Check that every feature has a finite value and no unknown keys are present.
    ///
    /// Features are checked in catalog order; the first problem is returned.
    pub fn validate(&self, features: &[Feature]) -> Result<(), InvalidInput> {
        for feature in features {
            match self.values.get(&feature.key) {
                None => return Err(InvalidInput::MissingFeature(feature.key.clone())),
                Some(value) if !value.is_finite() => {
                    return Err(InvalidInput::NonFinite {
                        key: feature.key.clone(),
                        value: *value,
                    })
                }
                Some(_) => {}
            }
        }

        if let Some(unknown) = self
            .values
            .keys()
            .find(|key| !features.iter().any(|f| &f.key == *key))
        {
            return Err(InvalidInput::UnknownFeature(unknown.clone()));
        }

        Ok(())
    }

    /// Value for a feature that [`UserInput::validate`] has already accepted.
    pub(crate) fn require(&self, key: &str) -> Result<f64, InvalidInput> {
        match self.values.get(key) {
            None => Err(InvalidInput::MissingFeature(key.to_string())),
            Some(value) if !value.is_finite() => Err(InvalidInput::NonFinite {
                key: key.to_string(),
                value: *value,
            }),
            Some(value) => Ok(*value),
        }
    }
}

impl FromIterator<(String, f64)> for UserInput {
    fn from_iter<T: IntoIterator<Item = (String, f64)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Parse "key=value" into its parts. Whitespace around either side is ignored.
pub fn parse_assignment(s: &str) -> Result<(String, f64), InvalidInput> {
    let malformed = || InvalidInput::MalformedAssignment(s.to_string());

    let (key, value) = s.split_once('=').ok_or_else(malformed)?;
    let key = key.trim();
    if key.is_empty() {
        return Err(malformed());
    }
    let value: f64 = value.trim().parse().map_err(|_| malformed())?;

    Ok((key.to_string(), value))
}
