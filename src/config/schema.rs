use crate::scoring::ScoringOptions;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_TOP: usize = 5;

/// Contents of `config.yaml`. Every field is optional.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Catalog file to rank against instead of the built-in one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<PathBuf>,

    /// How many results `recommend` shows (0 = all)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<usize>,

    /// See [`ScoringOptions::contribution_floor`]; null disables the floor
    #[serde(default = "default_floor")]
    pub contribution_floor: Option<f64>,
}

fn default_floor() -> Option<f64> {
    ScoringOptions::default().contribution_floor
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog: None,
            top: None,
            contribution_floor: default_floor(),
        }
    }
}

impl Config {
    pub fn top(&self) -> usize {
        self.top.unwrap_or(DEFAULT_TOP)
    }

    pub fn scoring(&self) -> ScoringOptions {
        ScoringOptions {
            contribution_floor: self.contribution_floor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.catalog.is_none());
        assert_eq!(config.top(), DEFAULT_TOP);
        assert_eq!(config.scoring(), ScoringOptions::default());
    }

    #[test]
    fn test_empty_config_parse() {
        let config: Config = serde_saphyr::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_full_config_parse() {
        let yaml = r#"
catalog: /tmp/crops.yaml
top: 3
contribution_floor: null
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.catalog, Some(PathBuf::from("/tmp/crops.yaml")));
        assert_eq!(config.top(), 3);
        assert_eq!(config.scoring(), ScoringOptions::unclamped());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<Config, _> = serde_saphyr::from_str("weights: {}");
        assert!(result.is_err());
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = Config {
            catalog: Some(PathBuf::from("catalog.yaml")),
            top: Some(10),
            contribution_floor: Some(0.0),
        };
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: Config = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }
}
