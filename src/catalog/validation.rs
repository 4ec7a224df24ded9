use super::schema::Catalog;
use std::collections::HashSet;

/// Validate a catalog before it is handed to the scorer.
/// Returns all validation errors at once (not just the first).
pub fn validate_catalog(catalog: &Catalog) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if catalog.features.is_empty() {
        errors.push("catalog.features: at least one feature is required".to_string());
    }
    if catalog.items.is_empty() {
        errors.push("catalog.items: at least one item is required".to_string());
    }

    let mut feature_keys = HashSet::new();
    for (i, feature) in catalog.features.iter().enumerate() {
        if feature.key.trim().is_empty() {
            errors.push(format!("catalog.features[{}].key: must not be empty", i));
        } else if !feature_keys.insert(feature.key.as_str()) {
            errors.push(format!(
                "catalog.features[{}].key: duplicate key '{}'",
                i, feature.key
            ));
        }

        if !feature.min.is_finite() || !feature.max.is_finite() {
            errors.push(format!(
                "catalog.features[{}] '{}': min and max must be finite",
                i, feature.key
            ));
        } else if feature.min >= feature.max {
            errors.push(format!(
                "catalog.features[{}] '{}': min ({}) must be less than max ({})",
                i, feature.key, feature.min, feature.max
            ));
        }

        if let Some(default) = feature.default {
            if !default.is_finite() {
                errors.push(format!(
                    "catalog.features[{}] '{}': default must be finite",
                    i, feature.key
                ));
            }
        }
    }

    let mut item_names = HashSet::new();
    for (i, item) in catalog.items.iter().enumerate() {
        if item.name.trim().is_empty() {
            errors.push(format!("catalog.items[{}].name: must not be empty", i));
        } else if !item_names.insert(item.name.to_lowercase()) {
            errors.push(format!(
                "catalog.items[{}].name: duplicate item '{}'",
                i, item.name
            ));
        }

        if item.ideal_ranges.is_empty() {
            errors.push(format!(
                "catalog.items[{}] '{}': at least one ideal range is required",
                i, item.name
            ));
        }

        for (key, range) in &item.ideal_ranges {
            if !feature_keys.contains(key.as_str()) {
                errors.push(format!(
                    "catalog.items[{}].ideal_ranges.{}: unknown feature",
                    i, key
                ));
            }
            if !range.lo().is_finite() || !range.hi().is_finite() {
                errors.push(format!(
                    "catalog.items[{}].ideal_ranges.{}: bounds must be finite",
                    i, key
                ));
            } else if range.lo() > range.hi() {
                errors.push(format!(
                    "catalog.items[{}].ideal_ranges.{}: lower bound {} exceeds upper bound {}",
                    i,
                    key,
                    range.lo(),
                    range.hi()
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Feature, IdealRange, Item};

    fn small_catalog() -> Catalog {
        Catalog {
            features: vec![
                Feature::new("ph", "pH", 4.5, 9.0),
                Feature::new("rain", "Rainfall", 0.0, 350.0),
            ],
            items: vec![Item::new("Rice", &[("ph", 5.5, 7.0), ("rain", 180.0, 300.0)])],
        }
    }

    #[test]
    fn test_valid_catalog() {
        assert!(validate_catalog(&small_catalog()).is_ok());
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = Catalog {
            features: vec![],
            items: vec![],
        };
        let errors = validate_catalog(&catalog).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("catalog.features"));
        assert!(errors[1].contains("catalog.items"));
    }

    #[test]
    fn test_min_not_below_max() {
        let mut catalog = small_catalog();
        catalog.features[0].max = 4.5;
        let errors = validate_catalog(&catalog).unwrap_err();
        assert!(errors[0].contains("catalog.features[0]"));
        assert!(errors[0].contains("must be less than max"));
    }

    #[test]
    fn test_duplicate_feature_key() {
        let mut catalog = small_catalog();
        catalog.features.push(Feature::new("ph", "pH again", 0.0, 14.0));
        let errors = validate_catalog(&catalog).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("duplicate key 'ph'"));
    }

    #[test]
    fn test_unknown_feature_in_item() {
        let mut catalog = small_catalog();
        catalog.items[0]
            .ideal_ranges
            .insert("zinc".to_string(), IdealRange(1.0, 2.0));
        let errors = validate_catalog(&catalog).unwrap_err();
        assert_eq!(errors, vec!["catalog.items[0].ideal_ranges.zinc: unknown feature".to_string()]);
    }

    #[test]
    fn test_inverted_range() {
        let mut catalog = small_catalog();
        catalog.items[0]
            .ideal_ranges
            .insert("ph".to_string(), IdealRange(7.0, 5.5));
        let errors = validate_catalog(&catalog).unwrap_err();
        assert!(errors[0].contains("catalog.items[0].ideal_ranges.ph"));
        assert!(errors[0].contains("exceeds upper bound"));
    }

    #[test]
    fn test_range_may_exceed_domain() {
        let mut catalog = small_catalog();
        catalog.items[0]
            .ideal_ranges
            .insert("rain".to_string(), IdealRange(300.0, 400.0));
        assert!(validate_catalog(&catalog).is_ok());
    }

    #[test]
    fn test_duplicate_item_name_ignores_case() {
        let mut catalog = small_catalog();
        catalog.items.push(Item::new("rice", &[("ph", 5.0, 6.0)]));
        let errors = validate_catalog(&catalog).unwrap_err();
        assert!(errors[0].contains("duplicate item 'rice'"));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut catalog = small_catalog();
        catalog.features[1].min = f64::NAN; // Error 1
        catalog.items.push(Item::new("", &[])); // Errors 2 and 3
        let errors = validate_catalog(&catalog).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
