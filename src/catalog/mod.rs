mod builtin;
mod schema;
mod validation;

pub use builtin::builtin_catalog;
pub use schema::{Catalog, Feature, IdealRange, Item};
pub use validation::validate_catalog;

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Load a catalog from a YAML file, or JSON when the extension is `.json`.
///
/// The catalog is only parsed here; call [`validate_catalog`] (or build a
/// [`crate::scoring::Scorer`]) before scoring against it.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog file at {}", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let catalog: Catalog = if is_json {
        serde_json::from_str(&content).with_context(|| {
            format!("Failed to parse catalog: invalid JSON in {}", path.display())
        })?
    } else {
        serde_saphyr::from_str(&content).with_context(|| {
            format!("Failed to parse catalog: invalid YAML in {}", path.display())
        })?
    };

    tracing::debug!(
        path = %path.display(),
        features = catalog.features.len(),
        items = catalog.items.len(),
        "loaded catalog"
    );

    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_load_yaml_catalog() {
        let path = env::temp_dir().join("cropfit_test_catalog.yaml");
        let yaml = r#"
features:
  - key: ph
    label: pH
    min: 4.5
    max: 9.0
    default: 6.5
items:
  - name: Rice
    ideal_ranges:
      ph: [5.5, 7.0]
"#;
        fs::write(&path, yaml).unwrap();

        let catalog = load_catalog(&path).unwrap();
        assert_eq!(catalog.features.len(), 1);
        assert_eq!(catalog.items[0].range("ph"), Some(&IdealRange(5.5, 7.0)));
        assert!(validate_catalog(&catalog).is_ok());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_json_catalog() {
        let path = env::temp_dir().join("cropfit_test_catalog.json");
        let json = serde_json::to_string(&builtin_catalog()).unwrap();
        fs::write(&path, json).unwrap();

        let catalog = load_catalog(&path).unwrap();
        assert_eq!(catalog, builtin_catalog());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_missing_catalog() {
        let path = env::temp_dir().join("cropfit_test_catalog_missing.yaml");
        let _ = fs::remove_file(&path);

        let err = load_catalog(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to read catalog file"));
    }

    #[test]
    fn test_load_rejects_unknown_fields() {
        let path = env::temp_dir().join("cropfit_test_catalog_unknown.yaml");
        fs::write(&path, "features: []\nitems: []\nweights: {}\n").unwrap();

        assert!(load_catalog(&path).is_err());

        let _ = fs::remove_file(&path);
    }
}
