mod init;
mod schema;

pub use init::{write_starter_files, InitOutcome};
pub use schema::{Config, DEFAULT_TOP};

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (~/.config/cropfit/)
pub fn get_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("cropfit"))
}

/// Get the default config file path (~/.config/cropfit/config.yaml)
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.yaml"))
}

/// Ensure a directory exists
pub fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create config directory at {}", dir.display()))?;
    }
    Ok(())
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses the default path
///   (~/.config/cropfit/config.yaml) and falls back to defaults when that
///   file does not exist.
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let (config_path, explicit) = match path {
        Some(p) => (p, true),
        None => (get_config_path()?, false),
    };

    if !config_path.exists() {
        if explicit {
            anyhow::bail!("Config file not found at {}", config_path.display());
        }
        tracing::debug!(path = %config_path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let mut config: Config = serde_saphyr::from_str(&config_content).with_context(|| {
        format!("Failed to parse config: invalid YAML in {}", config_path.display())
    })?;

    // Relative catalog paths are relative to the config file
    if let Some(catalog) = config.catalog.take() {
        let resolved = match config_path.parent() {
            Some(dir) if catalog.is_relative() => dir.join(catalog),
            _ => catalog,
        };
        config.catalog = Some(resolved);
    }

    tracing::debug!(path = %config_path.display(), "loaded config");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_explicit_missing_config_is_error() {
        let path = env::temp_dir().join("cropfit_test_missing_config.yaml");
        let _ = fs::remove_file(&path);

        let err = load_config(Some(path)).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_load_config_resolves_relative_catalog() {
        let dir = env::temp_dir().join("cropfit_test_config_dir");
        ensure_dir(&dir).unwrap();
        let path = dir.join("config.yaml");
        fs::write(&path, "catalog: crops.yaml\ntop: 2\n").unwrap();

        let config = load_config(Some(path.clone())).unwrap();
        assert_eq!(config.catalog, Some(dir.join("crops.yaml")));
        assert_eq!(config.top(), 2);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_config_keeps_absolute_catalog() {
        let dir = env::temp_dir().join("cropfit_test_config_abs");
        ensure_dir(&dir).unwrap();
        let path = dir.join("config.yaml");
        let catalog = env::temp_dir().join("elsewhere.yaml");
        fs::write(&path, format!("catalog: {}\n", catalog.display())).unwrap();

        let config = load_config(Some(path.clone())).unwrap();
        assert_eq!(config.catalog, Some(catalog));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_invalid_yaml() {
        let path = env::temp_dir().join("cropfit_test_invalid_config.yaml");
        fs::write(&path, "top: [not, a, number]\n").unwrap();

        let err = load_config(Some(path.clone())).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));

        let _ = fs::remove_file(&path);
    }
}
