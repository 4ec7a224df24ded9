use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::{ensure_dir, Config, DEFAULT_TOP};
use crate::catalog::builtin_catalog;

const CONFIG_FILE: &str = "config.yaml";
const CATALOG_FILE: &str = "catalog.yaml";

#[derive(Debug, Clone, PartialEq)]
pub struct InitOutcome {
    pub config_path: PathBuf,
    pub catalog_path: PathBuf,
}

/// Write a starter `config.yaml` and an editable copy of the built-in
/// catalog into `dir`.
///
/// Existing files are left untouched unless `force` is set.
pub fn write_starter_files(dir: &Path, force: bool) -> Result<InitOutcome> {
    let config_path = dir.join(CONFIG_FILE);
    let catalog_path = dir.join(CATALOG_FILE);

    if !force {
        for path in [&config_path, &catalog_path] {
            if path.exists() {
                anyhow::bail!(
                    "{} already exists; pass --force to overwrite it",
                    path.display()
                );
            }
        }
    }

    ensure_dir(dir)?;

    let config = Config {
        catalog: Some(PathBuf::from(CATALOG_FILE)),
        top: Some(DEFAULT_TOP),
        ..Config::default()
    };
    let config_yaml = serde_saphyr::to_string(&config).context("Failed to serialize config")?;
    write_atomically(&config_path, &config_yaml)?;

    let catalog_yaml =
        serde_saphyr::to_string(&builtin_catalog()).context("Failed to serialize catalog")?;
    write_atomically(&catalog_path, &catalog_yaml)?;

    tracing::info!(dir = %dir.display(), "wrote starter config and catalog");

    Ok(InitOutcome {
        config_path,
        catalog_path,
    })
}

/// Write `contents` so the file is never left half-written.
fn write_atomically(path: &Path, contents: &str) -> Result<()> {
    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    file.write_all(contents.as_bytes())
        .with_context(|| format!("Failed to write {}", path.display()))?;

    file.commit()
        .with_context(|| format!("Failed to save {}", path.display()))?;

    Ok(())
}
