//! Configuration module
//!
//! Handles loading and validating settings from YAML files and environment variables.
//! Settings are passed explicitly to constructors; nothing here is global.

mod settings;

pub use settings::*;

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Locate and load settings, falling back to defaults
///
/// `OPENSEARCH_SETTINGS_PATH` is checked first, then `opensearch.yml` in the
/// working directory, `config/`, and the user configuration directory.
/// Environment overrides are applied in every case.
pub fn discover() -> Result<Settings> {
    if let Ok(path) = std::env::var("OPENSEARCH_SETTINGS_PATH") {
        let path = PathBuf::from(path);
        if path.exists() {
            return load_from(&path);
        }
        warn!(
            "OPENSEARCH_SETTINGS_PATH points to missing file {}, searching default locations",
            path.display()
        );
    }

    let paths = [
        PathBuf::from("opensearch.yml"),
        PathBuf::from("config/opensearch.yml"),
        dirs::config_dir()
            .map(|p| p.join("scout-opensearch/opensearch.yml"))
            .unwrap_or_default(),
    ];

    for path in paths.iter() {
        if !path.as_os_str().is_empty() && path.exists() {
            return load_from(path);
        }
    }

    info!("No settings file found, using defaults");
    let mut settings = Settings::default();
    settings.merge_env();
    settings.validate()?;
    Ok(settings)
}

fn load_from(path: &Path) -> Result<Settings> {
    info!("Loading settings from: {}", path.display());
    let mut settings = Settings::from_file(path)?;
    settings.merge_env();
    settings.validate()?;
    Ok(settings)
}

/// Serializes tests that touch process environment variables
#[cfg(test)]
pub(crate) static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_discover_follows_settings_path() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "engine:\n  url: https://discovered.example.com\nsoft_delete: true"
        )
        .unwrap();

        std::env::set_var("OPENSEARCH_SETTINGS_PATH", file.path());
        std::env::remove_var("OPENSEARCH_HOST");
        std::env::remove_var("OPENSEARCH_SOFT_DELETE");
        let settings = discover();
        std::env::remove_var("OPENSEARCH_SETTINGS_PATH");

        let settings = settings.unwrap();
        assert_eq!(settings.engine.url, "https://discovered.example.com");
        assert!(settings.soft_delete);
    }

    #[test]
    fn test_discover_applies_env_to_settings_file() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "engine:\n  url: https://discovered.example.com").unwrap();

        std::env::set_var("OPENSEARCH_SETTINGS_PATH", file.path());
        std::env::set_var("OPENSEARCH_HOST", "http://override.example.com:9200");
        let settings = discover();
        std::env::remove_var("OPENSEARCH_SETTINGS_PATH");
        std::env::remove_var("OPENSEARCH_HOST");

        assert_eq!(
            settings.unwrap().engine.url,
            "http://override.example.com:9200"
        );
    }

    #[test]
    fn test_discover_rejects_invalid_settings_file() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "engine:\n  request_timeout: .nan").unwrap();

        std::env::set_var("OPENSEARCH_SETTINGS_PATH", file.path());
        std::env::remove_var("OPENSEARCH_HOST");
        let settings = discover();
        std::env::remove_var("OPENSEARCH_SETTINGS_PATH");

        assert!(settings.is_err());
    }
}
