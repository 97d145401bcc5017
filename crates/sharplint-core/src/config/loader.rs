//! Configuration file discovery and loading

use std::fs;
use std::path::{Path, PathBuf};

use super::AnalyzerOptions;
use crate::error::SharplintError;
use crate::result::Result;

/// File names searched for, in priority order
const CONFIG_FILE_NAMES: &[&str] = &[
    ".sharplintrc.json",
    ".sharplintrc.toml",
    "sharplint.json",
    "sharplint.toml",
];

/// Configuration loader for discovering and loading config files
pub struct ConfigLoader;

impl ConfigLoader {
    pub fn from_json_str(content: &str) -> Result<AnalyzerOptions> {
        serde_json::from_str(content).map_err(|e| SharplintError::ConfigError {
            message: format!("Invalid JSON configuration: {e}"),
        })
    }

    pub fn from_toml_str(content: &str) -> Result<AnalyzerOptions> {
        toml::from_str(content).map_err(|e| SharplintError::ConfigError {
            message: format!("Invalid TOML configuration: {e}"),
        })
    }

    /// Load configuration from a specific file
    ///
    /// The format is chosen by extension: `.toml` or `.json`.
    pub fn load_from_file(path: &Path) -> Result<AnalyzerOptions> {
        let content =
            fs::read_to_string(path).map_err(|e| SharplintError::io_error(path, e))?;
        let options = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml_str(&content),
            Some("json") => Self::from_json_str(&content),
            other => Err(SharplintError::config_error(format!(
                "Unsupported config format {:?} for '{}'",
                other.unwrap_or(""),
                path.display()
            ))),
        }?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(options)
    }

    /// Auto-discover a config file by traversing upward from `start_path`
    pub fn auto_discover(start_path: &Path) -> Result<Option<PathBuf>> {
        let mut current = start_path
            .canonicalize()
            .map_err(|e| SharplintError::ConfigError {
                message: format!("Invalid path: {e}"),
            })?;

        loop {
            for filename in CONFIG_FILE_NAMES {
                let config_path = current.join(filename);
                if config_path.is_file() {
                    tracing::debug!("Found config: {}", config_path.display());
                    return Ok(Some(config_path));
                }
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => break,
            }
        }

        Ok(None)
    }

    /// Load the discovered config, or defaults when none exists
    pub fn load_or_default(start_dir: &Path) -> Result<AnalyzerOptions> {
        match Self::auto_discover(start_dir)? {
            Some(path) => Self::load_from_file(&path),
            None => Ok(AnalyzerOptions::default()),
        }
    }
}

/// JSON schema of the configuration file
pub fn config_schema() -> Result<serde_json::Value> {
    let schema = schemars::schema_for!(AnalyzerOptions);
    let mut value = serde_json::to_value(schema)
        .map_err(|e| SharplintError::internal_error(format!("schema serialization: {e}")))?;
    value["title"] = serde_json::Value::String("sharplint configuration".to_string());
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuleSeverity;
    use tempfile::TempDir;

    fn create_temp_config(dir: &Path, filename: &str, content: &str) -> PathBuf {
        let path = dir.join(filename);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_from_file_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_temp_config(
            temp_dir.path(),
            ".sharplintrc.json",
            r#"{ "maxFixIterations": 4, "rules": { "severities": { "style/reorder-modifiers": "error" } } }"#,
        );

        let options = ConfigLoader::load_from_file(&path).unwrap();
        assert_eq!(options.max_fix_iterations, 4);
        assert_eq!(
            options.rules.severities.get("style/reorder-modifiers"),
            Some(&RuleSeverity::Error)
        );
        // Unspecified fields keep their defaults
        assert!(options.fade_out);
    }

    #[test]
    fn test_load_from_file_toml() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_temp_config(
            temp_dir.path(),
            "sharplint.toml",
            "modifierOrder = [\"static\", \"public\"]\nfadeOut = false\n\n[rules]\ndisabled = [\"style/default-label-should-be-last\"]\n",
        );

        let options = ConfigLoader::load_from_file(&path).unwrap();
        assert_eq!(options.modifier_order, vec!["static", "public"]);
        assert!(!options.fade_out);
        assert_eq!(options.rules.disabled.len(), 1);
    }

    #[test]
    fn test_auto_discover_walks_upward() {
        let temp_dir = TempDir::new().unwrap();
        create_temp_config(temp_dir.path(), ".sharplintrc.json", "{}");
        let nested = temp_dir.path().join("src").join("nested");
        fs::create_dir_all(&nested).unwrap();

        let found = ConfigLoader::auto_discover(&nested).unwrap().unwrap();
        assert!(found.ends_with(".sharplintrc.json"));
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let err = ConfigLoader::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, SharplintError::ConfigError { .. }));
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_temp_config(temp_dir.path(), "sharplint.yaml", "x: 1");
        assert!(ConfigLoader::load_from_file(&path).is_err());
    }

    #[test]
    fn test_schema_mentions_modifier_order() {
        let schema = config_schema().unwrap();
        let text = schema.to_string();
        assert!(text.contains("modifierOrder"));
    }
}
