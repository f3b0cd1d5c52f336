use std::path::{Path, PathBuf};

use depdocs::{DEFAULT_CONCURRENCY, DEFAULT_EXCLUDED_DIRS};
use serde::{Deserialize, Serialize};

pub const DEFAULT_OUTPUT_DIR: &str = ".ai-docs";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_CUSTOM_TIMEOUT_SECS: u64 = 30;

/// Top-level application configuration.
///
/// Every field is optional in the file; missing ones take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub output_dir: PathBuf,
    pub concurrency: usize,
    pub timeout_secs: u64,
    pub custom_timeout_secs: u64,
    pub exclude_dirs: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            concurrency: DEFAULT_CONCURRENCY,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            custom_timeout_secs: DEFAULT_CUSTOM_TIMEOUT_SECS,
            exclude_dirs: DEFAULT_EXCLUDED_DIRS.iter().map(|d| (*d).to_owned()).collect(),
        }
    }
}

/// Config file path: `~/.config/depdocs/config.toml`
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("depdocs").join("config.toml"))
}

/// Load config from the default location, falling back to defaults if it
/// is missing or unreadable.
pub fn load_config() -> AppConfig {
    match config_path() {
        Some(path) => load_from(&path),
        None => AppConfig::default(),
    }
}

pub fn load_from(path: &Path) -> AppConfig {
    let Ok(contents) = std::fs::read_to_string(path) else {
        return AppConfig::default();
    };

    match toml::from_str::<AppConfig>(&contents) {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "warning: failed to parse config at {}, using defaults: {e}",
                path.display()
            );
            AppConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_all_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.output_dir, PathBuf::from(".ai-docs"));
        assert_eq!(config.concurrency, 8);
        assert!(config.exclude_dirs.iter().any(|d| d == "node_modules"));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let toml_str = r#"
concurrency = 2
exclude_dirs = ["vendor"]
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.concurrency, 2);
        assert_eq!(config.exclude_dirs, vec!["vendor"]);
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.custom_timeout_secs, 30);
    }

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_from(&dir.path().join("config.toml"));
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn unparsable_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "concurrency = \"lots\"").unwrap();
        assert_eq!(load_from(&path), AppConfig::default());
    }

    #[test]
    fn reads_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "output_dir = \"docs/deps\"\ntimeout_secs = 3\n").unwrap();

        let config = load_from(&path);
        assert_eq!(config.output_dir, PathBuf::from("docs/deps"));
        assert_eq!(config.timeout_secs, 3);
    }
}
