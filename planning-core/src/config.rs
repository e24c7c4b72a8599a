//! Planning configuration.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{PlanningError, PlanningResult};
use crate::export::DEFAULT_EXPORT_FILENAME;
use crate::remote::{HttpSource, ProviderSource, RemoteSource};

static DEFAULT_DATA_DIR: &str = "~/.local/share/planning";

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn default_export_filename() -> String {
    DEFAULT_EXPORT_FILENAME.to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Global configuration at ~/.config/planning/config.toml
///
/// Every key can be overridden from the environment with the `PLANNING_`
/// prefix, e.g. `PLANNING_LOG_LEVEL=debug` or `PLANNING_REMOTE__URL=...`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlanningConfig {
    /// Where the planning, user events and refresh time are kept
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Where exports are written (defaults to the downloads directory)
    #[serde(default)]
    pub export_dir: Option<PathBuf>,

    #[serde(default = "default_export_filename")]
    pub export_filename: String,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub remote: Option<RemoteConfig>,
}

impl Default for PlanningConfig {
    fn default() -> Self {
        PlanningConfig {
            data_dir: default_data_dir(),
            export_dir: None,
            export_filename: default_export_filename(),
            log_level: default_log_level(),
            remote: None,
        }
    }
}

/// Where the planning is fetched from.
///
/// Either a provider binary (`provider = "aurion"` runs
/// `planning-provider-aurion`) or a plain JSON endpoint (`url = ...`). Any
/// other key is passed to the provider untouched.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct RemoteConfig {
    pub provider: Option<String>,
    pub url: Option<String>,
    pub token: Option<String>,
    #[serde(flatten)]
    pub params: HashMap<String, toml::Value>,
}

impl From<&RemoteConfig> for serde_json::Map<String, serde_json::Value> {
    fn from(config: &RemoteConfig) -> Self {
        config
            .params
            .iter()
            .filter_map(|(k, v)| serde_json::to_value(v).ok().map(|v| (k.clone(), v)))
            .collect()
    }
}

impl RemoteConfig {
    pub fn source(&self) -> PlanningResult<Arc<dyn RemoteSource>> {
        if let Some(provider) = &self.provider {
            return Ok(Arc::new(ProviderSource::new(
                provider,
                serde_json::Map::from(self),
            )));
        }

        if let Some(url) = &self.url {
            return Ok(Arc::new(HttpSource::new(url, self.token.clone())?));
        }

        Err(PlanningError::NoRemoteConfigured)
    }
}

impl PlanningConfig {
    pub fn config_path() -> PlanningResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| PlanningError::Config("Could not determine config directory".into()))?
            .join("planning");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the global config, creating a commented default on first run.
    pub fn load() -> PlanningResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> PlanningResult<Self> {
        Self::load_with_env(path, environment())
    }

    fn load_with_env(path: &Path, env: Environment) -> PlanningResult<Self> {
        Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(env)
            .build()
            .map_err(|e| PlanningError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| PlanningError::Config(e.to_string()))
    }

    pub fn data_path(&self) -> PathBuf {
        expand(&self.data_dir)
    }

    pub fn export_path(&self) -> PathBuf {
        match &self.export_dir {
            Some(dir) => expand(dir),
            None => dirs::download_dir().unwrap_or_else(|| PathBuf::from(".")),
        }
    }

    pub fn remote_source(&self) -> PlanningResult<Arc<dyn RemoteSource>> {
        self.remote
            .as_ref()
            .ok_or(PlanningError::NoRemoteConfigured)?
            .source()
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> PlanningResult<()> {
        let contents = format!(
            "\
# planning configuration

# Where the cached planning and your own events are kept:
# data_dir = \"{}\"

# Where `planning export` writes the .ics file (defaults to ~/Downloads):
# export_dir = \"~/Documents\"
# export_filename = \"{}\"

# Log level (error, warn, info, debug, trace). RUST_LOG takes precedence.
# log_level = \"warn\"

# Where the planning comes from. Either a provider binary in PATH:
# [remote]
# provider = \"aurion\"
#
# or a JSON endpoint returning an array of events:
# [remote]
# url = \"https://example.org/api/planning\"
# token = \"...\"
",
            DEFAULT_DATA_DIR, DEFAULT_EXPORT_FILENAME
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                PlanningError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| PlanningError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

fn expand(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}

/// `PLANNING_LOG_LEVEL` sets `log_level`, `PLANNING_REMOTE__URL` sets `remote.url`.
fn environment() -> Environment {
    Environment::with_prefix("PLANNING")
        .prefix_separator("_")
        .separator("__")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_file_loads_as_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("planning/config.toml");

        PlanningConfig::create_default_config(&path).unwrap();
        let config = PlanningConfig::load_from(&path).unwrap();

        assert_eq!(config.data_dir, default_data_dir());
        assert_eq!(config.export_filename, "planning.ics");
        assert!(config.remote.is_none());
        assert!(matches!(
            config.remote_source(),
            Err(PlanningError::NoRemoteConfigured)
        ));
    }

    #[test]
    fn test_remote_provider_params_are_passed_through() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "data_dir = \"/tmp/planning-data\"\n\n[remote]\nprovider = \"aurion\"\nschool = \"isen\"\n",
        )
        .unwrap();

        let config = PlanningConfig::load_from(&path).unwrap();
        let remote = config.remote.as_ref().expect("remote table");

        assert_eq!(config.data_path(), PathBuf::from("/tmp/planning-data"));
        assert_eq!(remote.provider.as_deref(), Some("aurion"));
        let params = serde_json::Map::from(remote);
        assert_eq!(params.get("school"), Some(&serde_json::Value::from("isen")));
        assert!(!params.contains_key("provider"));
    }

    #[test]
    fn test_tilde_is_expanded() {
        let config = PlanningConfig {
            export_dir: Some(PathBuf::from("~/exports")),
            ..PlanningConfig::default()
        };

        assert!(!config.export_path().to_string_lossy().starts_with('~'));
        assert!(!config.data_path().to_string_lossy().starts_with('~'));
    }

    #[test]
    fn test_environment_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "log_level = \"warn\"\n\n[remote]\nurl = \"https://old.example\"\n").unwrap();

        let mut vars = config::Map::new();
        vars.insert("PLANNING_LOG_LEVEL".to_string(), "debug".to_string());
        vars.insert(
            "PLANNING_REMOTE__URL".to_string(),
            "https://planning.example/api".to_string(),
        );
        vars.insert("OTHER_LOG_LEVEL".to_string(), "trace".to_string());

        let config =
            PlanningConfig::load_with_env(&path, environment().source(Some(vars))).unwrap();

        assert_eq!(config.log_level, "debug");
        assert_eq!(
            config.remote.as_ref().and_then(|r| r.url.as_deref()),
            Some("https://planning.example/api")
        );
    }
}
