use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use directories::ProjectDirs;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use which::which;

use crate::{read_json_file, write_json_atomic, Principal, Result, WellError};

/// Application configuration settings.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Config {
    /// File holding the local wellness store
    pub data_file: PathBuf,

    /// Principal of the signed-in user, if any
    #[serde(default)]
    pub principal: Option<String>,

    /// Editor used for journal entries
    #[serde(default)]
    pub editor_command: Option<String>,

    /// Seconds before a cached query is refetched (0 keeps it until invalidated)
    #[serde(default)]
    pub cache_ttl_secs: u64,
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "wellkeep")
}

/// Where the configuration lives unless `--config` says otherwise.
pub fn default_config_path() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.config_dir().join("config.json"))
        .unwrap_or_else(|| PathBuf::from("wellkeep-config.json"))
}

impl Default for Config {
    fn default() -> Self {
        let data_file = project_dirs()
            .map(|dirs| dirs.data_dir().join("wellkeep.json"))
            .unwrap_or_else(|| PathBuf::from("wellkeep.json"));

        Self {
            data_file,
            principal: None,
            editor_command: None,
            cache_ttl_secs: 0,
        }
    }
}

impl Config {
    /// Loads the configuration, falling back to defaults when the file is missing.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        read_json_file(path)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        write_json_atomic(path, self)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// The signed-in identity, validated.
    pub fn principal(&self) -> Result<Option<Principal>> {
        self.principal.as_deref().map(Principal::parse).transpose()
    }

    pub fn cache_ttl(&self) -> Option<Duration> {
        (self.cache_ttl_secs > 0).then(|| Duration::from_secs(self.cache_ttl_secs))
    }

    /// Updates one setting from `config --set key=value`.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "data_file" => {
                if value.is_empty() {
                    return Err(WellError::ConfigError {
                        message: "data_file cannot be empty".to_string(),
                    });
                }
                self.data_file = PathBuf::from(value);
            }
            "principal" => {
                self.principal = if value.is_empty() {
                    None
                } else {
                    Some(Principal::parse(value)?.to_string())
                };
            }
            "editor_command" => {
                self.editor_command = (!value.is_empty()).then(|| value.to_string());
            }
            "cache_ttl_secs" => {
                self.cache_ttl_secs = value.parse().map_err(|_| WellError::ConfigError {
                    message: format!("cache_ttl_secs must be a whole number, got '{}'", value),
                })?;
            }
            other => {
                return Err(WellError::ConfigError {
                    message: format!("Unknown setting: {}", other),
                })
            }
        }
        Ok(())
    }

    // This method provides smart fallbacks when no editor is configured
    pub fn get_editor_command(&self) -> String {
        if let Some(editor) = &self.editor_command {
            return editor.clone();
        }

        if let Ok(editor) = std::env::var("EDITOR") {
            return editor;
        }

        if cfg!(windows) {
            "notepad".to_string()
        } else if cfg!(target_os = "macos") {
            "open -W -t".to_string()
        } else {
            for editor in &["nano", "vim", "vi", "emacs"] {
                if which(editor).is_ok() {
                    return editor.to_string();
                }
            }
            "nano".to_string()
        }
    }
}
