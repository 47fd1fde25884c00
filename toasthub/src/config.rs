use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::AppError;

pub const ENV_CONFIG: &str = "TOASTHUB_CONFIG";

/// Manager defaults; every field can be overridden per `notify` call except
/// `capacity`, which is adjusted at runtime via `set_capacity`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManagerConfig {
    /// Most toasts kept active at once; the oldest is evicted beyond this.
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    /// Lifetime applied when a `notify` call does not specify one.
    #[serde(default = "default_duration_ms")]
    pub default_duration_ms: u64,
    /// Whether toasts animate a remaining-lifetime indicator by default.
    #[serde(default = "default_show_progress")]
    pub show_progress: bool,
}

fn default_capacity() -> usize {
    5
}

fn default_duration_ms() -> u64 {
    5000
}

fn default_show_progress() -> bool {
    true
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            default_duration_ms: default_duration_ms(),
            show_progress: default_show_progress(),
        }
    }
}

impl ManagerConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.capacity == 0 {
            return Err(AppError::Config("capacity must be at least 1".into()));
        }
        Ok(())
    }

    /// Resolve the config path and load it; a missing file yields defaults.
    pub fn find_and_load(cli_value: Option<PathBuf>) -> Result<(PathBuf, Self), AppError> {
        let path = resolve_config_path(cli_value)?;
        if !path.exists() {
            return Ok((path, Self::default()));
        }
        let cfg = load_config(&path)?;
        Ok((path, cfg))
    }
}

pub fn resolve_config_path(cli_value: Option<PathBuf>) -> Result<PathBuf, AppError> {
    if let Some(p) = cli_value {
        return Ok(p);
    }
    if let Ok(p) = std::env::var(ENV_CONFIG) {
        return Ok(PathBuf::from(p));
    }
    default_config_path().ok_or_else(|| AppError::Config("could not determine config dir".into()))
}

pub fn default_config_path() -> Option<PathBuf> {
    let pd = ProjectDirs::from("dev", "toasthub", "toasthub")?;
    Some(pd.config_dir().join("toasthub.yaml"))
}

pub fn load_config(path: &PathBuf) -> Result<ManagerConfig, AppError> {
    let data = std::fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("read {} failed: {e}", path.display())))?;
    let cfg: ManagerConfig = serde_yaml::from_str(&data)
        .map_err(|e| AppError::Config(format!("parse {} failed: {e}", path.display())))?;
    cfg.validate()?;
    Ok(cfg)
}

pub fn save_config(path: &PathBuf, cfg: &ManagerConfig) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
    let data = serde_yaml::to_string(cfg)
        .map_err(|e| AppError::Config(format!("serialize config failed: {e}")))?;
    std::fs::write(path, data)
        .map_err(|e| AppError::Config(format!("write {} failed: {e}", path.display())))
}
