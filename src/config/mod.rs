use crate::core::timer::MAX_POMODORO_MINUTES;
use crate::db::gateway::DbOptions;
use crate::errors::{AppError, AppResult};
use crate::utils::path::expand_tilde;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

/// Environment variable overriding the configuration directory.
pub const CONFIG_DIR_ENV: &str = "RPOMODORO_CONFIG_DIR";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    #[serde(default = "default_db_name")]
    pub db_name: String,
    #[serde(default = "default_db_version")]
    pub db_version: String,
    #[serde(default = "default_display_name")]
    pub display_name: String,
    #[serde(default = "default_quota_bytes")]
    pub quota_bytes: u64,
    #[serde(default = "default_pomodoro_minutes")]
    pub pomodoro_minutes: u64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_db_name() -> String {
    "Pomodoro1".to_string()
}
fn default_db_version() -> String {
    "1.0".to_string()
}
fn default_display_name() -> String {
    "Pomodoro To-Do".to_string()
}
fn default_quota_bytes() -> u64 {
    2 * 1024 * 1024
}
fn default_pomodoro_minutes() -> u64 {
    45
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: Self::database_file().to_string_lossy().to_string(),
            db_name: default_db_name(),
            db_version: default_db_version(),
            display_name: default_display_name(),
            quota_bytes: default_quota_bytes(),
            pomodoro_minutes: default_pomodoro_minutes(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Return the configuration directory: `$RPOMODORO_CONFIG_DIR` when set,
    /// otherwise `~/.rpomodoro` (or `%APPDATA%\rpomodoro` on Windows).
    pub fn config_dir() -> PathBuf {
        if let Ok(dir) = env::var(CONFIG_DIR_ENV)
            && !dir.trim().is_empty()
        {
            return PathBuf::from(dir);
        }

        if cfg!(target_os = "windows") {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("rpomodoro")
        } else {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".rpomodoro")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rpomodoro.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("rpomodoro.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();

        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path)
            .map_err(|e| AppError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        let cfg: Config = serde_yaml::from_str(&content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> AppResult<()> {
        if !(1..=MAX_POMODORO_MINUTES).contains(&self.pomodoro_minutes) {
            return Err(AppError::Config(format!(
                "pomodoro_minutes must be between 1 and {}",
                MAX_POMODORO_MINUTES
            )));
        }
        if self.database.trim().is_empty() {
            return Err(AppError::Config("database path is empty".into()));
        }
        Ok(())
    }

    /// Storage gateway parameters for this configuration.
    pub fn db_options(&self) -> DbOptions {
        DbOptions {
            path: expand_tilde(&self.database),
            name: self.db_name.clone(),
            version: self.db_version.clone(),
            display_name: self.display_name.clone(),
            size_bytes: self.quota_bytes,
        }
    }

    /// A `--db` value: absolute paths are kept, relative ones live in the config dir.
    pub fn resolve_db_path(name: &str) -> PathBuf {
        let p = expand_tilde(name);
        if p.is_absolute() {
            p
        } else {
            Self::config_dir().join(p)
        }
    }

    /// Initialize configuration and database paths.
    /// Returns the configuration that was written (or would have been, in test mode).
    pub fn init_all(custom_db: Option<String>, is_test: bool) -> AppResult<Config> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        // DB name: user provided or default
        let db_path = match custom_db {
            Some(name) => Self::resolve_db_path(&name),
            None => Self::database_file(),
        };

        let mut config = if Self::config_file().exists() {
            Self::load()?
        } else {
            Config::default()
        };
        config.database = db_path.to_string_lossy().to_string();

        // Write config file
        if !is_test {
            let yaml = serde_yaml::to_string(&config)?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
        }

        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pomodoro_length_must_be_in_range() {
        let mut cfg = Config::default();
        assert!(cfg.validate().is_ok());

        cfg.pomodoro_minutes = 0;
        assert!(matches!(cfg.validate(), Err(AppError::Config(_))));

        cfg.pomodoro_minutes = MAX_POMODORO_MINUTES + 1;
        assert!(matches!(cfg.validate(), Err(AppError::Config(_))));

        cfg.pomodoro_minutes = MAX_POMODORO_MINUTES;
        assert!(cfg.validate().is_ok());
    }
}
