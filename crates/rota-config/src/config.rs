use serde::{Deserialize, Serialize};
use std::fs::File;
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};
use thiserror::Error;

use rota_types::Profile;

use crate::paths::{get_config_path, get_ledger_path};

struct ConfigLock {
    _file: File,
}

impl ConfigLock {
    fn acquire_exclusive(config_path: &Path) -> Result<Self, std::io::Error> {
        let lock_path = config_path.with_extension("lock");
        if let Some(parent) = lock_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&lock_path)?;
        let fd = file.as_raw_fd();
        let result = unsafe { libc::flock(fd, libc::LOCK_EX) };
        if result != 0 {
            return Err(std::io::Error::last_os_error());
        }
        Ok(ConfigLock { _file: file })
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(default = "default_map_size")]
    pub map_size: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            path: None,
            map_size: default_map_size(),
        }
    }
}

impl LedgerConfig {
    pub fn resolved_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(get_ledger_path)
    }
}

fn default_enabled() -> bool {
    true
}

fn default_map_size() -> u64 {
    64 * 1024 * 1024 // 64MB
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdministratorConfig {
    pub name: String,
    #[serde(default)]
    pub national_id: String,
    pub email: String,
    pub password: String,
}

impl AdministratorConfig {
    pub fn to_profile(&self) -> Profile {
        Profile::new(
            self.name.clone(),
            self.national_id.clone(),
            self.email.clone(),
            self.password.clone(),
        )
    }
}

fn default_administrators() -> Vec<AdministratorConfig> {
    vec![AdministratorConfig {
        name: "Administrator".to_string(),
        national_id: "000.000.000-00".to_string(),
        email: "admin@rota.local".to_string(),
        password: "admin".to_string(),
    }]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub ledger: LedgerConfig,
    #[serde(default = "default_administrators")]
    pub administrators: Vec<AdministratorConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log: LogConfig::default(),
            ledger: LedgerConfig::default(),
            administrators: default_administrators(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&get_config_path())
    }

    /// A missing file is not an error; it yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let _lock = ConfigLock::acquire_exclusive(path)?;
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&get_config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let _lock = ConfigLock::acquire_exclusive(path)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn administrator_profiles(&self) -> Vec<Profile> {
        self.administrators
            .iter()
            .map(AdministratorConfig::to_profile)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.log.level, "info");
        assert!(config.ledger.enabled);
        assert_eq!(config.administrators.len(), 1);
        assert_eq!(config.administrators[0].email, "admin@rota.local");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[ledger]
enabled = false

[[administrators]]
name = "Maria"
email = "maria@agency.com"
password = "s3cret"
"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert!(!config.ledger.enabled);
        assert_eq!(config.ledger.map_size, 64 * 1024 * 1024);
        assert_eq!(config.log.level, "info");
        let admins = config.administrator_profiles();
        assert_eq!(admins.len(), 1);
        assert_eq!(admins[0].name, "Maria");
        assert_eq!(admins[0].national_id, "");
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.log.level = "debug".to_string();
        config.ledger.path = Some(dir.path().join("ledger"));
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.ledger.resolved_path(), dir.path().join("ledger"));
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[ledger\nenabled = ").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::TomlParse(_))
        ));
    }
}
