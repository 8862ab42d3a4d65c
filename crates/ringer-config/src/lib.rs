use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

const APP_DIR: &str = "ringer";
const CONFIG_FILENAME: &str = "config.toml";

pub const DEFAULT_MAX_PHONE_NUMBER_LENGTH: usize = 7;
pub const MAX_PHONE_NUMBER_LENGTH_LIMIT: usize = 32;
pub const DEFAULT_HISTORY_LIST: &str = "call-history";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub matching: MatchingConfig,
    pub history: HistoryConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchingConfig {
    pub max_phone_number_length: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryConfig {
    pub list: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            matching: MatchingConfig {
                max_phone_number_length: DEFAULT_MAX_PHONE_NUMBER_LENGTH,
            },
            history: HistoryConfig {
                list: DEFAULT_HISTORY_LIST.to_string(),
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid config path: {0}")]
    InvalidConfigPath(PathBuf),
    #[error("config file not found: {0}")]
    MissingConfigFile(PathBuf),
    #[error("config file permissions too permissive: {0}")]
    InsecurePermissions(PathBuf),
    #[error("invalid max_phone_number_length value: {0}")]
    InvalidMatchingWindow(i64),
    #[error("invalid history list name: {0:?}")]
    InvalidHistoryList(String),
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    matching: Option<MatchingFile>,
    history: Option<HistoryFile>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MatchingFile {
    max_phone_number_length: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct HistoryFile {
    list: Option<String>,
}

pub fn load(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let required = config_path.is_some();
    let path = match resolve_config_path(config_path) {
        Ok(path) => path,
        Err(ConfigError::MissingHomeDir) if !required => return Ok(AppConfig::default()),
        Err(ConfigError::InvalidConfigPath(_)) if !required => return Ok(AppConfig::default()),
        Err(err) => return Err(err),
    };
    match load_at_path(&path, required)? {
        Some(config) => Ok(config),
        None => Ok(AppConfig::default()),
    }
}

pub fn resolve_config_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    match custom {
        Some(path) => {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidConfigPath(path));
            }
            Ok(path)
        }
        None => {
            let base = if let Some(dir) = env::var_os("XDG_CONFIG_HOME") {
                let path = PathBuf::from(dir);
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::InvalidConfigPath(path));
                }
                path
            } else {
                let home = dirs::home_dir().ok_or(ConfigError::MissingHomeDir)?;
                home.join(".config")
            };
            Ok(base.join(APP_DIR).join(CONFIG_FILENAME))
        }
    }
}

/// Accepts a matching window in `1..=MAX_PHONE_NUMBER_LENGTH_LIMIT`.
pub fn validate_matching_window(value: i64) -> Result<usize> {
    match usize::try_from(value) {
        Ok(window) if (1..=MAX_PHONE_NUMBER_LENGTH_LIMIT).contains(&window) => Ok(window),
        _ => Err(ConfigError::InvalidMatchingWindow(value)),
    }
}

fn load_at_path(path: &Path, required: bool) -> Result<Option<AppConfig>> {
    if !path.exists() {
        if required {
            return Err(ConfigError::MissingConfigFile(path.to_path_buf()));
        }
        return Ok(None);
    }

    ensure_permissions(path)?;
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: ConfigFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(merge_config(parsed)?))
}

fn merge_config(parsed: ConfigFile) -> Result<AppConfig> {
    let mut config = AppConfig::default();

    if let Some(matching) = parsed.matching {
        if let Some(window) = matching.max_phone_number_length {
            config.matching.max_phone_number_length = validate_matching_window(window)?;
        }
    }

    if let Some(history) = parsed.history {
        if let Some(list) = history.list {
            let trimmed = list.trim();
            if trimmed.is_empty() {
                return Err(ConfigError::InvalidHistoryList(list));
            }
            config.history.list = trimmed.to_string();
        }
    }

    Ok(config)
}

#[cfg(unix)]
fn ensure_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = fs::metadata(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mode = metadata.permissions().mode();
    if mode & 0o077 != 0 {
        return Err(ConfigError::InsecurePermissions(path.to_path_buf()));
    }
    Ok(())
}

#[cfg(not(unix))]
fn ensure_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{
        load_at_path, merge_config, validate_matching_window, AppConfig, ConfigError, ConfigFile,
        HistoryFile, MatchingFile,
    };
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn restrict_permissions(path: &Path) {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(path).expect("metadata").permissions();
            perms.set_mode(0o600);
            fs::set_permissions(path, perms).expect("chmod");
        }
    }

    #[test]
    fn merge_config_applies_values() {
        let parsed = ConfigFile {
            matching: Some(MatchingFile {
                max_phone_number_length: Some(9),
            }),
            history: Some(HistoryFile {
                list: Some(" calls ".to_string()),
            }),
        };
        let merged = merge_config(parsed).expect("merge");
        assert_eq!(merged.matching.max_phone_number_length, 9);
        assert_eq!(merged.history.list, "calls");
    }

    #[test]
    fn merge_config_keeps_defaults_for_missing_sections() {
        let parsed = ConfigFile {
            matching: None,
            history: None,
        };
        assert_eq!(merge_config(parsed).expect("merge"), AppConfig::default());
    }

    #[test]
    fn matching_window_bounds() {
        assert!(matches!(
            validate_matching_window(0),
            Err(ConfigError::InvalidMatchingWindow(0))
        ));
        assert!(matches!(
            validate_matching_window(-3),
            Err(ConfigError::InvalidMatchingWindow(-3))
        ));
        assert!(validate_matching_window(33).is_err());
        assert_eq!(validate_matching_window(1).expect("valid"), 1);
        assert_eq!(validate_matching_window(32).expect("valid"), 32);
    }

    #[test]
    fn load_at_path_requires_file_when_requested() {
        let temp = TempDir::new().expect("tempdir");
        let missing = temp.path().join("config.toml");
        let err = load_at_path(&missing, true).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("config file not found"));
        assert!(load_at_path(&missing, false).expect("optional").is_none());
    }

    #[test]
    fn load_at_path_parses_toml() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            "[matching]\nmax_phone_number_length = 10\n[history]\nlist = \"work-phone\"\n",
        )
        .expect("write config");
        restrict_permissions(&path);

        let config = load_at_path(&path, true).expect("load").expect("config");
        assert_eq!(config.matching.max_phone_number_length, 10);
        assert_eq!(config.history.list, "work-phone");
    }

    #[test]
    fn load_at_path_rejects_unknown_keys() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(&path, "[matching]\nwindow = 10\n").expect("write config");
        restrict_permissions(&path);

        let err = load_at_path(&path, true).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn load_at_path_rejects_world_readable_file() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(&path, "").expect("write config");
        let mut perms = fs::metadata(&path).expect("metadata").permissions();
        perms.set_mode(0o644);
        fs::set_permissions(&path, perms).expect("chmod");

        let err = load_at_path(&path, true).unwrap_err();
        assert!(matches!(err, ConfigError::InsecurePermissions(_)));
    }
}
