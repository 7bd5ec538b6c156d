use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use callbook_core::DEFAULT_REPORT_TITLE;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

const APP_DIR: &str = "callbook";
const CONFIG_FILENAME: &str = "config.toml";

pub const DEFAULT_COLLECTION: &str = "calls";
pub const DEFAULT_PASSWORD_ENV: &str = "CALLBOOK_PASSWORD";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub firestore: Option<FirestoreConfig>,
    pub report: ReportConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub backend: BackendKind,
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Sqlite,
    Firestore,
}

#[derive(Clone, PartialEq, Eq)]
pub struct FirestoreConfig {
    pub project_id: String,
    pub api_key: String,
    pub collection: String,
    pub email: Option<String>,
    /// Environment variable holding the sign-in password.
    pub password_env: String,
    pub endpoint: Option<String>,
    pub auth_endpoint: Option<String>,
}

impl std::fmt::Debug for FirestoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirestoreConfig")
            .field("project_id", &self.project_id)
            .field("collection", &self.collection)
            .field("email", &self.email)
            .field("password_env", &self.password_env)
            .field("endpoint", &self.endpoint)
            .field("auth_endpoint", &self.auth_endpoint)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    pub title: String,
    pub timezone: ReportTimezone,
}

/// Offset used to bucket calls by weekday and to print timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportTimezone {
    Local,
    Utc,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig {
                backend: BackendKind::Sqlite,
                path: None,
            },
            firestore: None,
            report: ReportConfig {
                title: DEFAULT_REPORT_TITLE.to_string(),
                timezone: ReportTimezone::Local,
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
    #[error("store backend is firestore but the [firestore] section is missing")]
    MissingFirestoreSection,
    #[error("invalid {field} value: must not be empty")]
    EmptyValue { field: &'static str },
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
    store: Option<StoreFile>,
    firestore: Option<FirestoreFile>,
    report: Option<ReportFile>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct StoreFile {
    backend: Option<BackendKind>,
    path: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FirestoreFile {
    project_id: String,
    api_key: String,
    collection: Option<String>,
    email: Option<String>,
    password_env: Option<String>,
    endpoint: Option<String>,
    auth_endpoint: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ReportFile {
    title: Option<String>,
    timezone: Option<ReportTimezone>,
}

pub fn load(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let required = config_path.is_some();
    let path = match resolve_config_path(config_path.clone()) {
        Ok(path) => path,
        Err(ConfigError::MissingHomeDir) if !required => return Ok(AppConfig::default()),
        Err(ConfigError::InvalidConfigPath(_)) if !required => return Ok(AppConfig::default()),
        Err(err) => return Err(err),
    };
    match load_at_path(&path, required)? {
        Some(config) => Ok(config),
        None => {
            debug!(path = %path.display(), "no config file, using defaults");
            Ok(AppConfig::default())
        }
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
    let config = merge_config(parsed)?;
    debug!(path = %path.display(), backend = ?config.store.backend, "config loaded");
    Ok(Some(config))
}

fn merge_config(parsed: ConfigFile) -> Result<AppConfig> {
    let mut config = AppConfig::default();

    if let Some(store) = parsed.store {
        if let Some(backend) = store.backend {
            config.store.backend = backend;
        }
        if let Some(path) = store.path {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::EmptyValue {
                    field: "store.path",
                });
            }
            config.store.path = Some(path);
        }
    }

    if let Some(firestore) = parsed.firestore {
        config.firestore = Some(merge_firestore(firestore)?);
    }
    if config.store.backend == BackendKind::Firestore && config.firestore.is_none() {
        return Err(ConfigError::MissingFirestoreSection);
    }

    if let Some(report) = parsed.report {
        if let Some(title) = report.title {
            config.report.title = required_value(title, "report.title")?;
        }
        if let Some(timezone) = report.timezone {
            config.report.timezone = timezone;
        }
    }

    Ok(config)
}

fn merge_firestore(file: FirestoreFile) -> Result<FirestoreConfig> {
    Ok(FirestoreConfig {
        project_id: required_value(file.project_id, "firestore.project_id")?,
        api_key: required_value(file.api_key, "firestore.api_key")?,
        collection: match file.collection {
            Some(collection) => required_value(collection, "firestore.collection")?,
            None => DEFAULT_COLLECTION.to_string(),
        },
        email: optional_value(file.email),
        password_env: match file.password_env {
            Some(name) => required_value(name, "firestore.password_env")?,
            None => DEFAULT_PASSWORD_ENV.to_string(),
        },
        endpoint: optional_value(file.endpoint),
        auth_endpoint: optional_value(file.auth_endpoint),
    })
}

fn required_value(value: String, field: &'static str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::EmptyValue { field });
    }
    Ok(trimmed.to_string())
}

fn optional_value(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
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
        load_at_path, merge_config, BackendKind, ConfigError, ConfigFile, ReportFile,
        ReportTimezone, StoreFile, DEFAULT_COLLECTION, DEFAULT_PASSWORD_ENV,
    };
    use callbook_core::DEFAULT_REPORT_TITLE;
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

    fn write_config(temp: &TempDir, contents: &str) -> std::path::PathBuf {
        let path = temp.path().join("config.toml");
        fs::write(&path, contents).expect("write config");
        restrict_permissions(&path);
        path
    }

    #[test]
    fn merge_config_applies_values() {
        let parsed = ConfigFile {
            store: Some(StoreFile {
                backend: Some(BackendKind::Sqlite),
                path: Some("/tmp/calls.sqlite3".into()),
            }),
            firestore: None,
            report: Some(ReportFile {
                title: Some("  Weekly calls ".to_string()),
                timezone: Some(ReportTimezone::Utc),
            }),
        };
        let merged = merge_config(parsed).expect("merge");
        assert_eq!(merged.store.backend, BackendKind::Sqlite);
        assert_eq!(
            merged.store.path.as_deref(),
            Some(Path::new("/tmp/calls.sqlite3"))
        );
        assert_eq!(merged.report.title, "Weekly calls");
        assert_eq!(merged.report.timezone, ReportTimezone::Utc);
    }

    #[test]
    fn empty_file_gives_defaults() {
        let temp = TempDir::new().expect("tempdir");
        let path = write_config(&temp, "");
        let config = load_at_path(&path, true).expect("load").expect("config");
        assert_eq!(config.store.backend, BackendKind::Sqlite);
        assert!(config.firestore.is_none());
        assert_eq!(config.report.title, DEFAULT_REPORT_TITLE);
        assert_eq!(config.report.timezone, ReportTimezone::Local);
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
    fn load_at_path_parses_firestore_section() {
        let temp = TempDir::new().expect("tempdir");
        let path = write_config(
            &temp,
            "[store]\nbackend = \"firestore\"\n\n[firestore]\nproject_id = \"demo-calls\"\napi_key = \"key-123\"\nemail = \"agent@gmail.com\"\n",
        );

        let config = load_at_path(&path, true).expect("load").expect("config");
        assert_eq!(config.store.backend, BackendKind::Firestore);
        let firestore = config.firestore.expect("firestore");
        assert_eq!(firestore.project_id, "demo-calls");
        assert_eq!(firestore.api_key, "key-123");
        assert_eq!(firestore.collection, DEFAULT_COLLECTION);
        assert_eq!(firestore.email.as_deref(), Some("agent@gmail.com"));
        assert_eq!(firestore.password_env, DEFAULT_PASSWORD_ENV);
        assert!(!format!("{:?}", firestore).contains("key-123"));
    }

    #[test]
    fn firestore_backend_requires_section() {
        let temp = TempDir::new().expect("tempdir");
        let path = write_config(&temp, "[store]\nbackend = \"firestore\"\n");
        let err = load_at_path(&path, true).unwrap_err();
        assert!(matches!(err, ConfigError::MissingFirestoreSection));
    }

    #[test]
    fn rejects_unknown_keys_and_blank_values() {
        let temp = TempDir::new().expect("tempdir");
        let path = write_config(&temp, "[report]\ntitle = \"Calls\"\ncolour = \"red\"\n");
        let err = load_at_path(&path, true).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));

        let path = write_config(&temp, "[report]\ntitle = \"   \"\n");
        let err = load_at_path(&path, true).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::EmptyValue {
                field: "report.title"
            }
        ));

        let path = write_config(&temp, "[store]\nbackend = \"postgres\"\n");
        assert!(load_at_path(&path, true).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn rejects_group_readable_file() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().expect("tempdir");
        let path = write_config(&temp, "");
        let mut perms = fs::metadata(&path).expect("metadata").permissions();
        perms.set_mode(0o644);
        fs::set_permissions(&path, perms).expect("chmod");

        let err = load_at_path(&path, true).unwrap_err();
        assert!(matches!(err, ConfigError::InsecurePermissions(_)));
    }
}
