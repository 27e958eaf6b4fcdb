//! Log output for applications that want the registry's diagnostics.
//!
//! The library only emits `tracing` events. Installing a subscriber is the
//! application's call: [`init`] builds one from `LOG_LEVEL` and
//! `LOG_LOCATION` and returns a [`DiagnosticsHandle`] that keeps it active on
//! the current thread until dropped.
//!
//! Events go to stderr. When a log location is set they are also appended to
//! `{LOG_LOCATION}/{YYYY-MM-DD}-logs.txt`, creating the directory if needed.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::NaiveDate;
use tracing::error;
use tracing::level_filters::LevelFilter;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

use crate::env::{EnvironmentProvider, LOG_LEVEL_DEFAULT, LOG_LEVEL_KEY, LOG_LOCATION_KEY};
use crate::error::ConfigError;

/// Settings for [`init`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticsConfig {
    /// `TRACE`, `DEBUG`, `INFO`, `WARN`/`WARNING`, `ERROR`/`CRITICAL`, or `OFF`.
    pub level: String,
    /// Directory for daily log files. `None` logs to stderr only.
    pub log_location: Option<PathBuf>,
}

impl DiagnosticsConfig {
    /// Read `LOG_LEVEL` and `LOG_LOCATION` from a provider. An empty location
    /// means no log file.
    pub fn from_environment(env: &impl EnvironmentProvider) -> Self {
        let location = env.get_log_location();
        Self {
            level: env.get_log_level().to_string(),
            log_location: (!location.is_empty()).then(|| PathBuf::from(location)),
        }
    }

    /// Read `LOG_LEVEL` and `LOG_LOCATION` straight from the process
    /// environment without emitting events, so a subscriber can be installed
    /// before [`Environment::from_process`](crate::Environment::from_process)
    /// reports unset variables.
    pub fn from_process() -> Self {
        Self::from_vars(std::env::vars())
    }

    /// Build from explicit `(name, value)` pairs; absent keys use the defaults.
    pub fn from_vars(vars: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut config = Self::default();
        for (key, value) in vars {
            match key.as_str() {
                LOG_LEVEL_KEY => config.level = value,
                LOG_LOCATION_KEY if !value.is_empty() => {
                    config.log_location = Some(PathBuf::from(value))
                }
                _ => {}
            }
        }
        config
    }
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            level: LOG_LEVEL_DEFAULT.to_string(),
            log_location: None,
        }
    }
}

/// Keeps the installed subscriber active. Dropping it restores the previous one.
#[derive(Debug)]
pub struct DiagnosticsHandle {
    level: LevelFilter,
    log_file: Option<PathBuf>,
    _guard: DefaultGuard,
}

impl DiagnosticsHandle {
    pub fn level(&self) -> LevelFilter {
        self.level
    }

    /// The file events are appended to, if any.
    pub fn log_file(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }
}

/// Map a level name to a filter. Case-insensitive.
pub fn parse_level(level: &str) -> Option<LevelFilter> {
    match level.trim().to_uppercase().as_str() {
        "TRACE" => Some(LevelFilter::TRACE),
        "DEBUG" => Some(LevelFilter::DEBUG),
        "INFO" => Some(LevelFilter::INFO),
        "WARN" | "WARNING" => Some(LevelFilter::WARN),
        "ERROR" | "CRITICAL" => Some(LevelFilter::ERROR),
        "OFF" => Some(LevelFilter::OFF),
        _ => None,
    }
}

/// Name of the log file for `date`.
pub fn log_file_name(date: NaiveDate) -> String {
    format!("{date}-logs.txt")
}

/// Install a subscriber for the current thread.
///
/// An unknown level falls back to `DEBUG` and is reported once the
/// subscriber is live. Fails only if the log directory or file cannot be
/// created.
pub fn init(config: &DiagnosticsConfig) -> Result<DiagnosticsHandle, ConfigError> {
    let parsed = parse_level(&config.level);
    let level = parsed.unwrap_or(LevelFilter::DEBUG);

    let (file_layer, log_file) = match &config.log_location {
        Some(dir) => {
            fs::create_dir_all(dir).map_err(|e| ConfigError::IoError {
                path: dir.clone(),
                source: e,
            })?;
            let path = dir.join(log_file_name(chrono::Local::now().date_naive()));
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|e| ConfigError::IoError {
                    path: path.clone(),
                    source: e,
                })?;
            let layer = fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file));
            (Some(layer), Some(path))
        }
        None => (None, None),
    };

    let subscriber = tracing_subscriber::registry()
        .with(level)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer);
    let guard = tracing::subscriber::set_default(subscriber);

    if parsed.is_none() {
        error!(
            "LOG_LEVEL read in as {}, but this is not a valid log level, defaulting to {LOG_LEVEL_DEFAULT}",
            config.level
        );
    }

    Ok(DiagnosticsHandle {
        level,
        log_file,
        _guard: guard,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::Environment;
    use tempfile::TempDir;
    use tracing::{debug, info};

    #[test]
    fn parse_level_accepts_common_names() {
        assert_eq!(parse_level("debug"), Some(LevelFilter::DEBUG));
        assert_eq!(parse_level(" INFO "), Some(LevelFilter::INFO));
        assert_eq!(parse_level("Warning"), Some(LevelFilter::WARN));
        assert_eq!(parse_level("CRITICAL"), Some(LevelFilter::ERROR));
        assert_eq!(parse_level("off"), Some(LevelFilter::OFF));
        assert_eq!(parse_level("loud"), None);
    }

    #[test]
    fn log_file_name_uses_iso_date() {
        let date = NaiveDate::from_ymd_opt(2023, 4, 29).unwrap();
        assert_eq!(log_file_name(date), "2023-04-29-logs.txt");
    }

    #[test]
    fn config_from_environment() {
        let env = Environment::from_vars([
            ("LOG_LEVEL".to_string(), "INFO".to_string()),
            ("LOG_LOCATION".to_string(), "logs".to_string()),
        ]);
        let config = DiagnosticsConfig::from_environment(&env);
        assert_eq!(config.level, "INFO");
        assert_eq!(config.log_location, Some(PathBuf::from("logs")));

        let config = DiagnosticsConfig::from_environment(&Environment::default());
        assert_eq!(config, DiagnosticsConfig::default());
    }

    #[test]
    fn config_from_vars_reads_only_log_settings() {
        let config = DiagnosticsConfig::from_vars([
            ("LOG_LEVEL".to_string(), "WARN".to_string()),
            ("LOG_LOCATION".to_string(), "/var/log/app".to_string()),
            ("APP_ENVIRONMENT".to_string(), "prod".to_string()),
        ]);
        assert_eq!(config.level, "WARN");
        assert_eq!(config.log_location, Some(PathBuf::from("/var/log/app")));

        let config = DiagnosticsConfig::from_vars([("LOG_LOCATION".to_string(), String::new())]);
        assert_eq!(config, DiagnosticsConfig::default());
    }

    #[test]
    fn environment_warnings_reach_an_installed_subscriber() {
        let capture = crate::fixtures::test::LogCapture::default();
        let _guard = capture.install();
        let _ = Environment::from_vars(std::iter::empty());

        let warnings = capture
            .lines()
            .into_iter()
            .filter(|l| l.contains(" WARN "))
            .count();
        assert_eq!(warnings, 4);
    }

    #[test]
    fn init_without_file() {
        let handle = init(&DiagnosticsConfig::default()).unwrap();
        assert_eq!(handle.level(), LevelFilter::DEBUG);
        assert!(handle.log_file().is_none());
    }

    #[test]
    fn invalid_level_falls_back_to_debug() {
        let handle = init(&DiagnosticsConfig {
            level: "LOUD".into(),
            log_location: None,
        })
        .unwrap();
        assert_eq!(handle.level(), LevelFilter::DEBUG);
    }

    #[test]
    fn file_layer_appends_events() {
        let dir = TempDir::new().unwrap();
        let location = dir.path().join("nested").join("logs");
        let handle = init(&DiagnosticsConfig {
            level: "INFO".into(),
            log_location: Some(location.clone()),
        })
        .unwrap();

        info!("diagnostics file check");
        debug!("filtered out at info");

        let path = handle.log_file().unwrap().to_path_buf();
        drop(handle);

        assert!(path.starts_with(&location));
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("diagnostics file check"));
        assert!(!contents.contains("filtered out at info"));
    }
}
