//! The process-environment snapshot that selects the section and file.
//!
//! | Variable          | Default                 | Used for                        |
//! |-------------------|-------------------------|---------------------------------|
//! | `LOG_LEVEL`       | `DEBUG`                 | diagnostics level               |
//! | `APP_ENVIRONMENT` | `local`                 | INI section to read fields from |
//! | `CONFIG_LOCATION` | `properties_config.ini` | path of the INI file            |
//! | `LOG_LOCATION`    | empty (no log file)     | directory for daily log files   |

use tracing::{debug, warn};

pub const LOG_LEVEL_KEY: &str = "LOG_LEVEL";
pub const APP_ENVIRONMENT_KEY: &str = "APP_ENVIRONMENT";
pub const CONFIG_LOCATION_KEY: &str = "CONFIG_LOCATION";
pub const LOG_LOCATION_KEY: &str = "LOG_LOCATION";

pub const LOG_LEVEL_DEFAULT: &str = "DEBUG";
pub const APP_ENVIRONMENT_DEFAULT: &str = "local";
pub const CONFIG_LOCATION_DEFAULT: &str = "properties_config.ini";
pub const LOG_LOCATION_DEFAULT: &str = "";

/// Supplies the startup values the registry and diagnostics depend on.
pub trait EnvironmentProvider {
    fn get_log_level(&self) -> &str;
    fn get_app_environment(&self) -> &str;
    fn get_config_location(&self) -> &str;
    fn get_log_location(&self) -> &str;
}

/// Startup values read once from environment variables, each defaulted
/// independently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    log_level: String,
    app_environment: String,
    config_location: String,
    log_location: String,
}

impl Environment {
    /// Read from the current process environment.
    pub fn from_process() -> Self {
        Self::from_vars(std::env::vars())
    }

    /// Build from explicit `(name, value)` pairs.
    ///
    /// Takes an iterator so tests can pass synthetic data instead of `std::env::vars()`.
    pub fn from_vars(vars: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut log_level = None;
        let mut app_environment = None;
        let mut config_location = None;
        let mut log_location = None;

        for (key, value) in vars {
            match key.as_str() {
                LOG_LEVEL_KEY => log_level = Some(value),
                APP_ENVIRONMENT_KEY => app_environment = Some(value),
                CONFIG_LOCATION_KEY => config_location = Some(value),
                LOG_LOCATION_KEY => log_location = Some(value),
                _ => {}
            }
        }

        Self {
            log_level: or_default(LOG_LEVEL_KEY, log_level, LOG_LEVEL_DEFAULT),
            app_environment: or_default(APP_ENVIRONMENT_KEY, app_environment, APP_ENVIRONMENT_DEFAULT),
            config_location: or_default(CONFIG_LOCATION_KEY, config_location, CONFIG_LOCATION_DEFAULT),
            log_location: or_default(LOG_LOCATION_KEY, log_location, LOG_LOCATION_DEFAULT),
        }
    }

    /// Copy the values out of any provider.
    pub fn snapshot(provider: &impl EnvironmentProvider) -> Self {
        Self {
            log_level: provider.get_log_level().to_string(),
            app_environment: provider.get_app_environment().to_string(),
            config_location: provider.get_config_location().to_string(),
            log_location: provider.get_log_location().to_string(),
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::from_vars(std::iter::empty())
    }
}

impl EnvironmentProvider for Environment {
    fn get_log_level(&self) -> &str {
        &self.log_level
    }

    fn get_app_environment(&self) -> &str {
        &self.app_environment
    }

    fn get_config_location(&self) -> &str {
        &self.config_location
    }

    fn get_log_location(&self) -> &str {
        &self.log_location
    }
}

fn or_default(key: &str, value: Option<String>, default: &str) -> String {
    match value {
        Some(v) => {
            debug!("{key} set to {v}");
            v
        }
        None => {
            warn!("{key} is not present in the current environment, defaulting {key} to {default:?}");
            default.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_when_nothing_set() {
        let env = Environment::from_vars(vars(&[]));
        assert_eq!(env.get_log_level(), "DEBUG");
        assert_eq!(env.get_app_environment(), "local");
        assert_eq!(env.get_config_location(), "properties_config.ini");
        assert_eq!(env.get_log_location(), "");
    }

    #[test]
    fn reads_every_key() {
        let env = Environment::from_vars(vars(&[
            ("LOG_LEVEL", "INFO"),
            ("APP_ENVIRONMENT", "prod"),
            ("CONFIG_LOCATION", "/etc/app/config.ini"),
            ("LOG_LOCATION", "/var/log/app"),
        ]));
        assert_eq!(env.get_log_level(), "INFO");
        assert_eq!(env.get_app_environment(), "prod");
        assert_eq!(env.get_config_location(), "/etc/app/config.ini");
        assert_eq!(env.get_log_location(), "/var/log/app");
    }

    #[test]
    fn each_key_defaults_independently() {
        let env = Environment::from_vars(vars(&[("APP_ENVIRONMENT", "qa")]));
        assert_eq!(env.get_app_environment(), "qa");
        assert_eq!(env.get_log_level(), "DEBUG");
        assert_eq!(env.get_config_location(), "properties_config.ini");
    }

    #[test]
    fn unrelated_vars_ignored() {
        let env = Environment::from_vars(vars(&[("PATH", "/usr/bin"), ("app_environment", "dev")]));
        assert_eq!(env, Environment::default());
    }

    #[test]
    fn snapshot_copies_provider() {
        struct Fixed;
        impl EnvironmentProvider for Fixed {
            fn get_log_level(&self) -> &str {
                "ERROR"
            }
            fn get_app_environment(&self) -> &str {
                "dev"
            }
            fn get_config_location(&self) -> &str {
                "dev.ini"
            }
            fn get_log_location(&self) -> &str {
                ""
            }
        }

        let env = Environment::snapshot(&Fixed);
        assert_eq!(env.get_log_level(), "ERROR");
        assert_eq!(env.get_app_environment(), "dev");
        assert_eq!(env.get_config_location(), "dev.ini");
    }
}
