//! Config operations: key lookup, listing, and result types.
//!
//! Provides the logic behind `config list` and `config get`, and the
//! `ConfigResult` enum that callers use to display results.

use std::fmt;

use crate::config::Config;
use crate::error::ConfigError;
use crate::namespace::SEPARATOR;
use crate::types::ConfigAction;

/// Result of a config operation. Returned to the caller for display.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigResult {
    /// A single resolved value.
    KeyValue { key: String, value: String },
    /// All resolved `namespace.FIELD` pairs.
    Listing { entries: Vec<(String, String)> },
}

impl fmt::Display for ConfigResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigResult::KeyValue { key, value } => write!(f, "{key} = {value}"),
            ConfigResult::Listing { entries } => {
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{key} = {value}")?;
                }
                Ok(())
            }
        }
    }
}

/// Get a resolved value by `namespace.field` key.
///
/// The key splits at the first `.`; everything after it is the field name,
/// matched case-insensitively.
pub fn get_value(config: &Config, key: &str) -> Result<ConfigResult, ConfigError> {
    let Some((namespace, field)) = key.split_once(SEPARATOR) else {
        return Err(ConfigError::NamespaceNotFound(key.to_string()));
    };

    let dict = config.get(namespace)?;
    let value = dict.get(field)?;

    Ok(ConfigResult::KeyValue {
        key: format!("{namespace}{SEPARATOR}{}", field.to_uppercase()),
        value: value.to_string(),
    })
}

/// List every resolved value as `namespace.FIELD` pairs, in registration order.
pub fn list_values(config: &Config) -> ConfigResult {
    let entries = config
        .iter()
        .flat_map(|dict| {
            dict.iter().map(move |(field, value)| {
                (
                    format!("{}{SEPARATOR}{field}", dict.name()),
                    value.to_string(),
                )
            })
        })
        .collect();

    ConfigResult::Listing { entries }
}

impl Config {
    /// Handle a `ConfigAction` (list / get).
    pub fn handle(&self, action: &ConfigAction) -> Result<ConfigResult, ConfigError> {
        match action {
            ConfigAction::List => Ok(list_values(self)),
            ConfigAction::Get { key } => get_value(self, key),
        }
    }

    /// Handle a `ConfigAction` and print the result to stdout.
    pub fn handle_and_print(&self, action: &ConfigAction) -> Result<(), ConfigError> {
        let result = self.handle(action)?;
        println!("{result}");
        Ok(())
    }
}
