//! Environment-scoped field resolution.
//!
//! A [`ConfigReader`] is fixed to one INI section for its whole life. If the
//! section named by the environment is absent from the file, it switches to
//! `DEFAULT` once at construction and stays there.
//!
//! [`read_field`](ConfigReader::read_field) separates two kinds of failure:
//!
//! - **Programmer errors** (bad declaration, no converter for the type) are
//!   returned as [`ConfigError`].
//! - **Content errors** (missing key, malformed value, a converter that fails
//!   or panics) are logged and the caller's default is returned instead.
//!
//! A bad value in a config file should never stop a deployment; a bad program
//! should fail at setup.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use tracing::{debug, error};

use crate::convert::{Converter, ConverterTable};
use crate::env::EnvironmentProvider;
use crate::error::{ConfigError, ConvertError};
use crate::file::{self, DEFAULT_SECTION, IniSource};
use crate::namespace::validate_entry;
use crate::types::{TypeTag, Value};

#[derive(Debug, Clone)]
pub struct ConfigReader {
    app_environment: String,
    source: IniSource,
    converters: ConverterTable,
}

impl ConfigReader {
    /// Load the file named by `env` and select its section.
    ///
    /// A missing file is logged and treated as empty, so every read returns
    /// its default. An unreadable or malformed file is an error.
    pub fn new(env: &impl EnvironmentProvider) -> Result<Self, ConfigError> {
        let location = env.get_config_location();
        let source = match file::load_config_file(Path::new(location))? {
            Some(source) => source,
            None => {
                error!("config file {location} does not exist, config defaults will be used");
                IniSource::empty()
            }
        };
        Ok(Self::with_source(env.get_app_environment(), source))
    }

    /// Build a reader over an already-loaded source.
    pub fn with_source(app_environment: &str, source: IniSource) -> Self {
        let app_environment = if source.has_section(app_environment) {
            app_environment.to_string()
        } else {
            error!(
                "app environment was read in as {app_environment}, but no section exists for it in the config file, using '{DEFAULT_SECTION}'"
            );
            DEFAULT_SECTION.to_string()
        };

        Self {
            app_environment,
            source,
            converters: ConverterTable::with_builtins(),
        }
    }

    /// The section this reader resolves against.
    pub fn app_environment(&self) -> &str {
        &self.app_environment
    }

    /// Resolve `field_name` in the active section as `type_tag`.
    ///
    /// Returns `default` if the key is absent or conversion fails for any
    /// reason. Errors only for an invalid `(field_name, type_tag, default)`
    /// triple or when no converter is registered for `type_tag`.
    pub fn read_field(
        &self,
        field_name: &str,
        type_tag: &TypeTag,
        default: Value,
    ) -> Result<Value, ConfigError> {
        debug!("attempting to load config field {field_name} as type {type_tag}");
        validate_entry(field_name, type_tag, &default)?;

        let Some(converter) = self.converters.get(type_tag) else {
            error!("no handler exists to convert strings into type {type_tag}");
            return Err(ConfigError::UnsupportedType(*type_tag));
        };

        match self.convert(field_name, type_tag, converter) {
            Ok(value) => {
                debug!("successfully read in config field {field_name} as {value}");
                Ok(value)
            }
            Err(e) => {
                error!(
                    "a problem occurred while parsing config field {field_name}: {e}. the field will use its default: {default}"
                );
                Ok(default)
            }
        }
    }

    fn convert(
        &self,
        field_name: &str,
        type_tag: &TypeTag,
        converter: &Converter,
    ) -> Result<Value, ConvertError> {
        let raw = self
            .source
            .get(&self.app_environment, field_name)
            .ok_or_else(|| ConvertError::Missing {
                section: self.app_environment.clone(),
                key: field_name.to_string(),
            })?;

        let value = panic::catch_unwind(AssertUnwindSafe(|| converter.convert(raw)))
            .map_err(|payload| ConvertError::Panicked(panic_message(payload.as_ref())))??;

        let actual = value.type_tag();
        if actual != *type_tag {
            return Err(ConvertError::TypeMismatch {
                expected: *type_tag,
                actual,
            });
        }
        Ok(value)
    }

    /// Register a converter for `type_tag`. Returns the stored handle.
    ///
    /// Fails with [`ConfigError::DuplicateHandler`] if the tag already has a
    /// converter, built-in tags included. Registration is local to this reader.
    pub fn add_handler(
        &mut self,
        type_tag: TypeTag,
        converter: Converter,
    ) -> Result<Converter, ConfigError> {
        self.converters.register(type_tag, converter)
    }

    /// Register a typed parser for `T` under [`TypeTag::of::<T>()`](TypeTag::of).
    pub fn add_handler_fn<T, E, F>(&mut self, parse: F) -> Result<Converter, ConfigError>
    where
        T: Any + Send + Sync,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
        F: Fn(&str) -> Result<T, E> + Send + Sync + 'static,
    {
        self.add_handler(TypeTag::of::<T>(), Converter::typed(parse))
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
