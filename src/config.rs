//! The registry: resolved namespaces, addressable as `config[namespace][FIELD]`.
//!
//! Components register a [`NameSpace`] once; the registry resolves each of its
//! fields against the active environment section and keeps the results.
//! Nothing outside this module can change a resolved value: [`ConfigDict`] has
//! no mutating methods and [`Config`] only grows through
//! [`add_namespace`](Config::add_namespace).

use std::any::Any;
use std::collections::HashMap;
use std::ops::Index;

use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::{debug, error};

use crate::convert::Converter;
use crate::env::{
    APP_ENVIRONMENT_KEY, CONFIG_LOCATION_KEY, Environment, EnvironmentProvider, LOG_LEVEL_KEY,
    LOG_LOCATION_KEY,
};
use crate::error::ConfigError;
use crate::namespace::{NameSpace, SEPARATOR};
use crate::reader::ConfigReader;
use crate::types::{TypeTag, Value};

/// Name of the namespace every registry starts with, holding the environment
/// snapshot it was built from.
pub const BOOTSTRAP_NAMESPACE: &str = "reedcfg";

/// The resolved fields of one namespace, keyed by upper-cased field name.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigDict {
    name: String,
    fields: Vec<(String, Value)>,
    index: HashMap<String, usize>,
}

impl ConfigDict {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            fields: Vec::new(),
            index: HashMap::new(),
        }
    }

    fn insert(&mut self, field: String, value: Value) {
        self.index.insert(field.clone(), self.fields.len());
        self.fields.push((field, value));
    }

    /// The namespace this dict was resolved from.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up a field. The name is matched case-insensitively.
    pub fn get(&self, field: &str) -> Result<&Value, ConfigError> {
        let key = field.to_uppercase();
        match self.index.get(&key) {
            Some(&i) => Ok(&self.fields[i].1),
            None => {
                error!("config field {key} does not exist in namespace {}", self.name);
                Err(ConfigError::FieldNotFound {
                    namespace: self.name.clone(),
                    field: key,
                })
            }
        }
    }

    /// Shorthand for `get(field)?.downcast_ref::<T>()` on custom values.
    pub fn get_custom<T: Any>(&self, field: &str) -> Result<Option<&T>, ConfigError> {
        Ok(self.get(field)?.downcast_ref::<T>())
    }

    pub fn contains(&self, field: &str) -> bool {
        self.index.contains_key(&field.to_uppercase())
    }

    /// Field names in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    /// `(FIELD, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Index<&str> for ConfigDict {
    type Output = Value;

    /// Panics if the field is missing; use [`ConfigDict::get`] to handle that.
    fn index(&self, field: &str) -> &Value {
        match self.get(field) {
            Ok(value) => value,
            Err(e) => panic!("{e}"),
        }
    }
}

impl Serialize for ConfigDict {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (field, value) in &self.fields {
            map.serialize_entry(field, value)?;
        }
        map.end()
    }
}

/// The configuration registry.
///
/// Built once per process from an [`EnvironmentProvider`]. Registration and
/// handler changes take `&mut self`; share a finished registry by reference
/// or behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Config {
    environment: Environment,
    reader: ConfigReader,
    namespaces: Vec<ConfigDict>,
    index: HashMap<String, usize>,
}

impl Config {
    /// Build from the process environment.
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_environment(&Environment::from_process())
    }

    /// Build from an explicit environment. The backing file is read here, once.
    pub fn from_environment(env: &impl EnvironmentProvider) -> Result<Self, ConfigError> {
        let environment = Environment::snapshot(env);
        let reader = ConfigReader::new(&environment)?;
        Ok(Self::with_reader(environment, reader))
    }

    /// Build around an existing reader, e.g. one over an in-memory source.
    pub fn with_reader(environment: Environment, reader: ConfigReader) -> Self {
        let mut config = Self {
            environment,
            reader,
            namespaces: Vec::new(),
            index: HashMap::new(),
        };
        let bootstrap = config.bootstrap_dict();
        config.insert(bootstrap);
        config
    }

    fn bootstrap_dict(&self) -> ConfigDict {
        let env = &self.environment;
        let mut dict = ConfigDict::new(BOOTSTRAP_NAMESPACE);
        dict.insert(LOG_LEVEL_KEY.into(), env.get_log_level().into());
        dict.insert(APP_ENVIRONMENT_KEY.into(), env.get_app_environment().into());
        dict.insert(CONFIG_LOCATION_KEY.into(), env.get_config_location().into());
        dict.insert(LOG_LOCATION_KEY.into(), env.get_log_location().into());
        dict
    }

    fn insert(&mut self, dict: ConfigDict) {
        self.index.insert(dict.name.clone(), self.namespaces.len());
        self.namespaces.push(dict);
    }

    /// Resolve every field of `namespace` and store the results under its name.
    ///
    /// Each field is read from the file as `"{namespace}.{FIELD}"`, falling back
    /// to its declared default. Fails with [`ConfigError::DuplicateNamespace`]
    /// if the name is taken, or [`ConfigError::UnsupportedType`] if a field's
    /// type has no converter. On failure nothing is stored.
    pub fn add_namespace(&mut self, namespace: &NameSpace) -> Result<(), ConfigError> {
        let name = namespace.name();
        debug!("attempting to add namespace {name} to the config");

        if self.index.contains_key(name) {
            error!("namespace {name} already exists inside of the config");
            return Err(ConfigError::DuplicateNamespace(name.to_string()));
        }

        let mut dict = ConfigDict::new(name);
        for entry in namespace {
            let key = format!("{name}{SEPARATOR}{}", entry.name());
            let value = self
                .reader
                .read_field(&key, entry.type_tag(), entry.default().clone())?;
            dict.insert(entry.name().to_string(), value);
        }

        self.insert(dict);
        debug!("finished adding namespace {name} to the config");
        Ok(())
    }

    /// Register a converter on the underlying reader. See
    /// [`ConfigReader::add_handler`].
    pub fn add_handler(
        &mut self,
        type_tag: TypeTag,
        converter: Converter,
    ) -> Result<Converter, ConfigError> {
        self.reader.add_handler(type_tag, converter)
    }

    /// Register a typed parser on the underlying reader. See
    /// [`ConfigReader::add_handler_fn`].
    pub fn add_handler_fn<T, E, F>(&mut self, parse: F) -> Result<Converter, ConfigError>
    where
        T: Any + Send + Sync,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
        F: Fn(&str) -> Result<T, E> + Send + Sync + 'static,
    {
        self.reader.add_handler_fn(parse)
    }

    /// Look up a namespace by exact name.
    pub fn get(&self, namespace: &str) -> Result<&ConfigDict, ConfigError> {
        match self.index.get(namespace) {
            Some(&i) => Ok(&self.namespaces[i]),
            None => {
                error!("namespace {namespace} has not been added to the config");
                Err(ConfigError::NamespaceNotFound(namespace.to_string()))
            }
        }
    }

    pub fn contains(&self, namespace: &str) -> bool {
        self.index.contains_key(namespace)
    }

    /// Namespace names in registration order, starting with [`BOOTSTRAP_NAMESPACE`].
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.namespaces.iter().map(|d| d.name.as_str())
    }

    /// Resolved namespaces in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &ConfigDict> {
        self.namespaces.iter()
    }

    pub fn len(&self) -> usize {
        self.namespaces.len()
    }

    /// Always `false`: the bootstrap namespace is present from construction.
    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }

    /// The environment snapshot this registry was built from.
    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// The section fields are being resolved against.
    pub fn app_environment(&self) -> &str {
        self.reader.app_environment()
    }
}

impl Index<&str> for Config {
    type Output = ConfigDict;

    /// Panics if the namespace is missing; use [`Config::get`] to handle that.
    fn index(&self, namespace: &str) -> &ConfigDict {
        match self.get(namespace) {
            Ok(dict) => dict,
            Err(e) => panic!("{e}"),
        }
    }
}

impl Serialize for Config {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.namespaces.len()))?;
        for dict in &self.namespaces {
            map.serialize_entry(&dict.name, dict)?;
        }
        map.end()
    }
}
