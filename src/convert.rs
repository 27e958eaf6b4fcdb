//! String-to-value converters and the table that maps type tags to them.
//!
//! Every [`TypeTag`] a field can be read as needs exactly one [`Converter`].
//! The table starts with the five built-ins; custom types are added at
//! runtime and a tag can never be registered twice.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::error;

use crate::error::{ConfigError, ConvertError};
use crate::types::{TypeTag, Value};

type ConvertFn = dyn Fn(&str) -> Result<Value, ConvertError> + Send + Sync;

/// A shared handle to a conversion function. Clones point at the same function.
#[derive(Clone)]
pub struct Converter(Arc<ConvertFn>);

impl Converter {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&str) -> Result<Value, ConvertError> + Send + Sync + 'static,
    {
        Converter(Arc::new(f))
    }

    /// Adapt a typed parser into a converter producing [`Value::Custom`].
    /// The parser's error becomes [`ConvertError::Custom`].
    pub fn typed<T, E, F>(f: F) -> Self
    where
        T: Any + Send + Sync,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
        F: Fn(&str) -> Result<T, E> + Send + Sync + 'static,
    {
        Converter::new(move |raw| {
            f(raw)
                .map(Value::custom)
                .map_err(|e| ConvertError::Custom(e.into()))
        })
    }

    pub fn convert(&self, raw: &str) -> Result<Value, ConvertError> {
        (self.0)(raw)
    }

    /// Whether both handles refer to the same registered function.
    pub fn ptr_eq(a: &Converter, b: &Converter) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Converter(..)")
    }
}

/// Parse `[a, b, c]` into `["a", "b", "c"]`.
///
/// Surrounding whitespace is ignored, as is whitespace around each element.
/// Elements stay strings. `[]` is an empty list.
pub fn list_converter(raw: &str) -> Result<Vec<String>, ConvertError> {
    let value = raw.trim();
    let Some(inner) = value
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
    else {
        error!(
            "the string representing the list must start with '[' and end with ']', instead {raw} was passed"
        );
        return Err(ConvertError::Format(raw.to_string()));
    };

    if inner.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(inner.split(',').map(|item| item.trim().to_string()).collect())
}

fn int_converter(raw: &str) -> Result<i64, ConvertError> {
    raw.trim().parse().map_err(|_| ConvertError::Parse {
        expected: "int",
        input: raw.to_string(),
    })
}

fn float_converter(raw: &str) -> Result<f64, ConvertError> {
    raw.trim().parse().map_err(|_| ConvertError::Parse {
        expected: "float",
        input: raw.to_string(),
    })
}

/// `1/yes/true/on` and `0/no/false/off`, any case.
fn bool_converter(raw: &str) -> Result<bool, ConvertError> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "yes" | "true" | "on" => Ok(true),
        "0" | "no" | "false" | "off" => Ok(false),
        _ => Err(ConvertError::Parse {
            expected: "bool",
            input: raw.to_string(),
        }),
    }
}

/// Mapping from type tag to converter.
#[derive(Debug, Clone)]
pub struct ConverterTable {
    converters: HashMap<TypeTag, Converter>,
}

impl Default for ConverterTable {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl ConverterTable {
    /// A table holding converters for every tag in [`TypeTag::BUILTIN`].
    pub fn with_builtins() -> Self {
        let mut converters = HashMap::new();
        converters.insert(
            TypeTag::List,
            Converter::new(|raw| list_converter(raw).map(Value::List)),
        );
        converters.insert(
            TypeTag::Int,
            Converter::new(|raw| int_converter(raw).map(Value::Int)),
        );
        converters.insert(
            TypeTag::Float,
            Converter::new(|raw| float_converter(raw).map(Value::Float)),
        );
        converters.insert(
            TypeTag::Bool,
            Converter::new(|raw| bool_converter(raw).map(Value::Bool)),
        );
        converters.insert(
            TypeTag::String,
            Converter::new(|raw| Ok(Value::String(raw.to_string()))),
        );
        Self { converters }
    }

    pub fn get(&self, tag: &TypeTag) -> Option<&Converter> {
        self.converters.get(tag)
    }

    pub fn contains(&self, tag: &TypeTag) -> bool {
        self.converters.contains_key(tag)
    }

    /// Register `converter` for `tag` and return the stored handle.
    ///
    /// Fails with [`ConfigError::DuplicateHandler`] if `tag` already has one;
    /// the existing converter stays in place.
    pub fn register(&mut self, tag: TypeTag, converter: Converter) -> Result<Converter, ConfigError> {
        if self.converters.contains_key(&tag) {
            error!("a handler for type {tag} already exists inside of the converter table");
            return Err(ConfigError::DuplicateHandler(tag));
        }
        self.converters.insert(tag, converter.clone());
        Ok(converter)
    }
}
