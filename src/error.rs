use std::path::PathBuf;

use thiserror::Error;

use crate::types::TypeTag;

/// A rejected `(field_name, type, default)` declaration or namespace name.
#[derive(Debug, Error, PartialEq)]
#[cfg_attr(feature = "rich-errors", derive(miette::Diagnostic))]
pub enum ValidationError {
    #[error("a config field name must not be empty")]
    EmptyFieldName,

    #[error(
        "default for field '{field}' should be of type {expected}, but a {actual} was passed"
    )]
    DefaultTypeMismatch {
        field: String,
        expected: TypeTag,
        actual: TypeTag,
    },

    #[error("namespace name '{0}' must not contain '.', it separates namespace and field")]
    InvalidNamespaceName(String),
}

impl ValidationError {
    /// `true` when a parameter had the wrong type, `false` when it had a bad value.
    pub fn is_type_violation(&self) -> bool {
        matches!(self, ValidationError::DefaultTypeMismatch { .. })
    }
}

#[derive(Debug, Error)]
#[cfg_attr(feature = "rich-errors", derive(miette::Diagnostic))]
pub enum ConfigError {
    #[error("Invalid config declaration: {0}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(reedcfg::validation)))]
    Validation(#[from] ValidationError),

    #[error("Config field '{field}' already exists in namespace '{namespace}'")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(reedcfg::duplicate_field)))]
    DuplicateField { namespace: String, field: String },

    #[error("Namespace '{0}' already exists in the config")]
    #[cfg_attr(
        feature = "rich-errors",
        diagnostic(
            code(reedcfg::duplicate_namespace),
            help("declare every field before calling add_namespace; a namespace registers once")
        )
    )]
    DuplicateNamespace(String),

    #[error("No handler exists to convert strings into type {0}")]
    #[cfg_attr(
        feature = "rich-errors",
        diagnostic(
            code(reedcfg::unsupported_type),
            help("register a converter with add_handler before reading this field")
        )
    )]
    UnsupportedType(TypeTag),

    #[error("A handler for type {0} is already registered")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(reedcfg::duplicate_handler)))]
    DuplicateHandler(TypeTag),

    #[error("Namespace '{0}' is not registered in the config")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(reedcfg::namespace_not_found)))]
    NamespaceNotFound(String),

    #[error("Field '{field}' is missing from namespace '{namespace}'")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(reedcfg::field_not_found)))]
    FieldNotFound { namespace: String, field: String },

    #[error("Failed to read {path}: {source}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(reedcfg::io)))]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {reason}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(reedcfg::parse)))]
    ParseError { path: PathBuf, reason: String },
}

/// Why a converter could not turn a raw string into a value.
///
/// Never reaches callers of `read_field`: it is logged there and the field's
/// default is used instead.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("a list must start with '[' and end with ']', instead '{0}' was passed")]
    Format(String),

    #[error("cannot parse '{input}' as {expected}")]
    Parse {
        expected: &'static str,
        input: String,
    },

    #[error("key '{key}' is not present in section '{section}'")]
    Missing { section: String, key: String },

    #[error("converter for {expected} produced a value of type {actual}")]
    TypeMismatch { expected: TypeTag, actual: TypeTag },

    #[error("converter panicked: {0}")]
    Panicked(String),

    #[error(transparent)]
    Custom(Box<dyn std::error::Error + Send + Sync>),
}
