//! Typed field declarations grouped under a namespace.
//!
//! A component that wants configuration builds a [`NameSpace`], declares each
//! field it expects with [`add_entry`](NameSpace::add_entry), and hands the
//! namespace to [`Config::add_namespace`](crate::Config::add_namespace). Field
//! names are upper-cased on the way in, so `port`, `Port`, and `PORT` are the
//! same field.
//!
//! ```ignore
//! let mut ns = NameSpace::new("server")?;
//! ns.add_entry("host", TypeTag::String, "localhost")?;
//! ns.add_entry("port", TypeTag::Int, 8080)?;
//! config.add_namespace(&ns)?;
//! ```

use tracing::error;

use crate::error::{ConfigError, ValidationError};
use crate::types::{TypeTag, Value};

/// Separates the namespace name from the field name in file keys.
pub const SEPARATOR: char = '.';

/// One declared field: upper-cased name, type, and the default used when the
/// backing file has no usable value.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldEntry {
    name: String,
    type_tag: TypeTag,
    default: Value,
}

impl FieldEntry {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_tag(&self) -> &TypeTag {
        &self.type_tag
    }

    pub fn default(&self) -> &Value {
        &self.default
    }
}

/// Check a `(field_name, type, default)` triple.
///
/// Rejects an empty field name, then a default whose runtime type is not
/// `type_tag`. Shared by [`NameSpace::add_entry`] and
/// [`ConfigReader::read_field`](crate::ConfigReader::read_field).
pub fn validate_entry(
    field_name: &str,
    type_tag: &TypeTag,
    default: &Value,
) -> Result<(), ValidationError> {
    if field_name.is_empty() {
        error!(
            "a config field_name must not be empty. details - field_name: {field_name:?} | type: {type_tag} | default: {default}"
        );
        return Err(ValidationError::EmptyFieldName);
    }

    let actual = default.type_tag();
    if actual != *type_tag {
        error!(
            "default should be of type {type_tag}, instead a {actual} was passed. details - field_name: {field_name} | default: {default}"
        );
        return Err(ValidationError::DefaultTypeMismatch {
            field: field_name.to_string(),
            expected: *type_tag,
            actual,
        });
    }

    Ok(())
}

/// A named, insertion-ordered set of field declarations.
#[derive(Debug, Clone, PartialEq)]
pub struct NameSpace {
    name: String,
    entries: Vec<FieldEntry>,
}

impl NameSpace {
    /// Create an empty namespace. The name may be anything except a string
    /// containing [`SEPARATOR`].
    pub fn new(name: impl Into<String>) -> Result<Self, ConfigError> {
        let name = name.into();
        if name.contains(SEPARATOR) {
            error!("namespace name {name} contains '{SEPARATOR}'");
            return Err(ValidationError::InvalidNamespaceName(name).into());
        }
        Ok(Self {
            name,
            entries: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declare a field. Returns the stored entry, whose name is upper-cased.
    ///
    /// Fails with [`ConfigError::Validation`] for a bad declaration and with
    /// [`ConfigError::DuplicateField`] if the name (in any case) is already
    /// declared. A failed call leaves the namespace unchanged.
    pub fn add_entry(
        &mut self,
        field_name: &str,
        type_tag: TypeTag,
        default: impl Into<Value>,
    ) -> Result<FieldEntry, ConfigError> {
        let default = default.into();
        validate_entry(field_name, &type_tag, &default)?;

        if self.has_field(field_name) {
            error!(
                "config field {field_name} already exists inside of namespace {}",
                self.name
            );
            return Err(ConfigError::DuplicateField {
                namespace: self.name.clone(),
                field: field_name.to_uppercase(),
            });
        }

        let entry = FieldEntry {
            name: field_name.to_uppercase(),
            type_tag,
            default,
        };
        self.entries.push(entry.clone());
        Ok(entry)
    }

    /// Case-insensitive membership test.
    pub fn has_field(&self, field_name: &str) -> bool {
        let search = field_name.to_uppercase();
        self.entries.iter().any(|e| e.name == search)
    }

    /// Entries in declaration order. Each call starts a fresh pass.
    pub fn entries(&self) -> std::slice::Iter<'_, FieldEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a NameSpace {
    type Item = &'a FieldEntry;
    type IntoIter = std::slice::Iter<'a, FieldEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
