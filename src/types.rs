//! Type tags, resolved values, and the framework-agnostic config actions.
//!
//! A [`TypeTag`] names the type a field is declared with. The five built-in
//! tags cover what an INI value can reasonably hold; [`TypeTag::of`] mints a
//! tag for any other Rust type so callers can register their own converters.
//! A [`Value`] is what a field resolves to, and [`Value::type_tag`] is the
//! "is this value an instance of that type" check used by validation.

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::{Serialize, Serializer};

/// Identity of a user-registered type: its `TypeId` plus its name for messages.
#[derive(Clone, Copy)]
pub struct CustomTag {
    id: TypeId,
    name: &'static str,
}

impl CustomTag {
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Fully qualified Rust type name, e.g. `myapp::Person`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Type name without its module path, e.g. `Person`. Generic arguments
    /// are kept as written: `Vec<myapp::Person>`.
    pub fn short_name(&self) -> &'static str {
        let base_end = self.name.find('<').unwrap_or(self.name.len());
        let start = self.name[..base_end].rfind("::").map_or(0, |i| i + 2);
        &self.name[start..]
    }
}

impl PartialEq for CustomTag {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for CustomTag {}

impl Hash for CustomTag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for CustomTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CustomTag").field(&self.name).finish()
    }
}

/// The declared type of a config field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// A bracketed, comma-separated list of strings: `[a, b, c]`.
    List,
    Int,
    Float,
    Bool,
    String,
    /// Any other type, paired with a converter registered at runtime.
    Custom(CustomTag),
}

impl TypeTag {
    /// Tag for an arbitrary Rust type. Use with [`Value::custom`] and
    /// [`ConfigReader::add_handler_fn`](crate::ConfigReader::add_handler_fn).
    pub fn of<T: Any>() -> Self {
        TypeTag::Custom(CustomTag::of::<T>())
    }

    /// The built-in tags, in the order their converters are seeded.
    pub const BUILTIN: [TypeTag; 5] = [
        TypeTag::List,
        TypeTag::Int,
        TypeTag::Float,
        TypeTag::Bool,
        TypeTag::String,
    ];
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::List => f.write_str("list"),
            TypeTag::Int => f.write_str("int"),
            TypeTag::Float => f.write_str("float"),
            TypeTag::Bool => f.write_str("bool"),
            TypeTag::String => f.write_str("string"),
            TypeTag::Custom(tag) => f.write_str(tag.name()),
        }
    }
}

/// A value of a user-registered type, shared behind an `Arc`.
#[derive(Clone)]
pub struct CustomValue {
    tag: CustomTag,
    inner: Arc<dyn Any + Send + Sync>,
}

impl CustomValue {
    pub fn tag(&self) -> CustomTag {
        self.tag
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }
}

impl fmt::Debug for CustomValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.tag.short_name())
    }
}

/// A resolved config value.
#[derive(Debug, Clone)]
pub enum Value {
    List(Vec<String>),
    Int(i64),
    Float(f64),
    Bool(bool),
    String(String),
    Custom(CustomValue),
}

impl Value {
    /// Wrap any `Send + Sync` value as a custom value tagged with its own type.
    pub fn custom<T: Any + Send + Sync>(value: T) -> Self {
        Value::Custom(CustomValue {
            tag: CustomTag::of::<T>(),
            inner: Arc::new(value),
        })
    }

    /// The runtime type of this value.
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Value::List(_) => TypeTag::List,
            Value::Int(_) => TypeTag::Int,
            Value::Float(_) => TypeTag::Float,
            Value::Bool(_) => TypeTag::Bool,
            Value::String(_) => TypeTag::String,
            Value::Custom(c) => TypeTag::Custom(c.tag),
        }
    }

    /// Whether this value is an instance of `tag`.
    pub fn is_instance_of(&self, tag: &TypeTag) -> bool {
        self.type_tag() == *tag
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Borrow a custom value as `T`. Returns `None` for built-in values and
    /// for custom values of a different type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Value::Custom(c) => c.downcast_ref::<T>(),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            // Custom values carry no equality; identity is the best we can do.
            (Value::Custom(a), Value::Custom(b)) => Arc::ptr_eq(&a.inner, &b.inner),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::List(items) => write!(f, "[{}]", items.join(", ")),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::String(s) => f.write_str(s),
            Value::Custom(c) => write!(f, "<{}>", c.tag.short_name()),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::List(items) => items.serialize(serializer),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(x) => serializer.serialize_f64(*x),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::String(s) => serializer.serialize_str(s),
            Value::Custom(c) => serializer.serialize_str(&format!("<{}>", c.tag.short_name())),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i.into())
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Value::List(items)
    }
}

impl From<Vec<&str>> for Value {
    fn from(items: Vec<&str>) -> Self {
        Value::List(items.into_iter().map(str::to_string).collect())
    }
}

/// A config operation, independent of any CLI framework.
/// The CLI layer converts parsed clap args into this.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigAction {
    /// Every resolved `namespace.FIELD = value`, in registration order.
    List,
    /// One resolved value, addressed as `namespace.field`.
    Get { key: String },
}
