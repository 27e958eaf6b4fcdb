//! A configuration registry shared by independent components. Each component
//! declares the fields it needs under its own namespace; the registry
//! resolves them from one INI file, sectioned by deployment environment.
//!
//! ```ignore
//! let mut config = Config::new()?;
//!
//! let mut server = NameSpace::new("server")?;
//! server.add_entry("host", TypeTag::String, "localhost")?;
//! server.add_entry("port", TypeTag::Int, 8080)?;
//! config.add_namespace(&server)?;
//!
//! let port = config["server"]["port"].as_int();
//! ```
//!
//! With `APP_ENVIRONMENT=prod`, the registry reads the `[prod]` section of the
//! file named by `CONFIG_LOCATION`:
//!
//! ```ini
//! [DEFAULT]
//! server.PORT = 8080
//!
//! [prod]
//! server.HOST = 0.0.0.0
//! ```
//!
//! # Namespaces
//!
//! A [`NameSpace`] is a name plus an ordered list of `(field, type, default)`
//! declarations. Field names are upper-cased, so lookups are
//! case-insensitive. In the file a field is keyed `namespace.FIELD`, which is
//! why a namespace name cannot contain `.`. Namespaces keep libraries from
//! colliding: two components can both declare `HOST` without conflict.
//!
//! A namespace registers once. Declare every field first, then call
//! [`Config::add_namespace`]; a second registration under the same name fails
//! with [`ConfigError::DuplicateNamespace`] and leaves the registry unchanged.
//!
//! # Environments and sections
//!
//! The section is chosen by `APP_ENVIRONMENT` (default `local`). If the file
//! has no such section the registry reads `DEFAULT` instead, for its whole
//! lifetime. Keys in `[DEFAULT]` are inherited by every section.
//!
//! | Variable          | Default                 |
//! |-------------------|-------------------------|
//! | `APP_ENVIRONMENT` | `local`                 |
//! | `CONFIG_LOCATION` | `properties_config.ini` |
//! | `LOG_LEVEL`       | `DEBUG`                 |
//! | `LOG_LOCATION`    | empty (stderr only)     |
//!
//! These values are also readable from the registry itself under the
//! [`BOOTSTRAP_NAMESPACE`].
//!
//! # Types and converters
//!
//! Built-in [`TypeTag`]s are `List`, `Int`, `Float`, `Bool`, and `String`.
//! Lists are written `[a, b, c]` and resolve to strings. Any other Rust type
//! can be read once a converter is registered:
//!
//! ```ignore
//! config.add_handler_fn(|raw: &str| raw.parse::<std::net::IpAddr>())?;
//! ns.add_entry("bind", TypeTag::of::<IpAddr>(), Value::custom(default_ip))?;
//! ```
//!
//! A type gets one converter per registry; registering it again fails with
//! [`ConfigError::DuplicateHandler`] and keeps the first.
//!
//! # Errors and fallbacks
//!
//! A missing or malformed value never fails: the field resolves to its
//! default and the cause is logged. A missing file behaves the same way for
//! every field. What does fail, at setup time, is a broken program: an
//! invalid declaration, a duplicate field or namespace, a type without a
//! converter, or a lookup of something never registered. See [`error`].
//!
//! # Diagnostics
//!
//! The crate logs through `tracing`. Call [`diagnostics::init`] to install a
//! subscriber configured from `LOG_LEVEL` and `LOG_LOCATION`, or bring your
//! own.

pub mod diagnostics;
pub mod error;
pub mod types;

#[cfg(feature = "clap")]
mod cli;
mod config;
mod convert;
mod env;
mod file;
mod namespace;
mod ops;
mod reader;

#[cfg(test)]
mod fixtures;

#[cfg(feature = "clap")]
pub use cli::{ConfigArgs, ConfigSubcommand};
pub use config::{BOOTSTRAP_NAMESPACE, Config, ConfigDict};
pub use convert::{Converter, ConverterTable, list_converter};
pub use env::{Environment, EnvironmentProvider};
pub use error::{ConfigError, ConvertError, ValidationError};
pub use file::{DEFAULT_SECTION, IniSource};
pub use namespace::{FieldEntry, NameSpace, SEPARATOR, validate_entry};
pub use ops::ConfigResult;
pub use reader::ConfigReader;
pub use types::{ConfigAction, CustomTag, CustomValue, TypeTag, Value};
