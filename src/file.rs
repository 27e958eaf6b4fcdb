//! Loading the INI backing file into a lookup snapshot.
//!
//! The file is sectioned by deployment environment:
//!
//! ```ini
//! [DEFAULT]
//! server.TIMEOUT = 30
//!
//! [local]
//! server.HOST = localhost
//!
//! [prod]
//! server.HOST = 0.0.0.0
//! ```
//!
//! Section names are case-sensitive. Keys are case-insensitive. The `DEFAULT`
//! section always exists (empty if the file has none) and its keys are
//! inherited by every other section, so `server.TIMEOUT` above resolves in
//! both `local` and `prod`.
//!
//! A missing file is not an error here; the loader returns `None` and the
//! reader decides what to do. Any other I/O failure, or a file that does not
//! parse, is propagated.

use std::collections::HashMap;
use std::path::Path;

use ini::{Ini, ParseOption};

use crate::error::ConfigError;

/// Name of the canonical fallback section.
pub const DEFAULT_SECTION: &str = "DEFAULT";

/// Parsed contents of an INI file: section → lower-cased key → raw value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IniSource {
    defaults: HashMap<String, String>,
    sections: HashMap<String, HashMap<String, String>>,
}

impl IniSource {
    /// A source with nothing in it but an empty `DEFAULT` section.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse INI text. `path` is only used in error messages.
    ///
    /// Values are taken verbatim (no quote or escape processing). Duplicate
    /// sections, duplicate keys within a section, and keys that appear before
    /// the first section header are rejected.
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let opt = ParseOption {
            enabled_quote: false,
            enabled_escape: false,
            ..ParseOption::default()
        };
        let ini = Ini::load_from_str_opt(content, opt).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let parse_error = |reason: String| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason,
        };

        let mut source = IniSource::empty();
        let mut seen_default = false;

        for (section, props) in ini.iter() {
            let Some(section) = section else {
                if let Some((key, _)) = props.iter().next() {
                    return Err(parse_error(format!(
                        "key '{key}' appears before any section header"
                    )));
                }
                continue;
            };

            let table = if section == DEFAULT_SECTION {
                if seen_default {
                    return Err(parse_error(format!("section '{section}' appears twice")));
                }
                seen_default = true;
                &mut source.defaults
            } else {
                if source.sections.contains_key(section) {
                    return Err(parse_error(format!("section '{section}' appears twice")));
                }
                source.sections.entry(section.to_string()).or_default()
            };

            for (key, value) in props.iter() {
                let key = key.trim().to_lowercase();
                if table.contains_key(&key) {
                    return Err(parse_error(format!(
                        "key '{key}' appears twice in section '{section}'"
                    )));
                }
                table.insert(key, value.trim().to_string());
            }
        }

        Ok(source)
    }

    /// `DEFAULT` always counts as present.
    pub fn has_section(&self, section: &str) -> bool {
        section == DEFAULT_SECTION || self.sections.contains_key(section)
    }

    /// Look up `key` in `section`, falling back to the `DEFAULT` section.
    /// Returns `None` if the section does not exist or neither has the key.
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        let key = key.to_lowercase();
        if section != DEFAULT_SECTION {
            let own = self.sections.get(section)?;
            if let Some(value) = own.get(&key) {
                return Some(value);
            }
        }
        self.defaults.get(&key).map(String::as_str)
    }

    /// Names of the non-`DEFAULT` sections, sorted.
    pub fn section_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.sections.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Read and parse the file at `path`.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_config_file(path: &Path) -> Result<Option<IniSource>, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => IniSource::parse(&content, path).map(Some),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(ConfigError::IoError {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::PROPERTIES_INI;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn path() -> PathBuf {
        PathBuf::from("/test/properties_config.ini")
    }

    fn fixture() -> IniSource {
        IniSource::parse(PROPERTIES_INI, &path()).unwrap()
    }

    #[test]
    fn reads_section_values() {
        let source = fixture();
        assert_eq!(source.get("local", "test.TEST1"), Some("local1"));
        assert_eq!(source.get("dev", "test.TEST1"), Some("dev1"));
        assert_eq!(source.get("prod", "test.TEST2"), Some("prod2"));
    }

    #[test]
    fn keys_are_case_insensitive() {
        let source = fixture();
        assert_eq!(source.get("local", "TEST.TEST1"), Some("local1"));
        assert_eq!(source.get("local", "test.test1"), Some("local1"));
    }

    #[test]
    fn sections_are_case_sensitive() {
        let source = fixture();
        assert!(source.has_section("local"));
        assert!(!source.has_section("LOCAL"));
        assert_eq!(source.get("LOCAL", "test.TEST1"), None);
    }

    #[test]
    fn default_section_is_inherited() {
        let source = fixture();
        assert_eq!(source.get("local", "test.DEFAULT"), Some("constant"));
        assert_eq!(source.get("qa", "test.DEFAULT"), Some("constant"));
        assert_eq!(source.get(DEFAULT_SECTION, "test.DEFAULT"), Some("constant"));
    }

    #[test]
    fn own_value_shadows_default() {
        let source = IniSource::parse(
            "[DEFAULT]\nk = base\n\n[local]\nk = override\n",
            &path(),
        )
        .unwrap();
        assert_eq!(source.get("local", "k"), Some("override"));
        assert_eq!(source.get(DEFAULT_SECTION, "k"), Some("base"));
    }

    #[test]
    fn default_always_exists() {
        let source = IniSource::empty();
        assert!(source.has_section(DEFAULT_SECTION));
        assert_eq!(source.get(DEFAULT_SECTION, "anything"), None);
    }

    #[test]
    fn missing_section_yields_none() {
        let source = fixture();
        assert_eq!(source.get("none", "test.DEFAULT"), None);
    }

    #[test]
    fn values_are_trimmed_and_verbatim() {
        let source =
            IniSource::parse("[local]\npath =   C:\\data\\dir   \n", &path()).unwrap();
        assert_eq!(source.get("local", "path"), Some("C:\\data\\dir"));
    }

    #[test]
    fn comments_are_ignored() {
        let source =
            IniSource::parse("; leading\n[local]\n# note\nk = v\n", &path()).unwrap();
        assert_eq!(source.get("local", "k"), Some("v"));
        assert_eq!(source.section_names(), vec!["local"]);
    }

    #[test]
    fn key_before_section_is_rejected() {
        let result = IniSource::parse("k = v\n[local]\n", &path());
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn duplicate_key_is_rejected() {
        let result = IniSource::parse("[local]\nk = 1\nK = 2\n", &path());
        match result {
            Err(ConfigError::ParseError { reason, .. }) => assert!(reason.contains("twice")),
            other => panic!("Expected ParseError, got {other:?}"),
        }
    }

    #[test]
    fn section_names_sorted() {
        assert_eq!(fixture().section_names(), vec!["dev", "local", "prod", "qa"]);
    }

    // --- loading from disk ---

    #[test]
    fn load_missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        let result = load_config_file(&dir.path().join("nope.ini")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn load_existing_file() {
        let dir = TempDir::new().unwrap();
        let file_path = dir.path().join("properties_config.ini");
        fs::write(&file_path, PROPERTIES_INI).unwrap();

        let source = load_config_file(&file_path).unwrap().unwrap();
        assert_eq!(source, fixture());
    }

    #[test]
    fn load_directory_is_io_error() {
        let dir = TempDir::new().unwrap();
        let result = load_config_file(dir.path());
        assert!(matches!(result, Err(ConfigError::IoError { .. })));
    }
}
