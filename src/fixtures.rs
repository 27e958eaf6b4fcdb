#[cfg(test)]
pub mod test {
    use std::fs;
    use std::io;
    use std::sync::{Arc, Mutex};

    use tempfile::TempDir;
    use tracing::subscriber::DefaultGuard;

    use crate::env::Environment;

    /// Backing file shared by the reader and registry tests.
    pub const PROPERTIES_INI: &str = "\
[DEFAULT]
test.DEFAULT = constant

[local]
test.TEST1 = local1
test.TEST2 = local2
test.GUTS = guts:24
test.CASCA = casca:24
test.BAD = griffith
test.LIST = [1, 2, 3]
test.BADLIST = 1,2,3]
test.PORT = 8080
test.RATE = 0.25
test.DEBUG = yes
test.NOTANUMBER = eighty
pytest.TEST1 = local3
pytest.TEST2 = local4

[dev]
test.TEST1 = dev1
test.TEST2 = dev2

[qa]
test.TEST1 = qa1
test.TEST2 = qa2

[prod]
test.TEST1 = prod1
test.TEST2 = prod2
";

    /// A config file on disk that lives as long as the returned `TempDir`.
    pub struct FixtureFile {
        _dir: TempDir,
        pub path: String,
    }

    pub fn write_fixture() -> FixtureFile {
        write_ini(PROPERTIES_INI)
    }

    pub fn write_ini(content: &str) -> FixtureFile {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("properties_config.ini");
        fs::write(&path, content).unwrap();
        FixtureFile {
            path: path.to_string_lossy().into_owned(),
            _dir: dir,
        }
    }

    /// An environment pointing at `config_location` with the given section.
    pub fn environment(app_environment: &str, config_location: &str) -> Environment {
        Environment::from_vars([
            ("APP_ENVIRONMENT".to_string(), app_environment.to_string()),
            ("CONFIG_LOCATION".to_string(), config_location.to_string()),
        ])
    }

    /// In-memory sink for events emitted while its guard is alive.
    #[derive(Clone, Default)]
    pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

    impl io::Write for LogCapture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl LogCapture {
        /// Route this thread's events into the capture until the guard drops.
        pub fn install(&self) -> DefaultGuard {
            let writer = self.clone();
            let subscriber = tracing_subscriber::fmt()
                .with_ansi(false)
                .with_max_level(tracing::Level::DEBUG)
                .with_writer(move || writer.clone())
                .finish();
            tracing::subscriber::set_default(subscriber)
        }

        pub fn lines(&self) -> Vec<String> {
            String::from_utf8_lossy(&self.0.lock().unwrap())
                .lines()
                .map(str::to_string)
                .collect()
        }

        /// Captured lines at ERROR level.
        pub fn errors(&self) -> Vec<String> {
            self.lines()
                .into_iter()
                .filter(|line| line.contains(" ERROR "))
                .collect()
        }
    }

    // -- Custom type used by handler tests --------------------------------------

    #[derive(Debug, Clone, PartialEq)]
    pub struct Person {
        pub name: String,
        pub age: u32,
    }

    impl Person {
        pub fn new(name: &str, age: u32) -> Self {
            Self {
                name: name.to_string(),
                age,
            }
        }

        /// Parse `name:age`.
        pub fn parse_person(raw: &str) -> Result<Person, String> {
            let Some((name, age)) = raw.split_once(':') else {
                return Err(format!(
                    "a person string must have exactly one ':' separating name and age, got '{raw}'"
                ));
            };
            if age.contains(':') {
                return Err(format!("too many ':' in person string '{raw}'"));
            }
            let age = age
                .parse::<u32>()
                .map_err(|_| format!("the age after ':' must be an integer, got '{age}'"))?;
            Ok(Person::new(name, age))
        }
    }

    #[test]
    fn parse_person_accepts_name_and_age() {
        assert_eq!(Person::parse_person("guts:24"), Ok(Person::new("guts", 24)));
    }

    #[test]
    fn log_capture_sees_events_only_while_installed() {
        let capture = LogCapture::default();
        {
            let _guard = capture.install();
            tracing::error!("captured");
        }
        tracing::error!("after drop");
        assert_eq!(capture.errors().len(), 1);
        assert!(capture.errors()[0].contains("captured"));
    }

    #[test]
    fn parse_person_rejects_garbage() {
        assert!(Person::parse_person("griffith").is_err());
        assert!(Person::parse_person("a:b:c").is_err());
        assert!(Person::parse_person("a:old").is_err());
    }
}
