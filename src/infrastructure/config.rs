//! Configuration management
//!
//! Defaults for command-line options can live in a `.tagsmith.toml` file.
//! The file is taken from `TAGSMITH_CONFIG` when set, otherwise it is looked
//! up from the directory of the edited file towards the file system root.

use crate::domain::{OutputFormat, Transform};
use crate::error::{Result, TagsmithError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = ".tagsmith.toml";
pub const CONFIG_ENV_VAR: &str = "TAGSMITH_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub transform: Option<Transform>,
    pub sort: Option<bool>,
    pub skip_unexported: Option<bool>,
    pub template: Option<String>,
    pub format: Option<OutputFormat>,
}

impl Config {
    /// Load config from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                TagsmithError::Config(format!("config file not found: {}", path.display()))
            } else {
                TagsmithError::Io(e)
            }
        })?;

        Ok(toml::from_str(&contents)?)
    }

    /// Find the config for a source file.
    /// First checks TAGSMITH_CONFIG environment variable, then falls back to discovery
    pub fn discover(source: &Path) -> Result<Self> {
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            let path = PathBuf::from(path);
            if path.as_os_str().is_empty() {
                return Ok(Config::default());
            }
            tracing::debug!(config = %path.display(), "loading config from {}", CONFIG_ENV_VAR);
            return Self::load_from_file(&path);
        }

        let start = source
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .map_or_else(std::env::current_dir, Ok)?;

        match Self::find_from(&start) {
            Some(path) => {
                tracing::debug!(config = %path.display(), "loading discovered config");
                Self::load_from_file(&path)
            }
            None => Ok(Config::default()),
        }
    }

    /// Walk up from `start` looking for a config file
    pub fn find_from(start: &Path) -> Option<PathBuf> {
        let mut current = Some(start);
        while let Some(dir) = current {
            let candidate = dir.join(CONFIG_FILE_NAME);
            if candidate.is_file() {
                return Some(candidate);
            }
            current = dir.parent();
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;
    use std::sync::{Mutex, OnceLock};
    use tempfile::TempDir;

    fn env_test_lock() -> &'static Mutex<()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
    }

    struct EnvVarRestore {
        key: &'static str,
        previous: Option<OsString>,
    }

    impl EnvVarRestore {
        fn capture(key: &'static str) -> Self {
            Self {
                key,
                previous: std::env::var_os(key),
            }
        }
    }

    impl Drop for EnvVarRestore {
        fn drop(&mut self) {
            if let Some(value) = &self.previous {
                std::env::set_var(self.key, value);
            } else {
                std::env::remove_var(self.key);
            }
        }
    }

    #[test]
    fn test_parse_config() {
        let config: Config = toml::from_str(
            r#"
transform = "camelcase"
sort = true
template = "column:{field}"
format = "json"
"#,
        )
        .unwrap();
        assert_eq!(config.transform, Some(Transform::CamelCase));
        assert_eq!(config.sort, Some(true));
        assert_eq!(config.skip_unexported, None);
        assert_eq!(config.template.as_deref(), Some("column:{field}"));
        assert_eq!(config.format, Some(OutputFormat::Json));
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "colour = \"red\"\n").unwrap();

        let result = Config::load_from_file(&path);
        assert!(matches!(result, Err(TagsmithError::TomlDeserialize(_))));
    }

    #[test]
    fn test_find_from_walks_up() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("pkg").join("sub");
        fs::create_dir_all(&nested).unwrap();
        fs::write(temp.path().join(CONFIG_FILE_NAME), "sort = true\n").unwrap();

        let found = Config::find_from(&nested).unwrap();
        assert_eq!(found, temp.path().join(CONFIG_FILE_NAME));
    }

    #[test]
    fn test_discover_without_file_is_default() {
        let _guard = env_test_lock().lock().unwrap();
        let _restore = EnvVarRestore::capture(CONFIG_ENV_VAR);
        std::env::remove_var(CONFIG_ENV_VAR);

        let temp = TempDir::new().unwrap();
        let source = temp.path().join("a.go");
        let config = Config::discover(&source).unwrap();
        // a config further up the real file system would still be found
        if Config::find_from(temp.path()).is_none() {
            assert_eq!(config, Config::default());
        }
    }

    #[test]
    fn test_discover_prefers_env_var() {
        let _guard = env_test_lock().lock().unwrap();
        let _restore = EnvVarRestore::capture(CONFIG_ENV_VAR);

        let temp = TempDir::new().unwrap();
        let explicit = temp.path().join("custom.toml");
        fs::write(&explicit, "transform = \"lispcase\"\n").unwrap();
        fs::write(temp.path().join(CONFIG_FILE_NAME), "transform = \"keep\"\n").unwrap();
        std::env::set_var(CONFIG_ENV_VAR, &explicit);

        let config = Config::discover(&temp.path().join("a.go")).unwrap();
        assert_eq!(config.transform, Some(Transform::LispCase));
    }

    #[test]
    fn test_discover_missing_env_file() {
        let _guard = env_test_lock().lock().unwrap();
        let _restore = EnvVarRestore::capture(CONFIG_ENV_VAR);

        let temp = TempDir::new().unwrap();
        std::env::set_var(CONFIG_ENV_VAR, temp.path().join("nope.toml"));

        let result = Config::discover(&temp.path().join("a.go"));
        assert!(matches!(result, Err(TagsmithError::Config(_))));
    }
}
