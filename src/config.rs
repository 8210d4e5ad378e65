//! pyload Configuration
//!
//! Handles parsing of pyload.toml files and environment overrides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::error::Result;
use crate::ffi::{split_path_list, Locator, DEFAULT_CANDIDATES};
use crate::symbols::SymbolTable;

/// Name of the configuration file searched for by [`ShimConfig::find_and_load`].
pub const CONFIG_FILE: &str = "pyload.toml";

/// Overrides `library.path`.
pub const ENV_LIBRARY: &str = "PYLOAD_LIBRARY";

/// Extra search directories, put in front of `library.search_paths`.
pub const ENV_SEARCH_PATH: &str = "PYLOAD_SEARCH_PATH";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Config file not found: {0}")]
    NotFound(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Root configuration structure matching pyload.toml.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShimConfig {
    /// Where the interpreter library lives
    #[serde(default)]
    pub library: LibraryConfig,

    /// Entry point names
    #[serde(default)]
    pub symbols: SymbolTable,
}

impl ShimConfig {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        let config: ShimConfig = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Load configuration from the current directory or parents.
    pub fn load_from_cwd() -> ConfigResult<Self> {
        let cwd = std::env::current_dir()?;
        Self::find_and_load(&cwd)
    }

    /// Find and load configuration by searching up from the given directory.
    pub fn find_and_load(start_dir: &Path) -> ConfigResult<Self> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let config_path = dir.join(CONFIG_FILE);
            if config_path.exists() {
                return Self::load(&config_path);
            }
            if !dir.pop() {
                // Reached root without finding config
                return Ok(Self::default());
            }
        }
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply `PYLOAD_LIBRARY` and `PYLOAD_SEARCH_PATH` from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides using `lookup` in place of the process environment.
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(library) = lookup(ENV_LIBRARY).filter(|v| !v.is_empty()) {
            tracing::debug!(library = %library, "library overridden from {}", ENV_LIBRARY);
            self.library.path = Some(library);
        }
        if let Some(list) = lookup(ENV_SEARCH_PATH) {
            let mut paths = split_path_list(&list);
            paths.append(&mut self.library.search_paths);
            self.library.search_paths = paths;
        }
    }

    /// Build the locator for this configuration
    pub fn locator(&self) -> Locator {
        let mut locator = Locator::new();
        for path in self.library.search_paths.iter().rev() {
            locator.prepend_search_path(path);
        }
        locator
    }

    /// Work out which library file to open.
    ///
    /// An explicit `library.path` that cannot be found on disk is passed to
    /// the OS loader unchanged, which applies its own search rules. Without
    /// one, the candidates are tried in order.
    pub fn resolve_library(&self) -> Result<PathBuf> {
        let locator = self.locator();
        match &self.library.path {
            Some(name) => Ok(locator.find(name).unwrap_or_else(|| {
                tracing::warn!(
                    library = %name,
                    "library not found in search paths, deferring to the system loader"
                );
                PathBuf::from(name)
            })),
            None if self.library.candidates.is_empty() => {
                locator.find_interpreter(DEFAULT_CANDIDATES)
            }
            None => locator.find_interpreter(&self.library.candidates),
        }
    }
}

/// Library location settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryConfig {
    /// Library path or bare name (e.g. "python3.11")
    #[serde(default)]
    pub path: Option<String>,

    /// Directories searched before the platform defaults
    #[serde(default)]
    pub search_paths: Vec<PathBuf>,

    /// Names tried when no path is given (platform defaults when empty)
    #[serde(default)]
    pub candidates: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use std::collections::HashMap;
    use std::fs;

    #[test]
    fn test_default_config() {
        let config = ShimConfig::default();
        assert!(config.library.path.is_none());
        assert!(config.library.search_paths.is_empty());
        assert_eq!(config.symbols, SymbolTable::default());
    }

    #[test]
    fn test_parse_config() {
        let toml_str = r#"
[library]
path = "python3.11"
search_paths = ["/opt/python/lib"]

[symbols]
initialize = "Foo_Initialize"
run_string = "Foo_RunString"
"#;
        let config: ShimConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.library.path.as_deref(), Some("python3.11"));
        assert_eq!(
            config.library.search_paths,
            vec![PathBuf::from("/opt/python/lib")]
        );
        assert_eq!(config.symbols.initialize, "Foo_Initialize");
        assert_eq!(config.symbols.run_string, "Foo_RunString");
        // Unlisted symbols keep their defaults
        assert_eq!(config.symbols.finalize, "Py_FinalizeEx");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);

        let mut config = ShimConfig::default();
        config.library.path = Some("libpython3.12.so.1.0".to_string());
        config.symbols = SymbolTable::with_prefix("Foo");
        config.save(&path).unwrap();

        let loaded = ShimConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = ShimConfig::load(&dir.path().join("nope.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[library\npath = 3").unwrap();
        assert!(matches!(ShimConfig::load(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_find_and_load_walks_parents() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            "[library]\npath = \"from-parent\"\n",
        )
        .unwrap();
        let nested = dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();

        let config = ShimConfig::find_and_load(&nested).unwrap();
        assert_eq!(config.library.path.as_deref(), Some("from-parent"));
    }

    #[test]
    fn test_env_overrides() {
        let extra = std::env::join_paths(["/env/one", "/env/two"]).unwrap();
        let env: HashMap<&str, String> = [
            (ENV_LIBRARY, "libfoo.so".to_string()),
            (ENV_SEARCH_PATH, extra.to_string_lossy().into_owned()),
        ]
        .into_iter()
        .collect();

        let mut config = ShimConfig::default();
        config.library.path = Some("python3".to_string());
        config.library.search_paths = vec![PathBuf::from("/from/file")];
        config.apply_env_from(|key| env.get(key).cloned());

        assert_eq!(config.library.path.as_deref(), Some("libfoo.so"));
        assert_eq!(
            config.library.search_paths,
            vec![
                PathBuf::from("/env/one"),
                PathBuf::from("/env/two"),
                PathBuf::from("/from/file"),
            ]
        );
    }

    #[test]
    fn test_empty_env_library_is_ignored() {
        let mut config = ShimConfig::default();
        config.library.path = Some("python3".to_string());
        config.apply_env_from(|key| (key == ENV_LIBRARY).then(String::new));
        assert_eq!(config.library.path.as_deref(), Some("python3"));
    }

    #[test]
    fn test_resolve_library_prefers_configured_search_path() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join(crate::ffi::library_filename("pyloadtest"));
        fs::write(&file, b"").unwrap();

        let mut config = ShimConfig::default();
        config.library.path = Some("pyloadtest".to_string());
        config.library.search_paths = vec![dir.path().to_path_buf()];
        assert_eq!(config.resolve_library().unwrap(), file);
    }

    #[test]
    fn test_resolve_library_defers_unknown_name_to_os() {
        let mut config = ShimConfig::default();
        config.library.path = Some("definitely-not-installed-lib".to_string());
        assert_eq!(
            config.resolve_library().unwrap(),
            PathBuf::from("definitely-not-installed-lib")
        );
    }

    #[test]
    fn test_resolve_library_reports_missing_candidates() {
        let mut config = ShimConfig::default();
        config.library.candidates = vec!["no-such-interpreter-a".into(), "no-such-interpreter-b".into()];
        match config.resolve_library() {
            Err(Error::LibraryNotFound { searched }) => {
                assert_eq!(searched, config.library.candidates);
            }
            other => panic!("Expected LibraryNotFound, got {:?}", other),
        }
    }
}
