//! Interpreter Library Locator
//!
//! Finds the interpreter's shared library on disk before it is handed to
//! the platform loader.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Well-known CPython library names, newest first
#[cfg(target_os = "linux")]
pub const DEFAULT_CANDIDATES: &[&str] = &[
    "libpython3.13.so.1.0",
    "libpython3.12.so.1.0",
    "libpython3.11.so.1.0",
    "libpython3.10.so.1.0",
    "libpython3.9.so.1.0",
    "libpython3.8.so.1.0",
    "python3",
];

#[cfg(target_os = "macos")]
pub const DEFAULT_CANDIDATES: &[&str] = &[
    "python3.13",
    "python3.12",
    "python3.11",
    "python3.10",
    "python3.9",
    "python3.8",
    "python3",
];

#[cfg(target_os = "windows")]
pub const DEFAULT_CANDIDATES: &[&str] = &[
    "python313",
    "python312",
    "python311",
    "python310",
    "python39",
    "python38",
    "python3",
];

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
pub const DEFAULT_CANDIDATES: &[&str] = &["libpython3.so", "python3"];

/// Library locator with search paths
#[derive(Debug, Clone)]
pub struct Locator {
    search_paths: Vec<PathBuf>,
}

impl Locator {
    /// Create a locator with the platform's default search paths
    pub fn new() -> Self {
        Self {
            search_paths: default_search_paths(),
        }
    }

    /// Create a locator that only looks in the given directories
    pub fn with_search_paths(paths: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            search_paths: paths.into_iter().collect(),
        }
    }

    /// Add a search path (searched after the existing ones)
    pub fn add_search_path(&mut self, path: impl AsRef<Path>) {
        self.search_paths.push(path.as_ref().to_path_buf());
    }

    /// Put a search path in front of the existing ones
    pub fn prepend_search_path(&mut self, path: impl AsRef<Path>) {
        self.search_paths.insert(0, path.as_ref().to_path_buf());
    }

    /// Directories searched, in order
    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// Find a library by path or name
    pub fn find(&self, name: &str) -> Option<PathBuf> {
        // If it's already a path, check if it exists
        let path = Path::new(name);
        if path.is_file() {
            return Some(path.to_path_buf());
        }

        let lib_name = library_filename(name);
        for search_path in &self.search_paths {
            for file in [lib_name.as_str(), name] {
                let full_path = search_path.join(file);
                if full_path.is_file() {
                    return Some(full_path);
                }
            }
        }

        None
    }

    /// Find the first candidate present on disk
    pub fn find_interpreter<S: AsRef<str>>(&self, candidates: &[S]) -> Result<PathBuf> {
        for candidate in candidates {
            if let Some(path) = self.find(candidate.as_ref()) {
                tracing::debug!(
                    candidate = candidate.as_ref(),
                    path = %path.display(),
                    "located interpreter library"
                );
                return Ok(path);
            }
        }

        Err(Error::LibraryNotFound {
            searched: candidates.iter().map(|c| c.as_ref().to_string()).collect(),
        })
    }
}

impl Default for Locator {
    fn default() -> Self {
        Self::new()
    }
}

/// Split a platform path list (`:` on unix, `;` on Windows)
pub fn split_path_list(list: &str) -> Vec<PathBuf> {
    std::env::split_paths(list)
        .filter(|p| !p.as_os_str().is_empty())
        .collect()
}

/// Get the default library search paths for this platform
fn default_search_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd);
    }

    #[cfg(target_os = "linux")]
    {
        if let Ok(ld_path) = std::env::var("LD_LIBRARY_PATH") {
            paths.extend(split_path_list(&ld_path));
        }
        paths.push(PathBuf::from("/usr/local/lib"));
        paths.push(PathBuf::from("/usr/lib"));
        paths.push(PathBuf::from("/usr/lib64"));
        paths.push(PathBuf::from("/usr/lib/x86_64-linux-gnu"));
        paths.push(PathBuf::from("/usr/lib/aarch64-linux-gnu"));
        paths.push(PathBuf::from("/lib"));
        paths.push(PathBuf::from("/lib64"));
    }

    #[cfg(target_os = "macos")]
    {
        if let Ok(dyld_path) = std::env::var("DYLD_LIBRARY_PATH") {
            paths.extend(split_path_list(&dyld_path));
        }
        paths.push(PathBuf::from("/opt/homebrew/lib"));
        paths.push(PathBuf::from("/usr/local/lib"));
        paths.push(PathBuf::from("/usr/lib"));
    }

    #[cfg(target_os = "windows")]
    {
        if let Ok(path) = std::env::var("PATH") {
            paths.extend(split_path_list(&path));
        }
        paths.push(PathBuf::from("C:\\Windows\\System32"));
    }

    paths
}

/// Construct the platform-specific library filename
pub fn library_filename(name: &str) -> String {
    #[cfg(any(target_os = "macos", target_os = "ios"))]
    {
        if name.starts_with("lib") && name.ends_with(".dylib") {
            name.to_string()
        } else {
            format!("lib{}.dylib", name)
        }
    }

    #[cfg(target_os = "windows")]
    {
        if name.to_ascii_lowercase().ends_with(".dll") {
            name.to_string()
        } else {
            format!("{}.dll", name)
        }
    }

    #[cfg(all(unix, not(any(target_os = "macos", target_os = "ios"))))]
    {
        if name.starts_with("lib") && (name.ends_with(".so") || name.contains(".so.")) {
            name.to_string()
        } else {
            format!("lib{}.so", name)
        }
    }

    #[cfg(not(any(unix, target_os = "windows")))]
    {
        name.to_string()
    }
}
