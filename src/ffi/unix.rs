//! dlopen / dlsym / dlclose backend.

use std::ffi::{c_void, CStr};
use std::path::{Path, PathBuf};

use libloading::os::unix::{Library, Symbol, RTLD_LOCAL, RTLD_NOW};

use crate::error::{Error, Result};

use super::library::{missing_symbol, DynamicLibrary};
use super::types::RawSymbol;

/// Shared object loaded through the system dynamic linker
#[derive(Debug)]
pub struct UnixLibrary {
    path: PathBuf,
    library: Library,
}

impl DynamicLibrary for UnixLibrary {
    unsafe fn open(path: &Path) -> Result<Self> {
        // Bind everything at load time so a broken library fails here rather
        // than halfway through a foreign call.
        let library = Library::open(Some(path), RTLD_NOW | RTLD_LOCAL).map_err(|source| {
            Error::LibraryLoad {
                path: path.to_path_buf(),
                source,
            }
        })?;
        tracing::debug!(path = %path.display(), "dlopen succeeded");

        Ok(Self {
            path: path.to_path_buf(),
            library,
        })
    }

    fn path(&self) -> &Path {
        &self.path
    }

    unsafe fn symbol(&self, name: &CStr) -> Result<RawSymbol> {
        let symbol: Symbol<*mut c_void> = self
            .library
            .get(name.to_bytes_with_nul())
            .map_err(|e| missing_symbol(name, Some(e)))?;

        // dlsym may legitimately hand back null for an exported data symbol;
        // nothing callable lives there.
        RawSymbol::new(*symbol).ok_or_else(|| missing_symbol(name, None))
    }

    fn close(self) -> Result<()> {
        let path = self.path;
        self.library
            .close()
            .map_err(|source| Error::LibraryUnload {
                path: path.clone(),
                source,
            })?;
        tracing::debug!(path = %path.display(), "dlclose succeeded");
        Ok(())
    }
}
