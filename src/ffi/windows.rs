//! LoadLibraryExW / GetProcAddress / FreeLibrary backend.

use std::ffi::{c_void, CStr};
use std::path::{Path, PathBuf};

use libloading::os::windows::{Library, Symbol};

use crate::error::{Error, Result};

use super::library::{missing_symbol, DynamicLibrary};
use super::types::RawSymbol;

/// DLL loaded through the Windows loader
#[derive(Debug)]
pub struct WindowsLibrary {
    path: PathBuf,
    library: Library,
}

impl DynamicLibrary for WindowsLibrary {
    unsafe fn open(path: &Path) -> Result<Self> {
        let library = Library::new(path).map_err(|source| Error::LibraryLoad {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "LoadLibraryExW succeeded");

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
        tracing::debug!(path = %path.display(), "FreeLibrary succeeded");
        Ok(())
    }
}
