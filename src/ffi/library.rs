//! Library Handle Manager
//!
//! One trait, one implementation per platform family. The implementation is
//! picked at build time through [`PlatformLibrary`].

use std::ffi::{CStr, CString};
use std::path::Path;

use crate::error::{Error, Result};

use super::types::RawSymbol;

/// A loaded shared library.
pub trait DynamicLibrary: Sized {
    /// Load the library at `path`.
    ///
    /// # Safety
    ///
    /// Loading runs the library's initialization routines, which may do
    /// anything. The caller must trust the library.
    unsafe fn open(path: &Path) -> Result<Self>;

    /// Path the library was opened from
    fn path(&self) -> &Path;

    /// Look up an exported symbol by exact name.
    ///
    /// # Safety
    ///
    /// The returned address carries no type. Whoever calls through it must
    /// know the real signature.
    unsafe fn symbol(&self, name: &CStr) -> Result<RawSymbol>;

    /// Unload the library, reporting failure.
    fn close(self) -> Result<()>;
}

#[cfg(unix)]
pub type PlatformLibrary = super::unix::UnixLibrary;

#[cfg(windows)]
pub type PlatformLibrary = super::windows::WindowsLibrary;

/// Turn a symbol name into the C string the loader expects
pub fn symbol_name(name: &str) -> Result<CString> {
    if name.is_empty() {
        return Err(Error::InvalidSymbol {
            name: name.to_string(),
        });
    }
    CString::new(name).map_err(|_| Error::InvalidSymbol {
        name: name.to_string(),
    })
}

/// Build the error for a symbol that resolved to nothing
pub(crate) fn missing_symbol(name: &CStr, source: Option<libloading::Error>) -> Error {
    Error::SymbolNotFound {
        name: name.to_string_lossy().into_owned(),
        source,
    }
}
