//! FFI Module for pyload
//!
//! Loads a shared library at runtime and calls its entry points through a
//! handful of fixed, pointer-only call shapes.
//!
//! # Architecture
//!
//! ```text
//! Interpreter::run_string("print(1)")
//!       │
//!       ▼
//! Dispatcher::call_void1("PyRun_SimpleString", ptr)
//!       │
//!       ▼
//! DynamicLibrary::symbol (dlsym / GetProcAddress)
//!       │
//!       ▼
//! Native Function Call
//! ```
//!
//! # Example
//!
//! ```ignore
//! let library = unsafe { PlatformLibrary::open(Path::new("libpython3.12.so.1.0"))? };
//! let dispatcher = Dispatcher::new(&library);
//! unsafe { dispatcher.call_void0("Py_Initialize")? };
//! library.close()?;
//! ```

mod dispatch;
mod library;
mod loader;
mod types;

#[cfg(unix)]
mod unix;
#[cfg(windows)]
mod windows;

pub use dispatch::Dispatcher;
pub use library::{symbol_name, DynamicLibrary, PlatformLibrary};
pub use loader::{library_filename, split_path_list, Locator, DEFAULT_CANDIDATES};
pub use types::{ObjectRef, RawSymbol, Shape};

#[cfg(unix)]
pub use unix::UnixLibrary;
#[cfg(windows)]
pub use windows::WindowsLibrary;
