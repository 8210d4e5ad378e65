//! pyload - Runtime loader for an embeddable interpreter
//!
//! Locates an interpreter's shared library (CPython by default) at runtime,
//! resolves a fixed set of its C entry points by name, and forwards calls to
//! them. The interpreter itself, its object model and its memory management
//! all live in the loaded library; this crate only loads, looks up and calls.
//!
//! # Example
//!
//! ```no_run
//! use pyload::{Interpreter, ShimConfig};
//!
//! let mut config = ShimConfig::load_from_cwd()?;
//! config.apply_env();
//!
//! // Safety: the configured library is a CPython build exporting the
//! // default symbol table.
//! let vm = unsafe { Interpreter::from_config(&config)? };
//! vm.initialize()?;
//! vm.run_string("print('hello from the embedded interpreter')")?;
//! vm.finalize()?;
//! vm.close()?;
//! # Ok::<(), pyload::Error>(())
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐
//! │ Interpreter session  │  initialize / run_string / import_module ...
//! └──────────┬───────────┘
//!            │ SymbolTable (names) + Operation (shapes)
//!            ▼
//! ┌──────────────────────┐
//! │ Dispatcher           │  the only untyped -> typed cast
//! └──────────┬───────────┘
//!            ▼
//! ┌──────────────────────┐
//! │ DynamicLibrary       │  UnixLibrary | WindowsLibrary
//! └──────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod ffi;
pub mod session;
pub mod symbols;

pub use config::{ConfigError, LibraryConfig, ShimConfig};
pub use error::{Error, Result};
pub use ffi::{Dispatcher, DynamicLibrary, Locator, ObjectRef, PlatformLibrary, Shape};
pub use session::{Interpreter, SharedInterpreter};
pub use symbols::{Operation, SymbolTable};
