//! Interpreter Sessions
//!
//! An [`Interpreter`] owns one loaded library and forwards the named
//! operations to it through the [`Dispatcher`].

use std::cell::Cell;
use std::ffi::CString;
use std::marker::PhantomData;
use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::ShimConfig;
use crate::error::{Error, Result};
use crate::ffi::{Dispatcher, DynamicLibrary, ObjectRef, PlatformLibrary};
use crate::symbols::{Operation, SymbolTable};

/// A session over one embeddable interpreter library.
///
/// The session is `Send` but not `Sync`: moving it to another thread is
/// fine, sharing it is not. Use [`SharedInterpreter`] for that.
///
/// Foreign object references handed out by a session are only meaningful
/// while it is open. Dropping a session without [`close`](Self::close)
/// unloads the library and discards any unload error.
pub struct Interpreter<L = PlatformLibrary> {
    library: L,
    symbols: SymbolTable,
    _not_sync: PhantomData<Cell<()>>,
}

impl Interpreter<PlatformLibrary> {
    /// Open the library at `path` with the CPython symbol table.
    ///
    /// # Safety
    ///
    /// The library must export every symbol of the table with the shape
    /// listed by [`Operation::shape`]. Loading it runs its initializers.
    pub unsafe fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::load(path.as_ref(), SymbolTable::default())
    }

    /// Open the library at `path` with a custom symbol table.
    ///
    /// # Safety
    ///
    /// Same contract as [`Interpreter::open`].
    pub unsafe fn open_with_symbols(path: impl AsRef<Path>, symbols: SymbolTable) -> Result<Self> {
        Self::load(path.as_ref(), symbols)
    }

    /// Locate and open the library described by a configuration.
    ///
    /// # Safety
    ///
    /// Same contract as [`Interpreter::open`].
    pub unsafe fn from_config(config: &ShimConfig) -> Result<Self> {
        config.symbols.validate()?;
        let path = config.resolve_library()?;
        Self::load(&path, config.symbols.clone())
    }
}

impl<L: DynamicLibrary> Interpreter<L> {
    /// Validate the symbol table, then load the library.
    ///
    /// # Safety
    ///
    /// Same contract as [`Interpreter::open`].
    pub unsafe fn load(path: &Path, symbols: SymbolTable) -> Result<Self> {
        symbols.validate()?;
        let library = L::open(path)?;
        tracing::debug!(path = %path.display(), "interpreter session opened");
        Ok(Self::from_library(library, symbols))
    }

    /// Wrap an already loaded library.
    ///
    /// # Safety
    ///
    /// Same contract as [`Interpreter::open`].
    pub unsafe fn from_library(library: L, symbols: SymbolTable) -> Self {
        Self {
            library,
            symbols,
            _not_sync: PhantomData,
        }
    }

    /// Path the library was loaded from
    pub fn path(&self) -> &Path {
        self.library.path()
    }

    /// Symbol table used by the named operations
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// The loaded library
    pub fn library(&self) -> &L {
        &self.library
    }

    /// Generic dispatcher over this session's library
    pub fn dispatcher(&self) -> Dispatcher<'_, L> {
        Dispatcher::new(&self.library)
    }

    /// Unload the library.
    pub fn close(self) -> Result<()> {
        let path = self.library.path().to_path_buf();
        self.library.close()?;
        tracing::debug!(path = %path.display(), "interpreter session closed");
        Ok(())
    }

    fn symbol(&self, op: Operation) -> &str {
        self.symbols.symbol(op)
    }

    /// Initialize the interpreter, then its thread support.
    pub fn initialize(&self) -> Result<()> {
        let dispatcher = self.dispatcher();
        // Safety: open() made the caller vouch for the table's shapes.
        unsafe {
            dispatcher.call_void0(self.symbol(Operation::Initialize))?;
            dispatcher.call_void0(self.symbol(Operation::InitThreads))?;
        }
        Ok(())
    }

    /// Finalize the interpreter.
    pub fn finalize(&self) -> Result<()> {
        unsafe { self.dispatcher().call_void0(self.symbol(Operation::Finalize)) }
    }

    /// Execute source text. The text is forwarded as-is.
    pub fn run_string(&self, source: &str) -> Result<()> {
        let source = CString::new(source)?;
        unsafe {
            self.dispatcher()
                .call_void1(self.symbol(Operation::RunString), source.as_ptr() as *mut _)
        }
    }

    /// Import a module by name.
    ///
    /// A null reference usually means the import failed; that is for the
    /// caller to find out through the foreign library.
    pub fn import_module(&self, name: &str) -> Result<ObjectRef> {
        let name = CString::new(name)?;
        unsafe {
            self.dispatcher()
                .call_ptr1(self.symbol(Operation::ImportModule), name.as_ptr() as *mut _)
        }
    }

    /// Look up attribute `name` on `receiver`.
    ///
    /// # Safety
    ///
    /// `receiver` must be a live object of this session's interpreter.
    pub unsafe fn get_attribute(&self, receiver: ObjectRef, name: &str) -> Result<ObjectRef> {
        let name = CString::new(name)?;
        self.dispatcher().call_ptr2(
            self.symbol(Operation::GetAttribute),
            receiver.as_ptr(),
            name.as_ptr() as *mut _,
        )
    }

    /// Call `callable` with the argument tuple `args` (may be null).
    ///
    /// # Safety
    ///
    /// Both references must be live objects of this session's interpreter,
    /// or null where the foreign API allows it.
    pub unsafe fn call_object(&self, callable: ObjectRef, args: ObjectRef) -> Result<ObjectRef> {
        self.dispatcher().call_ptr2(
            self.symbol(Operation::CallObject),
            callable.as_ptr(),
            args.as_ptr(),
        )
    }
}

/// Interpreter session usable from several threads.
///
/// Every access goes through one mutex, so symbol resolution and foreign
/// calls made through it never overlap.
pub struct SharedInterpreter<L = PlatformLibrary> {
    inner: Arc<Mutex<Interpreter<L>>>,
}

impl<L: DynamicLibrary> SharedInterpreter<L> {
    /// Share a session
    pub fn new(interpreter: Interpreter<L>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(interpreter)),
        }
    }

    /// Run `f` with exclusive access to the session
    pub fn with<R>(&self, f: impl FnOnce(&Interpreter<L>) -> R) -> R {
        let guard = self.inner.lock();
        f(&guard)
    }

    /// Number of handles sharing the session
    pub fn handle_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Close the session. Fails while other handles are alive.
    pub fn close(self) -> Result<()> {
        match Arc::try_unwrap(self.inner) {
            Ok(mutex) => mutex.into_inner().close(),
            Err(_) => Err(Error::SessionInUse),
        }
    }
}

impl<L> Clone for SharedInterpreter<L> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<L: DynamicLibrary> From<Interpreter<L>> for SharedInterpreter<L> {
    fn from(interpreter: Interpreter<L>) -> Self {
        Self::new(interpreter)
    }
}
