//! Dispatch Layer
//!
//! Resolves a symbol by name and calls it with one of the six fixed shapes.
//! This module is the only place where an untyped symbol address becomes a
//! typed function pointer. Anything else calls through [`Dispatcher`].

use std::ffi::c_void;
use std::mem;

use crate::error::Result;

use super::library::{symbol_name, DynamicLibrary};
use super::types::{ObjectRef, RawSymbol, Shape};

type VoidFn0 = unsafe extern "C" fn();
type VoidFn1 = unsafe extern "C" fn(*mut c_void);
type VoidFn2 = unsafe extern "C" fn(*mut c_void, *mut c_void);
type PtrFn0 = unsafe extern "C" fn() -> *mut c_void;
type PtrFn1 = unsafe extern "C" fn(*mut c_void) -> *mut c_void;
type PtrFn2 = unsafe extern "C" fn(*mut c_void, *mut c_void) -> *mut c_void;

/// Calls entry points of a borrowed library.
///
/// Every call resolves its symbol afresh; nothing is cached and nothing is
/// locked. The foreign library owns thread safety of what it runs.
pub struct Dispatcher<'lib, L> {
    library: &'lib L,
}

impl<'lib, L: DynamicLibrary> Dispatcher<'lib, L> {
    /// Create a dispatcher over a loaded library
    pub fn new(library: &'lib L) -> Self {
        Self { library }
    }

    /// Get the underlying library
    pub fn library(&self) -> &'lib L {
        self.library
    }

    /// Resolve `name` in the library's export table
    pub fn resolve(&self, name: &str, shape: Shape) -> Result<RawSymbol> {
        let c_name = symbol_name(name)?;
        // Safety: the address is only handed to the call_* methods below,
        // whose callers vouch for the shape.
        let symbol = unsafe { self.library.symbol(&c_name)? };
        tracing::trace!(
            symbol = name,
            %shape,
            addr = ?symbol.addr(),
            library = %self.library.path().display(),
            "resolved foreign entry point"
        );
        Ok(symbol)
    }

    /// Call `void name()`.
    ///
    /// # Safety
    ///
    /// For every `call_*` method: the symbol must be a function with exactly
    /// this shape under the C calling convention, and the arguments must be
    /// valid for it.
    pub unsafe fn call_void0(&self, name: &str) -> Result<()> {
        let f: VoidFn0 = mem::transmute(self.resolve(name, Shape::Void0)?.addr());
        f();
        Ok(())
    }

    /// Call `void name(a)`
    pub unsafe fn call_void1(&self, name: &str, a: *mut c_void) -> Result<()> {
        let f: VoidFn1 = mem::transmute(self.resolve(name, Shape::Void1)?.addr());
        f(a);
        Ok(())
    }

    /// Call `void name(a, b)`
    pub unsafe fn call_void2(&self, name: &str, a: *mut c_void, b: *mut c_void) -> Result<()> {
        let f: VoidFn2 = mem::transmute(self.resolve(name, Shape::Void2)?.addr());
        f(a, b);
        Ok(())
    }

    /// Call `void* name()`
    pub unsafe fn call_ptr0(&self, name: &str) -> Result<ObjectRef> {
        let f: PtrFn0 = mem::transmute(self.resolve(name, Shape::Ptr0)?.addr());
        Ok(ObjectRef::from_ptr(f()))
    }

    /// Call `void* name(a)`
    pub unsafe fn call_ptr1(&self, name: &str, a: *mut c_void) -> Result<ObjectRef> {
        let f: PtrFn1 = mem::transmute(self.resolve(name, Shape::Ptr1)?.addr());
        Ok(ObjectRef::from_ptr(f(a)))
    }

    /// Call `void* name(a, b)`
    pub unsafe fn call_ptr2(
        &self,
        name: &str,
        a: *mut c_void,
        b: *mut c_void,
    ) -> Result<ObjectRef> {
        let f: PtrFn2 = mem::transmute(self.resolve(name, Shape::Ptr2)?.addr());
        Ok(ObjectRef::from_ptr(f(a, b)))
    }
}
