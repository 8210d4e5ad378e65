//! FFI Value Types
//!
//! Opaque pointer-sized values exchanged with the foreign library, and the
//! call shapes the dispatch layer knows how to invoke.

use std::ffi::c_void;
use std::fmt;
use std::ptr::{self, NonNull};

/// Opaque reference to a value living inside the foreign library.
///
/// The value is never dereferenced, retained or released on this side.
/// Ownership and lifetime follow the foreign library's own rules, and a
/// reference is meaningless once its session has been closed. A null
/// reference is how the foreign side usually reports failure.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectRef(*mut c_void);

impl ObjectRef {
    /// The null reference
    pub const NULL: ObjectRef = ObjectRef(ptr::null_mut());

    /// Wrap a raw pointer handed out by the foreign library
    pub fn from_ptr(ptr: *mut c_void) -> Self {
        Self(ptr)
    }

    /// Get the raw pointer, for passing back into foreign calls
    pub fn as_ptr(self) -> *mut c_void {
        self.0
    }

    /// Check if this is the null reference
    pub fn is_null(self) -> bool {
        self.0.is_null()
    }
}

impl Default for ObjectRef {
    fn default() -> Self {
        Self::NULL
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectRef({:p})", self.0)
    }
}

/// Resolved address of an exported symbol. Never null.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawSymbol(NonNull<c_void>);

impl RawSymbol {
    /// Wrap a symbol address, rejecting null
    pub fn new(addr: *mut c_void) -> Option<Self> {
        NonNull::new(addr).map(Self)
    }

    /// Get the symbol address
    pub fn addr(self) -> *mut c_void {
        self.0.as_ptr()
    }
}

/// Call shape of a foreign entry point.
///
/// Arguments and return values are all opaque pointer-sized values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// `void f()`
    Void0,
    /// `void f(void*)`
    Void1,
    /// `void f(void*, void*)`
    Void2,
    /// `void* f()`
    Ptr0,
    /// `void* f(void*)`
    Ptr1,
    /// `void* f(void*, void*)`
    Ptr2,
}

impl Shape {
    /// Number of pointer arguments
    pub fn arity(self) -> usize {
        match self {
            Shape::Void0 | Shape::Ptr0 => 0,
            Shape::Void1 | Shape::Ptr1 => 1,
            Shape::Void2 | Shape::Ptr2 => 2,
        }
    }

    /// Whether the entry point returns a pointer
    pub fn returns_pointer(self) -> bool {
        matches!(self, Shape::Ptr0 | Shape::Ptr1 | Shape::Ptr2)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ret = if self.returns_pointer() { "ptr" } else { "void" };
        write!(f, "{}(", ret)?;
        for i in 0..self.arity() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "ptr")?;
        }
        write!(f, ")")
    }
}
