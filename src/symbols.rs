//! Foreign entry point names.
//!
//! The named operations of [`Interpreter`](crate::Interpreter) go through a
//! [`SymbolTable`], so the same session code drives CPython or any runtime
//! exporting the same shapes under other names.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::ffi::{symbol_name, Shape};

/// Foreign entry points used by the named operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Initialize,
    InitThreads,
    Finalize,
    RunString,
    ImportModule,
    GetAttribute,
    CallObject,
}

impl Operation {
    /// Every operation, in table order
    pub const ALL: [Operation; 7] = [
        Operation::Initialize,
        Operation::InitThreads,
        Operation::Finalize,
        Operation::RunString,
        Operation::ImportModule,
        Operation::GetAttribute,
        Operation::CallObject,
    ];

    /// Call shape of the entry point
    pub fn shape(self) -> Shape {
        match self {
            Operation::Initialize | Operation::InitThreads | Operation::Finalize => Shape::Void0,
            Operation::RunString => Shape::Void1,
            Operation::ImportModule => Shape::Ptr1,
            Operation::GetAttribute | Operation::CallObject => Shape::Ptr2,
        }
    }

    /// Key of this operation in `[symbols]`
    pub fn key(self) -> &'static str {
        match self {
            Operation::Initialize => "initialize",
            Operation::InitThreads => "init_threads",
            Operation::Finalize => "finalize",
            Operation::RunString => "run_string",
            Operation::ImportModule => "import_module",
            Operation::GetAttribute => "get_attribute",
            Operation::CallObject => "call_object",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Symbol names for each operation. Defaults are the CPython C API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SymbolTable {
    pub initialize: String,
    pub init_threads: String,
    pub finalize: String,
    pub run_string: String,
    pub import_module: String,
    pub get_attribute: String,
    pub call_object: String,
}

impl SymbolTable {
    /// Build a table of `{prefix}_Initialize`-style names.
    ///
    /// `with_prefix("Py")` does not reproduce the CPython table, whose names
    /// are spread over several prefixes.
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            initialize: format!("{}_Initialize", prefix),
            init_threads: format!("{}_Initialize_Threads", prefix),
            finalize: format!("{}_Finalize", prefix),
            run_string: format!("{}_RunString", prefix),
            import_module: format!("{}_ImportModule", prefix),
            get_attribute: format!("{}_GetAttrString", prefix),
            call_object: format!("{}_CallObject", prefix),
        }
    }

    /// Symbol name bound to an operation
    pub fn symbol(&self, op: Operation) -> &str {
        match op {
            Operation::Initialize => &self.initialize,
            Operation::InitThreads => &self.init_threads,
            Operation::Finalize => &self.finalize,
            Operation::RunString => &self.run_string,
            Operation::ImportModule => &self.import_module,
            Operation::GetAttribute => &self.get_attribute,
            Operation::CallObject => &self.call_object,
        }
    }

    /// Check that every name is usable as a symbol
    pub fn validate(&self) -> Result<()> {
        for op in Operation::ALL {
            symbol_name(self.symbol(op))?;
        }
        Ok(())
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self {
            initialize: "Py_Initialize".to_string(),
            init_threads: "PyEval_InitThreads".to_string(),
            finalize: "Py_FinalizeEx".to_string(),
            run_string: "PyRun_SimpleString".to_string(),
            import_module: "PyImport_ImportModule".to_string(),
            get_attribute: "PyObject_GetAttrString".to_string(),
            call_object: "PyObject_CallObject".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_default_table_is_cpython() {
        let table = SymbolTable::default();
        assert_eq!(table.symbol(Operation::Initialize), "Py_Initialize");
        assert_eq!(table.symbol(Operation::InitThreads), "PyEval_InitThreads");
        assert_eq!(table.symbol(Operation::Finalize), "Py_FinalizeEx");
        assert_eq!(table.symbol(Operation::RunString), "PyRun_SimpleString");
        assert_eq!(table.symbol(Operation::GetAttribute), "PyObject_GetAttrString");
        assert!(table.validate().is_ok());
    }

    #[test]
    fn test_prefixed_table() {
        let table = SymbolTable::with_prefix("Foo");
        assert_eq!(table.initialize, "Foo_Initialize");
        assert_eq!(table.init_threads, "Foo_Initialize_Threads");
        assert_eq!(table.run_string, "Foo_RunString");
        assert_eq!(table.call_object, "Foo_CallObject");
    }

    #[test]
    fn test_operation_shapes() {
        assert_eq!(Operation::Initialize.shape(), Shape::Void0);
        assert_eq!(Operation::Finalize.shape(), Shape::Void0);
        assert_eq!(Operation::RunString.shape(), Shape::Void1);
        assert_eq!(Operation::ImportModule.shape(), Shape::Ptr1);
        assert_eq!(Operation::GetAttribute.shape(), Shape::Ptr2);
        assert_eq!(Operation::CallObject.shape(), Shape::Ptr2);
    }

    #[test]
    fn test_validate_rejects_bad_names() {
        let mut table = SymbolTable::default();
        table.finalize = String::new();
        assert!(matches!(table.validate(), Err(Error::InvalidSymbol { .. })));

        let mut table = SymbolTable::default();
        table.run_string = "Py\0Run".to_string();
        assert!(matches!(table.validate(), Err(Error::InvalidSymbol { .. })));
    }
}
