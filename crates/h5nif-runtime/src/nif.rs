//! Native function table
//!
//! The set of functions a host loads from this library, looked up by name.
//! Dispatch never unwinds into the host: errors come back as
//! `{error, "message"}` and a panic inside an operation is caught and
//! reported the same way.

use crate::api::native::{BuildError, NativeFunction, NativeFunctionBuilder};
use crate::h5t::{Datatypes, H5tError, Operation};
use crate::value::Term;
use serde::Serialize;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// Module name the host loads the table under
pub const MODULE_NAME: &str = "h5t";

/// One row of the exported function table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionInfo {
    pub name: String,
    pub arity: Option<usize>,
    pub aliases: Vec<String>,
}

/// A named table of native functions
#[derive(Debug, Clone, Default)]
pub struct NifModule {
    functions: Vec<NativeFunction>,
}

impl NifModule {
    /// Empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// The datatype functions, each under its `h5t` name and its short alias
    pub fn h5t(datatypes: Arc<Datatypes>) -> Result<Self, BuildError> {
        let mut module = Self::new();
        for op in Operation::ALL {
            let datatypes = Arc::clone(&datatypes);
            let function = NativeFunctionBuilder::new(op.host_name())
                .with_arity(op.arity())
                .with_alias(op.name())
                .with_implementation(move |args: &[Term]| datatypes.execute(op, args))
                .build()?;
            module.register(function);
        }
        Ok(module)
    }

    /// Add a function; a later registration shadows an earlier one
    pub fn register(&mut self, function: NativeFunction) {
        self.functions.insert(0, function);
    }

    /// Find a function by primary name or alias
    pub fn lookup(&self, name: &str) -> Option<&NativeFunction> {
        self.functions.iter().find(|f| f.answers_to(name))
    }

    /// Exported functions, in registration order
    pub fn functions(&self) -> Vec<FunctionInfo> {
        self.functions
            .iter()
            .rev()
            .map(|f| FunctionInfo {
                name: f.name().to_string(),
                arity: f.arity(),
                aliases: f.aliases().to_vec(),
            })
            .collect()
    }

    /// Dispatch without encoding the error side
    ///
    /// A known name called with the wrong number of arguments reaches the
    /// function and fails its arity check.
    pub fn try_call(&self, name: &str, args: &[Term]) -> Result<Term, H5tError> {
        let function = self
            .lookup(name)
            .ok_or_else(|| H5tError::UnknownFunction {
                name: name.to_string(),
                arity: args.len(),
            })?;

        match catch_unwind(AssertUnwindSafe(|| function.try_call(args))) {
            Ok(result) => result,
            Err(payload) => {
                let detail = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_default();
                log::warn!("panic in {}/{}: {}", function.name(), args.len(), detail);
                Err(H5tError::Panicked(function.name().to_string()))
            }
        }
    }

    /// Dispatch a host call; always returns a term
    pub fn call(&self, name: &str, args: &[Term]) -> Term {
        match self.try_call(name, args) {
            Ok(term) => term,
            Err(e) => {
                log::debug!("{}/{} failed: {:?}", name, args.len(), e);
                Term::error_tuple(e.to_string())
            }
        }
    }
}
