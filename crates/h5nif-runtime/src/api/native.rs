//! Native function registration and builder
//!
//! This module provides infrastructure for registering Rust closures as
//! host-callable native functions. A function registered without an arity
//! accepts any argument count and checks it itself.
//!
//! A native function never fails from the host's point of view: its
//! implementation returns `Result<Term, H5tError>` and `NativeFunction::call`
//! folds the error side into an `{error, "message"}` term.
//!
//! # Examples
//!
//! ```rust
//! use h5nif_runtime::api::native::NativeFunctionBuilder;
//! use h5nif_runtime::Term;
//!
//! let identity = NativeFunctionBuilder::new("identity")
//!     .with_arity(1)
//!     .with_implementation(|args| Ok(Term::ok_tuple(args[0].clone())))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(identity.call(&[Term::Int(1)]), Term::ok_tuple(Term::Int(1)));
//! assert!(identity.call(&[]).error_message().is_some());
//! ```

use crate::h5t::H5tError;
use crate::value::Term;
use std::fmt;
use std::sync::Arc;

/// Type alias for native function implementation
type NativeFnImpl = Arc<dyn Fn(&[Term]) -> Result<Term, H5tError> + Send + Sync>;

/// A host-callable function
#[derive(Clone)]
pub struct NativeFunction {
    name: String,
    arity: Option<usize>,
    aliases: Vec<String>,
    implementation: NativeFnImpl,
}

impl NativeFunction {
    /// Primary name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fixed arity, or `None` if the implementation checks its own arguments
    pub fn arity(&self) -> Option<usize> {
        self.arity
    }

    /// Alternative names this function answers to
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// True if `name` is the primary name or an alias
    pub fn answers_to(&self, name: &str) -> bool {
        self.name == name || self.aliases.iter().any(|a| a == name)
    }

    /// Call the function, returning the raw result
    pub fn try_call(&self, args: &[Term]) -> Result<Term, H5tError> {
        (self.implementation)(args)
    }

    /// Call the function and encode failures as `{error, "message"}`
    pub fn call(&self, args: &[Term]) -> Term {
        match self.try_call(args) {
            Ok(term) => term,
            Err(e) => {
                log::debug!("{}/{} failed: {:?}", self.name, args.len(), e);
                Term::error_tuple(e.to_string())
            }
        }
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFunction")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .field("aliases", &self.aliases)
            .finish()
    }
}

/// Builder for constructing native functions with arity validation
pub struct NativeFunctionBuilder {
    name: String,
    arity: Option<usize>,
    aliases: Vec<String>,
    implementation: Option<NativeFnImpl>,
}

impl NativeFunctionBuilder {
    /// Create a new native function builder with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arity: None,
            aliases: Vec::new(),
            implementation: None,
        }
    }

    /// Set the function's arity (required argument count)
    ///
    /// Calls with too few or too many arguments are answered with
    /// `{error, "Incorrect number of arguments"}` without running the
    /// implementation.
    pub fn with_arity(mut self, arity: usize) -> Self {
        self.arity = Some(arity);
        self
    }

    /// Register an alternative name
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Set the function implementation
    pub fn with_implementation<F>(mut self, implementation: F) -> Self
    where
        F: Fn(&[Term]) -> Result<Term, H5tError> + Send + Sync + 'static,
    {
        self.implementation = Some(Arc::new(implementation));
        self
    }

    /// Build the native function
    ///
    /// Wraps the implementation with arity validation (if specified).
    pub fn build(self) -> Result<NativeFunction, BuildError> {
        let implementation = self
            .implementation
            .ok_or_else(|| BuildError::MissingImplementation(self.name.clone()))?;

        let wrapped: NativeFnImpl = match self.arity {
            Some(expected) => Arc::new(move |args: &[Term]| {
                if args.len() != expected {
                    return Err(H5tError::Arity {
                        expected,
                        got: args.len(),
                    });
                }
                implementation(args)
            }),
            None => implementation,
        };

        Ok(NativeFunction {
            name: self.name,
            arity: self.arity,
            aliases: self.aliases,
            implementation: wrapped,
        })
    }
}

/// Errors that can occur when building a native function
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// No implementation was provided
    #[error("Native function '{0}' missing implementation")]
    MissingImplementation(String),
}
