//! Argument marshaling - host term ↔ native value conversions
//!
//! - `MarshalContext::term_to_native()`: decode a host argument into the
//!   primitive shape a native call expects
//! - `MarshalContext::native_to_term()`: encode a native integer result as a
//!   host term
//!
//! Type names are copied into a bounded buffer: names at or beyond the bound
//! are rejected rather than truncated, since a truncated name could match a
//! different table entry.

use crate::api::conversion::{FromTerm, ToTerm};
use crate::ffi::types::{hid_t, ArgKind, NativeArg};
use crate::value::Term;
use h5nif_config::DEFAULT_MAX_TYPE_NAME_LEN;

/// Marshal error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MarshalError {
    /// Term has the wrong primitive shape for the argument
    #[error("Type mismatch: expected {expected}, got {got}")]
    TypeMismatch { expected: String, got: String },
    /// Type name does not fit the bounded buffer
    #[error("Name of {len} bytes exceeds buffer of {max} bytes")]
    NameTooLong { len: usize, max: usize },
    /// Type name contains an interior NUL and cannot cross the C boundary
    #[error("Name contains a NUL byte")]
    InteriorNul,
    /// Native value does not fit a host integer
    #[error("Value {0} out of range for a host integer")]
    OutOfRange(u64),
}

/// Marshal context for host ↔ native conversions
///
/// # Example
///
/// ```
/// # use h5nif_runtime::ffi::{ArgKind, MarshalContext, NativeArg};
/// # use h5nif_runtime::Term;
/// let ctx = MarshalContext::new();
///
/// let arg = ctx.term_to_native(&Term::atom("H5T_NATIVE_INT"), ArgKind::TypeName).unwrap();
/// assert_eq!(arg, NativeArg::TypeName("H5T_NATIVE_INT".to_string()));
///
/// let handle = ctx.term_to_native(&Term::Int(7), ArgKind::Handle).unwrap();
/// assert_eq!(handle, NativeArg::Handle(7));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarshalContext {
    /// Exclusive upper bound on type name byte length
    max_name_len: usize,
}

impl MarshalContext {
    /// Create a context with the default type name bound
    pub fn new() -> Self {
        Self::with_max_name_len(DEFAULT_MAX_TYPE_NAME_LEN)
    }

    /// Create a context with a custom type name bound
    pub fn with_max_name_len(max_name_len: usize) -> Self {
        Self { max_name_len }
    }

    /// Exclusive upper bound on type name byte length
    pub fn max_name_len(&self) -> usize {
        self.max_name_len
    }

    /// Decode a host term to a native argument
    pub fn term_to_native(&self, term: &Term, kind: ArgKind) -> Result<NativeArg, MarshalError> {
        match kind {
            ArgKind::TypeName => {
                let name = String::from_term(term).map_err(|_| MarshalError::TypeMismatch {
                    expected: "atom or string".to_string(),
                    got: term.type_name().to_string(),
                })?;
                self.check_name(&name)?;
                Ok(NativeArg::TypeName(name))
            }
            ArgKind::Handle => {
                let raw = i64::from_term(term).map_err(|_| MarshalError::TypeMismatch {
                    expected: "integer".to_string(),
                    got: term.type_name().to_string(),
                })?;
                Ok(NativeArg::Handle(raw as hid_t))
            }
        }
    }

    /// Check a name against the bounded buffer
    ///
    /// The buffer holds the name plus its terminator, so a name of exactly
    /// `max_name_len` bytes does not fit.
    pub fn check_name(&self, name: &str) -> Result<(), MarshalError> {
        if name.len() >= self.max_name_len {
            return Err(MarshalError::NameTooLong {
                len: name.len(),
                max: self.max_name_len,
            });
        }
        if name.as_bytes().contains(&0) {
            return Err(MarshalError::InteriorNul);
        }
        Ok(())
    }

    /// Encode a signed native integer result
    pub fn native_to_term(&self, value: i64) -> Term {
        value.to_term()
    }

    /// Encode an unsigned native integer result (sizes)
    pub fn unsigned_to_term(&self, value: usize) -> Result<Term, MarshalError> {
        i64::try_from(value)
            .map(ToTerm::to_term)
            .map_err(|_| MarshalError::OutOfRange(value as u64))
    }
}

impl Default for MarshalContext {
    fn default() -> Self {
        Self::new()
    }
}
