//! Type conversion between Rust and host terms
//!
//! Provides traits and implementations for bidirectional conversion:
//! - `ToTerm` - Convert Rust types to a host `Term`
//! - `FromTerm` - Convert a host `Term` to Rust types
//!
//! # Examples
//!
//! ```
//! use h5nif_runtime::api::{FromTerm, ToTerm};
//! use h5nif_runtime::Term;
//!
//! let term: Term = 42i64.to_term();
//! let back: i64 = FromTerm::from_term(&term).unwrap();
//! assert_eq!(back, 42);
//! ```

use crate::value::Term;

/// Error type for term conversion failures
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConversionError {
    /// Type mismatch during conversion
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },
}

/// Trait for converting a host `Term` to Rust types
pub trait FromTerm: Sized {
    /// Convert from `Term` to the Rust type
    ///
    /// # Errors
    ///
    /// Returns `ConversionError` if the term cannot be converted to the target type.
    fn from_term(term: &Term) -> Result<Self, ConversionError>;
}

/// Trait for converting Rust types to a host `Term`
pub trait ToTerm {
    /// Convert from Rust type to `Term`
    fn to_term(self) -> Term;
}

fn mismatch(expected: &str, term: &Term) -> ConversionError {
    ConversionError::TypeMismatch {
        expected: expected.to_string(),
        found: term.type_name().to_string(),
    }
}

impl FromTerm for i64 {
    fn from_term(term: &Term) -> Result<Self, ConversionError> {
        match term {
            Term::Int(i) => Ok(*i),
            _ => Err(mismatch("integer", term)),
        }
    }
}

impl FromTerm for String {
    /// Atoms and strings both convert to their text
    fn from_term(term: &Term) -> Result<Self, ConversionError> {
        match term {
            Term::Atom(s) | Term::Str(s) => Ok(s.clone()),
            _ => Err(mismatch("atom or string", term)),
        }
    }
}

impl ToTerm for i64 {
    fn to_term(self) -> Term {
        Term::Int(self)
    }
}

impl ToTerm for () {
    /// Unit converts to the bare `ok` atom
    fn to_term(self) -> Term {
        Term::ok()
    }
}
