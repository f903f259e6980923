//! H5T: Datatype Interface bridge
//!
//! Exposes the HDF5 datatype subsystem to the host runtime:
//! - `resolver`: symbolic type names → native type constants
//! - `handle`: acquiring (copy) and releasing (close) native datatype handles
//! - `sentinel`: the per-call table of in-band failure values
//! - `adapter`: the call template shared by every exposed operation
//! - `library`: the raw native API and its HDF5 shared-library backend
//! - `memory`: an in-process backend with the same sentinel behavior
//!
//! Every failure, whatever its origin, surfaces as an `H5tError` whose
//! `Display` text is the message the host receives.

pub mod adapter;
pub mod handle;
pub mod library;
pub mod memory;
pub mod resolver;
pub mod sentinel;

use crate::ffi::types::ArgKind;

pub use adapter::{handle_of, Datatypes, Operation};
pub use handle::{acquire_copy, release, TypeHandle};
pub use library::{open_backend, DatatypeLibrary, Hdf5Library};
pub use memory::{Fault, MemoryLibrary};
pub use resolver::{NativeType, TypeEntry, TypeResolver, TYPE_TABLE};
pub use sentinel::{NativeCall, Sentinel};

/// Errors produced by datatype operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum H5tError {
    /// Wrong argument count; no native call was made
    #[error("Incorrect number of arguments")]
    Arity { expected: usize, got: usize },

    /// Argument could not be decoded to its primitive shape; no native call was made
    #[error("Can't get {what} from argv")]
    Decode { what: &'static str },

    /// Symbolic type name is not in the table; no native call was made
    #[error("Unknown type {0}")]
    UnknownType(String),

    /// A native call returned its failure sentinel
    #[error("{}", .op.failure_message())]
    Native {
        op: Operation,
        call: NativeCall,
        raw: i128,
    },

    /// No native function with this name
    #[error("Unknown function {name}/{arity}")]
    UnknownFunction { name: String, arity: usize },

    /// An operation panicked; the panic was contained
    #[error("Internal error in {0}")]
    Panicked(String),
}

impl H5tError {
    /// Decode failure for an argument of the given kind
    pub fn decode(kind: ArgKind) -> Self {
        H5tError::Decode {
            what: kind.display_name(),
        }
    }
}

/// Result type for datatype operations
pub type H5tResult<T> = Result<T, H5tError>;
