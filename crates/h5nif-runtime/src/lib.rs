//! h5nif Runtime - HDF5 datatype bridge for a dynamically typed host
//!
//! This library provides:
//! - The host term model and its Rust conversions
//! - Loading the HDF5 shared library and marshaling arguments to it
//! - The `H5T` resolver, handle bridge and call/result adapter
//! - The native function table the host calls into

/// h5nif runtime version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod api;
pub mod ffi;
pub mod h5t;
pub mod logging;
pub mod nif;
pub mod value;

// Re-export commonly used types
pub use h5t::{
    Datatypes, DatatypeLibrary, H5tError, H5tResult, Hdf5Library, MemoryLibrary, NativeType,
    Operation, TypeHandle,
};
pub use nif::{FunctionInfo, NifModule};
pub use value::Term;
