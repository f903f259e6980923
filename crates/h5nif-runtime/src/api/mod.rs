//! Host-facing API
//!
//! - Term conversion between Rust and host values
//! - Native function registration with arity validation

pub mod conversion;
pub mod native;

// Re-export main types for convenience
pub use conversion::{ConversionError, FromTerm, ToTerm};
pub use native::{BuildError, NativeFunction, NativeFunctionBuilder};
