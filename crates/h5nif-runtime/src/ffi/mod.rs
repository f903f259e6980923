//! Foreign Function Interface (FFI) infrastructure
//!
//! Everything that touches the C side of the bridge lives here:
//! - Raw HDF5 typedefs and reserved enumerators (`types`)
//! - Host term ↔ native argument marshaling (`marshal`)
//! - Dynamic library loading (`loader`)
//!
//! # Safety
//!
//! Loading and calling into a shared library is `unsafe`. The unsafe calls
//! are confined to `loader` and the HDF5 backend in `h5t::library`; every
//! other module works with checked values.

pub mod loader;
pub mod marshal;
pub mod types;

pub use loader::{LibraryLoader, LoadError};
pub use marshal::{MarshalContext, MarshalError};
pub use types::{hid_t, ArgKind, ByteOrder, DatatypeClass, NativeArg};
