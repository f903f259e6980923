//! Shared test helpers
//!
//! Every bridge property is checked against the in-memory backend and,
//! when the shared library can be loaded, against the system HDF5. HDF5
//! is not necessarily built thread-safe, so tests touching it are tagged
//! `#[serial(hdf5)]`.

#![allow(dead_code)]

use h5nif_runtime::ffi::LibraryLoader;
use h5nif_runtime::{Datatypes, Hdf5Library, MemoryLibrary, NifModule, Term};
use std::sync::Arc;

pub use pretty_assertions::{assert_eq, assert_ne};

/// Which backend a test case runs against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Memory,
    Hdf5,
}

/// Load the system HDF5, or `None` if it is not installed
pub fn hdf5() -> Option<Arc<Hdf5Library>> {
    let name = std::env::var("H5NIF_LIBRARY").unwrap_or_else(|_| "hdf5".to_string());
    match Hdf5Library::open(&mut LibraryLoader::new(), &name) {
        Ok(library) => Some(Arc::new(library)),
        Err(e) => {
            eprintln!("skipping HDF5 case: {}", e);
            None
        }
    }
}

/// In-memory backend plus a `Datatypes` bound to it
pub fn memory() -> (Arc<MemoryLibrary>, Datatypes) {
    let library = Arc::new(MemoryLibrary::new());
    let datatypes = Datatypes::new(library.clone());
    (library, datatypes)
}

/// `Datatypes` for the requested backend, `None` when unavailable
pub fn datatypes(kind: BackendKind) -> Option<Datatypes> {
    match kind {
        BackendKind::Memory => Some(memory().1),
        BackendKind::Hdf5 => hdf5().map(|library| Datatypes::new(library)),
    }
}

/// Native function table for the requested backend
pub fn module(kind: BackendKind) -> Option<NifModule> {
    datatypes(kind).map(|dt| NifModule::h5t(Arc::new(dt)).expect("build h5t module"))
}

/// Extract the handle from `{ok, Handle}`
pub fn expect_handle(result: &Term) -> i64 {
    match result.ok_value() {
        Some(Term::Int(id)) => *id,
        _ => panic!("expected {{ok, Handle}}, got {}", result),
    }
}

/// Extract the message from `{error, "message"}`
pub fn expect_error(result: &Term) -> String {
    match result.error_message() {
        Some(message) => message.to_string(),
        None => panic!("expected {{error, Message}}, got {}", result),
    }
}
