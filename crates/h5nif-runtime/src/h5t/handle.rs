//! Datatype handles
//!
//! A `TypeHandle` exists only between a successful copy and its close. It
//! is deliberately neither `Clone` nor `Copy`, and `release` consumes it, so
//! the Rust side cannot close the same handle twice. Dropping a handle does
//! not close it: ownership passes to the host once it is encoded.

use crate::ffi::types::hid_t;
use crate::h5t::library::DatatypeLibrary;
use crate::h5t::resolver::NativeType;
use crate::h5t::sentinel::{self, NativeCall};
use crate::h5t::{H5tResult, Operation};

/// An open native datatype identifier
///
/// Operations on the same handle must be sequenced by the caller.
#[derive(Debug, PartialEq, Eq)]
pub struct TypeHandle(hid_t);

impl TypeHandle {
    /// Wrap an identifier received from the host
    ///
    /// No validation happens here; the native call that uses the handle
    /// reports a dead identifier through its sentinel.
    pub fn from_raw(id: hid_t) -> Self {
        TypeHandle(id)
    }

    /// Raw identifier
    pub fn id(&self) -> hid_t {
        self.0
    }

    /// Give up the handle, returning the raw identifier
    pub fn into_raw(self) -> hid_t {
        self.0
    }
}

/// Copy a predefined type into a new, modifiable datatype
///
/// The copy must both return a positive identifier and leave that identifier
/// valid. If the identifier comes back positive but dead, it is closed
/// before the error is reported.
pub fn acquire_copy(library: &dyn DatatypeLibrary, native: NativeType) -> H5tResult<TypeHandle> {
    let source = library.predefined(native);
    sentinel::check(Operation::Copy, NativeCall::Predefined, source as i128)?;

    let id = library.copy(source);
    if let Err(e) = sentinel::check(Operation::Copy, NativeCall::Copy, id as i128) {
        cleanup_close(library, id);
        return Err(e);
    }

    if let Err(e) = sentinel::check(
        Operation::Copy,
        NativeCall::IsValid,
        library.is_valid(id) as i128,
    ) {
        cleanup_close(library, id);
        return Err(e);
    }

    log::debug!("copied {} to {:#x}", native, id);
    Ok(TypeHandle(id))
}

/// Close a handle exactly once
pub fn release(library: &dyn DatatypeLibrary, handle: TypeHandle) -> H5tResult<()> {
    let id = handle.into_raw();
    sentinel::check(Operation::Close, NativeCall::Close, library.close(id) as i128)?;
    log::debug!("closed {:#x}", id);
    Ok(())
}

/// Best-effort close of an identifier from a failed copy
///
/// Only positive identifiers can name an object, so anything else is left
/// alone. A failed close is logged; the caller reports its own error.
pub(crate) fn cleanup_close(library: &dyn DatatypeLibrary, id: hid_t) {
    if id <= 0 {
        return;
    }
    let status = library.close(id);
    if NativeCall::Close.fails(status as i128) {
        log::warn!("cleanup close of {:#x} failed with status {}", id, status);
    }
}
