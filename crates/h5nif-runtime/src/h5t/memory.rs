//! In-process datatype backend
//!
//! Keeps a table of datatype objects behind a `Mutex` and answers every
//! call with the same raw values HDF5 would, sentinels included. Predefined
//! types are immutable: copying them works, closing them fails.
//!
//! Faults can be injected to drive the failure paths HDF5 itself rarely
//! takes: a missing predefined type, a failed copy, a copy that returns a
//! dead identifier, a close that fails.

use crate::ffi::types::{
    hid_t, herr_t, htri_t, size_t, ByteOrder, H5T_class_t, H5T_order_t, H5I_INVALID_HID,
    H5T_NO_CLASS, H5T_ORDER_ERROR,
};
use crate::h5t::library::DatatypeLibrary;
use crate::h5t::resolver::NativeType;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

/// Identifier base for datatype objects, mirroring HDF5's type tag in the top byte
const TYPE_ID_BASE: hid_t = 3 << 56;
/// First identifier handed out for copies
const FIRST_COPY_ID: hid_t = TYPE_ID_BASE + 0x100;

/// A one-shot failure to inject into the next matching call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// Next `predefined` lookup returns `H5I_INVALID_HID`
    PredefinedUnavailable,
    /// Next `copy` returns `H5I_INVALID_HID`
    CopyFails,
    /// Next `copy` returns a positive identifier that is not open
    CopyYieldsStaleHandle,
    /// Next `close` fails and leaves the object open
    CloseFails,
}

#[derive(Debug)]
struct Object {
    native: NativeType,
    immutable: bool,
}

#[derive(Debug)]
struct State {
    objects: HashMap<hid_t, Object>,
    next_id: hid_t,
    faults: Vec<Fault>,
}

impl State {
    fn take_fault(&mut self, fault: Fault) -> bool {
        match self.faults.iter().position(|f| *f == fault) {
            Some(index) => {
                self.faults.remove(index);
                true
            }
            None => false,
        }
    }
}

/// In-memory `DatatypeLibrary`
#[derive(Debug)]
pub struct MemoryLibrary {
    state: Mutex<State>,
    calls: AtomicUsize,
    closes: AtomicUsize,
}

impl MemoryLibrary {
    pub fn new() -> Self {
        let objects = NativeType::ALL
            .iter()
            .map(|&native| {
                (
                    predefined_id(native),
                    Object {
                        native,
                        immutable: true,
                    },
                )
            })
            .collect();
        Self {
            state: Mutex::new(State {
                objects,
                next_id: FIRST_COPY_ID,
                faults: Vec::new(),
            }),
            calls: AtomicUsize::new(0),
            closes: AtomicUsize::new(0),
        }
    }

    /// Queue a one-shot fault
    pub fn inject(&self, fault: Fault) {
        self.lock().faults.push(fault);
    }

    /// Number of native calls observed so far
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of `close` calls observed so far, failed ones included
    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    /// Number of open copied (non-predefined) objects
    pub fn open_count(&self) -> usize {
        self.lock()
            .objects
            .values()
            .filter(|object| !object.immutable)
            .count()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // A panic while holding the lock cannot leave the table half-updated
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn enter(&self) -> MutexGuard<'_, State> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.lock()
    }

    fn native_of(&self, id: hid_t) -> Option<NativeType> {
        self.enter().objects.get(&id).map(|object| object.native)
    }
}

impl Default for MemoryLibrary {
    fn default() -> Self {
        Self::new()
    }
}

fn predefined_id(native: NativeType) -> hid_t {
    TYPE_ID_BASE + native.index() as hid_t
}

impl DatatypeLibrary for MemoryLibrary {
    fn describe(&self) -> String {
        "in-memory datatype table".to_string()
    }

    fn predefined(&self, native: NativeType) -> hid_t {
        if self.lock().take_fault(Fault::PredefinedUnavailable) {
            return H5I_INVALID_HID;
        }
        predefined_id(native)
    }

    fn copy(&self, type_id: hid_t) -> hid_t {
        let mut state = self.enter();
        let Some(native) = state.objects.get(&type_id).map(|object| object.native) else {
            return H5I_INVALID_HID;
        };
        if state.take_fault(Fault::CopyFails) {
            return H5I_INVALID_HID;
        }
        let id = state.next_id;
        state.next_id += 1;
        if state.take_fault(Fault::CopyYieldsStaleHandle) {
            return id;
        }
        state.objects.insert(
            id,
            Object {
                native,
                immutable: false,
            },
        );
        id
    }

    fn close(&self, type_id: hid_t) -> herr_t {
        self.closes.fetch_add(1, Ordering::SeqCst);
        let mut state = self.enter();
        let closable = matches!(state.objects.get(&type_id), Some(object) if !object.immutable);
        if !closable || state.take_fault(Fault::CloseFails) {
            return -1;
        }
        state.objects.remove(&type_id);
        0
    }

    fn is_valid(&self, id: hid_t) -> htri_t {
        htri_t::from(self.enter().objects.contains_key(&id))
    }

    fn get_class(&self, type_id: hid_t) -> H5T_class_t {
        self.native_of(type_id)
            .map(|native| native.entry().class.raw())
            .unwrap_or(H5T_NO_CLASS)
    }

    fn get_order(&self, type_id: hid_t) -> H5T_order_t {
        self.native_of(type_id)
            .map(|_| ByteOrder::native().raw())
            .unwrap_or(H5T_ORDER_ERROR)
    }

    fn get_size(&self, type_id: hid_t) -> size_t {
        self.native_of(type_id)
            .map(|native| native.entry().size)
            .unwrap_or(0)
    }
}
