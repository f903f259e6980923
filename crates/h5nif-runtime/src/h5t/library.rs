//! The raw datatype API and its HDF5 backend
//!
//! `DatatypeLibrary` mirrors the C functions one for one: every method
//! returns the raw native value, sentinels included. Interpreting those
//! values is the adapter's job, never the backend's.

use crate::ffi::loader::{LibraryLoader, LoadError};
use crate::ffi::types::{
    hid_t, herr_t, htri_t, size_t, unsigned, H5T_class_t, H5T_order_t, H5E_DEFAULT,
    H5I_INVALID_HID,
};
use crate::h5t::memory::MemoryLibrary;
use crate::h5t::resolver::{NativeType, TYPE_TABLE};
use h5nif_config::{Backend, Config};
use libloading::Library;
use std::cell::Cell;
use std::ffi::c_void;
use std::fmt;
use std::sync::Arc;

/// Raw `H5T` entry points
///
/// Implementations must be callable from any thread. Operations on one
/// identifier are sequenced by the caller.
pub trait DatatypeLibrary: Send + Sync {
    /// Human-readable backend description
    fn describe(&self) -> String;
    /// Identifier of a predefined native type
    fn predefined(&self, native: NativeType) -> hid_t;
    /// `H5Tcopy`
    fn copy(&self, type_id: hid_t) -> hid_t;
    /// `H5Tclose`
    fn close(&self, type_id: hid_t) -> herr_t;
    /// `H5Iis_valid`
    fn is_valid(&self, id: hid_t) -> htri_t;
    /// `H5Tget_class`
    fn get_class(&self, type_id: hid_t) -> H5T_class_t;
    /// `H5Tget_order`
    fn get_order(&self, type_id: hid_t) -> H5T_order_t;
    /// `H5Tget_size`
    fn get_size(&self, type_id: hid_t) -> size_t;
}

type OpenFn = unsafe extern "C" fn() -> herr_t;
type LibVersionFn = unsafe extern "C" fn(*mut unsigned, *mut unsigned, *mut unsigned) -> herr_t;
type ErrorHandler = Option<unsafe extern "C" fn(hid_t, *mut c_void) -> herr_t>;
type SetAutoFn = unsafe extern "C" fn(hid_t, ErrorHandler, *mut c_void) -> herr_t;
type IdToIdFn = unsafe extern "C" fn(hid_t) -> hid_t;
type IdToStatusFn = unsafe extern "C" fn(hid_t) -> herr_t;
type IdToTriFn = unsafe extern "C" fn(hid_t) -> htri_t;
type IdToClassFn = unsafe extern "C" fn(hid_t) -> H5T_class_t;
type IdToOrderFn = unsafe extern "C" fn(hid_t) -> H5T_order_t;
type IdToSizeFn = unsafe extern "C" fn(hid_t) -> size_t;

/// Library names tried when the configured name is the default
const DEFAULT_LIBRARY_NAMES: &[&str] = &["hdf5", "hdf5_serial"];

thread_local! {
    static ERRORS_SILENCED: Cell<bool> = const { Cell::new(false) };
}

/// Run `silence` the first time the current thread gets here
///
/// Thread-safe HDF5 builds keep one error stack per thread, so automatic
/// error printing has to be turned off in every calling thread.
fn once_per_thread(silence: impl FnOnce()) -> bool {
    ERRORS_SILENCED.with(|done| {
        if done.get() {
            return false;
        }
        done.set(true);
        silence();
        true
    })
}

/// The system HDF5 shared library, loaded at runtime
pub struct Hdf5Library {
    name: String,
    version: (u32, u32, u32),
    predefined: [hid_t; NativeType::COUNT],
    set_auto: Option<SetAutoFn>,
    copy: IdToIdFn,
    close: IdToStatusFn,
    is_valid: IdToTriFn,
    get_class: IdToClassFn,
    get_order: IdToOrderFn,
    get_size: IdToSizeFn,
    // Keeps the function pointers above alive
    _library: Arc<Library>,
}

/// Copy a symbol's value out of the library
///
/// # Safety
///
/// `T` must match the symbol's real type.
unsafe fn symbol<T: Copy>(library: &Library, name: &str, symbol: &str) -> Result<T, LoadError> {
    let mut bytes = symbol.as_bytes().to_vec();
    bytes.push(0);
    library
        .get::<T>(&bytes)
        .map(|sym| *sym)
        .map_err(|_| LoadError::SymbolNotFound {
            library: name.to_string(),
            symbol: symbol.to_string(),
        })
}

impl Hdf5Library {
    /// Load HDF5 by name or path and bind the datatype API
    ///
    /// Requires HDF5 1.10 or newer (64-bit identifiers).
    pub fn open(loader: &mut LibraryLoader, name: &str) -> Result<Self, LoadError> {
        let library = if name == DEFAULT_LIBRARY_NAMES[0] {
            loader.load_any(DEFAULT_LIBRARY_NAMES)?
        } else {
            loader.load(name)?
        };

        // SAFETY: every type below matches the HDF5 1.10+ C declarations.
        unsafe {
            let get_libversion: LibVersionFn = symbol(&library, name, "H5get_libversion")?;
            let (mut major, mut minor, mut release): (unsigned, unsigned, unsigned) = (0, 0, 0);
            if get_libversion(&mut major, &mut minor, &mut release) < 0 {
                return Err(LoadError::LoadFailed(format!(
                    "{}: H5get_libversion failed",
                    name
                )));
            }
            if (major, minor) < (1, 10) {
                return Err(LoadError::Unsupported {
                    library: name.to_string(),
                    reason: format!(
                        "HDF5 {}.{}.{} uses 32-bit identifiers; 1.10 or newer is required",
                        major, minor, release
                    ),
                });
            }

            let open: OpenFn = symbol(&library, name, "H5open")?;
            if open() < 0 {
                return Err(LoadError::LoadFailed(format!("{}: H5open failed", name)));
            }

            // Failures are reported as results; keep HDF5 from printing its stack
            let set_auto = match symbol::<SetAutoFn>(&library, name, "H5Eset_auto2") {
                Ok(set_auto) => Some(set_auto),
                Err(e) => {
                    log::debug!("{}; HDF5 error printing left enabled", e);
                    None
                }
            };

            // Predefined identifiers are only initialized after H5open
            let mut predefined = [H5I_INVALID_HID; NativeType::COUNT];
            for entry in TYPE_TABLE.iter() {
                let global: *const hid_t = symbol(&library, name, entry.symbol)?;
                predefined[entry.native.index()] = *global;
            }

            let hdf5 = Self {
                name: name.to_string(),
                version: (major, minor, release),
                predefined,
                set_auto,
                copy: symbol(&library, name, "H5Tcopy")?,
                close: symbol(&library, name, "H5Tclose")?,
                is_valid: symbol(&library, name, "H5Iis_valid")?,
                get_class: symbol(&library, name, "H5Tget_class")?,
                get_order: symbol(&library, name, "H5Tget_order")?,
                get_size: symbol(&library, name, "H5Tget_size")?,
                _library: library,
            };
            hdf5.quiet();
            log::debug!("bound {}", hdf5.describe());
            Ok(hdf5)
        }
    }

    /// Load the library named by the configuration
    pub fn from_config(config: &Config) -> Result<Self, LoadError> {
        let mut loader = LibraryLoader::new();
        for path in config.search_paths().iter().rev() {
            loader.add_search_path(path.clone());
        }
        Self::open(&mut loader, config.library_name())
    }

    /// Turn off HDF5's automatic error printing for the calling thread
    fn quiet(&self) {
        if let Some(set_auto) = self.set_auto {
            once_per_thread(|| {
                // SAFETY: signature matches H5Eset_auto2; a null handler disables printing
                unsafe {
                    set_auto(H5E_DEFAULT, None, std::ptr::null_mut());
                }
            });
        }
    }

    /// HDF5 version as (major, minor, release)
    pub fn version(&self) -> (u32, u32, u32) {
        self.version
    }
}

impl fmt::Debug for Hdf5Library {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hdf5Library")
            .field("name", &self.name)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

// SAFETY (all methods below): HDF5 validates identifiers itself and answers
// an unknown or closed identifier with the call's sentinel.
impl DatatypeLibrary for Hdf5Library {
    fn describe(&self) -> String {
        let (major, minor, release) = self.version;
        format!("HDF5 {}.{}.{} ({})", major, minor, release, self.name)
    }

    fn predefined(&self, native: NativeType) -> hid_t {
        self.predefined[native.index()]
    }

    fn copy(&self, type_id: hid_t) -> hid_t {
        self.quiet();
        unsafe { (self.copy)(type_id) }
    }

    fn close(&self, type_id: hid_t) -> herr_t {
        self.quiet();
        unsafe { (self.close)(type_id) }
    }

    fn is_valid(&self, id: hid_t) -> htri_t {
        self.quiet();
        unsafe { (self.is_valid)(id) }
    }

    fn get_class(&self, type_id: hid_t) -> H5T_class_t {
        self.quiet();
        unsafe { (self.get_class)(type_id) }
    }

    fn get_order(&self, type_id: hid_t) -> H5T_order_t {
        self.quiet();
        unsafe { (self.get_order)(type_id) }
    }

    fn get_size(&self, type_id: hid_t) -> size_t {
        self.quiet();
        unsafe { (self.get_size)(type_id) }
    }
}

/// Open the backend selected by the configuration
pub fn open_backend(config: &Config) -> Result<Arc<dyn DatatypeLibrary>, LoadError> {
    match config.backend() {
        Backend::Hdf5 => Ok(Arc::new(Hdf5Library::from_config(config)?)),
        Backend::Memory => Ok(Arc::new(MemoryLibrary::new())),
    }
}
