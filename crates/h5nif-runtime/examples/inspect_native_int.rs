//! Copy `H5T_NATIVE_INT`, query it and close it again
//!
//! Uses the system HDF5 when it can be loaded, the in-memory table otherwise.
//!
//! ```text
//! cargo run -p h5nif-runtime --example inspect_native_int
//! ```

use h5nif_runtime::ffi::LibraryLoader;
use h5nif_runtime::{DatatypeLibrary, Hdf5Library, MemoryLibrary, NifModule, Term};
use h5nif_runtime::Datatypes;
use std::sync::Arc;

fn main() {
    let _ = h5nif_runtime::logging::init("info");

    let library: Arc<dyn DatatypeLibrary> = match Hdf5Library::open(&mut LibraryLoader::new(), "hdf5") {
        Ok(hdf5) => Arc::new(hdf5),
        Err(e) => {
            eprintln!("{}; falling back to the in-memory table", e);
            Arc::new(MemoryLibrary::new())
        }
    };
    println!("backend: {}", library.describe());

    let module = NifModule::h5t(Arc::new(Datatypes::new(library))).expect("build h5t module");

    let copied = module.call("h5tcopy", &[Term::atom("H5T_NATIVE_INT")]);
    println!("h5tcopy('H5T_NATIVE_INT') -> {}", copied);
    let Some(handle) = copied.ok_value().cloned() else {
        return;
    };

    for name in ["h5tget_class", "h5tget_order", "h5tget_size", "h5tclose"] {
        println!("{}({}) -> {}", name, handle, module.call(name, &[handle.clone()]));
    }
}
