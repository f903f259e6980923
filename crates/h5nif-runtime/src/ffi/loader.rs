//! Dynamic library loading for FFI
//!
//! Provides cross-platform dynamic library loading using `libloading`.
//! Handles platform-specific library naming conventions and search paths,
//! including the distribution-specific directories HDF5 is installed into.

use libloading::Library;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Library loading errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LoadError {
    /// Library file not found in search paths
    #[error("Library not found: {0}")]
    LibraryNotFound(String),
    /// Symbol not found in library
    #[error("Symbol '{symbol}' not found in library '{library}'")]
    SymbolNotFound { library: String, symbol: String },
    /// Failed to load library
    #[error("Failed to load library: {0}")]
    LoadFailed(String),
    /// Library loaded but cannot be used by this bridge
    #[error("Unsupported library {library}: {reason}")]
    Unsupported { library: String, reason: String },
}

/// Dynamic library loader with caching and platform-specific path resolution
///
/// # Safety
///
/// Loading dynamic libraries is inherently unsafe. The loaded code runs in the
/// same process and can perform arbitrary operations.
pub struct LibraryLoader {
    /// Cache of loaded libraries by resolved path
    loaded: HashMap<PathBuf, Arc<Library>>,
    /// Platform-specific library search paths
    search_paths: Vec<PathBuf>,
}

impl LibraryLoader {
    /// Create a new library loader with default search paths
    pub fn new() -> Self {
        Self {
            loaded: HashMap::new(),
            search_paths: Self::default_search_paths(),
        }
    }

    /// Get platform-specific default library search paths
    ///
    /// Returns standard system library paths for the current platform, plus
    /// the directories HDF5 packages install into:
    /// - Linux: /usr/lib, /usr/local/lib, /lib, Debian's hdf5/serial multiarch dir
    /// - macOS: /usr/lib, /usr/local/lib, /opt/homebrew/lib
    /// - Windows: C:\Windows\System32
    /// - All platforms: current working directory
    fn default_search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        #[cfg(target_os = "linux")]
        {
            paths.push(PathBuf::from("/usr/lib"));
            paths.push(PathBuf::from("/usr/local/lib"));
            paths.push(PathBuf::from("/lib"));

            if cfg!(target_pointer_width = "64") {
                paths.push(PathBuf::from("/usr/lib64"));
                paths.push(PathBuf::from("/lib64"));
            }

            let multiarch = format!("/usr/lib/{}-linux-gnu", std::env::consts::ARCH);
            paths.push(PathBuf::from(&multiarch));
            paths.push(PathBuf::from(format!("{}/hdf5/serial", multiarch)));
        }

        #[cfg(target_os = "macos")]
        {
            paths.push(PathBuf::from("/usr/lib"));
            paths.push(PathBuf::from("/usr/local/lib"));
            paths.push(PathBuf::from("/opt/homebrew/lib"));
        }

        #[cfg(target_os = "windows")]
        {
            paths.push(PathBuf::from("C:\\Windows\\System32"));
            if let Ok(system_root) = std::env::var("SystemRoot") {
                paths.push(PathBuf::from(format!("{}\\System32", system_root)));
            }
        }

        // HDF5_DIR is the conventional install prefix variable
        if let Ok(prefix) = std::env::var("HDF5_DIR") {
            paths.insert(0, Path::new(&prefix).join("lib"));
        }

        // Current working directory (highest priority)
        if let Ok(cwd) = std::env::current_dir() {
            paths.insert(0, cwd);
        }

        paths
    }

    /// Resolve library name to full path with platform-specific naming
    ///
    /// Handles platform-specific library naming conventions:
    /// - Linux: lib{name}.so
    /// - macOS: lib{name}.dylib or lib{name}.so
    /// - Windows: {name}.dll
    ///
    /// Searches in all configured search paths.
    pub fn resolve_library_path(&self, name: &str) -> Option<PathBuf> {
        let path = Path::new(name);
        if path.is_absolute() {
            return path.exists().then(|| path.to_path_buf());
        }

        let extensions = if cfg!(target_os = "windows") {
            vec!["dll"]
        } else if cfg!(target_os = "macos") {
            vec!["dylib", "so"]
        } else {
            vec!["so"]
        };

        let prefixes = if cfg!(target_os = "windows") {
            vec!["", "lib"]
        } else {
            vec!["lib", ""]
        };

        for search_path in &self.search_paths {
            for prefix in &prefixes {
                for ext in &extensions {
                    let filename = format!("{}{}.{}", prefix, name, ext);
                    let full_path = search_path.join(&filename);
                    if full_path.exists() {
                        return Some(full_path);
                    }
                }
            }
        }

        None
    }

    /// Load a library by name or path
    ///
    /// Loads the library if not already loaded, or returns the cached instance.
    /// Library name can be:
    /// - Short name: "hdf5" -> lib{hdf5}.{ext}
    /// - Full path: "/path/to/libhdf5.so"
    ///
    /// A short name that is not found in the search paths is handed to the
    /// platform loader as `lib{name}.{ext}` so `LD_LIBRARY_PATH` and friends
    /// still apply.
    ///
    /// # Safety
    ///
    /// Loading a dynamic library executes its initialization code and makes its
    /// symbols available. The caller must ensure the library is trusted.
    pub fn load(&mut self, name: &str) -> Result<Arc<Library>, LoadError> {
        let (key, from_search) = match self.resolve_library_path(name) {
            Some(path) => (path, true),
            None if Path::new(name).is_absolute() => {
                return Err(LoadError::LibraryNotFound(name.to_string()))
            }
            None => (PathBuf::from(libloading::library_filename(name)), false),
        };

        if let Some(library) = self.loaded.get(&key) {
            return Ok(Arc::clone(library));
        }

        let library = unsafe { Library::new(&key) }.map_err(|e| {
            if from_search {
                LoadError::LoadFailed(e.to_string())
            } else {
                LoadError::LibraryNotFound(name.to_string())
            }
        })?;

        log::debug!("loaded native library {}", key.display());
        let library = Arc::new(library);
        self.loaded.insert(key, Arc::clone(&library));
        Ok(library)
    }

    /// Load the first library from `names` that can be loaded
    pub fn load_any(&mut self, names: &[&str]) -> Result<Arc<Library>, LoadError> {
        let mut last_error = LoadError::LibraryNotFound(names.join(", "));
        for name in names {
            match self.load(name) {
                Ok(library) => return Ok(library),
                Err(e) => {
                    log::trace!("could not load {}: {}", name, e);
                    last_error = e;
                }
            }
        }
        Err(last_error)
    }

    /// Add a custom search path (prepended to search list)
    pub fn add_search_path(&mut self, path: PathBuf) {
        self.search_paths.insert(0, path);
    }

    /// Get the number of loaded libraries
    pub fn loaded_count(&self) -> usize {
        self.loaded.len()
    }
}

impl Default for LibraryLoader {
    fn default() -> Self {
        Self::new()
    }
}
