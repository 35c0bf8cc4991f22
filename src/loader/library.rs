//! The opened OpenGL library and the resolvers that read from it.

use std::ffi::{c_char, c_void, CStr};
use std::sync::Arc;

use libloading::Library;

use super::resolver::{FunctionPointer, SymbolResolver};
use crate::error::LoadError;

/// `wglGetProcAddress` is `__stdcall`; `"system"` is the C convention elsewhere.
pub type GetProcAddressFn = unsafe extern "system" fn(*const c_char) -> *const c_void;

/// Exclusively owned handle to the platform's OpenGL library. The handle is
/// released when the last resolver holding it is dropped.
pub struct GlLibrary {
    library: Library,
    name: String,
}

impl GlLibrary {
    /// Opens the first candidate that loads.
    pub fn open<S: AsRef<str>>(candidates: &[S]) -> Result<Self, LoadError> {
        let mut last_error = String::from("no library names configured");

        for candidate in candidates {
            let name = candidate.as_ref();
            // SAFETY: running a system GL library's initializers is the point of loading it.
            match unsafe { Library::new(name) } {
                Ok(library) => {
                    log::debug!("Opened OpenGL library {}", name);
                    return Ok(Self {
                        library,
                        name: name.to_string(),
                    });
                }
                Err(err) => {
                    log::debug!("Could not open {}: {}", name, err);
                    last_error = err.to_string();
                }
            }
        }

        Err(LoadError::LibraryOpen {
            tried: candidates
                .iter()
                .map(|c| c.as_ref())
                .collect::<Vec<_>>()
                .join(", "),
            reason: last_error,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Plain exported-symbol lookup (`dlsym` / `GetProcAddress`).
    pub fn symbol(&self, symbol: &CStr) -> Option<FunctionPointer> {
        // SAFETY: the address is only read, never called, here.
        let address = unsafe { self.library.get::<*const c_void>(symbol.to_bytes_with_nul()) };
        address.ok().and_then(|sym| FunctionPointer::new(*sym))
    }

    /// Looks up the context resolver function itself.
    pub fn proc_address_fn(&self, symbol: &str) -> Option<GetProcAddressFn> {
        let mut name = symbol.as_bytes().to_vec();
        name.push(0);
        // SAFETY: the `*GetProcAddress*` entry points all have this signature.
        unsafe { self.library.get::<GetProcAddressFn>(&name) }
            .ok()
            .map(|sym| *sym)
    }
}

/// Tier 2: generic lookup against the library's export table.
pub struct LibraryResolver {
    library: Arc<GlLibrary>,
}

impl LibraryResolver {
    pub fn new(library: Arc<GlLibrary>) -> Self {
        Self { library }
    }
}

impl SymbolResolver for LibraryResolver {
    fn label(&self) -> &str {
        "library"
    }

    fn resolve(&self, symbol: &CStr) -> Option<FunctionPointer> {
        self.library.symbol(symbol)
    }
}

/// Tier 1: the driver's context-specific resolver (`glXGetProcAddressARB`,
/// `wglGetProcAddress`). Only meaningful while a context is current.
pub struct ProcAddressResolver {
    get_proc_address: GetProcAddressFn,
    label: String,
    _library: Arc<GlLibrary>,
}

impl ProcAddressResolver {
    /// Finds the first of `symbols` exported by `library`.
    pub fn find<S: AsRef<str>>(library: &Arc<GlLibrary>, symbols: &[S]) -> Option<Self> {
        symbols.iter().find_map(|symbol| {
            let symbol = symbol.as_ref();
            library.proc_address_fn(symbol).map(|get_proc_address| Self {
                get_proc_address,
                label: symbol.to_string(),
                _library: Arc::clone(library),
            })
        })
    }
}

impl SymbolResolver for ProcAddressResolver {
    fn label(&self) -> &str {
        &self.label
    }

    fn resolve(&self, symbol: &CStr) -> Option<FunctionPointer> {
        // SAFETY: `get_proc_address` came from the library this resolver keeps open.
        let address = unsafe { (self.get_proc_address)(symbol.as_ptr()) };
        if is_invalid_proc_address(address) {
            return None;
        }
        FunctionPointer::new(address)
    }
}

/// `wglGetProcAddress` reports failure with small sentinel values as well as null.
fn is_invalid_proc_address(address: *const c_void) -> bool {
    cfg!(windows) && matches!(address as isize, 1 | 2 | 3 | -1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_library_reports_every_candidate() {
        let err = GlLibrary::open(&["libcoregl-missing-a.so", "libcoregl-missing-b.so"])
            .err()
            .unwrap();
        match err {
            LoadError::LibraryOpen { tried, .. } => {
                assert_eq!(tried, "libcoregl-missing-a.so, libcoregl-missing-b.so");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_candidate_list() {
        let names: [&str; 0] = [];
        assert!(matches!(
            GlLibrary::open(&names),
            Err(LoadError::LibraryOpen { .. })
        ));
    }

    #[test]
    fn sentinels_only_rejected_on_windows() {
        assert_eq!(is_invalid_proc_address(2 as *const c_void), cfg!(windows));
        assert!(!is_invalid_proc_address(0x7f00_0000 as *const c_void));
    }
}
