//! C ABI of the runtime, called by the generated `OpenGL.c`.
//!
//! A single process-wide [`Loader`] backs these functions. Its library handle
//! is never released, so pointers returned here stay valid for the process
//! lifetime.

use std::ffi::{c_char, c_int, c_void, CStr};
use std::sync::Mutex;

use once_cell::sync::Lazy;

use crate::config::LoaderConfig;
use crate::loader::{LoadState, Loader};

static RUNTIME: Lazy<Mutex<Loader>> =
    Lazy::new(|| Mutex::new(Loader::new(LoaderConfig::from_env(), Vec::<String>::new())));

/// Used when `RUST_LOG` is unset. Keeps the detected-version line visible to C callers.
const DEFAULT_LOG_FILTER: &str = "warn,coregl=info";

/// Route `log` output to stderr once.
fn init_logging() {
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(DEFAULT_LOG_FILTER),
    )
    .try_init();
}

/// Open the OpenGL library. Returns `false` (after logging why) when it cannot
/// be opened; calling again after success is a no-op that returns `true`.
#[no_mangle]
pub extern "C" fn coregl_load_functions() -> bool {
    init_logging();

    let Ok(mut loader) = RUNTIME.lock() else {
        log::error!("coregl runtime lock poisoned");
        return false;
    };

    if loader.state() == LoadState::Loaded {
        log::debug!("coregl_load_functions: already loaded");
        return true;
    }
    loader.load().is_ok()
}

/// Resolve `name` on demand. Null when `name` is null or not UTF-8, when the
/// runtime is not loaded, or when no resolver knows the symbol.
///
/// # Safety
/// `name` must be null or point to a NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn coregl_get_function_pointer(name: *const c_char) -> *const c_void {
    if name.is_null() {
        return std::ptr::null();
    }
    let Ok(name) = CStr::from_ptr(name).to_str() else {
        return std::ptr::null();
    };

    let Ok(loader) = RUNTIME.lock() else {
        return std::ptr::null();
    };
    loader
        .loaded()
        .and_then(|gl| gl.get_function_pointer(name))
        .map_or(std::ptr::null(), |ptr| ptr.as_ptr())
}

/// Version gate. `false` whenever the runtime is not loaded or either
/// argument is negative.
#[no_mangle]
pub extern "C" fn coregl_is_supported(major: c_int, minor: c_int) -> bool {
    let (Ok(major), Ok(minor)) = (u32::try_from(major), u32::try_from(minor)) else {
        return false;
    };

    let Ok(loader) = RUNTIME.lock() else {
        return false;
    };
    match loader.loaded() {
        Some(gl) => gl.is_supported(major, minor),
        None => {
            log::warn!("coregl_is_supported called before coregl_load_functions");
            false
        }
    }
}
