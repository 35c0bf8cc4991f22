//! Platform-specific OpenGL resolver chains
//!
//! Each platform opens its native GL library and resolves entry points in two
//! tiers: the context-specific mechanism first, then a plain symbol lookup in
//! the library that was opened.

use std::sync::Arc;

use super::library::{GlLibrary, LibraryResolver};
use super::resolver::ResolverChain;
use crate::config::LoaderConfig;
use crate::error::LoadError;

/// Open the configured library and build its resolver chain.
pub fn open(config: &LoaderConfig) -> Result<ResolverChain, LoadError> {
    let library = Arc::new(GlLibrary::open(&config.library_names)?);
    let mut chain = ResolverChain::new();

    #[cfg(target_os = "macos")]
    {
        match macos::BundleResolver::new() {
            Some(resolver) => {
                chain.push(resolver);
            }
            None => log::warn!("OpenGL framework bundle not found; using dlsym only"),
        }
    }

    if !config.proc_address_symbols.is_empty() {
        match super::library::ProcAddressResolver::find(&library, &config.proc_address_symbols) {
            Some(resolver) => {
                chain.push(resolver);
            }
            None => log::warn!(
                "{} exports none of {:?}; falling back to plain symbol lookup",
                library.name(),
                config.proc_address_symbols
            ),
        }
    }

    chain.push(LibraryResolver::new(library));
    Ok(chain)
}

#[cfg(target_os = "macos")]
mod macos {
    use core_foundation::base::TCFType;
    use core_foundation::bundle::{
        CFBundleGetBundleWithIdentifier, CFBundleGetFunctionPointerForName, CFBundleRef,
    };
    use core_foundation::string::CFString;
    use std::ffi::{c_void, CStr};

    use crate::loader::resolver::{FunctionPointer, SymbolResolver};

    const BUNDLE_ID: &str = "com.apple.opengl";

    /// Looks entry points up through the OpenGL framework bundle.
    pub struct BundleResolver {
        bundle: CFBundleRef,
    }

    // The framework bundle is a process-lifetime singleton owned by CoreFoundation.
    unsafe impl Send for BundleResolver {}
    unsafe impl Sync for BundleResolver {}

    impl BundleResolver {
        pub fn new() -> Option<Self> {
            let framework_name = CFString::new(BUNDLE_ID);
            let bundle =
                unsafe { CFBundleGetBundleWithIdentifier(framework_name.as_concrete_TypeRef()) };
            if bundle.is_null() {
                return None;
            }
            Some(Self { bundle })
        }
    }

    impl SymbolResolver for BundleResolver {
        fn label(&self) -> &str {
            "CFBundleGetFunctionPointerForName"
        }

        fn resolve(&self, symbol: &CStr) -> Option<FunctionPointer> {
            let name = symbol.to_str().ok()?;
            let symbol_name = CFString::new(name);
            let address = unsafe {
                CFBundleGetFunctionPointerForName(self.bundle, symbol_name.as_concrete_TypeRef())
            };
            FunctionPointer::new(address as *const c_void)
        }
    }
}
