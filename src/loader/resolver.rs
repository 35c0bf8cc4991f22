//! Prioritized symbol-resolution strategies.

use std::ffi::{c_void, CStr, CString};
use std::fmt;
use std::ptr::NonNull;

/// A resolved, non-null entry point address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FunctionPointer(NonNull<c_void>);

// Code addresses are immutable and valid from any thread.
unsafe impl Send for FunctionPointer {}
unsafe impl Sync for FunctionPointer {}

impl FunctionPointer {
    /// Returns `None` for a null address.
    pub fn new(ptr: *const c_void) -> Option<Self> {
        NonNull::new(ptr as *mut c_void).map(Self)
    }

    pub fn as_ptr(self) -> *const c_void {
        self.0.as_ptr()
    }

    /// Reinterprets the address as a concrete function pointer type.
    ///
    /// # Safety
    /// `F` must be a function pointer type matching the symbol's real
    /// signature and calling convention.
    pub unsafe fn cast<F: Copy>(self) -> F {
        const {
            assert!(
                std::mem::size_of::<F>() == std::mem::size_of::<*const c_void>(),
                "FunctionPointer::cast target must be pointer-sized"
            )
        };
        std::mem::transmute_copy(&self.0)
    }
}

/// One way of turning a symbol name into an address.
pub trait SymbolResolver: Send + Sync {
    /// Short label used in diagnostics.
    fn label(&self) -> &str;

    fn resolve(&self, symbol: &CStr) -> Option<FunctionPointer>;
}

/// Adapts a closure into a [`SymbolResolver`].
pub struct FnResolver<F> {
    label: String,
    resolve: F,
}

impl<F> FnResolver<F>
where
    F: Fn(&CStr) -> Option<FunctionPointer> + Send + Sync,
{
    pub fn new(label: impl Into<String>, resolve: F) -> Self {
        Self {
            label: label.into(),
            resolve,
        }
    }
}

impl<F> SymbolResolver for FnResolver<F>
where
    F: Fn(&CStr) -> Option<FunctionPointer> + Send + Sync,
{
    fn label(&self) -> &str {
        &self.label
    }

    fn resolve(&self, symbol: &CStr) -> Option<FunctionPointer> {
        (self.resolve)(symbol)
    }
}

/// Resolvers tried in order; the first non-null answer wins.
#[derive(Default)]
pub struct ResolverChain {
    resolvers: Vec<Box<dyn SymbolResolver>>,
}

impl ResolverChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, resolver: impl SymbolResolver + 'static) -> &mut Self {
        self.resolvers.push(Box::new(resolver));
        self
    }

    pub fn with(mut self, resolver: impl SymbolResolver + 'static) -> Self {
        self.push(resolver);
        self
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.resolvers.iter().map(|r| r.label())
    }

    pub fn resolve_c(&self, symbol: &CStr) -> Option<FunctionPointer> {
        self.resolvers.iter().find_map(|resolver| {
            let found = resolver.resolve(symbol);
            if found.is_some() {
                log::trace!("{:?} resolved by {}", symbol, resolver.label());
            }
            found
        })
    }

    /// Names containing a NUL byte cannot be symbols and resolve to `None`.
    pub fn resolve(&self, name: &str) -> Option<FunctionPointer> {
        let symbol = CString::new(name).ok()?;
        self.resolve_c(&symbol)
    }
}

impl fmt::Debug for ResolverChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.labels()).finish()
    }
}
