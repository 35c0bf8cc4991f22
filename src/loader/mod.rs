//! Runtime resolution of OpenGL entry points.
//!
//! A [`Loader`] owns the function table and the resolver chain (and through
//! it the opened library handle). The library stays open until the loader is
//! dropped, so every pointer handed out by a [`Loaded`] view stays valid for
//! as long as that view can exist.
//!
//! ```no_run
//! use coregl::{Loader, LoaderConfig};
//!
//! let mut loader = Loader::new(LoaderConfig::default(), ["glClear", "glViewport"]);
//! let gl = loader.load()?;
//! if gl.is_supported(3, 3) {
//!     let clear = gl.function("glClear");
//!     assert!(clear.is_some());
//! }
//! # Ok::<(), coregl::LoadError>(())
//! ```

pub mod library;
pub mod platform;
pub mod resolver;
pub mod version;

use std::collections::HashMap;
use std::fmt;

use crate::config::LoaderConfig;
use crate::error::LoadError;
pub use resolver::{FnResolver, FunctionPointer, ResolverChain, SymbolResolver};
use version::{GetIntegervFn, GlVersion, MIN_QUERYABLE_MAJOR};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Unloaded,
    Loading,
    Loaded,
    Failed,
}

impl fmt::Display for LoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LoadState::Unloaded => "unloaded",
            LoadState::Loading => "loading",
            LoadState::Loaded => "loaded",
            LoadState::Failed => "failed",
        })
    }
}

/// Ordered `name -> pointer` map. Entries start out unresolved.
#[derive(Debug, Clone, Default)]
pub struct FunctionTable {
    entries: Vec<(String, Option<FunctionPointer>)>,
    index: HashMap<String, usize>,
}

impl FunctionTable {
    /// Duplicate names keep their first position.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::default();
        for name in names {
            let name = name.into();
            if table.index.contains_key(&name) {
                continue;
            }
            table.index.insert(name.clone(), table.entries.len());
            table.entries.push((name, None));
        }
        table
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<FunctionPointer> {
        self.index.get(name).and_then(|&i| self.entries[i].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<FunctionPointer>)> {
        self.entries.iter().map(|(name, ptr)| (name.as_str(), *ptr))
    }

    pub fn bound_count(&self) -> usize {
        self.entries.iter().filter(|(_, ptr)| ptr.is_some()).count()
    }

    pub fn unresolved(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|(_, ptr)| ptr.is_none())
            .map(|(name, _)| name.as_str())
    }

    fn bind(&mut self, chain: &ResolverChain) {
        for (name, ptr) in &mut self.entries {
            *ptr = chain.resolve(name);
            if ptr.is_none() {
                log::debug!("{} did not resolve", name);
            }
        }
    }
}

pub struct Loader {
    config: LoaderConfig,
    state: LoadState,
    table: FunctionTable,
    resolvers: Option<ResolverChain>,
}

impl Loader {
    pub fn new<I, S>(config: LoaderConfig, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            config,
            state: LoadState::Unloaded,
            table: FunctionTable::new(names),
            resolvers: None,
        }
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn table(&self) -> &FunctionTable {
        &self.table
    }

    /// Opens the platform library and binds every table entry.
    pub fn load(&mut self) -> Result<Loaded<'_>, LoadError> {
        self.load_with(platform::open)
    }

    /// Like [`Loader::load`] with a caller-supplied chain. Unresolved names stay
    /// `None` and do not fail the load; an `open` error leaves the table untouched.
    pub fn load_with<F>(&mut self, open: F) -> Result<Loaded<'_>, LoadError>
    where
        F: FnOnce(&LoaderConfig) -> Result<ResolverChain, LoadError>,
    {
        if self.state == LoadState::Loaded {
            return Err(LoadError::AlreadyLoaded);
        }

        self.state = LoadState::Loading;
        let chain = match open(&self.config) {
            Ok(chain) => chain,
            Err(err) => {
                log::error!("Failed to load the OpenGL Core Profile library: {}", err);
                self.state = LoadState::Failed;
                return Err(err);
            }
        };

        self.table.bind(&chain);
        log::info!(
            "Bound {} of {} OpenGL functions via {:?}",
            self.table.bound_count(),
            self.table.len(),
            chain
        );

        self.state = LoadState::Loaded;
        let resolvers = self.resolvers.insert(chain);
        Ok(Loaded {
            table: &self.table,
            resolvers,
        })
    }

    /// The loaded view, if `load` has succeeded.
    pub fn loaded(&self) -> Option<Loaded<'_>> {
        match (&self.state, &self.resolvers) {
            (LoadState::Loaded, Some(resolvers)) => Some(Loaded {
                table: &self.table,
                resolvers,
            }),
            _ => None,
        }
    }
}

impl fmt::Debug for Loader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Loader")
            .field("state", &self.state)
            .field("functions", &self.table.len())
            .field("resolvers", &self.resolvers)
            .finish()
    }
}

/// Proof that loading succeeded; the only way to reach bound functions.
#[derive(Clone, Copy)]
pub struct Loaded<'a> {
    table: &'a FunctionTable,
    resolvers: &'a ResolverChain,
}

impl<'a> Loaded<'a> {
    pub fn table(&self) -> &'a FunctionTable {
        self.table
    }

    /// The pointer bound at load time.
    pub fn function(&self, name: &str) -> Option<FunctionPointer> {
        self.table.get(name)
    }

    /// Table entry if present, otherwise an on-demand lookup through the chain.
    pub fn get_function_pointer(&self, name: &str) -> Option<FunctionPointer> {
        self.table
            .get(name)
            .or_else(|| self.resolvers.resolve(name))
    }

    /// `None` when `glGetIntegerv` is missing or the context predates 3.0.
    pub fn version(&self) -> Option<GlVersion> {
        let get_integerv = self.get_function_pointer("glGetIntegerv")?;
        // SAFETY: the symbol is glGetIntegerv, whose ABI is `GetIntegervFn`.
        unsafe { GlVersion::query(get_integerv.cast::<GetIntegervFn>()) }
    }

    /// `true` iff the context reports at least `major.minor`.
    pub fn is_supported(&self, major: u32, minor: u32) -> bool {
        if major < MIN_QUERYABLE_MAJOR {
            return false;
        }

        match self.version() {
            Some(version) => {
                log::info!("Detected OpenGL version {}", version);
                version.supports(major, minor)
            }
            None => {
                log::warn!("Could not query the OpenGL version; glGetIntegerv is unavailable or the context predates 3.0");
                false
            }
        }
    }
}

impl fmt::Debug for Loaded<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Loaded")
            .field("bound", &self.table.bound_count())
            .field("functions", &self.table.len())
            .finish()
    }
}
