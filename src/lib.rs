//! OpenGL core-profile binding generator and loader
//!
//! Two halves:
//! - Build time: [`Generator`] reads a local `glcorearb.h`, extracts every
//!   `GLAPI ... APIENTRY` prototype and writes an `OpenGL.h` / `OpenGL.c` pair
//!   that aliases each canonical name (`glClear`) to a function pointer.
//! - Run time: [`Loader`] opens the platform's OpenGL library and binds entry
//!   points through a prioritized [`ResolverChain`]. The generated C code
//!   reaches the same loader through the C ABI in [`ffi`].

pub mod config;
pub mod emit;
pub mod error;
pub mod ffi;
pub mod generate;
pub mod header;
pub mod loader;

pub use config::{GeneratorConfig, LoaderConfig, Platform};
pub use emit::{Emitter, Fragments, Naming};
pub use error::{ExtractError, GenerateError, LoadError};
pub use generate::{Generated, Generator, Report};
pub use header::{extract, Enumerant, Extraction, FunctionSignature, Parameter};
pub use loader::version::GlVersion;
pub use loader::{
    FnResolver, FunctionPointer, FunctionTable, LoadState, Loaded, Loader, ResolverChain,
    SymbolResolver,
};
