use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use crate::emit::Naming;
use crate::error::GenerateError;
use crate::header::FeatureFilter;

pub const DEFAULT_HEADER_PATH: &str = "/usr/include/GL/glcorearb.h";
pub const HEADER_FILE_NAME: &str = "glcorearb.h";

/// Environment variable overriding the OpenGL library the runtime opens.
pub const LIBRARY_ENV: &str = "COREGL_GL_LIBRARY";

/// Target platform of the generated C files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum Platform {
    Linux,
    Windows,
    MacOs,
}

impl Platform {
    pub fn host() -> Self {
        match std::env::consts::OS {
            "windows" => Platform::Windows,
            "macos" => Platform::MacOs,
            _ => Platform::Linux,
        }
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::host()
    }
}

impl FromStr for Platform {
    type Err = GenerateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "linux" => Ok(Platform::Linux),
            "windows" | "win32" => Ok(Platform::Windows),
            "macos" | "darwin" | "osx" => Ok(Platform::MacOs),
            _ => Err(GenerateError::UnknownPlatform(s.to_string())),
        }
    }
}

impl TryFrom<String> for Platform {
    type Error = GenerateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Platform::Linux => "linux",
            Platform::Windows => "windows",
            Platform::MacOs => "macos",
        })
    }
}

/// Settings of one generation run. Every field has a default, so a TOML file
/// only needs the keys it changes.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// The API header, or a directory containing `glcorearb.h`.
    pub source: PathBuf,
    pub destination: PathBuf,
    pub platform: Platform,
    /// Include path of the API header inside the generated header.
    pub include: String,
    pub header_name: String,
    pub source_name: String,
    /// Drop prototypes declared in extension blocks.
    pub core_only: bool,
    pub naming: Naming,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from(DEFAULT_HEADER_PATH),
            destination: PathBuf::from("Generated"),
            platform: Platform::host(),
            include: "GL/glcorearb.h".to_string(),
            header_name: "OpenGL.h".to_string(),
            source_name: "OpenGL.c".to_string(),
            core_only: false,
            naming: Naming::default(),
        }
    }
}

impl GeneratorConfig {
    pub fn from_toml_str(text: &str, path: &Path) -> Result<Self, GenerateError> {
        toml::from_str(text).map_err(|source| GenerateError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, GenerateError> {
        let text = std::fs::read_to_string(path).map_err(|source| GenerateError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text, path)
    }

    /// The header file to read; a directory source resolves to `glcorearb.h` inside it.
    pub fn header_path(&self) -> PathBuf {
        if self.source.is_dir() {
            self.source.join(HEADER_FILE_NAME)
        } else {
            self.source.clone()
        }
    }

    pub fn feature_filter(&self) -> FeatureFilter {
        if self.core_only {
            FeatureFilter::CoreOnly
        } else {
            FeatureFilter::All
        }
    }
}

/// Where the runtime looks for the OpenGL library and its context resolver.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Tried in order; the first one that opens wins.
    pub library_names: Vec<String>,
    /// Exported names of the context-specific `GetProcAddress` function.
    pub proc_address_symbols: Vec<String>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        let (libraries, symbols): (&[&str], &[&str]) = if cfg!(windows) {
            (&["opengl32.dll"], &["wglGetProcAddress"])
        } else if cfg!(target_os = "macos") {
            (&["/System/Library/Frameworks/OpenGL.framework/OpenGL"], &[])
        } else {
            (
                &["libGL.so.1", "libGL.so"],
                &["glXGetProcAddressARB", "glXGetProcAddress"],
            )
        };

        Self {
            library_names: libraries.iter().map(|s| s.to_string()).collect(),
            proc_address_symbols: symbols.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl LoaderConfig {
    /// Defaults, with the library list replaced by `COREGL_GL_LIBRARY` when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(value) = std::env::var_os(LIBRARY_ENV) {
            let names: Vec<String> = std::env::split_paths(&value)
                .map(|p| p.to_string_lossy().into_owned())
                .filter(|s| !s.is_empty())
                .collect();
            if !names.is_empty() {
                log::debug!("Using OpenGL libraries from {}: {:?}", LIBRARY_ENV, names);
                config.library_names = names;
            }
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_names() {
        assert_eq!("Linux".parse::<Platform>().unwrap(), Platform::Linux);
        assert_eq!("WINDOWS".parse::<Platform>().unwrap(), Platform::Windows);
        assert_eq!("darwin".parse::<Platform>().unwrap(), Platform::MacOs);
        assert!("beos".parse::<Platform>().is_err());
    }

    #[test]
    fn default_generator_config() {
        let config = GeneratorConfig::default();
        assert_eq!(config.source, PathBuf::from("/usr/include/GL/glcorearb.h"));
        assert_eq!(config.header_name, "OpenGL.h");
        assert_eq!(config.source_name, "OpenGL.c");
        assert_eq!(config.feature_filter(), FeatureFilter::All);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let text = r#"
            source = "include/glcorearb.h"
            platform = "Windows"
            core_only = true

            [naming]
            pointer_prefix = "gl_ptr_"
        "#;
        let config = GeneratorConfig::from_toml_str(text, Path::new("coregl.toml")).unwrap();
        assert_eq!(config.source, PathBuf::from("include/glcorearb.h"));
        assert_eq!(config.platform, Platform::Windows);
        assert_eq!(config.feature_filter(), FeatureFilter::CoreOnly);
        assert_eq!(config.naming.pointer_prefix, "gl_ptr_");
        assert_eq!(config.naming.resolver, "glGetFunctionPointer");
        assert_eq!(config.destination, PathBuf::from("Generated"));
    }

    #[test]
    fn bad_platform_in_toml() {
        let err = GeneratorConfig::from_toml_str("platform = \"amiga\"", Path::new("c.toml"))
            .unwrap_err();
        assert!(matches!(err, GenerateError::ConfigParse { .. }));
    }

    #[test]
    fn directory_source_resolves_header() {
        let dir = tempfile::tempdir().unwrap();
        let config = GeneratorConfig {
            source: dir.path().to_path_buf(),
            ..Default::default()
        };
        assert_eq!(config.header_path(), dir.path().join("glcorearb.h"));
    }

    #[test]
    fn loader_defaults_are_not_empty() {
        assert!(!LoaderConfig::default().library_names.is_empty());
    }
}
