//! Build-time generation of the `OpenGL.h` / `OpenGL.c` pair.
//!
//! Intended to be driven from the `coregl-gen` binary or a consumer's
//! `build.rs`:
//!
//! ```no_run
//! use coregl::{Generator, GeneratorConfig};
//!
//! let config = GeneratorConfig {
//!     destination: std::env::var("OUT_DIR").unwrap().into(),
//!     ..Default::default()
//! };
//! Generator::new(config).run().unwrap();
//! ```

use std::fs;
use std::path::PathBuf;

use crate::config::GeneratorConfig;
use crate::emit::template::{HeaderTemplate, SourceTemplate};
use crate::emit::Emitter;
use crate::error::{GenerateError, Result};
use crate::header::{ExtractOptions, Extraction, Extractor};
use crate::loader::version::{GL_MAJOR_VERSION, GL_MINOR_VERSION};

/// Rendered file contents of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    pub header: String,
    pub source: String,
    pub extraction: Extraction,
}

/// Where a run wrote its output.
#[derive(Debug, Clone)]
pub struct Report {
    pub header_path: PathBuf,
    pub source_path: PathBuf,
    pub functions: usize,
}

pub struct Generator {
    config: GeneratorConfig,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn generate_from_str(&self, text: &str) -> Result<Generated> {
        let extractor = Extractor::new(ExtractOptions {
            features: self.config.feature_filter(),
            source_name: self.config.header_path().display().to_string(),
            ..Default::default()
        });
        let extraction = extractor.extract(text)?;
        check_version_enumerants(&extraction);

        let fragments = Emitter::new(self.config.naming.clone())
            .emit(&extraction.signatures, &extraction.enumerants);

        let header = HeaderTemplate::new(
            self.config.platform,
            &self.config.include,
            &self.config.header_name,
        )
        .render(&fragments);
        let source = SourceTemplate::new(&self.config.header_name).render(&fragments);

        Ok(Generated {
            header,
            source,
            extraction,
        })
    }

    pub fn generate(&self) -> Result<Generated> {
        let path = self.config.header_path();
        let text = fs::read_to_string(&path)
            .map_err(|source| GenerateError::HeaderRead { path: path.clone(), source })?;
        log::info!("Found glcorearb.h at: {}", path.display());
        self.generate_from_str(&text)
    }

    /// Generates, then writes both files. Nothing is written when generation fails.
    pub fn run(&self) -> Result<Report> {
        let generated = self.generate()?;

        let destination = &self.config.destination;
        fs::create_dir_all(destination).map_err(|source| GenerateError::Write {
            path: destination.clone(),
            source,
        })?;

        let header_path = destination.join(&self.config.header_name);
        let source_path = destination.join(&self.config.source_name);
        for (path, contents) in [
            (&header_path, &generated.header),
            (&source_path, &generated.source),
        ] {
            fs::write(path, contents).map_err(|source| GenerateError::Write {
                path: path.clone(),
                source,
            })?;
        }

        log::info!(
            "Wrote {} function bindings to {}",
            generated.extraction.signatures.len(),
            destination.display()
        );

        Ok(Report {
            header_path,
            source_path,
            functions: generated.extraction.signatures.len(),
        })
    }
}

fn check_version_enumerants(extraction: &Extraction) {
    for (name, expected) in [
        ("GL_MAJOR_VERSION", GL_MAJOR_VERSION),
        ("GL_MINOR_VERSION", GL_MINOR_VERSION),
    ] {
        match extraction.enumerant(name).map(|e| e.value()) {
            Some(Ok(value)) if value == expected => {}
            Some(Ok(value)) => log::warn!(
                "{} is {:#x} in the header but the runtime queries {:#x}",
                name,
                value,
                expected
            ),
            Some(Err(err)) => log::warn!("{}", err),
            None => log::warn!("{} not found in the header; version queries need OpenGL 3.0", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Platform;

    const HEADER: &str = "\
#ifndef GL_VERSION_3_0
#define GL_MAJOR_VERSION 0x821B
#define GL_MINOR_VERSION 0x821C
GLAPI void APIENTRY glGetIntegerv (GLenum pname, GLint *data);
GLAPI void APIENTRY glFlush (void);
#endif
";

    fn generator() -> Generator {
        Generator::new(GeneratorConfig {
            platform: Platform::Linux,
            ..Default::default()
        })
    }

    #[test]
    fn renders_both_files() {
        let generated = generator().generate_from_str(HEADER).unwrap();
        assert!(generated.header.contains("#define glFlush"));
        assert!(generated.header.contains("extern _cglpfn_glGetIntegerv"));
        assert!(generated
            .source
            .contains("(_cglpfn_glGetIntegerv)glGetFunctionPointer(\"glGetIntegerv\");"));
        assert_eq!(generated.extraction.signatures.len(), 2);
    }

    #[test]
    fn unparseable_header_is_an_error() {
        let err = generator().generate_from_str("int main(void);\n").unwrap_err();
        assert!(matches!(err, GenerateError::Extract(_)));
    }
}
