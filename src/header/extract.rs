//! Signature extraction from `glcorearb.h`-style headers.
//!
//! Only single-line prototypes of the shape
//! `GLAPI <ret> APIENTRY <name> (<params>);` are recognized. Everything else
//! (typedefs, comments, multi-line declarations) is skipped without error;
//! the only fatal outcome is an empty result.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use super::params::parse_parameters;
use super::{Enumerant, Feature, FunctionSignature};
use crate::error::ExtractError;

pub const DEFAULT_EXPORT_MACROS: &[&str] = &["GLAPI"];
pub const DEFAULT_CALLING_CONVENTIONS: &[&str] = &["APIENTRY"];
pub const VERSION_ENUMERANTS: &[&str] = &["GL_MAJOR_VERSION", "GL_MINOR_VERSION"];

static DEFINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*#\s*define\s+(?P<name>[A-Za-z_]\w*)\s+(?P<value>[^\s/]+)\s*(?:/\*.*\*/\s*|//.*)?$",
    )
        .expect("define pattern")
});

static CONDITIONAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*#\s*(?P<kind>ifndef|ifdef|if|endif)\b\s*(?P<arg>\w*)")
        .expect("conditional pattern")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeatureFilter {
    #[default]
    All,
    CoreOnly,
}

impl FeatureFilter {
    fn accepts(self, feature: Option<&Feature>) -> bool {
        match self {
            FeatureFilter::All => true,
            FeatureFilter::CoreOnly => feature.map_or(true, Feature::is_core),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub export_macros: Vec<String>,
    pub calling_conventions: Vec<String>,
    pub enumerants: Vec<String>,
    pub features: FeatureFilter,
    /// Used in error messages only.
    pub source_name: String,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            export_macros: DEFAULT_EXPORT_MACROS.iter().map(|s| s.to_string()).collect(),
            calling_conventions: DEFAULT_CALLING_CONVENTIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            enumerants: VERSION_ENUMERANTS.iter().map(|s| s.to_string()).collect(),
            features: FeatureFilter::All,
            source_name: "<header>".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub signatures: Vec<FunctionSignature>,
    pub enumerants: Vec<Enumerant>,
}

impl Extraction {
    pub fn enumerant(&self, name: &str) -> Option<&Enumerant> {
        self.enumerants.iter().find(|e| e.name == name)
    }
}

pub struct Extractor {
    options: ExtractOptions,
    prototype: Regex,
}

impl Extractor {
    pub fn new(options: ExtractOptions) -> Self {
        let alternation = |words: &[String]| {
            words
                .iter()
                .map(|w| regex::escape(w))
                .collect::<Vec<_>>()
                .join("|")
        };

        let prototype = format!(
            r"^\s*(?:{})\s+(?P<ret>.+?)\s*\b(?:{})\s+(?P<name>[A-Za-z_]\w*)\s*\((?P<params>.*)\)\s*;\s*$",
            alternation(&options.export_macros),
            alternation(&options.calling_conventions),
        );

        Self {
            prototype: Regex::new(&prototype).expect("prototype pattern is built from escaped words"),
            options,
        }
    }

    pub fn extract(&self, text: &str) -> Result<Extraction, ExtractError> {
        let mut extraction = Extraction::default();
        let mut seen = HashSet::new();
        let mut seen_enumerants = HashSet::new();
        // One slot per open conditional; `Some` for `#ifndef GL_xxx` feature guards.
        let mut blocks: Vec<Option<Feature>> = Vec::new();

        for line in text.lines() {
            if let Some(caps) = CONDITIONAL.captures(line) {
                match &caps["kind"] {
                    "endif" => {
                        blocks.pop();
                    }
                    "ifndef" if caps["arg"].starts_with("GL_") => {
                        blocks.push(Some(Feature(caps["arg"].to_string())));
                    }
                    _ => blocks.push(None),
                }
                continue;
            }

            if let Some(caps) = DEFINE.captures(line) {
                let name = &caps["name"];
                if self.options.enumerants.iter().any(|e| e == name)
                    && seen_enumerants.insert(name.to_string())
                {
                    let enumerant = Enumerant::new(name, &caps["value"]);
                    enumerant.value()?;
                    extraction.enumerants.push(enumerant);
                }
                continue;
            }

            let Some(caps) = self.prototype.captures(line) else {
                continue;
            };

            let feature = blocks.iter().flatten().next().cloned();
            if !self.options.features.accepts(feature.as_ref()) {
                continue;
            }

            let name = &caps["name"];
            if !seen.insert(name.to_string()) {
                log::debug!("Skipping duplicate prototype for {}", name);
                continue;
            }

            extraction.signatures.push(FunctionSignature {
                return_type: caps["ret"].trim().to_string(),
                name: name.to_string(),
                parameters: parse_parameters(&caps["params"]),
                feature,
            });
        }

        if extraction.signatures.is_empty() {
            return Err(ExtractError::NoSignatures {
                source_name: self.options.source_name.clone(),
            });
        }

        log::debug!(
            "Extracted {} signatures and {} enumerants from {}",
            extraction.signatures.len(),
            extraction.enumerants.len(),
            self.options.source_name
        );
        Ok(extraction)
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(ExtractOptions::default())
    }
}

/// Extracts with the default `GLAPI`/`APIENTRY` conventions.
pub fn extract(text: &str) -> Result<Extraction, ExtractError> {
    Extractor::default().extract(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNIPPET: &str = r#"
#ifndef GL_VERSION_1_0
#define GL_VERSION_1_0 1
typedef void (APIENTRYP PFNGLCULLFACEPROC) (GLenum mode);
#ifdef GL_GLEXT_PROTOTYPES
GLAPI void APIENTRY glCullFace (GLenum mode);
GLAPI const GLubyte *APIENTRY glGetString (GLenum name);
GLAPI void APIENTRY glFinish (void);
#endif
#endif /* GL_VERSION_1_0 */
#ifndef GL_VERSION_3_0
#define GL_VERSION_3_0 1
#define GL_MAJOR_VERSION                  0x821B
#define GL_MINOR_VERSION                  0x821C
#endif /* GL_VERSION_3_0 */
#ifndef GL_ARB_bindless_texture
#define GL_ARB_bindless_texture 1
#ifdef GL_GLEXT_PROTOTYPES
GLAPI GLuint64 APIENTRY glGetTextureHandleARB (GLuint texture);
#endif
#endif /* GL_ARB_bindless_texture */
"#;

    #[test]
    fn return_types_and_names() {
        let extraction = extract(SNIPPET).unwrap();
        let names: Vec<_> = extraction.signatures.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            ["glCullFace", "glGetString", "glFinish", "glGetTextureHandleARB"]
        );
        assert_eq!(extraction.signatures[1].return_type, "const GLubyte *");
        assert!(extraction.signatures[2].parameters.is_empty());
    }

    #[test]
    fn features_are_attached() {
        let extraction = extract(SNIPPET).unwrap();
        assert_eq!(
            extraction.signatures[0].feature,
            Some(Feature("GL_VERSION_1_0".into()))
        );
        assert_eq!(
            extraction.signatures[3].feature,
            Some(Feature("GL_ARB_bindless_texture".into()))
        );
    }

    #[test]
    fn core_only_drops_extensions() {
        let extractor = Extractor::new(ExtractOptions {
            features: FeatureFilter::CoreOnly,
            ..Default::default()
        });
        let extraction = extractor.extract(SNIPPET).unwrap();
        assert_eq!(extraction.signatures.len(), 3);
        assert!(extraction
            .signatures
            .iter()
            .all(|s| s.feature.as_ref().map_or(false, Feature::is_core)));
    }

    #[test]
    fn version_enumerants() {
        let extraction = extract(SNIPPET).unwrap();
        assert_eq!(
            extraction.enumerant("GL_MAJOR_VERSION").unwrap().value().unwrap(),
            0x821B
        );
        assert_eq!(
            extraction.enumerant("GL_MINOR_VERSION").unwrap().value().unwrap(),
            0x821C
        );
        assert!(extraction.enumerant("GL_VERSION_1_0").is_none());
    }

    #[test]
    fn enumerant_with_trailing_comment() {
        let text = "#define GL_MAJOR_VERSION 0x821B /* 3.0 */\n\
                    #define GL_MINOR_VERSION 0x821C // 3.0\n\
                    GLAPI void APIENTRY glFlush (void);\n";
        let extraction = extract(text).unwrap();
        assert_eq!(extraction.enumerants.len(), 2);
        assert_eq!(
            extraction.enumerant("GL_MAJOR_VERSION").unwrap().value().unwrap(),
            0x821B
        );
        assert_eq!(extraction.enumerant("GL_MINOR_VERSION").unwrap().value, "0x821C");
    }

    #[test]
    fn invalid_enumerant_is_rejected() {
        let text = "#define GL_MAJOR_VERSION GL_SOMETHING\nGLAPI void APIENTRY glFlush (void);\n";
        assert!(matches!(
            extract(text),
            Err(ExtractError::InvalidEnumerant { .. })
        ));
    }

    #[test]
    fn empty_header_fails() {
        let err = extract("/* nothing here */\n#define FOO 1\n").unwrap_err();
        assert!(matches!(err, ExtractError::NoSignatures { .. }));
    }

    #[test]
    fn custom_calling_convention() {
        let extractor = Extractor::new(ExtractOptions {
            export_macros: vec!["GLAPI".into(), "extern".into()],
            calling_conventions: vec!["APIENTRY".into(), "GLAPIENTRY".into()],
            ..Default::default()
        });
        let text = "extern void GLAPIENTRY glFlush (void);\nGLAPI void APIENTRY glFinish (void);\n";
        let extraction = extractor.extract(text).unwrap();
        assert_eq!(extraction.signatures.len(), 2);
    }

    #[test]
    fn multi_line_prototypes_are_skipped() {
        let text = "GLAPI void APIENTRY glFlush (void);\nGLAPI void APIENTRY glViewport (GLint x,\n    GLint y);\n";
        let extraction = extract(text).unwrap();
        assert_eq!(extraction.signatures.len(), 1);
    }
}
