//! Structured view of the prototypes and macros in an OpenGL API header.

pub mod extract;
mod params;

use std::fmt;

use crate::error::ExtractError;

pub use extract::{extract, ExtractOptions, Extraction, Extractor, FeatureFilter};

/// The `#ifndef GL_xxx` block a prototype was declared in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Feature(pub String);

impl Feature {
    /// `GL_VERSION_*` blocks make up the core profile; everything else is an extension.
    pub fn is_core(&self) -> bool {
        self.0.starts_with("GL_VERSION_")
    }
}

/// A single C parameter. `suffix` carries an array declarator such as `[4]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub ty: String,
    pub name: String,
    pub suffix: String,
}

impl Parameter {
    pub fn new(ty: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            name: name.into(),
            suffix: String::new(),
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ty.ends_with('*') {
            write!(f, "{}{}{}", self.ty, self.name, self.suffix)
        } else {
            write!(f, "{} {}{}", self.ty, self.name, self.suffix)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSignature {
    pub return_type: String,
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub feature: Option<Feature>,
}

impl FunctionSignature {
    pub fn new(
        return_type: impl Into<String>,
        name: impl Into<String>,
        parameters: Vec<Parameter>,
    ) -> Self {
        Self {
            return_type: return_type.into(),
            name: name.into(),
            parameters,
            feature: None,
        }
    }

    /// Parameter list as it appears between the parentheses of a C declarator.
    pub fn parameter_list(&self) -> String {
        if self.parameters.is_empty() {
            return "void".to_string();
        }
        self.parameters
            .iter()
            .map(Parameter::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// An integer macro such as `GL_MAJOR_VERSION 0x821B`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enumerant {
    pub name: String,
    pub value: String,
}

impl Enumerant {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Parses the literal as decimal, `0x` hex or leading-zero octal.
    pub fn value(&self) -> Result<u32, ExtractError> {
        let literal = self.value.trim().trim_end_matches(&['u', 'U', 'l', 'L'][..]);
        let parsed = if let Some(hex) = literal
            .strip_prefix("0x")
            .or_else(|| literal.strip_prefix("0X"))
        {
            u32::from_str_radix(hex, 16)
        } else if literal.len() > 1 && literal.starts_with('0') {
            u32::from_str_radix(&literal[1..], 8)
        } else {
            literal.parse::<u32>()
        };
        parsed.map_err(|_| ExtractError::InvalidEnumerant {
            name: self.name.clone(),
            value: self.value.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enumerant_literals() {
        assert_eq!(Enumerant::new("A", "0x821B").value().unwrap(), 0x821B);
        assert_eq!(Enumerant::new("B", "33307").value().unwrap(), 33307);
        assert_eq!(Enumerant::new("C", "010").value().unwrap(), 8);
        assert_eq!(Enumerant::new("D", "0").value().unwrap(), 0);
        assert_eq!(Enumerant::new("E", "0xFFFFFFFFu").value().unwrap(), u32::MAX);
        assert!(Enumerant::new("F", "-1").value().is_err());
        assert!(Enumerant::new("G", "GL_FOO").value().is_err());
    }

    #[test]
    fn parameter_list_rendering() {
        let sig = FunctionSignature::new(
            "void",
            "glShaderSource",
            vec![
                Parameter::new("GLuint", "shader"),
                Parameter::new("const GLchar *const*", "string"),
            ],
        );
        assert_eq!(sig.parameter_list(), "GLuint shader, const GLchar *const*string");

        let empty = FunctionSignature::new("void", "glFinish", Vec::new());
        assert_eq!(empty.parameter_list(), "void");
    }

    #[test]
    fn core_features() {
        assert!(Feature("GL_VERSION_3_3".into()).is_core());
        assert!(!Feature("GL_ARB_bindless_texture".into()).is_core());
    }
}
