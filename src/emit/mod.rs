//! Turns extracted signatures into the C declaration and binding fragments.

pub mod c;
pub mod template;

use serde::Deserialize;

use crate::header::{Enumerant, FunctionSignature};
use c::{Block, CItem};

/// Name of the static C function the bindings fragment defines.
pub const BIND_FUNCTION: &str = "_cglBindFunctions";

/// Decoration applied to generated identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Naming {
    /// Prefix of the pointer variables. Keeps them distinct from symbols other
    /// libraries may already define under the canonical name.
    pub pointer_prefix: String,
    pub type_prefix: String,
    /// C function the binding statements call.
    pub resolver: String,
}

impl Default for Naming {
    fn default() -> Self {
        Self {
            pointer_prefix: "_cglptr_".to_string(),
            type_prefix: "_cglpfn_".to_string(),
            resolver: "glGetFunctionPointer".to_string(),
        }
    }
}

impl Naming {
    pub fn pointer(&self, name: &str) -> String {
        format!("{}{}", self.pointer_prefix, name)
    }

    pub fn pointer_type(&self, name: &str) -> String {
        format!("{}{}", self.type_prefix, name)
    }
}

/// Header-side declarations and source-side bindings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragments {
    pub declarations: String,
    pub bindings: String,
}

#[derive(Debug, Clone, Default)]
pub struct Emitter {
    naming: Naming,
}

impl Emitter {
    pub fn new(naming: Naming) -> Self {
        Self { naming }
    }

    /// Output order follows `signatures`; the same input always renders the same text.
    pub fn emit(&self, signatures: &[FunctionSignature], enumerants: &[Enumerant]) -> Fragments {
        let mut fallbacks = Block::new(0);
        let mut typedefs = Block::new(0);
        let mut externs = Block::new(0);
        let mut aliases = Block::new(0);
        let mut definitions = Block::new(0);
        let mut bindings = Block::new(4);

        for enumerant in enumerants {
            fallbacks.push(CItem::Fallback {
                name: enumerant.name.clone(),
                value: enumerant.value.clone(),
            });
        }

        for signature in signatures {
            let pointer = self.naming.pointer(&signature.name);
            let pointer_type = self.naming.pointer_type(&signature.name);

            typedefs.push(CItem::FnPointerType {
                alias: pointer_type.clone(),
                return_type: signature.return_type.clone(),
                params: signature.parameter_list(),
            });
            externs.push(CItem::Extern {
                ty: pointer_type.clone(),
                name: pointer.clone(),
            });
            aliases.push(CItem::Alias {
                name: signature.name.clone(),
                target: pointer.clone(),
            });
            definitions.push(CItem::Definition {
                ty: pointer_type.clone(),
                name: pointer.clone(),
            });
            bindings.push(CItem::Binding {
                target: pointer,
                ty: pointer_type,
                resolver: self.naming.resolver.clone(),
                symbol: signature.name.clone(),
            });
        }

        let declarations = [&fallbacks, &typedefs, &externs, &aliases]
            .into_iter()
            .filter(|block| !block.is_empty())
            .map(Block::render)
            .collect::<Vec<_>>()
            .join("\n");

        let bindings = format!(
            "{}\nstatic void {}(void)\n{{\n{}}}\n",
            definitions.render(),
            BIND_FUNCTION,
            bindings.render()
        );

        Fragments {
            declarations,
            bindings,
        }
    }
}
