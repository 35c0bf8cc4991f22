//! Minimal C syntax model for the generated declarations.

/// One generated C construct. Rendering aligns the second column of a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CItem {
    /// `typedef R (APIENTRYP alias)(params);`
    FnPointerType {
        alias: String,
        return_type: String,
        params: String,
    },
    /// `extern ty name;`
    Extern { ty: String, name: String },
    /// `ty name = NULL;`
    Definition { ty: String, name: String },
    /// `#define name target`
    Alias { name: String, target: String },
    /// `target = (ty)resolver("symbol");`
    Binding {
        target: String,
        ty: String,
        resolver: String,
        symbol: String,
    },
    /// `#ifndef name` / `#define name value` / `#endif`
    Fallback { name: String, value: String },
}

impl CItem {
    fn lead(&self) -> String {
        match self {
            CItem::FnPointerType { return_type, .. } => format!("typedef {return_type}"),
            CItem::Extern { ty, .. } => format!("extern {ty}"),
            CItem::Definition { ty, .. } => ty.clone(),
            CItem::Alias { name, .. } => format!("#define {name}"),
            CItem::Binding { target, .. } => target.clone(),
            CItem::Fallback { name, .. } => format!("#define {name}"),
        }
    }

    fn render(&self, width: usize) -> String {
        let lead = self.lead();
        match self {
            CItem::FnPointerType { alias, params, .. } => {
                format!("{lead} (APIENTRYP {alias})({params});")
            }
            CItem::Extern { name, .. } => format!("{lead:<width$}{name};"),
            CItem::Definition { name, .. } => format!("{lead:<width$}{name} = NULL;"),
            CItem::Alias { target, .. } => format!("{lead:<width$}{target}"),
            CItem::Binding {
                ty,
                resolver,
                symbol,
                ..
            } => format!("{lead:<width$}= ({ty}){resolver}(\"{symbol}\");"),
            CItem::Fallback { name, value } => {
                format!("#ifndef {name}\n{lead:<width$}{value}\n#endif")
            }
        }
    }
}

/// A run of items rendered with a shared column and indentation.
#[derive(Debug, Clone, Default)]
pub struct Block {
    items: Vec<CItem>,
    indent: usize,
}

impl Block {
    pub fn new(indent: usize) -> Self {
        Self {
            items: Vec::new(),
            indent,
        }
    }

    pub fn push(&mut self, item: CItem) {
        self.items.push(item);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn render(&self) -> String {
        let width = self
            .items
            .iter()
            .map(|item| item.lead().len())
            .max()
            .unwrap_or(0)
            + 1;
        let pad = " ".repeat(self.indent);

        let mut out = String::new();
        for item in &self.items {
            for line in item.render(width).lines() {
                out.push_str(&pad);
                out.push_str(line);
                out.push('\n');
            }
        }
        out
    }
}
