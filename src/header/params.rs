use super::Parameter;

const QUALIFIERS: &[&str] = &[
    "const", "volatile", "restrict", "struct", "enum", "union", "signed", "unsigned",
];

const BUILTIN_TYPES: &[&str] = &[
    "void", "char", "short", "int", "long", "float", "double", "signed", "unsigned", "const",
    "volatile",
];

/// Parses the text between a prototype's parentheses.
pub(crate) fn parse_parameters(raw: &str) -> Vec<Parameter> {
    let raw = raw.trim();
    if raw.is_empty() || raw == "void" {
        return Vec::new();
    }

    split_top_level(raw)
        .into_iter()
        .enumerate()
        .map(|(index, entry)| parse_parameter(entry, index))
        .collect()
}

/// Splits on commas that are not nested inside `()` or `[]`.
fn split_top_level(raw: &str) -> Vec<&str> {
    let mut entries = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in raw.char_indices() {
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                entries.push(raw[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    entries.push(raw[start..].trim());
    entries
}

fn parse_parameter(entry: &str, index: usize) -> Parameter {
    if let Some((ty, name, suffix)) = split_function_pointer(entry) {
        let name = if name.is_empty() {
            format!("arg{index}")
        } else {
            name.to_string()
        };
        return Parameter {
            ty: ty.to_string(),
            name,
            suffix: suffix.to_string(),
        };
    }

    let (declarator, suffix) = match entry.find('[') {
        Some(pos) => (entry[..pos].trim_end(), entry[pos..].trim().to_string()),
        None => (entry, String::new()),
    };

    match split_identifier(declarator) {
        Some((ty, name)) => Parameter {
            ty: ty.to_string(),
            name: name.to_string(),
            suffix,
        },
        None => Parameter {
            ty: declarator.to_string(),
            name: format!("arg{index}"),
            suffix,
        },
    }
}

/// Splits `R (*name)(args)` into `("R (*", "name", ")(args)")`. The name may be empty.
fn split_function_pointer(entry: &str) -> Option<(&str, &str, &str)> {
    let open = entry.find('(')?;
    let star = open + 1 + entry[open + 1..].find('*')?;
    // Only a calling convention macro may sit between `(` and `*`.
    if !entry[open + 1..star]
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c.is_whitespace())
    {
        return None;
    }

    let name_start = star + 1;
    let close = name_start + entry[name_start..].find(')')?;
    let name = entry[name_start..close].trim();
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return None;
    }
    Some((&entry[..name_start], name, &entry[close..]))
}

/// Returns `(type, name)` when the declarator ends with a real identifier.
fn split_identifier(declarator: &str) -> Option<(&str, &str)> {
    let name_start = declarator
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_alphanumeric() || *c == '_')
        .last()
        .map(|(i, _)| i)?;

    let name = &declarator[name_start..];
    let ty = declarator[..name_start].trim_end();

    if name.starts_with(|c: char| c.is_ascii_digit()) || BUILTIN_TYPES.contains(&name) {
        return None;
    }

    let names_a_type = ty
        .split(|c: char| c.is_whitespace() || c == '*')
        .filter(|word| !word.is_empty())
        .any(|word| !QUALIFIERS.contains(&word));

    names_a_type.then_some((ty, name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &str) -> Vec<(String, String)> {
        parse_parameters(raw)
            .into_iter()
            .map(|p| (p.ty, p.name))
            .collect()
    }

    #[test]
    fn void_and_empty_lists() {
        assert!(parse_parameters("void").is_empty());
        assert!(parse_parameters("  ").is_empty());
    }

    #[test]
    fn named_parameters() {
        assert_eq!(
            pairs("GLenum target, GLuint buffer"),
            vec![
                ("GLenum".to_string(), "target".to_string()),
                ("GLuint".to_string(), "buffer".to_string()),
            ]
        );
    }

    #[test]
    fn pointer_to_pointer() {
        assert_eq!(
            pairs("GLuint shader, GLsizei count, const GLchar *const*string, const GLint *length"),
            vec![
                ("GLuint".to_string(), "shader".to_string()),
                ("GLsizei".to_string(), "count".to_string()),
                ("const GLchar *const*".to_string(), "string".to_string()),
                ("const GLint *".to_string(), "length".to_string()),
            ]
        );
    }

    #[test]
    fn abstract_declarators_get_placeholders() {
        assert_eq!(
            pairs("GLenum, const void *, const GLenum, unsigned int"),
            vec![
                ("GLenum".to_string(), "arg0".to_string()),
                ("const void *".to_string(), "arg1".to_string()),
                ("const GLenum".to_string(), "arg2".to_string()),
                ("unsigned int".to_string(), "arg3".to_string()),
            ]
        );
    }

    #[test]
    fn nested_commas_do_not_split() {
        let rendered: Vec<_> = parse_parameters("void (*callback)(int, float), GLint value")
            .iter()
            .map(Parameter::to_string)
            .collect();
        assert_eq!(rendered, ["void (*callback)(int, float)", "GLint value"]);
    }

    #[test]
    fn function_pointer_keeps_its_name() {
        let params =
            parse_parameters("void (APIENTRY *callback)(GLenum source, const void *userParam)");
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].ty, "void (APIENTRY *");
        assert_eq!(params[0].name, "callback");
        assert_eq!(params[0].suffix, ")(GLenum source, const void *userParam)");

        let params = parse_parameters("void ( * onDone )(int)");
        assert_eq!(params[0].name, "onDone");
        assert_eq!(params[0].to_string(), "void ( *onDone)(int)");
    }

    #[test]
    fn unnamed_function_pointer_gets_a_placeholder() {
        let params = parse_parameters("GLenum mode, void (*)(int)");
        assert_eq!(params[1].name, "arg1");
        assert_eq!(params[1].to_string(), "void (*arg1)(int)");
    }

    #[test]
    fn array_suffix_is_kept() {
        let params = parse_parameters("const GLfloat v[4]");
        assert_eq!(params[0].ty, "const GLfloat");
        assert_eq!(params[0].name, "v");
        assert_eq!(params[0].suffix, "[4]");
        assert_eq!(params[0].to_string(), "const GLfloat v[4]");
    }
}
