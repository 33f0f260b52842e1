//! Naming utilities for code generation

use heck::{ToLowerCamelCase, ToPascalCase};

/// Convert a table or column name to a type/member name (PascalCase)
pub fn to_member_name(name: &str) -> String {
    name.to_pascal_case()
}

/// Name of the dependency map that resolves keys to instances of `class_name`
/// e.g., "Outlet" -> "outlets", "Category" -> "categories"
pub fn to_dependency_name(class_name: &str) -> String {
    escape_identifier(&pluralize(&class_name.to_lower_camel_case()))
}

/// Private field backing a constructor parameter
/// e.g., "outlets" -> "_outlets", "@event" -> "_event"
pub fn to_field_name(parameter: &str) -> String {
    format!("_{}", parameter.trim_start_matches('@'))
}

/// Pluralize a word using English grammar rules
///
/// Only the trailing word of a camelCase identifier is inflected.
pub fn pluralize(word: &str) -> String {
    if word.is_empty() {
        return word.to_string();
    }

    // Irregular plurals (common in database contexts)
    let irregulars: &[(&str, &str)] = &[
        ("person", "people"),
        ("Person", "People"),
        ("child", "children"),
        ("Child", "Children"),
        ("man", "men"),
        ("woman", "women"),
        ("mouse", "mice"),
        ("index", "indices"),
        ("Index", "Indices"),
    ];

    for (singular, plural) in irregulars {
        if let Some(stem) = word.strip_suffix(singular) {
            if word == *singular || !singular.starts_with(char::is_lowercase) {
                return format!("{}{}", stem, plural);
            }
        }
    }

    // Words ending in -is → -es (analysis → analyses, basis → bases)
    if word.ends_with("is") && word.len() > 2 {
        return format!("{}es", &word[..word.len() - 2]);
    }

    // Words ending in -f or -fe → -ves (leaf → leaves, knife → knives)
    if let Some(stripped) = word.strip_suffix("fe") {
        return format!("{}ves", stripped);
    }
    let f_to_ves: &[&str] = &["leaf", "shelf", "half", "calf", "loaf", "thief"];
    for &fword in f_to_ves {
        if word.to_lowercase().ends_with(fword) {
            return format!("{}ves", &word[..word.len() - 1]);
        }
    }

    // Words ending in -o: some take -es
    let o_to_oes: &[&str] = &["hero", "potato", "tomato", "echo", "veto"];
    for &oword in o_to_oes {
        if word.to_lowercase().ends_with(oword) {
            return format!("{}es", word);
        }
    }

    // Standard rules: -s, -x, -z, -ch, -sh → add -es
    if word.ends_with('s')
        || word.ends_with('x')
        || word.ends_with('z')
        || word.ends_with("ch")
        || word.ends_with("sh")
    {
        return format!("{}es", word);
    }

    // Words ending in consonant + y → -ies
    if word.ends_with('y') && word.len() > 1 {
        let before_y = word.chars().rev().nth(1).unwrap_or('_');
        if !"aeiouAEIOU".contains(before_y) {
            return format!("{}ies", &word[..word.len() - 1]);
        }
    }

    // Default: just add -s
    format!("{}s", word)
}

/// Check if a name is a C# reserved keyword
pub fn is_csharp_keyword(name: &str) -> bool {
    matches!(
        name,
        "abstract"
            | "as"
            | "base"
            | "bool"
            | "break"
            | "byte"
            | "case"
            | "catch"
            | "char"
            | "checked"
            | "class"
            | "const"
            | "continue"
            | "decimal"
            | "default"
            | "delegate"
            | "do"
            | "double"
            | "else"
            | "enum"
            | "event"
            | "explicit"
            | "extern"
            | "false"
            | "finally"
            | "fixed"
            | "float"
            | "for"
            | "foreach"
            | "goto"
            | "if"
            | "implicit"
            | "in"
            | "int"
            | "interface"
            | "internal"
            | "is"
            | "lock"
            | "long"
            | "namespace"
            | "new"
            | "null"
            | "object"
            | "operator"
            | "out"
            | "override"
            | "params"
            | "private"
            | "protected"
            | "public"
            | "readonly"
            | "ref"
            | "return"
            | "sbyte"
            | "sealed"
            | "short"
            | "sizeof"
            | "stackalloc"
            | "static"
            | "string"
            | "struct"
            | "switch"
            | "this"
            | "throw"
            | "true"
            | "try"
            | "typeof"
            | "uint"
            | "ulong"
            | "unchecked"
            | "unsafe"
            | "ushort"
            | "using"
            | "virtual"
            | "void"
            | "volatile"
            | "while"
    )
}

/// Escape an identifier with `@` if it's a C# keyword
pub fn escape_identifier(name: &str) -> String {
    if is_csharp_keyword(name) {
        format!("@{}", name)
    } else {
        name.to_string()
    }
}
