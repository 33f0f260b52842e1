//! Text builders for emitted code
//!
//! Every fragment is a sequence of complete lines, each terminated by `\n`.
//! Builders never mutate their input; larger constructs are assembled from
//! smaller ones bottom-up.

/// One indentation level
pub const INDENT: &str = "    ";

/// Indent every non-blank line by `levels`; blank lines stay empty
pub fn indent(text: &str, levels: usize) -> String {
    let prefix = INDENT.repeat(levels);
    text.lines()
        .map(|line| {
            if line.trim().is_empty() {
                "\n".to_string()
            } else {
                format!("{}{}\n", prefix, line)
            }
        })
        .collect()
}

/// Terminate each item with a newline
pub fn lines<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .map(|line| format!("{}\n", line.as_ref()))
        .collect()
}

/// A braced block: `header`, then `body` indented one level
pub fn block(header: &str, body: &str) -> String {
    format!("{}\n{{\n{}}}\n", header, indent(body, 1))
}

/// Same as [`block`] with a trailing `;` after the closing brace
pub fn statement_block(header: &str, body: &str) -> String {
    format!("{}\n{{\n{}}});\n", header, indent(body, 1))
}

/// Join non-empty fragments with one blank line between them
pub fn sections<I, S>(parts: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    parts
        .into_iter()
        .filter(|part| !part.as_ref().is_empty())
        .map(|part| part.as_ref().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Comma-separated list
pub fn comma_list<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .map(|item| item.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Precondition rejecting a null argument
pub fn null_check(parameter: &str) -> String {
    format!(
        "if ({p} == null) throw new ArgumentNullException(nameof({p}));",
        p = parameter
    )
}
