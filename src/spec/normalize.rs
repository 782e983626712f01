//! Rewrite inline shorthand into canonical multi-line form.
//!
//! A top-level line such as `tool_node => call_model` declares the node and
//! its transition at once. The parser only understands the split form:
//!
//! ```text
//! tool_node
//!   => call_model
//! ```

pub const ARROW: &str = "=>";

/// Split every unindented `lhs => rhs` line into `lhs` and `  => rhs`.
///
/// Indented lines, `#` comments, and lines that already start with the
/// arrow pass through unchanged. Only the first arrow splits the line.
pub fn normalize(text: &str) -> String {
    text.lines()
        .flat_map(normalize_line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Normalize one source line into one or two canonical lines.
pub fn normalize_line(line: &str) -> Vec<String> {
    let indented = line.starts_with(char::is_whitespace);
    let comment = line.trim_start().starts_with('#');
    match line.split_once(ARROW) {
        Some((lhs, rhs)) if !indented && !comment && !line.starts_with(ARROW) => {
            vec![lhs.trim().to_string(), format!("  {} {}", ARROW, rhs.trim())]
        }
        _ => vec![line.to_string()],
    }
}
