use crate::compiler::lexer::Position;

#[inline]
pub fn is_alphabetic(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_uppercase()
}

#[inline]
pub fn is_numeric(c: char) -> bool {
    c.is_ascii_digit()
}

#[inline]
pub fn is_alphanumeric(c: char) -> bool {
    is_alphabetic(c) || is_numeric(c) || c == '_'
}

/// Renders the lines of `text` covered by `start..end`, each followed by a line of
/// carets under the covered columns.
///
/// Tabs are rendered as single spaces so that the carets stay aligned.
pub fn string_with_arrows(text: &str, start: &Position, end: &Position) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let last_line = end.line.max(start.line);

    let mut rendered = Vec::new();

    for line_index in start.line..=last_line {
        let line = lines.get(line_index).copied().unwrap_or("");
        let width = line.chars().count();

        let column_start = if line_index == start.line { start.column.min(width) } else { 0 };
        let column_end = if line_index == last_line { end.column } else { width };
        let arrows = column_end.saturating_sub(column_start).max(1);

        rendered.push(format!("{}\n{}{}", line.replace('\t', " "), " ".repeat(column_start), "^".repeat(arrows)));
    }

    rendered.join("\n")
}

/// `1` -> `1st`, `2` -> `2nd`, `11` -> `11th`, ...
pub fn ordinal(n: usize) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };

    format!("{}{}", n, suffix)
}
