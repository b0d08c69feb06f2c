//! Renders single fields as YAML lines for the line patcher.

use serde_yaml::Value;

/// Column limit for rewritten explanation blocks.
pub const WRAP_WIDTH: usize = 60;

const BLOCK_INDENT: &str = "  ";

/// Words YAML 1.1 readers resolve to booleans or null.
const YAML11_WORDS: [&str; 10] = [
    "y", "n", "yes", "no", "on", "off", "true", "false", "null", "~",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    /// Free text that is line-wrapped into a folded block when long.
    Wrapped(&'a str),
    Integer(u32),
    Flag(bool),
    List(&'a [String]),
}

/// Lines (without line endings) that encode `key: value`.
pub fn field_lines(key: &str, value: &FieldValue<'_>) -> Vec<String> {
    match value {
        FieldValue::Text(text) => vec![format!("{key}: {}", scalar(text))],
        FieldValue::Wrapped(text) => wrapped_lines(key, text),
        FieldValue::Integer(n) => vec![format!("{key}: {n}")],
        FieldValue::Flag(b) => vec![format!("{key}: {b}")],
        FieldValue::List(items) if items.is_empty() => vec![format!("{key}: []")],
        FieldValue::List(items) => {
            let mut lines = Vec::with_capacity(items.len() + 1);
            lines.push(format!("{key}:"));
            lines.extend(items.iter().map(|item| format!("- {}", scalar(item))));
            lines
        }
    }
}

/// A one-line scalar: plain when it reads back unchanged, double-quoted otherwise.
pub fn scalar(text: &str) -> String {
    if is_plain_safe(text) {
        text.to_string()
    } else {
        double_quoted(text)
    }
}

fn is_plain_safe(text: &str) -> bool {
    if text.is_empty() || text.trim() != text || text.chars().any(char::is_control) {
        return false;
    }
    if text.starts_with([
        '-', '?', ':', ',', '[', ']', '{', '}', '#', '&', '*', '!', '|', '>', '\'', '"', '%', '@',
        '`',
    ]) {
        return false;
    }
    if text.contains(": ") || text.contains(" #") || text.ends_with(':') {
        return false;
    }
    if YAML11_WORDS.iter().any(|w| text.eq_ignore_ascii_case(w)) || looks_numeric(text) {
        return false;
    }
    matches!(serde_yaml::from_str::<Value>(text), Ok(Value::String(ref parsed)) if parsed == text)
}

/// Digit-led text that a YAML 1.1 reader may take for a number
/// (`1_000`, `0x1F`, `1:30`, `1e3`).
fn looks_numeric(text: &str) -> bool {
    let digits = text.trim_start_matches(['+', '-', '.']);
    digits.starts_with(|c: char| c.is_ascii_digit())
        && digits
            .chars()
            .all(|c| c.is_ascii_hexdigit() || "xXoO_:.+-".contains(c))
}

fn double_quoted(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn wrapped_lines(key: &str, text: &str) -> Vec<String> {
    if text.chars().count() <= WRAP_WIDTH && !text.contains('\n') {
        return vec![format!("{key}: {}", scalar(text))];
    }
    match folded_body(text) {
        Some(body) => {
            let mut lines = Vec::with_capacity(body.len() + 1);
            lines.push(format!("{key}: >-"));
            lines.extend(body.into_iter().map(|line| {
                if line.is_empty() {
                    line
                } else {
                    format!("{BLOCK_INDENT}{line}")
                }
            }));
            if reads_back(key, &lines, text) {
                lines
            } else {
                vec![format!("{key}: {}", double_quoted(text))]
            }
        }
        None => vec![format!("{key}: {}", double_quoted(text))],
    }
}

/// Unindented folded-block content for `text`, or `None` when folding
/// cannot reproduce it (stray spaces, tabs, leading or trailing newlines).
fn folded_body(text: &str) -> Option<Vec<String>> {
    if text.is_empty() || text.starts_with('\n') || text.ends_with('\n') {
        return None;
    }
    let mut lines = Vec::new();
    for (i, paragraph) in text.split('\n').enumerate() {
        // a blank line in a folded block stands for one newline
        if i > 0 {
            lines.push(String::new());
        }
        if paragraph.is_empty() {
            continue;
        }
        if paragraph.trim() != paragraph
            || paragraph.contains("  ")
            || paragraph.chars().any(char::is_control)
        {
            return None;
        }
        lines.extend(wrap(paragraph, WRAP_WIDTH));
    }
    Some(lines)
}

fn reads_back(key: &str, lines: &[String], expected: &str) -> bool {
    let doc = lines.join("\n");
    match serde_yaml::from_str::<serde_yaml::Mapping>(&doc) {
        Ok(map) => map.get(key).and_then(Value::as_str) == Some(expected),
        Err(_) => false,
    }
}

/// Greedy word wrap on single spaces. Words wider than `width` get their own line.
pub fn wrap(paragraph: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;
    for word in paragraph.split(' ') {
        let word_len = word.chars().count();
        if current_len > 0 && current_len + 1 + word_len > width {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
