//! Lenient CSV tokenizer.
//!
//! Two passes: [`split_lines`] breaks the blob into logical lines while
//! honoring quoted newlines, and [`split_fields`] splits one line on unquoted
//! commas. Quotes are kept in the line output so the field pass can apply the
//! `""` escape. Unclosed quotes consume to end of input.

const BOM: char = '\u{feff}';

/// Split raw CSV text into logical lines.
///
/// Carriage returns outside quotes are dropped. A trailing whitespace-only
/// line is discarded; every other line is kept, including blank ones.
pub fn split_lines(text: &str) -> Vec<String> {
    let text = text.strip_prefix(BOM).unwrap_or(text);

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                if in_quotes && chars.peek() == Some(&'"') {
                    chars.next();
                    current.push_str("\"\"");
                } else {
                    in_quotes = !in_quotes;
                    current.push(c);
                }
            }
            '\n' if !in_quotes => {
                lines.push(std::mem::take(&mut current));
            }
            '\r' if !in_quotes => {}
            _ => current.push(c),
        }
    }

    if !current.trim().is_empty() {
        lines.push(current);
    }

    lines
}

/// Split one logical line on unquoted commas, unescaping `""` inside quotes.
/// Fields are returned untrimmed.
pub fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                if in_quotes && chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = !in_quotes;
                }
            }
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    fields.push(current);

    fields
}

/// Tokenize a whole blob into rows of fields.
pub fn tokenize(text: &str) -> Vec<Vec<String>> {
    split_lines(text).iter().map(|l| split_fields(l)).collect()
}

/// Quote a field the way the tokenizer expects to read it back.
pub fn escape_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
