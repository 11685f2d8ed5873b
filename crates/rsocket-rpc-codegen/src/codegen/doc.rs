//! Documentation comment escaping
//!
//! Free-form schema comments end up inside generated `/** ... */` blocks.
//! Anything that could close the block early, start a doc tag, read as HTML
//! or form a Unicode escape is replaced by a numeric entity.

/// Escape text for use inside a doc comment
#[must_use]
pub fn escape_doc(input: &str) -> String {
    let mut out = String::with_capacity(input.len() * 2);
    let mut prev = '*';

    for ch in input.chars() {
        match ch {
            // "/*"
            '*' if prev == '/' => out.push_str("&#42;"),
            // "*/"
            '/' if prev == '*' => out.push_str("&#47;"),
            '@' => out.push_str("&#64;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '\\' => out.push_str("&#92;"),
            _ => out.push(ch),
        }
        prev = ch;
    }

    out
}

/// Escape a comment and split it into lines
///
/// Runs of newlines collapse; there are never empty lines at the end.
#[must_use]
pub fn doc_lines(comment: &str) -> Vec<String> {
    let mut lines: Vec<String> = escape_doc(comment)
        .split('\n')
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    while lines.last().is_some_and(|line| line.trim().is_empty()) {
        lines.pop();
    }
    lines
}

/// Body lines of a doc comment, without the opening and closing markers
///
/// A line starting with `/` gets a separating space so it cannot close the
/// comment together with the leading `*`.
#[must_use]
pub fn doc_comment_body(lines: &[String], pre: bool) -> Vec<String> {
    if lines.is_empty() {
        return Vec::new();
    }

    let mut body = Vec::with_capacity(lines.len() + 2);
    if pre {
        body.push(" * <pre>".to_string());
    }
    for line in lines {
        if line.starts_with('/') {
            body.push(format!(" * {line}"));
        } else {
            body.push(format!(" *{line}"));
        }
    }
    if pre {
        body.push(" * </pre>".to_string());
    }
    body
}

/// Doc comment body for an optional descriptor comment, wrapped in `<pre>`
#[must_use]
pub fn descriptor_doc(comment: Option<&str>) -> Vec<String> {
    comment.map_or_else(Vec::new, |text| doc_comment_body(&doc_lines(text), true))
}
