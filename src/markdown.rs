//! Restricted Markdown to markup.
//!
//! Author-supplied body text uses a deliberately small dialect, converted in
//! a single line-oriented pass with no backtracking:
//!
//! - blank line — closes the open paragraph and the open list;
//! - `![...` — image lines are dropped (images travel as structured manifest
//!   fields, never inline);
//! - `# ` / `## ` / `### ` — headings, demoted one level (`<h2>`–`<h4>`;
//!   `<h1>` is reserved for the page title outside the body);
//! - `- ` / `* ` — items of a flat list (no nesting);
//! - anything else — a paragraph line; lines of one paragraph are joined
//!   with single spaces.
//!
//! Inline spans are rewritten in fixed order — escape, `**bold**`, `*italic*`,
//! `` `code` ``, `[text](url)` — with minimal matching. The order matters:
//! escaping must come first so later spans never re-escape produced markup,
//! and bold must resolve before italic so `**` is unambiguous.
//!
//! The output is UNTRUSTED. It must pass through [`crate::sanitize`] before
//! reaching a page; this module performs no sanitization of its own.

/// Convert the restricted dialect to block markup, concatenated in source
/// order. Empty input produces an empty string.
pub fn render_markdown(input: &str) -> String {
    let input = input.replace('\r', "");
    let mut blocks: Vec<String> = Vec::new();
    let mut paragraph: Vec<&str> = Vec::new();
    let mut list_items: Vec<&str> = Vec::new();

    for raw_line in input.split('\n') {
        let line = raw_line.trim();
        if line.is_empty() {
            flush_paragraph(&mut blocks, &mut paragraph);
            flush_list(&mut blocks, &mut list_items);
            continue;
        }
        if line.starts_with("![") {
            continue;
        }
        if let Some(heading) = line
            .strip_prefix("### ")
            .map(|text| (4, text))
            .or_else(|| line.strip_prefix("## ").map(|text| (3, text)))
            .or_else(|| line.strip_prefix("# ").map(|text| (2, text)))
        {
            flush_paragraph(&mut blocks, &mut paragraph);
            flush_list(&mut blocks, &mut list_items);
            let (level, text) = heading;
            blocks.push(format!("<h{level}>{}</h{level}>", render_inline(text)));
            continue;
        }
        if let Some(item) = line
            .strip_prefix("- ")
            .or_else(|| line.strip_prefix("* "))
        {
            flush_paragraph(&mut blocks, &mut paragraph);
            list_items.push(item);
            continue;
        }
        paragraph.push(line);
    }
    flush_paragraph(&mut blocks, &mut paragraph);
    flush_list(&mut blocks, &mut list_items);

    blocks.concat()
}

fn flush_paragraph(blocks: &mut Vec<String>, paragraph: &mut Vec<&str>) {
    if !paragraph.is_empty() {
        blocks.push(format!("<p>{}</p>", render_inline(&paragraph.join(" "))));
        paragraph.clear();
    }
}

fn flush_list(blocks: &mut Vec<String>, list_items: &mut Vec<&str>) {
    if !list_items.is_empty() {
        let items: String = list_items
            .iter()
            .map(|item| format!("<li>{}</li>", render_inline(item)))
            .collect();
        blocks.push(format!("<ul>{items}</ul>"));
        list_items.clear();
    }
}

/// Inline span rewriting for one block's text.
fn render_inline(text: &str) -> String {
    let output = escape_html(text);
    let output = replace_span(&output, "**", |inner| format!("<strong>{inner}</strong>"));
    let output = replace_span(&output, "*", |inner| format!("<em>{inner}</em>"));
    let output = replace_span(&output, "`", |inner| format!("<code>{inner}</code>"));
    replace_links(&output)
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Replace minimal `delim…delim` spans (at least one character of content).
/// An unpaired delimiter stays literal.
fn replace_span(input: &str, delim: &str, wrap: impl Fn(&str) -> String) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(open) = rest.find(delim) {
        let after = open + delim.len();
        let close = rest[after..]
            .match_indices(delim)
            .find(|(idx, _)| *idx >= 1)
            .map(|(idx, _)| idx);
        match close {
            Some(rel) => {
                out.push_str(&rest[..open]);
                out.push_str(&wrap(&rest[after..after + rel]));
                rest = &rest[after + rel + delim.len()..];
            }
            None => {
                out.push_str(&rest[..after]);
                rest = &rest[after..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Rewrite `[text](url)` spans; text may not contain `]`, url may not
/// contain `)`, and both must be non-empty.
fn replace_links(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find('[') {
        match parse_link(&rest[start..]) {
            Some((text, href, consumed)) => {
                out.push_str(&rest[..start]);
                out.push_str(&format!("<a href=\"{href}\">{text}</a>"));
                rest = &rest[start + consumed..];
            }
            None => {
                out.push_str(&rest[..=start]);
                rest = &rest[start + 1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Parse a link at the start of `input` (which begins with `[`). Returns
/// `(text, href, bytes consumed)`.
fn parse_link(input: &str) -> Option<(&str, &str, usize)> {
    let rb = input.find(']')?;
    let text = &input[1..rb];
    if text.is_empty() {
        return None;
    }
    let after = &input[rb + 1..];
    if !after.starts_with('(') {
        return None;
    }
    let cp = after.find(')')?;
    let href = &after[1..cp];
    if href.is_empty() {
        return None;
    }
    Some((text, href, rb + 1 + cp + 1))
}
