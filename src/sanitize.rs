//! Allow-list markup sanitization.
//!
//! This is the single trust boundary of the system: every piece of
//! author-controlled markup — rendered Markdown and pre-rendered `body_html`
//! alike — passes through [`sanitize_html`] before it may touch a page.
//! There is no conditional path around it.
//!
//! The input is parsed into a detached node tree, walked depth-first, and
//! re-serialized:
//!
//! - elements outside the tag allow-list are **unwrapped** — replaced by
//!   their children — so text survives while the wrapper does not; the walk
//!   continues into the relocated children. `script` and `style` are the
//!   exception: their payload is code, and they are removed outright;
//! - on kept elements, event-handler attributes (`on*`) and inline `style`
//!   are always dropped; everything else must be in the tag's attribute
//!   allow-list (only `a` allows any: `href`, `title`, `rel`, `target`);
//! - an `a[href]` survives only when it parses as an absolute or
//!   origin-relative URL with scheme `http`, `https`, or `mailto`;
//! - every surviving `a` is forced to `rel="noopener noreferrer"` and a
//!   non-empty `target` (default `_blank`), regardless of author input.
//!
//! The parser is a small tag-soup tokenizer, not an HTML5 tree-construction
//! algorithm: mismatched close tags are recovered by popping to the nearest
//! matching open element, unknown constructs degrade to text, and comments
//! are discarded. That is sufficient here because the output is reduced to
//! the allow-listed subset anyway.

use url::Url;

const ALLOWED_TAGS: &[&str] = &[
    "p",
    "br",
    "strong",
    "em",
    "ul",
    "ol",
    "li",
    "a",
    "h2",
    "h3",
    "h4",
    "blockquote",
    "code",
    "pre",
];

const LINK_ATTRS: &[&str] = &["href", "title", "rel", "target"];

/// Elements whose payload is raw text (code), dropped rather than unwrapped.
const RAW_TEXT_TAGS: &[&str] = &["script", "style"];

const VOID_TAGS: &[&str] = &[
    "br", "hr", "img", "input", "area", "base", "col", "embed", "link", "meta", "source", "track",
    "wbr",
];

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
struct Element {
    tag: String,
    attrs: Vec<(String, String)>,
    children: Vec<Node>,
}

/// Reduce arbitrary markup to the safe subset. Empty input yields an empty
/// string.
pub fn sanitize_html(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }
    let nodes = parse_fragment(input);
    let clean = sanitize_nodes(nodes);
    serialize(&clean)
}

// ============================================================================
// Sanitizing walk
// ============================================================================

fn sanitize_nodes(nodes: Vec<Node>) -> Vec<Node> {
    let mut out = Vec::new();
    for node in nodes {
        match node {
            Node::Text(text) => out.push(Node::Text(text)),
            Node::Element(mut element) => {
                if RAW_TEXT_TAGS.contains(&element.tag.as_str()) {
                    continue;
                }
                if !ALLOWED_TAGS.contains(&element.tag.as_str()) {
                    // Unwrap: the children take the element's place, and the
                    // walk continues into them.
                    out.extend(sanitize_nodes(element.children));
                    continue;
                }
                element.attrs = sanitize_attrs(&element.tag, element.attrs);
                if element.tag == "a" {
                    force_link_hardening(&mut element.attrs);
                }
                element.children = sanitize_nodes(std::mem::take(&mut element.children));
                out.push(Node::Element(element));
            }
        }
    }
    out
}

fn sanitize_attrs(tag: &str, attrs: Vec<(String, String)>) -> Vec<(String, String)> {
    let allowed: &[&str] = if tag == "a" { LINK_ATTRS } else { &[] };
    attrs
        .into_iter()
        .filter(|(name, value)| {
            if name.starts_with("on") || name == "style" {
                return false;
            }
            if !allowed.contains(&name.as_str()) {
                return false;
            }
            if tag == "a" && name == "href" {
                return is_safe_url(value);
            }
            true
        })
        .collect()
}

/// `rel` is always overwritten; `target` only when absent or empty. Closes
/// the reverse-tab-hijack hole for any externally linked content.
fn force_link_hardening(attrs: &mut Vec<(String, String)>) {
    attrs.retain(|(name, _)| name != "rel");
    attrs.push(("rel".to_string(), "noopener noreferrer".to_string()));
    match attrs.iter_mut().find(|(name, _)| name == "target") {
        Some((_, value)) if value.is_empty() => *value = "_blank".to_string(),
        Some(_) => {}
        None => attrs.push(("target".to_string(), "_blank".to_string())),
    }
}

/// Absolute or origin-relative URL with an allowed scheme. Origin-relative
/// values are resolved the way a browser would resolve them against the page
/// origin; the placeholder host never appears in output — the original value
/// is kept verbatim.
fn is_safe_url(value: &str) -> bool {
    if value.is_empty() {
        return false;
    }
    match Url::parse(value) {
        Ok(url) => matches!(url.scheme(), "http" | "https" | "mailto"),
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse("https://origin.invalid/")
            .and_then(|base| base.join(value))
            .is_ok_and(|url| matches!(url.scheme(), "http" | "https")),
        Err(_) => false,
    }
}

// ============================================================================
// Parsing: tag-soup tokenizer + tree builder
// ============================================================================

fn parse_fragment(input: &str) -> Vec<Node> {
    let mut root: Vec<Node> = Vec::new();
    let mut stack: Vec<Element> = Vec::new();
    let mut pos = 0;

    while pos < input.len() {
        let rest = &input[pos..];
        let Some(lt) = rest.find('<') else {
            append(&mut root, &mut stack, Node::Text(decode_entities(rest)));
            break;
        };
        if lt > 0 {
            append(
                &mut root,
                &mut stack,
                Node::Text(decode_entities(&rest[..lt])),
            );
            pos += lt;
        }
        let rest = &input[pos..];

        if rest.starts_with("<!--") {
            pos += rest.find("-->").map(|end| end + 3).unwrap_or(rest.len());
        } else if rest.starts_with("<!") || rest.starts_with("<?") {
            // Doctype, CDATA, processing instruction: discard to the '>'.
            pos += rest.find('>').map(|gt| gt + 1).unwrap_or(rest.len());
        } else if let Some(close) = rest.strip_prefix("</") {
            match close.find('>') {
                Some(gt) => {
                    let name = close[..gt].trim().to_ascii_lowercase();
                    close_element(&mut root, &mut stack, &name);
                    pos += 2 + gt + 1;
                }
                // Dangling "</..." at end of input: discard.
                None => break,
            }
        } else if rest[1..].starts_with(|c: char| c.is_ascii_alphabetic()) {
            let (element, consumed, self_closed) = parse_open_tag(rest);
            pos += consumed;
            let tag = element.tag.clone();
            if RAW_TEXT_TAGS.contains(&tag.as_str()) && !self_closed {
                // Raw-text payload: skip to the matching close tag. The
                // payload is dropped on the floor — these elements never
                // survive sanitization anyway.
                let close_marker = format!("</{tag}");
                let hay = input[pos..].to_ascii_lowercase();
                match hay.find(&close_marker) {
                    Some(idx) => {
                        let close_at = pos + idx;
                        pos = input[close_at..]
                            .find('>')
                            .map(|gt| close_at + gt + 1)
                            .unwrap_or(input.len());
                    }
                    None => pos = input.len(),
                }
                append(&mut root, &mut stack, Node::Element(element));
            } else if self_closed || VOID_TAGS.contains(&tag.as_str()) {
                append(&mut root, &mut stack, Node::Element(element));
            } else {
                stack.push(element);
            }
        } else {
            // A '<' that opens no tag is literal text.
            append(&mut root, &mut stack, Node::Text("<".to_string()));
            pos += 1;
        }
    }

    // Close everything still open at end of input.
    while let Some(element) = stack.pop() {
        append(&mut root, &mut stack, Node::Element(element));
    }
    root
}

fn append(root: &mut Vec<Node>, stack: &mut Vec<Element>, node: Node) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => root.push(node),
    }
}

/// Pop to the nearest matching open element; a close tag with no matching
/// open element is ignored.
fn close_element(root: &mut Vec<Node>, stack: &mut Vec<Element>, name: &str) {
    let Some(open_idx) = stack.iter().rposition(|el| el.tag == name) else {
        return;
    };
    while stack.len() > open_idx {
        if let Some(element) = stack.pop() {
            append(root, stack, Node::Element(element));
        }
    }
}

/// Parse one open tag starting at `<letter`. Returns the element (childless),
/// the bytes consumed, and whether it was self-closing.
fn parse_open_tag(input: &str) -> (Element, usize, bool) {
    let name_end = scan(input, 1, |c| c.is_ascii_alphanumeric());
    let tag = input[1..name_end].to_ascii_lowercase();
    let mut attrs: Vec<(String, String)> = Vec::new();
    let mut pos = name_end;
    let mut self_closed = false;

    loop {
        pos = scan(input, pos, |c| c.is_whitespace());
        let Some(c) = input[pos..].chars().next() else {
            break;
        };
        if c == '>' {
            pos += 1;
            break;
        }
        if c == '/' {
            if input[pos..].starts_with("/>") {
                self_closed = true;
                pos += 2;
                break;
            }
            pos += 1;
            continue;
        }
        // Attribute name, optionally followed by a value.
        let name_start = pos;
        pos = scan(input, pos, |c| {
            !c.is_whitespace() && c != '=' && c != '>' && c != '/'
        });
        if pos == name_start {
            // Not a name character; skip it.
            pos += c.len_utf8();
            continue;
        }
        let name = input[name_start..pos].to_ascii_lowercase();
        pos = scan(input, pos, |c| c.is_whitespace());
        let mut value = String::new();
        if input[pos..].starts_with('=') {
            pos = scan(input, pos + 1, |c| c.is_whitespace());
            match input[pos..].chars().next() {
                Some(quote @ ('"' | '\'')) => {
                    let value_start = pos + 1;
                    match input[value_start..].find(quote) {
                        Some(end) => {
                            value = decode_entities(&input[value_start..value_start + end]);
                            pos = value_start + end + 1;
                        }
                        None => {
                            value = decode_entities(&input[value_start..]);
                            pos = input.len();
                        }
                    }
                }
                _ => {
                    let value_start = pos;
                    pos = scan(input, pos, |c| !c.is_whitespace() && c != '>');
                    value = decode_entities(&input[value_start..pos]);
                }
            }
        }
        attrs.push((name, value));
    }

    (
        Element {
            tag,
            attrs,
            children: Vec::new(),
        },
        pos,
        self_closed,
    )
}

/// First position at or after `from` whose character fails `pred`.
fn scan(input: &str, from: usize, pred: impl Fn(char) -> bool) -> usize {
    input[from..]
        .char_indices()
        .find(|(_, c)| !pred(*c))
        .map(|(idx, _)| from + idx)
        .unwrap_or(input.len())
}

// ============================================================================
// Entities and serialization
// ============================================================================

const ENTITIES: &[(&str, &str)] = &[
    ("&amp;", "&"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&apos;", "'"),
];

fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        match ENTITIES.iter().find(|(entity, _)| rest.starts_with(entity)) {
            Some((entity, plain)) => {
                out.push_str(plain);
                rest = &rest[entity.len()..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(text: &str) -> String {
    escape_text(text).replace('"', "&quot;")
}

fn serialize(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        write_node(&mut out, node);
    }
    out
}

fn write_node(out: &mut String, node: &Node) {
    match node {
        Node::Text(text) => out.push_str(&escape_text(text)),
        Node::Element(element) => {
            out.push('<');
            out.push_str(&element.tag);
            for (name, value) in &element.attrs {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                out.push_str(&escape_attr(value));
                out.push('"');
            }
            out.push('>');
            if !VOID_TAGS.contains(&element.tag.as_str()) {
                for child in &element.children {
                    write_node(out, child);
                }
                out.push_str("</");
                out.push_str(&element.tag);
                out.push('>');
            }
        }
    }
}
