use crate::project::Element;
use crate::project::VisualNode;

const VOID_TAGS: &[&str] = &["br", "hr", "img", "input"];

pub fn escape_text(s: &str, out: &mut String) {
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

pub fn escape_attr(s: &str, out: &mut String) {
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
}

pub fn push_nodes(nodes: &[VisualNode], out: &mut String) {
    for node in nodes {
        push_node(node, out);
    }
}

pub fn push_node(node: &VisualNode, out: &mut String) {
    match node {
        VisualNode::Text(t) => escape_text(t, out),
        VisualNode::Raw(raw) => out.push_str(raw),
        VisualNode::Element(el) => push_element(el, out),
    }
}

fn push_element(el: &Element, out: &mut String) {
    out.push('<');
    out.push_str(el.tag);
    if !el.classes.is_empty() {
        out.push_str(" class=\"");
        escape_attr(&el.classes.join(" "), out);
        out.push('"');
    }
    for (name, value) in &el.attrs {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        escape_attr(value, out);
        out.push('"');
    }
    out.push('>');
    if VOID_TAGS.contains(&el.tag) {
        return;
    }
    push_nodes(&el.children, out);
    out.push_str("</");
    out.push_str(el.tag);
    out.push('>');
}

/// Visible text of a raw HTML fragment: tags removed, `<style>` and `<script>` bodies dropped,
/// common entities decoded and whitespace collapsed. A `<` not followed by a tag name, `/`, `!`
/// or `?` is kept as text.
pub fn raw_to_text(html: &str) -> String {
    let mut out = String::new();
    let mut rest = html;
    while let Some(lt) = rest.find('<') {
        out.push_str(&rest[..lt]);
        let tail = &rest[lt..];
        let opens_tag = tail[1..]
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || matches!(c, '/' | '!' | '?'));
        if !opens_tag {
            out.push('<');
            rest = &tail[1..];
            continue;
        }
        let Some(gt) = tail.find('>') else {
            rest = "";
            break;
        };
        let tag = tail[1..gt].trim().to_ascii_lowercase();
        rest = &tail[gt + 1..];
        for hidden in ["style", "script"] {
            if tag == hidden || tag.starts_with(&format!("{hidden} ")) {
                let close = format!("</{hidden}");
                rest = match rest.to_ascii_lowercase().find(&close) {
                    Some(end) => {
                        let after = &rest[end..];
                        after.find('>').map(|i| &after[i + 1..]).unwrap_or("")
                    }
                    None => "",
                };
            }
        }
    }
    out.push_str(rest);
    collapse_whitespace(&decode_entities(&out))
}

fn decode_entities(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
