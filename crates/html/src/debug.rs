use crate::Node;
use crate::document::{Document, DomError};
use crate::types::NodeKey;

const INDENT_STEP: &str = "  ";
const PREVIEW_CHARS: usize = 40;

fn push_preview(out: &mut String, s: &str) {
    let mut truncated = false;
    for (i, ch) in s.chars().enumerate() {
        if i == PREVIEW_CHARS {
            truncated = true;
            break;
        }
        out.push(if ch == '\n' { ' ' } else { ch });
    }
    if truncated {
        out.push('…');
    }
}

fn push_attributes(line: &mut String, attributes: &[(String, Option<String>)]) {
    for (name, value) in attributes {
        line.push(' ');
        line.push_str(name);
        if let Some(value) = value {
            line.push_str("=\"");
            line.push_str(value);
            line.push('"');
        }
    }
}

/// Deterministic, indented outline of a materialized tree. Shadow roots are
/// listed as `#shadow-root` directly under their host, before light children.
/// Whitespace-only text is skipped. At most `cap` nodes are emitted.
pub fn outline_from_dom(root: &Node, cap: usize) -> Vec<String> {
    fn walk(node: &Node, indent: &mut String, out: &mut Vec<String>, left: &mut usize) {
        if *left == 0 {
            return;
        }
        *left -= 1;
        let mut line = String::with_capacity(indent.len() + 48);
        line.push_str(indent);
        match node {
            Node::Document { .. } => line.push_str("#document"),
            Node::ShadowRoot { .. } => line.push_str("#shadow-root"),
            Node::Element {
                name, attributes, ..
            } => {
                line.push('<');
                line.push_str(name);
                push_attributes(&mut line, attributes);
                line.push('>');
            }
            Node::Text { text, .. } => {
                let t = text.trim();
                if t.is_empty() {
                    return;
                }
                line.push('"');
                push_preview(&mut line, t);
                line.push('"');
            }
            Node::Comment { text, .. } => {
                line.push_str("<!-- ");
                push_preview(&mut line, text);
                line.push_str(" -->");
            }
        }
        out.push(line);

        indent.push_str(INDENT_STEP);
        if let Node::Element {
            shadow: Some(shadow),
            ..
        } = node
        {
            walk(shadow, indent, out, left);
        }
        for child in node.children() {
            walk(child, indent, out, left);
        }
        indent.truncate(indent.len() - INDENT_STEP.len());
    }

    let mut out = Vec::new();
    let mut indent = String::new();
    let mut left = cap;
    walk(root, &mut indent, &mut out, &mut left);
    out
}

/// Outline of the subtree rooted at `key`, without a node cap.
pub fn outline(doc: &Document, key: NodeKey) -> Result<Vec<String>, DomError> {
    let node = doc.materialize(key)?;
    Ok(outline_from_dom(&node, usize::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outline_lists_shadow_before_light_children() {
        let mut doc = Document::new();
        let host = doc.create_element("improved-print");
        doc.append_child(doc.root(), host).unwrap();
        let shadow = doc.attach_shadow(host).unwrap();
        let slot = doc.create_element("slot");
        doc.append_child(shadow, slot).unwrap();
        let a = doc.create_element_with_attrs("a", &[("href", "https://a.example")]);
        doc.append_child(host, a).unwrap();
        doc.append_text(a, "  A\n").unwrap();
        doc.toggle_attr(a, "hidden", true).unwrap();

        assert_eq!(
            outline(&doc, doc.root()).unwrap(),
            vec![
                "#document",
                "  <improved-print>",
                "    #shadow-root",
                "      <slot>",
                "    <a href=\"https://a.example\" hidden>",
                "      \"A\"",
            ]
        );
    }

    #[test]
    fn long_text_is_truncated() {
        let mut doc = Document::new();
        let p = doc.create_element("p");
        doc.append_text(p, &"x".repeat(50)).unwrap();
        let lines = outline(&doc, p).unwrap();
        assert_eq!(lines[1], format!("  \"{}…\"", "x".repeat(40)));
    }
}
