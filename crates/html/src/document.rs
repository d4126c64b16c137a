//! Arena-backed mutable document.
//!
//! Invariants:
//! - `NodeKey(n)` addresses `nodes[n - 1]`; `NodeKey::INVALID` is never handed out.
//! - Nodes are never freed. `remove` detaches a subtree; its keys stay valid and
//!   the subtree can be inspected or re-appended.
//! - A node has at most one parent; operations must not create cycles.
//! - A shadow root is owned by its host through `shadow`, not through
//!   `children`, so light-tree traversal never enters it.
//! - Element and attribute names are stored ASCII-lowercase; attribute order is
//!   preserved.

use crate::selector::SelectorList;
use crate::types::{Node, NodeKey};
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DomError {
    MissingKey(NodeKey),
    WrongNodeKind(NodeKey),
    InvalidParent(NodeKey),
    AlreadyParented(NodeKey),
    CycleDetected { parent: NodeKey, child: NodeKey },
    ShadowAlreadyAttached(NodeKey),
}

impl fmt::Display for DomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomError::MissingKey(key) => write!(f, "no node with key {}", key.0),
            DomError::WrongNodeKind(key) => write!(f, "node {} has the wrong kind", key.0),
            DomError::InvalidParent(key) => write!(f, "node {} cannot have children", key.0),
            DomError::AlreadyParented(key) => write!(f, "node {} already has a parent", key.0),
            DomError::CycleDetected { parent, child } => write!(
                f,
                "appending {} under {} would create a cycle",
                child.0, parent.0
            ),
            DomError::ShadowAlreadyAttached(key) => {
                write!(f, "element {} already hosts a shadow root", key.0)
            }
        }
    }
}

impl std::error::Error for DomError {}

#[derive(Debug)]
enum NodeKind {
    Document,
    Element {
        name: String,
        attributes: Vec<(String, Option<String>)>,
        shadow: Option<NodeKey>,
    },
    ShadowRoot {
        host: NodeKey,
    },
    Text {
        text: String,
    },
    Comment {
        text: String,
    },
}

#[derive(Debug)]
struct NodeRecord {
    kind: NodeKind,
    parent: Option<NodeKey>,
    children: Vec<NodeKey>,
}

impl NodeRecord {
    fn allows_children(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Document | NodeKind::Element { .. } | NodeKind::ShadowRoot { .. }
        )
    }

    fn can_be_child(&self) -> bool {
        !matches!(self.kind, NodeKind::Document | NodeKind::ShadowRoot { .. })
    }
}

#[derive(Debug)]
pub struct Document {
    nodes: Vec<NodeRecord>,
}

impl Document {
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeRecord {
                kind: NodeKind::Document,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// The document node. Always `NodeKey(1)`.
    pub fn root(&self) -> NodeKey {
        NodeKey(1)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn contains(&self, key: NodeKey) -> bool {
        self.index(key).is_some()
    }

    fn index(&self, key: NodeKey) -> Option<usize> {
        let idx = (key.0 as usize).checked_sub(1)?;
        (idx < self.nodes.len()).then_some(idx)
    }

    fn record(&self, key: NodeKey) -> Result<&NodeRecord, DomError> {
        self.index(key)
            .map(|idx| &self.nodes[idx])
            .ok_or(DomError::MissingKey(key))
    }

    fn record_mut(&mut self, key: NodeKey) -> Result<&mut NodeRecord, DomError> {
        match self.index(key) {
            Some(idx) => Ok(&mut self.nodes[idx]),
            None => Err(DomError::MissingKey(key)),
        }
    }

    fn push(&mut self, kind: NodeKind) -> NodeKey {
        self.nodes.push(NodeRecord {
            kind,
            parent: None,
            children: Vec::new(),
        });
        NodeKey(self.nodes.len() as u32)
    }

    pub fn create_element(&mut self, name: &str) -> NodeKey {
        self.push(NodeKind::Element {
            name: name.to_ascii_lowercase(),
            attributes: Vec::new(),
            shadow: None,
        })
    }

    pub fn create_element_with_attrs(&mut self, name: &str, attrs: &[(&str, &str)]) -> NodeKey {
        let attributes = attrs
            .iter()
            .map(|(k, v)| (k.to_ascii_lowercase(), Some((*v).to_string())))
            .collect();
        self.push(NodeKind::Element {
            name: name.to_ascii_lowercase(),
            attributes,
            shadow: None,
        })
    }

    pub fn create_text(&mut self, text: &str) -> NodeKey {
        self.push(NodeKind::Text {
            text: text.to_string(),
        })
    }

    pub fn create_comment(&mut self, text: &str) -> NodeKey {
        self.push(NodeKind::Comment {
            text: text.to_string(),
        })
    }

    pub fn append_child(&mut self, parent: NodeKey, child: NodeKey) -> Result<(), DomError> {
        let parent_rec = self.record(parent)?;
        if !parent_rec.allows_children() {
            debug_assert!(false, "parent node cannot have children");
            return Err(DomError::InvalidParent(parent));
        }
        let child_rec = self.record(child)?;
        if !child_rec.can_be_child() {
            return Err(DomError::WrongNodeKind(child));
        }
        if child_rec.parent.is_some() {
            return Err(DomError::AlreadyParented(child));
        }
        if self.is_inclusive_ancestor(child, parent) {
            return Err(DomError::CycleDetected { parent, child });
        }
        self.record_mut(parent)?.children.push(child);
        self.record_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Append a text node holding `text` under `parent`.
    pub fn append_text(&mut self, parent: NodeKey, text: &str) -> Result<NodeKey, DomError> {
        let text = self.create_text(text);
        self.append_child(parent, text)?;
        Ok(text)
    }

    /// Detach `key` (and its subtree) from its parent. Detached nodes stay addressable.
    pub fn remove(&mut self, key: NodeKey) -> Result<(), DomError> {
        let Some(parent) = self.record_mut(key)?.parent.take() else {
            return Ok(());
        };
        self.record_mut(parent)?.children.retain(|k| *k != key);
        log::trace!(target: "html.dom", "detached {key:?} from {parent:?}");
        Ok(())
    }

    pub fn attach_shadow(&mut self, host: NodeKey) -> Result<NodeKey, DomError> {
        match &self.record(host)?.kind {
            NodeKind::Element { shadow: None, .. } => {}
            NodeKind::Element { shadow: Some(_), .. } => {
                return Err(DomError::ShadowAlreadyAttached(host));
            }
            _ => return Err(DomError::WrongNodeKind(host)),
        }
        let root = self.push(NodeKind::ShadowRoot { host });
        if let NodeKind::Element { shadow, .. } = &mut self.record_mut(host)?.kind {
            *shadow = Some(root);
        }
        log::trace!(target: "html.dom", "attached shadow root {root:?} to {host:?}");
        Ok(root)
    }

    pub fn shadow_root(&self, host: NodeKey) -> Option<NodeKey> {
        match self.record(host).ok()?.kind {
            NodeKind::Element { shadow, .. } => shadow,
            _ => None,
        }
    }

    pub fn shadow_host(&self, root: NodeKey) -> Option<NodeKey> {
        match self.record(root).ok()?.kind {
            NodeKind::ShadowRoot { host } => Some(host),
            _ => None,
        }
    }

    pub fn parent(&self, key: NodeKey) -> Option<NodeKey> {
        self.record(key).ok()?.parent
    }

    pub fn children(&self, key: NodeKey) -> &[NodeKey] {
        self.record(key)
            .map(|rec| rec.children.as_slice())
            .unwrap_or(&[])
    }

    /// Parent in the composed tree: a shadow root's parent is its host.
    fn composed_parent(&self, key: NodeKey) -> Option<NodeKey> {
        let rec = self.record(key).ok()?;
        match rec.kind {
            NodeKind::ShadowRoot { host } => Some(host),
            _ => rec.parent,
        }
    }

    fn is_inclusive_ancestor(&self, ancestor: NodeKey, node: NodeKey) -> bool {
        let mut cur = Some(node);
        while let Some(k) = cur {
            if k == ancestor {
                return true;
            }
            cur = self.composed_parent(k);
        }
        false
    }

    /// `true` when `key` reaches the document root, crossing shadow boundaries.
    pub fn is_connected(&self, key: NodeKey) -> bool {
        self.contains(key) && self.is_inclusive_ancestor(self.root(), key)
    }

    pub fn is_element(&self, key: NodeKey) -> bool {
        matches!(
            self.record(key).map(|rec| &rec.kind),
            Ok(NodeKind::Element { .. })
        )
    }

    pub fn element_name(&self, key: NodeKey) -> Option<&str> {
        match &self.record(key).ok()?.kind {
            NodeKind::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn attributes(&self, key: NodeKey) -> &[(String, Option<String>)] {
        match self.record(key).map(|rec| &rec.kind) {
            Ok(NodeKind::Element { attributes, .. }) => attributes,
            _ => &[],
        }
    }

    /// Attribute value; a valueless (boolean) attribute reads as `""`.
    pub fn attr(&self, key: NodeKey, name: &str) -> Option<&str> {
        self.attributes(key)
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_deref().unwrap_or(""))
    }

    pub fn has_attr(&self, key: NodeKey, name: &str) -> bool {
        self.attr(key, name).is_some()
    }

    fn attributes_mut(
        &mut self,
        key: NodeKey,
    ) -> Result<&mut Vec<(String, Option<String>)>, DomError> {
        match &mut self.record_mut(key)?.kind {
            NodeKind::Element { attributes, .. } => Ok(attributes),
            _ => Err(DomError::WrongNodeKind(key)),
        }
    }

    fn put_attr(&mut self, key: NodeKey, name: &str, value: Option<String>) -> Result<(), DomError> {
        let attributes = self.attributes_mut(key)?;
        match attributes
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
        {
            Some((_, existing)) => *existing = value,
            None => attributes.push((name.to_ascii_lowercase(), value)),
        }
        Ok(())
    }

    pub fn set_attr(&mut self, key: NodeKey, name: &str, value: &str) -> Result<(), DomError> {
        self.put_attr(key, name, Some(value.to_string()))
    }

    /// Returns `true` if the attribute was present.
    pub fn remove_attr(&mut self, key: NodeKey, name: &str) -> Result<bool, DomError> {
        let attributes = self.attributes_mut(key)?;
        let before = attributes.len();
        attributes.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        Ok(attributes.len() != before)
    }

    /// Force a boolean attribute on or off. Returns `true` if the element changed.
    pub fn toggle_attr(&mut self, key: NodeKey, name: &str, force: bool) -> Result<bool, DomError> {
        let present = self.has_attr(key, name);
        match (present, force) {
            (false, true) => {
                self.put_attr(key, name, None)?;
                Ok(true)
            }
            (true, false) => self.remove_attr(key, name),
            _ => {
                // non-elements error even when nothing would change
                self.attributes_mut(key)?;
                Ok(false)
            }
        }
    }

    pub fn has_class(&self, key: NodeKey, class: &str) -> bool {
        self.attr(key, "class")
            .is_some_and(|v| v.split_ascii_whitespace().any(|t| t == class))
    }

    pub fn add_class(&mut self, key: NodeKey, class: &str) -> Result<(), DomError> {
        if self.has_class(key, class) {
            return Ok(());
        }
        let value = match self.attr(key, "class") {
            Some(existing) if !existing.trim().is_empty() => format!("{} {class}", existing.trim()),
            _ => class.to_string(),
        };
        self.set_attr(key, "class", &value)
    }

    pub fn text(&self, key: NodeKey) -> Option<&str> {
        match &self.record(key).ok()?.kind {
            NodeKind::Text { text } | NodeKind::Comment { text } => Some(text),
            _ => None,
        }
    }

    /// Concatenated light-tree text of `key` and its descendants.
    pub fn text_content(&self, key: NodeKey) -> String {
        let mut out = String::new();
        if let Ok(NodeKind::Text { text }) = self.record(key).map(|rec| &rec.kind) {
            out.push_str(text);
        }
        for k in self.descendants(key) {
            if let Ok(NodeKind::Text { text }) = self.record(k).map(|rec| &rec.kind) {
                out.push_str(text);
            }
        }
        out
    }

    /// Pre-order walk of the light tree below `scope`, excluding `scope` itself.
    pub fn descendants(&self, scope: NodeKey) -> Descendants<'_> {
        let mut stack: Vec<NodeKey> = self.children(scope).to_vec();
        stack.reverse();
        Descendants { doc: self, stack }
    }

    pub fn query_all(&self, scope: NodeKey, selectors: &SelectorList) -> Vec<NodeKey> {
        self.descendants(scope)
            .filter(|k| selectors.matches(self, *k))
            .collect()
    }

    pub fn query_first(&self, scope: NodeKey, selectors: &SelectorList) -> Option<NodeKey> {
        self.descendants(scope).find(|k| selectors.matches(self, *k))
    }

    pub fn materialize(&self, key: NodeKey) -> Result<Node, DomError> {
        let rec = self.record(key)?;
        let children = rec
            .children
            .iter()
            .map(|child| self.materialize(*child))
            .collect::<Result<Vec<_>, _>>()?;
        let node = match &rec.kind {
            NodeKind::Document => Node::Document { key, children },
            NodeKind::Element {
                name,
                attributes,
                shadow,
            } => Node::Element {
                key,
                name: name.clone(),
                attributes: attributes.clone(),
                shadow: match shadow {
                    Some(root) => Some(Box::new(self.materialize(*root)?)),
                    None => None,
                },
                children,
            },
            NodeKind::ShadowRoot { .. } => Node::ShadowRoot { key, children },
            NodeKind::Text { text } => Node::Text {
                key,
                text: text.clone(),
            },
            NodeKind::Comment { text } => Node::Comment {
                key,
                text: text.clone(),
            },
        };
        Ok(node)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<NodeKey>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeKey;

    fn next(&mut self) -> Option<NodeKey> {
        let key = self.stack.pop()?;
        self.stack
            .extend(self.doc.children(key).iter().rev().copied());
        Some(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Document, NodeKey, NodeKey, NodeKey) {
        let mut doc = Document::new();
        let body = doc.create_element("BODY");
        let p = doc.create_element("p");
        let a = doc.create_element_with_attrs("a", &[("HREF", "https://a.example")]);
        doc.append_child(doc.root(), body).unwrap();
        doc.append_child(body, p).unwrap();
        doc.append_child(p, a).unwrap();
        doc.append_text(a, "link").unwrap();
        (doc, body, p, a)
    }

    #[test]
    fn names_are_lowercased() {
        let (doc, body, _, a) = sample();
        assert_eq!(doc.element_name(body), Some("body"));
        assert_eq!(doc.attributes(a)[0].0, "href");
        assert_eq!(doc.attr(a, "href"), Some("https://a.example"));
    }

    #[test]
    fn descendants_are_in_document_order() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        let first = doc.create_element("span");
        let nested = doc.create_element("em");
        let second = doc.create_element("span");
        doc.append_child(doc.root(), div).unwrap();
        doc.append_child(div, first).unwrap();
        doc.append_child(first, nested).unwrap();
        doc.append_child(div, second).unwrap();
        let order: Vec<_> = doc.descendants(div).collect();
        assert_eq!(order, vec![first, nested, second]);
    }

    #[test]
    fn append_rejects_cycles_and_double_parenting() {
        let (mut doc, body, p, a) = sample();
        assert_eq!(
            doc.append_child(a, body),
            Err(DomError::AlreadyParented(body))
        );
        doc.remove(body).unwrap();
        assert_eq!(
            doc.append_child(a, body),
            Err(DomError::CycleDetected {
                parent: a,
                child: body
            })
        );
        assert_eq!(doc.append_child(p, p), Err(DomError::AlreadyParented(p)));
    }

    #[test]
    fn removed_nodes_stay_addressable_but_disconnected() {
        let (mut doc, body, p, a) = sample();
        assert!(doc.is_connected(a));
        doc.remove(p).unwrap();
        assert!(doc.children(body).is_empty());
        assert!(!doc.is_connected(a));
        assert_eq!(doc.parent(a), Some(p));
        assert_eq!(doc.text_content(p), "link");
    }

    #[test]
    fn shadow_tree_is_hidden_from_light_traversal() {
        let (mut doc, body, _, _) = sample();
        let host = doc.create_element("improved-print");
        doc.append_child(body, host).unwrap();
        let shadow = doc.attach_shadow(host).unwrap();
        let nav = doc.create_element("nav");
        doc.append_child(shadow, nav).unwrap();

        assert!(doc.is_connected(nav));
        assert_eq!(doc.shadow_host(shadow), Some(host));
        assert!(doc.descendants(doc.root()).all(|k| k != nav));
        assert_eq!(
            doc.attach_shadow(host),
            Err(DomError::ShadowAlreadyAttached(host))
        );
    }

    #[test]
    fn toggle_attr_reports_changes() {
        let (mut doc, _, _, a) = sample();
        assert_eq!(doc.toggle_attr(a, "hidden", true), Ok(true));
        assert_eq!(doc.attr(a, "hidden"), Some(""));
        assert_eq!(doc.toggle_attr(a, "hidden", true), Ok(false));
        assert_eq!(doc.toggle_attr(a, "hidden", false), Ok(true));
        assert!(!doc.has_attr(a, "hidden"));
        let text = doc.children(a)[0];
        assert_eq!(
            doc.toggle_attr(text, "hidden", false),
            Err(DomError::WrongNodeKind(text))
        );
    }

    #[test]
    fn add_class_keeps_existing_tokens() {
        let (mut doc, _, p, _) = sample();
        doc.set_attr(p, "class", "lead").unwrap();
        doc.add_class(p, "print-only").unwrap();
        doc.add_class(p, "print-only").unwrap();
        assert_eq!(doc.attr(p, "class"), Some("lead print-only"));
        assert!(doc.has_class(p, "lead"));
    }

    #[test]
    fn missing_keys_are_errors() {
        let mut doc = Document::new();
        let ghost = NodeKey(99);
        assert_eq!(
            doc.set_attr(ghost, "id", "x"),
            Err(DomError::MissingKey(ghost))
        );
        assert!(!doc.contains(NodeKey::INVALID));
        assert!(doc.children(ghost).is_empty());
    }
}
