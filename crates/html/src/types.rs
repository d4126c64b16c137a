/// Stable identity of a node inside one [`Document`](crate::Document).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey(pub u32);

impl NodeKey {
    /// Reserved sentinel for "unassigned/invalid" identity.
    pub const INVALID: NodeKey = NodeKey(0);
}

/// Owned snapshot of a subtree, materialized from the arena.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Document {
        key: NodeKey,
        children: Vec<Node>,
    },
    Element {
        key: NodeKey,
        name: String,
        attributes: Vec<(String, Option<String>)>,
        shadow: Option<Box<Node>>,
        children: Vec<Node>,
    },
    ShadowRoot {
        key: NodeKey,
        children: Vec<Node>,
    },
    Text {
        key: NodeKey,
        text: String,
    },
    Comment {
        key: NodeKey,
        text: String,
    },
}

impl Node {
    pub fn key(&self) -> NodeKey {
        match self {
            Node::Document { key, .. }
            | Node::Element { key, .. }
            | Node::ShadowRoot { key, .. }
            | Node::Text { key, .. }
            | Node::Comment { key, .. } => *key,
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Document { children, .. }
            | Node::Element { children, .. }
            | Node::ShadowRoot { children, .. } => children,
            _ => &[],
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        match self {
            Node::Element { attributes, .. } => attributes
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.as_deref().unwrap_or("")),
            _ => None,
        }
    }
}
