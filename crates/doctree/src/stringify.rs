//! Rendering of a version to its document string.
//!
//! The output is a boundary contract: rendered strings are compared byte for
//! byte by downstream consumers, so the grammar here must not drift. Chains
//! render in order, each element contributing its own text between its left
//! and right parts; absent sequences contribute nothing.

use crate::entities::escape_text;
use crate::node::NodeArena;
use crate::types::{NodeId, NodeKind};

impl NodeArena {
    /// Document string of the whole chain under `root`.
    ///
    /// Leaf text and attribute values are escaped with
    /// [`escape_text`](crate::escape_text). Elements wrap their nested
    /// sequence in brackets chosen by kind:
    ///
    /// ```text
    /// Target:  <name key="value" flag>INSIDE</name>
    /// Source:  [name key="value" flag]INSIDE[/name]
    /// ```
    ///
    /// Attributes render in insertion order. A `None` value renders as a
    /// bare ` key`; an empty value suppresses the attribute entirely.
    pub fn stringify(&mut self, root: impl Into<Option<NodeId>>) -> String {
        let mut out = String::new();
        self.write_chain(root.into(), &mut out);
        out
    }

    fn write_chain(&mut self, id: Option<NodeId>, out: &mut String) {
        let Some(id) = id else { return };
        let left = self.left(id);
        self.write_chain(left, out);
        self.write_node(id, out);
        let right = self.right(id);
        self.write_chain(right, out);
    }

    fn write_node(&mut self, id: NodeId, out: &mut String) {
        if let Some(text) = self.leaf_text(id) {
            out.push_str(&escape_text(text));
            return;
        }

        let (open, close) = match self.kind(id) {
            NodeKind::Target => ("<", ">"),
            NodeKind::Source => ("[", "]"),
        };

        let Some(name) = self.tag_name(id) else {
            unreachable!("a node without leaf text is an element");
        };
        out.push_str(open);
        out.push_str(name);

        if let Some(attributes) = self.attributes(id) {
            for (key, value) in attributes {
                match value.as_deref() {
                    None => {
                        out.push(' ');
                        out.push_str(key);
                    }
                    Some("") => {}
                    Some(value) => {
                        out.push(' ');
                        out.push_str(key);
                        out.push_str("=\"");
                        out.push_str(&escape_text(value));
                        out.push('"');
                    }
                }
            }
        }
        out.push_str(close);

        let inside = self.inside(id);
        self.write_chain(inside, out);

        let Some(name) = self.tag_name(id) else {
            unreachable!("a node without leaf text is an element");
        };
        out.push_str(open);
        out.push('/');
        out.push_str(name);
        out.push_str(close);
    }
}
