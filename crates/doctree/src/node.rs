//! Arena-backed persistent document nodes with lazy copy-on-write.
//!
//! Records live in a flat arena and are addressed by [`NodeId`]. Structural
//! operations never rewrite a record the caller already holds; they allocate
//! fresh roots and reuse children by id. A record whose children may be
//! shared with another version carries the `copy_pending` flag and gets its
//! children swapped for equivalent clones before any child is inspected or
//! replaced. That swap is the only in-place mutation in the crate and is
//! invisible to holders of previously returned versions.

use rand::RngCore;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::types::{NodeId, NodeKind};

/// Payload of a node: a literal text run, or a tagged element wrapping a
/// nested sequence of its own.
#[derive(Clone, Debug)]
pub(crate) enum Payload {
    Text {
        text: String,
    },
    Element {
        name: String,
        attributes: Vec<(String, Option<String>)>,
        inside: Option<NodeId>,
    },
}

/// One arena slot.
///
/// `size` counts chain elements only (`left`/`right` subtrees plus self);
/// the nested `inside` sequence of an element never contributes. `priority`
/// is fixed at construction and survives copying unchanged.
#[derive(Clone, Debug)]
pub(crate) struct NodeRecord {
    pub(crate) size: usize,
    pub(crate) priority: u64,
    pub(crate) kind: NodeKind,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
    pub(crate) copy_pending: bool,
    pub(crate) payload: Payload,
}

/// Store of all node records of a document, across every live version.
///
/// Records are only ever appended; a version that becomes unreachable simply
/// leaves its records behind. All operations that look below a node go
/// through the copy-on-write accessors, so holding `&mut NodeArena` is the
/// single-writer model: no version can observe another version's edits.
pub struct NodeArena {
    nodes: Vec<NodeRecord>,
    rng: SmallRng,
}

impl NodeArena {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            rng: SmallRng::from_entropy(),
        }
    }

    /// Arena with a deterministic priority stream. Shapes built from the
    /// same seed and the same operation sequence are identical, which keeps
    /// property tests and benches reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            nodes: Vec::new(),
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Total record count, live and dead. Diagnostic only.
    pub fn records(&self) -> usize {
        self.nodes.len()
    }

    fn alloc(&mut self, record: NodeRecord) -> NodeId {
        debug_assert!(
            self.nodes.len() < u32::MAX as usize,
            "node arena exhausted the u32 id space"
        );
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(record);
        id
    }

    pub(crate) fn record(&self, id: NodeId) -> &NodeRecord {
        &self.nodes[id.index()]
    }

    /// New single-element text leaf.
    pub fn text(&mut self, kind: NodeKind, text: impl Into<String>) -> NodeId {
        let priority = self.rng.next_u64();
        self.alloc(NodeRecord {
            size: 1,
            priority,
            kind,
            left: None,
            right: None,
            copy_pending: false,
            payload: Payload::Text { text: text.into() },
        })
    }

    /// New single-element tag node wrapping an optional nested sequence.
    ///
    /// Attribute keys must be unique; order of the vector is the order they
    /// stringify in.
    pub fn element(
        &mut self,
        kind: NodeKind,
        name: impl Into<String>,
        attributes: Vec<(String, Option<String>)>,
        inside: Option<NodeId>,
    ) -> NodeId {
        debug_assert!(
            attributes
                .iter()
                .enumerate()
                .all(|(i, (k, _))| attributes[..i].iter().all(|(prev, _)| prev != k)),
            "duplicate attribute key on element"
        );
        let priority = self.rng.next_u64();
        self.alloc(NodeRecord {
            size: 1,
            priority,
            kind,
            left: None,
            right: None,
            copy_pending: false,
            payload: Payload::Element {
                name: name.into(),
                attributes,
                inside,
            },
        })
    }

    /// O(1) shallow clone of one record.
    ///
    /// Children (and an element's `inside`) are reused by id, so both the
    /// original and the clone are flagged `copy_pending`: whichever side is
    /// descended into first clones the shared children for itself.
    /// Text and attribute values are copied by value, priorities carry over.
    pub fn copy(&mut self, id: NodeId) -> NodeId {
        self.nodes[id.index()].copy_pending = true;
        let clone = self.nodes[id.index()].clone();
        self.alloc(clone)
    }

    /// Resolve a pending copy: replace `left`, `right`, and an element's
    /// `inside` with clones, then clear the flag.
    ///
    /// Must run before any code path inspects or reassigns a child; the
    /// child accessors below do it implicitly. No-op on unflagged records.
    pub fn push_copy_down(&mut self, id: NodeId) {
        if !self.nodes[id.index()].copy_pending {
            return;
        }
        log::trace!(target: "doctree.cow", "pushing copy below {id:?}");
        let left = self.nodes[id.index()].left;
        let right = self.nodes[id.index()].right;
        let inside = match &self.nodes[id.index()].payload {
            Payload::Element { inside, .. } => *inside,
            Payload::Text { .. } => None,
        };
        let new_left = left.map(|child| self.copy(child));
        let new_right = right.map(|child| self.copy(child));
        let new_inside = inside.map(|child| self.copy(child));

        let record = &mut self.nodes[id.index()];
        record.left = new_left;
        record.right = new_right;
        if let Payload::Element { inside, .. } = &mut record.payload {
            *inside = new_inside;
        }
        record.copy_pending = false;
        self.refresh_size(id);
    }

    /// Left chain subtree, owned exclusively by this version after the call.
    pub fn left(&mut self, id: NodeId) -> Option<NodeId> {
        self.push_copy_down(id);
        self.nodes[id.index()].left
    }

    /// Right chain subtree, owned exclusively by this version after the call.
    pub fn right(&mut self, id: NodeId) -> Option<NodeId> {
        self.push_copy_down(id);
        self.nodes[id.index()].right
    }

    /// New root equal to `id` but with the left child replaced.
    ///
    /// The receiver is left intact (it keeps sharing its other children with
    /// the new root, so both end up flagged `copy_pending`).
    pub fn set_left(&mut self, id: NodeId, child: Option<NodeId>) -> NodeId {
        let root = self.copy(id);
        self.nodes[root.index()].left = child;
        self.refresh_size(root);
        root
    }

    /// New root equal to `id` but with the right child replaced.
    pub fn set_right(&mut self, id: NodeId, child: Option<NodeId>) -> NodeId {
        let root = self.copy(id);
        self.nodes[root.index()].right = child;
        self.refresh_size(root);
        root
    }

    /// Recompute `size` from the current children.
    ///
    /// Every structural mutation funnels through here (`set_left`,
    /// `set_right`, `push_copy_down`), so a stale size cannot outlive the
    /// operation that caused it.
    fn refresh_size(&mut self, id: NodeId) {
        let left = self.nodes[id.index()].left;
        let right = self.nodes[id.index()].right;
        let size = 1
            + left.map_or(0, |child| self.nodes[child.index()].size)
            + right.map_or(0, |child| self.nodes[child.index()].size);
        self.nodes[id.index()].size = size;
    }

    /// Chain element count of the subtree rooted at `id`.
    pub fn size(&self, id: NodeId) -> usize {
        self.nodes[id.index()].size
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.nodes[id.index()].kind
    }

    /// Whether the record still shares children with another version.
    pub fn copy_pending(&self, id: NodeId) -> bool {
        self.nodes[id.index()].copy_pending
    }

    /// Text of a leaf node, `None` for elements.
    pub fn leaf_text(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.index()].payload {
            Payload::Text { text } => Some(text),
            Payload::Element { .. } => None,
        }
    }

    /// Tag name of an element node, `None` for text leaves.
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.index()].payload {
            Payload::Element { name, .. } => Some(name),
            Payload::Text { .. } => None,
        }
    }

    /// Attributes of an element node in insertion order, `None` for leaves.
    pub fn attributes(&self, id: NodeId) -> Option<&[(String, Option<String>)]> {
        match &self.nodes[id.index()].payload {
            Payload::Element { attributes, .. } => Some(attributes),
            Payload::Text { .. } => None,
        }
    }

    /// Nested sequence of an element, owned exclusively after the call.
    /// `None` for leaves and for elements with empty insides.
    pub fn inside(&mut self, id: NodeId) -> Option<NodeId> {
        self.push_copy_down(id);
        match &self.nodes[id.index()].payload {
            Payload::Element { inside, .. } => *inside,
            Payload::Text { .. } => None,
        }
    }

    /// Isolated single-element copy of `id`: same payload, kind and
    /// priority, no chain children, size 1. The traversal yields these so
    /// every pulled node stringifies independently of its siblings.
    pub(crate) fn isolate(&mut self, id: NodeId) -> NodeId {
        self.nodes[id.index()].copy_pending = true;
        let mut clone = self.nodes[id.index()].clone();
        clone.left = None;
        clone.right = None;
        clone.size = 1;
        self.alloc(clone)
    }
}

impl Default for NodeArena {
    fn default() -> Self {
        Self::new()
    }
}
