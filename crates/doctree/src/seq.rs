//! Sequence edits: concatenation and splitting of node chains.
//!
//! Both operations are expressed over the priority heap the records carry.
//! Merge keeps the lower priority on top; split walks the chain by element
//! count. Neither touches a record the caller holds: spines are rebuilt from
//! fresh copies, off-spine subtrees are reused by id under the protection of
//! the `copy_pending` flag.

use crate::node::NodeArena;
use crate::types::{NodeId, NodeKind};

/// Anything that can stand on one side of a concatenation: an existing
/// version id, an optional id, or bare text that gets wrapped in a fresh
/// leaf of the receiver's kind.
pub trait IntoPiece {
    fn into_piece(self, arena: &mut NodeArena, kind: NodeKind) -> Option<NodeId>;
}

impl IntoPiece for NodeId {
    fn into_piece(self, _arena: &mut NodeArena, _kind: NodeKind) -> Option<NodeId> {
        Some(self)
    }
}

impl IntoPiece for Option<NodeId> {
    fn into_piece(self, _arena: &mut NodeArena, _kind: NodeKind) -> Option<NodeId> {
        self
    }
}

impl IntoPiece for &str {
    fn into_piece(self, arena: &mut NodeArena, kind: NodeKind) -> Option<NodeId> {
        if self.is_empty() {
            return None;
        }
        Some(arena.text(kind, self))
    }
}

impl IntoPiece for String {
    fn into_piece(self, arena: &mut NodeArena, kind: NodeKind) -> Option<NodeId> {
        self.as_str().into_piece(arena, kind)
    }
}

impl NodeArena {
    /// New version with `piece` appended after the last element of `id`.
    ///
    /// The receiver and the piece stay valid, unchanged versions. An empty
    /// piece still produces a fresh version id equal in content to the
    /// receiver.
    pub fn concat_back(&mut self, id: NodeId, piece: impl IntoPiece) -> NodeId {
        let kind = self.kind(id);
        match piece.into_piece(self, kind) {
            None => self.copy(id),
            Some(other) => {
                log::trace!(
                    target: "doctree.seq",
                    "concat back: {} + {} elements",
                    self.size(id),
                    self.size(other)
                );
                // The piece may alias the receiver or live inside its tree;
                // a copied root keeps the two merge inputs distinct.
                let other = self.copy(other);
                match self.merge(Some(id), Some(other)) {
                    Some(root) => root,
                    None => unreachable!("merging non-empty sequences produced nothing"),
                }
            }
        }
    }

    /// New version with `piece` in front of the first element of `id`.
    pub fn concat_front(&mut self, id: NodeId, piece: impl IntoPiece) -> NodeId {
        let kind = self.kind(id);
        match piece.into_piece(self, kind) {
            None => self.copy(id),
            Some(other) => {
                log::trace!(
                    target: "doctree.seq",
                    "concat front: {} + {} elements",
                    self.size(other),
                    self.size(id)
                );
                let other = self.copy(other);
                match self.merge(Some(other), Some(id)) {
                    Some(root) => root,
                    None => unreachable!("merging non-empty sequences produced nothing"),
                }
            }
        }
    }

    /// Split `id` into its first `count` elements and the rest.
    ///
    /// `count` is clamped to `0..=size`, so out-of-range requests return an
    /// empty side rather than failing. The receiver stays a valid version.
    pub fn split_at(&mut self, id: NodeId, count: usize) -> (Option<NodeId>, Option<NodeId>) {
        log::trace!(
            target: "doctree.seq",
            "split {} elements at {count}",
            self.size(id)
        );
        self.split(Some(id), count)
    }

    /// Treap merge. The record with the lower priority becomes the root;
    /// ties keep the left input on top so repeated merges stay stable.
    pub(crate) fn merge(&mut self, a: Option<NodeId>, b: Option<NodeId>) -> Option<NodeId> {
        match (a, b) {
            (None, other) | (other, None) => other,
            (Some(x), Some(y)) => {
                if self.record(x).priority <= self.record(y).priority {
                    let right = self.right(x);
                    let merged = self.merge(right, Some(y));
                    Some(self.set_right(x, merged))
                } else {
                    let left = self.left(y);
                    let merged = self.merge(Some(x), left);
                    Some(self.set_left(y, merged))
                }
            }
        }
    }

    fn split(&mut self, id: Option<NodeId>, count: usize) -> (Option<NodeId>, Option<NodeId>) {
        let Some(node) = id else {
            return (None, None);
        };
        if count == 0 {
            return (None, Some(node));
        }
        if count >= self.size(node) {
            return (Some(node), None);
        }

        let left = self.left(node);
        let left_size = left.map_or(0, |child| self.size(child));
        if count <= left_size {
            let (first, rest) = self.split(left, count);
            let root = self.set_left(node, rest);
            (first, Some(root))
        } else {
            let right = self.right(node);
            let (first, rest) = self.split(right, count - left_size - 1);
            let root = self.set_right(node, first);
            (Some(root), rest)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(arena: &mut NodeArena, texts: &[&str]) -> NodeId {
        let mut root = arena.text(NodeKind::Source, texts[0]);
        for text in &texts[1..] {
            root = arena.concat_back(root, *text);
        }
        root
    }

    fn labels(arena: &mut NodeArena, id: Option<NodeId>, out: &mut Vec<String>) {
        let Some(id) = id else { return };
        let left = arena.left(id);
        labels(arena, left, out);
        match arena.leaf_text(id) {
            Some(text) => out.push(text.to_string()),
            None => out.push(format!("<{}>", arena.tag_name(id).unwrap())),
        }
        let right = arena.right(id);
        labels(arena, right, out);
    }

    fn collect(arena: &mut NodeArena, id: impl Into<Option<NodeId>>) -> Vec<String> {
        let mut out = Vec::new();
        labels(arena, id.into(), &mut out);
        out
    }

    fn assert_heap(arena: &mut NodeArena, id: Option<NodeId>) {
        let Some(id) = id else { return };
        let priority = arena.record(id).priority;
        let left = arena.left(id);
        let right = arena.right(id);
        for child in [left, right].into_iter().flatten() {
            assert!(
                priority <= arena.record(child).priority,
                "child outranks its parent"
            );
        }
        assert_heap(arena, left);
        assert_heap(arena, right);
    }

    #[test]
    fn concat_back_appends_in_order() {
        let mut arena = NodeArena::with_seed(11);
        let root = chain(&mut arena, &["a", "b", "c"]);
        assert_eq!(arena.size(root), 3);
        assert_eq!(collect(&mut arena, root), ["a", "b", "c"]);
        assert_heap(&mut arena, Some(root));
    }

    #[test]
    fn concat_front_prepends() {
        let mut arena = NodeArena::with_seed(12);
        let root = chain(&mut arena, &["b", "c"]);
        let root = arena.concat_front(root, "a");
        assert_eq!(collect(&mut arena, root), ["a", "b", "c"]);
    }

    #[test]
    fn concat_leaves_both_inputs_untouched() {
        let mut arena = NodeArena::with_seed(13);
        let first = chain(&mut arena, &["a", "b"]);
        let second = chain(&mut arena, &["c", "d"]);
        let joined = arena.concat_back(first, second);

        assert_eq!(collect(&mut arena, joined), ["a", "b", "c", "d"]);
        assert_eq!(collect(&mut arena, first), ["a", "b"]);
        assert_eq!(collect(&mut arena, second), ["c", "d"]);
        assert_eq!(arena.size(first), 2);
        assert_eq!(arena.size(second), 2);
    }

    #[test]
    fn empty_pieces_yield_a_fresh_equal_version() {
        let mut arena = NodeArena::with_seed(14);
        let root = chain(&mut arena, &["a", "b"]);

        let back = arena.concat_back(root, None);
        assert_ne!(back, root);
        assert_eq!(collect(&mut arena, back), ["a", "b"]);

        let front = arena.concat_front(root, "");
        assert_ne!(front, root);
        assert_eq!(collect(&mut arena, front), ["a", "b"]);
    }

    #[test]
    fn text_pieces_inherit_the_receiver_kind() {
        let mut arena = NodeArena::with_seed(15);
        let root = arena.text(NodeKind::Target, "a");
        let root = arena.concat_back(root, "b");
        let (first, rest) = arena.split_at(root, 1);
        let tail = rest.unwrap();
        assert_eq!(arena.kind(tail), NodeKind::Target);
        assert_eq!(collect(&mut arena, first), ["a"]);
        assert_eq!(collect(&mut arena, Some(tail)), ["b"]);
    }

    #[test]
    fn split_at_clamps_out_of_range_counts() {
        let mut arena = NodeArena::with_seed(16);
        let root = chain(&mut arena, &["a", "b", "c"]);

        let (first, rest) = arena.split_at(root, 0);
        assert!(first.is_none());
        assert_eq!(collect(&mut arena, rest), ["a", "b", "c"]);

        let (first, rest) = arena.split_at(root, 17);
        assert!(rest.is_none());
        assert_eq!(collect(&mut arena, first), ["a", "b", "c"]);
    }

    #[test]
    fn split_at_every_index_partitions_the_chain() {
        let texts = ["a", "b", "c", "d", "e"];
        for count in 0..=texts.len() {
            let mut arena = NodeArena::with_seed(17);
            let root = chain(&mut arena, &texts);
            let (first, rest) = arena.split_at(root, count);

            assert_eq!(first.map_or(0, |id| arena.size(id)), count);
            assert_eq!(rest.map_or(0, |id| arena.size(id)), texts.len() - count);
            assert_eq!(collect(&mut arena, first), texts[..count]);
            assert_eq!(collect(&mut arena, rest), texts[count..]);
            assert_heap(&mut arena, first);
            assert_heap(&mut arena, rest);

            // The receiver still stringifies whole.
            assert_eq!(collect(&mut arena, root), texts);
        }
    }

    #[test]
    fn split_then_concat_restores_the_content() {
        let mut arena = NodeArena::with_seed(18);
        let root = chain(&mut arena, &["a", "b", "c", "d"]);
        let (first, rest) = arena.split_at(root, 2);
        let first = first.unwrap();
        let rejoined = arena.concat_back(first, rest);
        assert_eq!(collect(&mut arena, rejoined), ["a", "b", "c", "d"]);
        assert_heap(&mut arena, Some(rejoined));
    }

    #[test]
    fn concatenating_a_version_onto_itself_doubles_it() {
        let mut arena = NodeArena::with_seed(19);
        let root = chain(&mut arena, &["a", "b", "c"]);
        let doubled = arena.concat_back(root, root);

        assert_eq!(arena.size(doubled), 6);
        assert_eq!(collect(&mut arena, doubled), ["a", "b", "c", "a", "b", "c"]);
        assert_eq!(collect(&mut arena, root), ["a", "b", "c"]);
        assert_heap(&mut arena, Some(doubled));
    }

    #[test]
    fn concatenating_a_live_child_does_not_alias_the_result() {
        let mut arena = NodeArena::with_seed(20);
        let root = chain(&mut arena, &["a", "b", "c", "d"]);
        // Pull a live subtree handle out of the version and feed it back in.
        let child = arena
            .left(root)
            .or_else(|| arena.right(root))
            .expect("a four element chain has at least one child");
        let child_labels = collect(&mut arena, Some(child));

        let joined = arena.concat_back(root, child);
        let mut expected = collect(&mut arena, root);
        expected.extend(child_labels);
        assert_eq!(collect(&mut arena, joined), expected);
        assert_heap(&mut arena, Some(joined));
    }
}
