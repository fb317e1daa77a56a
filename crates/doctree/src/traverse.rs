//! In-order traversal of a version's element chain.

use crate::node::NodeArena;
use crate::types::NodeId;

/// Pull cursor over the elements of one version, front to back.
///
/// Every pull returns an isolated single-element copy: same payload, kind
/// and priority as the element in the chain, but no chain links and size 1.
/// Pulled ids therefore stay meaningful however the document is edited
/// afterwards, and stringifying one never drags its old siblings along.
///
/// The cursor holds plain ids rather than borrowing the arena, so pulls can
/// be interleaved with edits. Edits allocate fresh records and leave the
/// records on the cursor's path intact, so the walk keeps yielding the
/// version it was started on.
pub struct SeqCursor {
    stack: Vec<NodeId>,
}

impl SeqCursor {
    pub fn new(arena: &mut NodeArena, root: impl Into<Option<NodeId>>) -> Self {
        let mut cursor = Self { stack: Vec::new() };
        if let Some(root) = root.into() {
            cursor.descend(arena, root);
        }
        cursor
    }

    fn descend(&mut self, arena: &mut NodeArena, mut id: NodeId) {
        loop {
            self.stack.push(id);
            match arena.left(id) {
                Some(child) => id = child,
                None => break,
            }
        }
    }

    /// Next element as an isolated singleton, or `None` past the end.
    pub fn next(&mut self, arena: &mut NodeArena) -> Option<NodeId> {
        let id = self.stack.pop()?;
        if let Some(right) = arena.right(id) {
            self.descend(arena, right);
        }
        Some(arena.isolate(id))
    }
}

/// Borrowing [`Iterator`] over one version's elements.
///
/// Hands out the same isolated singletons as [`SeqCursor`], at the cost of
/// holding the arena borrow for the whole walk.
pub struct Nodes<'a> {
    arena: &'a mut NodeArena,
    cursor: SeqCursor,
}

impl Iterator for Nodes<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        self.cursor.next(self.arena)
    }
}

impl NodeArena {
    /// Iterate the elements of `root` in order as isolated singletons.
    ///
    /// Use [`SeqCursor`] directly to interleave pulls with edits.
    pub fn nodes(&mut self, root: impl Into<Option<NodeId>>) -> Nodes<'_> {
        let cursor = SeqCursor::new(self, root);
        Nodes {
            arena: self,
            cursor,
        }
    }
}
