/// Handle to a node record inside a [`NodeArena`](crate::NodeArena).
///
/// Ids are minted by the arena and are only meaningful for the arena that
/// produced them. Handing an id to a different arena is outside the
/// contract and panics like out-of-bounds `Vec` indexing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Rendering flavor of a node.
///
/// The same node shape serves two stages of the pipeline: `Source` nodes
/// carry bracketed markup still being worked on, `Target` nodes carry
/// finished angle-bracket markup. The flavor only matters at
/// stringification time and travels unchanged through copy and
/// concatenation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Source,
    Target,
}
