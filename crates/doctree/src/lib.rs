//! Persistent document sequences with copy-on-write versioning.
//!
//! A document is a left-to-right chain of text runs and tagged elements,
//! stored as a randomized treap inside a [`NodeArena`]. Every edit returns a
//! new version id and leaves old ones valid: concatenation, splitting and
//! copying share structure until a later edit forces a clone.
//!
//! ```
//! use doctree::{NodeArena, NodeKind};
//!
//! let mut arena = NodeArena::new();
//! let doc = arena.text(NodeKind::Source, "hello");
//! let doc = arena.concat_back(doc, "world");
//! let (first, _) = arena.split_at(doc, 1);
//! assert_eq!(arena.stringify(doc), "helloworld");
//! assert_eq!(arena.stringify(first), "hello");
//! ```

pub mod debug;

mod entities;
mod node;
mod seq;
mod stringify;
mod traverse;
mod types;

pub use crate::entities::escape_text;
pub use crate::node::NodeArena;
pub use crate::seq::IntoPiece;
pub use crate::traverse::{Nodes, SeqCursor};
pub use crate::types::{NodeId, NodeKind};
