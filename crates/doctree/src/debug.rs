//! Read-only diagnostics over the node arena.

use std::fmt::Write;

use crate::node::{NodeArena, Payload};
use crate::types::{NodeId, NodeKind};

const PREVIEW_CHARS: usize = 40;

/// Indented outline of the tree under `root`, capped at `cap` lines.
///
/// Shows the chain shape (`L`/`R` children, `I` for an element's nested
/// sequence) with each record's cached size and sharing state. Reads the
/// records directly, so pending copies stay pending.
pub fn outline(arena: &NodeArena, root: impl Into<Option<NodeId>>, cap: usize) -> Vec<String> {
    fn push_preview(out: &mut String, text: &str) {
        let mut truncated = false;
        for (i, ch) in text.chars().enumerate() {
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

    fn walk(
        arena: &NodeArena,
        id: Option<NodeId>,
        role: &str,
        indent: usize,
        out: &mut Vec<String>,
        left: &mut usize,
    ) {
        let Some(id) = id else { return };
        if *left == 0 {
            return;
        }
        *left -= 1;

        let record = arena.record(id);
        let mut line = String::with_capacity(indent + 64);
        for _ in 0..indent {
            line.push(' ');
        }
        line.push_str(role);
        match &record.payload {
            Payload::Text { text } => {
                line.push('"');
                push_preview(&mut line, text);
                line.push('"');
            }
            Payload::Element { name, .. } => {
                let (open, close) = match record.kind {
                    NodeKind::Target => ('<', '>'),
                    NodeKind::Source => ('[', ']'),
                };
                line.push(open);
                line.push_str(name);
                line.push(close);
            }
        }
        let _ = write!(&mut line, " size={}", record.size);
        if record.copy_pending {
            line.push_str(" shared");
        }
        out.push(line);

        walk(arena, record.left, "L ", indent + 2, out, left);
        if let Payload::Element { inside, .. } = &record.payload {
            walk(arena, *inside, "I ", indent + 2, out, left);
        }
        walk(arena, record.right, "R ", indent + 2, out, left);
    }

    let mut out = Vec::new();
    let mut left = cap;
    walk(arena, root.into(), "", 0, &mut out, &mut left);
    out
}

/// Ids whose cached size disagrees with a recount of their chain subtree.
///
/// Recounts bottom-up, so one stale record cannot mask or fabricate
/// violations above it. Nested sequences are recounted as well.
pub fn stale_sizes(arena: &NodeArena, root: impl Into<Option<NodeId>>) -> Vec<NodeId> {
    fn recount(arena: &NodeArena, id: Option<NodeId>, bad: &mut Vec<NodeId>) -> usize {
        let Some(id) = id else { return 0 };
        let record = arena.record(id);
        let left = recount(arena, record.left, bad);
        let right = recount(arena, record.right, bad);
        if let Payload::Element { inside, .. } = &record.payload {
            recount(arena, *inside, bad);
        }
        let fresh = left + right + 1;
        if record.size != fresh {
            bad.push(id);
        }
        fresh
    }

    let mut bad = Vec::new();
    recount(arena, root.into(), &mut bad);
    bad
}

/// Ids whose priority undercuts their chain parent's, breaking the heap
/// order merges rely on. An element's nested sequence is its own heap.
pub fn heap_violations(arena: &NodeArena, root: impl Into<Option<NodeId>>) -> Vec<NodeId> {
    fn walk(arena: &NodeArena, id: Option<NodeId>, bad: &mut Vec<NodeId>) {
        let Some(id) = id else { return };
        let record = arena.record(id);
        for child in [record.left, record.right].into_iter().flatten() {
            if arena.record(child).priority < record.priority {
                bad.push(child);
            }
        }
        walk(arena, record.left, bad);
        walk(arena, record.right, bad);
        if let Payload::Element { inside, .. } = &record.payload {
            walk(arena, *inside, bad);
        }
    }

    let mut bad = Vec::new();
    walk(arena, root.into(), &mut bad);
    bad
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(arena: &mut NodeArena) -> NodeId {
        let inner = arena.text(NodeKind::Source, "inner");
        let elem = arena.element(NodeKind::Source, "x", Vec::new(), Some(inner));
        let root = arena.concat_front(elem, "abc");
        arena.concat_back(root, "this is a very long text run that keeps going well past forty characters")
    }

    #[test]
    fn outline_shows_shape_sizes_and_previews() {
        let mut arena = NodeArena::with_seed(51);
        let root = sample(&mut arena);
        let lines = outline(&arena, root, 64);

        assert!(!lines.is_empty());
        assert!(!lines[0].starts_with(' '), "the root line is unindented");
        assert!(lines.iter().all(|line| line.contains("size=")));
        assert!(lines.iter().any(|line| line.contains("[x]")));
        assert!(lines.iter().any(|line| line.contains("I \"inner\"")));
        assert!(
            lines.iter().any(|line| line.contains("…\"")),
            "long text is truncated with an ellipsis"
        );
    }

    #[test]
    fn outline_respects_the_line_cap() {
        let mut arena = NodeArena::with_seed(52);
        let root = sample(&mut arena);
        assert!(outline(&arena, root, 2).len() <= 2);
        assert!(outline(&arena, None, 8).is_empty());
    }

    #[test]
    fn checks_pass_on_freshly_built_documents() {
        let mut arena = NodeArena::with_seed(53);
        let root = sample(&mut arena);
        assert!(stale_sizes(&arena, root).is_empty());
        assert!(heap_violations(&arena, root).is_empty());

        let doubled = arena.concat_back(root, root);
        let (first, rest) = arena.split_at(doubled, 3);
        for part in [Some(doubled), first, rest] {
            assert!(stale_sizes(&arena, part).is_empty());
            assert!(heap_violations(&arena, part).is_empty());
        }
    }
}
