#![no_main]

//! Replays arbitrary edit sequences against the arena and checks the
//! structural invariants afterwards: cached sizes match a recount, heap
//! order holds, and splitting any surviving version partitions its
//! rendered output.

use doctree::debug::{heap_violations, stale_sizes};
use doctree::{NodeArena, NodeId, NodeKind};
use libfuzzer_sys::fuzz_target;

const MAX_OPS: usize = 96;
const MAX_ELEMENTS: usize = 4096;
const MAX_VERSIONS: usize = 32;

fn pick(versions: &[NodeId], selector: u8) -> Option<NodeId> {
    if versions.is_empty() {
        None
    } else {
        Some(versions[selector as usize % versions.len()])
    }
}

fuzz_target!(|data: &[u8]| {
    let mut arena = NodeArena::with_seed(0x1dea);
    let mut versions: Vec<NodeId> = Vec::new();
    let mut bytes = data.iter().copied();
    let mut ops = 0usize;

    while let Some(op) = bytes.next() {
        ops += 1;
        if ops > MAX_OPS {
            break;
        }
        match op % 6 {
            0 => {
                let len = bytes.next().unwrap_or(0) as usize % 8;
                let text: String = (0..len)
                    .map(|_| char::from(b'a' + bytes.next().unwrap_or(0) % 26))
                    .collect();
                versions.push(arena.text(NodeKind::Source, text));
            }
            1 => {
                let inside = bytes.next().and_then(|s| pick(&versions, s));
                let kind = if op & 0x40 == 0 {
                    NodeKind::Source
                } else {
                    NodeKind::Target
                };
                let attributes = vec![("k".to_string(), Some("v".to_string()))];
                versions.push(arena.element(kind, "t", attributes, inside));
            }
            2 => {
                let (Some(a), Some(b)) = (
                    bytes.next().and_then(|s| pick(&versions, s)),
                    bytes.next().and_then(|s| pick(&versions, s)),
                ) else {
                    continue;
                };
                if arena.size(a) + arena.size(b) > MAX_ELEMENTS {
                    continue;
                }
                versions.push(arena.concat_back(a, b));
            }
            3 => {
                let Some(id) = bytes.next().and_then(|s| pick(&versions, s)) else {
                    continue;
                };
                // Reaches past the end now and then to exercise clamping.
                let at = bytes.next().unwrap_or(0) as usize % (arena.size(id) + 2);
                let (first, rest) = arena.split_at(id, at);
                versions.extend(first);
                versions.extend(rest);
            }
            4 => {
                let Some(id) = bytes.next().and_then(|s| pick(&versions, s)) else {
                    continue;
                };
                versions.push(arena.copy(id));
            }
            _ => {
                let Some(id) = bytes.next().and_then(|s| pick(&versions, s)) else {
                    continue;
                };
                if arena.size(id) > MAX_ELEMENTS {
                    continue;
                }
                let pulled = arena.nodes(id).count();
                assert_eq!(pulled, arena.size(id));
            }
        }
        while versions.len() > MAX_VERSIONS {
            versions.remove(0);
        }
    }

    for &id in &versions {
        assert!(stale_sizes(&arena, id).is_empty(), "stale size under {id:?}");
        assert!(
            heap_violations(&arena, id).is_empty(),
            "broken heap order under {id:?}"
        );
        if arena.size(id) > MAX_ELEMENTS {
            continue;
        }
        let whole = arena.stringify(id);
        let (first, rest) = arena.split_at(id, arena.size(id) / 2);
        let mut joined = arena.stringify(first);
        joined.push_str(&arena.stringify(rest));
        assert_eq!(joined, whole);
    }
});
