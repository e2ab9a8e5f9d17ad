// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Dump/debug rendering.
//!
//! spec.md §2. Walks every node reachable from a root directly through its
//! child slots — never through the descent engine, since a dump needs to
//! show the tree's actual shape (including nodeless leaves, self-loops, and
//! duplicate rings) rather than the shape a keyed search would see. Output
//! is Graphviz DOT, one `digraph` per call, built with `std::fmt::Write`
//! into the caller's buffer so this module allocates nothing of its own
//! beyond the visited-set bookkeeping needed to avoid re-emitting a node
//! reached by more than one edge (every duplicate-cluster member, and both
//! children of a nodeless leaf).
//!
//! Form A's disabled "dup subtree" rendering and the commented-out
//! `lookup_le`/`lookup_ge` paths the original carries are not part of this
//! crate's contract (spec.md §9 Open Questions); this module only ever
//! needs to tell a unique leaf from a duplicate-cluster entry, which the
//! self-loop and ring-distance checks below already determine.

use std::collections::HashSet;
use std::fmt::{self, Write};

use crate::node::{Link, Node};

/// Label a node for display. Implemented by callers alongside [`Node`] so
/// `dump` can render something more useful than a raw pointer; the default
/// falls back to the pointer's hex address.
pub trait Describe: Node {
    fn describe(&self) -> String {
        format!("{:p}", self as *const Self)
    }
}

fn node_id<E>(ptr: *const E) -> String {
    format!("n{:x}", ptr as usize)
}

/// Render the tree rooted at `root` as a Graphviz DOT digraph into `out`.
///
/// ## Input
/// - `root`: the tree's root slot. An empty tree renders an empty digraph.
/// - `name`: the digraph's identifier.
///
/// ## Output
/// `Ok(())` on success, or the first formatting error `out` produces.
///
/// ## Performance
/// O(n) node visits, one allocation per node for its label plus the
/// visited set; no recursion depth beyond the tree's own height.
///
/// ## Safety
/// Every element reachable from `root` must be live.
pub unsafe fn dump<E: Describe, W: Write>(root: &Link<E>, name: &str, out: &mut W) -> fmt::Result {
    writeln!(out, "digraph {} {{", name)?;
    writeln!(out, "    node [shape=box, fontname=\"monospace\"];")?;

    if root.is_null() {
        writeln!(out, "}}")?;
        return Ok(());
    }

    let mut visited: HashSet<*const E> = HashSet::new();
    dump_node(root.as_ptr(), &mut visited, out)?;

    writeln!(out, "}}")?;
    Ok(())
}

unsafe fn dump_node<E: Describe, W: Write>(
    ptr: *mut E,
    visited: &mut HashSet<*const E>,
    out: &mut W,
) -> fmt::Result {
    if !visited.insert(ptr as *const E) {
        return Ok(());
    }

    let node: &E = &*ptr;
    let id = node_id(ptr);
    let slot = node.slot();
    let b0 = slot.b[0];
    let b1 = slot.b[1];
    let is_nodeless = b0.as_ptr() == ptr && b1.as_ptr() == ptr;

    let shape = if is_nodeless { "doubleoctagon" } else { "box" };
    writeln!(
        out,
        "    {} [label=\"{}\", shape={}];",
        id,
        node.describe(),
        shape
    )?;

    if is_nodeless {
        return Ok(());
    }

    dump_edge(ptr, b0, 0, out)?;
    dump_edge(ptr, b1, 1, out)?;

    dump_node(b0.as_ptr(), visited, out)?;
    dump_node(b1.as_ptr(), visited, out)?;
    Ok(())
}

unsafe fn dump_edge<E: Describe, W: Write>(
    from: *mut E,
    to: Link<E>,
    side: usize,
    out: &mut W,
) -> fmt::Result {
    let style = if to.as_ptr() == from {
        "style=dashed, color=gray" // self-loop back to the interior node itself
    } else {
        "color=black"
    };
    writeln!(
        out,
        "    {} -> {} [label=\"b{}\", {}];",
        node_id(from),
        node_id(to.as_ptr()),
        side,
        style
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insert::{insert, InsertComparator, Uniqueness};
    use crate::key::ScalarKey;
    use crate::node::NodeSlot;
    use std::cmp::Ordering;

    struct U32Elem {
        key: u32,
        slot: NodeSlot<U32Elem>,
    }

    impl U32Elem {
        fn new(key: u32) -> Box<Self> {
            Box::new(U32Elem {
                key,
                slot: NodeSlot::detached(),
            })
        }
    }

    impl Node for U32Elem {
        fn slot(&self) -> &NodeSlot<Self> {
            &self.slot
        }
        fn slot_mut(&mut self) -> &mut NodeSlot<Self> {
            &mut self.slot
        }
    }

    impl Describe for U32Elem {
        fn describe(&self) -> String {
            format!("key={}", self.key)
        }
    }

    struct U32Cmp {
        key: u32,
    }

    impl crate::descent::DescentComparator<U32Elem> for U32Cmp {
        fn elem_distance(&self, a: &U32Elem, b: &U32Elem) -> u64 {
            u32::branch_distance(a.key, b.key) as u64
        }
        fn key_distance(&self, e: &U32Elem) -> u64 {
            u32::branch_distance(self.key, e.key) as u64
        }
        fn order(&self, e: &U32Elem) -> Ordering {
            self.key.cmp(&e.key)
        }
    }

    impl InsertComparator<U32Elem> for U32Cmp {
        fn side(&self, node: &U32Elem) -> usize {
            u32::key_side(self.key, node.key)
        }
    }

    #[test]
    fn empty_tree_dumps_empty_digraph() {
        let root: Link<U32Elem> = Link::null();
        let mut out = String::new();
        unsafe {
            dump(&root, "t", &mut out).unwrap();
        }
        assert!(out.contains("digraph t"));
        assert!(!out.contains("->"));
    }

    #[test]
    fn nodeless_leaf_dumps_single_node() {
        let mut root: Link<U32Elem> = Link::null();
        let mut a = U32Elem::new(4);
        unsafe {
            insert(&mut root, &mut *a, &U32Cmp { key: 4 }, Uniqueness::Unique);
        }
        let mut out = String::new();
        unsafe {
            dump(&root, "t", &mut out).unwrap();
        }
        assert!(out.contains("key=4"));
        assert!(out.contains("doubleoctagon"));
    }

    #[test]
    fn branching_tree_dumps_all_elements_once() {
        let mut root: Link<U32Elem> = Link::null();
        let mut boxes: Vec<Box<U32Elem>> = [10u32, 5, 15].iter().map(|&k| U32Elem::new(k)).collect();
        unsafe {
            for b in boxes.iter_mut() {
                let k = b.key;
                insert(&mut root, b, &U32Cmp { key: k }, Uniqueness::Unique);
            }
        }
        let mut out = String::new();
        unsafe {
            dump(&root, "t", &mut out).unwrap();
        }
        for k in [10, 5, 15] {
            assert_eq!(out.matches(&format!("key={}", k)).count(), 1);
        }
    }

    #[test]
    fn duplicate_cluster_dumps_without_infinite_recursion() {
        let mut root: Link<U32Elem> = Link::null();
        let mut a = U32Elem::new(1);
        let mut b = U32Elem::new(1);
        let mut c = U32Elem::new(1);
        unsafe {
            insert(&mut root, &mut *a, &U32Cmp { key: 1 }, Uniqueness::Multi);
            insert(&mut root, &mut *b, &U32Cmp { key: 1 }, Uniqueness::Multi);
            insert(&mut root, &mut *c, &U32Cmp { key: 1 }, Uniqueness::Multi);
        }
        let mut out = String::new();
        unsafe {
            dump(&root, "t", &mut out).unwrap();
        }
        assert_eq!(out.matches("key=1").count(), 3);
    }
}
