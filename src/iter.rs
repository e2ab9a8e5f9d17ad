// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Range and iteration primitives.
//!
//! spec.md §4.5. `first`/`last` locate the smallest/largest resident
//! element; `next`/`prev` step from an existing element; `lookup_ge` /
//! `lookup_gt` / `lookup_le` / `lookup_lt` locate the nearest element
//! satisfying a relational predicate against a search key (Form B only).
//! All of these reduce to a single key-bearing or keyless descent followed
//! by, when the direct descent undershoots, one more keyless descent from
//! the backtrack anchor the first descent recorded — the same anchor
//! mechanism spec.md §4.2 describes for NEXT/PREV fallback.
//!
//! A duplicate cluster is a single descent landing (the tail); stepping
//! within one walks the ring (`next_dup`/`prev_dup`) rather than
//! re-descending, exactly as the cluster was built by `insert.rs`.

use crate::descent::{descend, Descent, DescentComparator, ParentSlot, Walk};
use crate::node::{Link, Node};

/// The element currently occupying the slot a descent terminated on,
/// regardless of whether the search key was actually present there.
unsafe fn terminal<E: Node>(root: &Link<E>, d: &Descent<E>) -> Option<*mut E> {
    let p = d.leaf_parent.get(root);
    if p.is_null() {
        None
    } else {
        Some(p.as_ptr())
    }
}

/// The base (first-inserted) element of the duplicate cluster whose tail
/// is `tail`.
unsafe fn dup_base<E: Node>(tail: *mut E) -> *mut E {
    let tail_ref: &E = &*tail;
    let first_ring = tail_ref.slot().b[1];
    let first_ring_ref: &E = first_ring.get();
    first_ring_ref.slot().b[0].as_ptr()
}

/// The first real ring member (the second-inserted element) of the
/// duplicate cluster whose tail is `tail`.
unsafe fn dup_first_ring<E: Node>(tail: *mut E) -> *mut E {
    (*tail).slot().b[1].as_ptr()
}

/// Next element within a duplicate cluster in insertion order, or `None`
/// once `elem` is the tail (the caller falls back to the next distinct
/// key).
unsafe fn next_dup<E: Node>(tail: *mut E, elem: *mut E) -> Option<*mut E> {
    if elem == dup_base(tail) {
        Some(dup_first_ring(tail))
    } else if elem == tail {
        None
    } else {
        Some((*elem).slot().b[1].as_ptr())
    }
}

/// Previous element within a duplicate cluster in insertion order, or
/// `None` once `elem` is the base (the caller falls back to the previous
/// distinct key).
unsafe fn prev_dup<E: Node>(tail: *mut E, elem: *mut E) -> Option<*mut E> {
    if elem == dup_base(tail) {
        None
    } else {
        Some((*elem).slot().b[0].as_ptr())
    }
}

/// Re-descend from a backtrack anchor with the keyless NEXT walk to find
/// the smallest element past the point a GE/GT/NEXT descent undershot.
/// `NEXT`'s inverted first step takes the anchor's "greater" child, then
/// behaves as FIRST from there on — i.e. the smallest element in the
/// subtree the anchor turned away from.
unsafe fn fallback_next<E: Node, C: DescentComparator<E>>(
    root: &Link<E>,
    backtrack: Option<ParentSlot<E>>,
    cmp: &C,
) -> Option<*mut E> {
    let anchor = backtrack?;
    let anchor_link = Link::of(anchor.get(root).as_ptr());
    let d = descend(&anchor_link, Walk::Next, cmp);
    terminal(&anchor_link, &d)
}

/// Re-descend from a backtrack anchor with the keyless PREV walk to find
/// the largest element before the point a LE/LT/PREV descent undershot.
unsafe fn fallback_prev<E: Node, C: DescentComparator<E>>(
    root: &Link<E>,
    backtrack: Option<ParentSlot<E>>,
    cmp: &C,
) -> Option<*mut E> {
    let anchor = backtrack?;
    let anchor_link = Link::of(anchor.get(root).as_ptr());
    let d = descend(&anchor_link, Walk::Prev, cmp);
    terminal(&anchor_link, &d)
}

/// Smallest resident element, or `None` on an empty tree.
///
/// ## Safety
/// Every element reachable from `root` must be live.
pub unsafe fn first<E: Node, C: DescentComparator<E>>(root: &Link<E>, cmp: &C) -> Option<*mut E> {
    let d = descend(root, Walk::First, cmp);
    let t = terminal(root, &d)?;
    if d.is_dup {
        Some(dup_base(t))
    } else {
        Some(t)
    }
}

/// Largest resident element, or `None` on an empty tree.
///
/// ## Safety
/// Every element reachable from `root` must be live.
pub unsafe fn last<E: Node, C: DescentComparator<E>>(root: &Link<E>, cmp: &C) -> Option<*mut E> {
    let d = descend(root, Walk::Last, cmp);
    terminal(root, &d)
}

/// The element immediately after `elem` in sorted order, or `None` if
/// `elem` is the last resident element.
///
/// ## Safety
/// `cmp` must be bound to `elem`'s key, and `elem` must currently be
/// resident in the tree rooted at `root`.
pub unsafe fn next<E: Node, C: DescentComparator<E>>(
    root: &Link<E>,
    elem: *mut E,
    cmp: &C,
) -> Option<*mut E> {
    let d = descend(root, Walk::Knx, cmp);
    if let Some(t) = terminal(root, &d) {
        if d.is_dup {
            if let Some(n) = next_dup(t, elem) {
                return Some(n);
            }
        }
    }
    fallback_next(root, d.backtrack, cmp)
}

/// The element immediately before `elem` in sorted order, or `None` if
/// `elem` is the first resident element.
///
/// ## Safety
/// `cmp` must be bound to `elem`'s key, and `elem` must currently be
/// resident in the tree rooted at `root`.
pub unsafe fn prev<E: Node, C: DescentComparator<E>>(
    root: &Link<E>,
    elem: *mut E,
    cmp: &C,
) -> Option<*mut E> {
    let d = descend(root, Walk::Kpr, cmp);
    if let Some(t) = terminal(root, &d) {
        if d.is_dup {
            if let Some(p) = prev_dup(t, elem) {
                return Some(p);
            }
        }
    }
    fallback_prev(root, d.backtrack, cmp)
}

/// The element immediately after `elem` within its own duplicate cluster,
/// or `None` if `elem` is not a duplicate or is the cluster's tail (the
/// most-recently-inserted member).
///
/// ## Safety
/// `cmp` must be bound to `elem`'s key, and `elem` must currently be
/// resident in the tree rooted at `root`.
pub unsafe fn next_dup_of<E: Node, C: DescentComparator<E>>(
    root: &Link<E>,
    elem: *mut E,
    cmp: &C,
) -> Option<*mut E> {
    let d = descend(root, Walk::Keq, cmp);
    let t = terminal(root, &d)?;
    if d.is_dup {
        next_dup(t, elem)
    } else {
        None
    }
}

/// The element immediately before `elem` within its own duplicate cluster,
/// or `None` if `elem` is not a duplicate or is the cluster's base (the
/// first-ever-inserted member).
///
/// ## Safety
/// `cmp` must be bound to `elem`'s key, and `elem` must currently be
/// resident in the tree rooted at `root`.
pub unsafe fn prev_dup_of<E: Node, C: DescentComparator<E>>(
    root: &Link<E>,
    elem: *mut E,
    cmp: &C,
) -> Option<*mut E> {
    let d = descend(root, Walk::Keq, cmp);
    let t = terminal(root, &d)?;
    if d.is_dup {
        prev_dup(t, elem)
    } else {
        None
    }
}

/// The smallest resident element with a key strictly greater than `elem`'s,
/// skipping past the rest of `elem`'s duplicate cluster if it has one —
/// unlike [`next`], which walks the cluster one member at a time.
///
/// ## Safety
/// `cmp` must be bound to `elem`'s key, and `elem` must currently be
/// resident in the tree rooted at `root`.
pub unsafe fn next_unique<E: Node, C: DescentComparator<E>>(
    root: &Link<E>,
    cmp: &C,
) -> Option<*mut E> {
    let d = descend(root, Walk::Knx, cmp);
    fallback_next(root, d.backtrack, cmp)
}

/// The largest resident element with a key strictly less than `elem`'s,
/// skipping past the rest of `elem`'s duplicate cluster if it has one.
///
/// ## Safety
/// `cmp` must be bound to `elem`'s key, and `elem` must currently be
/// resident in the tree rooted at `root`.
pub unsafe fn prev_unique<E: Node, C: DescentComparator<E>>(
    root: &Link<E>,
    cmp: &C,
) -> Option<*mut E> {
    let d = descend(root, Walk::Kpr, cmp);
    fallback_prev(root, d.backtrack, cmp)
}

/// Smallest resident element with key >= `cmp`'s key.
///
/// ## Safety
/// Every element reachable from `root` must be live.
pub unsafe fn lookup_ge<E: Node, C: DescentComparator<E>>(root: &Link<E>, cmp: &C) -> Option<*mut E> {
    let d = descend(root, Walk::Kge, cmp);
    let t = terminal(root, &d)?;
    if cmp.order(&*t) != std::cmp::Ordering::Greater {
        Some(t)
    } else {
        fallback_next(root, d.backtrack, cmp)
    }
}

/// Smallest resident element with key > `cmp`'s key.
///
/// ## Safety
/// Every element reachable from `root` must be live.
pub unsafe fn lookup_gt<E: Node, C: DescentComparator<E>>(root: &Link<E>, cmp: &C) -> Option<*mut E> {
    let d = descend(root, Walk::Kgt, cmp);
    let t = terminal(root, &d)?;
    if cmp.order(&*t) == std::cmp::Ordering::Less {
        Some(t)
    } else {
        fallback_next(root, d.backtrack, cmp)
    }
}

/// Largest resident element with key <= `cmp`'s key.
///
/// ## Safety
/// Every element reachable from `root` must be live.
pub unsafe fn lookup_le<E: Node, C: DescentComparator<E>>(root: &Link<E>, cmp: &C) -> Option<*mut E> {
    let d = descend(root, Walk::Kle, cmp);
    let t = terminal(root, &d)?;
    if cmp.order(&*t) != std::cmp::Ordering::Less {
        Some(t)
    } else {
        fallback_prev(root, d.backtrack, cmp)
    }
}

/// Largest resident element with key < `cmp`'s key.
///
/// ## Safety
/// Every element reachable from `root` must be live.
pub unsafe fn lookup_lt<E: Node, C: DescentComparator<E>>(root: &Link<E>, cmp: &C) -> Option<*mut E> {
    let d = descend(root, Walk::Klt, cmp);
    let t = terminal(root, &d)?;
    if cmp.order(&*t) == std::cmp::Ordering::Greater {
        Some(t)
    } else {
        fallback_prev(root, d.backtrack, cmp)
    }
}

/// A forward- or backward-stepping iterator over resident elements,
/// starting from a located element and walking via [`next`]/[`prev`].
/// Mirrors the teacher's `RangeScanIterator`: cheap to construct, no
/// buffering, one descent (amortised O(1) for balanced-ish trees, O(W)
/// worst case) per step.
pub struct Cursor<'a, E: Node, C: DescentComparator<E>> {
    root: &'a Link<E>,
    cmp: C,
    cur: Option<*mut E>,
    forward: bool,
}

impl<'a, E: Node, C: DescentComparator<E>> Cursor<'a, E, C> {
    /// Build a cursor that will yield `start` first, then step with `next`
    /// (`forward = true`) or `prev` (`forward = false`). Pass `start =
    /// None` for an immediately-exhausted cursor (e.g. an empty tree).
    ///
    /// ## Safety
    /// `start`, if present, must be resident in the tree rooted at `root`,
    /// and `cmp` must be bound to `start`'s key.
    pub unsafe fn new(root: &'a Link<E>, start: Option<*mut E>, cmp: C, forward: bool) -> Self {
        Cursor {
            root,
            cmp,
            cur: start,
            forward,
        }
    }
}

impl<'a, E: Node, C: DescentComparator<E>> Iterator for Cursor<'a, E, C> {
    type Item = *mut E;

    fn next(&mut self) -> Option<*mut E> {
        let cur = self.cur?;
        self.cur = unsafe {
            if self.forward {
                next(self.root, cur, &self.cmp)
            } else {
                prev(self.root, cur, &self.cmp)
            }
        };
        Some(cur)
    }
}
