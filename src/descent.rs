// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! The descent engine: a single parameterised tree traversal used by every
//! other operation (lookup, insert, delete, range, iteration).
//!
//! ## Algorithm
//!
//! Given a root and a walk method, descend recording along the way the
//! pointer slot the current element sits in, the leaf parent and side, the
//! node parent and side (the element's interior-node appearance, which may
//! sit at a shallower depth than its leaf appearance), the grandparent of
//! the leaf, a backtrack anchor for range-operation fallback, and whether
//! the descent ended on a duplicate-key cluster.
//!
//! Termination is checked in a fixed order at every step: monotonicity
//! break, key-definitely-absent, nodeless leaf, duplicate cluster, then
//! (if none fired) pick the closer child and continue.
//!
//! ## Performance
//!
//! O(W) comparisons and pointer dereferences, W the key width in bits (or
//! the bit position of the first differing byte for byte keys). No
//! allocation: the small bookkeeping needed to locate a node's
//! interior-node appearance uses a fixed-size stack array sized for the
//! widest key this crate supports, not a heap-allocated history.

use crate::node::{Link, Node};
use std::cmp::Ordering;

/// Tree walk methods (spec: FIRST/LAST/PREV/NEXT/KEQ/KGE/KGT/KLE/KLT/KNX/KPR).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Walk {
    First,
    Last,
    Prev,
    Next,
    Keq,
    Kge,
    Kgt,
    Kle,
    Klt,
    Knx,
    Kpr,
}

impl Walk {
    /// True for the walk methods that carry a search key.
    pub fn has_key(self) -> bool {
        !matches!(self, Walk::First | Walk::Last | Walk::Prev | Walk::Next)
    }

    /// Side chosen by a keyless walk method at a given step. `first_step`
    /// distinguishes the very first step from an anchor (PREV/NEXT invert
    /// their initial side relative to FIRST/LAST, per spec.md §4.2).
    fn keyless_side(self, first_step: bool) -> usize {
        match self {
            Walk::First => 0,
            Walk::Last => 1,
            Walk::Next => {
                if first_step {
                    1
                } else {
                    0
                }
            }
            Walk::Prev => {
                if first_step {
                    0
                } else {
                    1
                }
            }
            _ => unreachable!("keyless_side called on a key-bearing walk"),
        }
    }

    /// Which turn direction, if taken, updates the backtrack anchor for
    /// this walk method. `None` for walks with no defined fallback (KEQ).
    fn anchor_turn(self) -> Option<usize> {
        match self {
            Walk::Kge | Walk::Kgt | Walk::Knx => Some(0), // left turns, for a NEXT fallback
            Walk::Kle | Walk::Klt | Walk::Kpr => Some(1), // right turns, for a PREV fallback
            _ => None,
        }
    }
}

/// Identifies a mutable child-pointer slot: either the tree's root slot, or
/// a specific child index of a specific resident element. Insert and
/// delete mutate through this handle rather than through owned references,
/// since the tree's links are raw, aliasing-permitted pointers.
#[derive(Debug)]
pub enum ParentSlot<E> {
    Root,
    Child(*mut E, usize),
}

impl<E> Clone for ParentSlot<E> {
    fn clone(&self) -> Self {
        match self {
            ParentSlot::Root => ParentSlot::Root,
            ParentSlot::Child(p, s) => ParentSlot::Child(*p, *s),
        }
    }
}
impl<E> Copy for ParentSlot<E> {}

impl<E: Node> ParentSlot<E> {
    /// Read the current value held in this slot.
    ///
    /// ## Safety
    /// The element behind `Child` must still be live.
    pub unsafe fn get(&self, root: &Link<E>) -> Link<E> {
        match self {
            ParentSlot::Root => *root,
            ParentSlot::Child(p, side) => (**p).slot().b[*side],
        }
    }

    /// Overwrite the value held in this slot.
    ///
    /// ## Safety
    /// The element behind `Child` must still be live and exclusively
    /// accessible.
    pub unsafe fn set(&self, root: &mut Link<E>, value: Link<E>) {
        match self {
            ParentSlot::Root => *root = value,
            ParentSlot::Child(p, side) => (**p).slot_mut().b[*side] = value,
        }
    }
}

/// Per-search-key comparator bundle handed to [`descend`]. One
/// implementation per key kind; see `src/tree.rs` for the concrete
/// comparators used by the typed entry points.
pub trait DescentComparator<E: Node> {
    /// Distance between two resident elements' keys; zero iff equal.
    fn elem_distance(&self, a: &E, b: &E) -> u64;
    /// Distance between the search key and a resident element; zero iff
    /// equal. Only called for key-bearing walks.
    fn key_distance(&self, e: &E) -> u64;
    /// Order of the search key against a resident element. Only called for
    /// key-bearing walks.
    fn order(&self, e: &E) -> Ordering;
}

/// Maximum descent depth this crate's fixed-size bookkeeping supports:
/// generous headroom over the 64-bit key width this crate's widest scalar
/// kind needs, so the node-parent search below never allocates.
const MAX_DEPTH: usize = 128;

/// Result of a single descent.
pub struct Descent<E> {
    /// The located element, if any. For key-bearing walks that missed,
    /// `found` is `None` but the rest of the bookkeeping (in particular
    /// `leaf_parent`) still describes where an insertion would land.
    pub found: Option<*mut E>,
    /// Slot holding the located element (or where it would be inserted).
    pub leaf_parent: ParentSlot<E>,
    /// Slot holding `leaf_parent`'s element, for sibling promotion on delete.
    pub grandparent: ParentSlot<E>,
    /// The found element's interior-node appearance, if it is not the same
    /// storage as `leaf_parent` (see spec.md §3 invariant 3).
    pub node_parent: Option<ParentSlot<E>>,
    /// Deepest ancestor where the descent turned away from the direction a
    /// subsequent NEXT/PREV fallback walk would need.
    pub backtrack: Option<ParentSlot<E>>,
    /// True iff the descent ended on a duplicate-key cluster entry.
    pub is_dup: bool,
}

impl<E> Descent<E> {
    fn empty() -> Self {
        Descent {
            found: None,
            leaf_parent: ParentSlot::Root,
            grandparent: ParentSlot::Root,
            node_parent: None,
            backtrack: None,
            is_dup: false,
        }
    }
}

/// Run a single descent from `root` using walk method `walk` and
/// comparator `cmp`. `cmp` is only consulted for key-bearing walks.
pub fn descend<E: Node, C: DescentComparator<E>>(
    root: &Link<E>,
    walk: Walk,
    cmp: &C,
) -> Descent<E> {
    if root.is_null() {
        return Descent::empty();
    }

    let mut cur: *mut E = root.as_ptr();
    let mut cur_slot: ParentSlot<E> = ParentSlot::Root;
    let mut prior_slot: ParentSlot<E> = ParentSlot::Root;
    let mut prev_distance: Option<u64> = None;
    let mut found_possible = true;
    let mut first_step = true;
    let mut backtrack: Option<ParentSlot<E>> = None;

    // (element visited, side taken, pointer advanced to) for every step
    // that does not terminate; used after the loop to locate the found
    // element's shallower interior-node appearance, if any.
    let mut history: [(*mut E, usize, *mut E); MAX_DEPTH] =
        [(std::ptr::null_mut(), 0, std::ptr::null_mut()); MAX_DEPTH];
    let mut history_len = 0usize;
    let root_ptr = root.as_ptr();

    let mut result = loop {
        let cur_ref: &E = unsafe { &*cur };
        let b0 = cur_ref.slot().b[0];
        let b1 = cur_ref.slot().b[1];
        let is_nodeless = b0.as_ptr() == cur && b1.as_ptr() == cur;

        let c0: &E = unsafe { b0.get() };
        let c1: &E = unsafe { b1.get() };
        let cur_dist = cmp.elem_distance(c0, c1);

        // Condition 1: split-bit monotonicity broken -> already at a leaf.
        if let Some(prev) = prev_distance {
            if cur_dist > prev {
                break Descent {
                    found: Some(cur),
                    leaf_parent: cur_slot,
                    grandparent: prior_slot,
                    node_parent: None,
                    backtrack,
                    is_dup: false,
                };
            }
        }

        let (d0, d1) = if walk.has_key() {
            (cmp.key_distance(c0), cmp.key_distance(c1))
        } else {
            (0, 0)
        };

        // Condition 2: key provably absent. This must be evaluated before
        // conditions 3/4 terminate the descent below: landing on a nodeless
        // leaf or a duplicate cluster that doesn't actually carry the
        // search key must still report "not found", while continuing on to
        // compute the insert anchor.
        if walk.has_key() && found_possible && d0.min(d1) > cur_dist {
            found_possible = false;
        }

        // Condition 3: nodeless leaf (whole-tree single element).
        if is_nodeless {
            break Descent {
                found: Some(cur),
                leaf_parent: cur_slot,
                grandparent: prior_slot,
                node_parent: None,
                backtrack,
                is_dup: false,
            };
        }

        // Condition 4: duplicate-list entry (children share a key).
        if cur_dist == 0 {
            break Descent {
                found: Some(cur),
                leaf_parent: cur_slot,
                grandparent: prior_slot,
                node_parent: None,
                backtrack,
                is_dup: true,
            };
        }

        // Condition 5: pick a side and continue, unless it self-loops.
        let side = if walk.has_key() {
            if d0 < d1 {
                0
            } else {
                1
            }
        } else {
            walk.keyless_side(first_step)
        };
        first_step = false;

        if let Some(turn) = walk.anchor_turn() {
            if side == turn {
                backtrack = Some(cur_slot);
            }
        }

        let next = cur_ref.slot().b[side];
        if next.as_ptr() == cur {
            // Self-loop: `cur` is simultaneously the interior node and its
            // own leaf on this side.
            break Descent {
                found: Some(cur),
                leaf_parent: ParentSlot::Child(cur, side),
                grandparent: cur_slot,
                node_parent: None,
                backtrack,
                is_dup: false,
            };
        }

        if history_len < MAX_DEPTH {
            history[history_len] = (cur, side, next.as_ptr());
            history_len += 1;
        }

        prior_slot = cur_slot;
        cur_slot = ParentSlot::Child(cur, side);
        prev_distance = Some(cur_dist);
        cur = next.as_ptr();
    };

    // Post-descent reconciliation (spec.md §4.2): the descent above only
    // ever proves a key *absent* (condition 2); it never confirms a match.
    // A self-loop or monotonicity-break landing can report an element whose
    // key merely shares the search key's higher bits. KEQ is the one walk
    // whose `found` is consumed directly (lookup/insert/delete) without a
    // caller-side order() check of its own, so reconcile it here.
    if walk == Walk::Keq {
        if let Some(found) = result.found {
            let found_ref: &E = unsafe { &*found };
            if cmp.order(found_ref) != Ordering::Equal {
                result.found = None;
            }
        }
    }

    if !found_possible {
        result.found = None;
    }

    // If the found element's pointer also appears earlier in the descent
    // (its interior-node appearance at a shallower depth), record it. The
    // earliest history entry advancing into `found` is the shallow,
    // interior-node occurrence; a later one (always the last entry) is
    // just the leaf occurrence itself and must not be reported as distinct.
    if let Some(found) = result.found {
        if found == root_ptr && history_len > 0 {
            // The element's interior-node appearance is the root slot
            // itself, which has no `Child(..)` representation.
            result.node_parent = Some(ParentSlot::Root);
        } else {
            for i in 0..history_len {
                let (parent_ptr, side, target) = history[i];
                if target == found {
                    result.node_parent = Some(ParentSlot::Child(parent_ptr, side));
                    break;
                }
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    // Exercised indirectly through `crate::tree` integration tests; the
    // descent engine has no meaningful standalone state to assert on
    // without a concrete element/comparator pair.
}
