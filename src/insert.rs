// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Insert: a thin wrapper over the descent engine.
//!
//! spec.md §4.3. Three cases, in order: the tree is empty and the new
//! element becomes the sole nodeless leaf; the key is new and the element
//! is spliced in as the leaf-parent's child; or the key already resides in
//! the tree, in which case Form A (`Unique`) returns the resident element
//! unchanged while Form B (`Multi`) splices the new element onto the tail
//! of the duplicate ring.

use crate::descent::{descend, DescentComparator, Walk};
use crate::node::{Link, Node};

/// Whether a tree accepts duplicate keys (Form B, "elastic") or rejects
/// them (Form A, "canonical").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Uniqueness {
    Unique,
    Multi,
}

/// A comparator bound to the key of the element being inserted. Extends
/// [`DescentComparator`] with the side decision spec.md §4.1 calls
/// `key_side` — needed only at the moment of splicing a new leaf in, never
/// during the descent itself (which compares children's distances to each
/// other, not to a fixed side rule).
pub trait InsertComparator<E: Node>: DescentComparator<E> {
    /// Side (0/1) this comparator's key should take relative to `node`.
    fn side(&self, node: &E) -> usize;
}

/// Insert `new` into the tree rooted at `root`.
///
/// ## Input
/// - `root`: the tree's root slot.
/// - `new`: pointer to a detached element (`new.is_detached()`) whose key
///   field is already initialised.
/// - `cmp`: a comparator bound to `new`'s key.
/// - `mode`: `Unique` (Form A) or `Multi` (Form B).
///
/// ## Output
/// - `new` itself, on a successful insert (first element, new key, or a
///   spliced duplicate).
/// - The pre-existing element with the same key, unchanged, when `mode` is
///   `Unique` and the key is already resident.
///
/// ## Performance
/// O(W): one descent, no allocation.
///
/// ## Safety
/// `new` must not already be resident in any tree, and must outlive its
/// residency in this one.
pub unsafe fn insert<E: Node, C: InsertComparator<E>>(
    root: &mut Link<E>,
    new: *mut E,
    cmp: &C,
    mode: Uniqueness,
) -> *mut E {
    if root.is_null() {
        let slot = (*new).slot_mut();
        slot.b[0] = Link::of(new);
        slot.b[1] = Link::of(new);
        *root = Link::of(new);
        return new;
    }

    let d = descend(root, Walk::Keq, cmp);

    match d.found {
        None => {
            let parent = d.leaf_parent;
            let old = parent.get(root);
            let old_ref: &E = old.get();
            let side = cmp.side(old_ref);

            let new_ref = &mut *new;
            new_ref.slot_mut().b[side] = Link::of(new);
            new_ref.slot_mut().b[1 - side] = old;
            parent.set(root, Link::of(new));
            new
        }
        Some(existing) => match mode {
            Uniqueness::Unique => existing,
            Uniqueness::Multi => {
                let parent = d.leaf_parent;
                let old = parent.get(root);
                debug_assert_eq!(old.as_ptr(), existing);

                let new_ref = &mut *new;
                new_ref.slot_mut().b[0] = old;
                if d.is_dup {
                    let existing_ref: &E = old.get();
                    let ring_next = existing_ref.slot().b[1];
                    new_ref.slot_mut().b[1] = ring_next;
                    (*existing).slot_mut().b[1] = Link::of(new);
                } else {
                    new_ref.slot_mut().b[1] = Link::of(new);
                }
                parent.set(root, Link::of(new));
                new
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
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

    struct U32Cmp {
        key: u32,
    }

    impl DescentComparator<U32Elem> for U32Cmp {
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
    fn first_insert_becomes_nodeless_leaf() {
        let mut root: Link<U32Elem> = Link::null();
        let mut a = U32Elem::new(4);
        let p = unsafe { insert(&mut root, &mut *a, &U32Cmp { key: 4 }, Uniqueness::Unique) };
        assert_eq!(p, &mut *a as *mut U32Elem);
        assert!(a.is_nodeless_leaf());
        assert_eq!(root.as_ptr(), p);
    }

    #[test]
    fn unique_collision_returns_resident() {
        let mut root: Link<U32Elem> = Link::null();
        let mut a = U32Elem::new(4);
        unsafe { insert(&mut root, &mut *a, &U32Cmp { key: 4 }, Uniqueness::Unique) };

        let mut b = U32Elem::new(4);
        let ret = unsafe { insert(&mut root, &mut *b, &U32Cmp { key: 4 }, Uniqueness::Unique) };
        assert_eq!(ret, &mut *a as *mut U32Elem);
        assert!(b.is_detached());
    }

    #[test]
    fn distinct_keys_form_a_branch() {
        let mut root: Link<U32Elem> = Link::null();
        let mut a = U32Elem::new(2);
        let mut b = U32Elem::new(6);
        unsafe {
            insert(&mut root, &mut *a, &U32Cmp { key: 2 }, Uniqueness::Unique);
            insert(&mut root, &mut *b, &U32Cmp { key: 6 }, Uniqueness::Unique);
        }
        assert!(!a.is_nodeless_leaf());
        assert!(b.is_nodeless_leaf());
    }

    #[test]
    fn absent_key_past_a_self_looping_leaf_is_inserted() {
        // Regression test: {2,4}, then insert 6. 6 shares its high bits with
        // the resident leaf 4 (root's self-loop side), so a descent that
        // skips spec.md §4.2's post-match order() check reports a false
        // collision with 4 and silently drops the insert (scenario S1).
        let mut root: Link<U32Elem> = Link::null();
        let mut a = U32Elem::new(2);
        let mut b = U32Elem::new(4);
        let mut c = U32Elem::new(6);
        unsafe {
            insert(&mut root, &mut *a, &U32Cmp { key: 2 }, Uniqueness::Unique);
            insert(&mut root, &mut *b, &U32Cmp { key: 4 }, Uniqueness::Unique);
            let ret = insert(&mut root, &mut *c, &U32Cmp { key: 6 }, Uniqueness::Unique);
            assert_eq!(ret, &mut *c as *mut U32Elem);
        }
        assert!(!c.is_detached());

        let d = unsafe { descend(&root, Walk::Keq, &U32Cmp { key: 6 }) };
        assert_eq!(d.found, Some(&mut c as *mut U32Elem));

        let d4 = unsafe { descend(&root, Walk::Keq, &U32Cmp { key: 4 }) };
        assert_eq!(d4.found, Some(&mut b as *mut U32Elem));
    }

    #[test]
    fn multi_mode_chains_duplicates() {
        let mut root: Link<U32Elem> = Link::null();
        let mut a = U32Elem::new(1);
        let mut b = U32Elem::new(1);
        let mut c = U32Elem::new(1);
        unsafe {
            insert(&mut root, &mut *a, &U32Cmp { key: 1 }, Uniqueness::Multi);
            insert(&mut root, &mut *b, &U32Cmp { key: 1 }, Uniqueness::Multi);
            insert(&mut root, &mut *c, &U32Cmp { key: 1 }, Uniqueness::Multi);
        }
        // root now holds the dup-list tail (c); its elem_distance(b[0], b[1])
        // to itself is zero, i.e. it is detected as a duplicate cluster.
        assert_eq!(root.as_ptr(), &mut *c as *mut U32Elem);
    }

    #[test]
    fn distinct_key_after_dup_cluster_forms_new_branch() {
        // Regression test for the descent ordering bug where landing on a
        // dup cluster that doesn't carry the search key was mistaken for a
        // match: spec.md §4.2 condition 2 must be evaluated before 3/4.
        let mut root: Link<U32Elem> = Link::null();
        let mut a = U32Elem::new(1);
        let mut b = U32Elem::new(1);
        let mut c = U32Elem::new(1);
        let mut d = U32Elem::new(2);
        unsafe {
            insert(&mut root, &mut *a, &U32Cmp { key: 1 }, Uniqueness::Multi);
            insert(&mut root, &mut *b, &U32Cmp { key: 1 }, Uniqueness::Multi);
            insert(&mut root, &mut *c, &U32Cmp { key: 1 }, Uniqueness::Multi);
            insert(&mut root, &mut *d, &U32Cmp { key: 2 }, Uniqueness::Multi);
        }
        assert_eq!(root.as_ptr(), &mut *d as *mut U32Elem);
        assert_eq!(d.slot.b[0].as_ptr(), &mut *c as *mut U32Elem);
    }
}
