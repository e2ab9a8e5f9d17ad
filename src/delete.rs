// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Delete: a thin wrapper over the descent engine.
//!
//! spec.md §4.4. Works on either a specific resident element (to disambiguate
//! which member of a duplicate cluster to remove) or on a key alone (`pick`,
//! which removes whichever element the descent locates first). Both route
//! through [`remove`], which dispatches on the descent's duplicate flag:
//! a unique leaf is detached by promoting its sibling into the grandparent
//! slot and, if the leaf also served as a shallower interior-node appearance
//! for an unrelated subtree (spec.md §3 invariant 3), relocating that role
//! into the vacated leaf-parent storage. A duplicate-cluster member is
//! detached by removing it from the cluster's insertion-ordered member list
//! and replaying the remaining members' splices — the same splice sequence
//! `insert.rs` already uses to build the cluster, so the rebuilt ring is
//! correct by construction rather than by ad hoc pointer surgery.

use crate::descent::{descend, DescentComparator, ParentSlot, Walk};
use crate::node::{Link, Node};

fn slot_eq<E>(a: &ParentSlot<E>, b: &ParentSlot<E>) -> bool {
    match (a, b) {
        (ParentSlot::Root, ParentSlot::Root) => true,
        (ParentSlot::Child(p1, s1), ParentSlot::Child(p2, s2)) => p1 == p2 && s1 == s2,
        _ => false,
    }
}

/// Collect a duplicate cluster's members in insertion order: the base
/// element (reached via `tail.b[1].b[0]`) followed by the ring walked
/// forward from `tail.b[1]` through to `tail` itself.
unsafe fn ordered_dup_members<E: Node>(tail: *mut E) -> Vec<*mut E> {
    let tail_ref: &E = &*tail;
    let first_ring = tail_ref.slot().b[1];
    let first_ring_ref: &E = first_ring.get();
    let base = first_ring_ref.slot().b[0];

    let mut members = vec![base.as_ptr()];
    let mut cur = first_ring.as_ptr();
    loop {
        members.push(cur);
        if cur == tail {
            break;
        }
        cur = (*cur).slot().b[1].as_ptr();
    }
    members
}

/// Rebuild a duplicate cluster from an ordered (insertion-order) member
/// list, replaying the same splice sequence `insert.rs` uses so the result
/// is a valid ring/base pair by construction. `members.len() >= 1`.
/// Returns the new tail (the slot value the caller should anchor).
unsafe fn rebuild_dup_cluster<E: Node>(members: &[*mut E]) -> *mut E {
    let base = members[0];
    (*base).slot_mut().b[0] = Link::of(base);
    (*base).slot_mut().b[1] = Link::of(base);

    let mut anchor = base;
    let mut anchor_is_dup = false;
    for &m in &members[1..] {
        (*m).slot_mut().b[0] = Link::of(anchor);
        if anchor_is_dup {
            let carried = (*anchor).slot().b[1];
            (*m).slot_mut().b[1] = carried;
            (*anchor).slot_mut().b[1] = Link::of(m);
        } else {
            (*m).slot_mut().b[1] = Link::of(m);
        }
        anchor = m;
        anchor_is_dup = true;
    }
    anchor
}

unsafe fn remove_dup<E: Node>(
    root: &mut Link<E>,
    anchor_slot: ParentSlot<E>,
    tail: *mut E,
    target: Option<*mut E>,
) -> Option<*mut E> {
    let mut members = ordered_dup_members(tail);
    let base = members[0];
    let victim = target.unwrap_or(base);
    let pos = members.iter().position(|&m| m == victim)?;
    members.remove(pos);

    let new_tail = rebuild_dup_cluster(&members);
    anchor_slot.set(root, Link::of(new_tail));

    (*victim).mark_detached();
    Some(victim)
}

unsafe fn remove_unique<E: Node>(
    root: &mut Link<E>,
    d: &crate::descent::Descent<E>,
    found: *mut E,
    target: Option<*mut E>,
) -> Option<*mut E> {
    if let Some(t) = target {
        if t != found {
            return None;
        }
    }

    if let ParentSlot::Root = d.leaf_parent {
        // Single-element tree: condition 1 cannot fire on the first step and
        // condition 4 (dup) was already ruled out by the caller, so reaching
        // the root here means the root element is the global nodeless leaf.
        *root = Link::null();
        (*found).mark_detached();
        return Some(found);
    }

    let (p_ptr, lside) = match d.leaf_parent {
        ParentSlot::Child(p, s) => (p, s),
        ParentSlot::Root => unreachable!(),
    };
    let sibling = (*p_ptr).slot().b[1 - lside];
    d.grandparent.set(root, sibling);

    if sibling.as_ptr() == p_ptr {
        // The leaf's sibling was a self-loop back to its own parent: that
        // parent is now the sole remaining element at this position.
        (*p_ptr).slot_mut().b[0] = Link::of(p_ptr);
        (*p_ptr).slot_mut().b[1] = Link::of(p_ptr);
    } else if let Some(np) = d.node_parent {
        if !slot_eq(&np, &d.leaf_parent) {
            // `found` also served as a shallower interior-node appearance
            // for an unrelated subtree; relocate that role into the
            // leaf-parent storage being vacated.
            let found_ref: &E = &*found;
            let (c0, c1) = (found_ref.slot().b[0], found_ref.slot().b[1]);
            (*p_ptr).slot_mut().b[0] = c0;
            (*p_ptr).slot_mut().b[1] = c1;
            np.set(root, Link::of(p_ptr));
        }
    }

    (*found).mark_detached();
    Some(found)
}

/// Core of both `delete` and `pick`: descend for `cmp`'s key, then detach
/// whichever element `target` identifies (or the descent's default match
/// when `target` is `None`).
///
/// ## Safety
/// Any element passed as `target` must currently be resident in the tree
/// rooted at `root`.
unsafe fn remove<E: Node, C: DescentComparator<E>>(
    root: &mut Link<E>,
    target: Option<*mut E>,
    cmp: &C,
) -> Option<*mut E> {
    if let Some(t) = target {
        if (*t).is_detached() {
            return None;
        }
    }
    if root.is_null() {
        return None;
    }

    let d = descend(root, Walk::Keq, cmp);
    let found = d.found?;

    if d.is_dup {
        remove_dup(root, d.leaf_parent, found, target)
    } else {
        remove_unique(root, &d, found, target)
    }
}

/// Detach a specific resident element. Idempotent: returns `None` without
/// touching the tree if `elem` is already detached.
///
/// ## Safety
/// `elem` must be a pointer either to a detached element or to one
/// currently resident in the tree rooted at `root`, and `cmp` must be bound
/// to `elem`'s key.
pub unsafe fn delete<E: Node, C: DescentComparator<E>>(
    root: &mut Link<E>,
    elem: *mut E,
    cmp: &C,
) -> Option<*mut E> {
    remove(root, Some(elem), cmp)
}

/// Detach and return the first element matching `cmp`'s key, or `None` if
/// the tree has no such element.
///
/// ## Safety
/// `cmp` must be bound to the key being searched for.
pub unsafe fn pick<E: Node, C: DescentComparator<E>>(root: &mut Link<E>, cmp: &C) -> Option<*mut E> {
    remove(root, None, cmp)
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

    unsafe fn ins(root: &mut Link<U32Elem>, e: &mut U32Elem, key: u32, mode: Uniqueness) -> *mut U32Elem {
        insert(root, e, &U32Cmp { key }, mode)
    }

    #[test]
    fn delete_sole_element_empties_root() {
        let mut root: Link<U32Elem> = Link::null();
        let mut a = U32Elem::new(4);
        unsafe {
            ins(&mut root, &mut a, 4, Uniqueness::Unique);
            let removed = delete(&mut root, &mut *a, &U32Cmp { key: 4 });
            assert_eq!(removed, Some(&mut *a as *mut U32Elem));
        }
        assert!(root.is_null());
        assert!(a.is_detached());
    }

    #[test]
    fn delete_is_idempotent_on_detached_element() {
        let mut root: Link<U32Elem> = Link::null();
        let mut a = U32Elem::new(4);
        unsafe {
            ins(&mut root, &mut a, 4, Uniqueness::Unique);
            delete(&mut root, &mut *a, &U32Cmp { key: 4 });
            let second = delete(&mut root, &mut *a, &U32Cmp { key: 4 });
            assert_eq!(second, None);
        }
    }

    #[test]
    fn delete_unique_leaf_promotes_sibling() {
        // Scenario S2 (spec.md §8): 10,5,15,3,7,12,20, then delete 5.
        let mut root: Link<U32Elem> = Link::null();
        let mut boxes: Vec<Box<U32Elem>> = [10u32, 5, 15, 3, 7, 12, 20]
            .iter()
            .map(|&k| U32Elem::new(k))
            .collect();
        unsafe {
            for b in boxes.iter_mut() {
                let k = b.key;
                ins(&mut root, b, k, Uniqueness::Unique);
            }
            let five_ptr = &mut *boxes[1] as *mut U32Elem;
            let removed = delete(&mut root, five_ptr, &U32Cmp { key: 5 });
            assert_eq!(removed, Some(five_ptr));
            assert!((*five_ptr).is_detached());

            let d = descend(&root, Walk::Keq, &U32Cmp { key: 5 });
            assert!(d.found.is_none());
        }
    }

    #[test]
    fn delete_middle_dup_preserves_fifo_order() {
        // Scenario S4 (spec.md §8): key=1 x3 (A,B,C), key=2 (D), key=1 (E),
        // then delete B -> iteration order becomes A, C, E, D.
        let mut root: Link<U32Elem> = Link::null();
        let mut a = U32Elem::new(1);
        let mut b = U32Elem::new(1);
        let mut c = U32Elem::new(1);
        let mut d_elem = U32Elem::new(2);
        let mut e = U32Elem::new(1);
        unsafe {
            ins(&mut root, &mut a, 1, Uniqueness::Multi);
            ins(&mut root, &mut b, 1, Uniqueness::Multi);
            ins(&mut root, &mut c, 1, Uniqueness::Multi);
            ins(&mut root, &mut d_elem, 2, Uniqueness::Multi);
            ins(&mut root, &mut e, 1, Uniqueness::Multi);

            let b_ptr = &mut *b as *mut U32Elem;
            let removed = delete(&mut root, b_ptr, &U32Cmp { key: 1 });
            assert_eq!(removed, Some(b_ptr));

            let tail = descend(&root, Walk::Keq, &U32Cmp { key: 1 }).found.unwrap();
            let members = ordered_dup_members(tail);
            assert_eq!(
                members,
                vec![
                    &mut a as *mut U32Elem,
                    &mut c as *mut U32Elem,
                    &mut e as *mut U32Elem,
                ]
            );
        }
    }

    #[test]
    fn pick_removes_first_match_by_key() {
        let mut root: Link<U32Elem> = Link::null();
        let mut a = U32Elem::new(2);
        let mut b = U32Elem::new(4);
        unsafe {
            ins(&mut root, &mut a, 2, Uniqueness::Unique);
            ins(&mut root, &mut b, 4, Uniqueness::Unique);
            let picked = pick(&mut root, &U32Cmp { key: 4 });
            assert_eq!(picked, Some(&mut b as *mut U32Elem));
            assert!(b.is_detached());
        }
    }

    #[test]
    fn pick_on_empty_tree_returns_none() {
        let mut root: Link<U32Elem> = Link::null();
        unsafe {
            assert_eq!(pick(&mut root, &U32Cmp { key: 1 }), None);
        }
    }
}
