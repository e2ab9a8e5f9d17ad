// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Typed entry points.
//!
//! spec.md §6. The descent engine and `insert`/`delete`/`iter` are generic
//! over any [`Node`] element and any [`DescentComparator`]; this module
//! supplies the comparators for each key kind the external interface names
//! (`U32`, `U64`, `UWORD`, `ADDR`, `MB`/`IM`, `ST`/`IS`) and wires them, plus
//! a compile-time uniqueness marker, into one generic [`CebTree`] that the
//! public type aliases specialise. The duplication spec.md §6's operation
//! table implies across typed entry points collapses here to instantiating
//! one generic a dozen different ways rather than writing the traversal out
//! a dozen times.

use std::cmp::Ordering;
use std::marker::PhantomData;

use crate::delete;
use crate::descent::{descend, DescentComparator, Walk};
use crate::error::{CebError, CebResult};
use crate::insert::{self, InsertComparator, Uniqueness};
use crate::iter;
use crate::key::{self, ScalarKey, UWord};
use crate::node::{KeyedBytes, KeyedScalar, Link, Node};

/// Marker for Form A ("canonical"): `insert` on an already-present key
/// returns the resident element unchanged.
pub struct Unique;
/// Marker for Form B ("elastic"): `insert` on an already-present key
/// appends to the key's duplicate ring.
pub struct Multi;

/// Resolves a [`CebTree`]'s compile-time uniqueness marker to the runtime
/// flag `insert.rs` dispatches on.
pub trait UniquenessMode {
    const MODE: Uniqueness;
}
impl UniquenessMode for Unique {
    const MODE: Uniqueness = Uniqueness::Unique;
}
impl UniquenessMode for Multi {
    const MODE: Uniqueness = Uniqueness::Multi;
}

/// Builds the concrete comparator for one key kind, either from a search
/// key value or from a resident element's own key. `tree.rs`'s generic
/// engine never compares keys itself; it only ever asks a [`KeyKind`] for a
/// comparator and hands that to `descent.rs`/`insert.rs`/`iter.rs`.
pub trait KeyKind<E: Node> {
    type Key: Copy + Default;
    type Cmp: InsertComparator<E>;

    fn cmp_for_key(key: Self::Key) -> Self::Cmp;
    fn cmp_for_elem(elem: &E) -> Self::Cmp;
}

/// Comparator for a fixed-width `u32` key (the `U32` key kind).
pub struct ScalarCmp32 {
    pub key: u32,
}
impl<E: KeyedScalar<u32> + Node> DescentComparator<E> for ScalarCmp32 {
    fn elem_distance(&self, a: &E, b: &E) -> u64 {
        u32::branch_distance(a.key_scalar(), b.key_scalar()) as u64
    }
    fn key_distance(&self, e: &E) -> u64 {
        u32::branch_distance(self.key, e.key_scalar()) as u64
    }
    fn order(&self, e: &E) -> Ordering {
        self.key.cmp(&e.key_scalar())
    }
}
impl<E: KeyedScalar<u32> + Node> InsertComparator<E> for ScalarCmp32 {
    fn side(&self, node: &E) -> usize {
        u32::key_side(self.key, node.key_scalar())
    }
}

/// Comparator for a fixed-width `u64` key (the `U64` key kind).
pub struct ScalarCmp64 {
    pub key: u64,
}
impl<E: KeyedScalar<u64> + Node> DescentComparator<E> for ScalarCmp64 {
    fn elem_distance(&self, a: &E, b: &E) -> u64 {
        u64::branch_distance(a.key_scalar(), b.key_scalar())
    }
    fn key_distance(&self, e: &E) -> u64 {
        u64::branch_distance(self.key, e.key_scalar())
    }
    fn order(&self, e: &E) -> Ordering {
        self.key.cmp(&e.key_scalar())
    }
}
impl<E: KeyedScalar<u64> + Node> InsertComparator<E> for ScalarCmp64 {
    fn side(&self, node: &E) -> usize {
        u64::key_side(self.key, node.key_scalar())
    }
}

/// Comparator for the native-word `UWORD` key kind (`u32` on 32-bit
/// targets, `u64` on 64-bit ones; see `key.rs`).
pub struct ScalarCmpWord {
    pub key: UWord,
}
impl<E: KeyedScalar<UWord> + Node> DescentComparator<E> for ScalarCmpWord {
    fn elem_distance(&self, a: &E, b: &E) -> u64 {
        UWord::branch_distance(a.key_scalar(), b.key_scalar()) as u64
    }
    fn key_distance(&self, e: &E) -> u64 {
        UWord::branch_distance(self.key, e.key_scalar()) as u64
    }
    fn order(&self, e: &E) -> Ordering {
        self.key.cmp(&e.key_scalar())
    }
}
impl<E: KeyedScalar<UWord> + Node> InsertComparator<E> for ScalarCmpWord {
    fn side(&self, node: &E) -> usize {
        UWord::key_side(self.key, node.key_scalar())
    }
}

/// Marks an element whose key is its own storage address (the `ADDR` key
/// kind): no dedicated field, just `&self as usize`.
pub trait KeyedAddr: Node {
    fn key_addr(&self) -> usize {
        self as *const Self as usize
    }
}

/// Comparator for the `ADDR` key kind.
pub struct AddrCmp {
    pub key: usize,
}
impl<E: KeyedAddr> DescentComparator<E> for AddrCmp {
    fn elem_distance(&self, a: &E, b: &E) -> u64 {
        usize::branch_distance(a.key_addr(), b.key_addr()) as u64
    }
    fn key_distance(&self, e: &E) -> u64 {
        usize::branch_distance(self.key, e.key_addr()) as u64
    }
    fn order(&self, e: &E) -> Ordering {
        self.key.cmp(&e.key_addr())
    }
}
impl<E: KeyedAddr> InsertComparator<E> for AddrCmp {
    fn side(&self, node: &E) -> usize {
        usize::key_side(self.key, node.key_addr())
    }
}

/// `U32` key kind marker for [`KeyKind`].
pub struct U32Key;
impl<E: KeyedScalar<u32> + Node> KeyKind<E> for U32Key {
    type Key = u32;
    type Cmp = ScalarCmp32;
    fn cmp_for_key(key: u32) -> ScalarCmp32 {
        ScalarCmp32 { key }
    }
    fn cmp_for_elem(elem: &E) -> ScalarCmp32 {
        ScalarCmp32 {
            key: elem.key_scalar(),
        }
    }
}

/// `U64` key kind marker for [`KeyKind`].
pub struct U64Key;
impl<E: KeyedScalar<u64> + Node> KeyKind<E> for U64Key {
    type Key = u64;
    type Cmp = ScalarCmp64;
    fn cmp_for_key(key: u64) -> ScalarCmp64 {
        ScalarCmp64 { key }
    }
    fn cmp_for_elem(elem: &E) -> ScalarCmp64 {
        ScalarCmp64 {
            key: elem.key_scalar(),
        }
    }
}

/// `UWORD` key kind marker for [`KeyKind`].
pub struct UWordKey;
impl<E: KeyedScalar<UWord> + Node> KeyKind<E> for UWordKey {
    type Key = UWord;
    type Cmp = ScalarCmpWord;
    fn cmp_for_key(key: UWord) -> ScalarCmpWord {
        ScalarCmpWord { key }
    }
    fn cmp_for_elem(elem: &E) -> ScalarCmpWord {
        ScalarCmpWord {
            key: elem.key_scalar(),
        }
    }
}

/// `ADDR` key kind marker for [`KeyKind`].
pub struct AddrKey;
impl<E: KeyedAddr> KeyKind<E> for AddrKey {
    type Key = usize;
    type Cmp = AddrCmp;
    fn cmp_for_key(key: usize) -> AddrCmp {
        AddrCmp { key }
    }
    fn cmp_for_elem(elem: &E) -> AddrCmp {
        AddrCmp {
            key: elem.key_addr(),
        }
    }
}

/// The generic tree engine shared by every typed alias below: a root slot,
/// a key kind, and a compile-time uniqueness marker. Zero runtime
/// overhead beyond the root pointer itself — `K` and `U` are phantom.
pub struct CebTree<E, K, U> {
    root: Link<E>,
    _kind: PhantomData<K>,
    _uniq: PhantomData<U>,
}

impl<E: Node, K: KeyKind<E>, U: UniquenessMode> CebTree<E, K, U> {
    pub const fn new() -> Self {
        CebTree {
            root: Link::null(),
            _kind: PhantomData,
            _uniq: PhantomData,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_null()
    }

    /// Insert `elem`, whose key field is already initialised. Returns
    /// `elem` on a successful insert, or (Form A only) the pre-existing
    /// element when the key already has a resident.
    ///
    /// ## Safety
    /// `elem` must not already be resident in any tree.
    pub unsafe fn insert(&mut self, elem: *mut E) -> *mut E {
        let cmp = K::cmp_for_elem(&*elem);
        insert::insert(&mut self.root, elem, &cmp, U::MODE)
    }

    /// The resident element with key `key`, if any.
    ///
    /// ## Safety
    /// Every element reachable from this tree's root must be live.
    pub unsafe fn lookup(&self, key: K::Key) -> Option<*mut E> {
        let cmp = K::cmp_for_key(key);
        descend(&self.root, Walk::Keq, &cmp).found
    }

    /// Smallest resident element with key >= `key`.
    ///
    /// ## Safety
    /// Every element reachable from this tree's root must be live.
    pub unsafe fn lookup_ge(&self, key: K::Key) -> Option<*mut E> {
        iter::lookup_ge(&self.root, &K::cmp_for_key(key))
    }

    /// Smallest resident element with key > `key`.
    ///
    /// ## Safety
    /// Every element reachable from this tree's root must be live.
    pub unsafe fn lookup_gt(&self, key: K::Key) -> Option<*mut E> {
        iter::lookup_gt(&self.root, &K::cmp_for_key(key))
    }

    /// Largest resident element with key <= `key`.
    ///
    /// ## Safety
    /// Every element reachable from this tree's root must be live.
    pub unsafe fn lookup_le(&self, key: K::Key) -> Option<*mut E> {
        iter::lookup_le(&self.root, &K::cmp_for_key(key))
    }

    /// Largest resident element with key < `key`.
    ///
    /// ## Safety
    /// Every element reachable from this tree's root must be live.
    pub unsafe fn lookup_lt(&self, key: K::Key) -> Option<*mut E> {
        iter::lookup_lt(&self.root, &K::cmp_for_key(key))
    }

    /// Smallest resident element, or `None` on an empty tree.
    ///
    /// ## Safety
    /// Every element reachable from this tree's root must be live.
    pub unsafe fn first(&self) -> Option<*mut E> {
        iter::first(&self.root, &K::cmp_for_key(K::Key::default()))
    }

    /// Largest resident element, or `None` on an empty tree.
    ///
    /// ## Safety
    /// Every element reachable from this tree's root must be live.
    pub unsafe fn last(&self) -> Option<*mut E> {
        iter::last(&self.root, &K::cmp_for_key(K::Key::default()))
    }

    /// The element immediately after `elem` in sorted order.
    ///
    /// ## Safety
    /// `elem` must currently be resident in this tree.
    pub unsafe fn next(&self, elem: *mut E) -> Option<*mut E> {
        iter::next(&self.root, elem, &K::cmp_for_elem(&*elem))
    }

    /// The element immediately before `elem` in sorted order.
    ///
    /// ## Safety
    /// `elem` must currently be resident in this tree.
    pub unsafe fn prev(&self, elem: *mut E) -> Option<*mut E> {
        iter::prev(&self.root, elem, &K::cmp_for_elem(&*elem))
    }

    /// The smallest resident element with a strictly greater key than
    /// `elem`'s, skipping the rest of `elem`'s duplicate cluster at once.
    ///
    /// ## Safety
    /// `elem` must currently be resident in this tree.
    pub unsafe fn next_unique(&self, elem: *mut E) -> Option<*mut E> {
        iter::next_unique(&self.root, &K::cmp_for_elem(&*elem))
    }

    /// The largest resident element with a strictly smaller key than
    /// `elem`'s, skipping the rest of `elem`'s duplicate cluster at once.
    ///
    /// ## Safety
    /// `elem` must currently be resident in this tree.
    pub unsafe fn prev_unique(&self, elem: *mut E) -> Option<*mut E> {
        iter::prev_unique(&self.root, &K::cmp_for_elem(&*elem))
    }

    /// Detach `elem`. Idempotent: a no-op returning `None` if `elem` is
    /// already detached.
    ///
    /// ## Safety
    /// `elem` must be either detached or resident in this tree.
    pub unsafe fn delete(&mut self, elem: *mut E) -> Option<*mut E> {
        delete::delete(&mut self.root, elem, &K::cmp_for_elem(&*elem))
    }

    /// Detach and return the first element matching `key`, or `None`.
    ///
    /// ## Safety
    /// Every element reachable from this tree's root must be live.
    pub unsafe fn pick(&mut self, key: K::Key) -> Option<*mut E> {
        delete::pick(&mut self.root, &K::cmp_for_key(key))
    }
}

impl<E: Node, K: KeyKind<E>> CebTree<E, K, Multi> {
    /// The element immediately after `elem` within its own duplicate
    /// cluster, or `None` if `elem` is not a duplicate or is the cluster's
    /// tail. Only meaningful on Form B ("elastic") trees.
    ///
    /// ## Safety
    /// `elem` must currently be resident in this tree.
    pub unsafe fn next_dup(&self, elem: *mut E) -> Option<*mut E> {
        iter::next_dup_of(&self.root, elem, &K::cmp_for_elem(&*elem))
    }

    /// The element immediately before `elem` within its own duplicate
    /// cluster, or `None` if `elem` is not a duplicate or is the cluster's
    /// base.
    ///
    /// ## Safety
    /// `elem` must currently be resident in this tree.
    pub unsafe fn prev_dup(&self, elem: *mut E) -> Option<*mut E> {
        iter::prev_dup_of(&self.root, elem, &K::cmp_for_elem(&*elem))
    }
}

impl<E: Node, K: KeyKind<E>, U: UniquenessMode> Default for CebTree<E, K, U> {
    fn default() -> Self {
        Self::new()
    }
}

/// Form A (unique) tree keyed by a fixed `u32` field.
pub type U32Tree<E> = CebTree<E, U32Key, Unique>;
/// Form B (elastic, duplicate-carrying) tree keyed by a fixed `u32` field.
pub type U32MultiTree<E> = CebTree<E, U32Key, Multi>;
/// Form A tree keyed by a fixed `u64` field.
pub type U64Tree<E> = CebTree<E, U64Key, Unique>;
/// Form B tree keyed by a fixed `u64` field.
pub type U64MultiTree<E> = CebTree<E, U64Key, Multi>;
/// Form A tree keyed by the native-word `UWORD` kind.
pub type UWordTree<E> = CebTree<E, UWordKey, Unique>;
/// Form B tree keyed by the native-word `UWORD` kind.
pub type UWordMultiTree<E> = CebTree<E, UWordKey, Multi>;
/// Form A tree keyed by each element's own storage address.
pub type AddrTree<E> = CebTree<E, AddrKey, Unique>;
/// Form B tree keyed by each element's own storage address.
pub type AddrMultiTree<E> = CebTree<E, AddrKey, Multi>;

/// Comparator for a fixed-length byte block (`MB`/`IM`). The two blocks
/// compared must be the same length; `tree.rs`'s byte-keyed trees enforce
/// this by construction (`N` is a compile-time constant of the tree type).
pub struct BlockCmp<'a> {
    pub key: &'a [u8],
}
impl<'a, E: KeyedBytes> DescentComparator<E> for BlockCmp<'a> {
    fn elem_distance(&self, a: &E, b: &E) -> u64 {
        key::block_distance(a.key_bytes(), b.key_bytes()) as u64
    }
    fn key_distance(&self, e: &E) -> u64 {
        key::block_distance(self.key, e.key_bytes()) as u64
    }
    fn order(&self, e: &E) -> Ordering {
        key::block_order(self.key, e.key_bytes())
    }
}
impl<'a, E: KeyedBytes> InsertComparator<E> for BlockCmp<'a> {
    fn side(&self, node: &E) -> usize {
        key::block_side(self.key, node.key_bytes())
    }
}

/// Comparator for a NUL-terminated byte string (`ST`/`IS`).
pub struct StringCmp<'a> {
    pub key: &'a [u8],
}
impl<'a, E: KeyedBytes> DescentComparator<E> for StringCmp<'a> {
    fn elem_distance(&self, a: &E, b: &E) -> u64 {
        key::string_distance(a.key_bytes(), b.key_bytes()) as u64
    }
    fn key_distance(&self, e: &E) -> u64 {
        key::string_distance(self.key, e.key_bytes()) as u64
    }
    fn order(&self, e: &E) -> Ordering {
        key::string_order(self.key, e.key_bytes())
    }
}
impl<'a, E: KeyedBytes> InsertComparator<E> for StringCmp<'a> {
    fn side(&self, node: &E) -> usize {
        key::string_side(self.key, node.key_bytes())
    }
}

/// Fixed-length byte-block tree (`MB`/`IM`), `N` the block length in bytes.
/// Unlike the scalar/address trees above, the comparator needs a borrowed
/// key, so this and [`StTree`] are written out by hand rather than through
/// [`KeyKind`] (which would need a generic associated type to express a
/// borrowed `Key` — not worth it for two key kinds).
pub struct MbTree<E, const N: usize> {
    root: Link<E>,
    multi: bool,
}

impl<E: KeyedBytes, const N: usize> MbTree<E, N> {
    /// Construct an empty unique (Form A) byte-block tree.
    ///
    /// ## Error Conditions
    /// Returns [`CebError::ZeroLengthKey`] if `N` is zero: spec.md §3 defines
    /// `MB(len)`/`IM(len)` as fixed-length blocks, and a zero-length block
    /// carries no distinguishing bits for the descent engine to branch on.
    pub fn try_new() -> CebResult<Self> {
        if N == 0 {
            return Err(CebError::ZeroLengthKey);
        }
        Ok(MbTree {
            root: Link::null(),
            multi: false,
        })
    }

    /// Construct an empty duplicate-carrying (Form B) byte-block tree. See
    /// [`Self::try_new`] for the `N == 0` error condition.
    pub fn try_new_multi() -> CebResult<Self> {
        if N == 0 {
            return Err(CebError::ZeroLengthKey);
        }
        Ok(MbTree {
            root: Link::null(),
            multi: true,
        })
    }

    /// Construct an empty unique (Form A) byte-block tree.
    ///
    /// ## Panics
    /// Panics if `N` is zero; use [`Self::try_new`] to handle that case as
    /// a recoverable [`CebError`] instead.
    pub fn new() -> Self {
        Self::try_new().expect("MbTree: N must be non-zero")
    }

    /// Construct an empty duplicate-carrying (Form B) byte-block tree. See
    /// [`Self::new`] for the `N == 0` panic condition.
    pub fn new_multi() -> Self {
        Self::try_new_multi().expect("MbTree: N must be non-zero")
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_null()
    }

    fn mode(&self) -> Uniqueness {
        if self.multi {
            Uniqueness::Multi
        } else {
            Uniqueness::Unique
        }
    }

    /// ## Safety
    /// `elem` must not already be resident in any tree, and its key bytes
    /// must be exactly `N` long (a violation is a caller contract error per
    /// spec.md §7, not a recoverable [`CebError`] — checked here only with
    /// a `debug_assert`).
    pub unsafe fn insert(&mut self, elem: *mut E) -> *mut E {
        let bytes = (*elem).key_bytes();
        debug_assert_eq!(bytes.len(), N, "MbTree: element key length does not match N");
        let mut buf = [0u8; N];
        buf.copy_from_slice(bytes);
        insert::insert(&mut self.root, elem, &BlockCmp { key: &buf }, self.mode())
    }

    /// ## Safety
    /// Every element reachable from this tree's root must be live.
    pub unsafe fn lookup(&self, key: &[u8; N]) -> Option<*mut E> {
        descend(&self.root, Walk::Keq, &BlockCmp { key }).found
    }

    /// ## Safety
    /// Every element reachable from this tree's root must be live.
    pub unsafe fn lookup_ge(&self, key: &[u8; N]) -> Option<*mut E> {
        iter::lookup_ge(&self.root, &BlockCmp { key })
    }

    /// ## Safety
    /// Every element reachable from this tree's root must be live.
    pub unsafe fn lookup_le(&self, key: &[u8; N]) -> Option<*mut E> {
        iter::lookup_le(&self.root, &BlockCmp { key })
    }

    /// ## Safety
    /// Every element reachable from this tree's root must be live.
    pub unsafe fn first(&self) -> Option<*mut E> {
        let zero = [0u8; N];
        iter::first(&self.root, &BlockCmp { key: &zero })
    }

    /// ## Safety
    /// Every element reachable from this tree's root must be live.
    pub unsafe fn last(&self) -> Option<*mut E> {
        let zero = [0u8; N];
        iter::last(&self.root, &BlockCmp { key: &zero })
    }

    /// ## Safety
    /// `elem` must currently be resident in this tree.
    pub unsafe fn next(&self, elem: *mut E) -> Option<*mut E> {
        let mut buf = [0u8; N];
        buf.copy_from_slice((*elem).key_bytes());
        iter::next(&self.root, elem, &BlockCmp { key: &buf })
    }

    /// ## Safety
    /// `elem` must currently be resident in this tree.
    pub unsafe fn prev(&self, elem: *mut E) -> Option<*mut E> {
        let mut buf = [0u8; N];
        buf.copy_from_slice((*elem).key_bytes());
        iter::prev(&self.root, elem, &BlockCmp { key: &buf })
    }

    /// ## Safety
    /// `elem` must currently be resident in this tree.
    pub unsafe fn next_dup(&self, elem: *mut E) -> Option<*mut E> {
        let mut buf = [0u8; N];
        buf.copy_from_slice((*elem).key_bytes());
        iter::next_dup_of(&self.root, elem, &BlockCmp { key: &buf })
    }

    /// ## Safety
    /// `elem` must currently be resident in this tree.
    pub unsafe fn prev_dup(&self, elem: *mut E) -> Option<*mut E> {
        let mut buf = [0u8; N];
        buf.copy_from_slice((*elem).key_bytes());
        iter::prev_dup_of(&self.root, elem, &BlockCmp { key: &buf })
    }

    /// ## Safety
    /// `elem` must be either detached or resident in this tree.
    pub unsafe fn delete(&mut self, elem: *mut E) -> Option<*mut E> {
        let mut buf = [0u8; N];
        buf.copy_from_slice((*elem).key_bytes());
        delete::delete(&mut self.root, elem, &BlockCmp { key: &buf })
    }

    /// ## Safety
    /// Every element reachable from this tree's root must be live.
    pub unsafe fn pick(&mut self, key: &[u8; N]) -> Option<*mut E> {
        delete::pick(&mut self.root, &BlockCmp { key })
    }
}

impl<E: KeyedBytes, const N: usize> Default for MbTree<E, N> {
    fn default() -> Self {
        Self::new()
    }
}

/// NUL-terminated byte-string tree (`ST`/`IS`). The key comparator needs an
/// owned copy of each element's stored bytes when deriving a comparator
/// from an existing element (`next`/`prev`/`delete`), since borrowing
/// directly from the element while also mutating it through the raw
/// pointers `insert.rs`/`delete.rs` use would alias a live `&[u8]` against
/// a write through `*mut E` to the same allocation. Unlike [`MbTree`]'s
/// fixed `N`, a string's length isn't known at compile time, so the copy
/// here is a one-off heap allocation rather than a stack array.
pub struct StTree<E> {
    root: Link<E>,
    multi: bool,
}

impl<E: KeyedBytes> StTree<E> {
    pub const fn new() -> Self {
        StTree {
            root: Link::null(),
            multi: false,
        }
    }

    pub const fn new_multi() -> Self {
        StTree {
            root: Link::null(),
            multi: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_null()
    }

    fn mode(&self) -> Uniqueness {
        if self.multi {
            Uniqueness::Multi
        } else {
            Uniqueness::Unique
        }
    }

    /// ## Safety
    /// `elem` must not already be resident in any tree.
    pub unsafe fn insert(&mut self, elem: *mut E) -> *mut E {
        let buf = (*elem).key_bytes().to_vec();
        insert::insert(&mut self.root, elem, &StringCmp { key: &buf }, self.mode())
    }

    /// ## Safety
    /// Every element reachable from this tree's root must be live.
    pub unsafe fn lookup(&self, key: &[u8]) -> Option<*mut E> {
        descend(&self.root, Walk::Keq, &StringCmp { key }).found
    }

    /// ## Safety
    /// Every element reachable from this tree's root must be live.
    pub unsafe fn lookup_ge(&self, key: &[u8]) -> Option<*mut E> {
        iter::lookup_ge(&self.root, &StringCmp { key })
    }

    /// ## Safety
    /// Every element reachable from this tree's root must be live.
    pub unsafe fn lookup_le(&self, key: &[u8]) -> Option<*mut E> {
        iter::lookup_le(&self.root, &StringCmp { key })
    }

    /// ## Safety
    /// Every element reachable from this tree's root must be live.
    pub unsafe fn first(&self) -> Option<*mut E> {
        iter::first(&self.root, &StringCmp { key: b"" })
    }

    /// ## Safety
    /// Every element reachable from this tree's root must be live.
    pub unsafe fn last(&self) -> Option<*mut E> {
        iter::last(&self.root, &StringCmp { key: b"" })
    }

    /// ## Safety
    /// `elem` must currently be resident in this tree.
    pub unsafe fn next(&self, elem: *mut E) -> Option<*mut E> {
        let buf = (*elem).key_bytes().to_vec();
        iter::next(&self.root, elem, &StringCmp { key: &buf })
    }

    /// ## Safety
    /// `elem` must currently be resident in this tree.
    pub unsafe fn prev(&self, elem: *mut E) -> Option<*mut E> {
        let buf = (*elem).key_bytes().to_vec();
        iter::prev(&self.root, elem, &StringCmp { key: &buf })
    }

    /// ## Safety
    /// `elem` must currently be resident in this tree.
    pub unsafe fn next_dup(&self, elem: *mut E) -> Option<*mut E> {
        let buf = (*elem).key_bytes().to_vec();
        iter::next_dup_of(&self.root, elem, &StringCmp { key: &buf })
    }

    /// ## Safety
    /// `elem` must currently be resident in this tree.
    pub unsafe fn prev_dup(&self, elem: *mut E) -> Option<*mut E> {
        let buf = (*elem).key_bytes().to_vec();
        iter::prev_dup_of(&self.root, elem, &StringCmp { key: &buf })
    }

    /// ## Safety
    /// `elem` must be either detached or resident in this tree.
    pub unsafe fn delete(&mut self, elem: *mut E) -> Option<*mut E> {
        let buf = (*elem).key_bytes().to_vec();
        delete::delete(&mut self.root, elem, &StringCmp { key: &buf })
    }

    /// ## Safety
    /// Every element reachable from this tree's root must be live.
    pub unsafe fn pick(&mut self, key: &[u8]) -> Option<*mut E> {
        delete::pick(&mut self.root, &StringCmp { key })
    }
}

impl<E: KeyedBytes> Default for StTree<E> {
    fn default() -> Self {
        Self::new()
    }
}
