// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! cebtree - compact embedded binary trees.
//!
//! An ordered associative container where every entry is a single embedded
//! two-child node: no separate allocation, no color bit, no balance factor,
//! no parent pointer. The caller owns every element and embeds a
//! [`node::NodeSlot`] at a location of its choosing; the tree only ever
//! reads a key and writes the two child references.
//!
//! ## Features
//!
//! - **Allocation-free core**: insert/delete/lookup/range never allocate.
//! - **Several key kinds**: fixed-width integers, NUL-terminated strings,
//!   fixed-length byte blocks (inline or indirect), and the element's own
//!   storage address.
//! - **Two uniqueness modes**: reject duplicate keys (Form A, "canonical")
//!   or chain them in insertion order through a circular duplicate ring
//!   (Form B, "elastic"), with dedicated dup-ring and skip-to-next-key
//!   walks.
//! - **O(W) everything**: every operation costs comparisons proportional to
//!   key width, never tree size; there is no rebalancing to pay for.
//!
//! ## Quick Start
//!
//! ```rust
//! use cebtree::node::{Node, NodeSlot, KeyedScalar};
//! use cebtree::tree::U32Tree;
//!
//! struct Entry {
//!     key: u32,
//!     slot: NodeSlot<Entry>,
//! }
//!
//! impl Node for Entry {
//!     fn slot(&self) -> &NodeSlot<Self> { &self.slot }
//!     fn slot_mut(&mut self) -> &mut NodeSlot<Self> { &mut self.slot }
//! }
//! impl KeyedScalar<u32> for Entry {
//!     fn key_scalar(&self) -> u32 { self.key }
//! }
//!
//! let mut tree: U32Tree<Entry> = U32Tree::new();
//! let mut a = Box::new(Entry { key: 4, slot: NodeSlot::detached() });
//! unsafe {
//!     tree.insert(&mut *a);
//!     assert_eq!(tree.lookup(4), Some(&mut *a as *mut Entry));
//! }
//! ```
//!
//! ## Architecture
//!
//! - **key**: per-key-kind distance/side/order comparator primitives.
//! - **node**: the intrusive `NodeSlot`/`Link` layout and key-access traits.
//! - **descent**: the single parameterised traversal every operation below
//!   is built on.
//! - **insert** / **delete**: thin wrappers over `descent` implementing
//!   spec.md §4.3/§4.4.
//! - **iter**: first/last/next/prev/lookup_{ge,gt,le,lt} and dup-ring walks.
//! - **tree**: the typed entry points (`U32Tree`, `U64Tree`, `UWordTree`,
//!   `AddrTree`, `MbTree`, `StTree`, and their `*Multi` duplicate-carrying
//!   counterparts).
//! - **dump**: Graphviz DOT rendering for debugging; not part of
//!   correctness.
//! - **error**: configuration-time errors (zero-length keys, bad offsets);
//!   tree operations themselves never raise exceptions.

pub mod delete;
pub mod descent;
pub mod dump;
pub mod error;
pub mod insert;
pub mod iter;
pub mod key;
pub mod node;
pub mod tree;

pub use error::{CebError, CebResult};
pub use insert::Uniqueness;
pub use node::{KeyedBytes, KeyedScalar, Link, Node, NodeSlot};
pub use tree::{
    AddrMultiTree, AddrTree, CebTree, KeyedAddr, MbTree, Multi, StTree, U32MultiTree, U32Tree,
    U64MultiTree, U64Tree, Unique, UWordMultiTree, UWordTree,
};
