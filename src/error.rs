// Copyright 2025 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Error types for compact binary tree configuration.
//!
//! Tree operations themselves (`lookup`, `insert`, `delete`, range walks) are
//! non-exceptional: absence, collision, and idempotent-delete are signalled
//! by `Option`, never by this error type. `CebError` only covers mistakes a
//! caller can make while describing an element layout to the tree, before
//! any descent happens.

use std::fmt;

/// Standard Result type for tree configuration operations.
pub type CebResult<T> = Result<T, CebError>;

/// Error types for compact binary tree configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CebError {
    /// A byte-block key kind (`MB`/`IM`) was configured with a zero length.
    ZeroLengthKey,

    /// The declared key offset does not fit within the element's size.
    KeyOffsetOutOfBounds { kofs: usize, elem_size: usize },

    /// An indirect key (`IM`/`IS`) pointer was null where a resident
    /// element was expected to carry one.
    NullIndirectKey,

    /// Two byte-block keys were compared with mismatched lengths.
    KeyLengthMismatch { left: usize, right: usize },

    /// A `pick`/`delete` was asked for an element that does not belong to
    /// the tree instance it was presented to.
    ForeignElement,
}

impl fmt::Display for CebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroLengthKey => {
                write!(f, "byte-block key length must be greater than zero")
            }
            Self::KeyOffsetOutOfBounds { kofs, elem_size } => {
                write!(
                    f,
                    "key offset {} does not fit within element of size {}",
                    kofs, elem_size
                )
            }
            Self::NullIndirectKey => {
                write!(f, "indirect key pointer is null")
            }
            Self::KeyLengthMismatch { left, right } => {
                write!(
                    f,
                    "byte-block key length mismatch: left={} right={}",
                    left, right
                )
            }
            Self::ForeignElement => {
                write!(f, "element does not belong to this tree")
            }
        }
    }
}

impl std::error::Error for CebError {}
