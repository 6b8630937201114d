// Copyright 2025 the Compotes Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the document: node identifiers, observation flags, and records.

use alloc::string::String;

use kurbo::Size;

/// Identifier for a node in the document (generational).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Identifier for an observer registered with [`Document::observe`](crate::Document::observe).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ObserverId(pub(crate) u32);

bitflags::bitflags! {
    /// What an observer is interested in.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ObserveFlags: u8 {
        /// Children added to or removed from the target.
        const CHILD_LIST = 0b0000_0001;
        /// Attribute (and inline style) changes on the target.
        const ATTRIBUTES = 0b0000_0010;
        /// Extend `CHILD_LIST` and `ATTRIBUTES` to every descendant of the target.
        const SUBTREE    = 0b0000_0100;
        /// Client size changes of the target itself.
        const RESIZE     = 0b0000_1000;
    }
}

/// A change observed on the document.
#[derive(Clone, Debug, PartialEq)]
pub enum Record {
    /// A child was appended to or removed from `target`.
    ChildList {
        /// The parent whose child list changed.
        target: NodeId,
    },
    /// An attribute of `target` changed. Inline styles report the name `style`.
    Attribute {
        /// The element whose attribute changed.
        target: NodeId,
        /// Attribute name.
        name: String,
    },
    /// The client size of `target` changed (or was reported for the first time).
    Resize {
        /// The resized element.
        target: NodeId,
        /// The new client size.
        size: Size,
    },
}

impl Record {
    /// The node this record is about.
    pub fn target(&self) -> NodeId {
        match self {
            Self::ChildList { target }
            | Self::Attribute { target, .. }
            | Self::Resize { target, .. } => *target,
        }
    }

    pub(crate) fn flag(&self) -> ObserveFlags {
        match self {
            Self::ChildList { .. } => ObserveFlags::CHILD_LIST,
            Self::Attribute { .. } => ObserveFlags::ATTRIBUTES,
            Self::Resize { .. } => ObserveFlags::RESIZE,
        }
    }
}
