// Copyright 2025 the Compotes Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compotes DOM: a headless document model for accessible widgets.
//!
//! Widgets in this workspace never talk to a browser. They operate on a
//! [`Document`], an arena tree of element and text nodes that carries exactly
//! what keyboard navigation and ARIA bookkeeping need:
//!
//! - Ordered attributes, a `class` list, inline styles (custom properties included),
//!   and computed style values supplied by the host.
//! - Layout metrics reported by the host: client size, scroll size, scroll offset.
//! - A single focused element.
//! - A small selector engine ([`Selector`]) for the queries widgets make.
//! - Mutation and resize observation, drained as [`Record`]s.
//!
//! This crate does not perform layout or styling. The host (a renderer, a test, a
//! server-side harness) is expected to push sizes and computed styles in, and to
//! read attributes, inline styles and focus back out.
//!
//! ## Example
//!
//! ```rust
//! use compotes_dom::{Document, Element, ObserveFlags, Record};
//!
//! let mut doc = Document::new();
//! let menu = doc.append(doc.body(), Element::new("ul").with_class("menu"));
//! let observer = doc.observe(menu, ObserveFlags::CHILD_LIST | ObserveFlags::SUBTREE);
//!
//! let item = doc.append(menu, Element::new("li"));
//! let link = doc.append(item, Element::new("a").with_attribute("href", "#"));
//! assert!(doc.focus(link));
//!
//! assert_eq!(doc.query_selector_all(menu, ".menu > li").unwrap(), [item]);
//! assert_eq!(
//!     doc.take_records(observer),
//!     [Record::ChildList { target: menu }, Record::ChildList { target: item }]
//! );
//! assert_eq!(doc.active_element(), Some(link));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod element;
mod selector;
mod style;
mod tree;
mod types;

pub use element::Element;
pub use selector::{Selector, SelectorError};
pub use style::transition_duration_ms;
pub use tree::{Descendants, Document};
pub use types::{NodeId, ObserveFlags, ObserverId, Record};

pub use kurbo::{Size, Vec2};
