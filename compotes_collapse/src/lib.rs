// Copyright 2025 the Compotes Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compotes Collapse: a region shown and hidden by the triggers that point at it.
//!
//! Triggers are the `.c-collapse-trigger` elements whose `aria-controls` names the root's
//! `id`. They may live anywhere in the document; clicks are caught by one listener on the
//! body. The root starts expanded when it carries [`CLASS_SHOW`].
//!
//! When the root has a computed transition, `show` and `hide` pin an inline `height`, add
//! [`CLASS_COLLAPSING`], and finish on the first [`Collapse::tick`] at or past the time they
//! were called plus the transition duration. Clicks use the time carried on the event.
//! Without a transition, they finish immediately.
//!
//! Custom events: `c.collapse.init`, `show` and `hide` (cancelable), `shown`, `hidden`,
//! `update`, `destroy`.
//!
//! ```rust
//! use compotes_collapse::{CLASS_SHOW, CLASS_TRIGGER, Collapse};
//! use compotes_dom::{Document, Element};
//! use compotes_lifecycle::{Component, ParentOptions, UiEvent};
//!
//! let mut doc = Document::new();
//! let trigger = doc.append(
//!     doc.body(),
//!     Element::new("button")
//!         .with_class(CLASS_TRIGGER)
//!         .with_attribute("aria-controls", "details"),
//! );
//! let region = doc.append(
//!     doc.body(),
//!     Element::new("div")
//!         .with_id("details")
//!         .with_computed_style("transition-duration", "200ms"),
//! );
//!
//! let mut collapse = Collapse::new(&mut doc, region, ParentOptions::default()).unwrap();
//! collapse.dispatch(&mut doc, &UiEvent::click(trigger).at(1_000));
//! assert!(collapse.is_collapsing());
//! assert_eq!(doc.attribute(trigger, "aria-expanded"), Some("true"));
//!
//! collapse.tick(&mut doc, 1_200);
//! assert!(!collapse.is_collapsing());
//! assert!(doc.has_class(region, CLASS_SHOW));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod collapse;

pub use collapse::{
    CLASS_COLLAPSING, CLASS_SHOW, CLASS_TRIGGER, Collapse, CollapseHandler, CollapseState,
};
