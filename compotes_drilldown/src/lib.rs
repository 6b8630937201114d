// Copyright 2025 the Compotes Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compotes Drilldown: a nested menu shown one panel at a time.
//!
//! ## Markup
//!
//! ```html
//! <nav class="c-drilldown">
//!   <ul class="c-drilldown-menu">
//!     <li>
//!       <button class="c-drilldown-next">Fruits</button>
//!       <ul class="c-drilldown-menu">
//!         <li><button class="c-drilldown-back">Back</button></li>
//!         <li>Apple</li>
//!       </ul>
//!     </li>
//!   </ul>
//! </nav>
//! ```
//!
//! The first `c-drilldown-menu` is the **wrapper**: it is translated by `-level × 100%` so the
//! current panel is in view. A `c-drilldown-next` control opens the first menu inside its
//! parent; a `c-drilldown-back` control returns to the parent panel.
//!
//! ## Behavior
//!
//! - Menu roles and `aria-expanded`/`aria-controls` pairings are written on init and removed
//!   on destroy. Panels without an `id` get a generated one.
//! - Only the current panel's tabbable elements stay in the tab order; everything else is
//!   marked with [`DATA_HIDDEN`] and `tabindex="-1"`.
//! - The root's height follows the tallest panel, or the current one with
//!   [`DrilldownOptions::dynamic_height`].
//! - Arrow keys move between items, `ArrowRight` opens, `ArrowLeft`/`Escape` go back,
//!   `Home`/`End` jump, and printable characters search by initial.
//! - Markup changes and root resizes are observed; call [`Drilldown::tick`] with the host
//!   clock to run the debounced reactions.
//!
//! Custom events: `c.drilldown.init`, `next`, `back`, `reset`, `update`, `destroy`.
//!
//! ## Example
//!
//! ```rust
//! use compotes_dom::{Document, Element};
//! use compotes_drilldown::{CLASS_BACK, CLASS_MENU, CLASS_NEXT, Drilldown, DrilldownOptions};
//! use compotes_lifecycle::{Component, UiEvent};
//!
//! let mut doc = Document::new();
//! let nav = doc.append(doc.body(), Element::new("nav").with_class("c-drilldown"));
//! let menu = doc.append(nav, Element::new("ul").with_class(CLASS_MENU));
//! let item = doc.append(menu, Element::new("li"));
//! let next = doc.append(item, Element::new("button").with_class(CLASS_NEXT));
//! doc.append_text(next, "Fruits");
//! let panel = doc.append(item, Element::new("ul").with_class(CLASS_MENU));
//! let back_item = doc.append(panel, Element::new("li"));
//! let back = doc.append(back_item, Element::new("button").with_class(CLASS_BACK));
//!
//! let mut drilldown = Drilldown::new(&mut doc, nav, DrilldownOptions::default()).unwrap();
//! assert_eq!(doc.attribute(next, "aria-expanded"), Some("false"));
//!
//! drilldown.dispatch(&mut doc, &UiEvent::click(next));
//! assert_eq!(drilldown.level(), 1);
//! assert_eq!(drilldown.current_panel(), Some(panel));
//! assert_eq!(doc.active_element(), Some(back));
//! assert_eq!(doc.style(menu, "transform"), Some("translateX(-100%)"));
//!
//! drilldown.dispatch(&mut doc, &UiEvent::key_down(back, "Escape"));
//! assert_eq!(drilldown.level(), 0);
//!
//! drilldown.destroy(&mut doc);
//! assert_eq!(doc.attribute(next, "aria-expanded"), None);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod drilldown;
mod markup;
mod options;
mod watch;

pub use drilldown::{Drilldown, DrilldownHandler, Panel};
pub use markup::{CLASS_BACK, CLASS_MENU, CLASS_NEXT, CSSVAR_DELAY, DATA_HIDDEN};
pub use options::{DrilldownOptions, DrilldownState};
