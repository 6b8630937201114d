// Copyright 2025 the Compotes Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compotes Lifecycle: the contract every Compotes widget is built on.
//!
//! ## Overview
//!
//! A widget is a struct that composes a [`Lifecycle`] and implements [`Component`].
//! The trait supplies the shared protocol:
//!
//! - **Init/destroy.** [`Component::init`] resolves a [`Target`] (a node or a selector),
//!   stores options, opens a fresh [`ListenerScope`], emits `init`, then calls the widget's
//!   element-discovery and event-registration hooks. [`Component::destroy`] reverses it.
//! - **Custom events.** [`Component::emit_event`] delivers a [`CustomEvent`] named
//!   `c.<widget>.<name>` to the declarative handlers in [`ParentOptions::on`] and to
//!   persistent [`Component::subscribe`] handlers, then calls the state change callback.
//! - **Native listeners.** [`Component::register_event`] attaches a handler tag to an
//!   element for the current scope. The host feeds input with [`Component::dispatch`];
//!   handlers on the target run first, then those on its ancestors.
//! - **Timers.** [`timer::Debounce`] and [`timer::Timeout`] run on a host-supplied
//!   millisecond clock.
//!
//! ## Example
//!
//! ```rust
//! use std::{cell::Cell, rc::Rc};
//!
//! use compotes_dom::{Document, Element};
//! use compotes_lifecycle::{
//!     Component, Lifecycle, Outcome, ParentOptions, UiEvent, UiEventKind,
//! };
//!
//! #[derive(Debug)]
//! struct Toggle {
//!     lifecycle: Lifecycle<Self>,
//!     on: bool,
//! }
//!
//! impl Component for Toggle {
//!     const NAME: &'static str = "toggle";
//!     type State = bool;
//!     type Handler = ();
//!     type Options = ParentOptions<Self>;
//!
//!     fn lifecycle(&self) -> &Lifecycle<Self> { &self.lifecycle }
//!     fn lifecycle_mut(&mut self) -> &mut Lifecycle<Self> { &mut self.lifecycle }
//!     fn state(&self) -> bool { self.on }
//!
//!     fn init_events(&mut self, _doc: &mut Document) {
//!         if let Some(el) = self.el() {
//!             self.register_event("toggle", el, UiEventKind::Click, ());
//!         }
//!     }
//!
//!     fn handle(&mut self, _doc: &mut Document, _: (), _: &UiEvent) -> Outcome {
//!         self.on = !self.on;
//!         self.emit_event("change", false);
//!         Outcome::Continue
//!     }
//! }
//!
//! let mut doc = Document::new();
//! let button = doc.append(doc.body(), Element::new("button"));
//!
//! let last = Rc::new(Cell::new(false));
//! let sink = last.clone();
//! let options = ParentOptions::default().on_state_change(move |on: &bool| sink.set(*on));
//!
//! let mut toggle = Toggle { lifecycle: Lifecycle::new(options), on: false };
//! toggle.init(&mut doc, Some(button.into()), None).unwrap();
//!
//! toggle.dispatch(&mut doc, &UiEvent::click(button));
//! assert!(last.get());
//!
//! toggle.destroy(&mut doc);
//! toggle.dispatch(&mut doc, &UiEvent::click(button));
//! assert!(toggle.on, "no listener runs after destroy");
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod component;
pub mod dispatch;
mod error;
mod event;
mod options;
mod scope;
pub mod timer;

pub use component::{Component, Lifecycle, SubscriptionId, Target};
pub use dispatch::Outcome;
pub use error::Error;
pub use event::{CustomEvent, Key, UiEvent, UiEventKind};
pub use options::{EventHandler, ParentOptions, StateCallback};
pub use scope::{Listener, ListenerScope};
