// Copyright 2025 the Compotes Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Listener scopes: every listener installed during one init cycle.

use alloc::{string::String, vec::Vec};

use compotes_dom::NodeId;

use crate::{Component, EventHandler, UiEventKind};

/// A native event listener registered through [`Component::register_event`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Listener<H> {
    /// Label used in logs.
    pub id: &'static str,
    /// Element the listener is attached to.
    pub target: NodeId,
    /// Event kind it reacts to.
    pub kind: UiEventKind,
    /// Handler tag passed back to [`Component::handle`].
    pub handler: H,
}

/// The cancellation handle of one init cycle.
///
/// Owns the declarative `on` handlers copied from the options and every native
/// listener registered since `init`. Dropping the scope removes all of them at
/// once; a new scope is allocated on each `init`.
pub struct ListenerScope<C: Component> {
    id: u64,
    on: Vec<(String, EventHandler<C>)>,
    listeners: Vec<Listener<C::Handler>>,
}

impl<C: Component> ListenerScope<C> {
    pub(crate) fn new(id: u64, on: Vec<(String, EventHandler<C>)>) -> Self {
        Self {
            id,
            on,
            listeners: Vec::new(),
        }
    }

    /// Identifier of the init cycle this scope belongs to.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Registered native listeners, in registration order.
    pub fn listeners(&self) -> &[Listener<C::Handler>] {
        &self.listeners
    }

    pub(crate) fn push(&mut self, listener: Listener<C::Handler>) {
        self.listeners.push(listener);
    }

    pub(crate) fn handlers_for<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a EventHandler<C>> + 'a {
        self.on
            .iter()
            .filter(move |(n, _)| n == name)
            .map(|(_, h)| h)
    }
}

impl<C: Component> core::fmt::Debug for ListenerScope<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ListenerScope")
            .field("id", &self.id)
            .field("on", &self.on.len())
            .field("listeners", &self.listeners)
            .finish()
    }
}
