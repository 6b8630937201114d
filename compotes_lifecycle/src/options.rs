// Copyright 2025 the Compotes Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Options shared by every component.

use alloc::{rc::Rc, string::String, vec::Vec};

use crate::{Component, CustomEvent};

/// Handler for a component's custom events. Receives the event and the component.
pub type EventHandler<C> = Rc<dyn Fn(&CustomEvent, &C)>;

/// Callback receiving a state snapshot after every emitted event.
pub type StateCallback<S> = Rc<dyn Fn(&S)>;

/// Options every component recognizes.
///
/// Widget option structs embed this as their `base` field and expose it
/// through `AsRef<ParentOptions<_>>`.
pub struct ParentOptions<C: Component> {
    /// Initialize on construction. `None` behaves like `Some(true)`.
    pub init: Option<bool>,
    /// Handlers for custom events, keyed by short event name (`init`, `next`, ...).
    ///
    /// They are attached at every `init` and detached at `destroy`.
    pub on: Vec<(String, EventHandler<C>)>,
    /// Called with [`Component::state`] after every emitted event.
    pub on_state_change: Option<StateCallback<C::State>>,
}

impl<C: Component> ParentOptions<C> {
    /// Whether the component should initialize on construction.
    pub fn is_initializable(&self) -> bool {
        self.init.is_none_or(|init| init)
    }

    /// Set the `init` flag.
    #[must_use]
    pub fn with_init(mut self, init: bool) -> Self {
        self.init = Some(init);
        self
    }

    /// Add a handler for the custom event `name`.
    #[must_use]
    pub fn on(mut self, name: &str, handler: impl Fn(&CustomEvent, &C) + 'static) -> Self {
        self.on.push((String::from(name), Rc::new(handler)));
        self
    }

    /// Set the state change callback.
    #[must_use]
    pub fn on_state_change(mut self, callback: impl Fn(&C::State) + 'static) -> Self {
        self.on_state_change = Some(Rc::new(callback));
        self
    }
}

impl<C: Component> Default for ParentOptions<C> {
    fn default() -> Self {
        Self {
            init: None,
            on: Vec::new(),
            on_state_change: None,
        }
    }
}

impl<C: Component> Clone for ParentOptions<C> {
    fn clone(&self) -> Self {
        Self {
            init: self.init,
            on: self.on.clone(),
            on_state_change: self.on_state_change.clone(),
        }
    }
}

impl<C: Component> core::fmt::Debug for ParentOptions<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let names: Vec<&str> = self.on.iter().map(|(name, _)| name.as_str()).collect();
        f.debug_struct("ParentOptions")
            .field("init", &self.init)
            .field("on", &names)
            .field("on_state_change", &self.on_state_change.is_some())
            .finish()
    }
}

impl<C: Component> AsRef<Self> for ParentOptions<C> {
    fn as_ref(&self) -> &Self {
        self
    }
}
