// Copyright 2025 the Compotes Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The component contract and the lifecycle state each widget composes.

use alloc::{format, rc::Rc, string::String};

use compotes_dom::{Document, NodeId};
use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::dispatch::{self, Outcome};
use crate::{
    CustomEvent, Error, EventHandler, Listener, ListenerScope, ParentOptions, StateCallback,
    UiEvent, UiEventKind,
};

/// Where a component's root element comes from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Target<'a> {
    /// A live element.
    Node(NodeId),
    /// A selector resolved against the whole document.
    Selector(&'a str),
}

impl From<NodeId> for Target<'_> {
    fn from(id: NodeId) -> Self {
        Self::Node(id)
    }
}

impl<'a> From<&'a str> for Target<'a> {
    fn from(selector: &'a str) -> Self {
        Self::Selector(selector)
    }
}

impl Target<'_> {
    /// Resolve to a live element of `doc`.
    pub fn resolve(self, doc: &Document, widget: &'static str) -> Result<NodeId, Error> {
        let found = match self {
            Self::Node(id) => doc.is_element(id).then_some(id),
            Self::Selector(selector) => doc.query_selector(selector)?,
        };
        found.ok_or_else(|| Error::ElementNotFound {
            widget,
            selector: match self {
                Self::Node(id) => format!("{id:?}"),
                Self::Selector(selector) => String::from(selector),
            },
        })
    }
}

/// Handle returned by [`Component::subscribe`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Lifecycle state composed into every component.
///
/// Holds the bound root element, the stored options, the active
/// [`ListenerScope`], and persistent subscriptions.
pub struct Lifecycle<C: Component> {
    el: Option<NodeId>,
    options: C::Options,
    state_change: Option<StateCallback<C::State>>,
    scope: Option<ListenerScope<C>>,
    next_scope: u64,
    subscriptions: HashMap<String, SmallVec<[(SubscriptionId, EventHandler<C>); 2]>>,
    next_subscription: u64,
}

impl<C: Component> Lifecycle<C> {
    /// Unbound lifecycle state holding `options`.
    pub fn new(options: C::Options) -> Self {
        Self {
            el: None,
            options,
            state_change: None,
            scope: None,
            next_scope: 0,
            subscriptions: HashMap::new(),
            next_subscription: 0,
        }
    }

    /// The bound root element.
    pub fn el(&self) -> Option<NodeId> {
        self.el
    }

    /// The active listener scope, if initialized.
    pub fn scope(&self) -> Option<&ListenerScope<C>> {
        self.scope.as_ref()
    }

    fn open_scope(&mut self) {
        self.cancel_scope();
        let id = self.next_scope;
        self.next_scope += 1;
        let on = self.options.as_ref().on.clone();
        tracing::debug!(widget = C::NAME, scope = id, "listener scope opened");
        self.scope = Some(ListenerScope::new(id, on));
    }

    fn cancel_scope(&mut self) {
        if let Some(scope) = self.scope.take() {
            tracing::debug!(
                widget = C::NAME,
                scope = scope.id(),
                listeners = scope.listeners().len(),
                "listener scope cancelled"
            );
        }
    }

    fn unbind(&mut self) {
        self.cancel_scope();
        self.state_change = None;
        self.el = None;
    }
}

impl<C: Component> Default for Lifecycle<C> {
    fn default() -> Self {
        Self::new(C::Options::default())
    }
}

impl<C: Component> core::fmt::Debug for Lifecycle<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Lifecycle")
            .field("widget", &C::NAME)
            .field("el", &self.el)
            .field("scope", &self.scope)
            .field("subscriptions", &self.subscriptions.len())
            .finish_non_exhaustive()
    }
}

/// The contract every widget implements.
///
/// A widget composes a [`Lifecycle`], names itself, and supplies
/// [`init_events`](Component::init_events). The provided methods implement the
/// shared protocol:
///
/// - [`init`](Component::init) binds the root element, stores options, opens a fresh
///   [`ListenerScope`], attaches `on` handlers, emits `init`, then runs
///   [`init_elements`](Component::init_elements) and [`init_events`](Component::init_events).
/// - [`destroy`](Component::destroy) runs [`destroy_elements`](Component::destroy_elements),
///   emits `destroy`, cancels the scope and unbinds the root element.
/// - [`emit_event`](Component::emit_event) delivers `c.<name>.<event>` to handlers and
///   then notifies the state callback.
/// - [`dispatch`](Component::dispatch) routes native events to [`handle`](Component::handle).
pub trait Component: Sized + 'static {
    /// Widget name, used in event names and error messages.
    const NAME: &'static str;
    /// Snapshot passed to the state change callback.
    type State;
    /// Tag identifying which native handler a listener runs.
    type Handler: Copy + core::fmt::Debug;
    /// Widget options, embedding [`ParentOptions`].
    type Options: AsRef<ParentOptions<Self>> + Default;

    /// Shared lifecycle state.
    fn lifecycle(&self) -> &Lifecycle<Self>;

    /// Shared lifecycle state, mutably.
    fn lifecycle_mut(&mut self) -> &mut Lifecycle<Self>;

    /// Current state snapshot.
    fn state(&self) -> Self::State;

    /// Discover and prepare the widget's elements. Runs after `init` is emitted.
    ///
    /// An error rolls the component back to the uninitialized state.
    fn init_elements(&mut self, doc: &mut Document) -> Result<(), Error> {
        let _ = doc;
        Ok(())
    }

    /// Register native listeners with [`Component::register_event`].
    fn init_events(&mut self, doc: &mut Document);

    /// Revert DOM changes the widget introduced. Runs first in [`Component::destroy`].
    fn destroy_elements(&mut self, doc: &mut Document) {
        let _ = doc;
    }

    /// Run a native handler registered with [`Component::register_event`].
    fn handle(&mut self, doc: &mut Document, handler: Self::Handler, event: &UiEvent) -> Outcome;

    /// The bound root element.
    fn el(&self) -> Option<NodeId> {
        self.lifecycle().el
    }

    /// Stored options.
    fn options(&self) -> &Self::Options {
        &self.lifecycle().options
    }

    /// Stored options, mutably. Call [`Component::init`] again to re-apply them.
    fn options_mut(&mut self) -> &mut Self::Options {
        &mut self.lifecycle_mut().options
    }

    /// Whether the stored options ask for initialization on construction.
    fn is_initializable(&self) -> bool {
        self.options().as_ref().is_initializable()
    }

    /// Initialize (or re-initialize) the component.
    ///
    /// `target` is only resolved when no element is bound yet; a bound component
    /// keeps its element. Without a `target` and without a bound element this is
    /// a no-op. `options` replaces the stored options when given.
    fn init(
        &mut self,
        doc: &mut Document,
        target: Option<Target<'_>>,
        options: Option<Self::Options>,
    ) -> Result<(), Error> {
        let el = match (self.el(), target) {
            (Some(el), _) => el,
            (None, Some(target)) => target.resolve(doc, Self::NAME)?,
            (None, None) => return Ok(()),
        };

        let lifecycle = self.lifecycle_mut();
        if let Some(options) = options {
            lifecycle.options = options;
        }
        lifecycle.el = Some(el);
        lifecycle.state_change = lifecycle.options.as_ref().on_state_change.clone();
        lifecycle.open_scope();
        tracing::debug!(widget = Self::NAME, ?el, "init");

        self.emit_event("init", false);
        if let Err(err) = self.init_elements(doc) {
            tracing::debug!(widget = Self::NAME, %err, "init rolled back");
            self.lifecycle_mut().unbind();
            return Err(err);
        }
        self.init_events(doc);
        Ok(())
    }

    /// Tear the component down. A second call is a no-op.
    fn destroy(&mut self, doc: &mut Document) {
        if self.el().is_none() {
            return;
        }
        self.destroy_elements(doc);
        self.lifecycle_mut().state_change = None;
        self.emit_event("destroy", false);
        self.lifecycle_mut().unbind();
        tracing::debug!(widget = Self::NAME, "destroyed");
    }

    /// Emit `c.<NAME>.<name>` on the root element.
    ///
    /// Returns `None` when no element is bound, otherwise whether the default
    /// action was not prevented. The state callback runs afterwards either way.
    fn emit_event(&self, name: &str, cancelable: bool) -> Option<bool> {
        let lifecycle = self.lifecycle();
        let result = lifecycle.el.map(|el| {
            let event = CustomEvent::new(Self::NAME, name, el, cancelable);
            tracing::trace!(event = event.full_name(), "emit");
            if let Some(scope) = &lifecycle.scope {
                for handler in scope.handlers_for(name) {
                    handler(&event, self);
                }
            }
            if let Some(subscribers) = lifecycle.subscriptions.get(name) {
                for (_, handler) in subscribers {
                    handler(&event, self);
                }
            }
            !event.default_prevented()
        });
        if let Some(callback) = &lifecycle.state_change {
            callback(&self.state());
        }
        result
    }

    /// Attach a native listener to the current scope. Ignored when no scope is active.
    fn register_event(
        &mut self,
        id: &'static str,
        target: NodeId,
        kind: UiEventKind,
        handler: Self::Handler,
    ) {
        let Some(scope) = self.lifecycle_mut().scope.as_mut() else {
            tracing::trace!(widget = Self::NAME, id, "listener ignored, no active scope");
            return;
        };
        tracing::trace!(widget = Self::NAME, id, ?target, ?kind, "listener registered");
        scope.push(Listener {
            id,
            target,
            kind,
            handler,
        });
    }

    /// Deliver a native event to the listeners on its path.
    ///
    /// Returns the node where propagation stopped, either because a handler
    /// returned [`Outcome::Stop`] or because it tore the component down.
    fn dispatch(&mut self, doc: &mut Document, event: &UiEvent) -> Option<NodeId> {
        let scope = self.lifecycle().scope.as_ref()?;
        let scope_id = scope.id();
        let route = dispatch::route(doc, scope.listeners(), event);
        for (node, handler) in route {
            tracing::trace!(widget = Self::NAME, ?node, ?handler, "dispatch");
            let outcome = self.handle(doc, handler, event);
            let same_scope = self.lifecycle().scope.as_ref().map(ListenerScope::id) == Some(scope_id);
            if outcome == Outcome::Stop || !same_scope {
                return Some(node);
            }
        }
        None
    }

    /// Listen to the custom event `name` until [`Component::unsubscribe`].
    ///
    /// Unlike `on` handlers, subscriptions survive `destroy` and re-init.
    fn subscribe(
        &mut self,
        name: &str,
        handler: impl Fn(&CustomEvent, &Self) + 'static,
    ) -> SubscriptionId {
        let lifecycle = self.lifecycle_mut();
        let id = SubscriptionId(lifecycle.next_subscription);
        lifecycle.next_subscription += 1;
        lifecycle
            .subscriptions
            .entry(String::from(name))
            .or_default()
            .push((id, Rc::new(handler)));
        id
    }

    /// Remove a subscription. Returns whether it existed.
    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let mut removed = false;
        for subscribers in self.lifecycle_mut().subscriptions.values_mut() {
            let before = subscribers.len();
            subscribers.retain(|(sid, _)| *sid != id);
            removed |= subscribers.len() != before;
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::{vec, vec::Vec};
    use core::cell::{Cell, RefCell};
    use compotes_dom::Element;

    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    enum ChildHandler {
        Log(u8),
        StopHere,
        Destroy,
    }

    #[derive(Debug)]
    struct Child {
        lifecycle: Lifecycle<Self>,
        clicks: Rc<RefCell<Vec<u8>>>,
        fail_elements: bool,
        listeners: Vec<(NodeId, ChildHandler)>,
    }

    impl Child {
        fn new(
            doc: &mut Document,
            target: Target<'_>,
            options: ParentOptions<Self>,
        ) -> Result<Self, Error> {
            let mut child = Self {
                lifecycle: Lifecycle::new(options),
                clicks: Rc::default(),
                fail_elements: false,
                listeners: Vec::new(),
            };
            if child.is_initializable() {
                child.init(doc, Some(target), None)?;
            }
            Ok(child)
        }
    }

    impl Component for Child {
        const NAME: &'static str = "child";
        type State = bool;
        type Handler = ChildHandler;
        type Options = ParentOptions<Self>;

        fn lifecycle(&self) -> &Lifecycle<Self> {
            &self.lifecycle
        }

        fn lifecycle_mut(&mut self) -> &mut Lifecycle<Self> {
            &mut self.lifecycle
        }

        fn state(&self) -> bool {
            self.el().is_some()
        }

        fn init_elements(&mut self, doc: &mut Document) -> Result<(), Error> {
            match self.el() {
                Some(el) if self.fail_elements => Err(Error::MissingMarkup {
                    widget: Self::NAME,
                    message: "missing",
                    element: el,
                }),
                _ => {
                    let _ = doc;
                    Ok(())
                }
            }
        }

        fn init_events(&mut self, _doc: &mut Document) {
            for (node, handler) in self.listeners.clone() {
                self.register_event("test", node, UiEventKind::Click, handler);
            }
        }

        fn handle(&mut self, doc: &mut Document, handler: ChildHandler, _: &UiEvent) -> Outcome {
            match handler {
                ChildHandler::Log(n) => {
                    self.clicks.borrow_mut().push(n);
                    Outcome::Continue
                }
                ChildHandler::StopHere => Outcome::Stop,
                ChildHandler::Destroy => {
                    self.destroy(doc);
                    Outcome::Continue
                }
            }
        }
    }

    fn counter() -> (Rc<Cell<u32>>, impl Fn(&CustomEvent, &Child) + 'static) {
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        (count, move |_: &CustomEvent, _: &Child| c.set(c.get() + 1))
    }

    #[test]
    fn deferred_init_then_destroy_fire_once() {
        let mut doc = Document::new();
        let el = doc.append(doc.body(), Element::new("div").with_class("c-parent"));
        let (on_init, on_init_handler) = counter();
        let (on_destroy, on_destroy_handler) = counter();
        let options = ParentOptions::default()
            .with_init(false)
            .on("init", on_init_handler)
            .on("destroy", on_destroy_handler);

        let mut child = Child::new(&mut doc, el.into(), options).unwrap();
        let (init_events, init_sub) = counter();
        let (destroy_events, destroy_sub) = counter();
        child.subscribe("init", init_sub);
        child.subscribe("destroy", destroy_sub);
        assert_eq!(child.el(), None);

        child.init(&mut doc, Some(el.into()), None).unwrap();
        assert_eq!(child.el(), Some(el));
        assert_eq!(init_events.get(), 1);
        assert_eq!(on_init.get(), 1);

        child.destroy(&mut doc);
        assert_eq!(destroy_events.get(), 1);
        assert_eq!(on_destroy.get(), 1);
        assert_eq!(child.el(), None);

        child.destroy(&mut doc);
        assert_eq!(destroy_events.get(), 1, "second destroy is a no-op");
    }

    #[test]
    fn init_without_target_or_element_is_a_noop() {
        let mut doc = Document::new();
        let (inits, sub) = counter();
        let mut child = Child {
            lifecycle: Lifecycle::default(),
            clicks: Rc::default(),
            fail_elements: false,
            listeners: Vec::new(),
        };
        child.subscribe("init", sub);
        child.init(&mut doc, None, None).unwrap();
        assert_eq!(child.el(), None);
        assert_eq!(inits.get(), 0);
        assert_eq!(child.emit_event("update", false), None);
    }

    #[test]
    fn selector_resolution_errors() {
        let mut doc = Document::new();
        doc.append(doc.body(), Element::new("div").with_id("here"));
        let err = Child::new(&mut doc, "#missing".into(), ParentOptions::default()).unwrap_err();
        assert_eq!(
            err,
            Error::ElementNotFound {
                widget: "child",
                selector: String::from("#missing"),
            }
        );
        let err = Child::new(&mut doc, "[open".into(), ParentOptions::default()).unwrap_err();
        assert!(matches!(err, Error::Selector(_)));
        let child = Child::new(&mut doc, "#here".into(), ParentOptions::default()).unwrap();
        assert!(child.el().is_some());
    }

    #[test]
    fn state_callback_follows_every_emit_but_not_destroy() {
        let mut doc = Document::new();
        let el = doc.append(doc.body(), Element::new("div"));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let options = ParentOptions::default().on_state_change(move |bound: &bool| {
            sink.borrow_mut().push(*bound);
        });
        let mut child = Child::new(&mut doc, el.into(), options).unwrap();
        assert_eq!(child.emit_event("update", true), Some(true));
        child.destroy(&mut doc);
        assert_eq!(*seen.borrow(), vec![true, true]);
    }

    #[test]
    fn prevented_cancelable_event_reports_false() {
        let mut doc = Document::new();
        let el = doc.append(doc.body(), Element::new("div"));
        let options = ParentOptions::default().on("show", |e: &CustomEvent, _: &Child| {
            assert_eq!(e.full_name(), "c.child.show");
            e.prevent_default();
        });
        let child = Child::new(&mut doc, el.into(), options).unwrap();
        assert_eq!(child.emit_event("show", true), Some(false));
        assert_eq!(child.emit_event("show", false), Some(true));
    }

    #[test]
    fn failing_element_hook_rolls_back() {
        let mut doc = Document::new();
        let el = doc.append(doc.body(), Element::new("div"));
        let mut child = Child::new(&mut doc, el.into(), ParentOptions::default().with_init(false))
            .unwrap();
        child.fail_elements = true;
        let err = child.init(&mut doc, Some(el.into()), None).unwrap_err();
        assert!(matches!(err, Error::MissingMarkup { element, .. } if element == el));
        assert_eq!(child.el(), None);
        assert!(child.lifecycle().scope().is_none());
    }

    #[test]
    fn listeners_bubble_and_stop() {
        let mut doc = Document::new();
        let root = doc.append(doc.body(), Element::new("nav"));
        let inner = doc.append(root, Element::new("ul"));
        let button = doc.append(inner, Element::new("button"));
        let mut child = Child::new(&mut doc, root.into(), ParentOptions::default().with_init(false))
            .unwrap();
        child.listeners = vec![
            (root, ChildHandler::Log(1)),
            (button, ChildHandler::Log(2)),
            (inner, ChildHandler::StopHere),
        ];
        child.init(&mut doc, Some(root.into()), None).unwrap();

        assert_eq!(child.dispatch(&mut doc, &UiEvent::click(button)), Some(inner));
        assert_eq!(*child.clicks.borrow(), vec![2]);
        assert_eq!(child.dispatch(&mut doc, &UiEvent::click(root)), None);
        assert_eq!(*child.clicks.borrow(), vec![2, 1]);
    }

    #[test]
    fn destroy_inside_handler_stops_dispatch_and_drops_listeners() {
        let mut doc = Document::new();
        let root = doc.append(doc.body(), Element::new("nav"));
        let button = doc.append(root, Element::new("button"));
        let mut child = Child::new(&mut doc, root.into(), ParentOptions::default().with_init(false))
            .unwrap();
        child.listeners = vec![
            (button, ChildHandler::Destroy),
            (root, ChildHandler::Log(1)),
        ];
        child.init(&mut doc, Some(root.into()), None).unwrap();

        assert_eq!(child.dispatch(&mut doc, &UiEvent::click(button)), Some(button));
        assert!(child.clicks.borrow().is_empty());
        assert_eq!(child.dispatch(&mut doc, &UiEvent::click(root)), None);
        assert!(child.clicks.borrow().is_empty());
        child.register_event("late", root, UiEventKind::Click, ChildHandler::Log(9));
        assert!(child.lifecycle().scope().is_none());
    }

    #[test]
    fn reinit_replaces_scope_and_keeps_subscriptions() {
        let mut doc = Document::new();
        let root = doc.append(doc.body(), Element::new("nav"));
        let (on_init, handler) = counter();
        let (sub_init, sub) = counter();
        let mut child =
            Child::new(&mut doc, root.into(), ParentOptions::default().on("init", handler)).unwrap();
        let id = child.subscribe("init", sub);
        let first_scope = child.lifecycle().scope().map(ListenerScope::id);

        child.options_mut().init = Some(true);
        child.init(&mut doc, None, None).unwrap();
        assert_ne!(child.lifecycle().scope().map(ListenerScope::id), first_scope);
        assert_eq!(on_init.get(), 2, "declarative handlers are attached once per scope");
        assert_eq!(sub_init.get(), 1);

        child.destroy(&mut doc);
        child.init(&mut doc, Some(root.into()), None).unwrap();
        assert_eq!(sub_init.get(), 2, "subscriptions survive destroy");
        assert!(child.unsubscribe(id));
        assert!(!child.unsubscribe(id));
    }
}
