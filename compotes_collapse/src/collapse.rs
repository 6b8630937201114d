// Copyright 2025 the Compotes Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::{format, string::String, vec::Vec};

use compotes_dom::{Document, NodeId, transition_duration_ms};
use compotes_lifecycle::{
    Component, Error, Lifecycle, Outcome, ParentOptions, Target, UiEvent, UiEventKind,
    timer::Timeout,
};
use smallvec::SmallVec;

/// Class of elements toggling a collapse through `aria-controls`.
pub const CLASS_TRIGGER: &str = "c-collapse-trigger";
/// Class present on the root while expanded.
pub const CLASS_SHOW: &str = "c-collapse--show";
/// Class present on the root while a height transition runs.
pub const CLASS_COLLAPSING: &str = "c-collapse--collapsing";

const MISSING_ID: &str = "The component needs an id referenced by its triggers : <div class=\"c-collapse\" id=\"collapse-1\"></div>";

/// Snapshot passed to the state change callback.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CollapseState {
    /// Whether the region is (or is becoming) visible.
    pub expanded: bool,
    /// Whether a height transition is running.
    pub collapsing: bool,
}

/// Native listeners registered by the collapse.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CollapseHandler {
    /// Delegated click on the document body, filtered to this collapse's triggers.
    Toggle,
}

/// A region shown and hidden by its triggers.
#[derive(Debug)]
pub struct Collapse {
    lifecycle: Lifecycle<Self>,
    triggers: Vec<NodeId>,
    with_role: SmallVec<[NodeId; 4]>,
    expanded: bool,
    collapsing: bool,
    timeout: Timeout,
}

impl Collapse {
    /// Create a collapse, initializing it on `target` unless `options.init` is `false`.
    pub fn new<'a>(
        doc: &mut Document,
        target: impl Into<Target<'a>>,
        options: ParentOptions<Self>,
    ) -> Result<Self, Error> {
        let mut collapse = Self {
            lifecycle: Lifecycle::new(options),
            triggers: Vec::new(),
            with_role: SmallVec::new(),
            expanded: false,
            collapsing: false,
            timeout: Timeout::new(),
        };
        if collapse.is_initializable() {
            collapse.init(doc, Some(target.into()), None)?;
        }
        Ok(collapse)
    }

    /// Whether the region is (or is becoming) visible.
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Whether a height transition is running.
    pub fn is_collapsing(&self) -> bool {
        self.collapsing
    }

    /// Triggers found by the last discovery, in document order.
    pub fn triggers(&self) -> &[NodeId] {
        &self.triggers
    }

    /// Show when hidden, hide when shown, starting any transition at `now`.
    pub fn toggle(&mut self, doc: &mut Document, now: u64) {
        if self.expanded {
            self.hide(doc, now);
        } else {
            self.show(doc, now);
        }
    }

    /// Expand the region, timing any transition from `now` (milliseconds).
    ///
    /// Ignored while a transition runs or when already expanded. The cancelable
    /// `show` event can veto the change.
    pub fn show(&mut self, doc: &mut Document, now: u64) {
        let Some(root) = self.el() else {
            return;
        };
        if self.collapsing || self.expanded {
            return;
        }
        if self.emit_event("show", true) == Some(false) {
            tracing::debug!("show prevented");
            return;
        }

        self.expanded = true;
        let duration = transition_duration_ms(doc, root);
        if duration > 0 {
            let height = doc.scroll_size(root).height;
            self.start_transition(doc, root, now, duration);
            doc.set_style(root, "height", &format!("{height}px"));
        }
        doc.add_class(root, CLASS_SHOW);
        self.sync_triggers(doc);
        tracing::debug!(duration, "show");
        if duration == 0 {
            self.emit_event("shown", false);
        }
    }

    /// Collapse the region, timing any transition from `now` (milliseconds).
    ///
    /// Ignored while a transition runs or when already hidden. The cancelable
    /// `hide` event can veto the change.
    pub fn hide(&mut self, doc: &mut Document, now: u64) {
        let Some(root) = self.el() else {
            return;
        };
        if self.collapsing || !self.expanded {
            return;
        }
        if self.emit_event("hide", true) == Some(false) {
            tracing::debug!("hide prevented");
            return;
        }

        self.expanded = false;
        let duration = transition_duration_ms(doc, root);
        if duration > 0 {
            // Pin the current height so the transition has a start value.
            let height = doc.scroll_size(root).height;
            doc.set_style(root, "height", &format!("{height}px"));
            self.start_transition(doc, root, now, duration);
            doc.set_style(root, "height", "0px");
        }
        doc.remove_class(root, CLASS_SHOW);
        self.sync_triggers(doc);
        tracing::debug!(duration, "hide");
        if duration == 0 {
            self.emit_event("hidden", false);
        }
    }

    /// Re-discover triggers and re-sync their ARIA state.
    pub fn update(&mut self, doc: &mut Document) {
        if self.el().is_none() {
            return;
        }
        self.discover_triggers(doc);
        self.sync_triggers(doc);
        self.emit_event("update", false);
    }

    /// Finish a transition whose time is up at `now` (milliseconds).
    pub fn tick(&mut self, doc: &mut Document, now: u64) {
        if !self.timeout.poll(now) {
            return;
        }
        let Some(root) = self.el() else {
            return;
        };
        self.end_transition(doc, root);
        self.emit_event(if self.expanded { "shown" } else { "hidden" }, false);
    }

    fn start_transition(&mut self, doc: &mut Document, root: NodeId, now: u64, duration: u64) {
        self.collapsing = true;
        doc.add_class(root, CLASS_COLLAPSING);
        self.timeout.arm(now, duration);
    }

    fn end_transition(&mut self, doc: &mut Document, root: NodeId) {
        self.collapsing = false;
        self.timeout.cancel();
        doc.remove_class(root, CLASS_COLLAPSING);
        doc.remove_style(root, "height");
    }

    fn root_id(&self, doc: &Document) -> Option<String> {
        doc.id_of(self.el()?).filter(|id| !id.is_empty()).map(String::from)
    }

    fn discover_triggers(&mut self, doc: &mut Document) {
        let Some(id) = self.root_id(doc) else {
            self.triggers.clear();
            return;
        };
        self.triggers = find_triggers(doc, &id);
        for trigger in &self.triggers {
            let is_button = doc.element(*trigger).is_some_and(|el| el.tag() == "button");
            if is_button || doc.has_attribute(*trigger, "role") {
                continue;
            }
            doc.set_attribute(*trigger, "role", "button");
            if !self.with_role.contains(trigger) {
                self.with_role.push(*trigger);
            }
        }
    }

    fn sync_triggers(&self, doc: &mut Document) {
        let value = if self.expanded { "true" } else { "false" };
        for trigger in &self.triggers {
            doc.set_attribute(*trigger, "aria-expanded", value);
        }
    }
}

/// Every trigger in the document pointing at `id`.
fn find_triggers(doc: &Document, id: &str) -> Vec<NodeId> {
    doc.descendants(doc.body())
        .filter(|n| {
            doc.has_class(*n, CLASS_TRIGGER) && doc.attribute(*n, "aria-controls") == Some(id)
        })
        .collect()
}

impl Component for Collapse {
    const NAME: &'static str = "collapse";
    type State = CollapseState;
    type Handler = CollapseHandler;
    type Options = ParentOptions<Self>;

    fn lifecycle(&self) -> &Lifecycle<Self> {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle<Self> {
        &mut self.lifecycle
    }

    fn state(&self) -> CollapseState {
        CollapseState {
            expanded: self.expanded,
            collapsing: self.collapsing,
        }
    }

    fn init_elements(&mut self, doc: &mut Document) -> Result<(), Error> {
        let Some(root) = self.el() else {
            return Ok(());
        };
        if self.root_id(doc).is_none() {
            return Err(Error::MissingMarkup {
                widget: Self::NAME,
                message: MISSING_ID,
                element: root,
            });
        }
        if self.collapsing {
            self.end_transition(doc, root);
        }
        self.expanded = doc.has_class(root, CLASS_SHOW);
        self.discover_triggers(doc);
        self.sync_triggers(doc);
        Ok(())
    }

    fn init_events(&mut self, doc: &mut Document) {
        self.register_event("toggle", doc.body(), UiEventKind::Click, CollapseHandler::Toggle);
    }

    fn destroy_elements(&mut self, doc: &mut Document) {
        if let Some(root) = self.el()
            && self.collapsing
        {
            self.end_transition(doc, root);
        }
        self.timeout.cancel();
        for trigger in self.triggers.drain(..) {
            doc.remove_attribute(trigger, "aria-expanded");
        }
        for trigger in self.with_role.drain(..) {
            doc.remove_attribute(trigger, "role");
        }
    }

    fn handle(&mut self, doc: &mut Document, handler: CollapseHandler, event: &UiEvent) -> Outcome {
        match handler {
            CollapseHandler::Toggle => {
                let Some(id) = self.root_id(doc) else {
                    return Outcome::Continue;
                };
                let on_trigger = doc
                    .closest(event.target, |_, el| {
                        el.has_class(CLASS_TRIGGER)
                            && el.attribute("aria-controls") == Some(id.as_str())
                    })
                    .is_some();
                if on_trigger {
                    self.toggle(doc, event.time);
                }
            }
        }
        Outcome::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::{
        rc::Rc,
        string::{String, ToString},
        vec,
    };
    use core::cell::RefCell;

    use compotes_dom::{Element, Size};

    struct Fixture {
        doc: Document,
        trigger: NodeId,
        region: NodeId,
    }

    fn fixture(duration: &str) -> Fixture {
        let mut doc = Document::new();
        let wrapper = doc.append(doc.body(), Element::new("div"));
        let trigger = doc.append(
            wrapper,
            Element::new("button")
                .with_class(CLASS_TRIGGER)
                .with_attribute("aria-controls", "accordion-1"),
        );
        doc.append_text(trigger, "Accordion");
        let region = doc.append(
            wrapper,
            Element::new("div")
                .with_class("c-collapse")
                .with_id("accordion-1")
                .with_computed_style("transition-duration", duration)
                .with_scroll_size(Size::new(320.0, 180.0)),
        );
        let text = doc.append(region, Element::new("p"));
        doc.append_text(text, "Lorem ipsum");
        Fixture {
            doc,
            trigger,
            region,
        }
    }

    fn recording() -> (ParentOptions<Collapse>, Rc<RefCell<Vec<String>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut options = ParentOptions::default();
        for name in ["show", "shown", "hide", "hidden", "update", "destroy"] {
            let sink = log.clone();
            options = options.on(name, move |event, _: &Collapse| {
                sink.borrow_mut().push(event.name().to_string());
            });
        }
        (options, log)
    }

    #[test]
    fn click_runs_a_timed_transition() {
        let mut f = fixture("0.2s");
        let before = f.doc.outer_html(f.doc.body());
        let (options, log) = recording();
        let mut collapse = Collapse::new(&mut f.doc, f.region, options).unwrap();
        assert!(!collapse.is_expanded());
        assert_eq!(collapse.triggers(), &[f.trigger]);
        assert_eq!(f.doc.attribute(f.trigger, "aria-expanded"), Some("false"));

        collapse.dispatch(&mut f.doc, &UiEvent::click(f.trigger).at(1_000));
        assert_eq!(f.doc.attribute(f.trigger, "aria-expanded"), Some("true"));
        assert!(collapse.is_collapsing());
        assert!(f.doc.has_class(f.region, CLASS_COLLAPSING));
        assert!(f.doc.has_class(f.region, CLASS_SHOW));
        assert_eq!(f.doc.style(f.region, "height"), Some("180px"));

        collapse.dispatch(&mut f.doc, &UiEvent::click(f.trigger).at(1_100));
        assert!(collapse.is_expanded(), "clicks during a transition are ignored");

        collapse.tick(&mut f.doc, 1_199);
        assert!(collapse.is_collapsing());
        collapse.tick(&mut f.doc, 1_200);
        assert!(!collapse.is_collapsing());
        assert!(collapse.is_expanded());
        assert_eq!(f.doc.style(f.region, "height"), None);
        assert!(!f.doc.has_class(f.region, CLASS_COLLAPSING));

        collapse.dispatch(&mut f.doc, &UiEvent::click(f.trigger).at(1_200));
        assert_eq!(f.doc.attribute(f.trigger, "aria-expanded"), Some("false"));
        assert_eq!(f.doc.style(f.region, "height"), Some("0px"));
        assert!(!f.doc.has_class(f.region, CLASS_SHOW));
        collapse.tick(&mut f.doc, 1_400);
        assert!(!collapse.is_expanded());
        assert!(!collapse.is_collapsing());

        assert_eq!(*log.borrow(), vec!["show", "shown", "hide", "hidden"]);

        collapse.destroy(&mut f.doc);
        assert_eq!(f.doc.outer_html(f.doc.body()), before);
    }

    #[test]
    fn transition_after_idle_gap_runs_its_full_duration() {
        let mut f = fixture("300ms");
        let (options, log) = recording();
        let mut collapse = Collapse::new(&mut f.doc, f.region, options).unwrap();

        // The host stops ticking while nothing animates.
        collapse.tick(&mut f.doc, 0);
        collapse.show(&mut f.doc, 10_000);
        assert!(collapse.is_collapsing());

        collapse.tick(&mut f.doc, 10_001);
        assert!(collapse.is_collapsing(), "timed from the show, not the last tick");
        collapse.tick(&mut f.doc, 10_299);
        assert!(collapse.is_collapsing());
        collapse.tick(&mut f.doc, 10_300);
        assert!(!collapse.is_collapsing());

        collapse.dispatch(&mut f.doc, &UiEvent::click(f.trigger).at(50_000));
        collapse.tick(&mut f.doc, 50_001);
        assert!(collapse.is_collapsing(), "clicks carry their own time");
        collapse.tick(&mut f.doc, 50_300);
        assert!(!collapse.is_expanded());
        assert!(!collapse.is_collapsing());

        assert_eq!(*log.borrow(), vec!["show", "shown", "hide", "hidden"]);
    }

    #[test]
    fn without_transition_events_fire_immediately() {
        let mut f = fixture("0s");
        let (options, log) = recording();
        let mut collapse = Collapse::new(&mut f.doc, f.region, options).unwrap();

        collapse.show(&mut f.doc, 0);
        assert!(collapse.is_expanded());
        assert!(!collapse.is_collapsing());
        assert_eq!(f.doc.style(f.region, "height"), None);
        collapse.show(&mut f.doc, 0);
        collapse.hide(&mut f.doc, 0);
        collapse.hide(&mut f.doc, 0);

        assert_eq!(*log.borrow(), vec!["show", "shown", "hide", "hidden"]);
    }

    #[test]
    fn prevented_show_keeps_state() {
        let mut f = fixture("0s");
        let options = ParentOptions::default().on("show", |event, _: &Collapse| {
            event.prevent_default();
        });
        let mut collapse = Collapse::new(&mut f.doc, f.region, options).unwrap();

        collapse.show(&mut f.doc, 0);
        assert!(!collapse.is_expanded());
        assert!(!f.doc.has_class(f.region, CLASS_SHOW));
        assert_eq!(f.doc.attribute(f.trigger, "aria-expanded"), Some("false"));
    }

    #[test]
    fn initial_state_follows_show_class() {
        let mut f = fixture("0s");
        f.doc.add_class(f.region, CLASS_SHOW);
        let collapse = Collapse::new(&mut f.doc, f.region, ParentOptions::default()).unwrap();
        assert!(collapse.is_expanded());
        assert_eq!(f.doc.attribute(f.trigger, "aria-expanded"), Some("true"));
    }

    #[test]
    fn non_button_triggers_get_a_role() {
        let mut f = fixture("0s");
        let link = f.doc.append(
            f.doc.body(),
            Element::new("a")
                .with_class(CLASS_TRIGGER)
                .with_attribute("aria-controls", "accordion-1"),
        );
        let unrelated = f.doc.append(
            f.doc.body(),
            Element::new("a")
                .with_class(CLASS_TRIGGER)
                .with_attribute("aria-controls", "elsewhere"),
        );
        let mut collapse = Collapse::new(&mut f.doc, f.region, ParentOptions::default()).unwrap();
        assert_eq!(collapse.triggers(), &[f.trigger, link]);
        assert_eq!(f.doc.attribute(link, "role"), Some("button"));
        assert_eq!(f.doc.attribute(f.trigger, "role"), None);
        assert_eq!(f.doc.attribute(unrelated, "aria-expanded"), None);

        collapse.dispatch(&mut f.doc, &UiEvent::click(unrelated));
        assert!(!collapse.is_expanded());
        collapse.dispatch(&mut f.doc, &UiEvent::click(link));
        assert!(collapse.is_expanded());

        collapse.destroy(&mut f.doc);
        assert_eq!(f.doc.attribute(link, "role"), None);
        assert_eq!(f.doc.attribute(link, "aria-expanded"), None);
    }

    #[test]
    fn update_finds_new_triggers() {
        let mut f = fixture("0s");
        let (options, log) = recording();
        let mut collapse = Collapse::new(&mut f.doc, f.region, options).unwrap();
        collapse.show(&mut f.doc, 0);

        let late = f.doc.append(
            f.doc.body(),
            Element::new("button")
                .with_class(CLASS_TRIGGER)
                .with_attribute("aria-controls", "accordion-1"),
        );
        collapse.update(&mut f.doc);
        assert_eq!(f.doc.attribute(late, "aria-expanded"), Some("true"));
        assert_eq!(log.borrow().last().map(String::as_str), Some("update"));

        collapse.dispatch(&mut f.doc, &UiEvent::click(late));
        assert!(!collapse.is_expanded());
    }

    #[test]
    fn destroy_mid_transition_cleans_up() {
        let mut f = fixture("300ms");
        let (options, log) = recording();
        let mut collapse = Collapse::new(&mut f.doc, f.region, options).unwrap();
        collapse.show(&mut f.doc, 0);
        assert!(collapse.is_collapsing());

        collapse.destroy(&mut f.doc);
        assert!(!f.doc.has_class(f.region, CLASS_COLLAPSING));
        assert_eq!(f.doc.style(f.region, "height"), None);
        collapse.tick(&mut f.doc, 1_000);
        assert!(!log.borrow().iter().any(|n| n == "shown"), "timer is cancelled");
    }

    #[test]
    fn root_without_id_is_an_error() {
        let mut doc = Document::new();
        let region = doc.append(doc.body(), Element::new("div").with_class("c-collapse"));
        let err = Collapse::new(&mut doc, region, ParentOptions::default()).unwrap_err();
        assert!(matches!(err, Error::MissingMarkup { widget: "collapse", .. }));
    }
}
