// Copyright 2025 the Compotes Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::{format, vec::Vec};

use compotes_dom::{Document, NodeId, ObserveFlags, transition_duration_ms};
use compotes_focus::{Direction, focus_char, focus_first, focus_last, focus_sibling};
use compotes_lifecycle::{
    Component, Error, Key, Lifecycle, Outcome, Target, UiEvent, UiEventKind,
};

use crate::markup::{
    self, CLASS_BACK, CLASS_MENU, CLASS_NEXT, CSSVAR_DELAY, Controlled, closest_within,
    first_with_class, panel_for,
};
use crate::watch::Watch;
use crate::{DrilldownOptions, DrilldownState};

const MISSING_MENU: &str = "The component needs to have an ul element : <nav class=\"c-drilldown\"><ul class=\"c-drilldown-menu\"></ul></nav>";

/// A panel of the menu tree.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Panel {
    /// The panel's list element.
    pub el: NodeId,
    /// Nesting depth, `0` for the root panel.
    pub level: usize,
}

/// Native listeners registered by the drilldown.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DrilldownHandler {
    /// Delegated click on the root: resolves next and back controls.
    Click,
    /// Keyboard navigation on the root.
    Key,
}

/// A drilldown menu bound to a root element.
#[derive(Debug)]
pub struct Drilldown {
    lifecycle: Lifecycle<Self>,
    wrapper: Option<NodeId>,
    current: Option<NodeId>,
    panels: Vec<Panel>,
    level: usize,
    controlled: Controlled,
    mutations: Option<Watch>,
    resizes: Option<Watch>,
}

impl Drilldown {
    /// Create a drilldown, initializing it on `target` unless `options.base.init` is `false`.
    pub fn new<'a>(
        doc: &mut Document,
        target: impl Into<Target<'a>>,
        options: DrilldownOptions,
    ) -> Result<Self, Error> {
        let mut drilldown = Self {
            lifecycle: Lifecycle::new(options),
            wrapper: None,
            current: None,
            panels: Vec::new(),
            level: 0,
            controlled: Controlled::new(),
            mutations: None,
            resizes: None,
        };
        if drilldown.is_initializable() {
            drilldown.init(doc, Some(target.into()), None)?;
        }
        Ok(drilldown)
    }

    /// Current depth, `0` at the root panel.
    pub fn level(&self) -> usize {
        self.level
    }

    /// The panel currently shown.
    pub fn current_panel(&self) -> Option<NodeId> {
        self.current
    }

    /// The root panel, translated to reveal the current one.
    pub fn wrapper(&self) -> Option<NodeId> {
        self.wrapper
    }

    /// Panels found by the last reload, nested panels before their parent.
    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    /// The panel containing `node`.
    pub fn panel_of(&self, doc: &Document, node: NodeId) -> Option<NodeId> {
        closest_within(doc, self.el()?, node, CLASS_MENU)
    }

    /// Open the panel of the next control at or around `control`.
    ///
    /// Ignored unless the control sits in the current panel and has a panel to open.
    pub fn next(&mut self, doc: &mut Document, control: NodeId) {
        let Some(root) = self.el() else {
            return;
        };
        let Some(control) = closest_within(doc, root, control, CLASS_NEXT) else {
            return;
        };
        if self.current.is_none() || self.panel_of(doc, control) != self.current {
            return;
        }
        let Some(panel) = panel_for(doc, control) else {
            return;
        };

        doc.set_attribute(control, "aria-expanded", "true");
        self.level += 1;
        self.current = Some(panel);
        tracing::debug!(level = self.level, ?panel, "next");
        self.update(doc, false);
        focus_first(doc, panel, Some(root));
        self.emit_event("next", false);
    }

    /// Return to the parent panel.
    pub fn back(&mut self, doc: &mut Document) {
        let (Some(root), Some(wrapper)) = (self.el(), self.wrapper) else {
            return;
        };
        if self.level == 0 {
            return;
        }
        // The innermost open branch is the last expanded control in document order.
        let Some(control) = expanded_controls(doc, wrapper).pop() else {
            return;
        };

        doc.set_attribute(control, "aria-expanded", "false");
        self.level -= 1;
        self.current = closest_within(doc, root, control, CLASS_MENU);
        tracing::debug!(level = self.level, "back");
        self.update(doc, false);
        if let Some(current) = self.current {
            focus_first(doc, current, Some(root));
        }
        self.emit_event("back", false);
    }

    /// Collapse every open panel and return to the root panel.
    pub fn reset(&mut self, doc: &mut Document) {
        let (Some(root), Some(wrapper)) = (self.el(), self.wrapper) else {
            return;
        };
        if self.level == 0 {
            return;
        }

        collapse_all(doc, wrapper);
        self.current = Some(wrapper);
        self.level = 0;
        tracing::debug!("reset");
        self.update(doc, false);
        focus_first(doc, wrapper, Some(root));
        self.emit_event("reset", false);
    }

    /// Re-render for the current level.
    ///
    /// Writes the wrapper transform and transition delay and restricts the tab
    /// order to the current panel. With `reload_items` the panel list, root
    /// height and ARIA attributes are rebuilt instead of emitting `update`.
    pub fn update(&mut self, doc: &mut Document, reload_items: bool) {
        let (Some(root), Some(wrapper)) = (self.el(), self.wrapper) else {
            return;
        };

        doc.set_style(
            wrapper,
            "transform",
            &format!("translateX(-{}%)", self.level * 100),
        );
        let delay = transition_duration_ms(doc, wrapper);
        doc.set_style(wrapper, CSSVAR_DELAY, &format!("{delay}ms"));
        self.disable_focus_elements(doc);

        if reload_items {
            self.update_items(doc);
            self.update_height(doc);
            markup::apply_accessibility(doc, root, self.wrapper, &mut self.controlled);
            return;
        }

        if self.options().dynamic_height {
            self.update_height(doc);
        }
        self.emit_event("update", false);
    }

    /// Run observer callbacks that are due at `now` (milliseconds, host clock).
    pub fn tick(&mut self, doc: &mut Document, now: u64) {
        if self.el().is_none() {
            return;
        }
        let reload = self.mutations.as_mut().is_some_and(|w| w.poll(doc, now));
        let resized = self.resizes.as_mut().is_some_and(|w| w.poll(doc, now));
        if reload {
            self.reload(doc);
        }
        if resized {
            tracing::debug!("root resized");
            self.update_height(doc);
        }
    }

    fn reload(&mut self, doc: &mut Document) {
        let Some(root) = self.el() else {
            return;
        };
        let inside = |doc: &Document, node: Option<NodeId>| {
            node.is_some_and(|n| doc.is_alive(n) && doc.is_inclusive_ancestor(root, n))
        };
        if !inside(doc, self.wrapper) {
            let Some(menu) = first_with_class(doc, root, CLASS_MENU) else {
                tracing::warn!(?root, "root menu is gone, reload skipped");
                return;
            };
            self.wrapper = Some(menu);
            self.current = None;
        }
        if !inside(doc, self.current) {
            if let Some(wrapper) = self.wrapper {
                collapse_all(doc, wrapper);
            }
            self.current = self.wrapper;
            self.level = 0;
        }
        tracing::debug!("markup changed, reloading panels");
        self.update(doc, true);
    }

    fn update_items(&mut self, doc: &Document) {
        self.panels.clear();
        if let Some(wrapper) = self.wrapper {
            collect_panels(doc, wrapper, 0, &mut self.panels);
        }
    }

    fn update_height(&self, doc: &mut Document) {
        let Some(root) = self.el() else {
            return;
        };
        let height = match self.current {
            Some(current) if self.options().dynamic_height => doc.client_size(current).height,
            _ => self
                .panels
                .iter()
                .map(|p| doc.client_size(p.el).height)
                .fold(0.0, f64::max),
        };
        doc.set_style(root, "height", &format!("{height}px"));
    }

    fn disable_focus_elements(&self, doc: &mut Document) {
        if let Some(root) = self.el() {
            markup::sync_hidden(doc, root, self.current);
        }
    }

    fn on_click(&mut self, doc: &mut Document, target: NodeId) {
        let Some(root) = self.el() else {
            return;
        };
        if let Some(control) = closest_within(doc, root, target, CLASS_NEXT) {
            self.next(doc, control);
        } else if closest_within(doc, root, target, CLASS_BACK).is_some() {
            self.back(doc);
        }
    }

    fn on_key(&mut self, doc: &mut Document, key: &Key) {
        let current = self.current;
        match key {
            Key::ArrowUp => {
                if let Some(current) = current {
                    focus_sibling(doc, current, Direction::Previous);
                }
            }
            Key::ArrowDown => {
                if let Some(current) = current {
                    focus_sibling(doc, current, Direction::Next);
                }
            }
            Key::ArrowLeft | Key::Escape => self.back(doc),
            Key::ArrowRight => {
                if let Some(active) = doc.active_element()
                    && doc.has_class(active, CLASS_NEXT)
                {
                    self.next(doc, active);
                }
            }
            Key::Home | Key::PageUp => {
                if let Some(current) = current {
                    focus_first(doc, current, None);
                }
            }
            Key::End | Key::PageDown => {
                if let Some(current) = current {
                    focus_last(doc, current);
                }
            }
            Key::Character(ch) => {
                if let Some(current) = current {
                    focus_char(doc, current, *ch);
                }
            }
            Key::Enter | Key::Tab | Key::Named(_) => {}
        }
    }

    fn disconnect_observers(&mut self, doc: &mut Document) {
        if let Some(watch) = self.mutations.take() {
            watch.disconnect(doc);
        }
        if let Some(watch) = self.resizes.take() {
            watch.disconnect(doc);
        }
    }
}

impl Component for Drilldown {
    const NAME: &'static str = "drilldown";
    type State = DrilldownState;
    type Handler = DrilldownHandler;
    type Options = DrilldownOptions;

    fn lifecycle(&self) -> &Lifecycle<Self> {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle<Self> {
        &mut self.lifecycle
    }

    fn state(&self) -> DrilldownState {
        DrilldownState {
            level: self.level,
            current_panel: self.current,
        }
    }

    fn init_elements(&mut self, doc: &mut Document) -> Result<(), Error> {
        let Some(root) = self.el() else {
            return Ok(());
        };
        self.disconnect_observers(doc);
        let Some(menu) = first_with_class(doc, root, CLASS_MENU) else {
            return Err(Error::MissingMarkup {
                widget: Self::NAME,
                message: MISSING_MENU,
                element: root,
            });
        };

        collapse_all(doc, menu);
        self.wrapper = Some(menu);
        self.current = Some(menu);
        self.level = 0;

        let watch_mutations = self.options().mutation_observer;
        self.mutations = watch_mutations
            .then(|| Watch::new(doc, root, ObserveFlags::CHILD_LIST | ObserveFlags::SUBTREE));
        self.resizes = Some(Watch::new(doc, root, ObserveFlags::RESIZE));

        self.update(doc, true);
        Ok(())
    }

    fn init_events(&mut self, _doc: &mut Document) {
        let Some(root) = self.el() else {
            return;
        };
        self.register_event("click", root, UiEventKind::Click, DrilldownHandler::Click);
        self.register_event("key", root, UiEventKind::KeyDown, DrilldownHandler::Key);
    }

    fn destroy_elements(&mut self, doc: &mut Document) {
        let Some(root) = self.el() else {
            return;
        };
        self.disconnect_observers(doc);
        markup::remove_accessibility(doc, root, self.wrapper, &mut self.controlled);
        markup::restore_hidden(doc, root);
        if let Some(wrapper) = self.wrapper {
            doc.remove_style(wrapper, "transform");
            doc.remove_style(wrapper, CSSVAR_DELAY);
        }
        doc.remove_style(root, "height");

        self.wrapper = None;
        self.current = None;
        self.level = 0;
        self.panels.clear();
    }

    fn handle(
        &mut self,
        doc: &mut Document,
        handler: DrilldownHandler,
        event: &UiEvent,
    ) -> Outcome {
        match handler {
            DrilldownHandler::Click => self.on_click(doc, event.target),
            DrilldownHandler::Key => {
                if let Some(key) = &event.key {
                    self.on_key(doc, key);
                }
            }
        }
        Outcome::Continue
    }
}

/// Post-order walk: nested panels first, each with its depth.
fn collect_panels(doc: &Document, menu: NodeId, level: usize, out: &mut Vec<Panel>) {
    for child in doc.element_children(menu) {
        if let Some(nested) = first_with_class(doc, child, CLASS_MENU) {
            collect_panels(doc, nested, level + 1, out);
        }
    }
    out.push(Panel { el: menu, level });
}

fn expanded_controls(doc: &Document, scope: NodeId) -> Vec<NodeId> {
    doc.descendants(scope)
        .filter(|n| doc.has_class(*n, CLASS_NEXT) && doc.attribute(*n, "aria-expanded") == Some("true"))
        .collect()
}

fn collapse_all(doc: &mut Document, scope: NodeId) {
    for control in expanded_controls(doc, scope) {
        doc.set_attribute(control, "aria-expanded", "false");
    }
}
