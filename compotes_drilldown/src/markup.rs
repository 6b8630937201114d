// Copyright 2025 the Compotes Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Markup conventions: class lookups, ARIA attributes, focus containment markers.

use alloc::{string::String, vec::Vec};

use compotes_dom::{Document, NodeId};
use compotes_focus::{generate_id, is_generated_id, tabbables};
use smallvec::SmallVec;

/// Class of every panel list, the root one included.
pub const CLASS_MENU: &str = "c-drilldown-menu";
/// Class of controls opening the panel next to them.
pub const CLASS_NEXT: &str = "c-drilldown-next";
/// Class of controls returning to the parent panel.
pub const CLASS_BACK: &str = "c-drilldown-back";
/// Marker on elements removed from the tab order because they sit outside the current panel.
///
/// The value keeps the element's previous `tabindex`, or `true` when it had none.
pub const DATA_HIDDEN: &str = "data-c-hidden";
/// Custom property receiving the wrapper's transition time.
pub const CSSVAR_DELAY: &str = "--c-drilldown-delay";

const NO_TABINDEX: &str = "true";

/// Controls whose `aria-controls` was written by the accessibility pass.
pub(crate) type Controlled = SmallVec<[NodeId; 8]>;

/// Descendants of `scope` carrying `class`, in document order.
pub(crate) fn with_class(doc: &Document, scope: NodeId, class: &str) -> Vec<NodeId> {
    doc.descendants(scope)
        .filter(|n| doc.has_class(*n, class))
        .collect()
}

/// First descendant of `scope` carrying `class`.
pub(crate) fn first_with_class(doc: &Document, scope: NodeId, class: &str) -> Option<NodeId> {
    doc.descendants(scope).find(|n| doc.has_class(*n, class))
}

/// Nearest ancestor-or-self of `node` carrying `class`, without leaving `root`.
pub(crate) fn closest_within(
    doc: &Document,
    root: NodeId,
    node: NodeId,
    class: &str,
) -> Option<NodeId> {
    doc.closest(node, |_, el| el.has_class(class))
        .filter(|found| doc.is_inclusive_ancestor(root, *found))
}

/// The panel a next control opens: the first menu inside the control's parent.
pub(crate) fn panel_for(doc: &Document, control: NodeId) -> Option<NodeId> {
    first_with_class(doc, doc.parent_of(control)?, CLASS_MENU)
}

/// `li` children of every panel under `root`.
fn menu_items(doc: &Document, root: NodeId) -> Vec<NodeId> {
    let mut panels = with_class(doc, root, CLASS_MENU);
    if doc.has_class(root, CLASS_MENU) {
        panels.insert(0, root);
    }
    panels
        .into_iter()
        .flat_map(|panel| doc.element_children(panel))
        .filter(|item| doc.element(*item).is_some_and(|el| el.tag() == "li"))
        .collect()
}

/// Assign menu roles and pair next controls with their panels.
///
/// Safe to run repeatedly: `aria-expanded` is only initialized when absent and
/// existing `aria-controls`/`id` values are kept.
pub(crate) fn apply_accessibility(
    doc: &mut Document,
    root: NodeId,
    wrapper: Option<NodeId>,
    controlled: &mut Controlled,
) {
    if let Some(wrapper) = wrapper {
        doc.set_attribute(wrapper, "role", "menubar");
        doc.set_attribute(wrapper, "aria-multiselectable", "false");
        doc.set_attribute(wrapper, "aria-orientation", "vertical");
        for menu in with_class(doc, wrapper, CLASS_MENU) {
            doc.set_attribute(menu, "role", "menu");
        }
    }
    for item in menu_items(doc, root) {
        doc.set_attribute(item, "role", "none");
    }
    for back in with_class(doc, root, CLASS_BACK) {
        doc.set_attribute(back, "role", "menuitem");
    }
    for next in with_class(doc, root, CLASS_NEXT) {
        doc.set_attribute(next, "role", "menuitem");
        if !doc.has_attribute(next, "aria-expanded") {
            doc.set_attribute(next, "aria-expanded", "false");
        }
        if doc.attribute(next, "aria-controls").is_some_and(|v| !v.is_empty()) {
            continue;
        }
        let Some(panel) = panel_for(doc, next) else {
            continue;
        };
        let id = match doc.id_of(panel).filter(|id| !id.is_empty()) {
            Some(id) => id.into(),
            None => {
                let id = generate_id();
                doc.set_attribute(panel, "id", &id);
                id
            }
        };
        doc.set_attribute(next, "aria-controls", &id);
        if !controlled.contains(&next) {
            controlled.push(next);
        }
    }
}

/// Undo [`apply_accessibility`].
pub(crate) fn remove_accessibility(
    doc: &mut Document,
    root: NodeId,
    wrapper: Option<NodeId>,
    controlled: &mut Controlled,
) {
    if let Some(wrapper) = wrapper {
        for name in ["role", "aria-multiselectable", "aria-orientation"] {
            doc.remove_attribute(wrapper, name);
        }
        for menu in with_class(doc, wrapper, CLASS_MENU) {
            doc.remove_attribute(menu, "role");
        }
    }
    for item in menu_items(doc, root) {
        doc.remove_attribute(item, "role");
    }
    for back in with_class(doc, root, CLASS_BACK) {
        doc.remove_attribute(back, "role");
    }
    for next in with_class(doc, root, CLASS_NEXT) {
        doc.remove_attribute(next, "role");
        doc.remove_attribute(next, "aria-expanded");
        if controlled.contains(&next) {
            doc.remove_attribute(next, "aria-controls");
        }
        if let Some(panel) = panel_for(doc, next)
            && doc.id_of(panel).is_some_and(is_generated_id)
        {
            doc.remove_attribute(panel, "id");
        }
    }
    controlled.clear();
}

/// Put every element carrying [`DATA_HIDDEN`] back into the tab order.
pub(crate) fn restore_hidden(doc: &mut Document, root: NodeId) {
    let hidden: Vec<NodeId> = doc
        .descendants(root)
        .filter(|n| doc.has_attribute(*n, DATA_HIDDEN))
        .collect();
    for node in hidden {
        unhide(doc, node);
    }
}

fn unhide(doc: &mut Document, node: NodeId) {
    match doc.attribute(node, DATA_HIDDEN).map(String::from) {
        Some(previous) if previous != NO_TABINDEX => {
            doc.set_attribute(node, "tabindex", &previous);
        }
        _ => {
            doc.remove_attribute(node, "tabindex");
        }
    }
    doc.remove_attribute(node, DATA_HIDDEN);
}

/// Keep only `current`'s tabbable elements in the tab order.
///
/// Elements whose hidden state is already right are left alone, so repeated
/// passes neither reorder attributes nor queue mutation records.
pub(crate) fn sync_hidden(doc: &mut Document, root: NodeId, current: Option<NodeId>) {
    let outside = |doc: &Document, node: NodeId| {
        current.is_some_and(|c| closest_within(doc, root, node, CLASS_MENU) != Some(c))
    };
    let (keep, restore): (Vec<NodeId>, Vec<NodeId>) = {
        let doc: &Document = doc;
        doc.descendants(root)
            .filter(|n| doc.has_attribute(*n, DATA_HIDDEN))
            .partition(|n| outside(doc, *n))
    };
    for node in restore {
        unhide(doc, node);
    }
    let hide: Vec<NodeId> = tabbables(doc, root)
        .into_iter()
        .filter(|n| !keep.contains(n) && outside(doc, *n))
        .collect();
    for item in hide {
        let previous = doc
            .attribute(item, "tabindex")
            .map_or_else(|| NO_TABINDEX.into(), String::from);
        doc.set_attribute(item, DATA_HIDDEN, &previous);
        doc.set_attribute(item, "tabindex", "-1");
    }
}
