// Copyright 2025 the Compotes Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Native event routing: target first, then each ancestor.
//!
//! [`route`] turns a [`UiEvent`] and a set of listeners into the ordered list of
//! handlers to run. [`Component::dispatch`](crate::Component::dispatch) walks that
//! list and honors [`Outcome::Stop`].
//!
//! ```
//! use compotes_dom::{Document, Element};
//! use compotes_lifecycle::dispatch::route;
//! use compotes_lifecycle::{Listener, UiEvent, UiEventKind};
//!
//! let mut doc = Document::new();
//! let nav = doc.append(doc.body(), Element::new("nav"));
//! let button = doc.append(nav, Element::new("button"));
//!
//! let listeners = [
//!     Listener { id: "root", target: nav, kind: UiEventKind::Click, handler: 'r' },
//!     Listener { id: "keys", target: nav, kind: UiEventKind::KeyDown, handler: 'k' },
//!     Listener { id: "button", target: button, kind: UiEventKind::Click, handler: 'b' },
//! ];
//! let handlers: Vec<char> = route(&doc, &listeners, &UiEvent::click(button))
//!     .into_iter()
//!     .map(|(_, h)| h)
//!     .collect();
//! assert_eq!(handlers, ['b', 'r']);
//! ```

use alloc::vec::Vec;

use compotes_dom::{Document, NodeId};

use crate::{Listener, UiEvent};

/// Propagation control returned by [`Component::handle`](crate::Component::handle).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Keep propagating to the remaining listeners.
    Continue,
    /// Stop propagation; no further listener runs.
    Stop,
}

/// Listeners that should see `event`, paired with the node they are attached to.
///
/// Listeners on the target run first, then those on its parent, and so on up
/// to the root. Listeners attached to the same node keep registration order.
pub fn route<H: Copy>(doc: &Document, listeners: &[Listener<H>], event: &UiEvent) -> Vec<(NodeId, H)> {
    let mut out = Vec::new();
    for node in doc.event_path(event.target) {
        out.extend(
            listeners
                .iter()
                .filter(|l| l.target == node && l.kind == event.kind)
                .map(|l| (node, l.handler)),
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UiEventKind;
    use alloc::vec;
    use compotes_dom::Element;

    #[test]
    fn detached_targets_route_nowhere_outside_their_subtree() {
        let mut doc = Document::new();
        let nav = doc.append(doc.body(), Element::new("nav"));
        let loose = doc.create_element(Element::new("button"));
        let listeners = [Listener {
            id: "root",
            target: nav,
            kind: UiEventKind::Click,
            handler: 1_u8,
        }];
        assert!(route(&doc, &listeners, &UiEvent::click(loose)).is_empty());
        doc.append_child(nav, loose);
        assert_eq!(
            route(&doc, &listeners, &UiEvent::click(loose)),
            vec![(nav, 1)]
        );
    }

    #[test]
    fn kinds_are_filtered() {
        let mut doc = Document::new();
        let nav = doc.append(doc.body(), Element::new("nav"));
        let listeners = [
            Listener {
                id: "click",
                target: nav,
                kind: UiEventKind::Click,
                handler: 1_u8,
            },
            Listener {
                id: "key",
                target: nav,
                kind: UiEventKind::KeyDown,
                handler: 2_u8,
            },
        ];
        assert_eq!(
            route(&doc, &listeners, &UiEvent::key_down(nav, "a")),
            vec![(nav, 2)]
        );
    }
}
