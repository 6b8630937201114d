// Copyright 2025 the Compotes Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event payloads: namespaced custom events emitted by components, and native
//! input events fed in by the host.

use alloc::{format, string::String};
use core::cell::Cell;

use compotes_dom::NodeId;

/// A custom event emitted by a component on its root element.
///
/// The full name follows the `c.<widget>.<name>` scheme. Handlers that receive a
/// cancelable event may call [`CustomEvent::prevent_default`] to veto the action.
#[derive(Debug)]
pub struct CustomEvent {
    full_name: String,
    name_offset: usize,
    target: NodeId,
    cancelable: bool,
    default_prevented: Cell<bool>,
}

impl CustomEvent {
    pub(crate) fn new(widget: &str, name: &str, target: NodeId, cancelable: bool) -> Self {
        let full_name = format!("c.{widget}.{name}");
        Self {
            name_offset: full_name.len() - name.len(),
            full_name,
            target,
            cancelable,
            default_prevented: Cell::new(false),
        }
    }

    /// The namespaced name, for example `c.drilldown.next`.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// The short name, for example `next`.
    pub fn name(&self) -> &str {
        &self.full_name[self.name_offset..]
    }

    /// The root element the event was emitted on.
    pub fn target(&self) -> NodeId {
        self.target
    }

    /// Whether handlers may prevent the default action.
    pub fn cancelable(&self) -> bool {
        self.cancelable
    }

    /// Veto the default action. Ignored on non-cancelable events.
    pub fn prevent_default(&self) {
        if self.cancelable {
            self.default_prevented.set(true);
        }
    }

    /// Whether a handler called [`CustomEvent::prevent_default`].
    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

/// Kinds of native input events a component can listen to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum UiEventKind {
    /// Pointer activation (or keyboard activation of a button).
    Click,
    /// A key press.
    KeyDown,
}

/// Keys that widgets react to, parsed from DOM `KeyboardEvent.key` values.
///
/// Legacy names (`Up`, `Down`, `Left`, `Right`, `Esc`) map to the same variants
/// as their modern spellings.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// `ArrowUp` / `Up`.
    ArrowUp,
    /// `ArrowDown` / `Down`.
    ArrowDown,
    /// `ArrowLeft` / `Left`.
    ArrowLeft,
    /// `ArrowRight` / `Right`.
    ArrowRight,
    /// `Escape` / `Esc`.
    Escape,
    /// `Home`.
    Home,
    /// `End`.
    End,
    /// `PageUp`.
    PageUp,
    /// `PageDown`.
    PageDown,
    /// `Enter`.
    Enter,
    /// `Tab`.
    Tab,
    /// A single printable character.
    Character(char),
    /// Any other named key (`Shift`, `F1`, ...).
    Named(String),
}

impl Key {
    /// Parse a DOM key value.
    pub fn parse(key: &str) -> Self {
        match key {
            "ArrowUp" | "Up" => Self::ArrowUp,
            "ArrowDown" | "Down" => Self::ArrowDown,
            "ArrowLeft" | "Left" => Self::ArrowLeft,
            "ArrowRight" | "Right" => Self::ArrowRight,
            "Escape" | "Esc" => Self::Escape,
            "Home" => Self::Home,
            "End" => Self::End,
            "PageUp" => Self::PageUp,
            "PageDown" => Self::PageDown,
            "Enter" => Self::Enter,
            "Tab" => Self::Tab,
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Self::Character(c),
                    _ => Self::Named(String::from(key)),
                }
            }
        }
    }
}

/// A native input event delivered by the host to [`Component::dispatch`](crate::Component::dispatch).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UiEvent {
    /// The element the event originated from.
    pub target: NodeId,
    /// What happened.
    pub kind: UiEventKind,
    /// The key, for [`UiEventKind::KeyDown`] events.
    pub key: Option<Key>,
    /// Host timestamp in milliseconds, on the same clock passed to widget `tick`s.
    pub time: u64,
}

impl UiEvent {
    /// A click on `target`.
    pub fn click(target: NodeId) -> Self {
        Self {
            target,
            kind: UiEventKind::Click,
            key: None,
            time: 0,
        }
    }

    /// A key press while `target` holds focus. `key` is a DOM key value such as `ArrowDown`.
    pub fn key_down(target: NodeId, key: &str) -> Self {
        Self {
            target,
            kind: UiEventKind::KeyDown,
            key: Some(Key::parse(key)),
            time: 0,
        }
    }

    /// Stamp the event with the host time it happened at.
    #[must_use]
    pub fn at(mut self, time: u64) -> Self {
        self.time = time;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use compotes_dom::Document;

    #[test]
    fn keys_accept_legacy_names() {
        assert_eq!(Key::parse("Up"), Key::ArrowUp);
        assert_eq!(Key::parse("ArrowLeft"), Key::parse("Left"));
        assert_eq!(Key::parse("Esc"), Key::Escape);
        assert_eq!(Key::parse("b"), Key::Character('b'));
        assert_eq!(Key::parse("é"), Key::Character('é'));
        assert_eq!(Key::parse("Shift"), Key::Named(String::from("Shift")));
    }

    #[test]
    fn ui_events_carry_host_time() {
        let doc = Document::new();
        let click = UiEvent::click(doc.body());
        assert_eq!(click.time, 0);
        let click = click.at(1_500);
        assert_eq!(click.time, 1_500);
        assert_eq!(click.kind, UiEventKind::Click);
        assert_eq!(UiEvent::key_down(doc.body(), "Enter").at(7).time, 7);
    }

    #[test]
    fn custom_event_names_and_cancellation() {
        let doc = Document::new();
        let event = CustomEvent::new("drilldown", "next", doc.body(), false);
        assert_eq!(event.full_name(), "c.drilldown.next");
        assert_eq!(event.name(), "next");
        event.prevent_default();
        assert!(!event.default_prevented(), "non-cancelable events ignore prevention");

        let event = CustomEvent::new("collapse", "show", doc.body(), true);
        event.prevent_default();
        assert!(event.default_prevented());
    }
}
