// Copyright 2025 the Compotes Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compotes Focus: keyboard focus helpers over a [`compotes_dom::Document`].
//!
//! Menus and disclosure widgets share a handful of focus moves:
//! - Find the first or last **tabbable** element inside a container ([`focus_element`]).
//! - Focus it ([`focus_first`], [`focus_last`]), optionally scrolling a root back to the origin.
//! - Move between **sibling groups**: the container's direct children, each holding one or
//!   more tabbable elements ([`focus_sibling`]). Navigation wraps at both ends.
//! - Jump to the group whose first tabbable element's text starts with a typed character
//!   ([`focus_char`]).
//! - Mint process-unique ids for ARIA pairings ([`generate_id`]).
//!
//! ## Tabbable rule
//!
//! An element is tabbable when it is not `disabled` and either its `tabindex` parses to a
//! non-negative integer, or it has no `tabindex` and is naturally focusable: `button`,
//! `select`, `textarea`, `input` (except `type="hidden"`), `a`/`area` with `href`,
//! `summary`, or any element with `contenteditable`. Visibility is not considered.
//!
//! Tabbables are ordered like the browser's sequential navigation: positive `tabindex`
//! values first (ascending, ties in document order), then everything else in document order.
//!
//! ## Example
//!
//! ```rust
//! use compotes_dom::{Document, Element};
//! use compotes_focus::{Direction, focus_char, focus_first, focus_sibling};
//!
//! let mut doc = Document::new();
//! let list = doc.append(doc.body(), Element::new("ul"));
//! let mut buttons = Vec::new();
//! for label in ["Alpha", "Beta", "Charlie"] {
//!     let item = doc.append(list, Element::new("li"));
//!     let button = doc.append(item, Element::new("button"));
//!     doc.append_text(button, label);
//!     buttons.push(button);
//! }
//!
//! assert!(focus_first(&mut doc, list, None));
//! assert_eq!(doc.active_element(), Some(buttons[0]));
//!
//! focus_sibling(&mut doc, list, Direction::Previous);
//! assert_eq!(doc.active_element(), Some(buttons[2]));
//!
//! focus_char(&mut doc, list, 'b');
//! assert_eq!(doc.active_element(), Some(buttons[1]));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::{format, string::String, vec::Vec};
use core::cmp::Ordering;
use core::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use compotes_dom::{Document, Element, NodeId, Vec2};

/// Prefix of every id produced by [`generate_id`].
pub const GENERATED_ID_PREFIX: &str = "c-id-";

static ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Which end of a container's tabbable sequence to pick.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Position {
    /// The first tabbable element.
    First,
    /// The last tabbable element.
    Last,
}

/// Direction of sibling-group navigation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Towards the end of the container (for example, `ArrowDown`).
    Next,
    /// Towards the start of the container (for example, `ArrowUp`).
    Previous,
}

/// Whether an element can be reached with sequential keyboard navigation.
pub fn is_tabbable(el: &Element) -> bool {
    if el.has_attribute("disabled") {
        return false;
    }
    match tab_index(el) {
        Some(index) => index >= 0,
        None => is_naturally_focusable(el),
    }
}

/// Every tabbable descendant of `container` in sequential navigation order.
pub fn tabbables(doc: &Document, container: NodeId) -> Vec<NodeId> {
    let mut entries: Vec<(Option<i32>, NodeId)> = doc
        .descendants(container)
        .filter_map(|id| {
            let el = doc.element(id)?;
            is_tabbable(el).then(|| (tab_index(el).filter(|i| *i > 0), id))
        })
        .collect();
    // `sort_by` is stable, so ties keep document order.
    entries.sort_by(|a, b| compare_order(a.0, b.0));
    entries.into_iter().map(|(_, id)| id).collect()
}

fn compare_order(a: Option<i32>, b: Option<i32>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// The first or last tabbable element inside `container`.
pub fn focus_element(doc: &Document, container: NodeId, position: Position) -> Option<NodeId> {
    let all = tabbables(doc, container);
    match position {
        Position::First => all.first().copied(),
        Position::Last => all.last().copied(),
    }
}

/// Focus the first tabbable element inside `container`.
///
/// When `scroll_root` is given it is scrolled back to the origin after focusing.
/// Returns `false` when the container has nothing to focus.
pub fn focus_first(doc: &mut Document, container: NodeId, scroll_root: Option<NodeId>) -> bool {
    let Some(first) = focus_element(doc, container, Position::First) else {
        return false;
    };
    doc.focus(first);
    if let Some(root) = scroll_root {
        doc.scroll_to(root, Vec2::ZERO);
    }
    true
}

/// Focus the last tabbable element inside `container`.
pub fn focus_last(doc: &mut Document, container: NodeId) -> bool {
    let Some(last) = focus_element(doc, container, Position::Last) else {
        return false;
    };
    doc.focus(last);
    true
}

/// Move focus to the next or previous sibling group of `container`.
///
/// The group holding focus is the focused element's parent, looked up among the
/// container's element children. Without such a group the first tabbable element
/// is focused. Groups without a tabbable element are skipped, and navigation
/// wraps around at either end.
pub fn focus_sibling(doc: &mut Document, container: NodeId, direction: Direction) -> bool {
    let items: Vec<NodeId> = doc.element_children(container).collect();
    let current = doc
        .active_element()
        .and_then(|active| doc.parent_of(active))
        .and_then(|parent| items.iter().position(|item| *item == parent));
    let Some(current) = current else {
        return focus_first(doc, container, None);
    };

    let candidates: Vec<NodeId> = match direction {
        Direction::Next => items[current + 1..].to_vec(),
        Direction::Previous => items[..current].iter().rev().copied().collect(),
    };
    if candidates
        .into_iter()
        .any(|item| focus_first(doc, item, None))
    {
        return true;
    }
    tracing::trace!(?direction, "focus wrapped around");
    match direction {
        Direction::Next => focus_first(doc, container, None),
        Direction::Previous => focus_last(doc, container),
    }
}

/// Focus the first sibling group whose first tabbable element's text starts with `ch`.
///
/// Matching ignores case and surrounding whitespace. Focus is unchanged when
/// nothing matches.
pub fn focus_char(doc: &mut Document, container: NodeId, ch: char) -> bool {
    let items: Vec<NodeId> = doc.element_children(container).collect();
    let target = items.into_iter().find_map(|item| {
        let first = focus_element(doc, item, Position::First)?;
        let text = doc.text_content(first);
        let initial = text.trim().chars().next()?;
        chars_eq_ignore_case(initial, ch).then_some(first)
    });
    match target {
        Some(target) => doc.focus(target),
        None => false,
    }
}

fn chars_eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// Generate a process-unique id of the form `c-id-<n>`, with `n` starting at 1.
pub fn generate_id() -> String {
    let n = ID_COUNTER.fetch_add(1, AtomicOrdering::Relaxed) + 1;
    format!("{GENERATED_ID_PREFIX}{n}")
}

/// Whether `id` looks like it came from [`generate_id`].
pub fn is_generated_id(id: &str) -> bool {
    id.starts_with(GENERATED_ID_PREFIX)
}

fn tab_index(el: &Element) -> Option<i32> {
    el.attribute("tabindex")?.trim().parse().ok()
}

fn is_naturally_focusable(el: &Element) -> bool {
    match el.tag() {
        "button" | "select" | "textarea" | "summary" => true,
        "input" => el.attribute("type") != Some("hidden"),
        "a" | "area" => el.has_attribute("href"),
        _ => el.has_attribute("contenteditable"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    struct Fixture {
        doc: Document,
        container: NodeId,
        empty: NodeId,
        buttons: Vec<NodeId>,
    }

    fn fixture() -> Fixture {
        let mut doc = Document::new();
        let container = doc.append(doc.body(), Element::new("div"));
        let mut buttons = Vec::new();
        for label in ["Alpha", "Beta", "Charlie"] {
            let item = doc.append(container, Element::new("div"));
            let button = doc.append(item, Element::new("button"));
            doc.append_text(button, label);
            buttons.push(button);
        }
        let empty = doc.append(doc.body(), Element::new("div"));
        Fixture {
            doc,
            container,
            empty,
            buttons,
        }
    }

    #[test]
    fn generated_ids_increment() {
        let a = generate_id();
        let b = generate_id();
        let n = |id: &str| -> u64 { id.strip_prefix(GENERATED_ID_PREFIX).unwrap().parse().unwrap() };
        assert!(is_generated_id(&a));
        assert!(n(&b) > n(&a), "ids must increase: {a} then {b}");
        assert!(!is_generated_id("menu-1"));
    }

    #[test]
    fn tabbable_rule() {
        let yes = [
            Element::new("button"),
            Element::new("a").with_attribute("href", "#"),
            Element::new("input"),
            Element::new("div").with_attribute("tabindex", "0"),
            Element::new("span").with_attribute("contenteditable", ""),
        ];
        let no = [
            Element::new("a"),
            Element::new("div"),
            Element::new("input").with_attribute("type", "hidden"),
            Element::new("button").with_attribute("disabled", ""),
            Element::new("button").with_attribute("tabindex", "-1"),
        ];
        for el in &yes {
            assert!(is_tabbable(el), "{el:?} should be tabbable");
        }
        for el in &no {
            assert!(!is_tabbable(el), "{el:?} should not be tabbable");
        }
    }

    #[test]
    fn positive_tabindex_comes_first() {
        let mut doc = Document::new();
        let root = doc.append(doc.body(), Element::new("div"));
        let plain = doc.append(root, Element::new("button"));
        let two = doc.append(root, Element::new("button").with_attribute("tabindex", "2"));
        let one = doc.append(root, Element::new("button").with_attribute("tabindex", "1"));
        let zero = doc.append(root, Element::new("div").with_attribute("tabindex", "0"));
        assert_eq!(tabbables(&doc, root), vec![one, two, plain, zero]);
    }

    #[test]
    fn first_and_last() {
        let mut f = fixture();
        assert_eq!(
            focus_element(&f.doc, f.container, Position::First),
            Some(f.buttons[0])
        );
        assert_eq!(
            focus_element(&f.doc, f.container, Position::Last),
            Some(f.buttons[2])
        );
        assert_eq!(focus_element(&f.doc, f.empty, Position::First), None);

        assert!(focus_last(&mut f.doc, f.container));
        assert_eq!(f.doc.active_element(), Some(f.buttons[2]));
        assert!(!focus_first(&mut f.doc, f.empty, None));
        assert!(!focus_last(&mut f.doc, f.empty));
        assert_eq!(f.doc.active_element(), Some(f.buttons[2]));
    }

    #[test]
    fn focus_first_scrolls_root() {
        let mut f = fixture();
        let root = f.doc.body();
        f.doc.scroll_to(root, Vec2::new(0.0, 100.0));
        assert!(focus_first(&mut f.doc, f.container, Some(root)));
        assert_eq!(f.doc.scroll_offset(root), Vec2::ZERO);
        assert_eq!(f.doc.active_element(), Some(f.buttons[0]));
    }

    #[test]
    fn sibling_navigation_wraps() {
        let mut f = fixture();
        let cases = [
            (0, Direction::Next, 1),
            (1, Direction::Previous, 0),
            (2, Direction::Next, 0),
            (0, Direction::Previous, 2),
        ];
        for (from, direction, to) in cases {
            f.doc.focus(f.buttons[from]);
            assert!(focus_sibling(&mut f.doc, f.container, direction));
            assert_eq!(
                f.doc.active_element(),
                Some(f.buttons[to]),
                "{direction:?} from {from}"
            );
        }
    }

    #[test]
    fn sibling_navigation_skips_groups_without_tabbables() {
        let mut f = fixture();
        let middle = f.doc.parent_of(f.buttons[1]).unwrap();
        f.doc.set_attribute(f.buttons[1], "disabled", "");
        f.doc.focus(f.buttons[0]);
        focus_sibling(&mut f.doc, f.container, Direction::Next);
        assert_eq!(f.doc.active_element(), Some(f.buttons[2]));
        assert!(f.doc.is_alive(middle));
    }

    #[test]
    fn sibling_navigation_without_focus_in_container_focuses_first() {
        let mut f = fixture();
        f.doc.blur();
        focus_sibling(&mut f.doc, f.container, Direction::Next);
        assert_eq!(f.doc.active_element(), Some(f.buttons[0]));

        f.doc.focus(f.empty);
        focus_sibling(&mut f.doc, f.container, Direction::Previous);
        assert_eq!(f.doc.active_element(), Some(f.buttons[0]));
    }

    #[test]
    fn character_search() {
        let mut f = fixture();
        assert!(focus_char(&mut f.doc, f.container, 'b'));
        assert_eq!(f.doc.active_element(), Some(f.buttons[1]));
        assert!(focus_char(&mut f.doc, f.container, 'C'));
        assert_eq!(f.doc.active_element(), Some(f.buttons[2]));

        f.doc.focus(f.buttons[0]);
        assert!(!focus_char(&mut f.doc, f.container, 'z'));
        assert_eq!(f.doc.active_element(), Some(f.buttons[0]));
    }
}
