// Copyright 2025 the Compotes Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Element data: tag, attributes, inline and computed styles, layout metrics.

use alloc::string::{String, ToString};

use kurbo::{Size, Vec2};
use smallvec::{Array, SmallVec};

type Pair = (String, String);

/// Data carried by an element node.
///
/// Attributes and inline styles keep insertion order, like the DOM does when
/// serializing. Mutating an element that is already part of a [`Document`]
/// should go through the document so observers see the change; the `with_*`
/// builders are meant for elements that are not inserted yet.
///
/// [`Document`]: crate::Document
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Element {
    tag: String,
    attributes: SmallVec<[Pair; 4]>,
    styles: SmallVec<[Pair; 2]>,
    computed: SmallVec<[Pair; 2]>,
    /// Inner size of the element's box, as reported by the host's layout.
    pub client_size: Size,
    /// Size of the element's content including overflow.
    pub scroll_size: Size,
    /// Current scroll position.
    pub scroll_offset: Vec2,
}

impl Element {
    /// Create an element with the given tag name (stored lowercase).
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Self::default()
        }
    }

    /// Add a class.
    pub fn with_class(mut self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    /// Set an attribute.
    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Set the `id` attribute.
    pub fn with_id(self, id: &str) -> Self {
        self.with_attribute("id", id)
    }

    /// Set an inline style property.
    pub fn with_style(mut self, property: &str, value: &str) -> Self {
        self.set_style(property, value);
        self
    }

    /// Set a computed style property, such as `transition-duration`.
    pub fn with_computed_style(mut self, property: &str, value: &str) -> Self {
        set_pair(&mut self.computed, property, value);
        self
    }

    /// Set the client size.
    pub fn with_client_size(mut self, size: Size) -> Self {
        self.client_size = size;
        self
    }

    /// Set the scroll size.
    pub fn with_scroll_size(mut self, size: Size) -> Self {
        self.scroll_size = size;
        self
    }

    /// Lowercase tag name.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Value of an attribute.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        get_pair(&self.attributes, name)
    }

    /// Iterate attributes in insertion order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Whether the attribute is present.
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// The `id` attribute, if set.
    pub fn id(&self) -> Option<&str> {
        self.attribute("id")
    }

    /// Iterate the classes of the `class` attribute.
    pub fn classes(&self) -> impl Iterator<Item = &str> + '_ {
        self.attribute("class")
            .unwrap_or_default()
            .split_ascii_whitespace()
    }

    /// Whether the element carries `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    /// Inline style property.
    pub fn style(&self, property: &str) -> Option<&str> {
        get_pair(&self.styles, property)
    }

    /// Iterate inline style properties in insertion order.
    pub fn styles(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.styles.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Computed style property, as provided by the host.
    pub fn computed_style(&self, property: &str) -> Option<&str> {
        get_pair(&self.computed, property)
    }

    pub(crate) fn set_attribute(&mut self, name: &str, value: &str) -> bool {
        set_pair(&mut self.attributes, name, value)
    }

    pub(crate) fn remove_attribute(&mut self, name: &str) -> bool {
        remove_pair(&mut self.attributes, name)
    }

    pub(crate) fn add_class(&mut self, class: &str) -> bool {
        if self.has_class(class) {
            return false;
        }
        let value = match self.attribute("class") {
            Some(existing) if !existing.trim().is_empty() => {
                let mut value = existing.trim().to_string();
                value.push(' ');
                value.push_str(class);
                value
            }
            _ => class.to_string(),
        };
        self.set_attribute("class", &value)
    }

    pub(crate) fn remove_class(&mut self, class: &str) -> bool {
        if !self.has_class(class) {
            return false;
        }
        let value = self
            .classes()
            .filter(|c| *c != class)
            .collect::<alloc::vec::Vec<_>>()
            .join(" ");
        self.set_attribute("class", &value)
    }

    pub(crate) fn set_style(&mut self, property: &str, value: &str) -> bool {
        set_pair(&mut self.styles, property, value)
    }

    pub(crate) fn remove_style(&mut self, property: &str) -> bool {
        remove_pair(&mut self.styles, property)
    }
}

fn get_pair<'a, A: Array<Item = Pair>>(pairs: &'a SmallVec<A>, name: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}

/// Returns `true` when the stored value changed.
fn set_pair<A: Array<Item = Pair>>(pairs: &mut SmallVec<A>, name: &str, value: &str) -> bool {
    if let Some((_, v)) = pairs.iter_mut().find(|(k, _)| k == name) {
        if v == value {
            return false;
        }
        v.clear();
        v.push_str(value);
    } else {
        pairs.push((name.to_string(), value.to_string()));
    }
    true
}

fn remove_pair<A: Array<Item = Pair>>(pairs: &mut SmallVec<A>, name: &str) -> bool {
    let before = pairs.len();
    pairs.retain(|(k, _)| k != name);
    pairs.len() != before
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn classes_are_added_once_and_removed_cleanly() {
        let mut el = Element::new("NAV").with_class("a");
        assert_eq!(el.tag(), "nav");
        assert!(el.add_class("b"));
        assert!(!el.add_class("a"), "duplicate class must not be appended");
        assert_eq!(el.attribute("class"), Some("a b"));
        assert!(el.remove_class("a"));
        assert_eq!(el.classes().collect::<Vec<_>>(), ["b"]);
        assert!(!el.remove_class("missing"));
    }

    #[test]
    fn attributes_keep_insertion_order() {
        let mut el = Element::new("button")
            .with_attribute("type", "button")
            .with_id("x");
        assert!(el.set_attribute("type", "submit"));
        assert!(!el.set_attribute("type", "submit"), "same value is not a change");
        let names: Vec<_> = el.attributes().map(|(k, _)| k).collect();
        assert_eq!(names, ["type", "id"]);
        assert!(el.remove_attribute("type"));
        assert!(!el.has_attribute("type"));
    }

    #[test]
    fn pair_lists_spill_past_inline_capacity() {
        let mut el = Element::new("div")
            .with_style("height", "10px")
            .with_style("width", "20px")
            .with_style("--delay", "0ms")
            .with_computed_style("transition-duration", "0.3s")
            .with_computed_style("transition-delay", "0s")
            .with_computed_style("display", "block");
        for (name, value) in [("a", "1"), ("b", "2"), ("c", "3"), ("d", "4"), ("e", "5")] {
            assert!(el.set_attribute(name, value));
        }
        assert_eq!(el.attribute("e"), Some("5"));
        assert_eq!(el.style("--delay"), Some("0ms"));
        assert_eq!(el.computed_style("display"), Some("block"));
        assert!(el.remove_style("width"));
        assert!(!el.set_style("height", "10px"), "same value is not a change");
        assert_eq!(el.styles().map(|(k, _)| k).collect::<Vec<_>>(), ["height", "--delay"]);
    }
}
