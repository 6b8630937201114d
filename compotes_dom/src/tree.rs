// Copyright 2025 the Compotes Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core document implementation: structure, mutation, traversal, focus, observation.

use alloc::{string::String, vec::Vec};
use core::fmt::Write as _;

use hashbrown::HashMap;
use kurbo::{Size, Vec2};

use crate::element::Element;
use crate::selector::{Selector, SelectorError};
use crate::types::{NodeId, ObserveFlags, ObserverId, Record};

/// An arena-backed document tree.
///
/// Nodes live in slots with a generation counter, so a [`NodeId`] that
/// outlives its node is detected and ignored by every accessor instead of
/// aliasing a newer node.
///
/// ## Example
///
/// ```rust
/// use compotes_dom::{Document, Element};
///
/// let mut doc = Document::new();
/// let nav = doc.append(doc.body(), Element::new("nav").with_class("menu"));
/// let button = doc.append(nav, Element::new("button"));
/// doc.append_text(button, "Open");
///
/// assert_eq!(doc.query_selector(".menu > button").unwrap(), Some(button));
/// assert_eq!(doc.text_content(nav), "Open");
/// ```
pub struct Document {
    /// slots
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    body: NodeId,
    active: Option<NodeId>,
    observers: HashMap<ObserverId, Observer>,
    next_observer: u32,
}

impl core::fmt::Debug for Document {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Document")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("active", &self.active)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug)]
enum NodeData {
    Element(Element),
    Text(String),
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: NodeData,
}

#[derive(Debug)]
struct Observer {
    target: NodeId,
    flags: ObserveFlags,
    records: Vec<Record>,
}

impl Document {
    /// Create a document holding a single `body` element.
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            body: NodeId::new(0, 0),
            active: None,
            observers: HashMap::new(),
            next_observer: 0,
        };
        doc.body = doc.alloc(NodeData::Element(Element::new("body")));
        doc
    }

    /// The root element of the document.
    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Create a detached element. Insert it with [`Document::append_child`].
    pub fn create_element(&mut self, element: Element) -> NodeId {
        self.alloc(NodeData::Element(element))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.alloc(NodeData::Text(String::from(text)))
    }

    /// Create an element and append it as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, element: Element) -> NodeId {
        let id = self.create_element(element);
        self.append_child(parent, id);
        id
    }

    /// Create a text node and append it as the last child of `parent`.
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        let id = self.create_text(text);
        self.append_child(parent, id);
        id
    }

    /// Move `child` to the end of `parent`'s children.
    ///
    /// Does nothing when either id is stale, when `parent` is a text node, or
    /// when `child` is `parent` or one of its ancestors.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if !self.is_alive(parent)
            || !self.is_alive(child)
            || self.is_inclusive_ancestor(child, parent)
            || !matches!(self.node(parent).data, NodeData::Element(_))
        {
            return;
        }
        if let Some(old) = self.node(child).parent {
            self.node_mut(old).children.retain(|c| *c != child);
            self.notify(Record::ChildList { target: old });
        }
        self.node_mut(parent).children.push(child);
        self.node_mut(child).parent = Some(parent);
        self.notify(Record::ChildList { target: parent });
    }

    /// Remove a node and its subtree. The body cannot be removed.
    pub fn remove(&mut self, id: NodeId) {
        if !self.is_alive(id) || id == self.body {
            return;
        }
        if let Some(parent) = self.node(id).parent {
            self.node_mut(parent).children.retain(|c| *c != id);
            self.notify(Record::ChildList { target: parent });
        }
        self.free_subtree(id);
    }

    /// Returns true if `id` refers to a live node.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .is_some_and(|n| n.generation == id.1)
    }

    /// Element data of a live element node.
    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.node_opt(id)?.data {
            NodeData::Element(el) => Some(el),
            NodeData::Text(_) => None,
        }
    }

    /// Whether `id` is a live element node.
    pub fn is_element(&self, id: NodeId) -> bool {
        self.element(id).is_some()
    }

    /// Text of a live text node.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.node_opt(id)?.data {
            NodeData::Text(text) => Some(text),
            NodeData::Element(_) => None,
        }
    }

    /// Parent of a live node, or `None` for detached nodes, the body, or stale ids.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id)?.parent
    }

    /// Children of a live node, or an empty slice for stale ids.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.node_opt(id)
            .map(|n| n.children.as_slice())
            .unwrap_or_default()
    }

    /// Element children of a live node.
    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children_of(id)
            .iter()
            .copied()
            .filter(|c| self.is_element(*c))
    }

    /// Iterate the descendants of `root` in document (pre-)order, excluding `root`.
    pub fn descendants(&self, root: NodeId) -> Descendants<'_> {
        let next = self.children_of(root).first().copied();
        Descendants {
            doc: self,
            root,
            next,
        }
    }

    /// The nearest ancestor-or-self element satisfying `predicate`.
    pub fn closest(
        &self,
        id: NodeId,
        mut predicate: impl FnMut(NodeId, &Element) -> bool,
    ) -> Option<NodeId> {
        let mut current = Some(id);
        while let Some(node) = current {
            if let Some(el) = self.element(node)
                && predicate(node, el)
            {
                return Some(node);
            }
            current = self.parent_of(node);
        }
        None
    }

    /// Whether `ancestor` is `node` or one of its ancestors.
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            current = self.parent_of(n);
        }
        false
    }

    /// Path a bubbling event takes: `target` first, then each ancestor up to the root.
    pub fn event_path(&self, target: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = self.is_alive(target).then_some(target);
        while let Some(n) = current {
            out.push(n);
            current = self.parent_of(n);
        }
        out
    }

    /// Concatenated text of `id` and all its descendants.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        if let Some(text) = self.text(id) {
            out.push_str(text);
        }
        for node in self.descendants(id) {
            if let Some(text) = self.text(node) {
                out.push_str(text);
            }
        }
        out
    }

    // --- attributes ---

    /// Value of an attribute on a live element.
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?.attribute(name)
    }

    /// Whether a live element carries the attribute.
    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.attribute(id, name).is_some()
    }

    /// Set an attribute on a live element.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(el) = self.element_mut(id)
            && el.set_attribute(name, value)
        {
            self.notify_attribute(id, name);
        }
    }

    /// Remove an attribute; returns whether it was present.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> bool {
        let removed = self
            .element_mut(id)
            .is_some_and(|el| el.remove_attribute(name));
        if removed {
            self.notify_attribute(id, name);
        }
        removed
    }

    /// The `id` attribute of a live element.
    pub fn id_of(&self, id: NodeId) -> Option<&str> {
        self.attribute(id, "id")
    }

    /// Whether a live element carries `class`.
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element(id).is_some_and(|el| el.has_class(class))
    }

    /// Add a class to a live element.
    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if let Some(el) = self.element_mut(id)
            && el.add_class(class)
        {
            self.notify_attribute(id, "class");
        }
    }

    /// Remove a class from a live element.
    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        if let Some(el) = self.element_mut(id)
            && el.remove_class(class)
        {
            self.notify_attribute(id, "class");
        }
    }

    // --- styles and metrics ---

    /// Inline style property of a live element.
    pub fn style(&self, id: NodeId, property: &str) -> Option<&str> {
        self.element(id)?.style(property)
    }

    /// Set an inline style property (custom properties included).
    pub fn set_style(&mut self, id: NodeId, property: &str, value: &str) {
        if let Some(el) = self.element_mut(id)
            && el.set_style(property, value)
        {
            self.notify_attribute(id, "style");
        }
    }

    /// Remove an inline style property.
    pub fn remove_style(&mut self, id: NodeId, property: &str) {
        if let Some(el) = self.element_mut(id)
            && el.remove_style(property)
        {
            self.notify_attribute(id, "style");
        }
    }

    /// Computed style property of a live element.
    pub fn computed_style(&self, id: NodeId, property: &str) -> Option<&str> {
        self.element(id)?.computed_style(property)
    }

    /// Client size of a live element, [`Size::ZERO`] otherwise.
    pub fn client_size(&self, id: NodeId) -> Size {
        self.element(id).map_or(Size::ZERO, |el| el.client_size)
    }

    /// Report a new client size from layout. Resize observers of `id` are notified on change.
    pub fn set_client_size(&mut self, id: NodeId, size: Size) {
        let Some(el) = self.element_mut(id) else {
            return;
        };
        if el.client_size == size {
            return;
        }
        el.client_size = size;
        self.notify(Record::Resize { target: id, size });
    }

    /// Scroll size of a live element, [`Size::ZERO`] otherwise.
    pub fn scroll_size(&self, id: NodeId) -> Size {
        self.element(id).map_or(Size::ZERO, |el| el.scroll_size)
    }

    /// Report a new scroll size from layout.
    pub fn set_scroll_size(&mut self, id: NodeId, size: Size) {
        if let Some(el) = self.element_mut(id) {
            el.scroll_size = size;
        }
    }

    /// Current scroll position of a live element.
    pub fn scroll_offset(&self, id: NodeId) -> Vec2 {
        self.element(id).map_or(Vec2::ZERO, |el| el.scroll_offset)
    }

    /// Scroll a live element to `offset`.
    pub fn scroll_to(&mut self, id: NodeId, offset: Vec2) {
        if let Some(el) = self.element_mut(id) {
            el.scroll_offset = offset;
        }
    }

    // --- focus ---

    /// Move focus to a live element. Returns whether focus moved there.
    pub fn focus(&mut self, id: NodeId) -> bool {
        if !self.is_element(id) {
            return false;
        }
        self.active = Some(id);
        true
    }

    /// Clear focus.
    pub fn blur(&mut self) {
        self.active = None;
    }

    /// The focused element, if it is still alive.
    pub fn active_element(&self) -> Option<NodeId> {
        self.active.filter(|id| self.is_alive(*id))
    }

    // --- selectors ---

    /// First element in the document (body included) matching `selector`.
    pub fn query_selector(&self, selector: &str) -> Result<Option<NodeId>, SelectorError> {
        let selector = Selector::parse(selector)?;
        Ok(core::iter::once(self.body)
            .chain(self.descendants(self.body))
            .find(|id| selector.matches(self, *id)))
    }

    /// First descendant of `scope` matching `selector`.
    pub fn query_selector_in(
        &self,
        scope: NodeId,
        selector: &str,
    ) -> Result<Option<NodeId>, SelectorError> {
        let selector = Selector::parse(selector)?;
        Ok(self
            .descendants(scope)
            .find(|id| selector.matches(self, *id)))
    }

    /// Every descendant of `scope` matching `selector`, in document order.
    pub fn query_selector_all(
        &self,
        scope: NodeId,
        selector: &str,
    ) -> Result<Vec<NodeId>, SelectorError> {
        let selector = Selector::parse(selector)?;
        Ok(self
            .descendants(scope)
            .filter(|id| selector.matches(self, *id))
            .collect())
    }

    // --- observation ---

    /// Start observing `target`.
    ///
    /// Observing [`ObserveFlags::RESIZE`] queues an initial [`Record::Resize`]
    /// with the current size, matching how hosts report the first observation.
    pub fn observe(&mut self, target: NodeId, flags: ObserveFlags) -> ObserverId {
        let id = ObserverId(self.next_observer);
        self.next_observer = self.next_observer.wrapping_add(1);
        let mut records = Vec::new();
        if flags.contains(ObserveFlags::RESIZE) && self.is_element(target) {
            records.push(Record::Resize {
                target,
                size: self.client_size(target),
            });
        }
        self.observers.insert(
            id,
            Observer {
                target,
                flags,
                records,
            },
        );
        id
    }

    /// Drain the records queued for an observer.
    pub fn take_records(&mut self, observer: ObserverId) -> Vec<Record> {
        self.observers
            .get_mut(&observer)
            .map(|o| core::mem::take(&mut o.records))
            .unwrap_or_default()
    }

    /// Stop an observer and drop its pending records.
    pub fn disconnect(&mut self, observer: ObserverId) {
        self.observers.remove(&observer);
    }

    // --- serialization ---

    /// Serialize a node and its subtree as markup.
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_html(id, &mut out);
        out
    }

    fn write_html(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.node_opt(id) else {
            return;
        };
        match &node.data {
            NodeData::Text(text) => escape_into(text, false, out),
            NodeData::Element(el) => {
                out.push('<');
                out.push_str(el.tag());
                for (name, value) in el.attributes() {
                    let _ = write!(out, " {name}=\"");
                    escape_into(value, true, out);
                    out.push('"');
                }
                let mut styles = el.styles().peekable();
                if styles.peek().is_some() {
                    out.push_str(" style=\"");
                    for (i, (property, value)) in styles.enumerate() {
                        if i > 0 {
                            out.push(' ');
                        }
                        let _ = write!(out, "{property}: ");
                        escape_into(value, true, out);
                        out.push(';');
                    }
                    out.push('"');
                }
                out.push('>');
                for child in &node.children {
                    self.write_html(*child, out);
                }
                let _ = write!(out, "</{}>", el.tag());
            }
        }
    }
}

fn escape_into(text: &str, attribute: bool, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
}

/// Pre-order iterator over a subtree, created by [`Document::descendants`].
#[derive(Clone, Debug)]
pub struct Descendants<'a> {
    doc: &'a Document,
    root: NodeId,
    next: Option<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.doc.next_in_subtree(current, self.root);
        Some(current)
    }
}

impl Document {
    // --- internals ---

    fn alloc(&mut self, data: NodeData) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, data));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId indices are 32-bit."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, data)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId indices are 32-bit."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        NodeId::new(idx, generation)
    }

    fn free_subtree(&mut self, id: NodeId) {
        let children = core::mem::take(&mut self.node_mut(id).children);
        for child in children {
            self.free_subtree(child);
        }
        if self.active == Some(id) {
            self.active = None;
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    /// Access a node; panics if `id` is stale.
    fn node(&self, id: NodeId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling NodeId")
    }

    /// Access a node mutably; panics if `id` is stale.
    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes[id.idx()].as_mut().expect("dangling NodeId")
    }

    fn node_opt(&self, id: NodeId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        match &mut n.data {
            NodeData::Element(el) => Some(el),
            NodeData::Text(_) => None,
        }
    }

    fn next_in_subtree(&self, current: NodeId, root: NodeId) -> Option<NodeId> {
        if let Some(&first_child) = self.children_of(current).first() {
            return Some(first_child);
        }
        let mut node = current;
        while node != root {
            if let Some(next_sibling) = self.next_sibling(node) {
                return Some(next_sibling);
            }
            node = self.parent_of(node)?;
        }
        None
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.parent_of(node)?;
        let siblings = &self.node(parent).children;
        let pos = siblings.iter().position(|&id| id == node)?;
        siblings.get(pos + 1).copied()
    }

    fn notify_attribute(&mut self, target: NodeId, name: &str) {
        self.notify(Record::Attribute {
            target,
            name: String::from(name),
        });
    }

    fn notify(&mut self, record: Record) {
        if self.observers.is_empty() {
            return;
        }
        let flag = record.flag();
        let target = record.target();
        let interested: Vec<ObserverId> = self
            .observers
            .iter()
            .filter(|(_, o)| {
                o.flags.contains(flag)
                    && (o.target == target
                        || (flag != ObserveFlags::RESIZE
                            && o.flags.contains(ObserveFlags::SUBTREE)
                            && self.is_inclusive_ancestor(o.target, target)))
            })
            .map(|(id, _)| *id)
            .collect();
        for id in interested {
            if let Some(o) = self.observers.get_mut(&id) {
                o.records.push(record.clone());
            }
        }
    }
}

impl Node {
    fn new(generation: u32, data: NodeData) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            data,
        }
    }
}
