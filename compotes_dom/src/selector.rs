// Copyright 2025 the Compotes Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A small CSS selector subset.
//!
//! Supported: type (`ul`), universal (`*`), class (`.menu`), id (`#main`),
//! attribute presence (`[hidden]`) and equality (`[aria-expanded="true"]`),
//! compounds of those, and the descendant (` `) and child (`>`) combinators.

use alloc::{string::String, vec::Vec};

use smallvec::SmallVec;

use crate::Document;
use crate::types::NodeId;

/// Error returned when a selector string cannot be parsed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    /// The selector was empty or only whitespace.
    #[error("empty selector")]
    Empty,
    /// A character that is not valid at that position.
    #[error("unexpected `{found}` at offset {offset} in selector `{selector}`")]
    Unexpected {
        /// The full selector text.
        selector: String,
        /// The offending character.
        found: char,
        /// Byte offset of `found`.
        offset: usize,
    },
    /// The selector ended inside `[...]` or a quoted value, or after a combinator.
    #[error("selector `{selector}` ended unexpectedly")]
    UnexpectedEnd {
        /// The full selector text.
        selector: String,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct AttrMatch {
    name: String,
    value: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: SmallVec<[String; 2]>,
    attributes: SmallVec<[AttrMatch; 1]>,
}

/// A parsed selector.
///
/// ```rust
/// use compotes_dom::{Document, Element, Selector};
///
/// let mut doc = Document::new();
/// let ul = doc.append(doc.body(), Element::new("ul").with_class("menu"));
/// let li = doc.append(ul, Element::new("li"));
///
/// let selector = Selector::parse("ul.menu > li").unwrap();
/// assert!(selector.matches(&doc, li));
/// assert!(!selector.matches(&doc, ul));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selector {
    /// Compounds left to right; each one after the first carries the
    /// combinator linking it to its predecessor.
    compounds: Vec<(Combinator, Compound)>,
}

impl Selector {
    /// Parse a selector string.
    pub fn parse(text: &str) -> Result<Self, SelectorError> {
        Parser {
            text,
            chars: text.char_indices().peekable(),
        }
        .parse()
    }

    /// Whether the element `id` matches this selector.
    pub fn matches(&self, doc: &Document, id: NodeId) -> bool {
        self.matches_from(doc, self.compounds.len() - 1, id)
    }

    fn matches_from(&self, doc: &Document, index: usize, node: NodeId) -> bool {
        let (combinator, compound) = &self.compounds[index];
        if !compound.matches(doc, node) {
            return false;
        }
        if index == 0 {
            return true;
        }
        match combinator {
            Combinator::Child => doc
                .parent_of(node)
                .is_some_and(|parent| self.matches_from(doc, index - 1, parent)),
            Combinator::Descendant => {
                let mut ancestor = doc.parent_of(node);
                while let Some(a) = ancestor {
                    if self.matches_from(doc, index - 1, a) {
                        return true;
                    }
                    ancestor = doc.parent_of(a);
                }
                false
            }
        }
    }
}

impl Compound {
    fn is_empty(&self) -> bool {
        self.tag.is_none()
            && self.id.is_none()
            && self.classes.is_empty()
            && self.attributes.is_empty()
    }

    fn matches(&self, doc: &Document, node: NodeId) -> bool {
        let Some(el) = doc.element(node) else {
            return false;
        };
        self.tag.as_deref().is_none_or(|tag| tag == "*" || el.tag() == tag)
            && self.id.as_deref().is_none_or(|id| el.id() == Some(id))
            && self.classes.iter().all(|c| el.has_class(c))
            && self.attributes.iter().all(|a| match &a.value {
                None => el.has_attribute(&a.name),
                Some(v) => el.attribute(&a.name) == Some(v.as_str()),
            })
    }
}

struct Parser<'a> {
    text: &'a str,
    chars: core::iter::Peekable<core::str::CharIndices<'a>>,
}

impl Parser<'_> {
    fn parse(mut self) -> Result<Selector, SelectorError> {
        let mut compounds = Vec::new();
        let mut combinator = Combinator::Descendant;
        loop {
            self.skip_whitespace();
            if self.chars.peek().is_none() {
                break;
            }
            if !compounds.is_empty() && self.eat('>') {
                self.skip_whitespace();
                combinator = Combinator::Child;
            }
            let compound = self.compound()?;
            compounds.push((combinator, compound));
            combinator = Combinator::Descendant;
            match self.chars.peek() {
                None => break,
                Some((_, c)) if c.is_whitespace() || *c == '>' => {}
                Some(&(offset, found)) => return Err(self.unexpected(found, offset)),
            }
        }
        if compounds.is_empty() {
            return Err(SelectorError::Empty);
        }
        Ok(Selector { compounds })
    }

    fn compound(&mut self) -> Result<Compound, SelectorError> {
        let mut compound = Compound::default();
        if self.eat('*') {
            compound.tag = Some(String::from("*"));
        } else if self.peek_ident() {
            compound.tag = Some(self.ident()?.to_ascii_lowercase());
        }
        while let Some(&(offset, c)) = self.chars.peek() {
            match c {
                '.' => {
                    self.chars.next();
                    compound.classes.push(self.ident()?);
                }
                '#' => {
                    self.chars.next();
                    compound.id = Some(self.ident()?);
                }
                '[' => {
                    self.chars.next();
                    compound.attributes.push(self.attribute()?);
                }
                _ if compound.is_empty() => return Err(self.unexpected(c, offset)),
                _ => break,
            }
        }
        if compound.is_empty() {
            return Err(self.end());
        }
        Ok(compound)
    }

    fn attribute(&mut self) -> Result<AttrMatch, SelectorError> {
        self.skip_whitespace();
        let name = self.ident()?;
        self.skip_whitespace();
        let value = if self.eat('=') {
            self.skip_whitespace();
            let value = match self.chars.peek() {
                Some(&(_, quote @ ('"' | '\''))) => {
                    self.chars.next();
                    let mut value = String::new();
                    loop {
                        match self.chars.next() {
                            Some((_, c)) if c == quote => break,
                            Some((_, c)) => value.push(c),
                            None => return Err(self.end()),
                        }
                    }
                    value
                }
                _ => self.ident()?,
            };
            self.skip_whitespace();
            Some(value)
        } else {
            None
        };
        match self.chars.next() {
            Some((_, ']')) => Ok(AttrMatch { name, value }),
            Some((offset, found)) => Err(self.unexpected(found, offset)),
            None => Err(self.end()),
        }
    }

    fn peek_ident(&mut self) -> bool {
        self.chars.peek().is_some_and(|(_, c)| is_ident_char(*c))
    }

    fn ident(&mut self) -> Result<String, SelectorError> {
        let mut out = String::new();
        while let Some(&(_, c)) = self.chars.peek() {
            if !is_ident_char(c) {
                break;
            }
            out.push(c);
            self.chars.next();
        }
        if out.is_empty() {
            return Err(match self.chars.peek() {
                Some(&(offset, found)) => self.unexpected(found, offset),
                None => self.end(),
            });
        }
        Ok(out)
    }

    fn eat(&mut self, expected: char) -> bool {
        self.chars.next_if(|(_, c)| *c == expected).is_some()
    }

    fn skip_whitespace(&mut self) {
        while self.chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}
    }

    fn unexpected(&self, found: char, offset: usize) -> SelectorError {
        SelectorError::Unexpected {
            selector: String::from(self.text),
            found,
            offset,
        }
    }

    fn end(&self) -> SelectorError {
        SelectorError::UnexpectedEnd {
            selector: String::from(self.text),
        }
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Element;

    #[test]
    fn compound_and_attribute_selectors() {
        let mut doc = Document::new();
        let nav = doc.append(doc.body(), Element::new("nav").with_id("main"));
        let button = doc.append(
            nav,
            Element::new("button")
                .with_class("c-drilldown-next")
                .with_attribute("aria-expanded", "true"),
        );

        let matches = |s: &str, id| Selector::parse(s).unwrap().matches(&doc, id);
        assert!(matches("#main", nav));
        assert!(matches("nav#main .c-drilldown-next", button));
        assert!(matches(".c-drilldown-next[aria-expanded=\"true\"]", button));
        assert!(matches("[aria-expanded='true']", button));
        assert!(matches("[aria-expanded]", button));
        assert!(!matches(".c-drilldown-next[aria-expanded=\"false\"]", button));
        assert!(matches("* > button", button));
        assert!(!matches("body > button", button));
    }

    #[test]
    fn descendant_combinator_backtracks() {
        let mut doc = Document::new();
        let outer = doc.append(doc.body(), Element::new("ul").with_class("menu"));
        let li = doc.append(outer, Element::new("li"));
        let inner = doc.append(li, Element::new("ul"));
        let leaf = doc.append(inner, Element::new("li"));

        let selector = Selector::parse(".menu li > ul > li").unwrap();
        assert!(selector.matches(&doc, leaf));
        assert!(!selector.matches(&doc, li));
    }

    #[test]
    fn malformed_selectors_are_errors() {
        assert_eq!(Selector::parse("   "), Err(SelectorError::Empty));
        assert!(matches!(
            Selector::parse("ul >"),
            Err(SelectorError::UnexpectedEnd { .. })
        ));
        assert!(matches!(
            Selector::parse("[open"),
            Err(SelectorError::UnexpectedEnd { .. })
        ));
        assert!(matches!(
            Selector::parse("ul!"),
            Err(SelectorError::Unexpected { found: '!', offset: 2, .. })
        ));
        assert!(matches!(
            Selector::parse("> li"),
            Err(SelectorError::Unexpected { found: '>', offset: 0, .. })
        ));
    }
}
