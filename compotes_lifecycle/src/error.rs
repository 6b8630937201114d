// Copyright 2025 the Compotes Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors raised while initializing a component.

use alloc::string::String;

use compotes_dom::{NodeId, SelectorError};

/// Error returned by [`Component::init`](crate::Component::init) and widget constructors.
///
/// Display output is prefixed with the widget tag, for example
/// `[c-drilldown] The element/selector provided cannot be found.`
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The element or selector given to `init` does not resolve to a live element.
    #[error("[c-{widget}] The element/selector provided cannot be found.")]
    ElementNotFound {
        /// Name of the widget that failed to initialize.
        widget: &'static str,
        /// The selector (or the stale node, formatted) that was looked up.
        selector: String,
    },
    /// The root element lacks markup the widget requires.
    #[error("[c-{widget}] {message}")]
    MissingMarkup {
        /// Name of the widget that failed to initialize.
        widget: &'static str,
        /// What is missing, with an example of valid markup.
        message: &'static str,
        /// The root element that was inspected.
        element: NodeId,
    },
    /// A selector could not be parsed.
    #[error(transparent)]
    Selector(#[from] SelectorError),
}
