// Copyright 2025 the Compotes Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use compotes_dom::NodeId;
use compotes_lifecycle::ParentOptions;

use crate::Drilldown;

/// Drilldown configuration.
#[derive(Clone, Debug)]
pub struct DrilldownOptions {
    /// Options shared by every component (`init`, `on`, `on_state_change`).
    pub base: ParentOptions<Drilldown>,
    /// Size the root to the current panel instead of the tallest one.
    pub dynamic_height: bool,
    /// Reload panels when the markup under the root changes.
    pub mutation_observer: bool,
}

impl Default for DrilldownOptions {
    fn default() -> Self {
        Self {
            base: ParentOptions::default(),
            dynamic_height: false,
            mutation_observer: true,
        }
    }
}

impl DrilldownOptions {
    /// Set the shared options.
    #[must_use]
    pub fn with_base(mut self, base: ParentOptions<Drilldown>) -> Self {
        self.base = base;
        self
    }

    /// Enable or disable dynamic height.
    #[must_use]
    pub fn with_dynamic_height(mut self, dynamic_height: bool) -> Self {
        self.dynamic_height = dynamic_height;
        self
    }

    /// Enable or disable mutation observation.
    #[must_use]
    pub fn with_mutation_observer(mut self, mutation_observer: bool) -> Self {
        self.mutation_observer = mutation_observer;
        self
    }
}

impl AsRef<ParentOptions<Drilldown>> for DrilldownOptions {
    fn as_ref(&self) -> &ParentOptions<Drilldown> {
        &self.base
    }
}

/// Snapshot passed to the state change callback.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DrilldownState {
    /// Current depth, `0` at the root panel.
    pub level: usize,
    /// The panel currently shown.
    pub current_panel: Option<NodeId>,
}
