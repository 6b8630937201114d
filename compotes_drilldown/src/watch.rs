// Copyright 2025 the Compotes Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use compotes_dom::{Document, NodeId, ObserveFlags, ObserverId};
use compotes_lifecycle::timer::Debounce;

/// A document observer whose callback is debounced.
#[derive(Debug)]
pub(crate) struct Watch {
    observer: ObserverId,
    debounce: Debounce,
}

impl Watch {
    pub(crate) fn new(doc: &mut Document, target: NodeId, flags: ObserveFlags) -> Self {
        Self {
            observer: doc.observe(target, flags),
            debounce: Debounce::default(),
        }
    }

    /// Drain pending records; returns whether the callback should run at `now`.
    pub(crate) fn poll(&mut self, doc: &mut Document, now: u64) -> bool {
        let fresh = !doc.take_records(self.observer).is_empty();
        let immediate = fresh && self.debounce.call(now);
        let trailing = self.debounce.poll(now);
        immediate || trailing
    }

    pub(crate) fn disconnect(self, doc: &mut Document) {
        doc.disconnect(self.observer);
    }
}
