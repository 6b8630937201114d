// Copyright 2025 the Compotes Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Computed transition timing.

use crate::Document;
use crate::types::NodeId;

/// Total transition time of an element in milliseconds.
///
/// Reads the computed `transition-duration` and `transition-delay`, takes the
/// first entry of each comma separated list, and returns their sum. Values are
/// CSS times (`0.3s`, `150ms`); a bare number is read as seconds. Elements
/// without a transition yield `0`.
pub fn transition_duration_ms(doc: &Document, id: NodeId) -> u64 {
    let duration = parse_time(doc.computed_style(id, "transition-duration"));
    let delay = parse_time(doc.computed_style(id, "transition-delay"));
    let total = duration + delay;
    if total <= 0.0 || !total.is_finite() {
        return 0;
    }
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "Total is finite and positive; sub-millisecond precision is not needed."
    )]
    let ms = (total + 0.5) as u64;
    ms
}

/// Milliseconds of the first time in a CSS list.
fn parse_time(value: Option<&str>) -> f64 {
    let Some(first) = value.and_then(|v| v.split(',').next()) else {
        return 0.0;
    };
    let first = first.trim();
    let (number, scale) = if let Some(ms) = first.strip_suffix("ms") {
        (ms, 1.0)
    } else if let Some(s) = first.strip_suffix('s') {
        (s, 1000.0)
    } else {
        (first, 1000.0)
    };
    number
        .trim()
        .parse::<f64>()
        .map_or(0.0, |n| if n > 0.0 { n * scale } else { 0.0 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Element;

    #[test]
    fn sums_first_duration_and_delay() {
        let mut doc = Document::new();
        let plain = doc.append(doc.body(), Element::new("ul"));
        let animated = doc.append(
            doc.body(),
            Element::new("ul")
                .with_computed_style("transition-duration", "0.3s, 1s")
                .with_computed_style("transition-delay", "50ms"),
        );
        let zero = doc.append(
            doc.body(),
            Element::new("ul")
                .with_computed_style("transition-duration", "0s")
                .with_computed_style("transition-delay", "0s"),
        );
        assert_eq!(transition_duration_ms(&doc, plain), 0);
        assert_eq!(transition_duration_ms(&doc, animated), 350);
        assert_eq!(transition_duration_ms(&doc, zero), 0);
    }
}
