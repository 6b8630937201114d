// Copyright 2025 the Compotes Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Toggle a collapse and step a millisecond clock through its transition.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p compotes_demos --example collapse_timeline`

use compotes_collapse::{CLASS_TRIGGER, Collapse, CollapseState};
use compotes_dom::{Document, Element};
use compotes_lifecycle::{Component, ParentOptions, UiEvent};
use kurbo::Size;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut doc = Document::new();
    let trigger = doc.append(
        doc.body(),
        Element::new("a")
            .with_class(CLASS_TRIGGER)
            .with_attribute("aria-controls", "faq-1"),
    );
    doc.append_text(trigger, "What is a compote?");
    let region = doc.append(
        doc.body(),
        Element::new("div")
            .with_class("c-collapse")
            .with_id("faq-1")
            .with_computed_style("transition-duration", "0.2s")
            .with_computed_style("transition-delay", "50ms")
            .with_scroll_size(Size::new(320.0, 96.0)),
    );
    doc.append_text(region, "Fruit cooked in syrup.");

    let options = ParentOptions::default()
        .on("shown", |event, _: &Collapse| println!("  {}", event.full_name()))
        .on("hidden", |event, _: &Collapse| println!("  {}", event.full_name()))
        .on_state_change(|state: &CollapseState| {
            println!("  state: {state:?}");
        });
    let mut collapse = Collapse::new(&mut doc, region, options).unwrap();

    for now in (0..=600).step_by(50) {
        collapse.tick(&mut doc, now);
        if now == 0 || now == 300 {
            collapse.dispatch(&mut doc, &UiEvent::click(trigger).at(now));
        }
        println!(
            "t={now:>3}ms expanded={} collapsing={} height={}",
            collapse.is_expanded(),
            collapse.is_collapsing(),
            doc.style(region, "height").unwrap_or("auto"),
        );
    }

    collapse.destroy(&mut doc);
    println!("{}", doc.outer_html(doc.body()));
}
