// Copyright 2025 the Compotes Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drive a drilldown menu with keyboard events and print what changes.
//!
//! The markup is a three-panel menu. Keys are fed through `dispatch` exactly as a host
//! would forward `keydown` events; the observers are driven by `tick`.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p compotes_demos --example drilldown_keyboard`

use compotes_dom::{Document, Element, NodeId};
use compotes_drilldown::{CLASS_BACK, CLASS_MENU, CLASS_NEXT, Drilldown, DrilldownOptions};
use compotes_lifecycle::{Component, ParentOptions, UiEvent};
use kurbo::Size;
use tracing_subscriber::EnvFilter;

fn item(doc: &mut Document, menu: NodeId, class: Option<&str>, label: &str) -> NodeId {
    let li = doc.append(menu, Element::new("li"));
    match class {
        Some(class) => {
            let button = doc.append(li, Element::new("button").with_class(class));
            doc.append_text(button, label);
            button
        }
        None => {
            doc.append_text(li, label);
            li
        }
    }
}

fn panel(doc: &mut Document, control: NodeId, height: f64) -> NodeId {
    let li = doc.parent_of(control).unwrap();
    doc.append(
        li,
        Element::new("ul")
            .with_class(CLASS_MENU)
            .with_client_size(Size::new(240.0, height)),
    )
}

fn describe(doc: &Document, drilldown: &Drilldown, key: &str) {
    let focused = doc
        .active_element()
        .map(|n| doc.text_content(n))
        .unwrap_or_default();
    println!(
        "{key:<10} level={} focus={focused:?} height={}",
        drilldown.level(),
        drilldown
            .el()
            .and_then(|root| doc.style(root, "height"))
            .unwrap_or("-"),
    );
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut doc = Document::new();
    let nav = doc.append(doc.body(), Element::new("nav").with_class("c-drilldown"));
    let root = doc.append(
        nav,
        Element::new("ul")
            .with_class(CLASS_MENU)
            .with_computed_style("transition-duration", "0.25s"),
    );
    doc.set_client_size(root, Size::new(240.0, 160.0));

    let fruits = item(&mut doc, root, Some(CLASS_NEXT), "Fruits");
    let fruits_panel = panel(&mut doc, fruits, 120.0);
    item(&mut doc, fruits_panel, Some(CLASS_BACK), "Back");
    let citrus = item(&mut doc, fruits_panel, Some(CLASS_NEXT), "Citrus");
    let citrus_panel = panel(&mut doc, citrus, 80.0);
    item(&mut doc, citrus_panel, Some(CLASS_BACK), "Back");
    item(&mut doc, citrus_panel, None, "Lemon");
    item(&mut doc, fruits_panel, None, "Apple");
    let vegetables = item(&mut doc, root, Some(CLASS_NEXT), "Vegetables");
    let vegetables_panel = panel(&mut doc, vegetables, 100.0);
    item(&mut doc, vegetables_panel, Some(CLASS_BACK), "Back");
    item(&mut doc, vegetables_panel, None, "Leek");

    let options = DrilldownOptions::default()
        .with_dynamic_height(true)
        .with_base(ParentOptions::default().on("update", |event, drilldown: &Drilldown| {
            println!("  {} -> level {}", event.full_name(), drilldown.level());
        }));
    let mut drilldown = Drilldown::new(&mut doc, nav, options).unwrap();
    drilldown.tick(&mut doc, 0);
    doc.focus(fruits);
    describe(&doc, &drilldown, "start");

    for key in [
        "ArrowDown",
        "ArrowDown",
        "f",
        "ArrowRight",
        "ArrowDown",
        "ArrowRight",
        "Escape",
        "ArrowLeft",
        "End",
    ] {
        let target = doc.active_element().unwrap_or(nav);
        drilldown.dispatch(&mut doc, &UiEvent::key_down(target, key));
        describe(&doc, &drilldown, key);
    }

    let herbs = item(&mut doc, root, Some(CLASS_NEXT), "Herbs");
    panel(&mut doc, herbs, 60.0);
    drilldown.tick(&mut doc, 50);
    println!(
        "after adding a branch: {} panels, aria-controls={:?}",
        drilldown.panels().len(),
        doc.attribute(herbs, "aria-controls"),
    );

    drilldown.destroy(&mut doc);
    println!("{}", doc.outer_html(nav));
}
