use std::{cell::Cell, rc::Rc};

use automount::{Component, ConstructError};
use wasm_bindgen::{prelude::*, JsCast};

/// A click counter configured through `data-*` attributes on its element.
struct Counter {
    _value: Rc<Cell<i64>>,
    _on_click: Closure<dyn FnMut()>,
}

fn int_attr(elem: &web_sys::Element, name: &str, default: i64) -> Result<i64, ConstructError> {
    match elem.get_attribute(name) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConstructError::new(format!("invalid {} value {:?}", name, raw))),
    }
}

impl Component for Counter {
    fn mount(element: web_sys::Element) -> Result<Self, ConstructError> {
        let start = int_attr(&element, "data-start", 0)?;
        let step = int_attr(&element, "data-step", 1)?;
        let label = element
            .get_attribute("data-label")
            .unwrap_or_else(|| "Count".to_string());

        let doc = element
            .owner_document()
            .ok_or_else(|| ConstructError::new("element is not attached to a document"))?;
        let button = doc.create_element("button")?;
        button.set_text_content(Some(&format!("{}: {}", label, start)));
        element.set_text_content(None);
        element.append_child(&button)?;

        let value = Rc::new(Cell::new(start));
        let value2 = value.clone();
        let target = button.clone();
        let on_click = Closure::wrap(Box::new(move || {
            value2.set(value2.get() + step);
            tracing::trace!(value = value2.get(), "counter clicked");
            target.set_text_content(Some(&format!("{}: {}", label, value2.get())));
        }) as Box<dyn FnMut()>);
        button.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;

        Ok(Self {
            _value: value,
            _on_click: on_click,
        })
    }
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    tracing_wasm::set_as_global_default_with_config(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_report_logs_in_timings(false)
            .set_console_config(tracing_wasm::ConsoleConfig::ReportWithoutConsoleColor)
            .build(),
    );
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));

    automount::launch::<Counter>()?;
    Ok(())
}
