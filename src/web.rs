//! Browser bindings, built with `--features web` for `wasm32`.
//!
//! `render_playbook` is the plain string-in, markup-out entry point.
//! `mount` wires a `<textarea>` to an output element so every edit re-renders.

use crate::core::compiler::Compiler;
use crate::core::trigger::RenderTrigger;
use crate::domain::ports::{InputSource, OutputSink};
use crate::utils::error::{PlaybookError, Result};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

#[wasm_bindgen]
pub fn render_playbook(input: &str) -> std::result::Result<String, JsValue> {
    Compiler::default()
        .render(input)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

struct TextAreaInput(web_sys::HtmlTextAreaElement);

impl InputSource for TextAreaInput {
    fn read_text(&self) -> Result<String> {
        Ok(self.0.value())
    }
}

struct ElementOutput(web_sys::Element);

impl OutputSink for ElementOutput {
    fn replace(&self, content: &str) -> Result<()> {
        self.0.set_inner_html(content);
        Ok(())
    }
}

fn dom_error(message: impl Into<String>) -> JsValue {
    JsValue::from_str(&message.into())
}

fn report(result: Result<crate::core::trigger::RenderOutcome>) {
    if let Err(e) = result {
        web_sys::console::error_1(&JsValue::from_str(&e.to_string()));
    }
}

/// Renders `input_id`'s text into `output_id` now and on every `input` event.
#[wasm_bindgen]
pub fn mount(input_id: &str, output_id: &str) -> std::result::Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| dom_error("no window"))?;
    let document = window.document().ok_or_else(|| dom_error("no document"))?;

    let input = document
        .get_element_by_id(input_id)
        .ok_or_else(|| dom_error(format!("no element with id '{}'", input_id)))?
        .dyn_into::<web_sys::HtmlTextAreaElement>()
        .map_err(|_| dom_error(format!("element '{}' is not a <textarea>", input_id)))?;
    let output = document
        .get_element_by_id(output_id)
        .ok_or_else(|| dom_error(format!("no element with id '{}'", output_id)))?;

    let trigger = Rc::new(RenderTrigger::new(
        Compiler::default(),
        TextAreaInput(input.clone()),
        ElementOutput(output),
    ));

    let on_input = {
        let trigger = Rc::clone(&trigger);
        Closure::wrap(Box::new(move |_ev: web_sys::Event| {
            report(trigger.fire());
        }) as Box<dyn FnMut(web_sys::Event)>)
    };
    input.add_event_listener_with_callback("input", on_input.as_ref().unchecked_ref())?;
    // The listener lives as long as the page.
    on_input.forget();

    trigger
        .fire()
        .map_err(|e: PlaybookError| dom_error(e.to_string()))?;
    Ok(())
}
