//! DOM element bindings.
//!
//! All fields are resolved once at startup. A missing element fails `start`.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlButtonElement, HtmlTextAreaElement};

// ── Helpers ──

pub fn by_id(id: &str) -> Option<Element> {
    gloo_utils::document().get_element_by_id(id)
}

pub fn by_id_typed<T: JsCast>(id: &str) -> Option<T> {
    by_id(id).and_then(|e| e.dyn_into::<T>().ok())
}

pub fn set_text(el: &Element, text: &str) {
    el.set_text_content(Some(text));
}

pub fn clear(el: &Element) {
    el.set_text_content(None);
}

pub fn add_class(el: &Element, cls: &str) {
    let _ = el.class_list().add_1(cls);
}

pub fn create_element(tag: &str) -> Result<Element, JsValue> {
    gloo_utils::document().create_element(tag)
}

// ── Elements ──

macro_rules! get_el {
    ($id:expr) => {
        by_id($id).ok_or_else(|| JsValue::from_str(&format!("missing element #{}", $id)))?
    };
}

macro_rules! get_button {
    ($id:expr) => {
        by_id_typed::<HtmlButtonElement>($id)
            .ok_or_else(|| JsValue::from_str(&format!("missing button #{}", $id)))?
    };
}

macro_rules! get_textarea {
    ($id:expr) => {
        by_id_typed::<HtmlTextAreaElement>($id)
            .ok_or_else(|| JsValue::from_str(&format!("missing textarea #{}", $id)))?
    };
}

#[derive(Clone)]
pub struct Elements {
    pub message_input: HtmlTextAreaElement,
    pub wave_btn: HtmlButtonElement,
    pub connect_btn: HtmlButtonElement,
    pub wave_list: Element,
}

impl Elements {
    pub fn bind() -> Result<Elements, JsValue> {
        Ok(Elements {
            message_input: get_textarea!("messageInput"),
            wave_btn: get_button!("waveBtn"),
            connect_btn: get_button!("connectBtn"),
            wave_list: get_el!("waveList"),
        })
    }
}
