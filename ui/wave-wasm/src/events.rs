//! Event binding for the page controls.

use std::rc::Rc;
use tracing::info;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::Portal;
use crate::dom::Elements;

/// Attach an async click handler that receives the controller.
macro_rules! on_click_async {
    ($el:expr, $portal:expr, $handler:expr) => {{
        let portal = Rc::clone($portal);
        let cb = Closure::wrap(Box::new(move |_: web_sys::MouseEvent| {
            let portal = Rc::clone(&portal);
            wasm_bindgen_futures::spawn_local(async move {
                $handler(&portal).await;
            });
        }) as Box<dyn FnMut(_)>);
        $el.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }};
}

/// Bind all UI event listeners. Call once, before mounting.
pub fn bind_events(els: &Elements, portal: &Rc<Portal>) -> Result<(), JsValue> {
    on_click_async!(els.wave_btn, portal, on_wave);
    on_click_async!(els.connect_btn, portal, on_connect);

    {
        let input = els.message_input.clone();
        let portal = Rc::clone(portal);
        let cb = Closure::wrap(Box::new(move |_: web_sys::Event| {
            portal.edit_draft(&input.value());
        }) as Box<dyn FnMut(_)>);
        els.message_input
            .add_event_listener_with_callback("input", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }

    Ok(())
}

async fn on_wave(portal: &Portal) {
    if let Some(hash) = portal.wave().await {
        info!(%hash, "wave confirmed");
    }
}

async fn on_connect(portal: &Portal) {
    portal.connect_wallet().await;
}
