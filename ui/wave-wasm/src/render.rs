use tracing::warn;
use wasm_bindgen::JsValue;
use wp_portal::{PageView, Renderer, WaveRow};

use crate::dom::{self, Elements};

/// Writes a [`PageView`] into the bound page elements.
pub struct DomRenderer {
    els: Elements,
}

impl DomRenderer {
    pub fn new(els: Elements) -> Self {
        Self { els }
    }

    fn render_rows(&self, rows: &[WaveRow]) -> Result<(), JsValue> {
        dom::clear(&self.els.wave_list);
        for row in rows {
            let entry = dom::create_element("div")?;
            dom::add_class(&entry, "wave-log");
            for (label, value) in row.fields() {
                let line = dom::create_element("div")?;
                dom::set_text(&line, &format!("{label}: {value}"));
                entry.append_child(&line)?;
            }
            self.els.wave_list.append_child(&entry)?;
        }
        Ok(())
    }
}

impl Renderer for DomRenderer {
    fn render(&self, page: &PageView) {
        self.els.connect_btn.set_hidden(!page.show_connect);

        // Leave the caret alone while the user is typing.
        if self.els.message_input.value() != page.draft {
            self.els.message_input.set_value(&page.draft);
        }

        if let Err(err) = self.render_rows(&page.rows) {
            warn!("failed to render wave list: {:?}", err);
        }
    }
}
