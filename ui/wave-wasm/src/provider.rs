//! `window.ethereum` bridge.
//!
//! The injected object is looked up on every access, so a wallet that loads
//! after the page is still picked up.

use async_trait::async_trait;
use js_sys::{Function, Promise, Reflect};
use serde::Serialize;
use serde_json::{Value, json};
use std::rc::Rc;
use std::time::Duration;
use tracing::warn;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use wp_chain_client::{Eip1193, Host, ProviderError};

pub struct BrowserProvider {
    ethereum: JsValue,
    request: Function,
}

impl BrowserProvider {
    pub fn injected() -> Option<Self> {
        let window = web_sys::window()?;
        let ethereum = get_prop(&window, "ethereum")?;
        if ethereum.is_null() || ethereum.is_undefined() {
            return None;
        }
        let request = get_prop(&ethereum, "request")?.dyn_into::<Function>().ok()?;
        Some(Self { ethereum, request })
    }
}

#[async_trait(?Send)]
impl Eip1193 for BrowserProvider {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        // Plain JS objects, not `Map`s, for the provider to read.
        let args = json!({ "method": method, "params": params })
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|err| ProviderError::Transport(format!("encode {method}: {err}")))?;

        let promise = self
            .request
            .call1(&self.ethereum, &args)
            .map_err(provider_error)?
            .dyn_into::<Promise>()
            .map_err(|_| ProviderError::Transport(format!("{method} did not return a promise")))?;

        let result = JsFuture::from(promise).await.map_err(provider_error)?;
        serde_wasm_bindgen::from_value(result)
            .map_err(|err| ProviderError::Decode(format!("{method}: {err}")))
    }
}

fn get_prop(target: &JsValue, key: &str) -> Option<JsValue> {
    Reflect::get(target, &JsValue::from_str(key)).ok()
}

/// Rejections carrying an EIP-1193 `code` become [`ProviderError::Rpc`].
fn provider_error(err: JsValue) -> ProviderError {
    let code = get_prop(&err, "code").and_then(|code| code.as_f64());
    let message = get_prop(&err, "message").and_then(|message| message.as_string());
    match (code, message) {
        (Some(code), message) => ProviderError::Rpc {
            code: code as i64,
            message: message.unwrap_or_default(),
        },
        (None, Some(message)) => ProviderError::Transport(message),
        (None, None) => ProviderError::Transport(format!("{err:?}")),
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserHost;

#[async_trait(?Send)]
impl Host for BrowserHost {
    fn provider(&self) -> Option<Rc<dyn Eip1193>> {
        BrowserProvider::injected().map(|provider| Rc::new(provider) as Rc<dyn Eip1193>)
    }

    fn alert(&self, message: &str) {
        if let Err(err) = gloo_utils::window().alert_with_message(message) {
            warn!("alert failed: {:?}", err);
        }
    }

    async fn sleep(&self, duration: Duration) {
        gloo_timers::future::sleep(duration).await;
    }
}
