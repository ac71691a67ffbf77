//! WavePortal browser front end.
//!
//! Binds the page, builds the controller over the injected wallet and keeps
//! the `NewWave` feed polling until the page is hidden.

pub mod config;
pub mod dom;
pub mod events;
pub mod logging;
pub mod provider;
pub mod render;

use gloo_timers::callback::Interval;
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;
use tracing::debug;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use wp_contract::WavePoller;
use wp_portal::WavePortal;

use crate::provider::BrowserHost;
use crate::render::DomRenderer;

pub type Portal = WavePortal<BrowserHost, DomRenderer>;

/// WASM entry point, called when the module is instantiated.
#[wasm_bindgen(start)]
pub async fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    logging::init();

    init().await
}

async fn init() -> Result<(), JsValue> {
    let els = dom::Elements::bind()?;
    let config = config::load();
    let poll_every = config.event_poll_interval();

    let portal: Rc<Portal> = Rc::new(WavePortal::new(
        Rc::new(BrowserHost),
        config,
        Rc::new(DomRenderer::new(els.clone())),
    ));

    // Buttons work while the initial load is still in flight.
    events::bind_events(&els, &portal)?;

    portal.mount().await;

    let interval = start_polling(portal.poller(), poll_every);
    unmount_on_pagehide(portal, interval)
}

// ── Event feed ──

fn start_polling(poller: WavePoller, every: Duration) -> Interval {
    let millis = u32::try_from(every.as_millis()).unwrap_or(u32::MAX);
    let busy = Rc::new(Cell::new(false));

    Interval::new(millis, move || {
        // One poll at a time; a slow provider just stretches the period.
        if busy.replace(true) {
            return;
        }
        let poller = poller.clone();
        let busy = Rc::clone(&busy);
        spawn_local(async move {
            let delivered = poller.poll().await;
            if delivered > 0 {
                debug!(delivered, "NewWave poll");
            }
            busy.set(false);
        });
    })
}

/// Holds the polling timer for the life of the document. A `pagehide` into
/// the back/forward cache keeps it, because the page can be restored.
struct FeedGuard<T> {
    timer: Option<T>,
}

impl<T> FeedGuard<T> {
    fn new(timer: T) -> Self {
        Self { timer: Some(timer) }
    }

    /// The timer to drop once the page is going away for good.
    fn on_pagehide(&mut self, persisted: bool) -> Option<T> {
        if persisted {
            debug!("page entering back/forward cache, keeping NewWave feed");
            return None;
        }
        self.timer.take()
    }
}

fn unmount_on_pagehide(portal: Rc<Portal>, interval: Interval) -> Result<(), JsValue> {
    let mut guard = FeedGuard::new(interval);
    let cb = Closure::wrap(Box::new(move |event: web_sys::PageTransitionEvent| {
        let Some(interval) = guard.on_pagehide(event.persisted()) else {
            return;
        };
        drop(interval);
        let portal = Rc::clone(&portal);
        spawn_local(async move {
            portal.unmount().await;
        });
    }) as Box<dyn FnMut(_)>);
    gloo_utils::window().add_event_listener_with_callback("pagehide", cb.as_ref().unchecked_ref())?;
    cb.forget();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cached_page_keeps_the_feed() {
        let mut guard = FeedGuard::new("timer");
        assert_eq!(guard.on_pagehide(true), None);
        assert_eq!(guard.on_pagehide(true), None);
        assert_eq!(guard.on_pagehide(false), Some("timer"));
    }

    #[test]
    fn discarded_page_releases_the_feed_once() {
        let mut guard = FeedGuard::new("timer");
        assert_eq!(guard.on_pagehide(false), Some("timer"));
        assert_eq!(guard.on_pagehide(false), None);
    }
}
