//! `NewWave` listener lifetime.
//!
//! A [`Subscription`] owns one node-side log filter and one listener. The
//! listener slot is emptied before the filter is uninstalled, so a poll that is
//! already waiting on the provider delivers nothing once the subscription has
//! been released.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::{debug, info, warn};
use wp_types::WaveRecord;

use crate::WavePortalContract;
use crate::abi::decode_new_wave;

type Listener = Box<dyn FnMut(WaveRecord)>;

struct Feed {
    contract: WavePortalContract,
    filter_id: String,
    listener: RefCell<Option<Listener>>,
}

impl Feed {
    fn is_listening(&self) -> bool {
        self.listener.borrow().is_some()
    }

    async fn poll(&self) -> usize {
        if !self.is_listening() {
            return 0;
        }

        let logs = match self.contract.filter_changes(&self.filter_id).await {
            Ok(logs) => logs,
            Err(err) => {
                warn!(filter = %self.filter_id, "failed to poll NewWave filter: {}", err);
                return 0;
            }
        };

        let mut delivered = 0;
        for log in logs {
            if log.removed {
                debug!(tx = ?log.transaction_hash, "skipping removed NewWave log");
                continue;
            }

            let record = match decode_new_wave(&log) {
                Ok(record) => record,
                Err(err) => {
                    warn!(tx = ?log.transaction_hash, "undecodable NewWave log: {}", err);
                    continue;
                }
            };

            let mut slot = self.listener.borrow_mut();
            let Some(listener) = slot.as_mut() else {
                debug!("listener released, dropping late NewWave");
                break;
            };
            info!(from = %record.address, message = %record.message, "NewWave");
            listener(record);
            delivered += 1;
        }
        delivered
    }

    fn release(&self) -> bool {
        self.listener.borrow_mut().take().is_some()
    }
}

/// Disposer for a `NewWave` listener. Call [`Subscription::unsubscribe`] once
/// when the subscribing view goes away.
pub struct Subscription {
    feed: Option<Rc<Feed>>,
}

impl Subscription {
    pub(crate) fn active(
        contract: WavePortalContract,
        filter_id: String,
        listener: Listener,
    ) -> Self {
        Self {
            feed: Some(Rc::new(Feed {
                contract,
                filter_id,
                listener: RefCell::new(Some(listener)),
            })),
        }
    }

    /// Subscription that never delivers, used when no provider is present or
    /// the filter could not be installed.
    pub fn inert() -> Self {
        Self { feed: None }
    }

    pub fn is_active(&self) -> bool {
        self.feed.as_ref().is_some_and(|feed| feed.is_listening())
    }

    pub fn filter_id(&self) -> Option<&str> {
        self.feed.as_ref().map(|feed| feed.filter_id.as_str())
    }

    /// Weak handle for a timer to drive; it goes quiet once the subscription
    /// is released.
    pub fn poller(&self) -> WavePoller {
        WavePoller {
            feed: self.feed.as_ref().map(Rc::downgrade).unwrap_or_default(),
        }
    }

    /// Fetch pending `NewWave` logs and hand them to the listener in order.
    /// Returns how many records were delivered.
    pub async fn poll(&self) -> usize {
        match &self.feed {
            Some(feed) => feed.poll().await,
            None => 0,
        }
    }

    pub async fn unsubscribe(mut self) {
        let Some(feed) = self.feed.take() else {
            return;
        };
        feed.release();
        match feed.contract.uninstall_filter(&feed.filter_id).await {
            Ok(removed) => debug!(filter = %feed.filter_id, removed, "NewWave filter uninstalled"),
            Err(err) => warn!(filter = %feed.filter_id, "failed to uninstall NewWave filter: {}", err),
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(feed) = self.feed.take() {
            if feed.release() {
                warn!(
                    filter = %feed.filter_id,
                    "subscription dropped without unsubscribe; filter left installed"
                );
            }
        }
    }
}

#[derive(Clone, Default)]
pub struct WavePoller {
    feed: Weak<Feed>,
}

impl WavePoller {
    pub async fn poll(&self) -> usize {
        match self.feed.upgrade() {
            Some(feed) => feed.poll().await,
            None => 0,
        }
    }
}
