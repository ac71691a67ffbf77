use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing::{debug, info};
use wp_chain_client::Host;
use wp_contract::{ContractGateway, Subscription, TxHash, WavePoller, WavePortalConfig};
use wp_types::WaveRecord;
use wp_wallet::{ConnectOutcome, WalletSession};

use crate::view::{PageView, Renderer, ViewState};

/// Owns the page state and drives the wallet session and contract gateway
/// from lifecycle and user events.
///
/// State lives behind `Rc<RefCell<_>>` so the `NewWave` listener can append
/// to it; no borrow is held across an `.await`.
pub struct WavePortal<H, R> {
    wallet: WalletSession<H>,
    gateway: ContractGateway<H>,
    state: Rc<RefCell<ViewState>>,
    renderer: Rc<R>,
    subscription: RefCell<Option<Subscription>>,
    mounted: Cell<bool>,
}

impl<H, R> WavePortal<H, R>
where
    H: Host + 'static,
    R: Renderer + 'static,
{
    pub fn new(host: Rc<H>, config: WavePortalConfig, renderer: Rc<R>) -> Self {
        Self {
            wallet: WalletSession::new(host.clone()),
            gateway: ContractGateway::new(host, config),
            state: Rc::new(RefCell::new(ViewState::default())),
            renderer,
            subscription: RefCell::new(None),
            mounted: Cell::new(false),
        }
    }

    pub fn state(&self) -> ViewState {
        self.state.borrow().clone()
    }

    pub fn page(&self) -> PageView {
        PageView::from(&*self.state.borrow())
    }

    fn render(&self) {
        render_state(&self.state, &*self.renderer);
    }

    /// Listen for new waves, then detect an authorized account and load
    /// history. Runs once; later calls are ignored.
    ///
    /// The `NewWave` filter is installed before the history read, so a wave
    /// mined in between is reported by the filter instead of being lost.
    pub async fn mount(&self) {
        if self.mounted.replace(true) {
            debug!("portal already mounted");
            return;
        }
        self.render();

        if self.wallet.detect_wallet() {
            let state = Rc::clone(&self.state);
            let renderer = Rc::clone(&self.renderer);
            let subscription = self
                .gateway
                .subscribe_to_new_waves(move |record: WaveRecord| {
                    state.borrow_mut().waves.push(record);
                    render_state(&state, &*renderer);
                })
                .await;
            *self.subscription.borrow_mut() = Some(subscription);
        }

        self.check_connected_wallet().await;
    }

    /// Silent account detection followed by a full history load.
    pub async fn check_connected_wallet(&self) {
        let Some(account) = self.wallet.get_connected_account().await else {
            return;
        };
        self.state.borrow_mut().account = Some(account);
        self.render();

        self.load_waves().await;
    }

    async fn load_waves(&self) {
        if let Some(waves) = self.gateway.fetch_all_waves().await {
            self.state.borrow_mut().waves = waves;
            self.render();
        }
    }

    pub fn edit_draft(&self, text: &str) {
        self.state.borrow_mut().draft = text.to_owned();
    }

    /// Submit the current draft. The draft is kept, and the list only changes
    /// when the contract's `NewWave` event comes back.
    pub async fn wave(&self) -> Option<TxHash> {
        let message = self.state.borrow().draft.clone();
        self.gateway.submit_wave(&message).await
    }

    pub async fn connect_wallet(&self) {
        match self.wallet.request_connection().await {
            ConnectOutcome::Connected(account) => {
                info!(%account, "wallet connected");
                self.state.borrow_mut().account = Some(account);
                self.render();
                self.check_connected_wallet().await;
            }
            ConnectOutcome::NoProvider | ConnectOutcome::Failed => {}
        }
    }

    /// Handle for the event polling timer.
    pub fn poller(&self) -> WavePoller {
        self.subscription
            .borrow()
            .as_ref()
            .map(Subscription::poller)
            .unwrap_or_default()
    }

    pub async fn poll_events(&self) -> usize {
        self.poller().poll().await
    }

    /// Release the `NewWave` listener. Events that arrive afterwards are
    /// discarded.
    pub async fn unmount(&self) {
        let subscription = self.subscription.borrow_mut().take();
        if let Some(subscription) = subscription {
            subscription.unsubscribe().await;
        }
    }
}

fn render_state<R: Renderer + ?Sized>(state: &RefCell<ViewState>, renderer: &R) {
    let page = PageView::from(&*state.borrow());
    renderer.render(&page);
}
