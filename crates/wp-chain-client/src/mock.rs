//! Scriptable provider and host for tests.

use crate::{Eip1193, Host, ProviderError};
use async_trait::async_trait;
use futures::channel::oneshot;
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use std::time::Duration;

type Handler = Box<dyn Fn(&Value) -> Result<Value, ProviderError>>;

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: String,
    pub params: Value,
}

/// Provider whose responses are scripted per JSON-RPC method.
///
/// Unscripted methods fail with [`ProviderError::Unsupported`].
#[derive(Default)]
pub struct MockProvider {
    handlers: RefCell<HashMap<String, Handler>>,
    holds: RefCell<HashMap<String, VecDeque<oneshot::Receiver<()>>>>,
    calls: RefCell<Vec<RecordedCall>>,
}

impl MockProvider {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn respond(&self, method: &str, value: Value) {
        self.handle(method, move |_| Ok(value.clone()));
    }

    pub fn fail(&self, method: &str, error: ProviderError) {
        self.handle(method, move |_| Err(error.clone()));
    }

    pub fn handle<F>(&self, method: &str, handler: F)
    where
        F: Fn(&Value) -> Result<Value, ProviderError> + 'static,
    {
        self.handlers
            .borrow_mut()
            .insert(method.to_owned(), Box::new(handler));
    }

    /// Keep the next call to `method` pending until the returned sender fires
    /// (or is dropped).
    pub fn hold(&self, method: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.holds
            .borrow_mut()
            .entry(method.to_owned())
            .or_default()
            .push_back(rx);
        tx
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.borrow().clone()
    }

    pub fn calls_to(&self, method: &str) -> Vec<Value> {
        self.calls
            .borrow()
            .iter()
            .filter(|call| call.method == method)
            .map(|call| call.params.clone())
            .collect()
    }
}

#[async_trait(?Send)]
impl Eip1193 for MockProvider {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        self.calls.borrow_mut().push(RecordedCall {
            method: method.to_owned(),
            params: params.clone(),
        });

        let hold = self
            .holds
            .borrow_mut()
            .get_mut(method)
            .and_then(VecDeque::pop_front);
        if let Some(rx) = hold {
            let _ = rx.await;
        }

        let handlers = self.handlers.borrow();
        match handlers.get(method) {
            Some(handler) => handler(&params),
            None => Err(ProviderError::Unsupported(method.to_owned())),
        }
    }
}

/// Host with a swappable provider, recorded alerts and instant sleeps.
#[derive(Default)]
pub struct MockHost {
    provider: RefCell<Option<Rc<MockProvider>>>,
    alerts: RefCell<Vec<String>>,
    sleeps: Cell<usize>,
}

impl MockHost {
    pub fn with_provider(provider: Rc<MockProvider>) -> Rc<Self> {
        let host = Self::default();
        host.set_provider(Some(provider));
        Rc::new(host)
    }

    pub fn without_provider() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn set_provider(&self, provider: Option<Rc<MockProvider>>) {
        *self.provider.borrow_mut() = provider;
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.borrow().clone()
    }

    pub fn sleeps(&self) -> usize {
        self.sleeps.get()
    }
}

#[async_trait(?Send)]
impl Host for MockHost {
    fn provider(&self) -> Option<Rc<dyn Eip1193>> {
        self.provider
            .borrow()
            .clone()
            .map(|provider| provider as Rc<dyn Eip1193>)
    }

    fn alert(&self, message: &str) {
        self.alerts.borrow_mut().push(message.to_owned());
    }

    async fn sleep(&self, _duration: Duration) {
        self.sleeps.set(self.sleeps.get() + 1);
    }
}
