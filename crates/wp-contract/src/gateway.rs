use std::rc::Rc;
use tracing::{debug, info, warn};
use wp_chain_client::Host;
use wp_chain_client::rpc::TransactionReceipt;
use wp_types::WaveRecord;

use crate::{GatewayError, Subscription, TxHash, WavePortalConfig, WavePortalContract};

pub struct ContractGateway<H> {
    host: Rc<H>,
    config: WavePortalConfig,
}

impl<H: Host> ContractGateway<H> {
    pub fn new(host: Rc<H>, config: WavePortalConfig) -> Self {
        Self { host, config }
    }

    pub fn config(&self) -> &WavePortalConfig {
        &self.config
    }

    fn contract(&self) -> Option<WavePortalContract> {
        match self.host.provider() {
            Some(provider) => Some(WavePortalContract::new(provider, &self.config)),
            None => {
                warn!("provider doesn't exist");
                None
            }
        }
    }

    /// Broadcast `wave(message)` and wait for it to be mined.
    ///
    /// Returns the mined transaction hash, or `None` after logging whatever
    /// went wrong. There is no timeout: a transaction that is never mined keeps
    /// this future pending.
    pub async fn submit_wave(&self, message: &str) -> Option<TxHash> {
        let contract = self.contract()?;
        match self.try_submit_wave(&contract, message).await {
            Ok(hash) => Some(hash),
            Err(err) => {
                warn!("wave submission failed: {}", err);
                None
            }
        }
    }

    async fn try_submit_wave(
        &self,
        contract: &WavePortalContract,
        message: &str,
    ) -> Result<TxHash, GatewayError> {
        let signer = contract.signer().await?;

        let count = contract.wave_count().await?;
        info!(%count, "retrieved total wave count before waving");

        let hash = contract.send_wave(signer, message).await?;
        info!(%hash, "mining");

        let receipt = self.wait_for_receipt(contract, hash).await?;
        if !receipt.succeeded() {
            return Err(GatewayError::Reverted(hash));
        }
        info!(%hash, block = ?receipt.block_number, "mined");

        let count = contract.wave_count().await?;
        info!(%count, "retrieved total wave count after waving");

        Ok(hash)
    }

    async fn wait_for_receipt(
        &self,
        contract: &WavePortalContract,
        hash: TxHash,
    ) -> Result<TransactionReceipt, GatewayError> {
        loop {
            if let Some(receipt) = contract.receipt(hash).await? {
                return Ok(receipt);
            }
            debug!(%hash, "transaction pending");
            self.host.sleep(self.config.receipt_poll_interval()).await;
        }
    }

    /// All recorded waves in contract order, or `None` when nothing could be
    /// read. Callers keep their current list on `None`.
    pub async fn fetch_all_waves(&self) -> Option<Vec<WaveRecord>> {
        let contract = self.contract()?;
        match contract.all_waves().await {
            Ok(waves) => {
                debug!(count = waves.len(), "fetched wave history");
                Some(waves)
            }
            Err(err) => {
                warn!("failed to fetch waves: {}", err);
                None
            }
        }
    }

    /// Install a `NewWave` filter and attach `on_wave` to it.
    pub async fn subscribe_to_new_waves<F>(&self, on_wave: F) -> Subscription
    where
        F: FnMut(WaveRecord) + 'static,
    {
        let Some(contract) = self.contract() else {
            return Subscription::inert();
        };
        match contract.new_wave_filter().await {
            Ok(filter_id) => {
                debug!(filter = %filter_id, "NewWave filter installed");
                Subscription::active(contract, filter_id, Box::new(on_wave))
            }
            Err(err) => {
                warn!("failed to subscribe to NewWave: {}", err);
                Subscription::inert()
            }
        }
    }
}
