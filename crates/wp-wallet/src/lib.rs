use serde_json::json;
use std::rc::Rc;
use tracing::{info, warn};
use wp_chain_client::rpc::{ETH_ACCOUNTS, ETH_REQUEST_ACCOUNTS};
use wp_chain_client::{Eip1193, Host, ProviderError, request_as};
use wp_types::Account;

pub const NO_PROVIDER_ALERT: &str = "Get MetaMask!";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectOutcome {
    Connected(Account),
    /// No injected provider; the user has been alerted.
    NoProvider,
    /// Rejected by the user or the provider; already logged.
    Failed,
}

/// Wallet discovery and connection against the injected provider.
///
/// Holds no account of its own: callers keep whatever it returns.
pub struct WalletSession<H> {
    host: Rc<H>,
}

impl<H: Host> WalletSession<H> {
    pub fn new(host: Rc<H>) -> Self {
        Self { host }
    }

    pub fn detect_wallet(&self) -> bool {
        self.host.provider().is_some()
    }

    /// Already-authorized account, without prompting the user.
    pub async fn get_connected_account(&self) -> Option<Account> {
        let Some(provider) = self.host.provider() else {
            info!("no wallet provider injected");
            return None;
        };

        match first_account(&*provider, ETH_ACCOUNTS).await {
            Ok(Some(account)) => {
                info!(%account, "found an authorized account");
                Some(account)
            }
            Ok(None) => {
                info!("no authorized account found");
                None
            }
            Err(err) => {
                warn!("failed to read accounts: {}", err);
                None
            }
        }
    }

    /// Prompt the user to authorize an account.
    pub async fn request_connection(&self) -> ConnectOutcome {
        let Some(provider) = self.host.provider() else {
            self.host.alert(NO_PROVIDER_ALERT);
            return ConnectOutcome::NoProvider;
        };

        match first_account(&*provider, ETH_REQUEST_ACCOUNTS).await {
            Ok(Some(account)) => {
                info!(%account, "connected");
                ConnectOutcome::Connected(account)
            }
            Ok(None) => {
                warn!("provider granted no accounts");
                ConnectOutcome::Failed
            }
            Err(err) if err.is_user_rejection() => {
                info!("user declined the connection request");
                ConnectOutcome::Failed
            }
            Err(err) => {
                warn!("connection request failed: {}", err);
                ConnectOutcome::Failed
            }
        }
    }
}

async fn first_account(
    provider: &dyn Eip1193,
    method: &str,
) -> Result<Option<Account>, ProviderError> {
    let accounts: Vec<String> = request_as(provider, method, json!([])).await?;
    Ok(accounts.into_iter().next().map(Account))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wp_chain_client::USER_REJECTED_REQUEST;
    use wp_chain_client::mock::{MockHost, MockProvider};

    #[tokio::test]
    async fn detects_injected_provider() -> anyhow::Result<()> {
        let host = MockHost::without_provider();
        let session = WalletSession::new(host.clone());
        assert!(!session.detect_wallet());

        host.set_provider(Some(MockProvider::new()));
        assert!(session.detect_wallet());
        Ok(())
    }

    #[tokio::test]
    async fn connected_account_is_first_authorized() -> anyhow::Result<()> {
        let provider = MockProvider::new();
        provider.respond(ETH_ACCOUNTS, json!(["0xABC", "0xDEF"]));
        let session = WalletSession::new(MockHost::with_provider(provider.clone()));

        assert_eq!(session.get_connected_account().await, Some(Account::from("0xABC")));
        assert!(provider.calls_to(ETH_REQUEST_ACCOUNTS).is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn no_authorized_accounts_means_none() -> anyhow::Result<()> {
        let provider = MockProvider::new();
        provider.respond(ETH_ACCOUNTS, json!([]));
        let session = WalletSession::new(MockHost::with_provider(provider));

        assert_eq!(session.get_connected_account().await, None);
        Ok(())
    }

    #[tokio::test]
    async fn provider_error_is_swallowed() -> anyhow::Result<()> {
        let provider = MockProvider::new();
        provider.fail(ETH_ACCOUNTS, ProviderError::Transport("disconnected".to_owned()));
        let session = WalletSession::new(MockHost::with_provider(provider));

        assert_eq!(session.get_connected_account().await, None);
        Ok(())
    }

    #[tokio::test]
    async fn connect_without_provider_alerts() -> anyhow::Result<()> {
        let host = MockHost::without_provider();
        let session = WalletSession::new(host.clone());

        assert_eq!(session.request_connection().await, ConnectOutcome::NoProvider);
        assert_eq!(host.alerts(), vec![NO_PROVIDER_ALERT.to_owned()]);
        assert_eq!(session.get_connected_account().await, None);
        assert_eq!(host.alerts().len(), 1, "silent detection never alerts");
        Ok(())
    }

    #[tokio::test]
    async fn connect_returns_first_granted_account() -> anyhow::Result<()> {
        let provider = MockProvider::new();
        provider.respond(ETH_REQUEST_ACCOUNTS, json!(["0xabc"]));
        let host = MockHost::with_provider(provider);
        let session = WalletSession::new(host.clone());

        assert_eq!(
            session.request_connection().await,
            ConnectOutcome::Connected(Account::from("0xabc"))
        );
        assert!(host.alerts().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn user_rejection_fails_quietly() -> anyhow::Result<()> {
        let provider = MockProvider::new();
        provider.fail(
            ETH_REQUEST_ACCOUNTS,
            ProviderError::Rpc {
                code: USER_REJECTED_REQUEST,
                message: "User rejected the request.".to_owned(),
            },
        );
        let host = MockHost::with_provider(provider);
        let session = WalletSession::new(host.clone());

        assert_eq!(session.request_connection().await, ConnectOutcome::Failed);
        assert!(host.alerts().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn empty_grant_is_a_failure() -> anyhow::Result<()> {
        let provider = MockProvider::new();
        provider.respond(ETH_REQUEST_ACCOUNTS, json!([]));
        let session = WalletSession::new(MockHost::with_provider(provider));

        assert_eq!(session.request_connection().await, ConnectOutcome::Failed);
        Ok(())
    }
}
