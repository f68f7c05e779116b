//! Wallet signing through a local Frame agent.
//!
//! [`Signer`] is the only way the rest of the crate obtains signatures; no
//! key material ever passes through this process. [`FrameSigner`] talks to
//! the agent over an alloy HTTP provider on the loopback interface.

use alloy::primitives::{Address, Bytes};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::transports::TransportResult;
use async_trait::async_trait;
use serde_json::Value;
use std::future::IntoFuture;
use std::time::Duration;
use tokio::time::timeout;

use crate::config::SignerConfig;
use crate::error::{Error, RunError, SignerError};
use crate::prompt::Confirm;

/// Signature capability over the active wallet account.
#[async_trait]
pub trait Signer: Send + Sync {
    /// Unlocked account used for every signature.
    fn account(&self) -> Address;

    /// Plain message signature, used for sign-in.
    async fn sign(&self, message: &str) -> Result<String, SignerError>;

    /// EIP-712 typed-data signature.
    async fn sign_typed(&self, payload: &Value) -> Result<String, SignerError>;
}

/// Signer backed by the Frame desktop wallet.
pub struct FrameSigner {
    provider: DynProvider,
    account: Address,
    /// Per-request bound; covers the operator approving in the wallet.
    timeout: Duration,
}

impl FrameSigner {
    /// Connect to the agent, asking the operator whether to retry while it is
    /// unreachable, and pick the first unlocked account.
    pub async fn connect(config: &SignerConfig, confirm: &mut dyn Confirm) -> Result<Self, Error> {
        let url: url::Url = config
            .url
            .parse()
            .map_err(|e| SignerError::InvalidUrl(format!("{}: {}", config.url, e)))?;

        let provider = ProviderBuilder::new().connect_http(url).erased();

        loop {
            match bounded(config.timeout, "web3_clientVersion", provider.get_client_version()).await {
                Ok(version) => {
                    tracing::info!(url = %config.url, %version, "Connected to signer");
                    break;
                }
                Err(e) => {
                    tracing::warn!(url = %config.url, error = %e, "Frame connection is not established");
                    if !confirm.confirm("Retry?").map_err(RunError::from)? {
                        return Err(RunError::Aborted.into());
                    }
                }
            }
        }

        let accounts = bounded(config.timeout, "eth_accounts", provider.get_accounts()).await?;
        let account = accounts.into_iter().next().ok_or(SignerError::NoAccount)?;
        tracing::info!(%account, "Using signer account");

        Ok(Self {
            provider,
            account,
            timeout: config.timeout,
        })
    }
}

#[async_trait]
impl Signer for FrameSigner {
    fn account(&self) -> Address {
        self.account
    }

    async fn sign(&self, message: &str) -> Result<String, SignerError> {
        let data = Bytes::copy_from_slice(message.as_bytes());
        let call = self
            .provider
            .raw_request::<_, String>("eth_sign".into(), (self.account, data));
        bounded(self.timeout, "eth_sign", call).await
    }

    async fn sign_typed(&self, payload: &Value) -> Result<String, SignerError> {
        let call = self
            .provider
            .raw_request::<_, String>("eth_signTypedData_v4".into(), (self.account, payload.clone()));
        bounded(self.timeout, "eth_signTypedData_v4", call).await
    }
}

async fn bounded<T, F>(limit: Duration, method: &'static str, call: F) -> Result<T, SignerError>
where
    F: IntoFuture<Output = TransportResult<T>>,
{
    match timeout(limit, call).await {
        Ok(result) => result.map_err(|source| SignerError::Rpc { method, source }),
        Err(_) => Err(SignerError::Timeout {
            method,
            secs: limit.as_secs(),
        }),
    }
}
