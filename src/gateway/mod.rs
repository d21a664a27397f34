//! TransactionGateway - submit domain operations, normalize the outcome
//!
//! # Routing
//!
//! ```text
//! submit(request)
//!     │
//!     ├── validate (structure only) ──────────────▶ InvalidRequest
//!     ├── session not Connected ──────────────────▶ NotConnected
//!     ├── simulated account ──────────────────────▶ SimulatedResponder
//!     │
//!     │   real account, connected through `binding`
//!     ├── `binding` no longer detected ───────────▶ session cleared, ProviderNotFound
//!     ├── provider exposes signAndSubmit ─────────▶ MoveCall ─▶ provider ─▶ normalize
//!     ├── simulated fallback enabled ─────────────▶ SimulatedResponder
//!     └── otherwise ──────────────────────────────▶ UnsupportedProvider
//! ```
//!
//! A transaction only ever reaches the wallet the session account came
//! from. Another wallet showing up under a higher-priority binding counts
//! as the connected one being gone.

mod call;
mod request;
mod simulated;

pub use call::{CallArg, Endpoint, MoveCall, MODULE};
pub use request::{TransactionRequest, TransactionResult, TxStatus};
pub use simulated::SimulatedResponder;

use std::sync::Arc;

use crate::error::{WalletError, WalletResult};
use crate::provider::{Capability, ProviderError, ProviderHandle};
use crate::session::{AccountSource, WalletSession};

pub struct TransactionGateway {
    session: Arc<WalletSession>,
    simulated: SimulatedResponder,
}

impl TransactionGateway {
    pub fn new(session: Arc<WalletSession>) -> Self {
        let simulated = SimulatedResponder::new(session.config().simulated_delay);
        Self { session, simulated }
    }

    pub fn session(&self) -> &Arc<WalletSession> { &self.session }

    /// Route `request` to whatever backs the current account: the wallet
    /// it was connected through, or the simulated responder.
    pub async fn submit(&self, request: &TransactionRequest) -> WalletResult<TransactionResult> {
        request.validate()?;
        let binding = match self.session.source() {
            None => return Err(WalletError::NotConnected),
            Some(AccountSource::Simulated) => return Ok(self.simulated.respond(request).await),
            Some(AccountSource::Provider(binding)) => binding,
        };

        let Some(handle) = self.session.provider_for(&binding) else {
            tracing::warn!(%binding, "connected wallet is no longer the detected provider");
            self.session.provider_lost();
            return Err(WalletError::ProviderNotFound);
        };
        if handle.supports(Capability::SignAndSubmit) {
            return self.submit_to_provider(&handle, request).await;
        }
        if self.session.config().allow_simulated_fallback {
            tracing::debug!(%binding, "wallet cannot sign, simulating");
            return Ok(self.simulated.respond(request).await);
        }
        Err(WalletError::UnsupportedProvider { binding, capability: Capability::SignAndSubmit })
    }

    async fn submit_to_provider(&self, handle: &ProviderHandle, request: &TransactionRequest) -> WalletResult<TransactionResult> {
        let call = MoveCall::build(&self.session.config().chain, request);
        tracing::info!(binding = handle.binding(), function = %call.target, "submitting transaction");

        let raw = handle.provider().sign_and_submit(&call).await.map_err(|err| match err {
            ProviderError::Unsupported(capability) => {
                WalletError::UnsupportedProvider { binding: handle.binding().to_string(), capability }
            }
            ProviderError::Rejected(message) => WalletError::Submission(message),
        });
        let raw = match raw {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(function = %call.target, error = %err, "transaction submission failed");
                return Err(err);
            }
        };

        let result = TransactionResult::from_provider_response(&raw)?;
        tracing::info!(digest = result.digest(), status = result.status().as_str(), "transaction executed");
        Ok(result)
    }
}
