//! Provider detection - find an injected wallet and describe what it can do
//!
//! Wallet extensions register themselves under one of a few conventional
//! global names and expose differing subsets of methods. Detection turns that
//! into a [`ProviderHandle`] carrying an explicit [`Capabilities`] set, so the
//! session and gateway branch on capability, never on which wallet it is.
//!
//! ```text
//! ProviderDetector::detect()
//!     │
//!     ├── "suiWallet" ──┐
//!     ├── "sui" ────────┼── first binding with a non-empty capability set
//!     └── "wallet" ─────┘
//!                        │
//!                        ▼
//!               ProviderHandle { binding, capabilities, provider }
//! ```
//!
//! Handles are resolved per call and never cached: an extension can be
//! installed or removed between two operations.

mod injected;

pub use injected::InjectedBindings;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::gateway::MoveCall;

/// Global names a wallet extension may register under, in lookup order.
pub const CANDIDATE_BINDINGS: &[&str] = &["suiWallet", "sui", "wallet"];

/// `Send + Sync` on native targets; no bound in the single-threaded browser.
#[cfg(not(target_arch = "wasm32"))]
pub trait MaybeSendSync: Send + Sync {}
#[cfg(not(target_arch = "wasm32"))]
impl<T: Send + Sync + ?Sized> MaybeSendSync for T {}

#[cfg(target_arch = "wasm32")]
pub trait MaybeSendSync {}
#[cfg(target_arch = "wasm32")]
impl<T: ?Sized> MaybeSendSync for T {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Capability {
    RequestConnection,
    ListAccounts,
    SignAndSubmit,
    Disconnect,
}

impl Capability {
    pub const ALL: [Capability; 4] = [
        Capability::RequestConnection,
        Capability::ListAccounts,
        Capability::SignAndSubmit,
        Capability::Disconnect,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::RequestConnection => "requestConnection",
            Capability::ListAccounts => "listAccounts",
            Capability::SignAndSubmit => "signAndSubmit",
            Capability::Disconnect => "disconnect",
        }
    }

    fn bit(self) -> u8 {
        match self {
            Capability::RequestConnection => 1,
            Capability::ListAccounts => 1 << 1,
            Capability::SignAndSubmit => 1 << 2,
            Capability::Disconnect => 1 << 3,
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Set of capabilities a provider exposes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Capabilities(u8);

impl Capabilities {
    pub const NONE: Capabilities = Capabilities(0);

    pub fn all() -> Self { Self::from_iter(Capability::ALL) }

    pub fn with(mut self, cap: Capability) -> Self { self.0 |= cap.bit(); self }

    pub fn has(&self, cap: Capability) -> bool { self.0 & cap.bit() != 0 }

    pub fn is_empty(&self) -> bool { self.0 == 0 }

    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        Capability::ALL.into_iter().filter(move |c| self.has(*c))
    }
}

impl FromIterator<Capability> for Capabilities {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        iter.into_iter().fold(Capabilities::NONE, Capabilities::with)
    }
}

impl Serialize for Capabilities {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("provider does not expose {0}")]
    Unsupported(Capability),

    /// The provider (or the user, through it) refused the call.
    #[error("{0}")]
    Rejected(String),
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// The capability surface of an injected wallet.
///
/// Every method is optional; the default bodies report [`ProviderError::Unsupported`].
/// Implementations must keep [`WalletProvider::capabilities`] consistent with the
/// methods they actually override.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait WalletProvider: MaybeSendSync {
    fn capabilities(&self) -> Capabilities;

    async fn request_connection(&self) -> ProviderResult<()> {
        Err(ProviderError::Unsupported(Capability::RequestConnection))
    }

    async fn list_accounts(&self) -> ProviderResult<Vec<String>> {
        Err(ProviderError::Unsupported(Capability::ListAccounts))
    }

    /// Sign and execute a call. The response shape is provider-specific.
    async fn sign_and_submit(&self, call: &MoveCall) -> ProviderResult<Value> {
        let _ = call;
        Err(ProviderError::Unsupported(Capability::SignAndSubmit))
    }

    async fn disconnect(&self) -> ProviderResult<()> {
        Err(ProviderError::Unsupported(Capability::Disconnect))
    }
}

/// A detected provider plus the binding it was found under.
#[derive(Clone)]
pub struct ProviderHandle {
    binding: String,
    capabilities: Capabilities,
    provider: Arc<dyn WalletProvider>,
}

impl ProviderHandle {
    pub fn new(binding: impl Into<String>, provider: Arc<dyn WalletProvider>) -> Self {
        let capabilities = provider.capabilities();
        Self { binding: binding.into(), capabilities, provider }
    }

    pub fn binding(&self) -> &str { &self.binding }

    pub fn capabilities(&self) -> Capabilities { self.capabilities }

    pub fn supports(&self, cap: Capability) -> bool { self.capabilities.has(cap) }

    pub fn provider(&self) -> &dyn WalletProvider { self.provider.as_ref() }
}

impl fmt::Debug for ProviderHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderHandle")
            .field("binding", &self.binding)
            .field("capabilities", &self.capabilities)
            .finish()
    }
}

/// Read-only inspection of the environment for an injected provider.
pub trait ProviderDetector: MaybeSendSync {
    /// Absence is a normal outcome, not an error.
    fn detect(&self) -> Option<ProviderHandle>;

    fn capabilities_of(&self, handle: &ProviderHandle) -> Capabilities {
        handle.capabilities()
    }
}
