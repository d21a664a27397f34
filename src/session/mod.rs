//! WalletSession - the single authority on "connected, as whom, connecting?"
//!
//! # State machine
//!
//! ```text
//!                 connect()
//!  Disconnected ───────────▶ Connecting ──success──▶ Connected(Account)
//!       ▲                        │                         │
//!       │                        └──failure (last_error)───┤
//!       │                                                  │
//!       └──────────────────── disconnect() ◀───────────────┘
//! ```
//!
//! Every connect/disconnect/reset bumps an operation token. A suspended
//! `connect()` (or `restore_session()`) applies its outcome only if the token
//! it started with is still current, so a `disconnect()` that completes
//! first is never overwritten by a stale `Connected`.
//!
//! # Fallback
//!
//! With `allow_simulated_fallback` set, the fixed simulated account is used
//! only after a real provider was tried and failed, or none exists.

mod flag;

pub use flag::{MemoryFlag, SessionFlag};
#[cfg(feature = "native")]
pub use flag::FileFlag;

use futures::channel::mpsc;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::config::WalletConfig;
use crate::error::{WalletError, WalletResult};
use crate::provider::{Capability, ProviderDetector, ProviderError, ProviderHandle};

/// A connected wallet account. Replaced wholesale, never edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    address: String,
    connected: bool,
}

impl Account {
    pub fn connected(address: impl Into<String>) -> Self {
        Self { address: address.into(), connected: true }
    }

    pub fn address(&self) -> &str { &self.address }
    pub fn is_connected(&self) -> bool { self.connected }
}

/// Observable session state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub account: Option<Account>,
    pub connecting: bool,
    pub last_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    Disconnected,
    Connecting,
    Connected(Account),
}

impl SessionState {
    pub fn status(&self) -> SessionStatus {
        match (&self.account, self.connecting) {
            (Some(account), _) => SessionStatus::Connected(account.clone()),
            (None, true) => SessionStatus::Connecting,
            (None, false) => SessionStatus::Disconnected,
        }
    }

    pub fn is_connected(&self) -> bool { self.account.is_some() }
}

/// Where the current account came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountSource {
    /// A real wallet, found under this binding.
    Provider(String),
    Simulated,
}

struct Inner {
    state: SessionState,
    source: Option<AccountSource>,
    token: u64,
}

pub struct WalletSession {
    config: WalletConfig,
    detector: Arc<dyn ProviderDetector>,
    flag: Arc<dyn SessionFlag>,
    inner: Mutex<Inner>,
    watchers: Mutex<Vec<mpsc::UnboundedSender<SessionState>>>,
}

impl WalletSession {
    pub fn new(config: WalletConfig, detector: Arc<dyn ProviderDetector>, flag: Arc<dyn SessionFlag>) -> Self {
        Self {
            config,
            detector,
            flag,
            inner: Mutex::new(Inner { state: SessionState::default(), source: None, token: 0 }),
            watchers: Mutex::new(Vec::new()),
        }
    }

    pub fn config(&self) -> &WalletConfig { &self.config }

    pub fn state(&self) -> SessionState { self.lock().state.clone() }

    pub fn source(&self) -> Option<AccountSource> { self.lock().source.clone() }

    pub fn is_connected(&self) -> bool { self.lock().state.is_connected() }

    /// Receive a snapshot after every applied transition.
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<SessionState> {
        let (tx, rx) = mpsc::unbounded();
        self.watchers.lock().unwrap_or_else(|p| p.into_inner()).push(tx);
        rx
    }

    /// Connect, preferring a real wallet. Never fails: errors end up in
    /// `last_error` with the session back in `Disconnected`.
    pub async fn connect(&self) -> SessionState {
        let Some(token) = self.begin_connect() else {
            return self.state();
        };
        let outcome = self.establish().await;
        self.finish(token, outcome)
    }

    /// Drop the session. Provider-side failures are logged, never surfaced.
    pub async fn disconnect(&self) -> SessionState {
        let previous = {
            let mut inner = self.lock();
            inner.token += 1;
            let previous = inner.source.take();
            inner.state = SessionState::default();
            previous
        };
        tracing::info!("wallet disconnected");
        self.notify();
        self.persist_flag(false);

        if let Some(AccountSource::Provider(binding)) = previous {
            self.disconnect_provider(&binding).await;
        }
        self.state()
    }

    /// Silently re-derive a connected session at startup. Never prompts.
    pub async fn restore_session(&self) -> SessionState {
        let token = {
            let inner = self.lock();
            if inner.state.connecting || inner.state.is_connected() {
                return inner.state.clone();
            }
            inner.token
        };

        let restored = self.authorized_account().await;

        {
            let mut inner = self.lock();
            if inner.token != token || inner.state.connecting || inner.state.is_connected() {
                tracing::debug!("session restore superseded");
                return inner.state.clone();
            }
            let Some((account, source)) = restored else {
                return inner.state.clone();
            };
            tracing::info!(address = account.address(), ?source, "wallet session restored");
            inner.state.account = Some(account);
            inner.source = Some(source);
        }
        self.notify();
        self.state()
    }

    /// Abandon whatever is in flight and return to the initial state.
    /// For a provider that never answers a connection request.
    pub fn reset(&self) -> SessionState {
        {
            let mut inner = self.lock();
            inner.token += 1;
            inner.state = SessionState::default();
            inner.source = None;
        }
        tracing::info!("wallet session reset");
        self.notify();
        self.state()
    }

    /// Called when the provider backing a real session has disappeared.
    /// Returns whether the session was torn down.
    pub(crate) fn provider_lost(&self) -> bool {
        {
            let mut inner = self.lock();
            if !matches!(inner.source, Some(AccountSource::Provider(_))) {
                return false;
            }
            inner.token += 1;
            inner.state = SessionState::default();
            inner.source = None;
        }
        tracing::warn!("wallet provider is gone, session cleared");
        self.notify();
        true
    }

    fn begin_connect(&self) -> Option<u64> {
        let token = {
            let mut inner = self.lock();
            if inner.state.connecting || inner.state.is_connected() {
                tracing::debug!("connect ignored, session busy or already connected");
                return None;
            }
            inner.token += 1;
            inner.state.connecting = true;
            inner.state.last_error = None;
            inner.token
        };
        self.notify();
        Some(token)
    }

    async fn establish(&self) -> WalletResult<(Account, AccountSource)> {
        let fallback = self.config.allow_simulated_fallback;
        match self.detector.detect() {
            Some(handle) => match request_account(&handle).await {
                Ok(address) => Ok((Account::connected(address), AccountSource::Provider(handle.binding().to_string()))),
                Err(err) if fallback => {
                    tracing::warn!(binding = handle.binding(), error = %err, "wallet connection failed, using simulated wallet");
                    Ok(self.simulated_account())
                }
                Err(err) => Err(err),
            },
            None if fallback => {
                tracing::info!("no wallet provider found, using simulated wallet");
                Ok(self.simulated_account())
            }
            None => Err(WalletError::ProviderNotFound),
        }
    }

    fn finish(&self, token: u64, outcome: WalletResult<(Account, AccountSource)>) -> SessionState {
        let simulated = {
            let mut inner = self.lock();
            if inner.token != token {
                tracing::debug!(token, current = inner.token, "stale connect result discarded");
                return inner.state.clone();
            }
            match outcome {
                Ok((account, source)) => {
                    tracing::info!(address = account.address(), ?source, "wallet connected");
                    let simulated = source == AccountSource::Simulated;
                    inner.state = SessionState { account: Some(account), connecting: false, last_error: None };
                    inner.source = Some(source);
                    simulated
                }
                Err(err) => {
                    tracing::warn!(error = %err, "wallet connection failed");
                    inner.state = SessionState { account: None, connecting: false, last_error: Some(err.to_string()) };
                    inner.source = None;
                    false
                }
            }
        };
        self.notify();
        if simulated {
            self.persist_flag(true);
        }
        self.state()
    }

    async fn authorized_account(&self) -> Option<(Account, AccountSource)> {
        if let Some(handle) = self.detector.detect().filter(|h| h.supports(Capability::ListAccounts)) {
            match handle.provider().list_accounts().await {
                Ok(accounts) => {
                    if let Some(address) = accounts.into_iter().next() {
                        return Some((Account::connected(address), AccountSource::Provider(handle.binding().to_string())));
                    }
                }
                Err(err) => tracing::debug!(binding = handle.binding(), error = %err, "no authorized accounts"),
            }
        }
        if self.config.allow_simulated_fallback && self.load_flag() {
            return Some(self.simulated_account());
        }
        None
    }

    /// The detected provider, if it is still the one under `binding`.
    pub(crate) fn provider_for(&self, binding: &str) -> Option<ProviderHandle> {
        self.detector.detect().filter(|h| h.binding() == binding)
    }

    async fn disconnect_provider(&self, binding: &str) {
        let Some(handle) = self.provider_for(binding) else {
            return;
        };
        if !handle.supports(Capability::Disconnect) {
            return;
        }
        if let Err(err) = handle.provider().disconnect().await {
            tracing::warn!(binding, error = %err, "provider disconnect failed");
        }
    }

    fn simulated_account(&self) -> (Account, AccountSource) {
        (Account::connected(self.config.simulated_address.clone()), AccountSource::Simulated)
    }

    fn load_flag(&self) -> bool {
        self.flag.load(&self.config.flag_key).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "could not read session flag");
            false
        })
    }

    fn persist_flag(&self, value: bool) {
        if let Err(err) = self.flag.store(&self.config.flag_key, value) {
            tracing::warn!(error = %err, "could not persist session flag");
        }
    }

    fn notify(&self) {
        let state = self.state();
        self.watchers
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .retain(|tx| tx.unbounded_send(state.clone()).is_ok());
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|p| p.into_inner())
    }
}

/// Ask the provider for permission (if it can), then list accounts.
async fn request_account(handle: &ProviderHandle) -> WalletResult<String> {
    let provider = handle.provider();
    if handle.supports(Capability::RequestConnection) {
        provider.request_connection().await.map_err(|e| rejected(handle, e))?;
    }
    if !handle.supports(Capability::ListAccounts) {
        return Err(WalletError::UnsupportedProvider {
            binding: handle.binding().to_string(),
            capability: Capability::ListAccounts,
        });
    }
    let accounts = provider.list_accounts().await.map_err(|e| rejected(handle, e))?;
    accounts
        .into_iter()
        .next()
        .ok_or_else(|| WalletError::ConnectionRejected("No accounts found".into()))
}

fn rejected(handle: &ProviderHandle, err: ProviderError) -> WalletError {
    match err {
        ProviderError::Unsupported(capability) => {
            WalletError::UnsupportedProvider { binding: handle.binding().to_string(), capability }
        }
        ProviderError::Rejected(message) => WalletError::ConnectionRejected(message),
    }
}
