//! SessionContext - the process-wide wallet session
//!
//! Built `Disconnected`, then [`SessionContext::start`] kicks off one
//! background `restore_session()`. Readers that look before it resolves see
//! `Disconnected` with `connecting == false`, never an error.
//!
//! This is the whole surface display code may use: `connect`, `disconnect`,
//! `state`, `submit` (plus `subscribe`/`reset`). Providers and detection stay
//! behind it.

use futures::channel::mpsc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::config::WalletConfig;
use crate::error::WalletResult;
use crate::gateway::{TransactionGateway, TransactionRequest, TransactionResult};
use crate::provider::ProviderDetector;
use crate::runtime;
use crate::session::{SessionFlag, SessionState, WalletSession};

pub struct SessionContext {
    session: Arc<WalletSession>,
    gateway: TransactionGateway,
    restore_started: AtomicBool,
}

impl SessionContext {
    pub fn new(config: WalletConfig, detector: Arc<dyn ProviderDetector>, flag: Arc<dyn SessionFlag>) -> Arc<Self> {
        let session = Arc::new(WalletSession::new(config, detector, flag));
        let gateway = TransactionGateway::new(session.clone());
        Arc::new(Self { session, gateway, restore_started: AtomicBool::new(false) })
    }

    /// Spawn the one-time session restore in the background.
    pub fn start(self: &Arc<Self>) {
        if self.restore_started.swap(true, Ordering::SeqCst) {
            return;
        }
        let ctx = self.clone();
        runtime::spawn(async move {
            let state = ctx.session.restore_session().await;
            tracing::debug!(connected = state.is_connected(), "startup restore finished");
        });
    }

    /// Restore inline instead of in the background. Only the first call
    /// (across this and [`SessionContext::start`]) does anything.
    pub async fn restore_once(&self) -> SessionState {
        if self.restore_started.swap(true, Ordering::SeqCst) {
            return self.session.state();
        }
        self.session.restore_session().await
    }

    pub fn state(&self) -> SessionState { self.session.state() }

    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<SessionState> { self.session.subscribe() }

    pub async fn connect(&self) -> SessionState { self.session.connect().await }

    pub async fn disconnect(&self) -> SessionState { self.session.disconnect().await }

    pub fn reset(&self) -> SessionState { self.session.reset() }

    pub async fn submit(&self, request: &TransactionRequest) -> WalletResult<TransactionResult> {
        self.gateway.submit(request).await
    }

    /// Make `ctx` the process-wide context. Returns the already installed
    /// one if another caller got there first.
    pub fn install(ctx: Arc<Self>) -> Arc<Self> {
        global::install(ctx)
    }

    pub fn global() -> Option<Arc<Self>> {
        global::get()
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod global {
    use std::sync::{Arc, OnceLock};

    use super::SessionContext;

    static CONTEXT: OnceLock<Arc<SessionContext>> = OnceLock::new();

    pub(super) fn install(ctx: Arc<SessionContext>) -> Arc<SessionContext> {
        CONTEXT.get_or_init(|| ctx).clone()
    }

    pub(super) fn get() -> Option<Arc<SessionContext>> {
        CONTEXT.get().cloned()
    }
}

#[cfg(target_arch = "wasm32")]
mod global {
    use std::cell::OnceCell;
    use std::sync::Arc;

    use super::SessionContext;

    thread_local! {
        static CONTEXT: OnceCell<Arc<SessionContext>> = OnceCell::new();
    }

    pub(super) fn install(ctx: Arc<SessionContext>) -> Arc<SessionContext> {
        CONTEXT.with(|cell| cell.get_or_init(|| ctx).clone())
    }

    pub(super) fn get() -> Option<Arc<SessionContext>> {
        CONTEXT.with(|cell| cell.get().cloned())
    }
}
