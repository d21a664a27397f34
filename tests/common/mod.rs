//! Scripted wallet providers and session builders shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use fractional_wallet::gateway::MoveCall;
use fractional_wallet::provider::ProviderResult;
use fractional_wallet::{
    Capabilities, Capability, InjectedBindings, MemoryFlag, ProviderError, SessionFlag, TransactionGateway,
    WalletConfig, WalletProvider, WalletSession,
};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

pub const REAL_ADDRESS: &str = "0xfeedfacefeedfacefeedfacefeedfacefeedface";
pub const SIMULATED_ADDRESS: &str = "0x1234567890abcdef1234567890abcdef12345678";
pub const FLAG_KEY: &str = "devWalletConnected";

#[derive(Default)]
pub struct Calls {
    pub request_connection: AtomicUsize,
    pub list_accounts: AtomicUsize,
    pub sign_and_submit: AtomicUsize,
    pub disconnect: AtomicUsize,
}

impl Calls {
    pub fn get(counter: &AtomicUsize) -> usize { counter.load(Ordering::SeqCst) }
}

/// A wallet whose every answer is scripted up front.
pub struct FakeProvider {
    capabilities: Capabilities,
    accounts: Vec<String>,
    connection_error: Option<String>,
    disconnect_error: Option<String>,
    response: Result<Value, String>,
    gate: Option<Arc<Notify>>,
    accounts_gate: Option<Arc<Notify>>,
    pub calls: Calls,
    pub last_call: Mutex<Option<MoveCall>>,
}

impl FakeProvider {
    /// All four capabilities, one account, successful submissions.
    pub fn full() -> Self {
        Self {
            capabilities: Capabilities::all(),
            accounts: vec![REAL_ADDRESS.to_string()],
            connection_error: None,
            disconnect_error: None,
            response: Ok(success_response("0xdigest1")),
            gate: None,
            accounts_gate: None,
            calls: Calls::default(),
            last_call: Mutex::new(None),
        }
    }

    pub fn with_capabilities(mut self, caps: &[Capability]) -> Self {
        self.capabilities = caps.iter().copied().collect();
        self
    }

    pub fn with_accounts(mut self, accounts: &[&str]) -> Self {
        self.accounts = accounts.iter().map(|a| a.to_string()).collect();
        self
    }

    pub fn rejecting_connection(mut self, message: &str) -> Self {
        self.connection_error = Some(message.to_string());
        self
    }

    pub fn failing_disconnect(mut self, message: &str) -> Self {
        self.disconnect_error = Some(message.to_string());
        self
    }

    pub fn responding(mut self, response: Value) -> Self {
        self.response = Ok(response);
        self
    }

    pub fn failing_submission(mut self, message: &str) -> Self {
        self.response = Err(message.to_string());
        self
    }

    /// Hold `request_connection` until the notify fires.
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Hold `list_accounts` until the notify fires.
    pub fn gated_accounts(mut self, gate: Arc<Notify>) -> Self {
        self.accounts_gate = Some(gate);
        self
    }

    pub fn submitted(&self) -> Option<MoveCall> { self.last_call.lock().unwrap().clone() }
}

#[async_trait]
impl WalletProvider for FakeProvider {
    fn capabilities(&self) -> Capabilities { self.capabilities }

    async fn request_connection(&self) -> ProviderResult<()> {
        self.calls.request_connection.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        match &self.connection_error {
            Some(message) => Err(ProviderError::Rejected(message.clone())),
            None => Ok(()),
        }
    }

    async fn list_accounts(&self) -> ProviderResult<Vec<String>> {
        self.calls.list_accounts.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.accounts_gate {
            gate.notified().await;
        }
        Ok(self.accounts.clone())
    }

    async fn sign_and_submit(&self, call: &MoveCall) -> ProviderResult<Value> {
        self.calls.sign_and_submit.fetch_add(1, Ordering::SeqCst);
        *self.last_call.lock().unwrap() = Some(call.clone());
        self.response.clone().map_err(ProviderError::Rejected)
    }

    async fn disconnect(&self) -> ProviderResult<()> {
        self.calls.disconnect.fetch_add(1, Ordering::SeqCst);
        match &self.disconnect_error {
            Some(message) => Err(ProviderError::Rejected(message.clone())),
            None => Ok(()),
        }
    }
}

/// Full execution response as a wallet extension returns it.
pub fn success_response(digest: &str) -> Value {
    json!({
        "digest": digest,
        "effects": { "status": { "status": "success" } },
        "events": [{ "type": "0xpkg::core::Invested", "parsedJson": { "amount": "1000000000" } }],
    })
}

pub struct Harness {
    pub bindings: Arc<InjectedBindings>,
    pub flag: Arc<MemoryFlag>,
    pub session: Arc<WalletSession>,
    pub gateway: TransactionGateway,
}

impl Harness {
    pub fn new(config: WalletConfig) -> Self { Self::with_flag(config, MemoryFlag::new()) }

    pub fn with_flag(config: WalletConfig, flag: MemoryFlag) -> Self {
        let bindings = Arc::new(InjectedBindings::new());
        let flag = Arc::new(flag);
        let session = Arc::new(WalletSession::new(config, bindings.clone(), flag.clone()));
        let gateway = TransactionGateway::new(session.clone());
        Self { bindings, flag, session, gateway }
    }

    /// Inject `provider` under `binding` and hand back a handle to inspect it.
    pub fn inject(&self, binding: &str, provider: FakeProvider) -> Arc<FakeProvider> {
        let provider = Arc::new(provider);
        self.bindings.inject(binding, provider.clone());
        provider
    }

    pub fn flag_set(&self) -> bool { self.flag.load(FLAG_KEY).unwrap() }
}

pub fn strict() -> WalletConfig { WalletConfig::default() }

pub fn development() -> WalletConfig { WalletConfig::development() }
