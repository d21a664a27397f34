//! Wallet configuration - passed from higher layers

use std::time::Duration;

pub const DEFAULT_RPC_URL: &str = "https://fullnode.devnet.sui.io";
pub const SIMULATED_ADDRESS: &str = "0x1234567890abcdef1234567890abcdef12345678";
pub const SESSION_FLAG_KEY: &str = "devWalletConnected";
pub const SIMULATED_DELAY: Duration = Duration::from_millis(1000);

/// Where transactions are addressed on chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainConfig {
    pub rpc_url: String,
    /// Package that publishes the `core` module.
    pub package_id: String,
    /// Shared platform object passed to `invest_in_asset`.
    pub platform_id: String,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self { rpc_url: DEFAULT_RPC_URL.into(), package_id: String::new(), platform_id: String::new() }
    }
}

impl ChainConfig {
    pub fn with_rpc_url(mut self, url: impl Into<String>) -> Self { self.rpc_url = url.into(); self }
    pub fn with_package(mut self, id: impl Into<String>) -> Self { self.package_id = id.into(); self }
    pub fn with_platform(mut self, id: impl Into<String>) -> Self { self.platform_id = id.into(); self }
}

/// Session and gateway configuration. Higher layers construct this.
#[derive(Debug, Clone)]
pub struct WalletConfig {
    /// Substitute the simulated wallet when no real one can be used.
    pub allow_simulated_fallback: bool,
    pub simulated_address: String,
    pub simulated_delay: Duration,
    /// Key of the persisted "simulated wallet was connected" flag.
    pub flag_key: String,
    pub chain: ChainConfig,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            allow_simulated_fallback: false,
            simulated_address: SIMULATED_ADDRESS.into(),
            simulated_delay: SIMULATED_DELAY,
            flag_key: SESSION_FLAG_KEY.into(),
            chain: ChainConfig::default(),
        }
    }
}

impl WalletConfig {
    pub fn new() -> Self { Self::default() }

    /// Development preset: simulated fallback on.
    pub fn development() -> Self { Self::default().with_simulated_fallback(true) }

    pub fn with_simulated_fallback(mut self, enabled: bool) -> Self { self.allow_simulated_fallback = enabled; self }
    pub fn with_simulated_address(mut self, address: impl Into<String>) -> Self { self.simulated_address = address.into(); self }
    pub fn with_simulated_delay(mut self, delay: Duration) -> Self { self.simulated_delay = delay; self }
    pub fn with_flag_key(mut self, key: impl Into<String>) -> Self { self.flag_key = key.into(); self }
    pub fn with_chain(mut self, chain: ChainConfig) -> Self { self.chain = chain; self }

    /// Overlay `FRACTIONAL_*` environment variables onto the defaults.
    pub fn from_env() -> Self {
        Self::default().overlay(|key| std::env::var(key).ok())
    }

    fn overlay(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(v) = var("FRACTIONAL_SIMULATED") {
            self.allow_simulated_fallback = parse_bool(&v).unwrap_or(self.allow_simulated_fallback);
        }
        if let Some(ms) = var("FRACTIONAL_SIMULATED_DELAY_MS").and_then(|v| v.trim().parse::<u64>().ok()) {
            self.simulated_delay = Duration::from_millis(ms);
        }
        if let Some(v) = var("FRACTIONAL_RPC_URL") { self.chain.rpc_url = v; }
        if let Some(v) = var("FRACTIONAL_PACKAGE_ID") { self.chain.package_id = v; }
        if let Some(v) = var("FRACTIONAL_PLATFORM_ID") { self.chain.platform_id = v; }
        self
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
