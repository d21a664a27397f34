//! Fractional Wallet: wallet session and transaction gateway for a
//! fractional-investment dashboard on a Move-based chain.
//!
//! # Architecture
//!
//! ```text
//! SessionContext (process-wide, restores once at startup)
//!   │
//!   ├── WalletSession
//!   │     ├── ProviderDetector (InjectedBindings / browser window)
//!   │     ├── SessionFlag (memory / file / localStorage)
//!   │     └── state: Disconnected → Connecting → Connected(Account)
//!   │
//!   └── TransactionGateway
//!         ├── real provider: MoveCall → signAndSubmit → TransactionResult
//!         └── simulated fallback: delayed pseudo-digest
//! ```
//!
//! # Surfaces
//!
//! | Surface | Where | Entry |
//! |---------|-------|-------|
//! | library | everywhere | [`SessionContext`] |
//! | HTTP | `native` | [`server::create_router`] |
//! | CLI | `native` | `fractional-wallet` binary |
//! | JS | `wasm` | `WalletBridge` |
//!
//! # Features
//!
//! - `native` - tokio, file-backed session flag, axum server, CLI
//! - `wasm` - browser wallets via `window`, localStorage flag, wasm-bindgen
//!
//! # Usage
//!
//! ```ignore
//! use fractional_wallet::{InjectedBindings, MemoryFlag, SessionContext, TransactionRequest, WalletConfig};
//!
//! let ctx = SessionContext::new(WalletConfig::development(), Arc::new(InjectedBindings::new()), Arc::new(MemoryFlag::new()));
//! ctx.connect().await;
//! let result = ctx.submit(&TransactionRequest::invest_in_asset("0x123", 1_000_000_000u64)).await?;
//! println!("{}", result.digest());
//! ```

#[cfg(not(any(feature = "native", all(feature = "wasm", target_arch = "wasm32"))))]
compile_error!("enable `native`, or `wasm` when targeting wasm32");

// =============================================================================
// Shared modules (compile everywhere)
// =============================================================================
pub mod amount;
pub mod catalog;
pub mod config;
pub mod context;
pub mod error;
pub mod gateway;
pub mod provider;
pub mod runtime;
pub mod session;

// =============================================================================
// Native-only modules (server, CLI, filesystem, tokio)
// =============================================================================
#[cfg(feature = "native")]
pub mod logging;
#[cfg(feature = "native")]
pub mod server;

// =============================================================================
// WASM-only modules (browser, localStorage, wasm-bindgen)
// =============================================================================
#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
pub mod wasm;

// =============================================================================
// Re-exports: Shared
// =============================================================================
pub use amount::MinorUnits;
pub use catalog::{AssetClass, CatalogError, InvestmentPool, RiskLevel};
pub use config::{ChainConfig, WalletConfig};
pub use context::SessionContext;
pub use error::{WalletError, WalletResult};
pub use gateway::{MoveCall, TransactionGateway, TransactionRequest, TransactionResult, TxStatus};
pub use provider::{
    Capabilities, Capability, InjectedBindings, ProviderDetector, ProviderError, ProviderHandle, WalletProvider,
};
pub use session::{Account, AccountSource, MemoryFlag, SessionFlag, SessionState, SessionStatus, WalletSession};

// =============================================================================
// Re-exports: Native
// =============================================================================
#[cfg(feature = "native")]
pub use session::FileFlag;
#[cfg(feature = "native")]
pub use server::create_router;

// =============================================================================
// Re-exports: WASM
// =============================================================================
#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
pub use wasm::{LocalStorageFlag, WalletBridge, WindowDetector};
