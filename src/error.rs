//! Error taxonomy for the wallet layer.
//!
//! `WalletSession::connect`/`disconnect` never return these; they record the
//! message in `SessionState::last_error`. `TransactionGateway::submit` returns
//! them directly so every call site sees the precise outcome.

use thiserror::Error;

use crate::provider::Capability;

pub type WalletResult<T> = Result<T, WalletError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    /// No candidate binding holds a usable provider.
    #[error("Wallet provider not found. Please install a wallet extension and refresh the page.")]
    ProviderNotFound,

    /// Provider found but permission/connection failed or returned no accounts.
    #[error("Wallet connection rejected: {0}")]
    ConnectionRejected(String),

    #[error("Wallet not connected")]
    NotConnected,

    #[error("Wallet provider '{binding}' does not support {capability}")]
    UnsupportedProvider { binding: String, capability: Capability },

    #[error("Malformed provider response: {0}")]
    MalformedProviderResponse(String),

    /// Structural problem with a request (empty identifier, bad amount).
    #[error("Invalid transaction request: {0}")]
    InvalidRequest(String),

    /// Provider-side submission failure, message kept verbatim.
    #[error("{0}")]
    Submission(String),

    #[error("Session flag storage: {0}")]
    Storage(String),
}

impl WalletError {
    /// Stable machine-readable code, used by the HTTP and JS surfaces.
    pub fn code(&self) -> &'static str {
        match self {
            WalletError::ProviderNotFound => "provider_not_found",
            WalletError::ConnectionRejected(_) => "connection_rejected",
            WalletError::NotConnected => "not_connected",
            WalletError::UnsupportedProvider { .. } => "unsupported_provider",
            WalletError::MalformedProviderResponse(_) => "malformed_provider_response",
            WalletError::InvalidRequest(_) => "invalid_request",
            WalletError::Submission(_) => "submission_failed",
            WalletError::Storage(_) => "storage",
        }
    }
}
