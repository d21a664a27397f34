//! Simulated responder for development without a wallet extension.

use std::time::Duration;

use super::call::Endpoint;
use super::request::{TransactionRequest, TransactionResult};
use crate::runtime;

#[derive(Debug, Clone)]
pub struct SimulatedResponder {
    delay: Duration,
}

impl SimulatedResponder {
    pub fn new(delay: Duration) -> Self { Self { delay } }

    /// Wait out the artificial network delay, then report success.
    pub async fn respond(&self, request: &TransactionRequest) -> TransactionResult {
        tracing::info!(endpoint = %Endpoint::of(request), delay_ms = self.delay.as_millis() as u64, "simulated submission");
        runtime::sleep(self.delay).await;
        TransactionResult::simulated(pseudo_digest(request))
    }
}

fn pseudo_digest(request: &TransactionRequest) -> String {
    let nonce: [u8; 16] = rand::random();
    let mut hasher = blake3::Hasher::new();
    hasher.update(&nonce);
    hasher.update(Endpoint::of(request).as_str().as_bytes());
    hasher.update(&serde_json::to_vec(request).unwrap_or_default());
    format!("0x{}", hex::encode(&hasher.finalize().as_bytes()[..16]))
}
