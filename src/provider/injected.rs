//! InjectedBindings - in-process stand-in for the global wallet bindings
//!
//! Native hosts (and tests) install providers under binding names the same way
//! a browser extension would inject `window.suiWallet`. Bindings can be
//! replaced or removed at any time; detection always reads the current table.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::{ProviderDetector, ProviderHandle, WalletProvider, CANDIDATE_BINDINGS};

#[derive(Clone)]
pub struct InjectedBindings {
    candidates: Vec<String>,
    bindings: Arc<RwLock<HashMap<String, Arc<dyn WalletProvider>>>>,
}

impl Default for InjectedBindings {
    fn default() -> Self { Self::new() }
}

impl InjectedBindings {
    pub fn new() -> Self {
        Self::with_candidates(CANDIDATE_BINDINGS.iter().map(|s| (*s).to_string()).collect())
    }

    /// Look up a custom set of binding names, in the given order.
    pub fn with_candidates(candidates: Vec<String>) -> Self {
        Self { candidates, bindings: Arc::new(RwLock::new(HashMap::new())) }
    }

    /// Install (or replace) the provider under `binding`.
    pub fn inject(&self, binding: impl Into<String>, provider: Arc<dyn WalletProvider>) {
        let binding = binding.into();
        tracing::debug!(%binding, "wallet provider injected");
        self.write().insert(binding, provider);
    }

    /// Remove whatever is installed under `binding`, as on extension uninstall.
    pub fn remove(&self, binding: &str) -> bool {
        let removed = self.write().remove(binding).is_some();
        if removed { tracing::debug!(%binding, "wallet provider removed"); }
        removed
    }

    pub fn clear(&self) { self.write().clear(); }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, Arc<dyn WalletProvider>>> {
        self.bindings.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ProviderDetector for InjectedBindings {
    fn detect(&self) -> Option<ProviderHandle> {
        let bindings = self.bindings.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        self.candidates.iter().find_map(|name| {
            let provider = bindings.get(name)?;
            let handle = ProviderHandle::new(name.clone(), provider.clone());
            // An object with none of the methods is not a usable wallet.
            (!handle.capabilities().is_empty()).then_some(handle)
        })
    }
}
