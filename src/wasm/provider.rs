//! Injected browser wallets, read straight off `window`.
//!
//! Capabilities come from which methods the object actually has:
//!
//! | Capability | Methods |
//! |------------|---------|
//! | requestConnection | `requestPermissions` or `connect` |
//! | listAccounts | `getAccounts` or `getAddress` |
//! | signAndSubmit | `signAndExecuteTransactionBlock` |
//! | disconnect | `disconnect` or `signOut` |

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use super::{js_message, log, to_js};
use crate::gateway::MoveCall;
use crate::provider::{
    Capabilities, Capability, ProviderDetector, ProviderError, ProviderHandle, ProviderResult, WalletProvider,
    CANDIDATE_BINDINGS,
};

const REQUEST_METHODS: &[&str] = &["requestPermissions", "connect"];
const ACCOUNT_METHODS: &[&str] = &["getAccounts", "getAddress"];
const SUBMIT_METHODS: &[&str] = &["signAndExecuteTransactionBlock"];
const DISCONNECT_METHODS: &[&str] = &["disconnect", "signOut"];

fn methods_for(capability: Capability) -> &'static [&'static str] {
    match capability {
        Capability::RequestConnection => REQUEST_METHODS,
        Capability::ListAccounts => ACCOUNT_METHODS,
        Capability::SignAndSubmit => SUBMIT_METHODS,
        Capability::Disconnect => DISCONNECT_METHODS,
    }
}

fn method(target: &JsValue, name: &str) -> Option<js_sys::Function> {
    js_sys::Reflect::get(target, &JsValue::from_str(name))
        .ok()
        .and_then(|f| f.dyn_into::<js_sys::Function>().ok())
}

/// Capability set of a JS wallet object.
pub fn capabilities_of_object(target: &JsValue) -> Capabilities {
    Capability::ALL
        .into_iter()
        .filter(|cap| methods_for(*cap).iter().any(|name| method(target, name).is_some()))
        .collect()
}

/// A wallet object found under one of the candidate `window` bindings.
///
/// `signAndExecuteTransactionBlock` receives the [`MoveCall`] as plain JSON
/// (`target`, `endpoint`, `arguments`), not a Sui SDK `TransactionBlock`.
/// Extensions that insist on the SDK type need a shim on the page that
/// builds one from those fields.
pub struct JsWalletProvider {
    binding: String,
    target: JsValue,
    capabilities: Capabilities,
}

impl JsWalletProvider {
    pub fn new(binding: impl Into<String>, target: JsValue) -> Self {
        let capabilities = capabilities_of_object(&target);
        Self { binding: binding.into(), target, capabilities }
    }

    /// Call the first method present for `capability`, awaiting it if it
    /// returns a promise.
    async fn invoke(&self, capability: Capability, args: &[JsValue]) -> ProviderResult<(&'static str, JsValue)> {
        let (name, function) = methods_for(capability)
            .iter()
            .find_map(|name| method(&self.target, name).map(|f| (*name, f)))
            .ok_or(ProviderError::Unsupported(capability))?;

        let js_args = args.iter().cloned().collect::<js_sys::Array>();
        let returned = function
            .apply(&self.target, &js_args)
            .map_err(|e| ProviderError::Rejected(js_message(&e)))?;
        let value = match returned.dyn_into::<js_sys::Promise>() {
            Ok(promise) => JsFuture::from(promise).await.map_err(|e| ProviderError::Rejected(js_message(&e)))?,
            Err(value) => value,
        };
        Ok((name, value))
    }
}

#[async_trait(?Send)]
impl WalletProvider for JsWalletProvider {
    fn capabilities(&self) -> Capabilities { self.capabilities }

    async fn request_connection(&self) -> ProviderResult<()> {
        self.invoke(Capability::RequestConnection, &[]).await.map(|_| ())
    }

    async fn list_accounts(&self) -> ProviderResult<Vec<String>> {
        let (name, value) = self.invoke(Capability::ListAccounts, &[]).await?;
        if name == "getAddress" {
            return Ok(value.as_string().into_iter().collect());
        }
        // Either plain address strings or account objects with an `address` field.
        let accounts = js_sys::Array::from(&value)
            .iter()
            .filter_map(|entry| {
                entry.as_string().or_else(|| {
                    js_sys::Reflect::get(&entry, &JsValue::from_str("address")).ok().and_then(|a| a.as_string())
                })
            })
            .collect();
        Ok(accounts)
    }

    async fn sign_and_submit(&self, call: &MoveCall) -> ProviderResult<Value> {
        let params = json!({
            "transactionBlock": call,
            "options": { "showEffects": call.show_effects, "showEvents": call.show_events },
        });
        log!("[{}] signAndExecuteTransactionBlock {}", self.binding, call.target);
        let (_, value) = self.invoke(Capability::SignAndSubmit, &[to_js(&params)]).await?;
        serde_wasm_bindgen::from_value(value).map_err(|e| ProviderError::Rejected(e.to_string()))
    }

    async fn disconnect(&self) -> ProviderResult<()> {
        self.invoke(Capability::Disconnect, &[]).await.map(|_| ())
    }
}

/// Looks up `window[binding]` for each candidate, every call.
pub struct WindowDetector {
    candidates: Vec<String>,
}

impl Default for WindowDetector {
    fn default() -> Self { Self::new() }
}

impl WindowDetector {
    pub fn new() -> Self {
        Self { candidates: CANDIDATE_BINDINGS.iter().map(|b| b.to_string()).collect() }
    }
}

impl ProviderDetector for WindowDetector {
    fn detect(&self) -> Option<ProviderHandle> {
        let window = web_sys::window()?;
        self.candidates.iter().find_map(|binding| {
            let target = js_sys::Reflect::get(&window, &JsValue::from_str(binding)).ok()?;
            if !target.is_object() {
                return None;
            }
            let provider = JsWalletProvider::new(binding.clone(), target);
            if provider.capabilities.is_empty() {
                return None;
            }
            Some(ProviderHandle::new(binding.clone(), Arc::new(provider)))
        })
    }
}
