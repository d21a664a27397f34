//! WalletBridge: the wallet session exposed to JavaScript
//!
//! One bridge installs the process-wide [`SessionContext`]; a second bridge
//! created later shares it.

use serde_json::Value;
use std::sync::Arc;
use wasm_bindgen::prelude::*;

use super::{log, to_js, LocalStorageFlag, WindowDetector};
use crate::catalog;
use crate::config::{ChainConfig, WalletConfig};
use crate::context::SessionContext;
use crate::error::WalletError;
use crate::gateway::TransactionRequest;

fn js_error(err: &WalletError) -> JsValue {
    let error = js_sys::Error::new(&err.to_string());
    let _ = js_sys::Reflect::set(&error, &JsValue::from_str("code"), &JsValue::from_str(err.code()));
    error.into()
}

#[wasm_bindgen]
pub struct WalletBridge {
    ctx: Arc<SessionContext>,
}

#[wasm_bindgen]
impl WalletBridge {
    /// Create (or join) the session and start the one-time restore.
    #[wasm_bindgen(constructor)]
    pub fn new(allow_simulated_fallback: bool, package_id: Option<String>, platform_id: Option<String>) -> Self {
        let mut chain = ChainConfig::default();
        if let Some(id) = package_id {
            chain = chain.with_package(id);
        }
        if let Some(id) = platform_id {
            chain = chain.with_platform(id);
        }
        let config = WalletConfig::default().with_simulated_fallback(allow_simulated_fallback).with_chain(chain);
        log!("[WalletBridge] simulated fallback: {}", allow_simulated_fallback);

        let ctx = SessionContext::install(SessionContext::new(
            config,
            Arc::new(WindowDetector::new()),
            Arc::new(LocalStorageFlag::new()),
        ));
        ctx.start();
        Self { ctx }
    }

    /// Current `{account, connecting, lastError}` snapshot.
    #[wasm_bindgen]
    pub fn state(&self) -> JsValue { to_js(&self.ctx.state()) }

    #[wasm_bindgen]
    pub async fn connect(&self) -> JsValue { to_js(&self.ctx.connect().await) }

    #[wasm_bindgen]
    pub async fn disconnect(&self) -> JsValue { to_js(&self.ctx.disconnect().await) }

    #[wasm_bindgen]
    pub fn reset(&self) -> JsValue { to_js(&self.ctx.reset()) }

    /// Await the startup restore (runs at most once per page).
    #[wasm_bindgen]
    pub async fn restore(&self) -> JsValue { to_js(&self.ctx.restore_once().await) }

    /// Submit `{kind, ...}`; rejects with an `Error` carrying a `code`.
    #[wasm_bindgen]
    pub async fn submit(&self, request: JsValue) -> Result<JsValue, JsValue> {
        let value: Value = serde_wasm_bindgen::from_value(request)
            .map_err(|e| js_error(&WalletError::InvalidRequest(e.to_string())))?;
        let request = TransactionRequest::from_json(value).map_err(|e| js_error(&e))?;
        let result = self.ctx.submit(&request).await.map_err(|e| js_error(&e))?;
        Ok(to_js(&result))
    }

    /// Call `callback(state)` after every session transition.
    #[wasm_bindgen]
    pub fn subscribe(&self, callback: js_sys::Function) {
        let rx = self.ctx.subscribe();
        let this = JsValue::NULL;
        wasm_bindgen_futures::spawn_local(async move {
            use futures::StreamExt;
            let mut rx = rx;
            while let Some(state) = rx.next().await {
                let _ = callback.call1(&this, &to_js(&state));
            }
        });
    }

    #[wasm_bindgen(js_name = "assetClasses")]
    pub fn asset_classes(&self) -> JsValue { to_js(&catalog::asset_classes()) }

    #[wasm_bindgen(js_name = "investmentPools")]
    pub fn investment_pools(&self) -> JsValue { to_js(&catalog::investment_pools()) }
}
