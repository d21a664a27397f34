//! WASM module: the wallet session inside the browser
//!
//! Architecture:
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          WalletBridge (JS API)          │
//! │  connect, disconnect, state, submit,    │
//! │  restore, subscribe                     │
//! └─────────────────┬───────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────┐
//! │     SessionContext (session + gateway)  │
//! └──────────┬───────────────────┬──────────┘
//!            │                   │
//! ┌──────────▼─────────┐ ┌───────▼──────────┐
//! │  WindowDetector    │ │ LocalStorageFlag │
//! │  window.suiWallet  │ │ localStorage     │
//! │  window.sui        │ └──────────────────┘
//! │  window.wallet     │
//! └────────────────────┘
//! ```

mod bridge;
mod provider;
mod storage;

pub use bridge::WalletBridge;
pub use provider::{JsWalletProvider, WindowDetector};
pub use storage::LocalStorageFlag;

use wasm_bindgen::prelude::*;

/// Initialize WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Log to browser console
pub fn console_log(s: &str) {
    web_sys::console::log_1(&JsValue::from_str(s));
}

macro_rules! log {
    ($($t:tt)*) => {
        crate::wasm::console_log(&format!($($t)*))
    }
}

pub(crate) use log;

/// Serialize for JS with plain objects instead of `Map`s.
pub(crate) fn to_js<T: serde::Serialize + ?Sized>(value: &T) -> JsValue {
    let serializer = serde_wasm_bindgen::Serializer::new().serialize_maps_as_objects(true);
    value.serialize(&serializer).unwrap_or(JsValue::NULL)
}

/// Best-effort message from a thrown JS value.
pub(crate) fn js_message(err: &JsValue) -> String {
    if let Some(message) = err.as_string() {
        return message;
    }
    js_sys::Reflect::get(err, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .unwrap_or_else(|| "Unknown error".to_string())
}
