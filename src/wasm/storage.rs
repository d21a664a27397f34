use web_sys::Storage;

use crate::error::{WalletError, WalletResult};
use crate::session::SessionFlag;

/// Session flag in `window.localStorage`: `"true"` when set, removed when cleared.
#[derive(Default)]
pub struct LocalStorageFlag;

impl LocalStorageFlag {
    pub fn new() -> Self { Self }

    fn storage(&self) -> WalletResult<Storage> {
        web_sys::window()
            .ok_or_else(|| WalletError::Storage("no window".into()))?
            .local_storage()
            .map_err(|e| WalletError::Storage(super::js_message(&e)))?
            .ok_or_else(|| WalletError::Storage("localStorage unavailable".into()))
    }
}

impl SessionFlag for LocalStorageFlag {
    fn load(&self, key: &str) -> WalletResult<bool> {
        let value = self.storage()?.get_item(key).map_err(|e| WalletError::Storage(super::js_message(&e)))?;
        Ok(value.as_deref() == Some("true"))
    }

    fn store(&self, key: &str, value: bool) -> WalletResult<()> {
        let storage = self.storage()?;
        let written = if value { storage.set_item(key, "true") } else { storage.remove_item(key) };
        written.map_err(|e| WalletError::Storage(super::js_message(&e)))
    }
}
