//! Persisted "simulated wallet was connected" flag.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::WalletResult;
use crate::provider::MaybeSendSync;

/// Boolean flags that survive a reload. Backends: memory, file, localStorage.
pub trait SessionFlag: MaybeSendSync {
    /// Missing keys read as `false`.
    fn load(&self, key: &str) -> WalletResult<bool>;
    fn store(&self, key: &str, value: bool) -> WalletResult<()>;
}

#[derive(Debug, Default)]
pub struct MemoryFlag {
    values: Mutex<HashMap<String, bool>>,
}

impl MemoryFlag {
    pub fn new() -> Self { Self::default() }

    pub fn with(key: &str, value: bool) -> Self {
        let flag = Self::default();
        flag.values.lock().unwrap_or_else(|p| p.into_inner()).insert(key.to_string(), value);
        flag
    }
}

impl SessionFlag for MemoryFlag {
    fn load(&self, key: &str) -> WalletResult<bool> {
        Ok(self.values.lock().unwrap_or_else(|p| p.into_inner()).get(key).copied().unwrap_or(false))
    }

    fn store(&self, key: &str, value: bool) -> WalletResult<()> {
        self.values.lock().unwrap_or_else(|p| p.into_inner()).insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(feature = "native")]
pub use file::FileFlag;

#[cfg(feature = "native")]
mod file {
    use serde::{Deserialize, Serialize};
    use std::collections::BTreeMap;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    use super::SessionFlag;
    use crate::error::{WalletError, WalletResult};

    #[derive(Debug, Default, Serialize, Deserialize)]
    struct FlagFile {
        flags: BTreeMap<String, FlagEntry>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    struct FlagEntry {
        value: bool,
        updated_at: String,
    }

    /// JSON file under `$FRACTIONAL_ROOT/<app>/session.json`, falling back to
    /// the platform data directory.
    #[derive(Debug)]
    pub struct FileFlag {
        path: PathBuf,
        write_lock: Mutex<()>,
    }

    impl FileFlag {
        pub fn open(app: &str) -> Self { Self::at(flag_path(app)) }

        pub fn at(path: impl Into<PathBuf>) -> Self { Self { path: path.into(), write_lock: Mutex::new(()) } }

        pub fn path(&self) -> &Path { &self.path }

        fn read(&self) -> WalletResult<FlagFile> {
            if !self.path.exists() {
                return Ok(FlagFile::default());
            }
            let raw = std::fs::read_to_string(&self.path)
                .map_err(|e| WalletError::Storage(format!("read {}: {e}", self.path.display())))?;
            serde_json::from_str(&raw).map_err(|e| WalletError::Storage(format!("flag json: {e}")))
        }
    }

    impl SessionFlag for FileFlag {
        fn load(&self, key: &str) -> WalletResult<bool> {
            Ok(self.read()?.flags.get(key).map(|e| e.value).unwrap_or(false))
        }

        fn store(&self, key: &str, value: bool) -> WalletResult<()> {
            let _guard = self.write_lock.lock().unwrap_or_else(|p| p.into_inner());
            let mut file = self.read()?;
            file.flags.insert(key.to_string(), FlagEntry { value, updated_at: chrono::Utc::now().to_rfc3339() });
            if let Some(parent) = self.path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| WalletError::Storage(format!("mkdir: {e}")))?;
            }
            let json = serde_json::to_string_pretty(&file).map_err(|e| WalletError::Storage(format!("flag json: {e}")))?;
            std::fs::write(&self.path, json).map_err(|e| WalletError::Storage(format!("write {}: {e}", self.path.display())))
        }
    }

    fn flag_path(app: &str) -> PathBuf {
        let root = std::env::var("FRACTIONAL_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| dirs::data_local_dir().unwrap_or_else(|| PathBuf::from(".")));
        root.join(app).join("session.json")
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn missing_file_reads_false_then_round_trips() {
            let dir = tempfile::TempDir::new().unwrap();
            let flag = FileFlag::at(dir.path().join("nested").join("session.json"));
            assert!(!flag.load("devWalletConnected").unwrap());
            flag.store("devWalletConnected", true).unwrap();
            assert!(flag.load("devWalletConnected").unwrap());
            assert!(!flag.load("other").unwrap());

            let reopened = FileFlag::at(flag.path().to_path_buf());
            assert!(reopened.load("devWalletConnected").unwrap());
            reopened.store("devWalletConnected", false).unwrap();
            assert!(!flag.load("devWalletConnected").unwrap());
        }

        #[test]
        fn corrupt_file_is_a_storage_error() {
            let dir = tempfile::TempDir::new().unwrap();
            let path = dir.path().join("session.json");
            std::fs::write(&path, "not json").unwrap();
            let err = FileFlag::at(path).load("devWalletConnected").unwrap_err();
            assert!(matches!(err, WalletError::Storage(_)));
        }
    }
}
