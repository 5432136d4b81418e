// localStorage-backed preference store

use web_sys::{Storage, Window};

use crate::portfolio::errors::PortfolioError;
use crate::portfolio::traits::PreferenceStore;

pub struct LocalStorage {
    storage: Storage,
}

impl LocalStorage {
    /// `None` when storage is disabled (privacy settings, sandboxed iframe)
    pub fn open(window: &Window) -> Option<Self> {
        match window.local_storage() {
            Ok(Some(storage)) => Some(Self { storage }),
            Ok(None) => None,
            Err(e) => {
                log::warn!("[Storage] localStorage unavailable: {}", PortfolioError::from(e));
                None
            }
        }
    }
}

impl PreferenceStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, PortfolioError> {
        Ok(self.storage.get_item(key)?)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PortfolioError> {
        self.storage.set_item(key, value)?;
        Ok(())
    }
}

/// Store used when localStorage is missing: reads nothing, writes nowhere
pub struct NoStorage;

impl PreferenceStore for NoStorage {
    fn get(&self, _key: &str) -> Result<Option<String>, PortfolioError> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), PortfolioError> {
        Err(PortfolioError::StorageUnavailable("localStorage disabled".to_string()))
    }
}
