use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;

use rand::Rng;

use crate::error::{Error, Result};

/// Key under which the per-user seed is stored.
pub const USER_SEED_KEY: &str = "USER_SEED";

/// Exclusive upper bound for freshly generated seeds.
const USER_SEED_RANGE: u32 = 1_000_000;

/// Small string key/value store holding client state between runs.
pub trait SeedStore: std::fmt::Debug + Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// A fresh random user seed. Not reproducible; only its persistence makes it stable.
pub fn generate_user_seed() -> String {
    rand::rng().random_range(0..USER_SEED_RANGE).to_string()
}

/// Returns the stored user seed, creating and persisting a random one on first use.
///
/// An unreadable stored value is replaced by a new seed. Fails only if the new seed
/// cannot be written. Two callers racing on an empty store may both write; the last
/// write wins.
pub fn get_or_create_user_seed(store: &dyn SeedStore) -> Result<String> {
    match store.get(USER_SEED_KEY) {
        Ok(Some(seed)) if !seed.is_empty() => return Ok(seed),
        Ok(_) => {}
        Err(e) => log::warn!("Discarding unreadable user seed: {}", e),
    }

    let seed = generate_user_seed();
    store.set(USER_SEED_KEY, &seed)?;
    log::info!("Created new user seed.");

    Ok(seed)
}

#[derive(Debug, Default)]
pub struct MemorySeedStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemorySeedStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SeedStore for MemorySeedStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self.values.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self.values.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Stores values as a flat JSON object in a file. A missing file reads as empty.
#[derive(Debug)]
pub struct FileSeedStore {
    path: PathBuf,
    lock: RwLock<()>,
}

impl FileSeedStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileSeedStore { path: path.into(), lock: RwLock::new(()) }
    }

    fn store_error(&self, reason: impl ToString) -> Error {
        Error::SeedStoreError { path: self.path.display().to_string(), reason: reason.to_string() }
    }

    fn read_all(&self) -> Result<HashMap<String, String>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }

        let data = fs::read_to_string(&self.path).map_err(|e| self.store_error(e))?;
        if data.trim().is_empty() {
            return Ok(HashMap::new());
        }

        serde_json::from_str(&data).map_err(|e| self.store_error(e))
    }
}

impl SeedStore for FileSeedStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(self.read_all()?.remove(key))
    }

    /// Rewrites the file. A corrupt file is replaced rather than merged.
    fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.lock.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut values = self.read_all().unwrap_or_else(|e| {
            log::warn!("Replacing corrupt seed store: {}", e);
            HashMap::new()
        });
        values.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.store_error(e))?;
        }
        let data = serde_json::to_string_pretty(&values)?;
        fs::write(&self.path, data).map_err(|e| self.store_error(e))?;
        log::debug!("Wrote '{}' to seed store {}", key, self.path.display());

        Ok(())
    }
}
