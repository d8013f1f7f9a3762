//! Key-value storage backends.
//!
//! The store only needs two primitives from the device: read the value under
//! a key, and replace the value under a key. [`LmdbStorage`] provides them on
//! top of an LMDB environment; [`MemoryStorage`] keeps values in process
//! memory for shells that don't persist and for tests.

use std::collections::HashMap;
use std::fs;
use std::sync::{Arc, Mutex};

use lmdb::{Database, DatabaseFlags, Environment, Transaction, WriteFlags};
use log::{debug, info};

use crate::store_config::StoreConfig;
use crate::store_error::StorageFault;

/// Name of the LMDB sub-database holding the store's keys.
pub const LMDB_DB_NAME: &str = "flipshelf";

/// String-keyed storage with whole-value reads and writes.
///
/// There is no partial update and no transaction spanning a `get` and a
/// `set`; callers that read-modify-write must serialize themselves.
pub trait KeyValueStorage: Send + Sync {
    /// Returns the raw value under `key`, or `None` if nothing was ever set.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageFault>;

    /// Replaces the value under `key`.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageFault>;
}

impl<S: KeyValueStorage + ?Sized> KeyValueStorage for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageFault> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageFault> {
        (**self).set(key, value)
    }
}

pub struct LmdbStorage {
    env: Environment,
    db: Database,
}

impl LmdbStorage {
    /// Opens (creating if needed) the environment at `config.lmdb_dir()`.
    pub fn open(config: &StoreConfig) -> Result<Self, StorageFault> {
        let dir = config.lmdb_dir();
        if dir.exists() {
            info!("Opening existing database at: {}", dir.display());
        } else {
            info!("Creating new database at: {}", dir.display());
            fs::create_dir_all(&dir)?;
        }

        let env = Environment::new()
            .set_max_dbs(1)
            .set_map_size(config.map_size)
            .open(&dir)?;
        let db = env.create_db(Some(LMDB_DB_NAME), DatabaseFlags::empty())?;

        Ok(Self { env, db })
    }
}

impl KeyValueStorage for LmdbStorage {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageFault> {
        let txn = self.env.begin_ro_txn()?;
        let value = match txn.get(self.db, &key) {
            Ok(bytes) => Some(bytes.to_vec()),
            Err(lmdb::Error::NotFound) => None,
            Err(e) => return Err(e.into()),
        };
        txn.abort();

        debug!("LMDB get '{key}': {}", if value.is_some() { "hit" } else { "miss" });
        Ok(value)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageFault> {
        let mut txn = self.env.begin_rw_txn()?;
        txn.put(self.db, &key, &value, WriteFlags::empty())?;
        txn.commit()?;

        debug!("LMDB set '{key}': {} bytes", value.len());
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageFault> {
        let values = self
            .values
            .lock()
            .map_err(|e| StorageFault::Unavailable(e.to_string()))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageFault> {
        let mut values = self
            .values
            .lock()
            .map_err(|e| StorageFault::Unavailable(e.to_string()))?;
        values.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}
