//! LMDB-backed [`KeyValueStore`].
//!
//! The environment lives in a directory named `<name>.lmdb` and holds a single
//! named database. Each `write` is its own committed read-write transaction,
//! so a value is either fully replaced or untouched.

use std::fs;
use std::path::{Path, PathBuf};

use lmdb::{Database, DatabaseFlags, Environment, Error as LmdbError, Transaction, WriteFlags};
use log::{debug, info};

use crate::app_response::AppResponse;
use crate::key_value_store::KeyValueStore;
use crate::store_config::StoreConfig;

const DB_NAME: &str = "storefront";

pub struct AppDbState {
    env: Environment,
    db: Database,
    path: PathBuf,
}

impl AppDbState {
    /// Opens (or creates) the store `<name>.lmdb` with default settings.
    pub fn init(name: String) -> Result<Self, AppResponse> {
        Self::open(&StoreConfig::new(name))
    }

    pub fn open(config: &StoreConfig) -> Result<Self, AppResponse> {
        config.validate()?;

        let path = PathBuf::from(config.lmdb_dir());
        fs::create_dir_all(&path).map_err(|e| {
            AppResponse::DatabaseError(format!(
                "Cannot create database directory '{}': {e}",
                path.display()
            ))
        })?;

        let env = Environment::new()
            .set_max_dbs(1)
            .set_map_size(config.map_size)
            .open(&path)?;
        let db = env.create_db(Some(DB_NAME), DatabaseFlags::empty())?;

        info!("Opened LMDB store at {}", path.display());
        Ok(Self { env, db, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flushes pending writes to disk and releases the environment.
    pub fn close_database(self) -> Result<(), AppResponse> {
        self.env.sync(true)?;
        info!("Closed LMDB store at {}", self.path.display());
        Ok(())
    }
}

impl KeyValueStore for AppDbState {
    fn read(&self, key: &str) -> Result<Option<String>, AppResponse> {
        let txn = self.env.begin_ro_txn()?;
        let value = match txn.get(self.db, &key) {
            Ok(bytes) => Some(std::str::from_utf8(bytes).map(str::to_owned).map_err(|e| {
                AppResponse::SerializationError(format!("Invalid UTF-8 stored at '{key}': {e}"))
            })?),
            Err(LmdbError::NotFound) => None,
            Err(e) => return Err(e.into()),
        };
        txn.abort();
        Ok(value)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), AppResponse> {
        let mut txn = self.env.begin_rw_txn()?;
        txn.put(self.db, &key, &value, WriteFlags::empty())?;
        txn.commit()?;
        debug!("Committed '{}' to {}", key, self.path.display());
        Ok(())
    }
}
