//! Typed read-modify-write access to one collection.
//!
//! The whole array under the collection key is the unit of every read and
//! write; there are no row-level updates.

use std::marker::PhantomData;

use log::{debug, warn};
use serde_json::Value as JsonValue;

use crate::app_response::AppResponse;
use crate::key_value_store::{JsonStoreExt, KeyValueStore};
use crate::local_db_model::{Product, Record, Review};

pub struct CollectionRepository<'a, S: ?Sized, R> {
    store: &'a S,
    _marker: PhantomData<R>,
}

pub type Products<'a, S> = CollectionRepository<'a, S, Product>;
pub type Reviews<'a, S> = CollectionRepository<'a, S, Review>;

impl<'a, S: KeyValueStore + ?Sized, R: Record> CollectionRepository<'a, S, R> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            _marker: PhantomData,
        }
    }

    /// Current contents in stored order; `[]` if never written.
    ///
    /// Entries that do not decode or validate are skipped. A failed read is
    /// an error, so callers never rewrite the collection from an empty view.
    pub fn list(&self) -> Result<Vec<R>, AppResponse> {
        let raw: Vec<JsonValue> = self.store.get(R::COLLECTION, Vec::new())?;
        Ok(raw
            .into_iter()
            .enumerate()
            .filter_map(|(index, value)| match serde_json::from_value::<R>(value) {
                Ok(record) => match record.validate() {
                    Ok(()) => Some(record),
                    Err(e) => {
                        warn!("Skipping {} entry {index}: {e}", R::COLLECTION);
                        None
                    }
                },
                Err(e) => {
                    warn!("Skipping malformed {} entry {index}: {e}", R::COLLECTION);
                    None
                }
            })
            .collect())
    }

    /// Replaces the whole collection with `records`, in order.
    pub fn save(&self, records: &[R]) -> Result<(), AppResponse> {
        for record in records {
            record.validate()?;
        }
        debug!("Saving {} {}", records.len(), R::COLLECTION);
        self.store.set(R::COLLECTION, records)
    }

    pub fn find(&self, id: &str) -> Result<Option<R>, AppResponse> {
        Ok(self.list()?.into_iter().find(|record| record.id() == id))
    }

    /// Replaces the first record sharing `record`'s id, or appends it.
    pub fn upsert(&self, record: R) -> Result<R, AppResponse> {
        record.validate()?;
        let mut records = self.list()?;
        match records.iter().position(|existing| existing.id() == record.id()) {
            Some(index) => records[index] = record.clone(),
            None => records.push(record.clone()),
        }
        self.store.set(R::COLLECTION, &records)?;
        Ok(record)
    }

    /// Appends `record` without looking for an existing id.
    pub fn append(&self, record: R) -> Result<R, AppResponse> {
        record.validate()?;
        let mut records = self.list()?;
        records.push(record.clone());
        self.store.set(R::COLLECTION, &records)?;
        Ok(record)
    }

    /// Drops every record with `id`. Returns `false`, and writes nothing, when
    /// no record matched.
    pub fn remove(&self, id: &str) -> Result<bool, AppResponse> {
        let records = self.list()?;
        let before = records.len();
        let kept: Vec<R> = records.into_iter().filter(|record| record.id() != id).collect();
        if kept.len() == before {
            return Ok(false);
        }
        self.store.set(R::COLLECTION, &kept)?;
        Ok(true)
    }
}
