use common::types::dtos::DeliveryRecord;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Concurrency-safe map from order id to its delivery record.
///
/// Records go in and come out by value. The only way to change a stored
/// record is [`DeliveryStore::update`], which runs under the write lock, so a
/// reader sees either all of a transition or none of it.
#[derive(Debug, Default)]
pub struct DeliveryStore {
    deliveries: RwLock<HashMap<String, DeliveryRecord>>,
}

impl DeliveryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts the record, replacing whatever was stored under `order_id`.
    pub fn put(&self, order_id: impl Into<String>, record: DeliveryRecord) {
        self.deliveries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(order_id.into(), record);
    }

    pub fn get(&self, order_id: &str) -> Option<DeliveryRecord> {
        self.deliveries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(order_id)
            .cloned()
    }

    pub fn snapshot(&self) -> HashMap<String, DeliveryRecord> {
        self.deliveries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn order_ids(&self) -> Vec<String> {
        self.deliveries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    /// Runs `f` on the stored record while holding the write lock.
    /// Returns `None` when there is no record for `order_id`.
    pub fn update<F, T>(&self, order_id: &str, f: F) -> Option<T>
    where
        F: FnOnce(&mut DeliveryRecord) -> T,
    {
        self.deliveries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .get_mut(order_id)
            .map(f)
    }

    pub fn len(&self) -> usize {
        self.deliveries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
