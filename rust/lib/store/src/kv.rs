//! Record trait + KvOps CRUD operations.
//!
//! The model impls `Record` to declare its prefix and key.
//! `KvOps<T>` provides the actual get/save/list/delete using a KVStore backend,
//! and builds `BatchOp`s for callers that need several writes to land together.

use std::marker::PhantomData;
use std::sync::Arc;

use promo_core::ServiceError;
use promo_kv::{BatchOp, KVError, KVStore};
use serde::{Serialize, de::DeserializeOwned};

/// Trait implemented by models to declare KV storage behavior.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Human-readable record kind, used in error messages ("user", "promotion").
    const KIND: &'static str;

    /// KV key prefix: "{module}:{resource}:".
    fn kv_prefix() -> &'static str;

    /// Extract the key value from this instance as a string.
    fn key_value(&self) -> String;
}

/// A record together with the exact bytes it was decoded from.
///
/// The bytes are what a compare-and-swap guard must match.
#[derive(Debug, Clone)]
pub struct Versioned<T> {
    pub record: T,
    pub raw: Vec<u8>,
}

/// CRUD operations for a Record model. Holds a reference to the KV backend.
pub struct KvOps<T: Record> {
    kv: Arc<dyn KVStore>,
    _phantom: PhantomData<T>,
}

impl<T: Record> Clone for KvOps<T> {
    fn clone(&self) -> Self {
        Self::new(Arc::clone(&self.kv))
    }
}

impl<T: Record> KvOps<T> {
    pub fn new(kv: Arc<dyn KVStore>) -> Self {
        Self {
            kv,
            _phantom: PhantomData,
        }
    }

    pub fn make_key(id: &str) -> String {
        format!("{}{}", T::kv_prefix(), id)
    }

    pub fn kv_err(e: KVError) -> ServiceError {
        match e {
            KVError::Conflict(key) => {
                ServiceError::Conflict(format!("key '{}' was modified concurrently", key))
            }
            other => ServiceError::Storage(other.to_string()),
        }
    }

    fn decode(bytes: &[u8]) -> Result<T, ServiceError> {
        serde_json::from_slice(bytes)
            .map_err(|e| ServiceError::Internal(format!("deserialize {}: {}", T::KIND, e)))
    }

    fn encode(record: &T) -> Result<Vec<u8>, ServiceError> {
        serde_json::to_vec(record)
            .map_err(|e| ServiceError::Internal(format!("serialize {}: {}", T::KIND, e)))
    }

    /// Get a record by key value. Returns None if not found.
    pub fn get(&self, id: &str) -> Result<Option<T>, ServiceError> {
        Ok(self.get_versioned(id)?.map(|v| v.record))
    }

    /// Get a record and the raw bytes it was stored as.
    pub fn get_versioned(&self, id: &str) -> Result<Option<Versioned<T>>, ServiceError> {
        let key = Self::make_key(id);
        match self.kv.get(&key).map_err(Self::kv_err)? {
            Some(raw) => Ok(Some(Versioned {
                record: Self::decode(&raw)?,
                raw,
            })),
            None => Ok(None),
        }
    }

    /// Get a record or return NotFound error.
    pub fn get_or_err(&self, id: &str) -> Result<T, ServiceError> {
        self.get(id)?
            .ok_or_else(|| ServiceError::NotFound(format!("{} '{}' not found", T::KIND, id)))
    }

    /// List all records with this prefix, in key order.
    pub fn list(&self) -> Result<Vec<T>, ServiceError> {
        let entries = self.kv.scan(T::kv_prefix()).map_err(Self::kv_err)?;
        let mut records = Vec::with_capacity(entries.len());
        for (_key, bytes) in entries {
            records.push(Self::decode(&bytes)?);
        }
        Ok(records)
    }

    /// Create a new record. A taken key is a `Validation` error.
    pub fn save_new(&self, record: &T) -> Result<(), ServiceError> {
        let id = record.key_value();

        // The absent-guard makes the duplicate check and the insert one step.
        self.kv
            .write_batch(&[Self::expect_op(&id, None), Self::put_op(record)?])
            .map_err(|e| match e {
                KVError::Conflict(_) => {
                    ServiceError::Validation(format!("{} '{}' already exists", T::KIND, id))
                }
                other => Self::kv_err(other),
            })
    }

    /// Insert or replace a record.
    pub fn save(&self, record: &T) -> Result<(), ServiceError> {
        let key = Self::make_key(&record.key_value());
        let bytes = Self::encode(record)?;
        self.kv.set(&key, &bytes).map_err(Self::kv_err)
    }

    /// Delete a record by key value.
    pub fn delete(&self, id: &str) -> Result<(), ServiceError> {
        self.get_or_err(id)?;
        self.kv.delete(&Self::make_key(id)).map_err(Self::kv_err)
    }

    // ── Batch builders ──

    pub fn put_op(record: &T) -> Result<BatchOp, ServiceError> {
        Ok(BatchOp::Put {
            key: Self::make_key(&record.key_value()),
            value: Self::encode(record)?,
        })
    }

    pub fn delete_op(id: &str) -> BatchOp {
        BatchOp::Delete { key: Self::make_key(id) }
    }

    /// Guard: the record under `id` must still be stored as exactly `seen`
    /// (`None` = must still be absent).
    pub fn expect_op(id: &str, seen: Option<&[u8]>) -> BatchOp {
        BatchOp::Expect {
            key: Self::make_key(id),
            value: seen.map(<[u8]>::to_vec),
        }
    }

    /// Apply a batch built from this or any other `KvOps`.
    pub fn write_batch(&self, ops: &[BatchOp]) -> Result<(), ServiceError> {
        self.kv.write_batch(ops).map_err(Self::kv_err)
    }
}
