use crate::error::KVError;

/// One step of an atomic batch write.
///
/// Guards (`Expect`) are checked against the state before the batch runs.
/// If any guard fails, the whole batch is rejected with `KVError::Conflict`
/// and no write is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOp {
    /// Require `key` to currently hold exactly `value` (`None` = absent).
    Expect { key: String, value: Option<Vec<u8>> },
    Put { key: String, value: Vec<u8> },
    Delete { key: String },
}

/// KVStore provides a key-value storage interface.
///
/// Keys follow a namespaced convention: `promo:user:<id>`,
/// `promo:score:<id>`, `promo:interaction:<encoded key>`.
pub trait KVStore: Send + Sync {
    /// Get the value for a key. Returns None if the key does not exist.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVError>;

    /// Set a key-value pair.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), KVError>;

    /// Delete a key. Deleting a missing key is not an error.
    fn delete(&self, key: &str) -> Result<(), KVError>;

    /// Scan all keys matching a prefix. Returns sorted (key, value) pairs.
    fn scan(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, KVError>;

    /// Apply guards, puts and deletes as one atomic unit.
    fn write_batch(&self, ops: &[BatchOp]) -> Result<(), KVError>;
}
