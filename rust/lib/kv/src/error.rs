use thiserror::Error;

#[derive(Error, Debug)]
pub enum KVError {
    /// A batch guard did not match the stored value. Nothing was written.
    #[error("conflict on key: {0}")]
    Conflict(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}
