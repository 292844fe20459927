//! Typed records on top of the raw KV store.

pub mod kv;

pub use kv::{KvOps, Record, Versioned};
