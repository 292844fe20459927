pub mod clock;
pub mod config;
pub mod error;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::StorageConfig;
pub use error::ServiceError;
pub use types::{new_id, time_id};
