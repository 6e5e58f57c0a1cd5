//! Storage layer (key-value store collaborator).

pub mod file_store;
pub mod memory;
pub mod schema;

pub use file_store::JsonFileStore;
pub use memory::MemoryStore;
pub use schema::StoredWorkout;

use crate::error::AppError;

/// Store keys as constants.
pub mod keys {
    /// Whole workout collection, replaced on every append.
    pub const WORKOUTS: &str = "workouts";
}

/// String key-value store, in the shape of browser local storage.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove_item(&mut self, key: &str) -> Result<(), StoreError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StoreError> {
        (**self).remove_item(key)
    }
}

/// Errors from key-value store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store file is not a JSON object of strings: {0}")]
    Format(#[from] serde_json::Error),

    #[error("Storage quota exceeded ({0} bytes)")]
    QuotaExceeded(usize),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Storage(err.to_string())
    }
}
