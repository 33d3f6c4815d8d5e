//! Key-value persistence used by the history store and the live inputs.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Saved calculations, most recent first.
pub const HISTORY_KEY: &str = "monsteralpha-history";
/// The inputs currently being edited.
pub const CALCULATOR_KEY: &str = "monsteralpha-calculator";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage I/O error for key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Serialize(#[from] serde_json::Error),
}

/// Synchronous string store addressed by fixed keys.
///
/// `set` replaces the whole value for a key in one step; readers never see a
/// partially written value.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}
