pub mod in_memory_store;
pub mod sled_store;

pub use in_memory_store::InMemoryStore;
pub use sled_store::SledStore;

/// String key-value persistence the ledger writes through.
pub trait KeyValueStore {
    /// retrieve the value stored under `key`, if any
    fn get(&self, key: &str) -> crate::Result<Option<String>>;

    /// write or overwrite the value stored under `key`
    fn put(&mut self, key: &str, value: &str) -> crate::Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> crate::Result<Option<String>> {
        (**self).get(key)
    }

    fn put(&mut self, key: &str, value: &str) -> crate::Result<()> {
        (**self).put(key, value)
    }
}
