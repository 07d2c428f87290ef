use crate::error::KVError;

/// KVStore provides a key-value storage interface with prefix scans.
///
/// Keys follow a namespaced convention: `recent:{user}:{kind}:{target}`,
/// etc. `set` is an upsert — writing an existing key replaces its value,
/// which is what the recently-viewed dedup relies on.
pub trait KVStore: Send + Sync {
    /// Get the value for a key. Returns None if the key does not exist.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVError>;

    /// Set a key-value pair, replacing any existing value.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), KVError>;

    /// Delete a key. Deleting an absent key is not an error.
    fn delete(&self, key: &str) -> Result<(), KVError>;

    /// Scan all keys matching a prefix. Returns key-sorted (key, value) pairs.
    fn scan(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, KVError>;
}
