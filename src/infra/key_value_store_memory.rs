use crate::domain_port::*;
use dashmap::DashMap;

/// Volatile partitions, for tests and demos.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    partitions: DashMap<String, String>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn load(&self, partition: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.partitions.get(partition).map(|v| v.value().clone()))
    }

    async fn save(&self, partition: &str, value: &str) -> Result<(), PersistenceError> {
        self.partitions.insert(partition.to_owned(), value.to_owned());
        Ok(())
    }

    async fn remove(&self, partition: &str) -> Result<(), PersistenceError> {
        self.partitions.remove(partition);
        Ok(())
    }
}
