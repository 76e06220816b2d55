/// Named persistence partitions. Clearing one never touches another.
pub const AUTH_PARTITION: &str = "auth-storage";
pub const ONBOARDING_PARTITION: &str = "onboarding-storage";
pub const ANALYSIS_PARTITION: &str = "analysis-storage";
pub const USER_PARTITION: &str = "user-storage";
pub const ROUTINE_PARTITION: &str = "routine-storage";
pub const FINANCE_PARTITION: &str = "finance-storage";

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid partition name: {0}")]
    InvalidPartition(String),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[async_trait::async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn load(&self, partition: &str) -> Result<Option<String>, PersistenceError>;
    async fn save(&self, partition: &str, value: &str) -> Result<(), PersistenceError>;
    async fn remove(&self, partition: &str) -> Result<(), PersistenceError>;
}
