use crate::domain_port::*;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// One JSON file per partition under a base directory.
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileKeyValueStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, partition: &str) -> Result<PathBuf, PersistenceError> {
        let valid = !partition.is_empty()
            && partition
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(PersistenceError::InvalidPartition(partition.to_owned()));
        }
        Ok(self.dir.join(format!("{}.json", partition)))
    }
}

#[async_trait::async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn load(&self, partition: &str) -> Result<Option<String>, PersistenceError> {
        match tokio::fs::read_to_string(self.path(partition)?).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, partition: &str, value: &str) -> Result<(), PersistenceError> {
        let path = self.path(partition)?;
        tokio::fs::create_dir_all(&self.dir).await?;

        // Replace in one step so a crash never leaves half a file.
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, value).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    async fn remove(&self, partition: &str) -> Result<(), PersistenceError> {
        match tokio::fs::remove_file(self.path(partition)?).await {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nanoid::nanoid;

    fn store() -> FileKeyValueStore {
        FileKeyValueStore::new(std::env::temp_dir().join(format!("moneyfit-{}", nanoid!(8))))
    }

    #[tokio::test]
    async fn partitions_are_independent() {
        let store = store();
        store.save(AUTH_PARTITION, r#"{"accessToken":"a"}"#).await.unwrap();
        store.save(ONBOARDING_PARTITION, r#"{"isCompleted":true}"#).await.unwrap();

        store.remove(AUTH_PARTITION).await.unwrap();

        assert_eq!(store.load(AUTH_PARTITION).await.unwrap(), None);
        assert_eq!(
            store.load(ONBOARDING_PARTITION).await.unwrap().as_deref(),
            Some(r#"{"isCompleted":true}"#)
        );
        let _ = std::fs::remove_dir_all(store.dir());
    }

    #[tokio::test]
    async fn missing_partition_loads_as_none() {
        let store = store();
        assert_eq!(store.load(USER_PARTITION).await.unwrap(), None);
        store.remove(USER_PARTITION).await.unwrap();
    }

    #[tokio::test]
    async fn rejects_path_like_partition_names() {
        let store = store();
        let err = store.save("../escape", "x").await.unwrap_err();
        assert!(matches!(err, PersistenceError::InvalidPartition(_)));
    }
}
