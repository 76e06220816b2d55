use crate::domain_port::*;
use crate::logger::*;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Mirrors a store's whitelisted projection into one storage partition.
///
/// The current projection is written on start and then on every change whose
/// projection differs. A `None` projection removes the partition. Write
/// failures are logged and the in-memory state stays authoritative. On
/// cancellation the latest projection is flushed once more.
pub struct Persister<T, P> {
    rx: watch::Receiver<T>,
    project: fn(&T) -> Option<P>,
    kv: Arc<dyn KeyValueStore>,
    partition: &'static str,
    cancellation_token: CancellationToken,
}

impl<T, P> Persister<T, P>
where
    T: Send + Sync + 'static,
    P: Serialize + PartialEq + Send + Sync + 'static,
{
    pub fn new(
        rx: watch::Receiver<T>,
        project: fn(&T) -> Option<P>,
        kv: Arc<dyn KeyValueStore>,
        partition: &'static str,
        cancellation_token: CancellationToken,
    ) -> Self {
        Self {
            rx,
            project,
            kv,
            partition,
            cancellation_token,
        }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn write(&self, projection: &Option<P>) -> bool {
        let result = match projection.as_ref().map(serde_json::to_string) {
            Some(Ok(json)) => self.kv.save(self.partition, &json).await,
            Some(Err(e)) => Err(e.into()),
            None => self.kv.remove(self.partition).await,
        };
        match result {
            Ok(()) => true,
            Err(e) => {
                warn!(partition = self.partition, "persist failed: {}", e);
                false
            }
        }
    }

    pub async fn run(mut self) {
        let mut last: Option<Option<P>> = None;
        self.rx.mark_changed();

        loop {
            tokio::select! {
                biased;
                _ = self.cancellation_token.cancelled() => break,
                changed = self.rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }

            let projection = (self.project)(&*self.rx.borrow_and_update());
            if last.as_ref() == Some(&projection) {
                continue;
            }
            last = self.write(&projection).await.then_some(projection);
        }

        let projection = (self.project)(&*self.rx.borrow());
        if last.as_ref() != Some(&projection) {
            self.write(&projection).await;
        }
        debug!(partition = self.partition, "persister stopped");
    }
}

/// Reads a partition back. Missing, unreadable or malformed data yields `None`.
pub async fn restore<P: DeserializeOwned>(kv: &dyn KeyValueStore, partition: &str) -> Option<P> {
    let raw = match kv.load(partition).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!(partition, "restore failed: {}", e);
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(partition, "discarding malformed persisted state: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application_impl::*;
    use crate::application_port::*;
    use crate::domain_model::*;
    use crate::infra::MemoryKeyValueStore;
    use std::time::Duration;

    async fn wait_for(kv: &MemoryKeyValueStore, partition: &str, expected: &str) {
        for _ in 0..100 {
            if kv.load(partition).await.unwrap().as_deref() == Some(expected) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("partition {} never became {}", partition, expected);
    }

    #[tokio::test]
    async fn session_tokens_are_written_through() {
        let kv = Arc::new(MemoryKeyValueStore::new());
        let store = InMemorySessionStore::new(vec![]);
        let cancel = CancellationToken::new();
        let handle = Persister::new(
            store.subscribe(),
            |s: &Session| s.persisted(),
            kv.clone(),
            AUTH_PARTITION,
            cancel.clone(),
        )
        .spawn();

        store.login(AuthTokens::new("a", "r"));
        wait_for(&kv, AUTH_PARTITION, r#"{"accessToken":"a","refreshToken":"r"}"#).await;

        store.logout();
        for _ in 0..100 {
            if kv.load(AUTH_PARTITION).await.unwrap().is_none() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(kv.load(AUTH_PARTITION).await.unwrap(), None);

        cancel.cancel();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn signup_draft_is_never_persisted() {
        let kv = Arc::new(MemoryKeyValueStore::new());
        let store = InMemorySessionStore::new(vec![]);
        let cancel = CancellationToken::new();
        let handle = Persister::new(
            store.subscribe(),
            |s: &Session| s.persisted(),
            kv.clone(),
            AUTH_PARTITION,
            cancel.clone(),
        )
        .spawn();

        store.update_signup_draft(SignupField::Password("hunter2".into()));
        cancel.cancel();
        handle.await.unwrap();

        let saved = kv.load(AUTH_PARTITION).await.unwrap().unwrap_or_default();
        assert!(!saved.contains("hunter2"));
    }

    #[tokio::test]
    async fn cancellation_flushes_latest_state() {
        let kv = Arc::new(MemoryKeyValueStore::new());
        let store = InMemoryOnboardingStore::new();
        let cancel = CancellationToken::new();
        cancel.cancel();

        store.complete_onboarding();
        Persister::new(
            store.subscribe(),
            |s: &OnboardingState| Some(*s),
            kv.clone(),
            ONBOARDING_PARTITION,
            cancel,
        )
        .run()
        .await;

        assert_eq!(
            restore::<OnboardingState>(&*kv, ONBOARDING_PARTITION).await,
            Some(OnboardingState { is_completed: true })
        );
    }

    #[tokio::test]
    async fn malformed_partition_restores_as_none() {
        let kv = MemoryKeyValueStore::new();
        kv.save(ANALYSIS_PARTITION, "{not json").await.unwrap();

        let restored: Option<AnalysisPreferences> = restore(&kv, ANALYSIS_PARTITION).await;
        assert_eq!(restored, None);
    }
}
