use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use crate::logger::*;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use futures_util::future::{BoxFuture, FutureExt, Shared};
use std::any::Any;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

type Value = Arc<dyn Any + Send + Sync>;
type SharedFetch = Shared<BoxFuture<'static, Result<Value, ApiError>>>;

/// Freshness windows and retry policy of one query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    /// Entries at least this old are stale.
    pub stale_time: Duration,
    /// Entries at least this old are gone.
    pub ttl: Duration,
    /// Extra attempts after a retryable failure.
    pub retry: u32,
    pub retry_delay: Duration,
}

impl Default for QueryOptions {
    fn default() -> Self {
        QueryOptions {
            stale_time: Duration::from_secs(5 * 60),
            ttl: Duration::from_secs(10 * 60),
            retry: 1,
            retry_delay: Duration::from_secs(1),
        }
    }
}

impl QueryOptions {
    pub fn with_windows(self, stale_time: Duration, ttl: Duration) -> Self {
        QueryOptions {
            stale_time,
            ttl,
            ..self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryState {
    /// Nothing servable and nothing in flight.
    Empty,
    /// Nothing servable, a fetch is in flight.
    Loading,
    Fresh,
    /// Servable while a refetch is due or running.
    Stale,
}

struct Cached {
    value: Value,
    fetched_at: DateTime<Utc>,
}

struct InFlight {
    seq: u64,
    fetch: SharedFetch,
}

struct Entry {
    data: Option<Cached>,
    options: QueryOptions,
    last_error: Option<ApiError>,
    in_flight: Option<InFlight>,
    applied_seq: u64,
    // responses to requests issued at or before this sequence are dropped
    discard_through: u64,
    observers: usize,
}

impl Entry {
    fn new(floor: u64, options: QueryOptions) -> Self {
        Entry {
            data: None,
            options,
            last_error: None,
            in_flight: None,
            applied_seq: floor,
            discard_through: floor,
            observers: 0,
        }
    }

    fn age(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.data
            .as_ref()
            .map(|d| (now - d.fetched_at).to_std().unwrap_or(Duration::ZERO))
    }

    fn state(&self, now: DateTime<Utc>) -> QueryState {
        match self.age(now) {
            Some(age) if age < self.options.stale_time => QueryState::Fresh,
            Some(age) if age < self.options.ttl => QueryState::Stale,
            _ if self.in_flight.is_some() => QueryState::Loading,
            _ => QueryState::Empty,
        }
    }

    /// The cached value and whether it is stale, unless expired.
    fn servable(&self, now: DateTime<Utc>) -> Option<(Value, bool)> {
        let stale = match self.state(now) {
            QueryState::Fresh => false,
            QueryState::Stale => true,
            QueryState::Empty | QueryState::Loading => return None,
        };
        self.data.as_ref().map(|d| (d.value.clone(), stale))
    }

    fn expired(&self, now: DateTime<Utc>) -> bool {
        self.age(now).is_none_or(|age| age >= self.options.ttl)
    }

    fn reset(&mut self, floor: u64) {
        self.data = None;
        self.last_error = None;
        self.in_flight = None;
        self.discard_through = floor;
    }
}

struct CacheInner {
    entries: DashMap<QueryKey, Entry>,
    clock: Arc<dyn Clock>,
    defaults: QueryOptions,
    seq: AtomicU64,
    pending_mutations: AtomicUsize,
}

impl CacheInner {
    fn apply(&self, key: &QueryKey, seq: u64, result: &Result<Value, ApiError>) {
        let Some(mut entry) = self.entries.get_mut(key) else {
            debug!(%key, seq, "dropping response for removed entry");
            return;
        };
        if entry.in_flight.as_ref().is_some_and(|f| f.seq == seq) {
            entry.in_flight = None;
        }
        if seq <= entry.discard_through || seq <= entry.applied_seq {
            debug!(%key, seq, "discarding superseded response");
            return;
        }
        match result {
            Ok(value) => {
                entry.data = Some(Cached {
                    value: value.clone(),
                    fetched_at: self.clock.now(),
                });
                entry.applied_seq = seq;
                entry.last_error = None;
            }
            Err(e) => {
                entry.last_error = Some(e.clone());
            }
        }
    }
}

/// Keyed cache of server reads with request de-duplication.
///
/// Each key holds at most one in-flight fetch; concurrent queries join it.
/// Responses are applied in request-issue order: every fetch takes a number
/// from one cache-wide sequence, and invalidation raises the key's discard
/// floor so that older responses are dropped when they land.
#[derive(Clone)]
pub struct QueryCache {
    inner: Arc<CacheInner>,
}

enum Outcome {
    Ready(Value),
    Wait(SharedFetch),
}

impl QueryCache {
    pub fn new(clock: Arc<dyn Clock>, defaults: QueryOptions) -> Self {
        QueryCache {
            inner: Arc::new(CacheInner {
                entries: DashMap::new(),
                clock,
                defaults,
                seq: AtomicU64::new(0),
                pending_mutations: AtomicUsize::new(0),
            }),
        }
    }

    pub fn defaults(&self) -> QueryOptions {
        self.inner.defaults
    }

    /// Returns the value for `key`, fetching it if nothing servable is cached.
    ///
    /// A stale value is returned at once and a background refetch is started.
    /// A failed fetch is returned to every waiter; the key keeps whatever it
    /// held before.
    pub async fn query<T, F, Fut>(
        &self,
        key: QueryKey,
        options: QueryOptions,
        fetcher: F,
    ) -> Result<Arc<T>, ApiError>
    where
        T: Send + Sync + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let now = self.inner.clock.now();
        let mut started = None;
        let outcome = {
            let floor = self.inner.seq.load(Ordering::SeqCst);
            let mut entry = self
                .inner
                .entries
                .entry(key.clone())
                .or_insert_with(|| Entry::new(floor, options));
            entry.options = options;

            match entry.servable(now) {
                Some((value, false)) => Outcome::Ready(value),
                Some((value, true)) => {
                    if entry.in_flight.is_none() {
                        debug!(%key, "stale, refetching in background");
                        started = Some(self.begin(&mut entry, &key, options, fetcher));
                    }
                    Outcome::Ready(value)
                }
                None => {
                    if let Some(fetch) = entry.in_flight.as_ref().map(|f| f.fetch.clone()) {
                        Outcome::Wait(fetch)
                    } else {
                        let fetch = self.begin(&mut entry, &key, options, fetcher);
                        started = Some(fetch.clone());
                        Outcome::Wait(fetch)
                    }
                }
            }
        };

        // Run to completion even if every waiter goes away.
        if let Some(fetch) = started {
            tokio::spawn(fetch);
        }

        let value = match outcome {
            Outcome::Ready(value) => value,
            Outcome::Wait(fetch) => fetch.await?,
        };
        value
            .downcast::<T>()
            .map_err(|_| ApiError::Decode(format!("cached value of {} has another type", key)))
    }

    fn begin<T, F, Fut>(
        &self,
        entry: &mut Entry,
        key: &QueryKey,
        options: QueryOptions,
        fetcher: F,
    ) -> SharedFetch
    where
        T: Send + Sync + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let seq = self.inner.seq.fetch_add(1, Ordering::SeqCst) + 1;
        let inner = self.inner.clone();
        let key = key.clone();
        let fetch = async move {
            let result = fetch_with_retry(&fetcher, options, &key).await;
            inner.apply(&key, seq, &result);
            result
        }
        .boxed()
        .shared();
        entry.in_flight = Some(InFlight {
            seq,
            fetch: fetch.clone(),
        });
        fetch
    }

    /// Forces every key under the given prefixes back to `Empty`.
    pub fn invalidate(&self, prefixes: &[QueryKey]) {
        let floor = self.inner.seq.load(Ordering::SeqCst);
        let mut count = 0;
        for mut entry in self.inner.entries.iter_mut() {
            if prefixes.iter().any(|p| entry.key().starts_with(p)) {
                entry.value_mut().reset(floor);
                count += 1;
            }
        }
        debug!(?prefixes, count, "invalidated");
    }

    /// Runs a write and invalidates `invalidates` once it succeeds.
    ///
    /// Writes are never retried.
    pub async fn mutate<T, Fut>(&self, invalidates: &[QueryKey], mutation: Fut) -> Result<T, ApiError>
    where
        Fut: Future<Output = Result<T, ApiError>>,
    {
        self.mutate_with(mutation, |_| invalidates.to_vec()).await
    }

    /// Like [`QueryCache::mutate`], with the invalidation set derived from the result.
    pub async fn mutate_with<T, Fut, K>(&self, mutation: Fut, invalidates: K) -> Result<T, ApiError>
    where
        Fut: Future<Output = Result<T, ApiError>>,
        K: FnOnce(&T) -> Vec<QueryKey>,
    {
        let result = {
            let _pending = PendingMutation::new(&self.inner.pending_mutations);
            mutation.await
        };
        match &result {
            Ok(value) => self.invalidate(&invalidates(value)),
            Err(e) => debug!("mutation failed: {}", e),
        }
        result
    }

    pub fn pending_mutations(&self) -> usize {
        self.inner.pending_mutations.load(Ordering::SeqCst)
    }

    pub fn state(&self, key: &QueryKey) -> QueryState {
        let now = self.inner.clock.now();
        self.inner
            .entries
            .get(key)
            .map_or(QueryState::Empty, |e| e.state(now))
    }

    /// The cached value, fresh or stale, without fetching.
    pub fn peek<T: Send + Sync + 'static>(&self, key: &QueryKey) -> Option<Arc<T>> {
        let now = self.inner.clock.now();
        let (value, _) = self.inner.entries.get(key)?.servable(now)?;
        value.downcast::<T>().ok()
    }

    pub fn last_error(&self, key: &QueryKey) -> Option<ApiError> {
        self.inner.entries.get(key)?.last_error.clone()
    }

    /// Marks `key` as observed until the guard drops. Observed entries are
    /// never evicted.
    pub fn observe(&self, key: QueryKey) -> ObserverGuard {
        let floor = self.inner.seq.load(Ordering::SeqCst);
        let defaults = self.inner.defaults;
        self.inner
            .entries
            .entry(key.clone())
            .or_insert_with(|| Entry::new(floor, defaults))
            .observers += 1;
        ObserverGuard {
            inner: self.inner.clone(),
            key,
        }
    }

    /// Drops unobserved, idle entries whose data is past its TTL.
    pub fn evict_expired(&self) -> usize {
        let now = self.inner.clock.now();
        let before = self.inner.entries.len();
        self.inner
            .entries
            .retain(|_, e| e.observers > 0 || e.in_flight.is_some() || !e.expired(now));
        let evicted = before.saturating_sub(self.inner.entries.len());
        if evicted > 0 {
            debug!(evicted, "evicted expired entries");
        }
        evicted
    }

    /// Forgets every cached value. Observer registrations survive.
    pub fn clear(&self) {
        let floor = self.inner.seq.load(Ordering::SeqCst);
        self.inner.entries.retain(|_, e| {
            e.reset(floor);
            e.observers > 0
        });
        debug!("query cache cleared");
    }

    pub fn spawn_sweeper(&self, interval: Duration, cancellation_token: CancellationToken) -> JoinHandle<()> {
        let cache = self.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    _ = cancellation_token.cancelled() => {
                        debug!("cache sweeper shutting down");
                        break;
                    }
                    _ = tokio::time::sleep(interval) => {
                        cache.evict_expired();
                    }
                }
            }
        })
    }
}

impl LogoutListener for QueryCache {
    fn on_logout(&self) {
        self.clear();
    }
}

async fn fetch_with_retry<T, F, Fut>(
    fetcher: &F,
    options: QueryOptions,
    key: &QueryKey,
) -> Result<Value, ApiError>
where
    T: Send + Sync + 'static,
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let mut attempt = 0;
    loop {
        match fetcher().await {
            Ok(value) => return Ok(Arc::new(value) as Value),
            Err(e) if e.is_retryable() && attempt < options.retry => {
                attempt += 1;
                warn!(%key, attempt, "fetch failed, retrying: {}", e);
                tokio::time::sleep(options.retry_delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}

struct PendingMutation<'a>(&'a AtomicUsize);

impl<'a> PendingMutation<'a> {
    fn new(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        PendingMutation(counter)
    }
}

impl Drop for PendingMutation<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

pub struct ObserverGuard {
    inner: Arc<CacheInner>,
    key: QueryKey,
}

impl Drop for ObserverGuard {
    fn drop(&mut self) {
        if let Some(mut entry) = self.inner.entries.get_mut(&self.key) {
            entry.observers = entry.observers.saturating_sub(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application_impl::*;
    use crate::infra::{FakeTransport, ManualClock};
    use tokio::sync::oneshot;

    const STALE: Duration = Duration::from_secs(60);
    const TTL: Duration = Duration::from_secs(300);

    fn options() -> QueryOptions {
        QueryOptions {
            stale_time: STALE,
            ttl: TTL,
            retry: 1,
            retry_delay: Duration::ZERO,
        }
    }

    fn cache() -> (Arc<ManualClock>, QueryCache) {
        let clock = Arc::new(ManualClock::new());
        let cache = QueryCache::new(clock.clone(), options());
        (clock, cache)
    }

    fn counting(calls: Arc<AtomicUsize>) -> impl Fn() -> BoxFuture<'static, Result<usize, ApiError>> + Send + Sync + 'static {
        move || {
            let calls = calls.clone();
            Box::pin(async move {
                tokio::time::sleep(Duration::from_millis(10)).await;
                Ok(calls.fetch_add(1, Ordering::SeqCst) + 1)
            })
        }
    }

    fn gated(rx: oneshot::Receiver<u32>) -> impl Fn() -> BoxFuture<'static, Result<u32, ApiError>> + Send + Sync + 'static {
        let rx = std::sync::Mutex::new(Some(rx));
        move || {
            let rx = rx.lock().unwrap().take();
            Box::pin(async move {
                match rx {
                    Some(rx) => rx.await.map_err(|_| ApiError::Network("gate dropped".into())),
                    None => Err(ApiError::Network("gate reused".into())),
                }
            })
        }
    }

    async fn wait_until(mut condition: impl FnMut() -> bool) {
        for _ in 0..500 {
            if condition() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
        panic!("condition never held");
    }

    #[tokio::test]
    async fn concurrent_queries_share_one_fetch() {
        let (_, cache) = cache();
        let calls = Arc::new(AtomicUsize::new(0));
        let key = QueryKey::new("categoryAnalysis");

        let (a, b) = tokio::join!(
            cache.query(key.clone(), options(), counting(calls.clone())),
            cache.query(key.clone(), options(), counting(calls.clone())),
        );

        assert_eq!(*a.unwrap(), 1);
        assert_eq!(*b.unwrap(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.state(&key), QueryState::Fresh);
    }

    #[tokio::test]
    async fn fresh_entry_is_served_without_refetch() {
        let (clock, cache) = cache();
        let calls = Arc::new(AtomicUsize::new(0));
        let key = QueryKey::new("weeklySpending");

        cache.query(key.clone(), options(), counting(calls.clone())).await.unwrap();
        clock.advance(STALE - Duration::from_millis(1));
        cache.query(key.clone(), options(), counting(calls.clone())).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.state(&key), QueryState::Fresh);
    }

    #[tokio::test]
    async fn stale_boundary_is_inclusive() {
        let (clock, cache) = cache();
        let calls = Arc::new(AtomicUsize::new(0));
        let key = QueryKey::new("myTickets");

        cache.query(key.clone(), options(), counting(calls.clone())).await.unwrap();
        clock.advance(STALE);
        assert_eq!(cache.state(&key), QueryState::Stale);

        // Served at once, refreshed behind the caller.
        let served = cache.query(key.clone(), options(), counting(calls.clone())).await.unwrap();
        assert_eq!(*served, 1);

        wait_until(|| cache.peek::<usize>(&key).as_deref() == Some(&2)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.state(&key), QueryState::Fresh);
    }

    #[tokio::test]
    async fn entry_past_ttl_is_empty() {
        let (clock, cache) = cache();
        let calls = Arc::new(AtomicUsize::new(0));
        let key = QueryKey::new("maxStreak");

        cache.query(key.clone(), options(), counting(calls.clone())).await.unwrap();
        clock.advance(TTL);

        assert_eq!(cache.state(&key), QueryState::Empty);
        assert!(cache.peek::<usize>(&key).is_none());
        let value = cache.query(key.clone(), options(), counting(calls.clone())).await.unwrap();
        assert_eq!(*value, 2);
    }

    #[tokio::test]
    async fn invalidation_is_prefix_based() {
        let (_, cache) = cache();
        let calls = Arc::new(AtomicUsize::new(0));
        let one = QueryKey::new("groupRoutineDetail").with(1);
        let two = QueryKey::new("groupRoutineDetail").with(2);
        let other = QueryKey::new("myGroupRoutines");
        for key in [&one, &two, &other] {
            cache.query(key.clone(), options(), counting(calls.clone())).await.unwrap();
        }

        cache.invalidate(&[QueryKey::new("groupRoutineDetail")]);

        assert_eq!(cache.state(&one), QueryState::Empty);
        assert_eq!(cache.state(&two), QueryState::Empty);
        assert_eq!(cache.state(&other), QueryState::Fresh);
    }

    #[tokio::test]
    async fn mutation_invalidates_only_on_success() {
        let (_, cache) = cache();
        let calls = Arc::new(AtomicUsize::new(0));
        let key = QueryKey::new("personalRoutines").with("2025-03-01");
        cache.query(key.clone(), options(), counting(calls.clone())).await.unwrap();

        let failed: Result<(), _> = cache
            .mutate(&[key.clone()], async { Err(ApiError::from_status(400, "X", "bad")) })
            .await;
        assert!(failed.is_err());
        assert_eq!(cache.state(&key), QueryState::Fresh);

        cache.mutate(&[key.clone()], async { Ok(()) }).await.unwrap();
        assert_eq!(cache.state(&key), QueryState::Empty);
        assert_eq!(cache.pending_mutations(), 0);

        cache.query(key.clone(), options(), counting(calls.clone())).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn older_response_landing_last_is_discarded() {
        let (_, cache) = cache();
        let key = QueryKey::new("groupRoutineDetail").with(7);
        let (tx1, rx1) = oneshot::channel();
        let (tx2, rx2) = oneshot::channel();

        let first = tokio::spawn({
            let cache = cache.clone();
            let key = key.clone();
            async move { cache.query(key, options(), gated(rx1)).await }
        });
        wait_until(|| cache.state(&key) == QueryState::Loading).await;

        cache.invalidate(&[key.clone()]);
        assert_eq!(cache.state(&key), QueryState::Empty);

        let second = tokio::spawn({
            let cache = cache.clone();
            let key = key.clone();
            async move { cache.query(key, options(), gated(rx2)).await }
        });
        wait_until(|| cache.state(&key) == QueryState::Loading).await;

        tx2.send(2).unwrap();
        assert_eq!(*second.await.unwrap().unwrap(), 2);
        tx1.send(1).unwrap();
        assert_eq!(*first.await.unwrap().unwrap(), 1);

        assert_eq!(cache.peek::<u32>(&key).as_deref(), Some(&2));
    }

    #[tokio::test]
    async fn response_of_invalidated_fetch_does_not_fill_the_key() {
        let (_, cache) = cache();
        let key = QueryKey::new("myGroupRoutines");
        let (tx, rx) = oneshot::channel();

        let pending = tokio::spawn({
            let cache = cache.clone();
            let key = key.clone();
            async move { cache.query(key, options(), gated(rx)).await }
        });
        wait_until(|| cache.state(&key) == QueryState::Loading).await;
        cache.invalidate(&[key.clone()]);

        tx.send(5).unwrap();
        pending.await.unwrap().unwrap();

        assert_eq!(cache.state(&key), QueryState::Empty);
    }

    #[tokio::test]
    async fn unauthorized_query_stays_empty_and_is_not_retried() {
        let (_, cache) = cache();
        let session = Arc::new(InMemorySessionStore::new(vec![]));
        let transport = Arc::new(FakeTransport::new());
        transport.respond(
            "/api/v1/roulette/my-tickets",
            401,
            r#"{"isSuccess":false,"code":"COMMON401","message":"login required"}"#,
        );
        let gateway = Arc::new(RequestGateway::new(session.clone(), transport.clone()));
        let key = QueryKey::new("myTickets");

        let result = cache
            .query(key.clone(), options(), move || {
                let gateway = gateway.clone();
                async move {
                    gateway
                        .call::<MyTickets>(ApiRequest::get("/api/v1/roulette/my-tickets"))
                        .await
                }
            })
            .await;

        assert!(matches!(result, Err(ApiError::Auth { .. })));
        assert_eq!(cache.state(&key), QueryState::Empty);
        assert!(matches!(cache.last_error(&key), Some(ApiError::Auth { .. })));

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].header("Authorization"), None);
        assert!(session.snapshot().is_cleared());
    }

    #[tokio::test]
    async fn retryable_failure_is_retried_once() {
        let (_, cache) = cache();
        let calls = Arc::new(AtomicUsize::new(0));
        let key = QueryKey::new("dailyRecommendation");

        let value = cache
            .query(key.clone(), options(), {
                let calls = calls.clone();
                move || {
                    let attempt = calls.fetch_add(1, Ordering::SeqCst);
                    async move {
                        if attempt == 0 {
                            Err(ApiError::from_status(503, "", ""))
                        } else {
                            Ok("recommendation")
                        }
                    }
                }
            })
            .await
            .unwrap();

        assert_eq!(*value, "recommendation");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn client_error_is_not_retried() {
        let (_, cache) = cache();
        let calls = Arc::new(AtomicUsize::new(0));

        let result: Result<Arc<()>, _> = cache
            .query(QueryKey::new("productDetail"), options(), {
                let calls = calls.clone();
                move || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    async { Err(ApiError::from_status(404, "", "")) }
                }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_background_refetch_keeps_stale_value() {
        let (clock, cache) = cache();
        let key = QueryKey::new("myPoint");
        cache
            .query(key.clone(), options(), || async { Ok(10u32) })
            .await
            .unwrap();
        clock.advance(STALE);

        let served = cache
            .query(key.clone(), options(), || async {
                Err::<u32, _>(ApiError::from_status(400, "", ""))
            })
            .await
            .unwrap();
        assert_eq!(*served, 10);

        wait_until(|| cache.last_error(&key).is_some()).await;
        assert_eq!(cache.state(&key), QueryState::Stale);
        assert_eq!(cache.peek::<u32>(&key).as_deref(), Some(&10));
    }

    #[tokio::test]
    async fn eviction_spares_observed_entries() {
        let (clock, cache) = cache();
        let watched = QueryKey::new("groupRoutines");
        let idle = QueryKey::new("myGroupRoutines");
        for key in [&watched, &idle] {
            cache.query(key.clone(), options(), || async { Ok(1u8) }).await.unwrap();
        }
        let guard = cache.observe(watched.clone());
        clock.advance(TTL);

        assert_eq!(cache.evict_expired(), 1);
        drop(guard);
        assert_eq!(cache.evict_expired(), 1);
    }

    #[tokio::test]
    async fn logout_clears_every_entry() {
        let (_, cache) = cache();
        let key = QueryKey::new("myInfo");
        cache.query(key.clone(), options(), || async { Ok(1u8) }).await.unwrap();

        cache.on_logout();

        assert_eq!(cache.state(&key), QueryState::Empty);
        assert!(cache.peek::<u8>(&key).is_none());
    }

    #[tokio::test]
    async fn mismatched_type_is_a_decode_error() {
        let (_, cache) = cache();
        let key = QueryKey::new("weeklySpending");
        cache.query(key.clone(), options(), || async { Ok(1u8) }).await.unwrap();

        let result = cache.query(key, options(), || async { Ok("text") }).await;
        assert!(matches!(result, Err(ApiError::Decode(_))));
    }
}
