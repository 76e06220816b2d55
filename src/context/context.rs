use crate::api::v1::*;
use crate::application_impl::*;
use crate::application_impl::restore as restore_partition;
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use crate::hooks::*;
use crate::infra::*;
use crate::logger::*;
use crate::settings::Settings;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Infrastructure the context is assembled from.
pub struct ContextParts {
    pub transport: Arc<dyn HttpTransport>,
    pub kv: Arc<dyn KeyValueStore>,
    pub clock: Arc<dyn Clock>,
    pub query_options: QueryOptions,
    pub sweep_interval: Duration,
}

pub struct AppContext {
    pub session: Arc<dyn SessionStore>,
    pub onboarding: Arc<dyn OnboardingStore>,
    pub analysis_preferences: Arc<dyn AnalysisPreferenceStore>,
    pub profile: Arc<dyn UserProfileStore>,
    pub routine: Arc<dyn RoutineStore>,
    pub finance: Arc<dyn FinanceStore>,
    pub cache: QueryCache,
    pub analysis: AnalysisHooks,
    pub ranking: RankingHooks,
    pub group_routines: GroupRoutineHooks,
    pub personal_routines: PersonalRoutineHooks,
    pub routine_catalog: RoutineCatalogHooks,
    pub rewards: RewardHooks,
    pub user: UserHooks,
    user_api: Arc<UserApi>,
    kv: Arc<dyn KeyValueStore>,
    sweep_interval: Duration,
    started: AtomicBool,
    restored: AtomicBool,
    handles: Mutex<Vec<JoinHandle<()>>>,
    cancel: CancellationToken,
}

impl AppContext {
    pub fn try_new(settings: &Settings) -> anyhow::Result<Self> {
        let transport = ReqwestTransport::new(
            &settings.api.base_url,
            Duration::from_millis(settings.api.request_timeout_ms),
        )?;
        let query_options = QueryOptions {
            stale_time: Duration::from_millis(settings.cache.stale_time_ms),
            ttl: Duration::from_millis(settings.cache.ttl_ms),
            retry: settings.cache.retry,
            retry_delay: Duration::from_millis(settings.cache.retry_delay_ms),
        };
        if query_options.ttl < query_options.stale_time {
            return Err(anyhow::anyhow!(
                "cache ttl ({:?}) is shorter than stale time ({:?})",
                query_options.ttl,
                query_options.stale_time
            ));
        }

        Ok(Self::new(ContextParts {
            transport: Arc::new(transport),
            kv: Arc::new(FileKeyValueStore::new(&settings.storage.dir)),
            clock: Arc::new(SystemClock),
            query_options,
            sweep_interval: Duration::from_millis(settings.cache.sweep_interval_ms),
        }))
    }

    pub fn new(parts: ContextParts) -> Self {
        let cache = QueryCache::new(parts.clock.clone(), parts.query_options);
        let profile = Arc::new(InMemoryUserProfileStore::new());
        let routine = Arc::new(InMemoryRoutineStore::new(parts.clock));
        let finance = Arc::new(InMemoryFinanceStore::new());
        let listeners: Vec<Arc<dyn LogoutListener>> = vec![
            Arc::new(cache.clone()) as Arc<dyn LogoutListener>,
            profile.clone(),
            routine.clone(),
            finance.clone(),
        ];
        let session: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new(listeners));
        let profile: Arc<dyn UserProfileStore> = profile;

        let gateway = Arc::new(RequestGateway::new(session.clone(), parts.transport));
        let user_api = Arc::new(UserApi::new(gateway.clone()));

        let analysis = AnalysisHooks::new(cache.clone(), Arc::new(AnalysisApi::new(gateway.clone())));
        let ranking = RankingHooks::new(cache.clone(), Arc::new(RankingApi::new(gateway.clone())));
        let routine_catalog =
            RoutineCatalogHooks::new(cache.clone(), Arc::new(RoutineCatalogApi::new(gateway.clone())));
        let group_routines =
            GroupRoutineHooks::new(cache.clone(), Arc::new(GroupRoutineApi::new(gateway.clone())));
        let personal_routines =
            PersonalRoutineHooks::new(cache.clone(), Arc::new(PersonalRoutineApi::new(gateway.clone())));
        let rewards = RewardHooks::new(
            cache.clone(),
            Arc::new(RouletteApi::new(gateway.clone())),
            Arc::new(ShopApi::new(gateway)),
            profile.clone(),
        );
        let user = UserHooks::new(cache.clone(), user_api.clone(), profile.clone());

        AppContext {
            session,
            onboarding: Arc::new(InMemoryOnboardingStore::new()),
            analysis_preferences: Arc::new(InMemoryAnalysisPreferenceStore::new()),
            profile,
            routine,
            finance,
            cache,
            analysis,
            ranking,
            group_routines,
            personal_routines,
            routine_catalog,
            rewards,
            user,
            user_api,
            kv: parts.kv,
            sweep_interval: parts.sweep_interval,
            started: AtomicBool::new(false),
            restored: AtomicBool::new(false),
            handles: Mutex::new(Vec::new()),
            cancel: CancellationToken::new(),
        }
    }

    /// Loads every persisted partition, then starts mirroring the stores back
    /// to storage and sweeping the cache. Runs once; later calls are no-ops.
    pub async fn restore(&self) {
        if self.started.swap(true, Ordering::SeqCst) {
            return;
        }
        let kv = self.kv.as_ref();

        let tokens = restore_partition::<PersistedSession>(kv, AUTH_PARTITION)
            .await
            .and_then(PersistedSession::into_tokens);
        if let Some(tokens) = tokens {
            self.session.login(tokens);
        }
        if let Some(state) = restore_partition::<OnboardingState>(kv, ONBOARDING_PARTITION).await {
            if state.is_completed {
                self.onboarding.complete_onboarding();
            }
        }
        if let Some(preferences) =
            restore_partition::<AnalysisPreferences>(kv, ANALYSIS_PARTITION).await
        {
            self.analysis_preferences.set_period(preferences.selected_period);
            self.analysis_preferences.set_chart_type(preferences.selected_chart_type);
        }
        if let Some(profile) = restore_partition::<UserProfile>(kv, USER_PARTITION).await {
            self.profile.set_profile(profile);
        }
        if let Some(routine) = restore_partition::<PersistedRoutineState>(kv, ROUTINE_PARTITION).await
        {
            self.routine.set_selected_date(routine.selected_date);
            self.routine.set_filter(routine.routine_filter);
            self.routine.set_active_routine(routine.active_routine_id);
        }
        if let Some(snapshot) = restore_partition::<FinanceSnapshot>(kv, FINANCE_PARTITION).await {
            self.finance.set_balance(snapshot.current_balance);
            self.finance.set_budget(snapshot.monthly_budget);
            self.finance.set_total_expenses(snapshot.total_expenses);
        }

        self.spawn_background();
        self.restored.store(true, Ordering::SeqCst);
        info!(logged_in = self.session.is_logged_in(), "context restored");
    }

    fn spawn_background(&self) {
        let kv = self.kv.clone();
        let token = self.cancel.clone();
        let handles = vec![
            Persister::new(
                self.session.subscribe(),
                |s: &Session| s.persisted(),
                kv.clone(),
                AUTH_PARTITION,
                token.clone(),
            )
            .spawn(),
            Persister::new(
                self.onboarding.subscribe(),
                |s: &OnboardingState| Some(*s),
                kv.clone(),
                ONBOARDING_PARTITION,
                token.clone(),
            )
            .spawn(),
            Persister::new(
                self.analysis_preferences.subscribe(),
                |p: &AnalysisPreferences| Some(*p),
                kv.clone(),
                ANALYSIS_PARTITION,
                token.clone(),
            )
            .spawn(),
            Persister::new(
                self.profile.subscribe(),
                |p: &Option<UserProfile>| p.clone(),
                kv.clone(),
                USER_PARTITION,
                token.clone(),
            )
            .spawn(),
            Persister::new(
                self.routine.subscribe(),
                |s: &RoutineState| Some(PersistedRoutineState::from(s)),
                kv.clone(),
                ROUTINE_PARTITION,
                token.clone(),
            )
            .spawn(),
            Persister::new(
                self.finance.subscribe(),
                |s: &FinanceState| Some(s.snapshot),
                kv,
                FINANCE_PARTITION,
                token.clone(),
            )
            .spawn(),
            self.cache.spawn_sweeper(self.sweep_interval, token),
        ];
        self.handles
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .extend(handles);
    }

    /// Which top-level branch the shell shows. Splash until `restore` finishes.
    pub fn flow(&self) -> AppFlow {
        AppFlow::resolve(
            !self.restored.load(Ordering::SeqCst),
            self.session.is_logged_in(),
            self.onboarding.is_completed(),
        )
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<(), ApiError> {
        let body = SignInRequest {
            email: email.to_owned(),
            password: password.to_owned(),
        };
        let grant = self.user_api.sign_in(&body).await?;
        self.establish(grant, email, "");
        Ok(())
    }

    /// Signs in with a social account, or reports why it cannot.
    pub async fn social_sign_in(
        &self,
        email: &str,
        provider: Provider,
        provider_id: &str,
        nickname: &str,
    ) -> Result<SocialSignInOutcome, ApiError> {
        let check = OauthCheckRequest {
            email: email.to_owned(),
            provider,
            provider_id: provider_id.to_owned(),
        };
        match self.user_api.oauth_check(&check).await? {
            None => {
                // The wizard picks up from what the provider already told us.
                self.session.update_signup_draft(SignupField::Email(email.to_owned()));
                self.session
                    .update_signup_draft(SignupField::Nickname(nickname.to_owned()));
                self.session.update_signup_draft(SignupField::Social {
                    provider,
                    provider_id: provider_id.to_owned(),
                });
                Ok(SocialSignInOutcome::NeedsSignup)
            }
            Some(registered) if registered != provider => {
                Ok(SocialSignInOutcome::RegisteredWith(registered))
            }
            Some(_) => {
                let body = SignInRequest {
                    email: email.to_owned(),
                    password: String::new(),
                };
                let grant = self.user_api.sign_in(&body).await?;
                self.establish(grant, email, nickname);
                Ok(SocialSignInOutcome::SignedIn)
            }
        }
    }

    /// Submits the signup draft. The draft is cleared only once the server
    /// accepts it; a rejection carries the server's code and message as sent.
    pub async fn sign_up(&self) -> Result<(), ApiError> {
        let body = SignUpRequest::from(&self.session.snapshot().signup_draft);
        self.user_api.sign_up(&body).await?;
        self.session.clear_signup_draft();
        info!("account created");
        Ok(())
    }

    fn establish(&self, grant: TokenGrant, email: &str, nickname: &str) {
        // Data cached for a previous account must not leak into this one.
        self.cache.clear();
        self.session
            .login(AuthTokens::new(grant.access_token, grant.refresh_token));
        self.session.clear_signup_draft();
        self.onboarding.complete_onboarding();
        self.profile.set_profile(UserProfile {
            nickname: nickname.to_owned(),
            email: email.to_owned(),
            ..UserProfile::default()
        });
        info!("signed in");
    }

    /// Trades the current token pair for a new one. Never called implicitly.
    pub async fn reissue_tokens(&self) -> Result<(), ApiError> {
        let session = self.session.snapshot();
        let Some(tokens) = session.tokens().filter(|_| session.logged_in) else {
            return Err(ApiError::Auth {
                code: String::new(),
                message: "no tokens to reissue".to_owned(),
            });
        };
        let body = ReissueRequest {
            access_token: tokens.access_token.0.clone(),
            refresh_token: tokens.refresh_token.0.clone(),
        };
        let grant = self.user_api.reissue(&body).await?;
        let fresh = AuthTokens::new(grant.access_token, grant.refresh_token);
        if !self.session.replace_tokens_if(&tokens, fresh) {
            // Logged out or signed in again while the call was in flight.
            return Err(ApiError::Auth {
                code: String::new(),
                message: "session changed during reissue".to_owned(),
            });
        }
        debug!("tokens reissued");
        Ok(())
    }

    pub fn logout(&self) {
        self.session.logout();
    }

    /// Deletes the account, then drops the session and restarts onboarding.
    pub async fn withdraw(&self) -> Result<(), ApiError> {
        self.user_api.withdraw().await?;
        self.session.logout();
        self.onboarding.reset();
        info!("account withdrawn");
        Ok(())
    }

    pub async fn shutdown(&self) {
        info!("context shutting down...");

        self.cancel.cancel();

        let handles: Vec<_> = self
            .handles
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .drain(..)
            .collect();
        for handle in handles {
            let r = handle.await;
            debug!("background task stopped: {:?}", r);
        }
    }
}
