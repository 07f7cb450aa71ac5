use std::sync::Arc;

use crate::clients::TelegramClient;
use crate::config::Config;
use crate::db::Store;
use crate::domain::{LocaleFamilyResolver, LocaleSet, SuffixFamilyResolver};
use crate::services::{
    ApplicationService, AuthService, CourseService, Notifier, SeaOrmAuthService,
    SeaOrmCourseService, TelegramNotifier, TokenService,
};

/// Everything the HTTP layer needs, built once at startup.
///
/// Configuration is read-only after construction; every component receives
/// its own copy of the values it needs.
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub locales: LocaleSet,

    pub tokens: Arc<TokenService>,

    pub auth_service: Arc<dyn AuthService>,

    pub course_service: Arc<dyn CourseService>,

    pub application_service: Arc<ApplicationService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let telegram = TelegramClient::from_config(&config.telegram)?;
        let notifier: Arc<dyn Notifier> = Arc::new(TelegramNotifier::new(telegram));
        Self::with_notifier(config, notifier).await
    }

    /// Builds the state with a caller-supplied notifier in place of Telegram.
    pub async fn with_notifier(config: Config, notifier: Arc<dyn Notifier>) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let locales = LocaleSet::new(config.content.locales.iter().map(String::as_str));
        let resolver: Arc<dyn LocaleFamilyResolver> =
            Arc::new(SuffixFamilyResolver::new(locales.clone()));

        let tokens = Arc::new(TokenService::from_config(&config.auth)?);

        let auth_service = Arc::new(SeaOrmAuthService::new(
            store.clone(),
            tokens.clone(),
            config.auth.clone(),
        )) as Arc<dyn AuthService>;

        let course_service = Arc::new(SeaOrmCourseService::new(
            store.clone(),
            resolver,
            locales.clone(),
        )) as Arc<dyn CourseService>;

        let application_service = Arc::new(ApplicationService::new(store.clone(), notifier));

        Ok(Self {
            config: Arc::new(config),
            store,
            locales,
            tokens,
            auth_service,
            course_service,
            application_service,
        })
    }
}
