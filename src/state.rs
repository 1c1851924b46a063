use std::sync::Arc;

use crate::auth::{GoogleIdentityVerifier, IdentityVerifier, JwtError, SessionKeys};
use crate::config::AppConfig;
use crate::database::{
    BlogPostRepository, CalendarEventRepository, DatabasePool, MemoryStore, PgBlogPostRepository,
    PgCalendarEventRepository, PgUserRepository, UserRepository,
};

/// Shared handles every handler receives through `State`
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub posts: Arc<dyn BlogPostRepository>,
    pub events: Arc<dyn CalendarEventRepository>,
    pub users: Arc<dyn UserRepository>,
    pub identity: Arc<dyn IdentityVerifier>,
    pub sessions: SessionKeys,
    /// Present when backed by Postgres; reported by `/health`
    pub pool: Option<DatabasePool>,
}

impl AppState {
    /// Repositories over a Postgres pool, Google as identity provider
    pub fn postgres(config: AppConfig, pool: DatabasePool) -> Result<Self, JwtError> {
        let sessions = SessionKeys::new(&config.security.jwt_secret, config.security.jwt_expiry_hours)?;
        let identity = GoogleIdentityVerifier::new(config.google.client_id.clone());

        Ok(Self {
            config: Arc::new(config),
            posts: Arc::new(PgBlogPostRepository::new(pool.clone())),
            events: Arc::new(PgCalendarEventRepository::new(pool.clone())),
            users: Arc::new(PgUserRepository::new(pool.clone())),
            identity: Arc::new(identity),
            sessions,
            pool: Some(pool),
        })
    }

    /// Every repository served from one in-process store
    pub fn memory(
        config: AppConfig,
        store: MemoryStore,
        identity: Arc<dyn IdentityVerifier>,
    ) -> Result<Self, JwtError> {
        let sessions = SessionKeys::new(&config.security.jwt_secret, config.security.jwt_expiry_hours)?;

        Ok(Self {
            config: Arc::new(config),
            posts: Arc::new(store.clone()),
            events: Arc::new(store.clone()),
            users: Arc::new(store),
            identity,
            sessions,
            pool: None,
        })
    }
}
