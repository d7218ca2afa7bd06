//! Application state - the ports every handler is given.

use std::sync::Arc;

use quill_core::ports::{
    CommentRepository, LikeRepository, PasswordService, PostRepository, TokenService,
    UserRepository,
};
use quill_infra::{Argon2PasswordService, InMemoryStore, JwtTokenService};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub likes: Arc<dyn LikeRepository>,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
    pub staff_emails: Arc<Vec<String>>,
    /// Name of the storage backend, reported by the health check.
    pub storage: &'static str,
}

impl AppState {
    /// Build the application state, falling back to in-memory storage when
    /// no database is configured or reachable.
    pub async fn new(config: &AppConfig) -> Self {
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.jwt.clone()));
        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());

        #[cfg(feature = "postgres")]
        let state = match &config.database {
            Some(db_config) => match quill_infra::database::connect(db_config).await {
                Ok(conn) => Self::postgres(conn, tokens, passwords),
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                    Self::in_memory(tokens, passwords)
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                Self::in_memory(tokens, passwords)
            }
        };

        #[cfg(not(feature = "postgres"))]
        let state = {
            tracing::info!("Running without postgres feature - using in-memory repositories");
            Self::in_memory(tokens, passwords)
        };

        tracing::info!(storage = state.storage, "Application state initialized");

        state.with_staff_emails(config.staff_emails.clone())
    }

    /// State backed by a single in-memory store.
    pub fn in_memory(tokens: Arc<dyn TokenService>, passwords: Arc<dyn PasswordService>) -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self {
            users: store.clone(),
            posts: store.clone(),
            comments: store.clone(),
            likes: store,
            tokens,
            passwords,
            staff_emails: Arc::new(Vec::new()),
            storage: "memory",
        }
    }

    #[cfg(feature = "postgres")]
    fn postgres(
        conn: quill_infra::database::DbConn,
        tokens: Arc<dyn TokenService>,
        passwords: Arc<dyn PasswordService>,
    ) -> Self {
        use quill_infra::{
            PostgresCommentRepository, PostgresLikeRepository, PostgresPostRepository,
            PostgresUserRepository,
        };

        Self {
            users: Arc::new(PostgresUserRepository::new(conn.clone())),
            posts: Arc::new(PostgresPostRepository::new(conn.clone())),
            comments: Arc::new(PostgresCommentRepository::new(conn.clone())),
            likes: Arc::new(PostgresLikeRepository::new(conn)),
            tokens,
            passwords,
            staff_emails: Arc::new(Vec::new()),
            storage: "postgres",
        }
    }

    pub fn with_staff_emails(mut self, emails: Vec<String>) -> Self {
        self.staff_emails = Arc::new(emails);
        self
    }

    pub fn is_staff_email(&self, email: &str) -> bool {
        let email = email.to_lowercase();
        self.staff_emails.iter().any(|staff| *staff == email)
    }
}
