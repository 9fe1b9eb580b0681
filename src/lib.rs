//! Featherpost API
//!
//! A social microposting service: users register, activate their account,
//! authenticate, post short text/image microposts, and read a feed of
//! posts from themselves and the users they follow.

pub mod api;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::AppState;
use domain::micropost::MicropostRepository;
use domain::user::UserRepository;
use infrastructure::{
    Argon2Hasher, InMemoryMicropostRepository, InMemoryUserRepository, MicropostService,
    PostgresMicropostRepository, PostgresUserRepository, TracingNotificationSender, UserService,
};
use tracing::info;

/// Create the application state with all services initialized.
///
/// With a configured database the repositories run on PostgreSQL;
/// otherwise everything lives in memory.
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let (users, microposts): (Arc<dyn UserRepository>, Arc<dyn MicropostRepository>) =
        match &config.database {
            Some(database) => {
                let pool = sqlx::PgPool::connect(&database.url).await?;
                info!("connected to postgres");

                (
                    Arc::new(PostgresUserRepository::new(pool.clone())),
                    Arc::new(PostgresMicropostRepository::new(pool)),
                )
            }
            None => {
                info!("no database configured, using in-memory storage");

                (
                    Arc::new(InMemoryUserRepository::new()),
                    Arc::new(InMemoryMicropostRepository::new()),
                )
            }
        };

    let hasher = Arc::new(Argon2Hasher::new(config.auth.hasher_cost));
    let notifier = Arc::new(TracingNotificationSender::new());

    let user_service = Arc::new(UserService::new(
        users,
        microposts.clone(),
        hasher,
        notifier,
    ));
    let micropost_service = Arc::new(MicropostService::new(microposts));

    Ok(AppState::new(user_service, micropost_service))
}
