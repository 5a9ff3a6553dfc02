pub mod post_repo;
pub mod user_repo;

pub use post_repo::{PgPostStore, PostStore};
pub use user_repo::{PgUserStore, UserStore};

#[cfg(test)]
pub use post_repo::MockPostStore;
#[cfg(test)]
pub use user_repo::MockUserStore;

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(300))
        .connect(database_url)
        .await
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../migrations").run(pool).await
}
