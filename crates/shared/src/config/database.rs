use anyhow::{Context, Result};
use sqlx::{Pool, Postgres, postgres::PgPoolOptions};
use tracing::info;

pub type ConnectionPool = Pool<Postgres>;

pub struct ConnectionManager;

impl ConnectionManager {
    pub async fn new_pool(database_url: &str, run_migrations: bool) -> Result<ConnectionPool> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .context("Failed to connect to the database")?;

        if run_migrations {
            info!("Running database migrations");
            sqlx::migrate!("../../migrations")
                .run(&pool)
                .await
                .context("Failed to run database migrations")?;
        }

        Ok(pool)
    }
}
