pub mod posts;
pub mod users;

use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use anyhow::anyhow;
use deadpool::managed::{HookError, Metrics};
use diesel::{sqlite::SqliteConnection, Connection};
use diesel_async::pooled_connection::deadpool::Hook;
use diesel_async::pooled_connection::{AsyncDieselConnectionManager, PoolError};
use diesel_async::RunQueryDsl;
use diesel_async::sync_connection_wrapper::SyncConnectionWrapper;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tracing::*;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// How long a connection waits on a locked database before giving up, in ms.
pub const BUSY_TIMEOUT_MS: u32 = 5000;

pub type DbConnection = SyncConnectionWrapper<SqliteConnection>;
pub type Pool = diesel_async::pooled_connection::deadpool::Pool<DbConnection>;

/// Marker for services that can be shared across handlers.
pub trait Svc: Clone + Send + Sync + 'static {}

/// Creates the database file if needed, applies pending migrations and builds the pool.
pub async fn connect(database_url: &str, max_size: usize) -> anyhow::Result<Pool> {
    if let Some(parent) = Path::new(database_url).parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    run_migrations(database_url).await?;

    let mgr = AsyncDieselConnectionManager::<DbConnection>::new(database_url);

    info!(database_url, "Starting DB pool");
    let pool = Pool::builder(mgr)
        .max_size(max_size)
        .post_create(Hook::async_fn(set_busy_timeout))
        .runtime(deadpool::Runtime::Tokio1)
        .build()?;

    Ok(pool)
}

type HookFuture<'a> = Pin<Box<dyn Future<Output = Result<(), HookError<PoolError>>> + Send + 'a>>;

// Writers queue on the SQLite lock instead of failing with "database is locked".
fn set_busy_timeout<'a>(conn: &'a mut DbConnection, metrics: &'a Metrics) -> HookFuture<'a> {
    Box::pin(async move {
        diesel::sql_query(format!("PRAGMA busy_timeout = {BUSY_TIMEOUT_MS}"))
            .execute(conn)
            .await
            .map_err(|e| HookError::Backend(PoolError::QueryError(e)))?;
        trace!(?metrics, "Post-create");
        Ok(())
    })
}

async fn run_migrations(database_url: &str) -> anyhow::Result<()> {
    let url = database_url.to_owned();

    tokio::task::spawn_blocking(move || -> anyhow::Result<()> {
        let mut conn = SqliteConnection::establish(&url)?;
        diesel::connection::SimpleConnection::batch_execute(
            &mut conn,
            &format!("PRAGMA busy_timeout = {BUSY_TIMEOUT_MS}"),
        )?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| anyhow!(e))?;
        for version in applied {
            info!(%version, "applied migration");
        }
        Ok(())
    })
    .await?
}

#[cfg(test)]
pub(crate) async fn test_pool() -> (tempfile::TempDir, Pool) {
    let dir = tempfile::tempdir().unwrap();
    let url = dir.path().join("forum.db");
    let pool = connect(url.to_str().unwrap(), 2).await.unwrap();
    (dir, pool)
}
