use super::{DbConnection, DbPool};
use anyhow::{Result, anyhow};
use diesel::PgConnection;
use diesel::r2d2::ConnectionManager;
use once_cell::sync::OnceCell;

static DB_POOL: OnceCell<DbPool> = OnceCell::new();

/// Build the process-wide connection pool. Called once at startup with the
/// URL from `Config`; later calls are no-ops.
pub fn init_pool(database_url: &str) -> Result<()> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);

    let pool = diesel::r2d2::Pool::builder()
        .max_size(5)
        .build(manager)
        .map_err(|e| anyhow!("Failed to create database pool: {}", e))?;

    let _ = DB_POOL.set(pool);
    Ok(())
}

pub fn get_connection() -> Result<DbConnection> {
    let pool = DB_POOL
        .get()
        .ok_or_else(|| anyhow!("Database pool is not initialized"))?;

    pool.get()
        .map_err(|e| anyhow!("Failed to get a connection from the pool: {}", e))
}
