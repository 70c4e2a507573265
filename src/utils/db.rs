use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgSslMode};
use crate::core::domain::DatabaseConfig;
use crate::core::library::{LibraryError, LibraryResult};

// helper method to build a postgres pool, connecting eagerly so a bad config fails at startup
pub async fn build_db_pool(config: &DatabaseConfig) -> LibraryResult<PgPool> {
    let options = PgConnectOptions::new()
        .host(config.host.as_str())
        .port(config.port)
        .username(config.user.as_str())
        .password(config.password.as_str())
        .database(config.name.as_str())
        .ssl_mode(PgSslMode::Disable);

    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.connect_timeout)
        .connect_with(options)
        .await
        .map_err(|err| {
            let (retryable, reason) = classify_sqlx_error(&err);
            LibraryError::unavailable(format!("failed to connect to {}:{}/{} due to {}",
                                              config.host, config.port, config.name, err).as_str(), reason, retryable)
        })
}

pub async fn create_table(pool: &PgPool, table_name: &str) -> LibraryResult<()> {
    let ddl = format!(
        "CREATE TABLE IF NOT EXISTS {} (
            id BIGSERIAL PRIMARY KEY,
            title TEXT NOT NULL DEFAULT '',
            isbn TEXT NOT NULL DEFAULT '',
            author TEXT NOT NULL DEFAULT '',
            year BIGINT NOT NULL DEFAULT 0
        )", table_name);
    sqlx::query(ddl.as_str())
        .execute(pool)
        .await
        .map(|_| ())
        .map_err(|err| {
            let (retryable, reason) = classify_sqlx_error(&err);
            LibraryError::unavailable(format!("failed to create {} table due to {}",
                                              table_name, err).as_str(), reason, retryable)
        })
}

pub async fn drop_table(pool: &PgPool, table_name: &str) -> LibraryResult<()> {
    sqlx::query(format!("DROP TABLE IF EXISTS {}", table_name).as_str())
        .execute(pool)
        .await
        .map(|_| ())
        .map_err(LibraryError::from)
}

impl From<sqlx::Error> for LibraryError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => {
                LibraryError::not_found("book not found")
            }
            other => {
                let (retryable, reason) = classify_sqlx_error(&other);
                LibraryError::unavailable(format!("postgres error {}", other).as_str(), reason, retryable)
            }
        }
    }
}

// connection level failures are worth retrying, statement level failures are not
fn classify_sqlx_error(err: &sqlx::Error) -> (bool, Option<String>) {
    match err {
        sqlx::Error::PoolTimedOut => { (true, Some("PoolTimedOut".to_string())) }
        sqlx::Error::PoolClosed => { (false, Some("PoolClosed".to_string())) }
        sqlx::Error::Io(_) => { (true, Some("Io".to_string())) }
        sqlx::Error::Tls(_) => { (false, Some("Tls".to_string())) }
        sqlx::Error::WorkerCrashed => { (true, Some("WorkerCrashed".to_string())) }
        sqlx::Error::Database(db_err) => {
            (false, db_err.code().map(|code| code.to_string()))
        }
        _ => { (false, None) }
    }
}
