//! PostgreSQL gateway: connection pool plus the shared prepared insert
//!
//! Both are created once at startup. Failing to connect or to prepare the
//! statement is reported as a [`StartupError`]; the binary treats it as fatal.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode, PgStatement, PgTypeInfo};
use sqlx::{Executor, PgPool, Postgres, Statement, Type};

use super::gateway::{BatchTransaction, DbError, Gateway};
use crate::models::Transaction;

/// Insert issued once per record, columns in this exact order.
pub const INSERT_SQL: &str =
    "INSERT INTO transaction (customer, quantity, price, timestamp) VALUES ($1, $2, $3, $4)";

/// Default maximum connections for the pool.
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Connection settings for the destination database.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub max_connections: u32,
    /// Full `postgres://` URL; when set it wins over the individual fields.
    pub url: Option<String>,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: "postgres".to_string(),
            database: "bulkinsert".to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            url: None,
        }
    }
}

impl DbConfig {
    /// Configuration that connects through a single URL.
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    /// Build sqlx connect options, TLS disabled unless the URL asks for it.
    pub fn connect_options(&self) -> Result<PgConnectOptions, StartupError> {
        match &self.url {
            Some(url) => url.parse().map_err(StartupError::InvalidUrl),
            None => Ok(PgConnectOptions::new()
                .host(&self.host)
                .port(self.port)
                .username(&self.user)
                .password(&self.password)
                .database(&self.database)
                .ssl_mode(PgSslMode::Disable)),
        }
    }
}

/// Startup failure, before any request is served.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("invalid database URL: {0}")]
    InvalidUrl(#[source] sqlx::Error),

    #[error("failed to connect to database: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("failed to prepare insert statement: {0}")]
    Prepare(#[source] sqlx::Error),
}

/// Parameter types declared for [`INSERT_SQL`], matching what [`PgBatch::insert`] binds.
fn insert_param_types() -> [PgTypeInfo; 4] {
    [
        <String as Type<Postgres>>::type_info(),
        <i64 as Type<Postgres>>::type_info(),
        <f64 as Type<Postgres>>::type_info(),
        <String as Type<Postgres>>::type_info(),
    ]
}

/// Pool and prepared insert shared by all requests.
///
/// sqlx caches the statement per physical connection and prepares it again
/// on first use of any other pooled connection.
#[derive(Clone)]
pub struct PgGateway {
    pool: PgPool,
    statement: Arc<PgStatement<'static>>,
}

impl PgGateway {
    /// Open the pool and prepare the insert.
    pub async fn connect(config: &DbConfig) -> Result<Self, StartupError> {
        let options = config.connect_options()?;
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await
            .map_err(StartupError::Connect)?;

        Self::prepare(pool).await
    }

    /// Prepare the insert on an existing pool.
    pub async fn prepare(pool: PgPool) -> Result<Self, StartupError> {
        let mut conn = pool.acquire().await.map_err(StartupError::Connect)?;
        let params = insert_param_types();
        let statement = (&mut *conn)
            .prepare_with(INSERT_SQL, &params)
            .await
            .map_err(StartupError::Prepare)?;
        drop(conn);

        tracing::info!("Prepared insert statement");
        Ok(Self {
            pool,
            statement: Arc::new(statement),
        })
    }

    /// Close every pooled connection. Waits for checked-out connections.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Database pool closed");
    }
}

#[async_trait]
impl Gateway for PgGateway {
    async fn begin(&self) -> Result<Box<dyn BatchTransaction>, DbError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgBatch {
            tx,
            statement: Arc::clone(&self.statement),
        }))
    }
}

/// A live PostgreSQL transaction.
struct PgBatch {
    tx: sqlx::Transaction<'static, Postgres>,
    statement: Arc<PgStatement<'static>>,
}

#[async_trait]
impl BatchTransaction for PgBatch {
    async fn insert(&mut self, record: &Transaction) -> Result<(), DbError> {
        self.statement
            .query()
            .bind(record.customer.as_str())
            .bind(record.quantity)
            .bind(record.price)
            .bind(record.timestamp.as_str())
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), DbError> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), DbError> {
        self.tx.rollback().await?;
        Ok(())
    }
}
