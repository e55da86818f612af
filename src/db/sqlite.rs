use crate::db::schema::SQLITE_INIT;
use crate::error::RollcallError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite, SqliteConnection, Transaction};
use std::str::FromStr;
use tracing::info;

pub type SqlitePool = Pool<Sqlite>;
pub type SqliteTx = Transaction<'static, Sqlite>;

/// Handle to the record store. Cheap to clone; all clones share one pool.
#[derive(Clone)]
pub struct Storage {
    pool: SqlitePool,
}

impl Storage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if needed) the database at `database_url` and apply the schema.
    pub async fn connect(database_url: &str) -> Result<Self, RollcallError> {
        let connect_opts = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new().connect_with(connect_opts).await?;
        let storage = Self::new(pool);
        storage.init_schema().await?;
        info!(database_url, "record store ready");
        Ok(storage)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Start the single transaction a request works in.
    /// Dropping it without `commit` rolls everything back.
    pub async fn begin(&self) -> Result<SqliteTx, RollcallError> {
        Ok(self.pool.begin().await?)
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), RollcallError> {
        // execute multiple statements safely (SQLite supports multi-commands but sqlx::query doesn't)
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }
}

/// Fail with `NotFound` unless `table` has a row with `id`.
pub(crate) async fn ensure_exists(
    conn: &mut SqliteConnection,
    table: &'static str,
    entity: &str,
    id: i64,
) -> Result<(), RollcallError> {
    let sql = format!("SELECT 1 FROM {table} WHERE id = ?");
    let found: Option<(i64,)> = sqlx::query_as(&sql).bind(id).fetch_optional(conn).await?;
    match found {
        Some(_) => Ok(()),
        None => Err(RollcallError::not_found(entity, id)),
    }
}
