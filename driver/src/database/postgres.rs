use std::ops::{Deref, DerefMut};

use error_stack::ResultExt;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgConnection, Pool, Postgres};

use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::KernelError;

use crate::error::ConvertError;
use crate::{env, env_or};

pub use self::{author::*, book::*, genre::*, review::*};

mod author;
mod book;
mod genre;
mod review;

static POSTGRES_URL: &str = "POSTGRES_URL";
static POSTGRES_MAX_CONNECTIONS: &str = "POSTGRES_MAX_CONNECTIONS";
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

#[derive(Clone)]
pub struct PostgresDatabase {
    pool: Pool<Postgres>,
}

impl PostgresDatabase {
    pub async fn new() -> error_stack::Result<Self, KernelError> {
        let url = env(POSTGRES_URL)?;
        let max_connections = env_or(POSTGRES_MAX_CONNECTIONS, DEFAULT_MAX_CONNECTIONS)?;
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(&url)
            .await
            .convert_error()
            .attach_printable("Failed to connect postgres")?;
        tracing::info!(max_connections, "Connected to postgres");
        Ok(Self { pool })
    }

    /// Applies the migrations embedded from `driver/migrations`.
    pub async fn migrate(&self) -> error_stack::Result<(), KernelError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .change_context_lazy(|| KernelError::Internal)
            .attach_printable("Failed to apply migrations")?;
        tracing::info!("Postgres migrations applied");
        Ok(())
    }
}

#[async_trait::async_trait]
impl DatabaseConnection for PostgresDatabase {
    type Transaction = PostgresTransaction;
    async fn transact(&self) -> error_stack::Result<Self::Transaction, KernelError> {
        let con = self.pool.begin().await.convert_error()?;
        Ok(PostgresTransaction(con))
    }
}

/// Rolled back on drop unless committed.
pub struct PostgresTransaction(sqlx::Transaction<'static, Postgres>);

#[async_trait::async_trait]
impl Transaction for PostgresTransaction {
    async fn commit(self) -> error_stack::Result<(), KernelError> {
        self.0.commit().await.convert_error()
    }

    async fn roll_back(self) -> error_stack::Result<(), KernelError> {
        self.0.rollback().await.convert_error()
    }
}

impl Deref for PostgresTransaction {
    type Target = PgConnection;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for PostgresTransaction {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}
