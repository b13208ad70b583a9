//! [`Connection`] definitions.

use tokio_postgres::{types::ToSql, Row};
use tracerr::Traced;

use crate::infra::database::{self, postgres};

pub use deadpool_postgres::{
    Client, CreatePoolError as PoolCreationError, Pool, PoolError,
};
pub use tokio_postgres::Error;

/// Connection checked out from a [`Pool`].
///
/// Returned to the [`Pool`] once dropped.
#[derive(Debug)]
pub struct Connection(pub(super) Client);

impl Connection {
    /// Runs the provided `sql` statement and returns all the resulting rows.
    ///
    /// # Errors
    ///
    /// If failed to run the statement.
    pub async fn query(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Vec<Row>, Traced<database::Error>> {
        self.0
            .query(sql, params)
            .await
            .map_err(tracerr::from_and_wrap!(=> postgres::Error))
            .map_err(tracerr::map_from)
    }

    /// Runs the provided `sql` statement expecting exactly one resulting row.
    ///
    /// # Errors
    ///
    /// If failed to run the statement, or it returned not exactly one row.
    pub async fn query_one(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Row, Traced<database::Error>> {
        self.0
            .query_one(sql, params)
            .await
            .map_err(tracerr::from_and_wrap!(=> postgres::Error))
            .map_err(tracerr::map_from)
    }

    /// Runs the provided `sql` statement expecting at most one resulting row.
    ///
    /// # Errors
    ///
    /// If failed to run the statement, or it returned more than one row.
    pub async fn query_opt(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Option<Row>, Traced<database::Error>> {
        self.0
            .query_opt(sql, params)
            .await
            .map_err(tracerr::from_and_wrap!(=> postgres::Error))
            .map_err(tracerr::map_from)
    }
}
