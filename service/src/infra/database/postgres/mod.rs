//! Postgres [`Database`] implementation.

pub mod connection;
mod impls;
mod like_pattern;
mod predicate;

use deadpool_postgres::Runtime;
use derive_more::{Display, Error as StdError, From};
use tokio_postgres::NoTls;
use tracerr::Traced;

use crate::infra::database;
#[cfg(doc)]
use crate::infra::Database;

pub use refinery::embed_migrations;

pub use self::{connection::Connection, like_pattern::LikePattern};

pub use deadpool_postgres::{Config, PoolConfig};

/// Postgres [`Database`] client.
///
/// Every operation checks out its own connection from the
/// [`connection::Pool`], so independent operations run in parallel.
#[derive(Clone, Debug)]
pub struct Postgres {
    /// [`connection::Pool`] to check connections out from.
    pool: connection::Pool,
}

impl Postgres {
    /// Creates a new [`Postgres`] client with the provided [`Config`].
    ///
    /// # Errors
    ///
    /// If failed to create a new [`connection::Pool`].
    pub fn new(conf: &Config) -> Result<Self, Traced<database::Error>> {
        let pool = conf
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;
        Ok(Self { pool })
    }

    /// Checks out a [`Connection`] from the [`connection::Pool`].
    ///
    /// # Errors
    ///
    /// If the [`connection::Pool`] failed to provide a [`Connection`].
    pub async fn connection(
        &self,
    ) -> Result<Connection, Traced<database::Error>> {
        self.pool
            .get()
            .await
            .map(Connection)
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)
    }
}

/// Postgres database [`Error`].
#[derive(Debug, Display, StdError, From)]
pub enum Error {
    /// Error of running a statement over a [`Connection`].
    #[display("`Connection` error: {_0}")]
    Connection(connection::Error),

    /// Error of creating a new [`connection::Pool`].
    #[display("Failed to create a new `connection::Pool`: {_0}")]
    PoolCreationError(connection::PoolCreationError),

    /// [`connection::Pool`] error.
    #[display("`connection::Pool` error: {_0}")]
    PoolError(connection::PoolError),
}
