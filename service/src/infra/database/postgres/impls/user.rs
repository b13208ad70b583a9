//! [`User`]-related [`Database`] implementations.

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    domain::{user, User},
    infra::{
        database::{self, Postgres},
        Database,
    },
};

impl Database<Select<By<Option<User>, user::Id>>> for Postgres {
    type Ok = Option<User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        const SQL: &str = "\
            SELECT id, email \
            FROM users \
            WHERE id = $1::UUID";
        Ok(self
            .connection()
            .await
            .map_err(tracerr::wrap!())?
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| User {
                id: row.get("id"),
                email: row.get("email"),
            }))
    }
}
