//! [`Team`]-related [`Database`] implementations.

use common::operations::{By, Select};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::User;
use crate::{
    domain::{team, user, Team},
    infra::{
        database::{self, Postgres},
        Database,
    },
    read,
};

impl
    Database<
        Select<By<Option<read::team::Membership>, (team::Id, user::Id)>>,
    > for Postgres
{
    type Ok = Option<read::team::Membership>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Option<read::team::Membership>, (team::Id, user::Id)>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let (team_id, user_id) = by.into_inner();

        const SQL: &str = "\
            SELECT t.id, t.team_email, m.role \
            FROM team_members m \
            INNER JOIN teams t ON t.id = m.team_id \
            WHERE m.team_id = $1::UUID \
              AND m.user_id = $2::UUID \
            LIMIT 1";
        Ok(self
            .connection()
            .await
            .map_err(tracerr::wrap!())?
            .query_opt(SQL, &[&team_id, &user_id])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| read::team::Membership {
                team: Team {
                    id: row.get("id"),
                    team_email: row.get("team_email"),
                },
                role: row.get("role"),
            }))
    }
}
