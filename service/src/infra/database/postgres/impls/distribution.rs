//! [`Distribution`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::operations::{By, Select};
use futures::future;
use tracerr::Traced;

use crate::{
    domain::{distribution, Distribution, Platform, Territory},
    infra::{
        database::{
            self,
            postgres::predicate::{self, Params},
            Postgres,
        },
        Database,
    },
    read::distribution::{list, Predicate},
};

impl Database<Select<By<Vec<Distribution>, list::Selector>>> for Postgres {
    type Ok = Vec<Distribution>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Distribution>, list::Selector>>,
    ) -> Result<Self::Ok, Self::Err> {
        let list::Selector {
            arguments,
            order_by,
            filter,
        } = by.into_inner();

        let mut params = Params::default();
        let limit = params.push(i64::from(arguments.per_page()));
        let offset = params
            .push(i64::try_from(arguments.offset()).unwrap_or(i64::MAX));
        let sql = format!(
            "SELECT d.id, \
                    d.project_name, d.isrc, d.marketing_owner, d.name, \
                    d.catalog_number, d.catalog_title, d.income_type, \
                    d.content, d.user_id, d.team_id, d.created_at \
             FROM distributions d \
             WHERE {filter} \
             ORDER BY d.{column} {order} NULLS LAST, \
                      d.id ASC \
             LIMIT ${limit}::INT8 \
             OFFSET ${offset}::INT8",
            filter = predicate::render(&filter, &mut params),
            column = order_by.column,
            order = order_by.order.sql(),
        );

        let conn = self.connection().await.map_err(tracerr::wrap!())?;
        let rows = conn
            .query(&sql, &params.refs())
            .await
            .map_err(tracerr::wrap!())?;
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let ids = rows
            .iter()
            .map(|row| row.get("id"))
            .collect::<Vec<distribution::Id>>();

        const PLATFORMS_SQL: &str = "\
            SELECT dp.distribution_id, p.id, p.name \
            FROM distribution_platforms dp \
            INNER JOIN platforms p ON p.id = dp.platform_id \
            WHERE dp.distribution_id = ANY($1::UUID[]) \
            ORDER BY p.id ASC";
        const TERRITORIES_SQL: &str = "\
            SELECT dt.distribution_id, t.id, t.name \
            FROM distribution_territories dt \
            INNER JOIN territories t ON t.id = dt.territory_id \
            WHERE dt.distribution_id = ANY($1::UUID[]) \
            ORDER BY t.id ASC";
        let (platform_rows, territory_rows) = future::try_join(
            conn.query(PLATFORMS_SQL, &[&ids]),
            conn.query(TERRITORIES_SQL, &[&ids]),
        )
        .await
        .map_err(tracerr::wrap!())?;

        let mut platforms = HashMap::<distribution::Id, Vec<Platform>>::new();
        for row in platform_rows {
            platforms
                .entry(row.get("distribution_id"))
                .or_default()
                .push(Platform {
                    id: row.get("id"),
                    name: row.get("name"),
                });
        }
        let mut territories =
            HashMap::<distribution::Id, Vec<Territory>>::new();
        for row in territory_rows {
            territories
                .entry(row.get("distribution_id"))
                .or_default()
                .push(Territory {
                    id: row.get("id"),
                    name: row.get("name"),
                });
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let id = row.get("id");
                Distribution {
                    id,
                    project_name: row.get("project_name"),
                    isrc: row.get("isrc"),
                    marketing_owner: row.get("marketing_owner"),
                    name: row.get("name"),
                    catalog_number: row.get("catalog_number"),
                    catalog_title: row.get("catalog_title"),
                    income_type: row.get("income_type"),
                    content: row.get("content"),
                    user_id: row.get("user_id"),
                    team_id: row.get("team_id"),
                    platforms: platforms.remove(&id).unwrap_or_default(),
                    territories: territories.remove(&id).unwrap_or_default(),
                    created_at: row.get("created_at"),
                }
            })
            .collect())
    }
}

impl Database<Select<By<list::TotalCount, Predicate>>> for Postgres {
    type Ok = list::TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<list::TotalCount, Predicate>>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut params = Params::default();
        let sql = format!(
            "SELECT COUNT(*) \
             FROM distributions d \
             WHERE {}",
            predicate::render(by.inner(), &mut params),
        );

        let count = self
            .connection()
            .await
            .map_err(tracerr::wrap!())?
            .query_one(&sql, &params.refs())
            .await
            .map_err(tracerr::wrap!())?
            .get::<_, i64>(0);
        Ok(u64::try_from(count).unwrap_or_default().into())
    }
}
