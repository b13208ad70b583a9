//! GraphQL [`Query`]s definitions.

use itertools::Itertools as _;
use juniper::graphql_object;
use service::{
    query,
    read::distribution::{list, Predicate},
    Query as _,
};

use crate::{
    api::{
        self,
        distribution::list::{OrderColumn, OrderDirection},
    },
    define_error, AsError, Context, Error,
};

/// Root of all GraphQL queries.
#[derive(Clone, Copy, Debug)]
pub struct Query;

impl Query {
    /// Name of the [`tracing::Span`] for the queries.
    pub(crate) const SPAN_NAME: &'static str = "GraphQL query";

    /// Finds the page of `Distribution`s visible to the current `User` in the
    /// requested scope.
    async fn find(
        team_id: Option<api::team::Id>,
        page: Option<i32>,
        per_page: Option<i32>,
        order_by: list::OrderBy,
        filter: list::Filter,
        ctx: &Context,
    ) -> Result<api::distribution::list::Page, Error> {
        let arguments = list::Arguments::new(page, per_page)
            .ok_or_else(|| api::PaginationError::InvalidPerPage.into())
            .map_err(ctx.error())?;

        let my_id = ctx.current_session().await?.user_id;
        ctx.service()
            .execute(query::distributions::Find {
                user_id: my_id.into(),
                team_id: team_id.map(Into::into),
                arguments,
                order_by,
                filter,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}

#[graphql_object(context = Context)]
impl Query {
    /// Fetches the page of `Distribution`s visible to the current `User`.
    ///
    /// Personal `Distribution`s are returned unless `teamId` is specified, in
    /// which case the `Distribution`s of that `Team` are returned (including
    /// the ones owned by its shared inbox `User`).
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_PAGINATION` - `perPage` is not positive;
    /// - `INVALID_PERIOD` - `period` is not one of `""`, `"7d"`, `"14d"` or
    ///                      `"30d"`;
    /// - `TEAM_NOT_EXISTS` - the `Team` with the specified ID does not exist
    ///                       or the current `User` is not its member.
    #[expect(clippy::too_many_arguments, reason = "GraphQL arguments")]
    #[tracing::instrument(
        skip_all,
        fields(
            direction = ?direction,
            gql.name = "distributions",
            order_by = ?order_by,
            otel.name = Self::SPAN_NAME,
            page = ?page,
            per_page = ?per_page,
            period = ?period,
            platform_ids = ?platform_ids,
            query = ?query,
            team_id = ?team_id,
            territory_ids = ?territory_ids,
        ),
    )]
    pub async fn distributions(
        page: Option<i32>,
        per_page: Option<i32>,
        order_by: Option<OrderColumn>,
        direction: Option<OrderDirection>,
        query: Option<String>,
        period: Option<String>,
        platform_ids: Option<Vec<i32>>,
        territory_ids: Option<Vec<i32>>,
        team_id: Option<api::team::Id>,
        ctx: &Context,
    ) -> Result<api::distribution::list::Page, Error> {
        let period = period
            .as_deref()
            .unwrap_or_default()
            .parse::<list::Period>()
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;

        let filter = list::Filter {
            query: query.and_then(list::SearchQuery::new),
            period,
            platform_ids: platform_ids
                .into_iter()
                .flatten()
                .map(Into::into)
                .collect(),
            territory_ids: territory_ids
                .into_iter()
                .flatten()
                .map(Into::into)
                .collect(),
            extra: None,
        };
        let order_by = list::OrderBy {
            column: order_by.map(Into::into).unwrap_or_default(),
            order: direction.map(Into::into).unwrap_or_default(),
        };

        Self::find(team_id, page, per_page, order_by, filter, ctx).await
    }

    /// Returns the `Distribution` with the specified ID, if it's visible to
    /// the current `User` in the requested scope.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `DISTRIBUTION_NOT_EXISTS` - the `Distribution` with the specified ID
    ///                               does not exist or is not visible;
    /// - `TEAM_NOT_EXISTS` - the `Team` with the specified ID does not exist
    ///                       or the current `User` is not its member.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "distribution",
            id = %id,
            otel.name = Self::SPAN_NAME,
            team_id = ?team_id,
        ),
    )]
    pub async fn distribution(
        id: api::distribution::Id,
        team_id: Option<api::team::Id>,
        ctx: &Context,
    ) -> Result<api::Distribution, Error> {
        let filter = list::Filter {
            extra: Some(Predicate::IdIs(id.into())),
            ..list::Filter::default()
        };

        list::Page::from(
            Self::find(
                team_id,
                Some(1),
                Some(1),
                list::OrderBy::default(),
                filter,
                ctx,
            )
            .await?,
        )
        .data
        .into_iter()
        .exactly_one()
        .map(Into::into)
        .map_err(|_| DistributionError::NotExists.into())
        .map_err(ctx.error())
    }

    /// Returns the `Team` with the specified ID the current `User` is a
    /// member of.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `TEAM_NOT_EXISTS` - the `Team` with the specified ID does not exist
    ///                       or the current `User` is not its member.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "team",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn team(
        id: api::team::Id,
        ctx: &Context,
    ) -> Result<api::Team, Error> {
        let my_id = ctx.current_session().await?.user_id;
        ctx.service()
            .execute(query::team::Membership::by((id.into(), my_id.into())))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| TeamError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }
}

impl AsError for query::distributions::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::TeamNotFoundOrUnauthorized(_) => {
                Some(TeamError::NotExists.into())
            }
        }
    }
}

define_error! {
    enum DistributionError {
        #[code = "DISTRIBUTION_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Distribution` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum TeamError {
        #[code = "TEAM_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Team` with the specified ID does not exist"]
        NotExists,
    }
}
