//! [`Distribution`]-related definitions.

use common::DateTime;
use derive_more::{Display, From, Into};
use juniper::{graphql_object, GraphQLObject, GraphQLScalar};
use service::domain;
use uuid::Uuid;

use crate::{api, Context};

/// A [`Distribution`] statement.
#[derive(Clone, Debug, From, Into)]
pub struct Distribution(domain::Distribution);

/// Converts an optional textual field into a GraphQL string.
fn text(field: Option<&impl AsRef<str>>) -> Option<String> {
    field.map(|f| f.as_ref().to_owned())
}

/// A `Distribution` statement reporting income of a released project.
#[graphql_object(context = Context)]
impl Distribution {
    /// Unique identifier of this `Distribution`.
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// Name of the project this `Distribution` reports on.
    pub fn project_name(&self) -> Option<String> {
        text(self.0.project_name.as_ref())
    }

    /// ISRC of the reported recording.
    pub fn isrc(&self) -> Option<String> {
        text(self.0.isrc.as_ref())
    }

    /// Marketing owner of the reported project.
    pub fn marketing_owner(&self) -> Option<String> {
        text(self.0.marketing_owner.as_ref())
    }

    /// Name of this `Distribution`.
    pub fn name(&self) -> Option<String> {
        text(self.0.name.as_ref())
    }

    /// Catalog number of the reported release.
    pub fn catalog_number(&self) -> Option<String> {
        text(self.0.catalog_number.as_ref())
    }

    /// Catalog title of the reported release.
    pub fn catalog_title(&self) -> Option<String> {
        text(self.0.catalog_title.as_ref())
    }

    /// Type of income this `Distribution` reports.
    pub fn income_type(&self) -> Option<String> {
        text(self.0.income_type.as_ref())
    }

    /// Raw content of the imported statement.
    pub fn content(&self) -> String {
        self.0.content.to_string()
    }

    /// ID of the `User` owning this `Distribution`.
    pub fn user_id(&self) -> api::user::Id {
        self.0.user_id.into()
    }

    /// ID of the `Team` owning this `Distribution`, if any.
    pub fn team_id(&self) -> Option<api::team::Id> {
        self.0.team_id.map(Into::into)
    }

    /// `Platform`s this `Distribution` was distributed to.
    pub fn platforms(&self) -> Vec<Platform> {
        self.0.platforms.iter().cloned().map(Into::into).collect()
    }

    /// `Territory`s this `Distribution` reports income for.
    pub fn territories(&self) -> Vec<Territory> {
        self.0.territories.iter().cloned().map(Into::into).collect()
    }

    /// `DateTime` when this `Distribution` was created.
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }
}

/// ID of a `Distribution`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::distribution::Id)]
#[into(domain::distribution::Id)]
#[graphql(name = "DistributionId", transparent)]
pub struct Id(Uuid);

/// Digital service provider a `Distribution` was distributed to.
#[derive(Clone, Debug, GraphQLObject)]
pub struct Platform {
    /// Unique identifier of this `Platform`.
    pub id: i32,

    /// Name of this `Platform`.
    pub name: String,
}

impl From<domain::Platform> for Platform {
    fn from(platform: domain::Platform) -> Self {
        Self {
            id: platform.id.into(),
            name: platform.name.to_string(),
        }
    }
}

/// Sales territory a `Distribution` reports income for.
#[derive(Clone, Debug, GraphQLObject)]
pub struct Territory {
    /// Unique identifier of this `Territory`.
    pub id: i32,

    /// Name of this `Territory`.
    pub name: String,
}

impl From<domain::Territory> for Territory {
    fn from(territory: domain::Territory) -> Self {
        Self {
            id: territory.id.into(),
            name: territory.name.to_string(),
        }
    }
}

pub mod list {
    //! Definitions related to the [`Distribution`] list.

    use derive_more::{From, Into};
    use juniper::{graphql_object, GraphQLEnum};
    use service::read::distribution::list;

    use crate::{define_error, AsError, Context, Error};

    use super::Distribution;

    /// Page of the [`Distribution`] list.
    #[derive(Clone, Debug, From, Into)]
    pub struct Page(list::Page);

    /// Page of the `Distribution` list.
    #[graphql_object(name = "DistributionPage", context = Context)]
    impl Page {
        /// `Distribution`s on this page.
        pub fn data(&self) -> Vec<Distribution> {
            self.0.data.iter().cloned().map(Into::into).collect()
        }

        /// Total number of `Distribution`s matching the filter, regardless
        /// of pagination.
        pub fn count(&self, ctx: &Context) -> Result<i32, Error> {
            i32::try_from(self.0.count)
                .map_err(AsError::into_error)
                .map_err(ctx.error())
        }

        /// 1-based number of this page.
        pub fn current_page(&self, ctx: &Context) -> Result<i32, Error> {
            i32::try_from(self.0.current_page)
                .map_err(AsError::into_error)
                .map_err(ctx.error())
        }

        /// Maximum number of `Distribution`s on a page.
        pub fn per_page(&self, ctx: &Context) -> Result<i32, Error> {
            i32::try_from(self.0.per_page)
                .map_err(AsError::into_error)
                .map_err(ctx.error())
        }

        /// Total number of pages.
        pub fn total_pages(&self, ctx: &Context) -> Result<i32, Error> {
            i32::try_from(self.0.total_pages)
                .map_err(AsError::into_error)
                .map_err(ctx.error())
        }
    }

    /// Column the `Distribution` list can be ordered by.
    #[derive(Clone, Copy, Debug, GraphQLEnum)]
    #[graphql(name = "DistributionOrderColumn")]
    pub enum OrderColumn {
        /// `Distribution.id`.
        Id,

        /// `Distribution.projectName`.
        ProjectName,

        /// `Distribution.isrc`.
        Isrc,

        /// `Distribution.marketingOwner`.
        MarketingOwner,

        /// `Distribution.name`.
        Name,

        /// `Distribution.catalogNumber`.
        CatalogNumber,

        /// `Distribution.catalogTitle`.
        CatalogTitle,

        /// `Distribution.incomeType`.
        IncomeType,

        /// `Distribution.userId`.
        UserId,

        /// `Distribution.teamId`.
        TeamId,

        /// `Distribution.createdAt`.
        CreatedAt,
    }

    impl From<OrderColumn> for list::Column {
        fn from(column: OrderColumn) -> Self {
            use OrderColumn as C;
            match column {
                C::Id => Self::Id,
                C::ProjectName => Self::ProjectName,
                C::Isrc => Self::Isrc,
                C::MarketingOwner => Self::MarketingOwner,
                C::Name => Self::Name,
                C::CatalogNumber => Self::CatalogNumber,
                C::CatalogTitle => Self::CatalogTitle,
                C::IncomeType => Self::IncomeType,
                C::UserId => Self::UserId,
                C::TeamId => Self::TeamId,
                C::CreatedAt => Self::CreatedAt,
            }
        }
    }

    /// Direction of the `Distribution` list ordering.
    #[derive(Clone, Copy, Debug, GraphQLEnum)]
    #[graphql(name = "OrderDirection")]
    pub enum OrderDirection {
        /// Ascending order.
        Asc,

        /// Descending order.
        Desc,
    }

    impl From<OrderDirection> for common::pagination::Order {
        fn from(direction: OrderDirection) -> Self {
            match direction {
                OrderDirection::Asc => Self::Ascending,
                OrderDirection::Desc => Self::Descending,
            }
        }
    }

    impl AsError for list::InvalidPeriod {
        fn try_as_error(&self) -> Option<Error> {
            define_error! {
                enum Error {
                    #[code = "INVALID_PERIOD"]
                    #[status = BAD_REQUEST]
                    #[message = "`period` must be one of: '', '7d', '14d', \
                                 '30d'"]
                    InvalidPeriod,
                }
            }

            Some(Error::InvalidPeriod.into())
        }
    }
}

#[cfg(test)]
mod spec {
    use common::pagination::Order;
    use service::read::distribution::list::{Column, Period};

    use crate::AsError as _;

    use super::list::{OrderColumn, OrderDirection};

    #[test]
    fn maps_order_to_columns() {
        assert_eq!(Column::from(OrderColumn::Id).to_string(), "id");
        assert_eq!(
            Column::from(OrderColumn::CatalogTitle).to_string(),
            "catalog_title",
        );
        assert_eq!(
            Column::from(OrderColumn::CreatedAt).to_string(),
            "created_at",
        );
        assert_eq!(Order::from(OrderDirection::Asc), Order::Ascending);
        assert_eq!(Order::from(OrderDirection::Desc), Order::Descending);
    }

    #[test]
    fn reports_invalid_period() {
        let err = "1y".parse::<Period>().unwrap_err().into_error();

        assert_eq!(err.code, "INVALID_PERIOD");
        assert_eq!(err.status_code, http::StatusCode::BAD_REQUEST);
    }
}
