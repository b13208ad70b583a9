//! [`Team`]-related definitions.

use derive_more::{Display, From, Into};
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use service::{domain, read};
use uuid::Uuid;

use crate::{api, Context};

/// A [`Team`] the current `User` is a member of.
#[derive(Clone, Debug, From, Into)]
pub struct Team(read::team::Membership);

/// A `Team` the current `User` is a member of.
#[graphql_object(context = Context)]
impl Team {
    /// Unique identifier of this `Team`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Team.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.0.team.id.into()
    }

    /// Shared inbox email of this `Team`.
    ///
    /// Distributions owned by the `User` with this email are visible to every
    /// member of this `Team`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Team.teamEmail",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn team_email(&self) -> Option<String> {
        self.0.team.team_email.as_ref().map(ToString::to_string)
    }

    /// Role of the current `User` in this `Team`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Team.role",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn role(&self) -> Role {
        self.0.role.into()
    }
}

/// ID of a `Team`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::team::Id)]
#[into(domain::team::Id)]
#[graphql(name = "TeamId", transparent)]
pub struct Id(Uuid);

/// Role of a `User` in a `Team`.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "TeamRole")]
pub enum Role {
    /// Owner of the `Team`.
    Owner,

    /// Administrator managing the `Team` members.
    Admin,

    /// Regular member of the `Team`.
    Member,
}

impl From<domain::team::Role> for Role {
    fn from(role: domain::team::Role) -> Self {
        use domain::team::Role as R;
        match role {
            R::Owner => Self::Owner,
            R::Admin => Self::Admin,
            R::Member => Self::Member,
        }
    }
}
