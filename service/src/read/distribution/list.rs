//! [`Distribution`] list definitions.

use std::{str::FromStr, time::Duration};

use common::{define_pagination, DateTime};
use derive_more::{AsRef, Display, Error, From, Into};

use crate::domain::{distribution, platform, team, territory, user, Distribution};
#[cfg(doc)]
use crate::domain::{Team, User};

use super::{Predicate, TextField};

define_pagination!(Distribution, Column, Predicate);

/// Column a [`Distribution`] list can be ordered by.
///
/// [`Distribution::content`] is not orderable.
#[derive(Clone, Copy, Debug, Default, Display, Eq, Hash, PartialEq)]
pub enum Column {
    /// [`Distribution::id`].
    #[default]
    #[display("id")]
    Id,

    /// [`Distribution::project_name`].
    #[display("project_name")]
    ProjectName,

    /// [`Distribution::isrc`].
    #[display("isrc")]
    Isrc,

    /// [`Distribution::marketing_owner`].
    #[display("marketing_owner")]
    MarketingOwner,

    /// [`Distribution::name`].
    #[display("name")]
    Name,

    /// [`Distribution::catalog_number`].
    #[display("catalog_number")]
    CatalogNumber,

    /// [`Distribution::catalog_title`].
    #[display("catalog_title")]
    CatalogTitle,

    /// [`Distribution::income_type`].
    #[display("income_type")]
    IncomeType,

    /// [`Distribution::user_id`].
    #[display("user_id")]
    UserId,

    /// [`Distribution::team_id`].
    #[display("team_id")]
    TeamId,

    /// [`Distribution::created_at`].
    #[display("created_at")]
    CreatedAt,
}

impl Column {
    /// Returns the [`TextField`] this [`Column`] represents, if it's a textual
    /// one.
    #[must_use]
    pub const fn text_field(self) -> Option<TextField> {
        Some(match self {
            Self::ProjectName => TextField::ProjectName,
            Self::Isrc => TextField::Isrc,
            Self::MarketingOwner => TextField::MarketingOwner,
            Self::Name => TextField::Name,
            Self::CatalogNumber => TextField::CatalogNumber,
            Self::CatalogTitle => TextField::CatalogTitle,
            Self::IncomeType => TextField::IncomeType,
            Self::Id | Self::UserId | Self::TeamId | Self::CreatedAt => {
                return None
            }
        })
    }
}

/// Period of time a [`Distribution`] list is narrowed to, counting back from
/// the start of the day.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Period {
    /// No narrowing.
    #[default]
    All,

    /// Last 7 days.
    Week,

    /// Last 14 days.
    Fortnight,

    /// Last 30 days.
    Month,
}

impl Period {
    /// Returns the number of days this [`Period`] spans, if limited.
    const fn days(self) -> Option<u32> {
        match self {
            Self::All => None,
            Self::Week => Some(7),
            Self::Fortnight => Some(14),
            Self::Month => Some(30),
        }
    }

    /// Returns the earliest creation [`DateTime`] this [`Period`] allows,
    /// counting from the provided `now`.
    #[must_use]
    pub fn since(self, now: DateTime) -> Option<distribution::CreationDateTime> {
        const DAY: Duration = Duration::from_secs(24 * 60 * 60);

        let days = self.days()?;
        Some((now - DAY * days).start_of_day().coerce())
    }
}

impl FromStr for Period {
    type Err = InvalidPeriod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "" => Self::All,
            "7d" => Self::Week,
            "14d" => Self::Fortnight,
            "30d" => Self::Month,
            _ => return Err(InvalidPeriod(s.to_owned())),
        })
    }
}

/// Error of parsing an unsupported [`Period`].
#[derive(Clone, Debug, Display, Error)]
#[display("Unsupported period `{_0}`, expected one of: '', '7d', '14d', '30d'")]
pub struct InvalidPeriod(#[error(not(source))] String);

/// Free-text query searched in every [`TextField`] of a [`Distribution`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str)]
pub struct SearchQuery(String);

impl SearchQuery {
    /// Creates a new [`SearchQuery`] out of the provided `query` as is.
    ///
    /// [`None`] is returned if the `query` is blank.
    #[must_use]
    pub fn new(query: impl AsRef<str>) -> Option<Self> {
        let query = query.as_ref();
        (!query.trim().is_empty()).then(|| Self(query.to_owned()))
    }

    /// Returns a [`Predicate`] matching [`Distribution`]s containing this
    /// [`SearchQuery`] in any of their [`TextField`]s.
    #[must_use]
    pub fn predicate(&self) -> Predicate {
        Predicate::or(
            TextField::ALL.map(|f| Predicate::Contains(f, self.0.clone())),
        )
    }
}

/// Tenant scope a [`Distribution`] list is visible in.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Scope {
    /// Personal [`Distribution`]s of a [`User`], not owned by any [`Team`].
    Personal(user::Id),

    /// [`Distribution`]s of a [`Team`].
    Team {
        /// ID of the [`Team`].
        id: team::Id,

        /// Shared inbox of the [`Team`], if configured.
        email: Option<user::Email>,
    },
}

impl Scope {
    /// Returns a [`Predicate`] matching [`Distribution`]s visible in this
    /// [`Scope`].
    #[must_use]
    pub fn predicate(&self) -> Predicate {
        match self {
            Self::Personal(user_id) => Predicate::and([
                Predicate::OwnedBy(*user_id),
                Predicate::TeamIs(None),
            ]),
            Self::Team { id, email: None } => Predicate::TeamIs(Some(*id)),
            Self::Team {
                id,
                email: Some(email),
            } => Predicate::or([
                Predicate::TeamIs(Some(*id)),
                Predicate::OwnerEmailIs(email.clone()),
            ]),
        }
    }
}

/// Filter of a [`Distribution`] list.
#[derive(Clone, Debug, Default)]
pub struct Filter {
    /// [`SearchQuery`] to look for, if any.
    pub query: Option<SearchQuery>,

    /// [`Period`] to narrow the creation time to.
    pub period: Period,

    /// IDs of [`platform::Platform`]s at least one of which should be
    /// associated.
    pub platform_ids: Vec<platform::Id>,

    /// IDs of [`territory::Territory`]s at least one of which should be
    /// associated.
    pub territory_ids: Vec<territory::Id>,

    /// Additional [`Predicate`] to satisfy.
    pub extra: Option<Predicate>,
}

impl Filter {
    /// Splits this [`Filter`] into named [`Fragments`] visible in the provided
    /// [`Scope`], resolving the [`Period`] against the provided `now`.
    #[must_use]
    pub fn fragments(self, scope: &Scope, now: DateTime) -> Fragments {
        let Self {
            query,
            period,
            platform_ids,
            territory_ids,
            extra,
        } = self;

        Fragments {
            search: query.as_ref().map(SearchQuery::predicate),
            scope: scope.predicate(),
            extra,
            platforms: Predicate::platforms(platform_ids),
            territories: Predicate::territories(territory_ids),
            period: period.since(now).map(Predicate::CreatedSince),
        }
    }
}

/// Named fragments of a [`Distribution`] list [`Predicate`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Fragments {
    /// Free-text search, if any.
    pub search: Option<Predicate>,

    /// Tenant [`Scope`] restriction.
    pub scope: Predicate,

    /// Caller-supplied restriction, if any.
    pub extra: Option<Predicate>,

    /// Platforms facet, if any.
    pub platforms: Option<Predicate>,

    /// Territories facet, if any.
    pub territories: Option<Predicate>,

    /// Creation time lower bound, if any.
    pub period: Option<Predicate>,
}

impl Fragments {
    /// Composes these [`Fragments`] into a single conjunctive [`Predicate`].
    #[must_use]
    pub fn compose(self) -> Predicate {
        let Self {
            search,
            scope,
            extra,
            platforms,
            territories,
            period,
        } = self;

        Predicate::and(
            [search, Some(scope), extra, platforms, territories, period]
                .into_iter()
                .flatten(),
        )
    }
}

/// Total count of [`Distribution`]s matching a [`Predicate`].
#[derive(Clone, Copy, Debug, Eq, From, Hash, Into, PartialEq)]
pub struct TotalCount(u64);
