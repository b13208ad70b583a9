//! [`Team`] definitions.

use common::define_kind;
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(doc)]
use crate::domain::User;
use crate::domain::user;

/// Group of [`User`]s sharing distribution statements.
#[derive(Clone, Debug)]
pub struct Team {
    /// ID of this [`Team`].
    pub id: Id,

    /// Shared inbox [`user::Email`] of this [`Team`], if configured.
    ///
    /// Statements owned by the [`User`] with this email are visible to the
    /// whole [`Team`].
    pub team_email: Option<user::Email>,
}

/// ID of a [`Team`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Membership of a [`User`] in a [`Team`].
#[derive(Clone, Copy, Debug)]
pub struct Member {
    /// ID of the [`Team`].
    pub team_id: Id,

    /// ID of the member [`User`].
    pub user_id: user::Id,

    /// [`Role`] of the [`User`] in the [`Team`].
    pub role: Role,
}

define_kind! {
    #[doc = "Role of a `User` in a `Team`."]
    enum Role {
        #[doc = "Owner of the `Team`."]
        Owner = 1,

        #[doc = "Administrator managing the `Team` members."]
        Admin = 2,

        #[doc = "Regular member of the `Team`."]
        Member = 3,
    }
}
