//! [`Platform`] definitions.

use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};

/// Digital service provider a statement was distributed to (e.g. a
/// streaming service or a store).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Platform {
    /// ID of this [`Platform`].
    pub id: Id,

    /// [`Name`] of this [`Platform`].
    pub name: Name,
}

/// ID of a [`Platform`].
#[derive(
    Clone,
    Copy,
    Debug,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(i32);

/// Name of a [`Platform`].
#[derive(AsRef, Clone, Debug, Display, Eq, From, PartialEq)]
#[as_ref(str, String)]
#[from(&str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Name(String);
