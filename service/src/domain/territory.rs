//! [`Territory`] definitions.

use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};

/// Sales territory a statement reports income for (usually a
/// country or a region).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Territory {
    /// ID of this [`Territory`].
    pub id: Id,

    /// [`Name`] of this [`Territory`].
    pub name: Name,
}

/// ID of a [`Territory`].
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

/// Name of a [`Territory`].
#[derive(AsRef, Clone, Debug, Display, Eq, From, PartialEq)]
#[as_ref(str, String)]
#[from(&str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Name(String);
