//! [`Distribution`] statement definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use uuid::Uuid;

#[cfg(doc)]
use crate::domain::{Team, User};
use crate::domain::{team, user, Platform, Territory};

/// Distribution statement reporting income of a released project.
#[derive(Clone, Debug)]
pub struct Distribution {
    /// ID of this [`Distribution`].
    pub id: Id,

    /// [`ProjectName`] this [`Distribution`] reports on.
    pub project_name: Option<ProjectName>,

    /// [`Isrc`] of the reported recording.
    pub isrc: Option<Isrc>,

    /// [`MarketingOwner`] of the reported project.
    pub marketing_owner: Option<MarketingOwner>,

    /// [`Name`] of this [`Distribution`].
    pub name: Option<Name>,

    /// [`CatalogNumber`] of the reported release.
    pub catalog_number: Option<CatalogNumber>,

    /// [`CatalogTitle`] of the reported release.
    pub catalog_title: Option<CatalogTitle>,

    /// [`IncomeType`] of this [`Distribution`].
    pub income_type: Option<IncomeType>,

    /// Raw [`Content`] of the imported statement.
    pub content: Content,

    /// ID of the [`User`] owning this [`Distribution`].
    pub user_id: user::Id,

    /// ID of the [`Team`] owning this [`Distribution`], if any.
    pub team_id: Option<team::Id>,

    /// [`Platform`]s this [`Distribution`] is associated with.
    pub platforms: Vec<Platform>,

    /// [`Territory`]s this [`Distribution`] is associated with.
    pub territories: Vec<Territory>,

    /// [`DateTime`] when this [`Distribution`] was created.
    pub created_at: CreationDateTime,
}

/// ID of a [`Distribution`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
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
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Defines a free-form text field of a [`Distribution`].
macro_rules! define_text {
    ($($(#[doc = $doc:literal])* $name:ident),* $(,)?) => {$(
        $(#[doc = $doc])*
        #[derive(
            AsRef, Clone, Debug, Display, Eq, From, Hash, Ord, PartialEq,
            PartialOrd,
        )]
        #[as_ref(str, String)]
        #[from(&str, String)]
        #[cfg_attr(
            feature = "postgres",
            derive(FromSql, ToSql),
            postgres(transparent),
        )]
        pub struct $name(String);
    )*};
}

define_text! {
    /// Name of the project a [`Distribution`] reports on.
    ProjectName,

    /// [International Standard Recording Code][1] of a recording.
    ///
    /// Statements are imported as is, so the format is not enforced.
    ///
    /// [1]: https://en.wikipedia.org/wiki/International_Standard_Recording_Code
    Isrc,

    /// Person or label responsible for marketing of a project.
    MarketingOwner,

    /// Name of a [`Distribution`].
    Name,

    /// Catalog number of a release.
    CatalogNumber,

    /// Catalog title of a release.
    CatalogTitle,

    /// Type of income reported by a [`Distribution`] (streaming, download,
    /// sync, etc).
    IncomeType,

    /// Raw content of an imported statement.
    Content,
}

/// [`DateTime`] when a [`Distribution`] was created.
pub type CreationDateTime = DateTimeOf<(Distribution, unit::Creation)>;

#[cfg(test)]
impl Distribution {
    /// Creates a personal [`Distribution`] of the provided [`User`] with no
    /// text fields and associations, created right now.
    pub(crate) fn fixture(user_id: user::Id) -> Self {
        Self {
            id: Id::new(),
            project_name: None,
            isrc: None,
            marketing_owner: None,
            name: None,
            catalog_number: None,
            catalog_title: None,
            income_type: None,
            content: "{}".into(),
            user_id,
            team_id: None,
            platforms: Vec::new(),
            territories: Vec::new(),
            created_at: CreationDateTime::now(),
        }
    }
}
