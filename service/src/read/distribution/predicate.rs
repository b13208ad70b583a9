//! [`Predicate`] over [`Distribution`]s.

use std::collections::BTreeSet;

use derive_more::Display;

use crate::domain::{
    distribution, platform, team, territory, user, Distribution,
};

/// Textual field of a [`Distribution`] searched by a free-text query.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum TextField {
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
}

impl TextField {
    /// Every [`TextField`] a free-text query is matched against.
    pub const ALL: [Self; 7] = [
        Self::ProjectName,
        Self::Isrc,
        Self::MarketingOwner,
        Self::Name,
        Self::CatalogNumber,
        Self::CatalogTitle,
        Self::IncomeType,
    ];

    /// Returns the value of this [`TextField`] in the provided
    /// [`Distribution`], if any.
    #[must_use]
    pub fn get(self, distribution: &Distribution) -> Option<&str> {
        fn text<T: AsRef<str>>(v: &Option<T>) -> Option<&str> {
            v.as_ref().map(AsRef::as_ref)
        }

        match self {
            Self::ProjectName => text(&distribution.project_name),
            Self::Isrc => text(&distribution.isrc),
            Self::MarketingOwner => text(&distribution.marketing_owner),
            Self::Name => text(&distribution.name),
            Self::CatalogNumber => text(&distribution.catalog_number),
            Self::CatalogTitle => text(&distribution.catalog_title),
            Self::IncomeType => text(&distribution.income_type),
        }
    }
}

/// Many-to-many association of a [`Distribution`] with a facet.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum Association {
    /// [`Distribution::platforms`].
    #[display("platforms")]
    Platform,

    /// [`Distribution::territories`].
    #[display("territories")]
    Territory,
}

/// Filtering predicate over [`Distribution`]s.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Predicate {
    /// Conjunction of [`Predicate`]s. Empty one matches everything.
    And(Vec<Predicate>),

    /// Disjunction of [`Predicate`]s. Empty one matches nothing.
    Or(Vec<Predicate>),

    /// [`Distribution`] has the provided ID.
    IdIs(distribution::Id),

    /// [`Distribution`] is owned by the provided [`user::Id`].
    OwnedBy(user::Id),

    /// [`Distribution`] belongs to the provided team, or to no team at all
    /// if [`None`].
    TeamIs(Option<team::Id>),

    /// Owner of a [`Distribution`] has the provided [`user::Email`].
    OwnerEmailIs(user::Email),

    /// [`TextField`] contains the provided text, ignoring case.
    Contains(TextField, String),

    /// [`Distribution`] was created at or after the provided moment.
    CreatedSince(distribution::CreationDateTime),

    /// At least one entry of the [`Association`] has one of the provided IDs.
    Exists(Association, BTreeSet<i32>),
}

impl Predicate {
    /// Returns a [`Predicate`] matching everything.
    #[cfg(test)]
    #[must_use]
    pub(crate) const fn always() -> Self {
        Self::And(Vec::new())
    }

    /// Combines the provided [`Predicate`]s into a conjunction, flattening
    /// the nested ones.
    #[must_use]
    pub fn and(parts: impl IntoIterator<Item = Self>) -> Self {
        let mut flat = Vec::new();
        for p in parts {
            match p {
                Self::And(inner) => flat.extend(inner),
                p @ (Self::Or(_)
                | Self::IdIs(_)
                | Self::OwnedBy(_)
                | Self::TeamIs(_)
                | Self::OwnerEmailIs(_)
                | Self::Contains(..)
                | Self::CreatedSince(_)
                | Self::Exists(..)) => flat.push(p),
            }
        }
        match <[Self; 1]>::try_from(flat) {
            Ok([single]) => single,
            Err(flat) => Self::And(flat),
        }
    }

    /// Combines the provided [`Predicate`]s into a disjunction, flattening
    /// the nested ones.
    #[must_use]
    pub fn or(parts: impl IntoIterator<Item = Self>) -> Self {
        let mut flat = Vec::new();
        for p in parts {
            match p {
                Self::Or(inner) => flat.extend(inner),
                p @ (Self::And(_)
                | Self::IdIs(_)
                | Self::OwnedBy(_)
                | Self::TeamIs(_)
                | Self::OwnerEmailIs(_)
                | Self::Contains(..)
                | Self::CreatedSince(_)
                | Self::Exists(..)) => flat.push(p),
            }
        }
        match <[Self; 1]>::try_from(flat) {
            Ok([single]) => single,
            Err(flat) => Self::Or(flat),
        }
    }

    /// Creates an existential [`Predicate`] over the [`Association`].
    ///
    /// [`None`] is returned if no IDs are provided, as there is nothing to
    /// narrow by.
    #[must_use]
    pub fn exists<Id: Into<i32>>(
        association: Association,
        ids: impl IntoIterator<Item = Id>,
    ) -> Option<Self> {
        let ids = ids.into_iter().map(Into::into).collect::<BTreeSet<_>>();
        (!ids.is_empty()).then(|| Self::Exists(association, ids))
    }

    /// Creates an existential [`Predicate`] over [`Distribution::platforms`].
    #[must_use]
    pub fn platforms(
        ids: impl IntoIterator<Item = platform::Id>,
    ) -> Option<Self> {
        Self::exists(Association::Platform, ids)
    }

    /// Creates an existential [`Predicate`] over
    /// [`Distribution::territories`].
    #[must_use]
    pub fn territories(
        ids: impl IntoIterator<Item = territory::Id>,
    ) -> Option<Self> {
        Self::exists(Association::Territory, ids)
    }

    /// Indicates whether this [`Predicate`] matches everything.
    #[must_use]
    pub fn is_always(&self) -> bool {
        matches!(self, Self::And(ps) if ps.is_empty())
    }

    /// Checks whether the provided [`Distribution`] owned by a user with the
    /// provided `owner_email` satisfies this [`Predicate`].
    #[must_use]
    pub fn matches(
        &self,
        distribution: &Distribution,
        owner_email: Option<&user::Email>,
    ) -> bool {
        match self {
            Self::And(ps) => {
                ps.iter().all(|p| p.matches(distribution, owner_email))
            }
            Self::Or(ps) => {
                ps.iter().any(|p| p.matches(distribution, owner_email))
            }
            Self::IdIs(id) => distribution.id == *id,
            Self::OwnedBy(id) => distribution.user_id == *id,
            Self::TeamIs(id) => distribution.team_id == *id,
            Self::OwnerEmailIs(email) => owner_email == Some(email),
            Self::Contains(field, needle) => {
                let needle = needle.to_lowercase();
                field
                    .get(distribution)
                    .is_some_and(|v| v.to_lowercase().contains(&needle))
            }
            Self::CreatedSince(at) => distribution.created_at >= *at,
            Self::Exists(Association::Platform, ids) => distribution
                .platforms
                .iter()
                .any(|p| ids.contains(&i32::from(p.id))),
            Self::Exists(Association::Territory, ids) => distribution
                .territories
                .iter()
                .any(|t| ids.contains(&i32::from(t.id))),
        }
    }
}

#[cfg(test)]
mod spec {
    use common::DateTime;

    use crate::domain::{platform, team, territory, user, Distribution};

    use super::{Association, Predicate, TextField};

    #[test]
    fn and_flattens_and_unwraps() {
        let a = Predicate::OwnedBy(user::Id::new());
        let b = Predicate::TeamIs(None);

        assert_eq!(Predicate::and([a.clone()]), a);
        assert_eq!(
            Predicate::and([
                Predicate::always(),
                Predicate::and([a.clone(), b.clone()]),
            ]),
            Predicate::And(vec![a.clone(), b.clone()]),
        );
        assert!(Predicate::and([]).is_always());
        assert!(Predicate::and([Predicate::always()]).is_always());
    }

    #[test]
    fn or_flattens() {
        let a = Predicate::TeamIs(Some(team::Id::new()));
        let b = Predicate::Contains(TextField::Isrc, "x".into());
        let c = Predicate::Contains(TextField::Name, "y".into());

        assert_eq!(
            Predicate::or([a.clone(), Predicate::or([b.clone(), c.clone()])]),
            Predicate::Or(vec![a, b, c]),
        );
    }

    #[test]
    fn empty_conjunction_matches_and_empty_disjunction_does_not() {
        let d = Distribution::fixture(user::Id::new());

        assert!(Predicate::always().matches(&d, None));
        assert!(!Predicate::Or(vec![]).matches(&d, None));
    }

    #[test]
    fn contains_ignores_case() {
        let mut d = Distribution::fixture(user::Id::new());
        d.isrc = Some("USRC-ISRC-12345".into());

        assert!(Predicate::Contains(TextField::Isrc, "isrc-123".into())
            .matches(&d, None));
        assert!(!Predicate::Contains(TextField::Isrc, "isrc-999".into())
            .matches(&d, None));
        assert!(!Predicate::Contains(TextField::Name, "isrc".into())
            .matches(&d, None));
    }

    #[test]
    fn exists_requires_some_association() {
        let mut d = Distribution::fixture(user::Id::new());
        d.platforms = vec![
            platform::Platform {
                id: platform::Id::from(3),
                name: "Spotify".into(),
            },
            platform::Platform {
                id: platform::Id::from(5),
                name: "Deezer".into(),
            },
        ];

        let by_platform = |ids: Vec<i32>| {
            Predicate::platforms(ids.into_iter().map(platform::Id::from))
                .unwrap()
        };
        assert!(by_platform(vec![5]).matches(&d, None));
        assert!(by_platform(vec![1, 3]).matches(&d, None));
        assert!(!by_platform(vec![1, 2]).matches(&d, None));

        let by_territory =
            Predicate::territories([territory::Id::from(5)]).unwrap();
        assert!(!by_territory.matches(&d, None));
    }

    #[test]
    fn exists_is_skipped_without_ids() {
        assert_eq!(Predicate::platforms([]), None);
        assert_eq!(Predicate::exists::<i32>(Association::Territory, []), None);
    }

    #[test]
    fn owner_email_requires_known_owner() {
        let d = Distribution::fixture(user::Id::new());
        let inbox = user::Email::new("inbox@label.example").unwrap();
        let p = Predicate::OwnerEmailIs(inbox.clone());

        assert!(p.matches(&d, Some(&inbox)));
        assert!(!p.matches(&d, None));
        assert!(!p.matches(
            &d,
            Some(&user::Email::new("other@label.example").unwrap()),
        ));
    }

    #[test]
    fn created_since_is_inclusive() {
        let mut d = Distribution::fixture(user::Id::new());
        let at = DateTime::from_rfc3339("2024-05-01T00:00:00Z").unwrap();
        d.created_at = at.coerce();

        assert!(Predicate::CreatedSince(at.coerce()).matches(&d, None));
        assert!(!Predicate::CreatedSince(
            DateTime::from_rfc3339("2024-05-01T00:00:01Z")
                .unwrap()
                .coerce()
        )
        .matches(&d, None));
    }
}
