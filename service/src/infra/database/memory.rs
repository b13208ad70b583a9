//! In-memory [`Database`] implementation.

use std::{cmp::Ordering, collections::HashMap, sync::Arc};

use common::{
    operations::{By, Insert, Select},
    pagination::Order,
};
use tokio::sync::RwLock;
use tracerr::Traced;

use crate::{
    domain::{team, user, Distribution, Team, User},
    infra::{database, Database},
    read::{
        self,
        distribution::{
            list::{self, Column},
            Predicate,
        },
    },
};

/// In-memory [`Database`] evaluating [`Predicate`]s against in-process
/// tables.
#[derive(Clone, Debug, Default)]
pub struct Memory(Arc<RwLock<Tables>>);

/// Tables of a [`Memory`] database.
#[derive(Debug, Default)]
struct Tables {
    /// [`User`]s by their IDs.
    users: HashMap<user::Id, User>,

    /// [`Team`]s by their IDs.
    teams: HashMap<team::Id, Team>,

    /// [`team::Member`]s of all [`Team`]s.
    members: Vec<team::Member>,

    /// [`Distribution`]s in insertion order.
    distributions: Vec<Distribution>,
}

impl Tables {
    /// Returns [`Distribution`]s matching the provided [`Predicate`].
    fn matching<'a>(
        &'a self,
        predicate: &'a Predicate,
    ) -> impl Iterator<Item = &'a Distribution> + 'a {
        self.distributions.iter().filter(|d| {
            let owner_email =
                self.users.get(&d.user_id).and_then(|u| u.email.as_ref());
            predicate.matches(d, owner_email)
        })
    }
}

impl Database<Insert<User>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(user): Insert<User>,
    ) -> Result<Self::Ok, Self::Err> {
        drop(self.0.write().await.users.insert(user.id, user));
        Ok(())
    }
}

impl Database<Insert<Team>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(team): Insert<Team>,
    ) -> Result<Self::Ok, Self::Err> {
        drop(self.0.write().await.teams.insert(team.id, team));
        Ok(())
    }
}

impl Database<Insert<team::Member>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(member): Insert<team::Member>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut tables = self.0.write().await;
        tables.members.retain(|m| {
            m.team_id != member.team_id || m.user_id != member.user_id
        });
        tables.members.push(member);
        Ok(())
    }
}

impl Database<Insert<Distribution>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(distribution): Insert<Distribution>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut tables = self.0.write().await;
        tables.distributions.retain(|d| d.id != distribution.id);
        tables.distributions.push(distribution);
        Ok(())
    }
}

impl Database<Select<By<Option<User>, user::Id>>> for Memory {
    type Ok = Option<User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.0.read().await.users.get(by.inner()).cloned())
    }
}

impl
    Database<
        Select<By<Option<read::team::Membership>, (team::Id, user::Id)>>,
    > for Memory
{
    type Ok = Option<read::team::Membership>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Option<read::team::Membership>, (team::Id, user::Id)>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let (team_id, user_id) = by.into_inner();

        let tables = self.0.read().await;
        Ok(tables
            .members
            .iter()
            .find(|m| m.team_id == team_id && m.user_id == user_id)
            .and_then(|m| {
                Some(read::team::Membership {
                    team: tables.teams.get(&team_id)?.clone(),
                    role: m.role,
                })
            }))
    }
}

impl Database<Select<By<Vec<Distribution>, list::Selector>>> for Memory {
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

        let tables = self.0.read().await;
        let mut rows = tables.matching(&filter).collect::<Vec<_>>();
        rows.sort_by(|a, b| {
            compare(order_by.column, order_by.order, a, b)
                .then_with(|| a.id.cmp(&b.id))
        });

        let offset = usize::try_from(arguments.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(arguments.per_page()).unwrap_or(usize::MAX);
        Ok(rows.into_iter().skip(offset).take(limit).cloned().collect())
    }
}

impl Database<Select<By<list::TotalCount, Predicate>>> for Memory {
    type Ok = list::TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<list::TotalCount, Predicate>>,
    ) -> Result<Self::Ok, Self::Err> {
        let tables = self.0.read().await;
        let count = tables.matching(by.inner()).count();
        Ok(u64::try_from(count).unwrap_or(u64::MAX).into())
    }
}

/// Compares the provided [`Distribution`]s by the [`Column`] in the [`Order`].
///
/// Missing values go last regardless of the [`Order`].
fn compare(
    column: Column,
    order: Order,
    a: &Distribution,
    b: &Distribution,
) -> Ordering {
    fn nulls_last<T: Ord>(
        a: Option<T>,
        b: Option<T>,
        order: Order,
    ) -> Ordering {
        match (a, b) {
            (Some(a), Some(b)) => order.apply(a.cmp(&b)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }

    match column {
        Column::Id => order.apply(a.id.cmp(&b.id)),
        Column::UserId => order.apply(a.user_id.cmp(&b.user_id)),
        Column::TeamId => nulls_last(a.team_id, b.team_id, order),
        Column::CreatedAt => order.apply(a.created_at.cmp(&b.created_at)),
        Column::ProjectName
        | Column::Isrc
        | Column::MarketingOwner
        | Column::Name
        | Column::CatalogNumber
        | Column::CatalogTitle
        | Column::IncomeType => {
            column.text_field().map_or(Ordering::Equal, |f| {
                nulls_last(f.get(a), f.get(b), order)
            })
        }
    }
}

#[cfg(test)]
mod spec {
    use common::{
        operations::{By, Insert, Select},
        Handler as _,
    };

    use crate::{
        domain::{team, user, Distribution, Team, User},
        read,
    };

    use super::Memory;

    #[tokio::test]
    async fn resolves_membership_only_for_members() {
        let db = Memory::default();
        let member = user::Id::new();
        let outsider = user::Id::new();
        let team_id = team::Id::new();

        db.execute(Insert(Team {
            id: team_id,
            team_email: None,
        }))
        .await
        .unwrap();
        db.execute(Insert(team::Member {
            team_id,
            user_id: member,
            role: team::Role::Admin,
        }))
        .await
        .unwrap();

        let select = |user_id| {
            Select(By::<Option<read::team::Membership>, _>::new((
                team_id, user_id,
            )))
        };

        let membership = db.execute(select(member)).await.unwrap().unwrap();
        assert_eq!(membership.team.id, team_id);
        assert_eq!(membership.role, team::Role::Admin);

        assert!(db.execute(select(outsider)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn replaces_records_with_same_id() {
        let db = Memory::default();
        let user_id = user::Id::new();
        db.execute(Insert(User {
            id: user_id,
            email: None,
        }))
        .await
        .unwrap();

        let mut d = Distribution::fixture(user_id);
        db.execute(Insert(d.clone())).await.unwrap();
        d.name = Some("Renamed".into());
        db.execute(Insert(d.clone())).await.unwrap();

        let tables = db.0.read().await;
        assert_eq!(tables.distributions.len(), 1);
        assert_eq!(
            tables.distributions[0].name.as_ref().map(ToString::to_string),
            Some("Renamed".to_owned()),
        );
    }
}
