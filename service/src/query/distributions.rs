//! [`Query`] collection related to the multiple [`Distribution`]s.

use common::{
    operations::{By, Select},
    DateTime,
};
use derive_more::{Display, Error, From};
use futures::future;
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::{Team, User};
use crate::{
    domain::{team, user, Distribution},
    infra::{database, Database},
    read::{
        self,
        distribution::{
            list::{self, Scope},
            Predicate,
        },
    },
    Query, Service,
};

/// [`Query`] finding a [`list::Page`] of [`Distribution`]s visible to a
/// [`User`], either personally or as a member of a [`Team`].
#[derive(Clone, Debug)]
pub struct Find {
    /// ID of the [`User`] performing the [`Query`].
    pub user_id: user::Id,

    /// ID of the [`Team`] to look up [`Distribution`]s of.
    ///
    /// Personal [`Distribution`]s of the [`User`] are looked up if [`None`].
    pub team_id: Option<team::Id>,

    /// [`list::Arguments`] of the requested [`list::Page`].
    pub arguments: list::Arguments,

    /// Ordering of the [`Distribution`]s.
    pub order_by: list::OrderBy,

    /// [`list::Filter`] to narrow the [`Distribution`]s with.
    pub filter: list::Filter,
}

impl<Db> Query<Find> for Service<Db>
where
    Db: Database<
            Select<
                By<Option<read::team::Membership>, (team::Id, user::Id)>,
            >,
            Ok = Option<read::team::Membership>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Distribution>, list::Selector>>,
            Ok = Vec<Distribution>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<list::TotalCount, Predicate>>,
            Ok = list::TotalCount,
            Err = Traced<database::Error>,
        >,
{
    type Ok = list::Page;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, query: Find) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let Find {
            user_id,
            team_id,
            arguments,
            order_by,
            filter,
        } = query;

        let scope = if let Some(id) = team_id {
            let membership = self
                .database()
                .execute(Select(By::<Option<read::team::Membership>, _>::new(
                    (id, user_id),
                )))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .ok_or(E::TeamNotFoundOrUnauthorized(id))
                .map_err(tracerr::wrap!())?;
            Scope::Team {
                id,
                email: membership.team.team_email,
            }
        } else {
            Scope::Personal(user_id)
        };

        let predicate = filter.fragments(&scope, DateTime::now()).compose();
        log::debug!("finding `Distribution`s matching {predicate:?}");

        let selector = list::Selector {
            arguments,
            order_by,
            filter: predicate.clone(),
        };
        let (data, count) = future::try_join(
            self.database()
                .execute(Select(By::<Vec<Distribution>, _>::new(selector))),
            self.database()
                .execute(Select(By::<list::TotalCount, _>::new(predicate))),
        )
        .await
        .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(list::Page::new(&arguments, data, count.into()))
    }
}

/// Error of [`Find`] [`Query`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Team`] doesn't exist or the [`User`] is not its member.
    #[display("`Team(id: {_0})` does not exist or is not accessible")]
    #[from(ignore)]
    TeamNotFoundOrUnauthorized(#[error(not(source))] team::Id),
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::{
        operations::Insert,
        pagination::{Order, OrderBy},
        DateTime, Handler as _,
    };

    use crate::{
        domain::{
            distribution, platform, team, territory, user, Distribution,
            Platform, Team, Territory, User,
        },
        infra::{database::Memory, Database as _},
        read::distribution::{
            list::{self, Column, Filter, Period, SearchQuery},
            Predicate, TextField,
        },
        Config, Service,
    };

    use super::{ExecutionError, Find};

    const DAY: Duration = Duration::from_secs(24 * 60 * 60);

    fn service(db: &Memory) -> Service<Memory> {
        Service::new(
            Config {
                jwt_decoding_key: jsonwebtoken::DecodingKey::from_secret(
                    b"secret",
                ),
            },
            db.clone(),
        )
    }

    async fn new_user(db: &Memory, email: Option<&str>) -> user::Id {
        let id = user::Id::new();
        db.execute(Insert(User {
            id,
            email: email.map(|e| user::Email::new(e).unwrap()),
        }))
        .await
        .unwrap();
        id
    }

    async fn new_team(
        db: &Memory,
        email: Option<&str>,
        members: &[user::Id],
    ) -> team::Id {
        let id = team::Id::new();
        db.execute(Insert(Team {
            id,
            team_email: email.map(|e| user::Email::new(e).unwrap()),
        }))
        .await
        .unwrap();
        for user_id in members {
            db.execute(Insert(team::Member {
                team_id: id,
                user_id: *user_id,
                role: team::Role::Member,
            }))
            .await
            .unwrap();
        }
        id
    }

    async fn insert(db: &Memory, d: Distribution) -> distribution::Id {
        let id = d.id;
        db.execute(Insert(d)).await.unwrap();
        id
    }

    fn find(user_id: user::Id, team_id: Option<team::Id>) -> Find {
        Find {
            user_id,
            team_id,
            arguments: list::Arguments::default(),
            order_by: OrderBy::default(),
            filter: Filter::default(),
        }
    }

    #[tokio::test]
    async fn personal_scope_returns_own_teamless_records() {
        let db = Memory::default();
        let me = new_user(&db, None).await;
        let other = new_user(&db, None).await;
        let t = new_team(&db, None, &[me]).await;

        let own = insert(&db, Distribution::fixture(me)).await;
        _ = insert(&db, Distribution::fixture(other)).await;
        _ = insert(
            &db,
            Distribution {
                team_id: Some(t),
                ..Distribution::fixture(me)
            },
        )
        .await;

        let page = service(&db).execute(find(me, None)).await.unwrap();

        assert_eq!(page.count, 1);
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].id, own);
        for d in &page.data {
            assert_eq!(d.user_id, me);
            assert_eq!(d.team_id, None);
        }
    }

    #[tokio::test]
    async fn team_scope_returns_team_records() {
        let db = Memory::default();
        let me = new_user(&db, None).await;
        let mate = new_user(&db, None).await;
        let t = new_team(&db, None, &[me, mate]).await;
        let other_t = new_team(&db, None, &[me]).await;

        for owner in [me, mate] {
            _ = insert(
                &db,
                Distribution {
                    team_id: Some(t),
                    ..Distribution::fixture(owner)
                },
            )
            .await;
        }
        _ = insert(&db, Distribution::fixture(me)).await;
        _ = insert(
            &db,
            Distribution {
                team_id: Some(other_t),
                ..Distribution::fixture(me)
            },
        )
        .await;

        let page = service(&db).execute(find(me, Some(t))).await.unwrap();

        assert_eq!(page.count, 2);
        for d in &page.data {
            assert_eq!(d.team_id, Some(t));
        }
    }

    #[tokio::test]
    async fn team_scope_includes_shared_inbox_records() {
        let db = Memory::default();
        let me = new_user(&db, None).await;
        let inbox = new_user(&db, Some("inbox@label.example")).await;
        let stranger = new_user(&db, Some("someone@label.example")).await;
        let t = new_team(&db, Some("inbox@label.example"), &[me]).await;

        let shared = insert(&db, Distribution::fixture(inbox)).await;
        let owned = insert(
            &db,
            Distribution {
                team_id: Some(t),
                ..Distribution::fixture(me)
            },
        )
        .await;
        _ = insert(&db, Distribution::fixture(stranger)).await;
        _ = insert(&db, Distribution::fixture(me)).await;

        let page = service(&db).execute(find(me, Some(t))).await.unwrap();

        assert_eq!(page.count, 2);
        let mut ids = page.data.iter().map(|d| d.id).collect::<Vec<_>>();
        ids.sort();
        let mut expected = vec![shared, owned];
        expected.sort();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn fails_for_non_member_team() {
        let db = Memory::default();
        let me = new_user(&db, None).await;
        let owner = new_user(&db, None).await;
        let t = new_team(&db, None, &[owner]).await;
        _ = insert(
            &db,
            Distribution {
                team_id: Some(t),
                ..Distribution::fixture(owner)
            },
        )
        .await;

        let err = service(&db).execute(find(me, Some(t))).await.unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::TeamNotFoundOrUnauthorized(id) if *id == t,
        ));

        let missing = team::Id::new();
        let err = service(&db)
            .execute(find(me, Some(missing)))
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::TeamNotFoundOrUnauthorized(id) if *id == missing,
        ));
    }

    #[tokio::test]
    async fn count_ignores_pagination() {
        let db = Memory::default();
        let me = new_user(&db, None).await;
        for _ in 0..7 {
            _ = insert(&db, Distribution::fixture(me)).await;
        }
        let svc = service(&db);

        for (page, per_page, len) in
            [(1, 3, 3), (2, 3, 3), (3, 3, 1), (4, 3, 0), (1, 10, 7)]
        {
            let result = svc
                .execute(Find {
                    arguments: list::Arguments::new(
                        Some(page),
                        Some(per_page),
                    )
                    .unwrap(),
                    ..find(me, None)
                })
                .await
                .unwrap();

            assert_eq!(result.count, 7);
            assert_eq!(result.data.len(), len, "page {page} of {per_page}");
            assert_eq!(result.current_page, page);
            assert_eq!(result.total_pages, 7_u64.div_ceil(per_page.into()));
        }
    }

    #[tokio::test]
    async fn pages_do_not_overlap() {
        let db = Memory::default();
        let me = new_user(&db, None).await;
        for _ in 0..5 {
            _ = insert(&db, Distribution::fixture(me)).await;
        }
        let svc = service(&db);

        let mut seen = Vec::new();
        for page in 1..=3 {
            let result = svc
                .execute(Find {
                    arguments: list::Arguments::new(Some(page), Some(2))
                        .unwrap(),
                    ..find(me, None)
                })
                .await
                .unwrap();
            seen.extend(result.data.into_iter().map(|d| d.id));
        }

        let mut sorted = seen.clone();
        sorted.sort();
        assert_eq!(seen, sorted);
        sorted.dedup();
        assert_eq!(sorted.len(), 5);
    }

    #[tokio::test]
    async fn query_matches_any_text_field_ignoring_case() {
        let db = Memory::default();
        let me = new_user(&db, None).await;

        let by_isrc = insert(
            &db,
            Distribution {
                isrc: Some("US-ISRC-12345".into()),
                ..Distribution::fixture(me)
            },
        )
        .await;
        let by_title = insert(
            &db,
            Distribution {
                catalog_title: Some("The isrc-123 Sessions".into()),
                ..Distribution::fixture(me)
            },
        )
        .await;
        _ = insert(
            &db,
            Distribution {
                name: Some("Unrelated".into()),
                content: "isrc-123".into(),
                ..Distribution::fixture(me)
            },
        )
        .await;

        let page = service(&db)
            .execute(Find {
                filter: Filter {
                    query: SearchQuery::new("isrc-123"),
                    ..Filter::default()
                },
                ..find(me, None)
            })
            .await
            .unwrap();

        let mut ids = page.data.iter().map(|d| d.id).collect::<Vec<_>>();
        ids.sort();
        let mut expected = vec![by_isrc, by_title];
        expected.sort();
        assert_eq!(ids, expected);
        assert_eq!(page.count, 2);
    }

    #[tokio::test]
    async fn query_treats_wildcards_literally() {
        let db = Memory::default();
        let me = new_user(&db, None).await;

        let percent = insert(
            &db,
            Distribution {
                name: Some("100% Hits".into()),
                ..Distribution::fixture(me)
            },
        )
        .await;
        _ = insert(
            &db,
            Distribution {
                name: Some("100 Hits".into()),
                ..Distribution::fixture(me)
            },
        )
        .await;

        let page = service(&db)
            .execute(Find {
                filter: Filter {
                    query: SearchQuery::new("0%"),
                    ..Filter::default()
                },
                ..find(me, None)
            })
            .await
            .unwrap();

        assert_eq!(page.count, 1);
        assert_eq!(page.data[0].id, percent);
    }

    #[tokio::test]
    async fn query_keeps_surrounding_whitespace() {
        let db = Memory::default();
        let me = new_user(&db, None).await;

        _ = insert(
            &db,
            Distribution {
                name: Some("ab".into()),
                ..Distribution::fixture(me)
            },
        )
        .await;
        let spaced = insert(
            &db,
            Distribution {
                name: Some("a b".into()),
                ..Distribution::fixture(me)
            },
        )
        .await;

        let page = service(&db)
            .execute(Find {
                filter: Filter {
                    query: SearchQuery::new(" b"),
                    ..Filter::default()
                },
                ..find(me, None)
            })
            .await
            .unwrap();

        assert_eq!(page.count, 1);
        assert_eq!(page.data[0].id, spaced);
    }

    #[tokio::test]
    async fn platforms_facet_requires_matching_association() {
        let db = Memory::default();
        let me = new_user(&db, None).await;
        let spotify = Platform {
            id: platform::Id::from(5),
            name: "Spotify".into(),
        };
        let deezer = Platform {
            id: platform::Id::from(7),
            name: "Deezer".into(),
        };

        let matching = insert(
            &db,
            Distribution {
                name: Some("Summer".into()),
                platforms: vec![deezer.clone(), spotify],
                ..Distribution::fixture(me)
            },
        )
        .await;
        _ = insert(
            &db,
            Distribution {
                name: Some("Summer".into()),
                platforms: vec![deezer],
                ..Distribution::fixture(me)
            },
        )
        .await;
        _ = insert(
            &db,
            Distribution {
                name: Some("Summer".into()),
                ..Distribution::fixture(me)
            },
        )
        .await;

        let page = service(&db)
            .execute(Find {
                filter: Filter {
                    query: SearchQuery::new("summer"),
                    platform_ids: vec![platform::Id::from(5)],
                    ..Filter::default()
                },
                ..find(me, None)
            })
            .await
            .unwrap();

        assert_eq!(page.count, 1);
        assert_eq!(page.data[0].id, matching);
        assert!(page.data[0]
            .platforms
            .iter()
            .any(|p| p.id == platform::Id::from(5)));
    }

    #[tokio::test]
    async fn territories_facet_accepts_any_of_ids() {
        let db = Memory::default();
        let me = new_user(&db, None).await;
        let territory = |id, name: &str| Territory {
            id: territory::Id::from(id),
            name: name.into(),
        };

        for (id, name) in [(1, "Ukraine"), (2, "Poland"), (3, "Germany")] {
            _ = insert(
                &db,
                Distribution {
                    territories: vec![territory(id, name)],
                    ..Distribution::fixture(me)
                },
            )
            .await;
        }

        let page = service(&db)
            .execute(Find {
                filter: Filter {
                    territory_ids: vec![
                        territory::Id::from(1),
                        territory::Id::from(3),
                    ],
                    ..Filter::default()
                },
                ..find(me, None)
            })
            .await
            .unwrap();

        assert_eq!(page.count, 2);
    }

    #[tokio::test]
    async fn period_excludes_records_before_start_of_day() {
        let db = Memory::default();
        let me = new_user(&db, None).await;
        let now = DateTime::now();
        let boundary = (now - DAY * 7).start_of_day();

        let fresh = insert(
            &db,
            Distribution {
                created_at: now.coerce(),
                ..Distribution::fixture(me)
            },
        )
        .await;
        let at_boundary = insert(
            &db,
            Distribution {
                created_at: boundary.coerce(),
                ..Distribution::fixture(me)
            },
        )
        .await;
        _ = insert(
            &db,
            Distribution {
                created_at: (boundary - Duration::from_secs(1)).coerce(),
                ..Distribution::fixture(me)
            },
        )
        .await;
        _ = insert(
            &db,
            Distribution {
                created_at: (now - DAY * 30).coerce(),
                ..Distribution::fixture(me)
            },
        )
        .await;

        let page = service(&db)
            .execute(Find {
                filter: Filter {
                    period: Period::Week,
                    ..Filter::default()
                },
                ..find(me, None)
            })
            .await
            .unwrap();

        let mut ids = page.data.iter().map(|d| d.id).collect::<Vec<_>>();
        ids.sort();
        let mut expected = vec![fresh, at_boundary];
        expected.sort();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn extra_predicate_narrows_within_scope() {
        let db = Memory::default();
        let me = new_user(&db, None).await;
        let other = new_user(&db, None).await;

        let target = insert(&db, Distribution::fixture(me)).await;
        _ = insert(&db, Distribution::fixture(me)).await;
        let foreign = insert(&db, Distribution::fixture(other)).await;
        let svc = service(&db);

        let page = svc
            .execute(Find {
                filter: Filter {
                    extra: Some(Predicate::IdIs(target)),
                    ..Filter::default()
                },
                ..find(me, None)
            })
            .await
            .unwrap();
        assert_eq!(page.count, 1);
        assert_eq!(page.data[0].id, target);

        let page = svc
            .execute(Find {
                filter: Filter {
                    extra: Some(Predicate::IdIs(foreign)),
                    ..Filter::default()
                },
                ..find(me, None)
            })
            .await
            .unwrap();
        assert_eq!(page.count, 0);
        assert!(page.data.is_empty());
    }

    #[tokio::test]
    async fn orders_by_column_with_nulls_last() {
        let db = Memory::default();
        let me = new_user(&db, None).await;

        for name in [Some("b"), None, Some("a"), Some("c")] {
            _ = insert(
                &db,
                Distribution {
                    name: name.map(Into::into),
                    ..Distribution::fixture(me)
                },
            )
            .await;
        }
        let svc = service(&db);

        for (order, expected) in [
            (Order::Ascending, [Some("a"), Some("b"), Some("c"), None]),
            (Order::Descending, [Some("c"), Some("b"), Some("a"), None]),
        ] {
            let page = svc
                .execute(Find {
                    order_by: OrderBy {
                        column: Column::Name,
                        order,
                    },
                    ..find(me, None)
                })
                .await
                .unwrap();

            let names = page
                .data
                .iter()
                .map(|d| TextField::Name.get(d))
                .collect::<Vec<_>>();
            assert_eq!(names, expected);
        }
    }

    #[tokio::test]
    async fn breaks_ties_by_id() {
        let db = Memory::default();
        let me = new_user(&db, None).await;
        let at = DateTime::now().coerce();

        let mut ids = Vec::new();
        for _ in 0..4 {
            ids.push(
                insert(
                    &db,
                    Distribution {
                        created_at: at,
                        ..Distribution::fixture(me)
                    },
                )
                .await,
            );
        }
        ids.sort();

        let page = service(&db)
            .execute(Find {
                order_by: OrderBy {
                    column: Column::CreatedAt,
                    order: Order::Descending,
                },
                ..find(me, None)
            })
            .await
            .unwrap();

        assert_eq!(page.data.iter().map(|d| d.id).collect::<Vec<_>>(), ids);
    }
}
