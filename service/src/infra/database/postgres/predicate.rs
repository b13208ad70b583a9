//! Rendering of [`Predicate`]s into parameterized SQL.

use itertools::Itertools as _;
use postgres_types::ToSql;

use crate::read::distribution::{Association, Predicate};

use super::LikePattern;

/// Positional parameters of a SQL statement.
#[derive(Debug, Default)]
pub(crate) struct Params(Vec<Box<dyn ToSql + Send + Sync>>);

impl Params {
    /// Adds the provided `value` and returns its `$N` placeholder index.
    pub(crate) fn push(
        &mut self,
        value: impl ToSql + Send + Sync + 'static,
    ) -> usize {
        self.0.push(Box::new(value));
        self.0.len()
    }

    /// Returns these [`Params`] in the form accepted by a [`Connection`].
    ///
    /// [`Connection`]: super::Connection
    pub(crate) fn refs(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.0
            .iter()
            .map(|p| -> &(dyn ToSql + Sync) { &**p })
            .collect()
    }
}

/// Renders the provided [`Predicate`] over the `d` alias of the
/// `distributions` table, pushing its values into the [`Params`].
pub(crate) fn render(predicate: &Predicate, params: &mut Params) -> String {
    match predicate {
        p if p.is_always() => "TRUE".to_owned(),
        Predicate::Or(ps) if ps.is_empty() => "FALSE".to_owned(),
        Predicate::And(ps) => {
            format!("({})", ps.iter().map(|p| render(p, params)).join(" AND "))
        }
        Predicate::Or(ps) => {
            format!("({})", ps.iter().map(|p| render(p, params)).join(" OR "))
        }
        Predicate::IdIs(id) => format!("d.id = ${}::UUID", params.push(*id)),
        Predicate::OwnedBy(id) => {
            format!("d.user_id = ${}::UUID", params.push(*id))
        }
        Predicate::TeamIs(None) => "d.team_id IS NULL".to_owned(),
        Predicate::TeamIs(Some(id)) => {
            format!("d.team_id = ${}::UUID", params.push(*id))
        }
        Predicate::OwnerEmailIs(email) => format!(
            "EXISTS (SELECT 1 FROM users u \
                     WHERE u.id = d.user_id \
                       AND u.email = ${}::VARCHAR)",
            params.push(email.clone()),
        ),
        Predicate::Contains(field, needle) => format!(
            "d.{field} ILIKE ${}::VARCHAR",
            params.push(LikePattern::contains(needle)),
        ),
        Predicate::CreatedSince(at) => {
            format!("d.created_at >= ${}::TIMESTAMPTZ", params.push(*at))
        }
        Predicate::Exists(association, ids) => {
            let (table, column) = match association {
                Association::Platform => {
                    ("distribution_platforms", "platform_id")
                }
                Association::Territory => {
                    ("distribution_territories", "territory_id")
                }
            };
            format!(
                "EXISTS (SELECT 1 FROM {table} a \
                         WHERE a.distribution_id = d.id \
                           AND a.{column} = ANY(${}::INT4[]))",
                params.push(ids.iter().copied().collect::<Vec<i32>>()),
            )
        }
    }
}
