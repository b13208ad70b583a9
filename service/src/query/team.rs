//! [`Query`] collection related to a single [`Team`].

use common::operations::By;

use crate::{
    domain::{team, user},
    read,
};
#[cfg(doc)]
use crate::{
    domain::{Team, User},
    Query,
};

use super::DatabaseQuery;

/// Queries a [`Team`] by its [`team::Id`] as seen by its member [`User`].
///
/// Resolves to [`None`] if the [`Team`] doesn't exist or the [`User`] is not
/// its member.
pub type Membership = DatabaseQuery<
    By<Option<read::team::Membership>, (team::Id, user::Id)>,
>;
