//! [`Team`]-related read definitions.

use crate::domain::{team, Team};
#[cfg(doc)]
use crate::domain::User;

/// [`Team`] as seen by one of its member [`User`]s.
#[derive(Clone, Debug)]
pub struct Membership {
    /// [`Team`] the [`User`] is a member of.
    pub team: Team,

    /// [`team::Role`] of the [`User`] in the [`Team`].
    pub role: team::Role,
}
