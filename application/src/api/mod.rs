//! GraphQL API definitions.

pub mod distribution;
mod query;
pub mod team;
pub mod user;

use juniper::{EmptyMutation, EmptySubscription};

use crate::{define_error, Context};

pub use self::{distribution::Distribution, query::Query, team::Team};

/// GraphQL schema.
pub type Schema = juniper::RootNode<
    'static,
    Query,
    EmptyMutation<Context>,
    EmptySubscription<Context>,
>;

define_error! {
    enum PaginationError {
        #[code = "INVALID_PAGINATION"]
        #[status = BAD_REQUEST]
        #[message = "`perPage` must be a positive number"]
        InvalidPerPage,
    }
}
