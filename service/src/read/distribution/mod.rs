//! [`Distribution`]-related read definitions.

pub mod list;
pub mod predicate;

#[cfg(doc)]
use crate::domain::Distribution;

pub use self::predicate::{Association, Predicate, TextField};
