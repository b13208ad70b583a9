//! Read entities definitions.

pub mod distribution;
pub mod team;
