//! Domain definitions.

pub mod distribution;
pub mod platform;
pub mod team;
pub mod territory;
pub mod user;

pub use self::{
    distribution::Distribution, platform::Platform, team::Team,
    territory::Territory, user::User,
};
