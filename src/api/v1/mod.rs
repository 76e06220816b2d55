//! Typed clients for the backend's v1 surface, one per area.

mod analysis;
mod ranking;
mod routine;
mod roulette;
mod shop;
mod user;

pub use analysis::*;
pub use ranking::*;
pub use routine::*;
pub use roulette::*;
pub use shop::*;
pub use user::*;
