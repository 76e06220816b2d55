//! Query and mutation bindings: which key each read is cached under, how long
//! it stays fresh, and which keys each write invalidates.

pub mod keys;

mod analysis;
mod ranking;
mod routine;
mod reward;
mod user;

pub use analysis::*;
pub use ranking::*;
pub use reward::*;
pub use routine::*;
pub use user::*;

use crate::application_impl::QueryOptions;
use std::time::Duration;

/// Balances that change often.
pub(crate) fn short_lived(defaults: QueryOptions) -> QueryOptions {
    defaults.with_windows(Duration::from_secs(60), Duration::from_secs(5 * 60))
}

/// Catalog data that rarely changes.
pub(crate) fn long_lived(defaults: QueryOptions) -> QueryOptions {
    defaults.with_windows(Duration::from_secs(10 * 60), Duration::from_secs(30 * 60))
}
