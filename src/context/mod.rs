//! Composition root. Owns every store, the cache and the endpoint bindings,
//! and is handed to the UI shell as one value.

mod context;
pub use context::*;
