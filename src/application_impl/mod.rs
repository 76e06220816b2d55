mod persistence;
mod preference_store_impl;
mod query_cache;
mod request_gateway;
mod session_store_impl;

pub use persistence::*;
pub use preference_store_impl::*;
pub use query_cache::*;
pub use request_gateway::*;
pub use session_store_impl::*;
