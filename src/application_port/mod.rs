mod api_error;
mod preference_store;
mod session_store;

pub use api_error::*;
pub use preference_store::*;
pub use session_store::*;
