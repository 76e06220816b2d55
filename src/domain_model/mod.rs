mod analysis;
mod envelope;
mod finance;
mod flow;
mod query_key;
mod reward;
mod routine;
mod session;
mod user;

pub use analysis::*;
pub use envelope::*;
pub use finance::*;
pub use flow::*;
pub use query_key::*;
pub use reward::*;
pub use routine::*;
pub use session::*;
pub use user::*;
