mod clock;
mod http_transport;
mod key_value_store;

pub use clock::*;
pub use http_transport::*;
pub use key_value_store::*;
