mod clock_manual;
mod clock_system;
mod http_transport_fake;
mod http_transport_reqwest;
mod key_value_store_file;
mod key_value_store_memory;

pub use clock_manual::*;
pub use clock_system::*;
pub use http_transport_fake::*;
pub use http_transport_reqwest::*;
pub use key_value_store_file::*;
pub use key_value_store_memory::*;
