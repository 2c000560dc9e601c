pub mod client;
pub mod config;
pub mod error;
pub mod response;

pub mod prelude {
    pub use crate::client::{EanSearchClient, SearchOptions, DEFAULT_LANGUAGE};
    pub use crate::error::LookupError;
    pub use crate::response::Record;
}
