mod fetch;
mod loader;
mod matcher;
mod pattern;
mod store;
mod traits;

pub use fetch::HttpFetcher;
pub use loader::{ConfigLoader, LoadState};
pub use matcher::{is_trusted, matches_pattern};
pub use pattern::{parse_pattern, TrustPattern};
pub use store::TrustStore;
pub use traits::PayloadFetcher;
