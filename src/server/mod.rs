mod handler;
mod types;

pub use handler::QueryHandler;
pub use types::{QueryRequest, QueryResponse, SupportDetails};
