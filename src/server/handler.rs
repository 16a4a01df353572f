use std::sync::Arc;
use tracing::{debug, error};

use super::types::{QueryRequest, QueryResponse, SupportDetails};
use crate::engine::{ConfigLoader, TrustStore};

/// Service side of the query boundary.
///
/// Every answer waits for `ConfigLoader::load()` first, so no query result
/// is ever produced from unloaded or half-loaded state; queries issued
/// while the load is in flight attach to that same outcome.
#[derive(Clone)]
pub struct QueryHandler {
    loader: Arc<ConfigLoader>,
    store: Arc<TrustStore>,
}

impl QueryHandler {
    pub fn new(loader: Arc<ConfigLoader>, store: Arc<TrustStore>) -> Self {
        Self { loader, store }
    }

    pub async fn handle(&self, request: QueryRequest) -> QueryResponse {
        match request {
            QueryRequest::IsWhitelisted { domain } => {
                if let Err(e) = self.loader.load().await {
                    // Fail closed: uncertainty resolves to "not trusted".
                    error!("Load failed while answering trust query: {}", e);
                    return QueryResponse::Trust {
                        is_whitelisted: false,
                    };
                }

                let trusted = self.store.is_trusted(&domain);
                debug!("Trust result for {}: {}", domain, trusted);
                QueryResponse::Trust {
                    is_whitelisted: trusted,
                }
            }
            QueryRequest::GetSupportEmail => match self.loader.load().await {
                Ok(()) => {
                    let config = self.store.config();
                    QueryResponse::Support(SupportDetails::from(config.as_ref()))
                }
                Err(e) => {
                    error!("Load failed while answering support query: {}", e);
                    QueryResponse::Support(SupportDetails::default())
                }
            },
        }
    }
}
