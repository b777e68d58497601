//! RPC Method Handlers
//!
//! Implements the business logic for each RPC method.

use crate::error::RpcError;
use crate::server::RpcService;
use crate::types::{ListCatsRequest, ListCatsResponse};
use async_trait::async_trait;
use cattery_core::application::cats::list;
use cattery_core::application::cats::ListCatsQuery;
use cattery_core::error::AppError;
use cattery_core::port::CatRepository;
use std::sync::Arc;
use std::time::Duration;

const METHOD_LIST: &str = "list.v1";

/// Cats handler with injected dependencies
pub struct CatsHandler {
    repo: Arc<dyn CatRepository>,
    query_timeout: Duration,
}

impl CatsHandler {
    pub const NAME: &'static str = "cats";

    pub fn new(repo: Arc<dyn CatRepository>, query_timeout: Duration) -> Self {
        Self {
            repo,
            query_timeout,
        }
    }

    /// cats.list.v1
    pub async fn list(&self, params: ListCatsRequest) -> Result<ListCatsResponse, AppError> {
        let query = ListCatsQuery {
            cursor: params.cursor,
            limit: params.limit,
        };

        let execute = list::execute(self.repo.as_ref(), query);
        let cats = match tokio::time::timeout(self.query_timeout, execute).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(AppError::Query(format!(
                    "query timed out after {}ms",
                    self.query_timeout.as_millis()
                )))
            }
        };

        Ok(ListCatsResponse { cats })
    }
}

#[async_trait]
impl RpcService for CatsHandler {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn call(
        &self,
        method: &str,
        request: serde_json::Value,
    ) -> Result<serde_json::Value, RpcError> {
        match method {
            METHOD_LIST => {
                let params: ListCatsRequest = serde_json::from_value(request)
                    .map_err(|e| RpcError::InvalidRequest(e.to_string()))?;
                let response = self.list(params).await?;
                serde_json::to_value(response)
                    .map_err(|e| RpcError::App(AppError::Internal(e.to_string())))
            }
            other => Err(RpcError::UnknownMethod(format!("{}.{}", Self::NAME, other))),
        }
    }
}
