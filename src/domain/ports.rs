use super::credentials::{AuthToken, Credentials};
use crate::error::ApiResult;
use async_trait::async_trait;
use serde_json::Value;

/// Client for the tax authority's receipt API.
///
/// Implementations own the access token; callers only ask whether one is held
/// and request a new one when it is not.
#[async_trait]
pub trait IncomeApi: Send + Sync {
    /// Returns the token currently held, if any.
    async fn current_token(&self) -> ApiResult<Option<AuthToken>>;
    /// Exchanges taxpayer credentials for a fresh access token.
    async fn create_access_token(&self, credentials: &Credentials) -> ApiResult<AuthToken>;
    /// Installs `token` so that subsequent requests are authenticated.
    async fn authenticate(&self, token: AuthToken) -> ApiResult<()>;
    /// Sends an authenticated `POST` with a JSON body and returns the decoded JSON response.
    async fn post_json(&self, path: &str, body: &Value) -> ApiResult<Value>;
}

pub type IncomeApiBox = Box<dyn IncomeApi>;
