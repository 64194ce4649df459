use crate::domain::credentials::{AuthToken, Credentials};
use crate::domain::ports::IncomeApi;
use crate::error::{ApiError, ApiResult};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use uuid::Uuid;

/// A `POST` recorded by [`InMemoryIncomeApi`].
#[derive(Debug, Clone, PartialEq)]
pub struct PostedRequest {
    pub path: String,
    pub body: Value,
}

#[derive(Debug, Default)]
struct SandboxState {
    token: Option<AuthToken>,
    token_requests: usize,
    authentications: usize,
    posted: Vec<PostedRequest>,
}

/// An in-memory stand-in for the receipt API.
///
/// Holds the token in memory, issues a random `approvedReceiptUuid` for every
/// accepted `POST` and records each call. Clones share state, so a handle kept by
/// the caller observes what the service did with its own copy.
#[derive(Clone, Default)]
pub struct InMemoryIncomeApi {
    state: Arc<RwLock<SandboxState>>,
    accepted: Option<Credentials>,
    response: Option<Value>,
    post_failure: Option<u16>,
    reject_authentication: bool,
    token_delay: Duration,
}

impl InMemoryIncomeApi {
    /// Creates a sandbox with no token that accepts any credentials.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts out already holding `token`.
    pub fn with_token(mut self, token: AuthToken) -> Self {
        self.state = Arc::new(RwLock::new(SandboxState {
            token: Some(token),
            ..Default::default()
        }));
        self
    }

    /// Only issues tokens for exactly these credentials.
    pub fn accepting(mut self, credentials: Credentials) -> Self {
        self.accepted = Some(credentials);
        self
    }

    /// Answers every `POST` with `response` instead of a generated UUID.
    pub fn with_response(mut self, response: Value) -> Self {
        self.response = Some(response);
        self
    }

    /// Rejects every `POST` with the given HTTP status.
    pub fn failing_posts(mut self, status: u16) -> Self {
        self.post_failure = Some(status);
        self
    }

    /// Refuses every token passed to `authenticate`.
    pub fn rejecting_authentication(mut self) -> Self {
        self.reject_authentication = true;
        self
    }

    /// Delays token issuance, widening the window for concurrent callers.
    pub fn with_token_delay(mut self, delay: Duration) -> Self {
        self.token_delay = delay;
        self
    }

    pub async fn token_requests(&self) -> usize {
        self.state.read().await.token_requests
    }

    pub async fn authentications(&self) -> usize {
        self.state.read().await.authentications
    }

    pub async fn posted_requests(&self) -> Vec<PostedRequest> {
        self.state.read().await.posted.clone()
    }
}

#[async_trait]
impl IncomeApi for InMemoryIncomeApi {
    async fn current_token(&self) -> ApiResult<Option<AuthToken>> {
        Ok(self.state.read().await.token.clone())
    }

    async fn create_access_token(&self, credentials: &Credentials) -> ApiResult<AuthToken> {
        if !self.token_delay.is_zero() {
            tokio::time::sleep(self.token_delay).await;
        }

        self.state.write().await.token_requests += 1;

        if let Some(accepted) = &self.accepted
            && accepted != credentials
        {
            return Err(ApiError::Rejected {
                status: 401,
                message: "invalid taxpayer credentials".to_string(),
            });
        }

        Ok(AuthToken::new(format!("sandbox-{}", Uuid::new_v4())))
    }

    async fn authenticate(&self, token: AuthToken) -> ApiResult<()> {
        let mut state = self.state.write().await;
        state.authentications += 1;

        if self.reject_authentication || token.as_str().is_empty() {
            return Err(ApiError::InvalidToken("token was not accepted".to_string()));
        }

        state.token = Some(token);
        Ok(())
    }

    async fn post_json(&self, path: &str, body: &Value) -> ApiResult<Value> {
        let mut state = self.state.write().await;
        if state.token.is_none() {
            return Err(ApiError::Rejected {
                status: 401,
                message: "not authenticated".to_string(),
            });
        }

        state.posted.push(PostedRequest {
            path: path.to_string(),
            body: body.clone(),
        });

        if let Some(status) = self.post_failure {
            return Err(ApiError::Rejected {
                status,
                message: format!("POST {path} failed"),
            });
        }

        Ok(self
            .response
            .clone()
            .unwrap_or_else(|| json!({ "approvedReceiptUuid": Uuid::new_v4().to_string() })))
    }
}
