//! HTTP client for the guard service.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::chain::Action;
use crate::guard::error::{GuardError, GuardResult};
use crate::guard::policy::GuardPolicy;
use crate::provider::AccountProof;

#[derive(Debug, Serialize)]
struct PolicyRequest<'a> {
    account_name: &'a str,
    actions: &'a [Action],
}

/// Body of `POST /temp-account`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TempAccountRequest {
    pub account_name: String,
    pub message: String,
    pub signature: String,
    /// Invite code from the `temp-account:code` cookie.
    pub code: Option<String>,
}

impl TempAccountRequest {
    pub fn from_proof(proof: AccountProof, code: Option<String>) -> Self {
        Self {
            account_name: proof.account_name,
            message: proof.message,
            signature: proof.signature,
            code,
        }
    }
}

/// Answer from `POST /temp-account`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TempAccountResponse {
    /// The account did not exist before this call.
    pub created: bool,
    pub account_name: Option<String>,
}

/// Client for the guard endpoints.
#[derive(Debug, Clone)]
pub struct GuardClient {
    client: Client,
    endpoint: String,
}

impl GuardClient {
    pub fn new(endpoint: &str, request_timeout: Duration) -> GuardResult<Self> {
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| GuardError::Unknown(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Ask the guard how `actions` signed by `account` should be handled.
    pub async fn fetch_policy(&self, account: &str, actions: &[Action]) -> GuardResult<GuardPolicy> {
        let body = PolicyRequest {
            account_name: account,
            actions,
        };
        let text = self.post("/platform-guard", &body).await?;

        if text.trim().is_empty() {
            return Err(GuardError::GuardRejected("empty response body".to_string()));
        }

        serde_json::from_str(&text).map_err(|e| GuardError::GuardRejected(e.to_string()))
    }

    /// Submit a signed proof so the guard creates the temp account.
    pub async fn create_temp_account(&self, request: &TempAccountRequest) -> GuardResult<TempAccountResponse> {
        let text = self
            .post("/temp-account", request)
            .await
            .map_err(|e| GuardError::TempAccountFailed(e.to_string()))?;

        serde_json::from_str(&text).map_err(|e| GuardError::TempAccountFailed(e.to_string()))
    }

    async fn post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> GuardResult<String> {
        let url = format!("{}{}", self.endpoint, path);
        let resp = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| GuardError::GuardUnreachable(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| GuardError::GuardUnreachable(e.to_string()))?;

        if !status.is_success() {
            return Err(GuardError::GuardRejected(format!(
                "{} returned status {}: {}",
                path, status, text
            )));
        }

        tracing::debug!(url = %url, status = %status, "Guard responded");
        Ok(text)
    }
}
