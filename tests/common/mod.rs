//! Shared utilities for integration testing.

use async_trait::async_trait;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

use tx_guard::chain::{ChainConfig, ChainRpc, HttpChainClient};
use tx_guard::provider::{AccountProof, GuardProvider, ProviderError, TEMP_ACCOUNT_CODE_COOKIE};

/// Canned answers for the mock node + guard.
#[derive(Clone)]
pub struct MockResponses {
    pub policy: Value,
    pub policy_status: u16,
    pub temp_account: Value,
    pub temp_account_status: u16,
    pub account: Value,
    pub account_status: u16,
}

impl MockResponses {
    pub fn with_policy(policy: Value) -> Self {
        Self {
            policy,
            policy_status: 200,
            temp_account: json!({"created": false}),
            temp_account_status: 200,
            account: account_resources(0, 0),
            account_status: 200,
        }
    }
}

/// `get_account` body with the given CPU (us) and NET (bytes) availability.
pub fn account_resources(cpu_us: i64, net_bytes: i64) -> Value {
    json!({
        "account_name": "alice",
        "cpu_limit": {"used": 0, "available": cpu_us, "max": cpu_us},
        "net_limit": {"used": 0, "available": net_bytes, "max": net_bytes}
    })
}

struct MockState {
    responses: MockResponses,
    calls: Mutex<Vec<(String, Value)>>,
}

impl MockState {
    fn record(&self, path: &str, body: Value) {
        self.calls.lock().unwrap().push((path.to_string(), body));
    }
}

/// A running mock server serving the guard and chain endpoints.
pub struct MockServer {
    pub addr: SocketAddr,
    state: Arc<MockState>,
}

impl MockServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Requests received so far, as `(path, body)` in arrival order.
    pub fn calls(&self) -> Vec<(String, Value)> {
        self.state.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, path: &str) -> Vec<Value> {
        self.calls()
            .into_iter()
            .filter(|(p, _)| p == path)
            .map(|(_, body)| body)
            .collect()
    }

    pub fn chain_config(&self) -> ChainConfig {
        ChainConfig {
            rpc_url: self.url(),
            failover_urls: Vec::new(),
            rpc_timeout_secs: 5,
        }
    }
}

fn status(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

async fn platform_guard(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    state.record("/platform-guard", body);
    let r = &state.responses;
    (status(r.policy_status), Json(r.policy.clone()))
}

async fn temp_account(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    state.record("/temp-account", body);
    let r = &state.responses;
    (status(r.temp_account_status), Json(r.temp_account.clone()))
}

async fn get_account(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    state.record("/v1/chain/get_account", body);
    let r = &state.responses;
    (status(r.account_status), Json(r.account.clone()))
}

/// Start the mock on an ephemeral port.
pub async fn start_mock_server(responses: MockResponses) -> MockServer {
    let state = Arc::new(MockState {
        responses,
        calls: Mutex::new(Vec::new()),
    });

    let app = Router::new()
        .route("/platform-guard", post(platform_guard))
        .route("/temp-account", post(temp_account))
        .route("/v1/chain/get_account", post(get_account))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockServer { addr, state }
}

/// Wallet provider double backed by a real HTTP chain client.
pub struct TestProvider {
    pub account: String,
    pub rpc: HttpChainClient,
    pub temp: bool,
    pub proof_fails: bool,
    pub invite_code: Option<String>,
    pub nonces: Mutex<Vec<String>>,
}

impl TestProvider {
    pub fn new(account: &str, config: &ChainConfig) -> Self {
        Self {
            account: account.to_string(),
            rpc: HttpChainClient::new(config).unwrap(),
            temp: false,
            proof_fails: false,
            invite_code: None,
            nonces: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl GuardProvider for TestProvider {
    fn account_name(&self) -> &str {
        &self.account
    }

    fn is_temp(&self) -> bool {
        self.temp
    }

    fn rpc(&self) -> &dyn ChainRpc {
        &self.rpc
    }

    async fn wax_proof(&self, nonce: &str, _verify: bool) -> Result<AccountProof, ProviderError> {
        self.nonces.lock().unwrap().push(nonce.to_string());
        if self.proof_fails {
            return Err(ProviderError::Proof("user closed the login window".into()));
        }
        Ok(AccountProof {
            account_name: self.account.clone(),
            message: nonce.to_string(),
            signature: "SIG_K1_test".to_string(),
        })
    }

    fn cookie(&self, name: &str) -> Option<String> {
        if name == TEMP_ACCOUNT_CODE_COOKIE {
            self.invite_code.clone()
        } else {
            None
        }
    }
}
