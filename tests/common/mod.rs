//! In-process stand-ins for the Rise API and the Frame signer.

#![allow(dead_code)]

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use std::collections::{HashMap, VecDeque};
use std::io;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rise_batch_pay::{Config, Confirm, RiseId, SignerConfig};

pub const WALLET: &str = "0x1111111111111111111111111111111111111111";
pub const TOKEN: &str = "tok-123";
pub const ENTITY: &str = "0xEeEeEeEeEeEeEeEeEeEeEeEeEeEeEeEeEeEeEeEe";
pub const ALICE: &str = "0xAbCdEf0123456789aBcDeF0123456789aBCDeF01";
pub const BOB: &str = "0x00000000000000000000000000000000000000b0";
pub const STRANGER: &str = "0x000000000000000000000000000000000000dead";

/// Everything the fake servers were asked to do.
#[derive(Default)]
pub struct Recorded {
    pub rpc_methods: Vec<String>,
    pub signed_typed: Vec<Value>,
    pub sign_in: Option<Value>,
    pub batch_put: Option<Value>,
    pub batch_post: Option<Value>,
    pub fail_submit: bool,
    /// Answer `eth_accounts` with no unlocked account.
    pub no_accounts: bool,
}

pub type Shared = Arc<Mutex<Recorded>>;

pub struct MockServer {
    pub addr: SocketAddr,
    pub state: Shared,
}

impl MockServer {
    pub async fn start() -> Self {
        let state: Shared = Arc::default();

        let app = Router::new()
            .route("/rpc", post(rpc))
            .route("/v1/auth/api/siwe", get(challenge).post(sign_in))
            .route("/v1/teams/", get(teams))
            .route("/v1/teams/{id}/talent", get(talent))
            .route("/v1/payments/batch-pay", axum::routing::put(build_batch).post(submit_batch))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock server");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve mock");
        });

        Self { addr, state }
    }

    pub fn api_base(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    pub fn signer_config(&self) -> SignerConfig {
        SignerConfig {
            url: format!("http://{}/rpc", self.addr),
            timeout: Duration::from_secs(5),
        }
    }

    pub fn config(&self) -> Config {
        Config {
            entity: RiseId::new(ENTITY),
            api_base: self.api_base(),
            http_timeout: Duration::from_secs(5),
            signer: self.signer_config(),
        }
    }

    pub fn recorded(&self) -> std::sync::MutexGuard<'_, Recorded> {
        self.state.lock().expect("state lock")
    }
}

/// Operator answers replayed in order; running out is an error.
pub struct Scripted {
    answers: VecDeque<bool>,
    pub asked: Vec<String>,
}

impl Scripted {
    pub fn new(answers: &[bool]) -> Self {
        Self {
            answers: answers.iter().copied().collect(),
            asked: Vec::new(),
        }
    }
}

impl Confirm for Scripted {
    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        self.asked.push(question.to_string());
        self.answers
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no scripted answer"))
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {}", TOKEN))
}

fn unauthorized() -> (StatusCode, Json<Value>) {
    (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Invalid token" })))
}

async fn rpc(State(state): State<Shared>, Json(req): Json<Value>) -> Json<Value> {
    let method = req["method"].as_str().unwrap_or_default().to_string();
    let mut recorded = state.lock().unwrap();
    recorded.rpc_methods.push(method.clone());

    let result = match method.as_str() {
        "web3_clientVersion" => json!("Frame/v0.6.9"),
        "eth_accounts" if recorded.no_accounts => json!([]),
        "eth_accounts" => json!([WALLET]),
        "eth_sign" => json!("0xsig-login"),
        "eth_signTypedData_v4" => {
            recorded.signed_typed.push(req["params"][1].clone());
            json!("0xsig-batch")
        }
        _ => {
            return Json(json!({
                "jsonrpc": "2.0",
                "id": req["id"],
                "error": { "code": -32601, "message": "Method not found" }
            }));
        }
    };

    Json(json!({ "jsonrpc": "2.0", "id": req["id"], "result": result }))
}

async fn challenge(Query(query): Query<HashMap<String, String>>) -> (StatusCode, Json<Value>) {
    if query.get("wallet").map(String::as_str) != Some(WALLET) {
        return (StatusCode::BAD_REQUEST, Json(json!({ "message": "Unknown wallet" })));
    }
    (StatusCode::OK, Json(json!({ "data": { "message": "Sign in to Rise" } })))
}

async fn sign_in(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    state.lock().unwrap().sign_in = Some(body);
    Json(json!({ "data": { "token": TOKEN } }))
}

async fn teams(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return unauthorized();
    }
    (
        StatusCode::OK,
        Json(json!({ "data": [
            { "id": "t1", "name": "Engineering", "riseId": "0x00000000000000000000000000000000000000e1" },
            { "id": "t2", "name": "Design", "riseId": "0x00000000000000000000000000000000000000e2" }
        ] })),
    )
}

async fn talent(Path(id): Path<String>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return unauthorized();
    }
    let members = match id.as_str() {
        "t1" => json!([
            { "id": "m1", "alias": null, "firstname": "Alice", "middlename": "", "lastname": "Liddell", "riseId": ALICE },
            { "id": "m2", "alias": "bob", "firstname": "Bob", "middlename": null, "lastname": "Builder", "riseId": BOB }
        ]),
        "t2" => json!([
            { "id": "m1", "alias": null, "firstname": "Alice", "middlename": "", "lastname": "Liddell", "riseId": ALICE }
        ]),
        _ => return (StatusCode::NOT_FOUND, Json(json!({ "message": "Team not found" }))),
    };
    (StatusCode::OK, Json(json!({ "data": members })))
}

async fn build_batch(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return unauthorized();
    }
    let total = body["total_amount"].clone();
    state.lock().unwrap().batch_put = Some(body);

    (
        StatusCode::OK,
        Json(json!({ "data": {
            "types": { "BatchPayment": [{ "name": "total", "type": "uint256" }] },
            "primaryType": "BatchPayment",
            "domain": { "name": "Rise", "chainId": 42161 },
            "message": { "total": total, "nonce": "7" }
        } })),
    )
}

async fn submit_batch(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut recorded = state.lock().unwrap();
    recorded.batch_post = Some(body);
    if recorded.fail_submit {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "Insufficient funds" })),
        );
    }
    (StatusCode::OK, Json(json!({ "data": { "status": "submitted" } })))
}

/// Address on which nothing is listening.
pub async fn closed_port_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind probe");
    let addr = listener.local_addr().expect("probe addr");
    drop(listener);
    format!("http://{}/rpc", addr)
}
