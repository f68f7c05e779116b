//! Rise payments API client.
//!
//! [`RiseApi::connect`] signs in with the wallet (challenge, signature,
//! bearer token) and loads the payee directory once; after that the session
//! is read-only apart from batch submission.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

use crate::error::ApiError;
use crate::payment::{Payment, RiseId};
use crate::schema::{
    AuthChallenge, AuthToken, BatchPaymentMessage, BatchPaymentRequest, SignIn,
    SignedBatchPayment, Team, TeamMember, decode_envelope, status_error,
};
use crate::signer::Signer;

/// Operations the orchestrator needs from an authenticated session.
#[async_trait]
pub trait PaymentsApi: Send + Sync {
    /// RiseIds of every payee, one entry per team membership.
    fn allowed_recipients(&self) -> &[RiseId];

    fn get_payee(&self, rise_id: &RiseId) -> Result<&TeamMember, ApiError>;

    /// Build, sign and submit one batch covering all `payments`.
    async fn batch_payment(&self, payments: &[Payment]) -> Result<(), ApiError>;
}

#[derive(Debug, Clone)]
struct Endpoints {
    auth: String,
    teams: String,
    batch_pay: String,
}

impl Endpoints {
    fn new(api_base: &str) -> Self {
        let base = api_base.trim_end_matches('/');
        Self {
            auth: format!("{}/auth/api/siwe", base),
            // Listing teams requires the trailing slash.
            teams: format!("{}/teams/", base),
            batch_pay: format!("{}/payments/batch-pay", base),
        }
    }

    fn team_members(&self, team_id: &str) -> String {
        format!("{}{}/talent", self.teams, team_id)
    }
}

/// Authenticated session bound to one organization and one signer.
pub struct RiseApi<S> {
    http: reqwest::Client,
    endpoints: Endpoints,
    rise_id: RiseId,
    signer: S,
    token: String,
    payees: Vec<TeamMember>,
    allowed_recipients: Vec<RiseId>,
}

impl<S: Signer> RiseApi<S> {
    /// Sign in and load the payee directory.
    pub async fn connect(
        api_base: &str,
        rise_id: RiseId,
        signer: S,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| ApiError::Transport {
                method: "BUILD".to_string(),
                url: api_base.to_string(),
                source,
            })?;

        let mut api = Self {
            http,
            endpoints: Endpoints::new(api_base),
            rise_id,
            signer,
            token: String::new(),
            payees: Vec::new(),
            allowed_recipients: Vec::new(),
        };

        api.authenticate().await?;
        api.load_payees().await?;
        Ok(api)
    }

    async fn authenticate(&mut self) -> Result<(), ApiError> {
        let wallet = self.signer.account().to_string();

        let url = self.endpoints.auth.clone();
        let challenge: AuthChallenge = self
            .send(Method::GET, &url, false, |b| b.query(&[("wallet", wallet.as_str())]))
            .await?;

        tracing::info!("Sign message to sign in");
        let signature = self.signer.sign(&challenge.message).await?;

        let body = SignIn {
            wallet: &wallet,
            message: &challenge.message,
            signature: &signature,
        };
        let token: AuthToken = self.send(Method::POST, &url, false, |b| b.json(&body)).await?;

        self.token = token.token;
        tracing::info!(wallet = %wallet, entity = %self.rise_id, "Signed in to Rise");
        Ok(())
    }

    async fn load_payees(&mut self) -> Result<(), ApiError> {
        let mut payees = Vec::new();
        for team in self.get_teams().await? {
            let members = self.get_team_members(&team.id).await?;
            tracing::debug!(team = %team.name, members = members.len(), "Loaded team");
            payees.extend(members);
        }

        self.allowed_recipients = payees.iter().map(|p| p.rise_id.clone()).collect();
        self.payees = payees;
        tracing::info!(payees = self.payees.len(), "Payee directory loaded");
        Ok(())
    }

    pub async fn get_teams(&self) -> Result<Vec<Team>, ApiError> {
        self.send(Method::GET, &self.endpoints.teams, true, |b| b)
            .await
    }

    pub async fn get_team_members(&self, team_id: &str) -> Result<Vec<TeamMember>, ApiError> {
        let url = self.endpoints.team_members(team_id);
        self.send(Method::GET, &url, true, |b| b).await
    }

    /// Members of every team, in directory order.
    pub fn payees(&self) -> &[TeamMember] {
        &self.payees
    }

    pub fn rise_id(&self) -> &RiseId {
        &self.rise_id
    }

    async fn send<T, F>(&self, method: Method, url: &str, auth: bool, build: F) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        F: FnOnce(RequestBuilder) -> RequestBuilder,
    {
        let mut builder = self
            .http
            .request(method.clone(), url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json");
        if auth {
            builder = builder.bearer_auth(&self.token);
        }

        let transport = |source: reqwest::Error| ApiError::Transport {
            method: method.to_string(),
            url: url.to_string(),
            source,
        };

        let response = build(builder).send().await.map_err(transport)?;
        let status = response.status();
        let body = response.bytes().await.map_err(transport)?;

        if !status.is_success() {
            tracing::debug!(%method, url, %status, "Request failed");
            return Err(status_error(method.as_str(), url, &body));
        }

        decode_envelope(&body)
    }
}

#[async_trait]
impl<S: Signer> PaymentsApi for RiseApi<S> {
    fn allowed_recipients(&self) -> &[RiseId] {
        &self.allowed_recipients
    }

    fn get_payee(&self, rise_id: &RiseId) -> Result<&TeamMember, ApiError> {
        find_payee(&self.payees, rise_id)
    }

    async fn batch_payment(&self, payments: &[Payment]) -> Result<(), ApiError> {
        let url = &self.endpoints.batch_pay;
        let wallet = self.signer.account().to_string();
        let batch = BatchPaymentRequest::new(&wallet, &self.rise_id, payments)?;

        let typed_data: Value = self.send(Method::PUT, url, true, |b| b.json(&batch)).await?;
        let message = BatchPaymentMessage::from_typed_data(typed_data)?;

        tracing::info!(
            payments = payments.len(),
            total = %batch.total_amount,
            "Sign transaction to send batch payment"
        );
        let signature = self.signer.sign_typed(message.typed_data()).await?;

        let signed = SignedBatchPayment {
            batch: &batch,
            request: message.message(),
            signature: &signature,
        };
        let _: Value = self.send(Method::POST, url, true, |b| b.json(&signed)).await?;

        tracing::info!("Batch payment submitted");
        Ok(())
    }
}

fn find_payee<'a>(payees: &'a [TeamMember], rise_id: &RiseId) -> Result<&'a TeamMember, ApiError> {
    payees
        .iter()
        .find(|p| &p.rise_id == rise_id)
        .ok_or_else(|| ApiError::PayeeNotFound(rise_id.clone()))
}
