use std::time::Duration;

use serde::Deserialize;

use polex_report::{Policy, PolicyDetail};

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Authenticated client for the appliance REST API.
///
/// Token acquisition and the two fetch kinds are strictly sequential; there
/// is one token for the lifetime of the client.
#[derive(Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    client_id: String,
    client_secret: String,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl ApiClient {
    /// Build a client for the appliance named in the config.
    pub fn connect(config: &ClientConfig) -> Result<Self> {
        Self::with_endpoint(config, config.base_url())
    }

    /// Build a client against an explicit endpoint (tests point this at a
    /// mock server).
    pub fn with_endpoint(config: &ClientConfig, base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;

        Ok(ApiClient {
            http,
            base_url: base_url.into(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            token: None,
        })
    }

    /// Exchange the admin credentials for a bearer token (OAuth password
    /// grant against the appliance token endpoint).
    pub async fn authenticate(&mut self, username: &str, password: &str) -> Result<()> {
        let form = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("grant_type", "password"),
            ("username", username),
            ("password", password),
        ];

        let response = self
            .http
            .post(format!("{}/oauth/token", self.base_url))
            .form(&form)
            .send()
            .await?;
        let response = check_status(response).await?;

        let token: TokenResponse = response.json().await?;
        self.token = Some(token.access_token);
        tracing::debug!("acquired access token");
        Ok(())
    }

    /// Fetch the policy list.
    pub async fn fetch_policies(&self) -> Result<Vec<Policy>> {
        let response = self.get("/restAPI/policy", &[]).await?;
        Ok(response.json().await?)
    }

    /// Fetch the rules of one policy, keyed by its description. The endpoint
    /// answers with a list that carries exactly one policy object.
    pub async fn fetch_policy_rules(&self, description: &str) -> Result<PolicyDetail> {
        let response = self
            .get("/restAPI/ruleInfoFromPolicy", &[("policyDesc", description)])
            .await?;

        let mut details: Vec<PolicyDetail> = response.json().await?;
        if details.is_empty() {
            return Err(ClientError::EmptyRuleResponse(description.to_string()));
        }
        tracing::debug!(policy = description, rules = details[0].rules.len(), "fetched rules");
        Ok(details.remove(0))
    }

    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<reqwest::Response> {
        let token = self.token.as_deref().ok_or(ClientError::NotAuthenticated)?;

        let response = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .bearer_auth(token)
            .query(query)
            .send()
            .await?;
        check_status(response).await
    }
}

/// Turn any non-2xx status into an error carrying the response body.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await.unwrap_or_default();
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}
