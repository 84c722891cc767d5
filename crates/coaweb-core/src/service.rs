//! Accounts service: the banking backend the view reads from

use async_trait::async_trait;
use coaweb_config::ServiceConfig;
use reqwest::{Client, StatusCode};

use crate::error::{CoreError, CoreResult};
use crate::models::{AccountPage, AccountQuery};

/// Source of account records for a company
#[async_trait]
pub trait AccountsService: Send + Sync {
    async fn get_accounts(&self, company_id: &str, query: &AccountQuery) -> CoreResult<AccountPage>;
}

/// `AccountsService` over the backend's REST API
pub struct HttpAccountsService {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpAccountsService {
    pub fn new(config: &ServiceConfig) -> CoreResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| CoreError::ConfigError { message: e.to_string() })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone().filter(|t| !t.is_empty()),
        })
    }

    pub fn accounts_url(&self, company_id: &str) -> String {
        format!(
            "{}/companies/{}/accounts/",
            self.base_url,
            urlencoding::encode(company_id)
        )
    }
}

#[async_trait]
impl AccountsService for HttpAccountsService {
    async fn get_accounts(&self, company_id: &str, query: &AccountQuery) -> CoreResult<AccountPage> {
        let url = self.accounts_url(company_id);
        log::debug!("GET {} {:?}", url, query);

        let mut request = self.client.get(&url).query(&query.to_pairs());
        if let Some(ref token) = self.token {
            request = request.bearer_auth(token);
        }

        let resp = request
            .send()
            .await
            .map_err(|e| CoreError::fetch(transport_message(&e)))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(CoreError::fetch(error_message(status, &body)));
        }

        resp.json::<AccountPage>()
            .await
            .map_err(|e| CoreError::InvalidResponse { message: e.to_string() })
    }
}

fn transport_message(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "timeout".to_string()
    } else {
        error.to_string()
    }
}

/// Message for a non-2xx answer: the body's `detail`/`message` if present
pub(crate) fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            ["detail", "message"]
                .iter()
                .find_map(|key| value.get(*key).and_then(|v| v.as_str()).map(String::from))
        })
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}
