// File: pinflow-core/src/api/etsy.rs

use async_trait::async_trait;
use serde::Deserialize;

use pinflow_common::Error;
use pinflow_common::models::EtsyImport;

use super::ApiClient;

#[derive(Deserialize)]
struct AuthUrlBody {
    url: String,
}

/// Exchange seam used by the OAuth callback handler.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OauthExchange: Send + Sync {
    /// `POST /etsy/exchange-token`. `state` goes back verbatim; the
    /// backend generated it and validates the round trip.
    async fn exchange_token(&self, code: &str, state: &str) -> Result<EtsyImport, Error>;
}

#[async_trait]
impl OauthExchange for ApiClient {
    async fn exchange_token(&self, code: &str, state: &str) -> Result<EtsyImport, Error> {
        let body = serde_json::json!({ "code": code, "state": state });
        self.post_json("etsy/exchange-token", &body).await
    }
}

impl ApiClient {
    /// `GET /etsy/auth`: the provider authorization URL to send the
    /// user's browser to. The `state` parameter is already embedded.
    pub async fn etsy_authorize_url(&self) -> Result<String, Error> {
        let body: AuthUrlBody = self.get_json("etsy/auth").await?;
        Ok(body.url)
    }
}
