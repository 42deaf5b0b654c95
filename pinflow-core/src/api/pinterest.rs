// File: pinflow-core/src/api/pinterest.rs

use async_trait::async_trait;

use pinflow_common::Error;
use pinflow_common::models::{Ack, ConnectionStatus, PinDraft, PinterestCredentials};

use super::ApiClient;

/// The seam the connection poller drives. `ApiClient` is the production
/// implementation; tests substitute the generated mock or a scripted fake.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PinterestConnect: Send + Sync {
    /// One status fetch. No retry policy of its own; the caller decides
    /// the cadence.
    async fn status(&self) -> Result<ConnectionStatus, Error>;

    /// Store the user's Pinterest credentials ahead of a connect. Both
    /// fields must be non-empty before anything goes over the wire.
    async fn save_credentials(&self, credentials: &PinterestCredentials) -> Result<Ack, Error>;

    /// Ask the backend to start the out-of-band authorization flow.
    /// `success` means started, not authenticated; the caller must poll.
    async fn connect(&self) -> Result<Ack, Error>;
}

#[async_trait]
impl PinterestConnect for ApiClient {
    async fn status(&self) -> Result<ConnectionStatus, Error> {
        self.get_json("pinterest/status").await
    }

    async fn save_credentials(&self, credentials: &PinterestCredentials) -> Result<Ack, Error> {
        if credentials.email.trim().is_empty() || credentials.password.is_empty() {
            return Err(Error::Validation(
                "please enter both email and password".into(),
            ));
        }
        self.post_json("pinterest/credentials", credentials).await
    }

    async fn connect(&self) -> Result<Ack, Error> {
        self.post_empty("pinterest/connect").await
    }
}

impl ApiClient {
    /// `POST /pinterest/create-pin`: direct pin creation, bypassing the
    /// generation queue.
    pub async fn create_pin(&self, draft: &PinDraft) -> Result<Ack, Error> {
        self.post_json("pinterest/create-pin", draft).await
    }
}

#[cfg(test)]
mod tests {
    use crate::config::ClientConfig;
    use crate::session::Session;

    use super::*;

    #[tokio::test]
    async fn save_credentials_fails_fast_on_empty_input() {
        let cfg = ClientConfig {
            api_base_url: "http://127.0.0.1:1/api".into(),
            ..ClientConfig::default()
        };
        let client = ApiClient::new(&cfg, Session::new()).unwrap();

        for (email, password) in [("", "pw"), ("me@example.com", ""), ("   ", "pw")] {
            let creds = PinterestCredentials {
                email: email.into(),
                password: password.into(),
            };
            let err = client.save_credentials(&creds).await.unwrap_err();
            assert!(matches!(err, Error::Validation(_)), "got {err:?}");
        }
    }
}
