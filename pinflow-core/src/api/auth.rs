// File: pinflow-core/src/api/auth.rs

use pinflow_common::Error;
use pinflow_common::models::{AuthResponse, LoginRequest, RegisterRequest};

use super::ApiClient;

impl ApiClient {
    /// `POST /auth/login`. On success the session is established with the
    /// returned bearer token and account.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, Error> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(Error::Validation("email and password are required".into()));
        }
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let resp: AuthResponse = self.post_json_unauthenticated("auth/login", &body).await?;
        self.session()
            .establish(resp.token.clone(), Some(resp.user.clone()));
        Ok(resp)
    }

    /// `POST /auth/register`. Establishes the session like `login`.
    pub async fn register(&self, req: &RegisterRequest) -> Result<AuthResponse, Error> {
        if req.name.trim().is_empty() || req.email.trim().is_empty() || req.password.is_empty() {
            return Err(Error::Validation(
                "name, email and password are required".into(),
            ));
        }
        let resp: AuthResponse = self.post_json_unauthenticated("auth/register", req).await?;
        self.session()
            .establish(resp.token.clone(), Some(resp.user.clone()));
        Ok(resp)
    }
}
