// File: pinflow-core/src/api/mod.rs
//
// REST surface of the automation backend. Transport plumbing lives here;
// one file per endpoint group.

mod auth;
mod etsy;
mod pins;
mod pinterest;
mod products;

pub use etsy::OauthExchange;
pub use pinterest::PinterestConnect;

#[cfg(test)]
pub(crate) use etsy::MockOauthExchange;
#[cfg(test)]
pub(crate) use pinterest::MockPinterestConnect;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use pinflow_common::Error;

use crate::config::ClientConfig;
use crate::session::Session;

/// Error body the backend attaches to non-2xx responses.
#[derive(serde::Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

pub struct ApiClient {
    http: Client,
    base_url: Url,
    session: Session,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, session: Session) -> Result<Self, Error> {
        // A trailing slash makes Url::join treat the base as a directory.
        let base = config.api_base_url.trim_end_matches('/');
        let base_url = Url::parse(&format!("{base}/"))?;
        Ok(Self {
            http: Client::new(),
            base_url,
            session,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn endpoint(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    fn request(&self, method: Method, url: Url, authenticated: bool) -> RequestBuilder {
        let mut req = self.http.request(method, url);
        if authenticated {
            if let Some(token) = self.session.bearer() {
                req = req.bearer_auth(token);
            }
        }
        req
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, Error> {
        let resp = req.send().await.map_err(|e| Error::Network(e.to_string()))?;
        self.decode(resp).await
    }

    /// Maps the response: 401 tears the session down and fails the call
    /// as an auth error, other non-2xx surface the backend's `message`
    /// verbatim, 2xx decodes the JSON body.
    async fn decode<T: DeserializeOwned>(&self, resp: Response) -> Result<T, Error> {
        self.check_status(resp)
            .await?
            .json::<T>()
            .await
            .map_err(|e| Error::Remote(format!("malformed response body: {e}")))
    }

    async fn check_status(&self, resp: Response) -> Result<Response, Error> {
        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED {
            self.session.invalidate();
            return Err(Error::Auth("session expired or invalid (HTTP 401)".into()));
        }
        if !status.is_success() {
            let message = resp
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| format!("HTTP {status}"));
            return Err(Error::Remote(message));
        }
        Ok(resp)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.endpoint(path)?;
        debug!("GET {url}");
        self.send(self.request(Method::GET, url, true)).await
    }

    pub(crate) async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, Error>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        debug!("POST {url}");
        self.send(self.request(Method::POST, url, true).json(body))
            .await
    }

    /// POST with no request body (action endpoints).
    pub(crate) async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.endpoint(path)?;
        debug!("POST {url}");
        self.send(self.request(Method::POST, url, true)).await
    }

    pub(crate) async fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T, Error>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        debug!("PUT {url}");
        self.send(self.request(Method::PUT, url, true).json(body))
            .await
    }

    /// DELETE endpoints answer with an empty body; only the status matters.
    pub(crate) async fn delete(&self, path: &str) -> Result<(), Error> {
        let url = self.endpoint(path)?;
        debug!("DELETE {url}");
        let resp = self
            .request(Method::DELETE, url, true)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;
        self.check_status(resp).await?;
        Ok(())
    }

    /// Login/register run before a token exists.
    pub(crate) async fn post_json_unauthenticated<B, T>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        debug!("POST {url}");
        self.send(self.request(Method::POST, url, false).json(body))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base: &str) -> ClientConfig {
        ClientConfig {
            api_base_url: base.to_string(),
            ..ClientConfig::default()
        }
    }

    #[test]
    fn endpoint_joins_against_base_path() {
        let client = ApiClient::new(&config("http://localhost:5000/api"), Session::new()).unwrap();
        let url = client.endpoint("pinterest/status").unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/pinterest/status");
        // Leading slashes and trailing base slashes must not eat the /api
        // prefix.
        let url = client.endpoint("/products").unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/products");
    }

    #[test]
    fn rejects_unparseable_base_url() {
        assert!(ApiClient::new(&config("not a url"), Session::new()).is_err());
    }
}
