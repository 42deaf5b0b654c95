// File: pinflow-core/src/oauth/callback_server.rs

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::Html,
    routing::get,
};
use axum_server::Handle;
use serde::Deserialize;
use tokio::sync::{Mutex, oneshot};
use tokio::time;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use url::Url;

use pinflow_common::Error;

/// Parameters the provider sends back on the redirect. Extracted once
/// per redirect and consumed by value exactly once.
#[derive(Debug, Clone, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

impl CallbackParams {
    /// Pull the OAuth parameters out of a redirect URL. `None` when the
    /// URL carries none of them (nothing to process).
    pub fn from_redirect_url(url: &Url) -> Option<Self> {
        let mut params = Self {
            code: None,
            state: None,
            error: None,
        };
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "code" => params.code = Some(value.into_owned()),
                "state" => params.state = Some(value.into_owned()),
                "error" => params.error = Some(value.into_owned()),
                _ => {}
            }
        }
        if params.code.is_none() && params.state.is_none() && params.error.is_none() {
            None
        } else {
            Some(params)
        }
    }
}

/// Shared state for the axum callback route. The first redirect takes
/// the sender; later hits find it gone.
#[derive(Clone)]
struct CallbackServerState {
    done_tx: Arc<Mutex<Option<oneshot::Sender<CallbackParams>>>>,
}

/// A loopback HTTP listener waiting for the provider to redirect the
/// user's browser back with `code`/`state` (or `error`).
pub struct CallbackListener {
    done_rx: oneshot::Receiver<CallbackParams>,
    shutdown_tx: oneshot::Sender<()>,
    addr: SocketAddr,
}

impl CallbackListener {
    /// Bind `127.0.0.1:port` and start serving `/callback`. Port 0 picks
    /// a free port; `addr()` reports the real one.
    pub async fn bind(port: u16) -> Result<Self, Error> {
        let (done_tx, done_rx) = oneshot::channel::<CallbackParams>();
        let done_tx = Arc::new(Mutex::new(Some(done_tx)));
        let state = CallbackServerState { done_tx };

        let app = Router::new()
            .route("/callback", get(handle_callback))
            .with_state(state)
            .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let requested = SocketAddr::from(([127, 0, 0, 1], port));

        let handle = Handle::new();
        let handle_clone = handle.clone();
        tokio::spawn(async move {
            let _ = shutdown_rx.await;
            handle_clone.graceful_shutdown(Some(Duration::from_secs(1)));
        });

        let server = axum_server::bind(requested)
            .handle(handle.clone())
            .serve(app.into_make_service());
        tokio::spawn(async move {
            if let Err(e) = server.await {
                error!("callback listener error: {e}");
            }
        });

        let addr = handle.listening().await.ok_or_else(|| {
            Error::Network(format!("could not bind callback listener on {requested}"))
        })?;
        info!("OAuth callback listener on http://{addr}/callback");

        Ok(Self {
            done_rx,
            shutdown_tx,
            addr,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Wait for the redirect, up to `timeout`. The listener shuts down
    /// either way.
    pub async fn wait(self, timeout: Duration) -> Result<CallbackParams, Error> {
        let result = time::timeout(timeout, self.done_rx).await;
        let _ = self.shutdown_tx.send(());
        match result {
            Ok(Ok(params)) => Ok(params),
            Ok(Err(_)) => Err(Error::Network(
                "callback listener closed before a redirect arrived".into(),
            )),
            Err(_) => Err(Error::Timeout),
        }
    }
}

async fn handle_callback(
    State(state): State<CallbackServerState>,
    Query(query): Query<CallbackParams>,
) -> (StatusCode, Html<String>) {
    let provider_error = query.error.clone();
    if let Some(tx) = state.done_tx.lock().await.take() {
        let _ = tx.send(query);
    }

    if let Some(err) = provider_error {
        let msg = format!(
            "<h2>Authorization Error</h2><p>{err}</p><p>You can close this window.</p>"
        );
        return (StatusCode::OK, Html(msg));
    }

    let success = r#"
<h2>Authorization Complete</h2>
<p>We've got your code. You can close this window now.</p>
<script>
  window.onload = function() {
      window.open('about:blank', '_self');
      window.close();
  };
</script>
"#;
    (StatusCode::OK, Html(success.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_params_from_redirect_url() {
        let url = Url::parse("http://127.0.0.1:9876/callback?code=abc&state=xyz").unwrap();
        let params = CallbackParams::from_redirect_url(&url).expect("params present");
        assert_eq!(params.code.as_deref(), Some("abc"));
        assert_eq!(params.state.as_deref(), Some("xyz"));
        assert_eq!(params.error, None);
    }

    #[test]
    fn extracts_provider_error() {
        let url = Url::parse("http://127.0.0.1:9876/callback?error=access_denied").unwrap();
        let params = CallbackParams::from_redirect_url(&url).expect("params present");
        assert_eq!(params.error.as_deref(), Some("access_denied"));
        assert_eq!(params.code, None);
    }

    #[test]
    fn url_without_oauth_params_yields_nothing() {
        let url = Url::parse("http://127.0.0.1:9876/dashboard?tab=products").unwrap();
        assert!(CallbackParams::from_redirect_url(&url).is_none());
    }
}
