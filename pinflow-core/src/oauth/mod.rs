// File: pinflow-core/src/oauth/mod.rs

pub mod callback_server;

pub use callback_server::{CallbackListener, CallbackParams};

use std::time::Duration;

use tracing::info;

use pinflow_common::Error;
use pinflow_common::models::EtsyImport;

use crate::api::{ApiClient, OauthExchange};

/// What became of one redirect back from the provider.
#[derive(Debug)]
pub enum CallbackOutcome {
    /// Code and state exchanged; the shop is linked and an import
    /// summary came back. Consumers switch to their products view.
    Connected(EtsyImport),
    /// The provider reported an error (e.g. the user denied access).
    /// The exchange endpoint is never called.
    Denied { error: String },
    /// The backend rejected the exchange.
    Failed { message: String },
    /// The redirect carried no usable parameter pair.
    Ignored,
}

/// Process one redirect. `params` is consumed by value: once handled,
/// the same redirect has nothing left to reprocess, whatever the
/// outcome.
pub async fn handle_callback(
    exchange: &dyn OauthExchange,
    params: CallbackParams,
) -> CallbackOutcome {
    if let Some(error) = params.error {
        return CallbackOutcome::Denied { error };
    }
    match (params.code, params.state) {
        (Some(code), Some(state)) => match exchange.exchange_token(&code, &state).await {
            Ok(import) => {
                info!("oauth exchange complete");
                CallbackOutcome::Connected(import)
            }
            Err(e) => CallbackOutcome::Failed {
                message: e.to_string(),
            },
        },
        _ => CallbackOutcome::Ignored,
    }
}

/// Run the whole Etsy connection: bind the loopback listener, fetch the
/// provider URL, hand it to `open_url` (browser launch), await the
/// redirect, then exchange.
pub async fn connect_etsy(
    api: &ApiClient,
    callback_port: u16,
    wait: Duration,
    open_url: impl FnOnce(&str) -> Result<(), Error>,
) -> Result<CallbackOutcome, Error> {
    let listener = CallbackListener::bind(callback_port).await?;
    let url = api.etsy_authorize_url().await?;
    open_url(&url)?;
    let params = listener.wait(wait).await?;
    Ok(handle_callback(api, params).await)
}

#[cfg(test)]
mod tests {
    use crate::api::MockOauthExchange;

    use super::*;

    #[tokio::test]
    async fn provider_error_never_reaches_the_exchange() {
        // No expectations: any exchange call panics the mock.
        let exchange = MockOauthExchange::new();
        let params = CallbackParams {
            code: None,
            state: None,
            error: Some("access_denied".into()),
        };
        let outcome = handle_callback(&exchange, params).await;
        assert!(matches!(
            outcome,
            CallbackOutcome::Denied { ref error } if error == "access_denied"
        ));
    }

    #[tokio::test]
    async fn code_and_state_are_exchanged_verbatim() {
        let mut exchange = MockOauthExchange::new();
        exchange
            .expect_exchange_token()
            .withf(|code, state| code == "the-code" && state == "the-state")
            .times(1)
            .returning(|_, _| Ok(EtsyImport::default()));

        let params = CallbackParams {
            code: Some("the-code".into()),
            state: Some("the-state".into()),
            error: None,
        };
        let outcome = handle_callback(&exchange, params).await;
        assert!(matches!(outcome, CallbackOutcome::Connected(_)));
    }

    #[tokio::test]
    async fn rejected_exchange_surfaces_the_backend_message() {
        let mut exchange = MockOauthExchange::new();
        exchange
            .expect_exchange_token()
            .times(1)
            .returning(|_, _| Err(Error::Remote("state mismatch".into())));

        let params = CallbackParams {
            code: Some("c".into()),
            state: Some("s".into()),
            error: None,
        };
        let outcome = handle_callback(&exchange, params).await;
        assert!(matches!(
            outcome,
            CallbackOutcome::Failed { ref message } if message.contains("state mismatch")
        ));
    }

    #[tokio::test]
    async fn incomplete_pair_is_ignored() {
        let exchange = MockOauthExchange::new();
        let params = CallbackParams {
            code: Some("c".into()),
            state: None,
            error: None,
        };
        let outcome = handle_callback(&exchange, params).await;
        assert!(matches!(outcome, CallbackOutcome::Ignored));
    }
}
