// File: pinflow-common/src/models/connection.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Wire shape of `GET /pinterest/status`.
///
/// Produced exclusively by the status endpoint and replaced wholesale on
/// every fetch; nothing in the client mutates one in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionStatus {
    pub authenticated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authenticated_at: Option<DateTime<Utc>>,
}

/// Generic `{ success, message }` acknowledgement returned by the
/// mutation endpoints. `/pinterest/connect` additionally carries the
/// backend-side user id of the started authorization process.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ack {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// Pinterest account credentials, held in memory only for the duration of
/// the submit-then-connect sequence.
#[derive(Debug, Clone, Serialize)]
pub struct PinterestCredentials {
    pub email: String,
    pub password: String,
}

/// Body returned by `POST /etsy/exchange-token` on success: a summary of
/// what the backend imported once the shop was linked.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EtsyImport {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub products_imported: Option<u32>,
}
