// tests/common/mod.rs

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use pinflow_common::Error;
use pinflow_common::models::{Ack, ConnectionStatus, PinterestCredentials};
use pinflow_core::api::PinterestConnect;

/// Scripted stand-in for the backend's Pinterest endpoints: status
/// responses are played back in order, then the last-known default keeps
/// repeating. Call counts are recorded for the assertions.
pub struct ScriptedConnect {
    script: Mutex<VecDeque<Result<ConnectionStatus, Error>>>,
    pub status_calls: AtomicUsize,
    pub connect_calls: AtomicUsize,
    pub credential_calls: AtomicUsize,
}

impl ScriptedConnect {
    pub fn new(script: Vec<Result<ConnectionStatus, Error>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            status_calls: AtomicUsize::new(0),
            connect_calls: AtomicUsize::new(0),
            credential_calls: AtomicUsize::new(0),
        }
    }

    pub fn status_count(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }
}

pub fn not_authenticated() -> ConnectionStatus {
    ConnectionStatus {
        authenticated: false,
        authenticated_at: None,
    }
}

pub fn authenticated(ts: &str) -> ConnectionStatus {
    ConnectionStatus {
        authenticated: true,
        authenticated_at: Some(ts.parse().expect("test timestamp")),
    }
}

#[async_trait]
impl PinterestConnect for ScriptedConnect {
    async fn status(&self) -> Result<ConnectionStatus, Error> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        match self.script.lock().unwrap().pop_front() {
            Some(result) => result,
            None => Ok(not_authenticated()),
        }
    }

    async fn save_credentials(&self, credentials: &PinterestCredentials) -> Result<Ack, Error> {
        self.credential_calls.fetch_add(1, Ordering::SeqCst);
        if credentials.email.trim().is_empty() || credentials.password.is_empty() {
            return Err(Error::Validation(
                "please enter both email and password".into(),
            ));
        }
        Ok(Ack {
            success: true,
            message: "credentials saved".into(),
            user_id: None,
        })
    }

    async fn connect(&self) -> Result<Ack, Error> {
        self.connect_calls.fetch_add(1, Ordering::SeqCst);
        Ok(Ack {
            success: true,
            message: "browser opened".into(),
            user_id: Some("u-1".into()),
        })
    }
}
