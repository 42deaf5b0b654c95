// File: pinflow-core/src/connect/poller.rs

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use pinflow_common::Error;
use pinflow_common::models::{ConnectionStatus, PinterestCredentials};

use super::ConnectState;
use crate::api::PinterestConnect;
use crate::config::ClientConfig;

const WAITING_NOTICE: &str =
    "Browser window opened. Complete the login there; waiting for the connection...";
const CONNECTED_NOTICE: &str = "Pinterest account connected successfully!";
const TIMEOUT_NOTICE: &str = "Connection timeout. Please try connecting again.";

/// Timer knobs for one poller. Defaults match the reference behavior:
/// 3 s cadence, 5 min deadline, 5 s notice lifetime.
#[derive(Debug, Clone)]
pub struct PollerSettings {
    pub interval: Duration,
    pub deadline: Duration,
    pub notice_ttl: Duration,
}

impl Default for PollerSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3),
            deadline: Duration::from_secs(300),
            notice_ttl: Duration::from_secs(5),
        }
    }
}

impl From<&ClientConfig> for PollerSettings {
    fn from(cfg: &ClientConfig) -> Self {
        Self {
            interval: cfg.poll_interval,
            deadline: cfg.connect_deadline,
            notice_ttl: cfg.notice_ttl,
        }
    }
}

/// One running attempt: the task multiplexing the poll tick and the
/// deadline, plus when it started. At most one exists per poller.
struct PollSession {
    handle: JoinHandle<()>,
    started_at: Instant,
}

/// Everything the poll task and the poller both touch: the observable
/// channels and the cosmetic-notice timer slot.
struct Shared {
    state: watch::Sender<ConnectState>,
    status: watch::Sender<Option<ConnectionStatus>>,
    notice: watch::Sender<Option<String>>,
    notice_timer: Mutex<Option<JoinHandle<()>>>,
    notice_ttl: Duration,
}

impl Shared {
    /// One-way latch out of `Connecting`. Returns false when another
    /// event already settled the attempt; the caller's result is stale
    /// and must be discarded.
    fn settle(&self, next: ConnectState) -> bool {
        let mut latched = false;
        self.state.send_if_modified(|s| {
            if s.is_connecting() {
                *s = next.clone();
                latched = true;
                true
            } else {
                false
            }
        });
        latched
    }

    /// Authentication may also be observed out of band (mount-time
    /// check), i.e. while no attempt is running.
    fn latch_authenticated(&self, authenticated_at: Option<DateTime<Utc>>) -> bool {
        let mut latched = false;
        self.state.send_if_modified(|s| {
            if matches!(s, ConnectState::Idle | ConnectState::Connecting) {
                *s = ConnectState::Authenticated { authenticated_at };
                latched = true;
                true
            } else {
                false
            }
        });
        latched
    }

    /// Put a notice up, dropping any pending auto-clear.
    fn set_notice(&self, text: impl Into<String>) {
        if let Some(timer) = self.notice_timer.lock().take() {
            timer.abort();
        }
        self.notice.send_replace(Some(text.into()));
    }

    /// Put a notice up and let it clear itself. Display-only; carries no
    /// state.
    fn set_transient_notice(&self, text: impl Into<String>) {
        self.set_notice(text);
        let notice = self.notice.clone();
        let ttl = self.notice_ttl;
        let handle = tokio::spawn(async move {
            time::sleep(ttl).await;
            notice.send_replace(None);
        });
        *self.notice_timer.lock() = Some(handle);
    }
}

/// Drives one connection attempt: repeated status checks on a fixed
/// interval, a one-shot wall-clock deadline, and a one-way latch into a
/// terminal state. Owns every timer it creates; dropping the poller (the
/// consuming view going away) cancels anything still scheduled.
pub struct ConnectionPoller {
    api: Arc<dyn PinterestConnect>,
    settings: PollerSettings,
    shared: Arc<Shared>,
    session: Mutex<Option<PollSession>>,
}

impl ConnectionPoller {
    pub fn new(api: Arc<dyn PinterestConnect>, settings: PollerSettings) -> Self {
        let (state, _) = watch::channel(ConnectState::Idle);
        let (status, _) = watch::channel(None);
        let (notice, _) = watch::channel(None);
        let notice_ttl = settings.notice_ttl;
        Self {
            api,
            settings,
            shared: Arc::new(Shared {
                state,
                status,
                notice,
                notice_timer: Mutex::new(None),
                notice_ttl,
            }),
            session: Mutex::new(None),
        }
    }

    pub fn state(&self) -> watch::Receiver<ConnectState> {
        self.shared.state.subscribe()
    }

    pub fn current_state(&self) -> ConnectState {
        self.shared.state.borrow().clone()
    }

    /// Last status the backend reported, kept for display. Replaced
    /// wholesale on every fetch.
    pub fn last_status(&self) -> watch::Receiver<Option<ConnectionStatus>> {
        self.shared.status.subscribe()
    }

    /// Cosmetic one-line notice for the consuming view.
    pub fn notice(&self) -> watch::Receiver<Option<String>> {
        self.shared.notice.subscribe()
    }

    /// Out-of-band status check (view mount). Refreshes the display
    /// cache; if the account is already authenticated, latches and stops
    /// any running attempt.
    pub async fn check_now(&self) -> Result<ConnectionStatus, Error> {
        let status = self.api.status().await?;
        self.shared.status.send_replace(Some(status.clone()));
        if status.authenticated && self.shared.latch_authenticated(status.authenticated_at) {
            self.cancel_poll_session();
            self.shared.set_transient_notice(CONNECTED_NOTICE);
        }
        Ok(status)
    }

    /// Submit credentials, then start a connection attempt. Validation
    /// failures and backend rejections surface before anything is
    /// scheduled; the credentials are gone once the connect call goes
    /// out.
    pub async fn connect_with_credentials(
        &self,
        credentials: PinterestCredentials,
    ) -> Result<(), Error> {
        self.ensure_not_connecting()?;
        self.api.save_credentials(&credentials).await?;
        drop(credentials);
        self.connect().await
    }

    /// Start a connection attempt: ask the backend to begin the external
    /// authorization, then poll until a terminal state. Fails with
    /// [`Error::AlreadyInProgress`] while an attempt is running.
    pub async fn connect(&self) -> Result<(), Error> {
        self.ensure_not_connecting()?;
        let ack = self.api.connect().await?;
        if !ack.success {
            let message = if ack.message.is_empty() {
                "connection was not accepted".to_string()
            } else {
                ack.message
            };
            return Err(Error::Remote(message));
        }
        self.start_poll_session();
        Ok(())
    }

    fn ensure_not_connecting(&self) -> Result<(), Error> {
        // `cancel()` empties the slot, so a torn-down poller may connect
        // again even though the stale state still reads `Connecting`.
        if self.session.lock().is_some() && self.shared.state.borrow().is_connecting() {
            return Err(Error::AlreadyInProgress);
        }
        Ok(())
    }

    fn start_poll_session(&self) {
        let mut slot = self.session.lock();
        // A finished attempt may still occupy the slot.
        if let Some(prev) = slot.take() {
            prev.handle.abort();
        }
        self.shared.state.send_replace(ConnectState::Connecting);
        self.shared.set_notice(WAITING_NOTICE);

        let api = Arc::clone(&self.api);
        let shared = Arc::clone(&self.shared);
        let interval = self.settings.interval;
        let deadline = self.settings.deadline;
        let handle = tokio::spawn(poll_loop(api, shared, interval, deadline));
        *slot = Some(PollSession {
            handle,
            started_at: Instant::now(),
        });
        info!(
            "connection attempt started; polling every {:?} for up to {:?}",
            interval, deadline
        );
    }

    /// Cancel whatever the poller has scheduled (view unmount). The
    /// state is left as-is; safe to call at any time.
    pub fn cancel(&self) {
        self.cancel_poll_session();
        if let Some(timer) = self.shared.notice_timer.lock().take() {
            timer.abort();
        }
    }

    fn cancel_poll_session(&self) {
        if let Some(session) = self.session.lock().take() {
            session.handle.abort();
            debug!(
                "poll session cancelled after {:?}",
                session.started_at.elapsed()
            );
        }
    }
}

impl Drop for ConnectionPoller {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// One attempt's loop. The recurring tick and the one-shot deadline are
/// multiplexed here; whichever settles the attempt ends the task, which
/// cancels the other. The deadline is wall-clock from attempt start and
/// ignores how individual ticks fared.
async fn poll_loop(
    api: Arc<dyn PinterestConnect>,
    shared: Arc<Shared>,
    interval: Duration,
    deadline: Duration,
) {
    let mut ticker = time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // interval() yields immediately; the cadence starts one interval
    // after the attempt begins.
    ticker.tick().await;

    let timeout = time::sleep(deadline);
    tokio::pin!(timeout);

    loop {
        tokio::select! {
            // On a tie, the deadline wins.
            biased;

            _ = &mut timeout => {
                if shared.settle(ConnectState::TimedOut) {
                    shared.set_notice(TIMEOUT_NOTICE);
                    info!("connection attempt timed out after {:?}", deadline);
                }
                return;
            }
            _ = ticker.tick() => {
                if !shared.state.borrow().is_connecting() {
                    // Something else settled the attempt; any result we
                    // could fetch now is stale.
                    return;
                }
                match api.status().await {
                    Ok(status) => {
                        shared.status.send_replace(Some(status.clone()));
                        if status.authenticated {
                            if shared.latch_authenticated(status.authenticated_at) {
                                shared.set_transient_notice(CONNECTED_NOTICE);
                                info!("account authenticated; polling stopped");
                            }
                            return;
                        }
                        debug!("not authenticated yet; still waiting");
                    }
                    Err(Error::Auth(message)) => {
                        // Session died under us; no point polling on.
                        if shared.settle(ConnectState::Failed { message: message.clone() }) {
                            shared.set_notice(format!("Connection failed: {message}"));
                        }
                        return;
                    }
                    Err(e) => {
                        // Transient blips and backend hiccups keep the
                        // fixed cadence; the deadline still applies.
                        warn!("status check failed, will retry: {e}");
                    }
                }
            }
        }
    }
}
