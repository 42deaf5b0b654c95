// tests/connect_flow.rs
//
// End-to-end connection attempts against a scripted backend, driven on
// the paused test clock.

mod common;

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use tokio::time::{self, Instant};

use common::{ScriptedConnect, authenticated, not_authenticated};
use pinflow_common::Error;
use pinflow_common::models::PinterestCredentials;
use pinflow_core::connect::{ConnectState, ConnectionPoller, PollerSettings};

fn credentials() -> PinterestCredentials {
    PinterestCredentials {
        email: "shop@example.com".into(),
        password: "hunter2".into(),
    }
}

#[tokio::test(start_paused = true)]
async fn submit_connect_poll_until_authenticated() {
    let api = Arc::new(ScriptedConnect::new(vec![
        Ok(not_authenticated()),
        Ok(not_authenticated()),
        Ok(not_authenticated()),
        Ok(authenticated("2024-01-01T00:00:00Z")),
    ]));
    let poller = ConnectionPoller::new(api.clone(), PollerSettings::default());
    let mut state_rx = poller.state();
    let started = Instant::now();

    poller
        .connect_with_credentials(credentials())
        .await
        .expect("submit + connect accepted");
    assert_eq!(api.credential_calls.load(Ordering::SeqCst), 1);
    assert_eq!(api.connect_calls.load(Ordering::SeqCst), 1);

    let state = state_rx
        .wait_for(|s| s.is_terminal())
        .await
        .expect("poller alive")
        .clone();
    assert!(matches!(state, ConnectState::Authenticated { .. }));
    assert_eq!(started.elapsed(), Duration::from_secs(12));
    assert_eq!(api.status_count(), 4);

    // Nothing keeps polling after the latch.
    time::advance(Duration::from_secs(60)).await;
    assert_eq!(api.status_count(), 4);
}

#[tokio::test(start_paused = true)]
async fn five_minutes_of_nothing_times_out() {
    let api = Arc::new(ScriptedConnect::new(Vec::new()));
    let poller = ConnectionPoller::new(api.clone(), PollerSettings::default());
    let mut state_rx = poller.state();
    let started = Instant::now();

    poller.connect().await.expect("connect accepted");
    let state = state_rx
        .wait_for(|s| s.is_terminal())
        .await
        .expect("poller alive")
        .clone();

    assert_eq!(state, ConnectState::TimedOut);
    assert_eq!(started.elapsed(), Duration::from_secs(300));
    // Ticks at 3, 6, ..., 297; the deadline wins the tie at 300.
    assert_eq!(api.status_count(), 99);

    let polled = api.status_count();
    time::advance(Duration::from_secs(60)).await;
    assert_eq!(api.status_count(), polled);
}

#[tokio::test(start_paused = true)]
async fn empty_credentials_never_reach_the_wire() {
    let api = Arc::new(ScriptedConnect::new(Vec::new()));
    let poller = ConnectionPoller::new(api.clone(), PollerSettings::default());

    let err = poller
        .connect_with_credentials(PinterestCredentials {
            email: String::new(),
            password: "pw".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)), "got {err:?}");
    // The scripted fake validates before anything else, so the connect
    // endpoint was never touched.
    assert_eq!(api.connect_calls.load(Ordering::SeqCst), 0);
    assert_eq!(poller.current_state(), ConnectState::Idle);
}

#[tokio::test(start_paused = true)]
async fn cancel_mid_attempt_stops_all_polling() {
    let api = Arc::new(ScriptedConnect::new(Vec::new()));
    let poller = ConnectionPoller::new(api.clone(), PollerSettings::default());
    let mut status_rx = poller.last_status();

    poller.connect().await.expect("connect accepted");
    status_rx.changed().await.expect("first tick");
    let polled = api.status_count();

    poller.cancel();
    time::advance(Duration::from_secs(600)).await;
    assert_eq!(api.status_count(), polled);
    // Cancellation is teardown, not a transition; the attempt's state is
    // left as it was, but nothing is running any more, so a new attempt
    // is allowed.
    assert_eq!(poller.current_state(), ConnectState::Connecting);
    poller.connect().await.expect("reconnect after teardown");
    assert_eq!(api.connect_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn a_new_attempt_can_follow_a_timeout() {
    let api = Arc::new(ScriptedConnect::new(Vec::new()));
    let mut settings = PollerSettings::default();
    settings.deadline = Duration::from_secs(9);
    let poller = ConnectionPoller::new(api.clone(), settings);
    let mut state_rx = poller.state();

    poller.connect().await.expect("connect accepted");
    let state = state_rx
        .wait_for(|s| s.is_terminal())
        .await
        .expect("poller alive")
        .clone();
    assert_eq!(state, ConnectState::TimedOut);

    // Terminal states are per-attempt; connecting again resets.
    poller.connect().await.expect("second attempt accepted");
    assert_eq!(poller.current_state(), ConnectState::Connecting);
    assert_eq!(api.connect_calls.load(Ordering::SeqCst), 2);
}
