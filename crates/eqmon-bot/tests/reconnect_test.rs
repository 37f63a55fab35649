//! Streaming connection lifecycle tests.
//!
//! Tests the connection lifecycle:
//! - Reconnection after a server-side close
//! - Shutdown while waiting to reconnect
//! - Reconnection ceiling against an unreachable endpoint

mod integration;
use integration::common::mock_ws::{MockWsServer, Script};
use integration::common::{test_config, ticker_event};

use eqmon_bot::{AppError, Application};
use eqmon_compute::MockContract;
use eqmon_transport::TransportError;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout};

/// A close while running schedules a reconnect, and the new connection
/// subscribes again.
#[tokio::test]
async fn test_reconnects_after_server_close() {
    let server = MockWsServer::start(Script {
        messages: vec![ticker_event(100.0, 1.0, 1.0)],
        close_after: true,
    })
    .await;

    let mock = Arc::new(MockContract::new());
    mock.set_fallback_delta(Some(100));

    let mut config = test_config();
    config.source.url = server.url();
    let app = Application::new(config).unwrap();
    let token = app.shutdown_token();
    let handle = tokio::spawn(app.run_with_contract(mock.clone()));

    let reconnected = timeout(Duration::from_secs(5), async {
        while server.connection_count().await < 2 {
            sleep(Duration::from_millis(20)).await;
        }
    })
    .await;
    assert!(reconnected.is_ok(), "Should reconnect after close");

    token.cancel();
    let state = handle.await.unwrap().unwrap();
    assert!(state.cycles_attempted >= 1);
    assert_eq!(state.synthetic_readings, 0);

    let subscriptions = server
        .received_messages()
        .await
        .iter()
        .filter(|m| m.contains("SUBSCRIBE"))
        .count();
    assert!(subscriptions >= 2);

    server.shutdown().await;
}

/// Cancelling the run flag during the reconnect delay stops the run without
/// another connection.
#[tokio::test]
async fn test_shutdown_during_reconnect_delay() {
    let server = MockWsServer::start(Script {
        messages: Vec::new(),
        close_after: true,
    })
    .await;

    let mock = Arc::new(MockContract::new());
    let mut config = test_config();
    config.source.url = server.url();
    config.transport.reconnect_delay_ms = 60_000;
    let app = Application::new(config).unwrap();
    let token = app.shutdown_token();
    let handle = tokio::spawn(app.run_with_contract(mock));

    timeout(Duration::from_secs(5), async {
        while server.connection_count().await < 1 {
            sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .expect("never connected");
    // Let the close arrive and the delay start.
    sleep(Duration::from_millis(200)).await;

    token.cancel();
    let result = timeout(Duration::from_secs(5), handle)
        .await
        .expect("run did not stop during reconnect delay")
        .unwrap();
    assert!(result.is_ok());
    assert_eq!(server.connection_count().await, 1);

    server.shutdown().await;
}

/// With a ceiling configured, an unreachable stream ends the run after the
/// ceiling, having run one synthetic cycle per failed connect.
#[tokio::test]
async fn test_reconnect_ceiling_against_unreachable_endpoint() {
    let mock = Arc::new(MockContract::new());
    mock.set_fallback_delta(Some(230));

    let mut config = test_config();
    config.source.url = "ws://127.0.0.1:1".to_string();
    config.transport.reconnect_delay_ms = 10;
    config.transport.max_reconnect_attempts = 2;
    let app = Application::new(config).unwrap();

    let result = timeout(Duration::from_secs(10), app.run_with_contract(mock.clone()))
        .await
        .expect("run did not stop");

    assert!(matches!(
        result,
        Err(AppError::Transport(TransportError::RetriesExhausted { attempts: 2 }))
    ));
    // Initial connect plus two reconnects, each with a synthetic cycle.
    assert_eq!(mock.call_count(), 9);
}
