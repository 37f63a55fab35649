//! Market data transport for the equilibrium monitor.
//!
//! Two interchangeable acquisition modes:
//! - Push: one streaming WebSocket connection with scheduled reconnection
//! - Pull: a self-scheduling poll loop with one outstanding request
//!
//! Both hand every payload to a [`FeedHandler`] and await it before reading
//! the next one, so readings are processed strictly in arrival order.

pub mod connection;
pub mod error;
pub mod handler;
pub mod http;
pub mod policy;
pub mod poller;

pub use connection::{ConnectionConfig, ConnectionManager, ConnectionState};
pub use error::{TransportError, TransportResult};
pub use handler::{BoxFuture, FeedHandler, FeedPayload};
pub use http::HttpSource;
pub use policy::{schedule_reconnect, BackoffKind, PollPolicy, ReconnectPolicy};
pub use poller::{PollLoop, PollSource};

use std::sync::Once;

static INIT_CRYPTO: Once = Once::new();

/// Initialize the TLS crypto provider.
/// Must be called before any WebSocket connections are made.
pub fn init_crypto() {
    INIT_CRYPTO.call_once(|| {
        let _ = rustls::crypto::ring::default_provider().install_default();
    });
}
