//! Consumer seam between the transport and the pipeline.

use crate::connection::ConnectionState;
use std::future::Future;
use std::pin::Pin;

/// Boxed future for dyn-compatible async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// One event delivered by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedPayload {
    /// Raw text body of a frame or HTTP response.
    Message(String),
    /// The source could not be reached this time.
    Unreachable { reason: String },
}

/// Receives payloads from a transport.
///
/// The transport awaits `on_payload` before reading or requesting the next
/// payload.
pub trait FeedHandler: Send {
    fn on_payload(&mut self, payload: FeedPayload) -> BoxFuture<'_, ()>;

    /// Called on every connection state transition (push mode only).
    fn on_state_change(&mut self, _state: ConnectionState) {}
}
