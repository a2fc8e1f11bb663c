//! Inbound response handling: decode, format, write.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::format::format_response;
use crate::proto::Envelope;
use crate::sink::Sink;

/// Handler for every envelope the bus delivers on this process's channel.
///
/// The bus invokes [`handle`](Self::handle) on its own scheduling,
/// potentially concurrently with itself and with the request issuer. The
/// whole decode→format→write section runs under one lock, so two
/// concurrent deliveries never interleave their rendered blocks. Cloning
/// shares the underlying sink.
#[derive(Clone, Debug)]
pub struct ResponseListener {
    sink: Arc<Mutex<Sink>>,
}

impl ResponseListener {
    /// Create a listener writing rendered blocks to `sink`.
    pub fn new(sink: Sink) -> Self {
        Self {
            sink: Arc::new(Mutex::new(sink)),
        }
    }

    /// Handle one inbound envelope.
    ///
    /// A payload that is absent or does not decode as a stat response is a
    /// protocol fault: it is reported and dropped, and the listener stays
    /// available for subsequent messages. Sink write failures are reported
    /// without retrying; prior content is never touched.
    pub async fn handle(&self, envelope: Envelope) {
        let sink = self.sink.lock().await;

        let response = match envelope.response() {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("dropping inbound message that is not a stat response: {}", e);
                return;
            }
        };

        let block = format_response(&response);
        if let Err(e) = sink.append(&block) {
            tracing::error!("failed to write rendered response for {}: {}", response.path, e);
        }
    }
}
