//! farstat: interactive stat queries against remote endpoints.
//!
//! An operator types filesystem paths; each path is packed into a protobuf
//! envelope and handed to an external message bus addressed at a remote
//! endpoint, which may be offline for hours. Whatever stat responses
//! eventually arrive on the inbound channel are rendered as human-readable
//! text blocks to the configured sink.
//!
//! The two directions are deliberately decoupled — there is no correlation
//! between a prompt line and the response it produces, no timeout, and no
//! retry. Delivery guarantees belong to the bus.
//!
//! # Example Flow
//!
//! ```text
//! Operator                farstat                    Bus          Remote endpoint
//! │                          │                        │                  │
//! │  "/etc/hosts"            │                        │                  │
//! │ ────────────────────────>│  Envelope{StatRequest} │                  │
//! │                          │ ──────────────────────>│  (eventually)    │
//! │                          │                        │ ────────────────>│
//! │                          │                        │  Envelope{StatResponse}
//! │                          │<────────────────────── │<──────────────── │
//! │   rendered text block    │                        │                  │
//! │<──────────────────────── │                        │                  │
//! ```

pub mod bus;
mod config;
mod error;
mod format;
mod issuer;
mod listener;
pub mod proto;
mod sink;

pub use config::{ClientId, Config};
pub use error::Error;
pub use format::format_response;
pub use issuer::{REMOTE_SERVICE, RequestIssuer};
pub use listener::ResponseListener;
pub use sink::Sink;
