//! Startup configuration, constructed once and passed into the components
//! that need it.

use std::fmt;

use crate::error::Error;
use crate::sink::Sink;

/// Raw identifier of the remote endpoint requests are addressed to.
///
/// Operators supply it as a hex string; a malformed string is a
/// configuration fault surfaced before any envelope is built.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientId(Vec<u8>);

impl ClientId {
    /// Decode a hex-encoded client id.
    pub fn from_hex(hex_id: &str) -> Result<Self, Error> {
        Ok(Self(hex::decode(hex_id)?))
    }

    /// The raw identifier bytes, as they go into an envelope destination.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(&self.0))
    }
}

impl fmt::Debug for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClientId({self})")
    }
}

/// Everything the issuer and listener need to know, resolved at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Endpoint the stat requests are addressed to.
    pub client_id: ClientId,
    /// Where rendered responses go.
    pub sink: Sink,
}
