//! The operator-facing request loop.

use std::fmt;
use std::io::Write;
use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::bus::BusSender;
use crate::config::ClientId;
use crate::error::Error;
use crate::proto::{Address, Envelope, StatRequest};

/// Name of the stat-serving role on the remote endpoint.
pub const REMOTE_SERVICE: &str = "stater";

/// Turns operator input lines into outbound stat requests.
///
/// Each line becomes one fire-and-forget envelope handed to the bus; the
/// issuer never waits for, or correlates with, a response.
pub struct RequestIssuer {
    bus: Arc<dyn BusSender>,
    destination: ClientId,
}

impl RequestIssuer {
    /// Create an issuer sending to `destination` through `bus`.
    pub fn new(bus: Arc<dyn BusSender>, destination: ClientId) -> Self {
        Self { bus, destination }
    }

    /// Build and send one stat request for `path`.
    pub async fn send_request(&self, path: &str) -> Result<(), Error> {
        let request = StatRequest {
            path: path.to_string(),
        };
        let destination = Address {
            client_id: self.destination.as_bytes().to_vec(),
            service_name: REMOTE_SERVICE.to_string(),
        };
        self.bus.send(Envelope::request(destination, &request)?).await
    }

    /// Prompt, read and send until the input stream closes.
    ///
    /// Blocking on operator input is the loop's only suspension point.
    /// Whatever the operator enters is sent as-is, blank lines included.
    pub async fn run<R>(&self, input: R) -> Result<(), Error>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        loop {
            prompt()?;
            match lines.next_line().await? {
                Some(path) => self.send_request(&path).await?,
                None => return Ok(()),
            }
        }
    }
}

impl fmt::Debug for RequestIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestIssuer")
            .field("destination", &self.destination)
            .finish_non_exhaustive()
    }
}

fn prompt() -> Result<(), Error> {
    let mut out = std::io::stdout().lock();
    out.write_all(b"Enter a path to stat: ")?;
    out.flush()?;
    Ok(())
}
