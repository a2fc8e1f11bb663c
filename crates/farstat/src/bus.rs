//! Narrow capabilities onto the external message bus.
//!
//! The bus itself (connectivity, authentication, store-and-forward,
//! delivery guarantees) is not this crate's concern. What lives here is
//! the thin seam the rest of the crate consumes: an outbound
//! [`BusSender`] capability, the length-prefixed frame codec envelopes
//! travel in, and the inbound dispatch loop that feeds the
//! [`ResponseListener`].
//!
//! Frames are `[4-byte big-endian length][prost-encoded Envelope]`.

use std::net::SocketAddr;

use async_trait::async_trait;
use prost::Message;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::Mutex;

use crate::error::Error;
use crate::listener::ResponseListener;
use crate::proto::Envelope;

/// Upper bound on a single frame. A peer announcing more than this is not
/// speaking the protocol.
pub const MAX_FRAME_LEN: usize = 1024 * 1024;

/// Outbound send capability: enqueue one envelope for eventual delivery.
///
/// No return value reports delivery; fire-and-forget by contract. Errors
/// are local only (the handle to the bus broke).
#[async_trait]
pub trait BusSender: Send + Sync {
    /// Hand one envelope to the bus.
    async fn send(&self, envelope: Envelope) -> Result<(), Error>;
}

/// Write one length-prefixed frame.
pub async fn write_frame<W>(writer: &mut W, payload: &[u8]) -> Result<(), Error>
where
    W: AsyncWrite + Unpin,
{
    if payload.len() > MAX_FRAME_LEN {
        return Err(Error::Oversize {
            size: payload.len(),
            max: MAX_FRAME_LEN,
        });
    }
    writer.write_all(&(payload.len() as u32).to_be_bytes()).await?;
    writer.write_all(payload).await?;
    writer.flush().await?;
    Ok(())
}

/// Read one length-prefixed frame.
///
/// Returns `Ok(None)` when the peer closes the connection cleanly at a
/// frame boundary. EOF mid-frame is an IO error; a length beyond
/// `max_len` is a protocol fault.
pub async fn read_frame<R>(reader: &mut R, max_len: usize) -> Result<Option<Vec<u8>>, Error>
where
    R: AsyncRead + Unpin,
{
    let mut len_buf = [0u8; 4];
    match reader.read_exact(&mut len_buf).await {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e.into()),
    }

    let len = u32::from_be_bytes(len_buf) as usize;
    if len > max_len {
        return Err(Error::Oversize { size: len, max: max_len });
    }

    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload).await?;
    Ok(Some(payload))
}

/// Handle onto an already-reachable bus endpoint, speaking framed
/// envelopes over a stream socket.
///
/// The writer half is shared behind a lock so the issuer can hold the
/// send capability as `Arc<dyn BusSender>`; the reader half is handed to
/// [`run_dispatch`] exactly once.
#[derive(Debug)]
pub struct FramedBus {
    writer: Mutex<OwnedWriteHalf>,
}

impl FramedBus {
    /// Connect to the bus endpoint at `addr`.
    ///
    /// Returns the send handle and the inbound half for the dispatch loop.
    pub async fn connect(addr: SocketAddr) -> Result<(Self, OwnedReadHalf), Error> {
        let stream = TcpStream::connect(addr).await?;
        let (read_half, write_half) = stream.into_split();
        Ok((
            Self {
                writer: Mutex::new(write_half),
            },
            read_half,
        ))
    }
}

#[async_trait]
impl BusSender for FramedBus {
    async fn send(&self, envelope: Envelope) -> Result<(), Error> {
        let mut writer = self.writer.lock().await;
        write_frame(&mut *writer, &envelope.encode_to_vec()).await
    }
}

/// Inbound dispatch loop: read frames off the bus and hand every decoded
/// envelope to the listener.
///
/// A well-framed payload that does not decode as an [`Envelope`] is a
/// protocol fault: reported and dropped, the loop keeps going. Returns
/// `Ok(())` when the bus closes the channel cleanly. An oversized frame
/// leaves the stream unsynchronized, so it terminates the loop with the
/// fault instead.
pub async fn run_dispatch<R>(mut reader: R, listener: ResponseListener) -> Result<(), Error>
where
    R: AsyncRead + Unpin,
{
    while let Some(frame) = read_frame(&mut reader, MAX_FRAME_LEN).await? {
        match Envelope::decode(frame.as_slice()) {
            Ok(envelope) => listener.handle(envelope).await,
            Err(e) => tracing::warn!("dropping inbound frame that is not an envelope: {}", e),
        }
    }
    tracing::debug!("message bus closed the inbound channel");
    Ok(())
}
