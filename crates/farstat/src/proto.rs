//! Wire schema for the stat request/response exchange.
//!
//! The messages are hand-derived [`prost::Message`] structs rather than
//! build-time codegen: the bus carries opaque payloads, so the only schema
//! this crate owns is the handful of messages below. Field numbers are part
//! of the wire contract and must not be reassigned.
//!
//! Payloads travel packed inside [`prost_types::Any`], tagged with a
//! `type.googleapis.com/farstat.*` type URL, inside an addressed
//! [`Envelope`].

use prost::Name;
use prost_types::Any;

use crate::error::Error;

/// A request to stat one path on the destination endpoint.
#[derive(Clone, PartialEq, prost::Message)]
pub struct StatRequest {
    /// Filesystem path to query, as entered by the operator.
    #[prost(string, tag = "1")]
    pub path: String,
}

/// The remote endpoint's report for one stat request.
///
/// `status` tells whether the remote stat call succeeded; the numeric
/// fields and `extra` are only meaningful when it did.
#[derive(Clone, PartialEq, prost::Message)]
pub struct StatResponse {
    /// Echoed subject path.
    #[prost(string, tag = "1")]
    pub path: String,
    /// Success/failure report for the remote stat call.
    #[prost(message, optional, tag = "2")]
    pub status: Option<Status>,
    /// File size in bytes.
    #[prost(uint64, tag = "3")]
    pub size: u64,
    /// POSIX permission/type bits.
    #[prost(uint32, tag = "4")]
    pub mode: u32,
    /// Ownership, link and timestamp details, present on success.
    #[prost(message, optional, tag = "5")]
    pub extra: Option<Extra>,
}

/// Outcome of the remote stat call.
#[derive(Clone, PartialEq, prost::Message)]
pub struct Status {
    /// Whether the stat call succeeded.
    #[prost(bool, tag = "1")]
    pub success: bool,
    /// Remote error text, set when `success` is false.
    #[prost(string, tag = "2")]
    pub error_details: String,
}

/// Inode-level metadata attached to a successful response.
#[derive(Clone, PartialEq, prost::Message)]
pub struct Extra {
    /// Inode number.
    #[prost(uint64, tag = "1")]
    pub inode: u64,
    /// Number of hard links.
    #[prost(uint64, tag = "2")]
    pub hardlinks_number: u64,
    /// Owning user.
    #[prost(message, optional, tag = "3")]
    pub owner: Option<User>,
    /// Owning group.
    #[prost(message, optional, tag = "4")]
    pub owner_group: Option<Group>,
    /// Last access time (atime).
    #[prost(message, optional, tag = "5")]
    pub last_access_time: Option<prost_types::Timestamp>,
    /// Last data modification time (mtime).
    #[prost(message, optional, tag = "6")]
    pub last_data_modification_time: Option<prost_types::Timestamp>,
    /// Last status change time (ctime).
    #[prost(message, optional, tag = "7")]
    pub last_status_change_time: Option<prost_types::Timestamp>,
}

/// A user account on the remote endpoint.
#[derive(Clone, PartialEq, prost::Message)]
pub struct User {
    /// Numeric user id.
    #[prost(uint32, tag = "1")]
    pub uid: u32,
    /// Account name, empty when the endpoint could not resolve it.
    #[prost(string, tag = "2")]
    pub name: String,
}

/// A group on the remote endpoint.
#[derive(Clone, PartialEq, prost::Message)]
pub struct Group {
    /// Numeric group id.
    #[prost(uint32, tag = "1")]
    pub gid: u32,
    /// Group name, empty when the endpoint could not resolve it.
    #[prost(string, tag = "2")]
    pub name: String,
}

/// Destination of an envelope: one service on one endpoint.
#[derive(Clone, PartialEq, prost::Message)]
pub struct Address {
    /// Raw endpoint identifier bytes.
    #[prost(bytes = "vec", tag = "1")]
    pub client_id: Vec<u8>,
    /// Name of the service on that endpoint.
    #[prost(string, tag = "2")]
    pub service_name: String,
}

/// The addressed container handed to (or received from) the message bus.
#[derive(Clone, PartialEq, prost::Message)]
pub struct Envelope {
    /// Where the bus should deliver the payload.
    #[prost(message, optional, tag = "1")]
    pub destination: Option<Address>,
    /// Packed payload with its type tag.
    #[prost(message, optional, tag = "2")]
    pub data: Option<Any>,
}

impl Envelope {
    /// Build an outbound envelope carrying `request`, addressed to
    /// `destination`.
    pub fn request(destination: Address, request: &StatRequest) -> Result<Self, Error> {
        Ok(Self {
            destination: Some(destination),
            data: Some(Any::from_msg(request)?),
        })
    }

    /// Unpack this envelope's payload as a [`StatResponse`].
    ///
    /// Fails when the payload is absent, carries a different type tag, or
    /// does not decode.
    pub fn response(&self) -> Result<StatResponse, Error> {
        let data = self.data.as_ref().ok_or(Error::MissingPayload)?;
        Ok(data.to_msg()?)
    }
}

const PROTO_PACKAGE: &str = "farstat";
const TYPE_URL_DOMAIN: &str = "type.googleapis.com";

impl Name for StatRequest {
    const NAME: &'static str = "StatRequest";
    const PACKAGE: &'static str = PROTO_PACKAGE;

    fn full_name() -> String {
        format!("{}.{}", Self::PACKAGE, Self::NAME)
    }

    fn type_url() -> String {
        format!("{}/{}", TYPE_URL_DOMAIN, Self::full_name())
    }
}

impl Name for StatResponse {
    const NAME: &'static str = "StatResponse";
    const PACKAGE: &'static str = PROTO_PACKAGE;

    fn full_name() -> String {
        format!("{}.{}", Self::PACKAGE, Self::NAME)
    }

    fn type_url() -> String {
        format!("{}/{}", TYPE_URL_DOMAIN, Self::full_name())
    }
}
