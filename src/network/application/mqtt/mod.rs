//! MQTT 3.1.1 wire-protocol codec for embedded systems.
//!
//! This module encodes the control packets a client sends and decodes the
//! ones a broker sends back. It does no I/O: encoders write into a
//! caller-provided `&mut [u8]` and decoders borrow from the received bytes.
//!
//! # Packet Layout
//!
//! Every MQTT packet starts with a fixed header:
//!
//! ```text
//! ┌────────────────────┬─────────────┬──────────────────────────┐
//! │ type:4 │ flags:4   │ remaining   │ variable header + payload│
//! │  (1 byte)          │ length 1-4B │ (remaining length bytes) │
//! └────────────────────┴─────────────┴──────────────────────────┘
//! ```
//!
//! The remaining length is a base-128 varint, see [`varint`].
//!
//! # Known Deviations
//!
//! The encoders keep a few behaviours of the devices this codec talks to:
//!
//! - PUBLISH always carries a message id, even at QoS 0.
//! - UNSUBSCRIBE carries a QoS byte after every topic.
//! - DISCONNECT and PINGREQ are sent with flags `0x02`.
//!
//! # Usage
//!
//! ```rust
//! use libmqtt::network::application::mqtt::{decode_publish, encode_publish, QoS};
//!
//! let mut buf = [0u8; 64];
//! let len = encode_publish(&mut buf, b"a/b", QoS::AtLeastOnce, 32767, b"payload").unwrap();
//!
//! let publish = decode_publish(&buf[..len]).unwrap();
//! assert_eq!(publish.topic, b"a/b");
//! assert_eq!(publish.qos, QoS::AtLeastOnce);
//! assert_eq!(publish.message_id, 32767);
//! assert_eq!(publish.payload, b"payload");
//! ```

/// Remaining-length varint codec.
pub mod varint;

mod decode;
mod encode;

pub use decode::{
    Packet, Publish, decode_connack, decode_packet, decode_pingresp, decode_puback,
    decode_publish, decode_suback,
};
pub use encode::{
    encode_connect, encode_disconnect, encode_packet, encode_pingreq, encode_publish,
    encode_subscribe, encode_subscribe_many, encode_unsubscribe, encode_unsubscribe_many,
};

/// MQTT protocol name as defined in the specification.
pub const PROTOCOL_NAME: &[u8] = b"MQTT";
/// MQTT protocol level for version 3.1.1.
pub const PROTOCOL_LEVEL: u8 = 4;

/// Largest value the remaining-length field can carry (`0x0FFF_FFFF`).
pub const MAX_REMAINING_LENGTH: usize = 268_435_455;

/// Largest number of topics in one SUBSCRIBE or UNSUBSCRIBE packet.
///
/// This is a sizing limit of this crate, not of the protocol.
pub const MAX_TOPICS_PER_REQUEST: usize = 8;

/// Connect flag requesting a clean session.
pub const CLEAN_SESSION: u8 = 0x02;

/// Keep-alive used by [`Options::new`], in seconds.
pub const DEFAULT_KEEP_ALIVE: u16 = 60;

/// MQTT control packet types.
///
/// Values 0 and 15 are reserved and have no variant, so an invalid control
/// type cannot reach the encoder.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[repr(u8)]
pub enum ControlType {
    /// Client request to connect to the broker.
    Connect = 1,
    /// Connect acknowledgment.
    ConnAck = 2,
    /// Publish message.
    Publish = 3,
    /// Publish acknowledgment (QoS 1).
    PubAck = 4,
    /// Publish received (QoS 2, part 1).
    PubRec = 5,
    /// Publish release (QoS 2, part 2).
    PubRel = 6,
    /// Publish complete (QoS 2, part 3).
    PubComp = 7,
    /// Subscribe request.
    Subscribe = 8,
    /// Subscribe acknowledgment.
    SubAck = 9,
    /// Unsubscribe request.
    Unsubscribe = 10,
    /// Unsubscribe acknowledgment.
    UnsubAck = 11,
    /// Ping request.
    PingReq = 12,
    /// Ping response.
    PingResp = 13,
    /// Client is disconnecting.
    Disconnect = 14,
}

impl ControlType {
    /// The fixed-header byte for this type with all flags cleared.
    pub const fn header(self) -> u8 {
        (self as u8) << 4
    }
}

impl TryFrom<u8> for ControlType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        let ty = match value {
            1 => ControlType::Connect,
            2 => ControlType::ConnAck,
            3 => ControlType::Publish,
            4 => ControlType::PubAck,
            5 => ControlType::PubRec,
            6 => ControlType::PubRel,
            7 => ControlType::PubComp,
            8 => ControlType::Subscribe,
            9 => ControlType::SubAck,
            10 => ControlType::Unsubscribe,
            11 => ControlType::UnsubAck,
            12 => ControlType::PingReq,
            13 => ControlType::PingResp,
            14 => ControlType::Disconnect,
            _ => return Err(Error::InvalidControlType),
        };
        Ok(ty)
    }
}

/// Quality of Service levels for MQTT messages.
///
/// ```rust
/// use libmqtt::network::application::mqtt::QoS;
///
/// assert_eq!(QoS::AtMostOnce as u8, 0);
/// assert_eq!(QoS::try_from(2), Ok(QoS::ExactlyOnce));
/// assert!(QoS::try_from(3).is_err());
/// ```
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub enum QoS {
    /// **QoS 0**: At most once delivery.
    AtMostOnce = 0,
    /// **QoS 1**: At least once delivery.
    AtLeastOnce = 1,
    /// **QoS 2**: Exactly once delivery.
    ExactlyOnce = 2,
}

impl TryFrom<u8> for QoS {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(QoS::AtMostOnce),
            1 => Ok(QoS::AtLeastOnce),
            2 => Ok(QoS::ExactlyOnce),
            _ => Err(Error::InvalidQos),
        }
    }
}

/// One entry of a SUBSCRIBE or UNSUBSCRIBE request.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Topic<'a> {
    /// Topic filter bytes, at most 65,535 of them.
    pub filter: &'a [u8],
    /// Requested quality of service.
    pub qos: QoS,
}

impl<'a> Topic<'a> {
    /// Creates a topic entry.
    pub const fn new(filter: &'a [u8], qos: QoS) -> Self {
        Self { filter, qos }
    }
}

/// Parameters of a CONNECT packet.
///
/// ```rust
/// use libmqtt::network::application::mqtt::{Options, CLEAN_SESSION};
///
/// let options = Options::new(b"sensor_node_1");
/// assert_eq!(options.connect_flags, CLEAN_SESSION);
/// assert_eq!(options.keep_alive_seconds, 60);
///
/// let custom = Options { keep_alive_seconds: 4, ..options };
/// assert_eq!(custom.keep_alive_seconds, 4);
/// ```
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Options<'a> {
    /// The client identifier, must be unique within the broker.
    pub client_id: &'a [u8],
    /// The keep-alive time interval in seconds; 0 disables keep-alive.
    pub keep_alive_seconds: u16,
    /// Raw connect-flags byte, see [`CLEAN_SESSION`].
    pub connect_flags: u8,
}

impl<'a> Options<'a> {
    /// Clean session with a 60 second keep-alive.
    pub const fn new(client_id: &'a [u8]) -> Self {
        Self {
            client_id,
            keep_alive_seconds: DEFAULT_KEEP_ALIVE,
            connect_flags: CLEAN_SESSION,
        }
    }
}

/// Errors reported by the MQTT codec.
///
/// The first group are invalid arguments handed to an encoder; nothing has
/// been written when one of them is returned. The second group describe
/// received bytes that do not have the expected shape.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// Flags do not fit in 4 bits.
    InvalidFlags,
    /// Control type 0 or 15.
    InvalidControlType,
    /// QoS value 3.
    InvalidQos,
    /// A topic or client id is longer than 65,535 bytes.
    FieldTooLong,
    /// The packet body is larger than [`MAX_REMAINING_LENGTH`].
    LengthOverflow,
    /// More than [`MAX_TOPICS_PER_REQUEST`] topics in one request.
    TooManyTopics,
    /// A SUBSCRIBE or UNSUBSCRIBE request without topics.
    NoTopics,
    /// The destination buffer cannot hold the encoded packet.
    BufferTooSmall,
    /// The buffer ends before the packet does.
    Truncated,
    /// The remaining-length field runs past its fourth byte.
    MalformedLength,
    /// The bytes do not match the expected packet layout.
    Malformed,
    /// The broker answered CONNECT with a non-zero return code.
    Refused,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            Error::InvalidFlags => "flags wider than 4 bits",
            Error::InvalidControlType => "reserved control packet type",
            Error::InvalidQos => "invalid QoS level",
            Error::FieldTooLong => "field longer than 65535 bytes",
            Error::LengthOverflow => "remaining length out of range",
            Error::TooManyTopics => "too many topics in one request",
            Error::NoTopics => "request without topics",
            Error::BufferTooSmall => "buffer too small",
            Error::Truncated => "packet truncated",
            Error::MalformedLength => "malformed remaining length",
            Error::Malformed => "malformed packet",
            Error::Refused => "connection refused by broker",
        };
        f.write_str(msg)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::InvalidFlags => defmt::write!(f, "InvalidFlags"),
            Error::InvalidControlType => defmt::write!(f, "InvalidControlType"),
            Error::InvalidQos => defmt::write!(f, "InvalidQos"),
            Error::FieldTooLong => defmt::write!(f, "FieldTooLong"),
            Error::LengthOverflow => defmt::write!(f, "LengthOverflow"),
            Error::TooManyTopics => defmt::write!(f, "TooManyTopics"),
            Error::NoTopics => defmt::write!(f, "NoTopics"),
            Error::BufferTooSmall => defmt::write!(f, "BufferTooSmall"),
            Error::Truncated => defmt::write!(f, "Truncated"),
            Error::MalformedLength => defmt::write!(f, "MalformedLength"),
            Error::Malformed => defmt::write!(f, "Malformed"),
            Error::Refused => defmt::write!(f, "Refused"),
        }
    }
}
