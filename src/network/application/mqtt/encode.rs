//! Packet encoders.
//!
//! All encoders share [`encode_packet`]: the packet body is described as an
//! ordered list of fragments which are copied after the fixed header. Every
//! length is checked up front, so an `Err` always means `dst` is untouched.

use heapless::Vec;

use super::varint;
use super::{
    ControlType, Error, MAX_TOPICS_PER_REQUEST, Options, PROTOCOL_LEVEL, PROTOCOL_NAME, QoS,
    Topic,
};

/// Length of the CONNECT variable header, client id length included.
const CONNECT_HEADER_LEN: usize = 12;

/// Message id plus (length, filter, QoS) for every topic.
const MAX_FRAGMENTS: usize = 1 + 3 * MAX_TOPICS_PER_REQUEST;

/// Flags sent with the body-less DISCONNECT and PINGREQ packets.
///
/// MQTT 3.1.1 reserves these flags as 0; this codec sends `0x02`.
const EMPTY_PACKET_FLAGS: u8 = 0x02;

/// Encodes a complete packet into `dst`.
///
/// Writes the fixed header (`control_type << 4 | flags`), the remaining
/// length of the summed fragments, then the fragments in order. Returns the
/// number of bytes written.
///
/// # Errors
///
/// * [`Error::InvalidFlags`] - `flags` does not fit in 4 bits
/// * [`Error::LengthOverflow`] - the fragments exceed the remaining-length range
/// * [`Error::BufferTooSmall`] - `dst` cannot hold the packet
///
/// # Examples
///
/// ```rust
/// use libmqtt::network::application::mqtt::{encode_packet, ControlType};
///
/// let mut buf = [0u8; 8];
/// let len = encode_packet(&mut buf, ControlType::PubAck, 0, &[&[0x7F, 0xFF]]).unwrap();
/// assert_eq!(&buf[..len], &[0x40, 0x02, 0x7F, 0xFF]);
/// ```
pub fn encode_packet(
    dst: &mut [u8],
    control_type: ControlType,
    flags: u8,
    fragments: &[&[u8]],
) -> Result<usize, Error> {
    if flags > 0x0F {
        return Err(Error::InvalidFlags);
    }

    let body_len = fragments
        .iter()
        .try_fold(0usize, |acc, fragment| acc.checked_add(fragment.len()))
        .ok_or(Error::LengthOverflow)?;
    let length_len = varint::encoded_len(body_len).ok_or(Error::LengthOverflow)?;
    let total = 1 + length_len + body_len;
    if dst.len() < total {
        return Err(Error::BufferTooSmall);
    }

    // --- Fixed Header ---
    dst[0] = control_type.header() | flags;
    let mut idx = 1 + varint::encode(body_len, &mut dst[1..])?;

    // --- Body ---
    for fragment in fragments {
        dst[idx..idx + fragment.len()].copy_from_slice(fragment);
        idx += fragment.len();
    }
    Ok(idx)
}

/// Encodes a CONNECT packet.
///
/// Only the client id is carried in the payload; there is no will message,
/// user name or password.
///
/// # Examples
///
/// ```rust
/// use libmqtt::network::application::mqtt::{encode_connect, Options};
///
/// let mut buf = [0u8; 32];
/// let options = Options { client_id: b"DIGI", keep_alive_seconds: 60, connect_flags: 0x02 };
/// let len = encode_connect(&mut buf, &options).unwrap();
/// assert_eq!(
///     &buf[..len],
///     &[0x10, 0x10, 0x00, 0x04, b'M', b'Q', b'T', b'T', 0x04, 0x02, 0x00, 0x3C,
///       0x00, 0x04, b'D', b'I', b'G', b'I']
/// );
/// ```
pub fn encode_connect(dst: &mut [u8], options: &Options) -> Result<usize, Error> {
    let client_id_len = field_len(options.client_id)?;

    // --- Variable Header ---
    let mut header = [0u8; CONNECT_HEADER_LEN];
    header[..2].copy_from_slice(&(PROTOCOL_NAME.len() as u16).to_be_bytes());
    header[2..6].copy_from_slice(PROTOCOL_NAME);
    header[6] = PROTOCOL_LEVEL;
    header[7] = options.connect_flags;
    header[8..10].copy_from_slice(&options.keep_alive_seconds.to_be_bytes());
    header[10..12].copy_from_slice(&client_id_len);

    encode_packet(dst, ControlType::Connect, 0, &[&header, options.client_id])
}

/// Encodes a PUBLISH packet.
///
/// The message id is written for every QoS level, including QoS 0.
pub fn encode_publish(
    dst: &mut [u8],
    topic: &[u8],
    qos: QoS,
    message_id: u16,
    payload: &[u8],
) -> Result<usize, Error> {
    let topic_len = field_len(topic)?;
    let message_id = message_id.to_be_bytes();
    encode_packet(
        dst,
        ControlType::Publish,
        (qos as u8) << 1,
        &[&topic_len, topic, &message_id, payload],
    )
}

/// Encodes a SUBSCRIBE packet for a single topic filter.
pub fn encode_subscribe(
    dst: &mut [u8],
    filter: &[u8],
    qos: QoS,
    message_id: u16,
) -> Result<usize, Error> {
    encode_subscribe_many(dst, &[Topic::new(filter, qos)], message_id)
}

/// Encodes a SUBSCRIBE packet for up to [`MAX_TOPICS_PER_REQUEST`] filters.
///
/// The packet flags carry the highest QoS requested by any topic.
///
/// # Examples
///
/// ```rust
/// use libmqtt::network::application::mqtt::{encode_subscribe_many, QoS, Topic};
///
/// let mut buf = [0u8; 32];
/// let topics = [Topic::new(b"a", QoS::AtMostOnce), Topic::new(b"b", QoS::AtLeastOnce)];
/// let len = encode_subscribe_many(&mut buf, &topics, 7).unwrap();
/// assert_eq!(
///     &buf[..len],
///     &[0x82, 0x0A, 0x00, 0x07, 0x00, 0x01, b'a', 0x00, 0x00, 0x01, b'b', 0x01]
/// );
/// ```
pub fn encode_subscribe_many(
    dst: &mut [u8],
    topics: &[Topic],
    message_id: u16,
) -> Result<usize, Error> {
    encode_topic_request(dst, ControlType::Subscribe, topics, message_id)
}

/// Encodes an UNSUBSCRIBE packet for a single topic filter.
///
/// The QoS byte is written after the filter just like in SUBSCRIBE.
pub fn encode_unsubscribe(
    dst: &mut [u8],
    filter: &[u8],
    qos: QoS,
    message_id: u16,
) -> Result<usize, Error> {
    encode_unsubscribe_many(dst, &[Topic::new(filter, qos)], message_id)
}

/// Encodes an UNSUBSCRIBE packet for up to [`MAX_TOPICS_PER_REQUEST`] filters.
pub fn encode_unsubscribe_many(
    dst: &mut [u8],
    topics: &[Topic],
    message_id: u16,
) -> Result<usize, Error> {
    encode_topic_request(dst, ControlType::Unsubscribe, topics, message_id)
}

/// Encodes a DISCONNECT packet.
pub fn encode_disconnect(dst: &mut [u8]) -> Result<usize, Error> {
    encode_packet(dst, ControlType::Disconnect, EMPTY_PACKET_FLAGS, &[])
}

/// Encodes a PINGREQ packet.
pub fn encode_pingreq(dst: &mut [u8]) -> Result<usize, Error> {
    encode_packet(dst, ControlType::PingReq, EMPTY_PACKET_FLAGS, &[])
}

fn encode_topic_request(
    dst: &mut [u8],
    control_type: ControlType,
    topics: &[Topic],
    message_id: u16,
) -> Result<usize, Error> {
    if topics.is_empty() {
        return Err(Error::NoTopics);
    }
    if topics.len() > MAX_TOPICS_PER_REQUEST {
        return Err(Error::TooManyTopics);
    }

    let mut lengths = [[0u8; 2]; MAX_TOPICS_PER_REQUEST];
    let mut levels = [0u8; MAX_TOPICS_PER_REQUEST];
    let mut highest = QoS::AtMostOnce;
    for (i, topic) in topics.iter().enumerate() {
        lengths[i] = field_len(topic.filter)?;
        levels[i] = topic.qos as u8;
        highest = highest.max(topic.qos);
    }

    let message_id = message_id.to_be_bytes();
    let mut fragments: Vec<&[u8], MAX_FRAGMENTS> = Vec::new();
    fragments
        .push(&message_id)
        .map_err(|_| Error::TooManyTopics)?;
    for (i, topic) in topics.iter().enumerate() {
        fragments
            .extend_from_slice(&[&lengths[i], topic.filter, core::slice::from_ref(&levels[i])])
            .map_err(|_| Error::TooManyTopics)?;
    }

    encode_packet(dst, control_type, (highest as u8) << 1, &fragments)
}

/// Big-endian 16-bit length prefix of a topic or client id.
fn field_len(field: &[u8]) -> Result<[u8; 2], Error> {
    u16::try_from(field.len())
        .map(u16::to_be_bytes)
        .map_err(|_| Error::FieldTooLong)
}
