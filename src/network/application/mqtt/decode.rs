//! Packet decoders.
//!
//! [`decode_packet`] splits any packet into type, flags and body. The other
//! decoders each recognise one broker-to-client packet.
//!
//! Decoders never read past the end of `src`: a buffer shorter than the
//! packet it starts with is reported as [`Error::Truncated`]. Bytes after the
//! end of the packet are ignored, which lets callers walk a receive buffer
//! holding several packets with [`Packet::encoded_len`].

use super::varint;
use super::{ControlType, Error, QoS};

/// A decoded packet borrowing its body from the receive buffer.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Packet<'a> {
    /// Packet type from the high nibble of the first byte.
    pub control_type: ControlType,
    /// Flags from the low nibble of the first byte.
    pub flags: u8,
    /// The `remaining length` bytes following the fixed header.
    pub payload: &'a [u8],
    header_len: usize,
}

impl Packet<'_> {
    /// Total size of the packet on the wire, fixed header included.
    pub fn encoded_len(&self) -> usize {
        self.header_len + self.payload.len()
    }
}

/// An incoming PUBLISH packet.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Publish<'a> {
    /// Delivery QoS from bits 1-2 of the first byte.
    pub qos: QoS,
    /// Re-delivery flag (bit 3).
    pub dup: bool,
    /// Retained message flag (bit 0).
    pub retain: bool,
    /// The topic name.
    pub topic: &'a [u8],
    /// Message id; present for every QoS level.
    pub message_id: u16,
    /// Application payload, up to the end of the packet.
    pub payload: &'a [u8],
}

/// Decodes the fixed header of a packet and borrows its body.
///
/// # Examples
///
/// ```rust
/// use libmqtt::network::application::mqtt::{decode_packet, ControlType};
///
/// let packet = decode_packet(&[0x90, 0x03, 0x00, 0x01, 0x00]).unwrap();
/// assert_eq!(packet.control_type, ControlType::SubAck);
/// assert_eq!(packet.flags, 0);
/// assert_eq!(packet.payload, &[0x00, 0x01, 0x00]);
/// assert_eq!(packet.encoded_len(), 5);
/// ```
pub fn decode_packet(src: &[u8]) -> Result<Packet<'_>, Error> {
    let (&first, rest) = src.split_first().ok_or(Error::Truncated)?;
    let control_type = ControlType::try_from(first >> 4)?;
    let (remaining, used) = varint::decode(rest)?;

    let header_len = 1 + used;
    let payload = src
        .get(header_len..header_len + remaining)
        .ok_or(Error::Truncated)?;

    Ok(Packet {
        control_type,
        flags: first & 0x0F,
        payload,
        header_len,
    })
}

/// Checks a CONNACK packet.
///
/// `Ok(())` means the connection was accepted. Every non-zero return code is
/// reported as [`Error::Refused`].
pub fn decode_connack(src: &[u8]) -> Result<(), Error> {
    let [first, len, _reserved, return_code] = prefix::<4>(src)?;
    if first != ControlType::ConnAck.header() || len != 0x02 {
        return Err(Error::Malformed);
    }
    match return_code {
        0x00 => Ok(()),
        _ => Err(Error::Refused),
    }
}

/// Checks a PINGRESP packet.
pub fn decode_pingresp(src: &[u8]) -> Result<(), Error> {
    let [first, len] = prefix::<2>(src)?;
    if first != ControlType::PingResp.header() || len != 0x00 {
        return Err(Error::Malformed);
    }
    Ok(())
}

/// Decodes a PUBACK packet, returning the acknowledged message id.
pub fn decode_puback(src: &[u8]) -> Result<u16, Error> {
    decode_ack(src, ControlType::PubAck)
}

/// Decodes a SUBACK packet, returning the acknowledged message id.
///
/// Only the message id is extracted; the granted QoS codes that follow it
/// are not inspected.
pub fn decode_suback(src: &[u8]) -> Result<u16, Error> {
    decode_ack(src, ControlType::SubAck)
}

/// Decodes a PUBLISH packet sent by the broker.
///
/// The declared remaining length must fit in `src` and must leave room for
/// the topic and the message id.
pub fn decode_publish(src: &[u8]) -> Result<Publish<'_>, Error> {
    if src.len() < 6 {
        return Err(Error::Truncated);
    }
    if src[0] >> 4 != ControlType::Publish as u8 {
        return Err(Error::Malformed);
    }

    let packet = decode_packet(src)?;
    let qos = QoS::try_from((packet.flags >> 1) & 0x03)?;

    let body = packet.payload;
    let topic_len = body
        .get(..2)
        .map(|len| usize::from(u16::from_be_bytes([len[0], len[1]])))
        .ok_or(Error::Malformed)?;
    let topic_end = 2 + topic_len;
    let topic = body.get(2..topic_end).ok_or(Error::Malformed)?;
    let message_id = body
        .get(topic_end..topic_end + 2)
        .map(|id| u16::from_be_bytes([id[0], id[1]]))
        .ok_or(Error::Malformed)?;

    Ok(Publish {
        qos,
        dup: packet.flags & 0x08 != 0,
        retain: packet.flags & 0x01 != 0,
        topic,
        message_id,
        payload: &body[topic_end + 2..],
    })
}

fn decode_ack(src: &[u8], control_type: ControlType) -> Result<u16, Error> {
    let [first, len, msb, lsb] = prefix::<4>(src)?;
    if first != control_type.header() || len != 0x02 {
        return Err(Error::Malformed);
    }
    Ok(u16::from_be_bytes([msb, lsb]))
}

/// The first `N` bytes of `src`.
fn prefix<const N: usize>(src: &[u8]) -> Result<[u8; N], Error> {
    src.get(..N)
        .and_then(|bytes| bytes.try_into().ok())
        .ok_or(Error::Truncated)
}
