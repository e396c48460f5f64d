//! # libmqtt - MQTT 3.1.1 client for IoT devices
//!
//! A small MQTT client split into two independent halves:
//!
//! - a **wire-protocol codec** that encodes and decodes MQTT 3.1.1 control
//!   packets into caller-provided buffers, and
//! - a **polled connection session** that owns one TCP-style connection,
//!   reconnects after failures and hands received bytes to the application.
//!
//! The two halves meet only in application code: the session delivers raw
//! bytes, the application decodes them and encodes its replies.
//!
//! ## Features
//!
//! ### Codec
//! - CONNECT, PUBLISH, SUBSCRIBE/UNSUBSCRIBE (up to 8 topics), PINGREQ, DISCONNECT
//! - CONNACK, PUBACK, SUBACK, PINGRESP and PUBLISH decoders
//! - No allocation: every encoder writes into a `&mut [u8]`
//!
//! ### Session
//! - Created / Connected / Disconnected state machine driven by `poll`
//! - Automatic reconnect after a configurable cooldown
//! - Connect, disconnect and data callbacks
//!
//! ## Usage
//!
//! ```toml
//! [dependencies]
//! libmqtt = "0.1.0"
//! ```
//!
//! ### Encoding a CONNECT packet
//!
//! ```rust
//! use libmqtt::network::application::mqtt::{encode_connect, Options};
//!
//! let mut buf = [0u8; 64];
//! let len = encode_connect(&mut buf, &Options::new(b"DIGI")).unwrap();
//! assert_eq!(&buf[..2], &[0x10, 0x10]);
//! assert_eq!(len, 18);
//! ```
//!
//! ## Platform Support
//!
//! The crate is `no_std` unless the `std` feature is enabled. On hosted
//! targets `std` adds a TCP transport and a system clock.
//!
//! ## Optional Features
//!
//! - `std`: TCP transport over `std::net` and a monotonic system clock
//! - `defmt`: log through `defmt` (embedded targets)
//! - `log`: log through the `log` facade (hosted targets)

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(missing_docs)]
#![warn(missing_debug_implementations)]

// This must go first so the macros are visible to every other module.
mod fmt;

/// Network abstraction layer: transport traits, the MQTT codec and the
/// client session.
pub mod network;
