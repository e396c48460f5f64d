//! # Application Layer Network Protocols
//!
//! Application layer (OSI Layer 7) protocol codecs.
//!
//! ## Available Protocols
//!
//! - **[`mqtt`]**: MQTT 3.1.1 packet encoder and decoder
//!
//! ## Design Principles
//!
//! - **Transport Agnostic**: codecs work on byte slices and never touch a
//!   connection; pair them with [`client::Session`](crate::network::client::Session)
//!   or any other transport
//! - **No-std Compatible**: no heap allocation, output goes into
//!   caller-provided buffers
//! - **Fail Before Writing**: every precondition is checked before the first
//!   output byte is written

/// MQTT 3.1.1 wire-protocol codec.
pub mod mqtt;
