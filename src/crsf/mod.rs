//! # CRSF Protocol Module
//!
//! Receiver side of the Crossfire (CRSF) protocol.
//!
//! This module handles:
//! - Frame reassembly with timeout resynchronization
//! - CRC8-DVB-S2 checksum validation
//! - RC channels unpacking (16 channels, 11-bit resolution) and rescaling
//! - Frame construction for test vectors and loopback

pub mod protocol;
pub mod crc;
pub mod channels;
pub mod decoder;
pub mod encoder;

pub use decoder::{ChannelSnapshot, CrsfDecoder, DecoderConfig, DecoderStats};
