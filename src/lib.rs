//! # CRSF RX Library
//!
//! Decode RC channels from a CRSF (Crossfire) receiver.
//!
//! The core is [`crsf::CrsfDecoder`], a byte-at-a-time frame decoder with
//! timeout resynchronization and CRC validation. Around it sit the serial
//! byte source, a microsecond clock and the channel output formats used by
//! the `crsf-rx` monitor binary.

pub mod clock;
pub mod config;
pub mod error;
pub mod crsf;
pub mod serial;
pub mod telemetry;
