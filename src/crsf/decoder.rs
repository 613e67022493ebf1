//! # CRSF Receiver Frame Decoder
//!
//! Reassembles CRSF frames from a byte stream, validates them and decodes
//! RC channel frames addressed to the flight controller.
//!
//! The reassembly state is implicit in the write position:
//!
//! ```text
//! IDLE          position == 0
//! ACCUMULATING  0 < position < address + length + frame length
//! COMPLETE      transient, drops straight back to IDLE
//! ```
//!
//! Every failure (overflow, timeout, CRC mismatch, foreign frame) is a
//! silent discard. The only trace left is in [`DecoderStats`].

use serde::Serialize;
use tracing::trace;

use super::channels::{scale_channel, unpack_rc_channels};
use super::crc::crc8_dvb_s2;
use super::protocol::*;

/// Default link staleness threshold
pub const DEFAULT_LINK_TIMEOUT_US: u32 = 500_000;

/// Channels decoded per frame unless configured otherwise
pub const DEFAULT_DECODED_CHANNELS: usize = 8;

/// Decoder tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Partial frames older than this are discarded
    pub frame_timeout_us: u32,

    /// `is_connected` reports false once the last valid frame is this old
    pub link_timeout_us: u32,

    /// How many of the sixteen packed channels are rescaled and stored (1-16)
    pub decoded_channels: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            frame_timeout_us: CRSF_FRAME_TIMEOUT_US,
            link_timeout_us: DEFAULT_LINK_TIMEOUT_US,
            decoded_channels: DEFAULT_DECODED_CHANNELS,
        }
    }
}

/// Diagnostic counters, all wrapping
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DecoderStats {
    pub bytes_received: u32,
    pub frames_decoded: u32,
    /// CRC valid but not an RC channels frame for the flight controller
    pub frames_ignored: u32,
    pub crc_errors: u32,
    /// Partial frames dropped by the reassembly timeout
    pub timeouts: u32,
    /// Bytes dropped because the frame buffer was full
    pub overflow_bytes: u32,
    /// Length field below 2, or RC payload shorter than 22 bytes
    pub malformed: u32,
}

/// Consistent copy of the decoder output, safe to hand to another task
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelSnapshot {
    pub channels: RcChannels,
    pub last_valid_frame_us: Option<u32>,
    pub stats: DecoderStats,
}

impl ChannelSnapshot {
    /// Same staleness rule as [`CrsfDecoder::is_connected`]
    pub fn is_connected(&self, now_us: u32, link_timeout_us: u32) -> bool {
        self.last_valid_frame_us
            .is_some_and(|last| now_us.wrapping_sub(last) < link_timeout_us)
    }

    /// Channel value, or 0 for an out-of-range index
    pub fn channel(&self, index: usize) -> u16 {
        self.channels.get(index).copied().unwrap_or(0)
    }
}

/// CRSF frame decoder
///
/// Feed bytes with [`process_byte`](Self::process_byte) from a single
/// context. Readers in another context should consume a
/// [`ChannelSnapshot`] rather than sharing the decoder.
#[derive(Debug, Clone)]
pub struct CrsfDecoder {
    config: DecoderConfig,
    frame_buffer: [u8; CRSF_FRAME_SIZE_MAX],
    frame_position: usize,
    frame_start_us: u32,
    channels: RcChannels,
    last_valid_frame_us: Option<u32>,
    stats: DecoderStats,
}

impl Default for CrsfDecoder {
    fn default() -> Self {
        Self::new(DecoderConfig::default())
    }
}

impl CrsfDecoder {
    /// Create an initialized decoder
    ///
    /// `decoded_channels` is clamped to 1..=16.
    pub fn new(config: DecoderConfig) -> Self {
        let config = DecoderConfig {
            decoded_channels: config.decoded_channels.clamp(1, CRSF_NUM_CHANNELS),
            ..config
        };

        let mut decoder = Self {
            config,
            frame_buffer: [0; CRSF_FRAME_SIZE_MAX],
            frame_position: 0,
            frame_start_us: 0,
            channels: [0; CRSF_NUM_CHANNELS],
            last_valid_frame_us: None,
            stats: DecoderStats::default(),
        };
        decoder.initialize();
        decoder
    }

    /// Reset to the freshly constructed state
    ///
    /// Drops any partial frame and zeroes every channel.
    pub fn initialize(&mut self) {
        self.frame_position = 0;
        self.frame_start_us = 0;
        self.channels = [0; CRSF_NUM_CHANNELS];
        self.last_valid_frame_us = None;
        self.stats = DecoderStats::default();
    }

    /// Consume one received byte
    ///
    /// # Arguments
    ///
    /// * `byte` - Byte as read from the UART
    /// * `timestamp_us` - Arrival time, wrapping 32-bit microseconds
    pub fn process_byte(&mut self, byte: u8, timestamp_us: u32) {
        self.stats.bytes_received = self.stats.bytes_received.wrapping_add(1);

        // Unsigned subtraction keeps this correct across counter wraparound
        if timestamp_us.wrapping_sub(self.frame_start_us) > self.config.frame_timeout_us {
            if self.frame_position > 0 {
                trace!("CRSF frame timed out after {} bytes", self.frame_position);
                self.stats.timeouts = self.stats.timeouts.wrapping_add(1);
            }
            self.frame_position = 0;
        }

        if self.frame_position == 0 {
            self.frame_start_us = timestamp_us;
        }

        if self.frame_position >= CRSF_FRAME_SIZE_MAX {
            // Oversized frame stalls here until the timeout clears it
            self.stats.overflow_bytes = self.stats.overflow_bytes.wrapping_add(1);
            return;
        }

        self.frame_buffer[self.frame_position] = byte;
        self.frame_position += 1;

        // Address, length and type must be in before the length is trusted
        if self.frame_position <= 2 {
            return;
        }

        let total_len = self.frame_buffer[1] as usize + 2;
        if self.frame_position < total_len {
            return;
        }

        self.frame_position = 0;
        self.complete_frame(total_len, timestamp_us);
    }

    fn complete_frame(&mut self, total_len: usize, timestamp_us: u32) {
        if total_len < CRSF_MIN_FRAME_SIZE {
            trace!("CRSF frame length field {} too small", self.frame_buffer[1]);
            self.stats.malformed = self.stats.malformed.wrapping_add(1);
            return;
        }

        let frame = &self.frame_buffer[..total_len];
        let received_crc = frame[total_len - 1];
        let calculated_crc = crc8_dvb_s2(&frame[2..total_len - 1]);

        if calculated_crc != received_crc {
            trace!(
                "CRSF CRC mismatch: expected 0x{:02X}, got 0x{:02X}",
                calculated_crc,
                received_crc
            );
            self.stats.crc_errors = self.stats.crc_errors.wrapping_add(1);
            return;
        }

        let address = frame[0];
        let frame_type = frame[2];
        if address != CRSF_ADDRESS_FLIGHT_CONTROLLER || frame_type != CRSF_FRAMETYPE_RC_CHANNELS_PACKED {
            trace!("Ignoring CRSF frame type 0x{:02X} for address 0x{:02X}", frame_type, address);
            self.stats.frames_ignored = self.stats.frames_ignored.wrapping_add(1);
            return;
        }

        let payload = &frame[3..total_len - 1];
        let Some(packed) = payload
            .get(..CRSF_RC_CHANNELS_PAYLOAD_SIZE)
            .and_then(|bytes| <&[u8; CRSF_RC_CHANNELS_PAYLOAD_SIZE]>::try_from(bytes).ok())
        else {
            trace!("CRSF RC channels payload too short: {} bytes", payload.len());
            self.stats.malformed = self.stats.malformed.wrapping_add(1);
            return;
        };

        let raw = unpack_rc_channels(packed);
        for (slot, &value) in self
            .channels
            .iter_mut()
            .zip(raw.iter())
            .take(self.config.decoded_channels)
        {
            *slot = scale_channel(value);
        }

        self.last_valid_frame_us = Some(timestamp_us);
        self.stats.frames_decoded = self.stats.frames_decoded.wrapping_add(1);
    }

    /// Last decoded value of a channel, or 0 for an out-of-range index
    ///
    /// Values persist until the next valid frame, however stale.
    pub fn get_channel(&self, index: usize) -> u16 {
        self.channels.get(index).copied().unwrap_or(0)
    }

    /// Whether a valid RC frame arrived within the link timeout of `now_us`
    pub fn is_connected(&self, now_us: u32) -> bool {
        self.snapshot().is_connected(now_us, self.config.link_timeout_us)
    }

    pub fn channels(&self) -> &RcChannels {
        &self.channels
    }

    pub fn last_valid_frame_us(&self) -> Option<u32> {
        self.last_valid_frame_us
    }

    pub fn stats(&self) -> DecoderStats {
        self.stats
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    pub fn snapshot(&self) -> ChannelSnapshot {
        ChannelSnapshot {
            channels: self.channels,
            last_valid_frame_us: self.last_valid_frame_us,
            stats: self.stats,
        }
    }
}
