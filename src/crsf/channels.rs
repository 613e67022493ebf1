//! # RC Channel Unpacking
//!
//! Sixteen 11-bit values packed LSB-first into a 22-byte payload, and the
//! affine mapping from raw CRSF values to pulse-width style units.

use super::protocol::*;

/// Raw-to-output multiplier: maps 172..=1811 onto 988..=2012
#[allow(clippy::excessive_precision)]
pub const CHANNEL_SCALE: f32 = 0.62477120195241;

/// Raw-to-output offset
pub const CHANNEL_OFFSET: f32 = 881.0;

const CHANNEL_MASK: u32 = (1 << CRSF_CHANNEL_BITS) - 1;

/// Unpack all sixteen raw 11-bit channel values
///
/// Channel 0 occupies payload bits 0-10, channel 1 bits 11-21 and so on,
/// crossing byte boundaries without padding.
///
/// ```text
/// Byte 0: Ch0[0:7]
/// Byte 1: Ch0[8:10] | Ch1[0:4]
/// Byte 2: Ch1[5:10] | Ch2[0:1]
/// ...
/// ```
pub fn unpack_rc_channels(payload: &[u8; CRSF_RC_CHANNELS_PAYLOAD_SIZE]) -> RcChannels {
    let mut channels = [0u16; CRSF_NUM_CHANNELS];
    let mut bits: u32 = 0;
    let mut held: u32 = 0;
    let mut index = 0;

    for &byte in payload {
        bits |= (byte as u32) << held;
        held += 8;

        while held >= CRSF_CHANNEL_BITS && index < CRSF_NUM_CHANNELS {
            channels[index] = (bits & CHANNEL_MASK) as u16;
            bits >>= CRSF_CHANNEL_BITS;
            held -= CRSF_CHANNEL_BITS;
            index += 1;
        }
    }

    channels
}

/// Rescale a raw channel value into the 988..=2012 output range
///
/// `round(raw * 0.62477120195241 + 881)`, evaluated in `f32`.
pub fn scale_channel(raw: u16) -> u16 {
    (raw as f32 * CHANNEL_SCALE + CHANNEL_OFFSET).round() as u16
}
