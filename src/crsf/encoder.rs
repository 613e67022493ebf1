//! # CRSF Frame Encoder
//!
//! Builds complete CRSF frames. The receiver never transmits; frames built
//! here feed the decoder in tests and loopback setups.

use super::crc::crc8_dvb_s2;
use super::protocol::*;
use crate::error::{CrsfRxError, Result};

/// Encode a generic CRSF frame
///
/// # Arguments
///
/// * `address` - Destination device address
/// * `frame_type` - Frame type byte
/// * `payload` - Type-specific payload (max 60 bytes)
///
/// # Returns
///
/// * `Result<Vec<u8>>` - `address, length, type, payload..., crc`
///
/// # Errors
///
/// Returns error if the payload exceeds `CRSF_MAX_PAYLOAD_SIZE`
pub fn encode_frame(address: u8, frame_type: u8, payload: &[u8]) -> Result<Vec<u8>> {
    if payload.len() > CRSF_MAX_PAYLOAD_SIZE {
        return Err(CrsfRxError::CrsfProtocol(format!(
            "Payload size {} exceeds maximum {}",
            payload.len(),
            CRSF_MAX_PAYLOAD_SIZE
        )));
    }

    let mut frame = Vec::with_capacity(payload.len() + CRSF_MIN_FRAME_SIZE);
    frame.push(address);
    frame.push((payload.len() + 2) as u8); // type + payload + crc
    frame.push(frame_type);
    frame.extend_from_slice(payload);

    // CRC covers type + payload
    let crc = crc8_dvb_s2(&frame[2..]);
    frame.push(crc);

    Ok(frame)
}

/// Encode RC channels into a complete 26-byte CRSF frame
///
/// # Examples
///
/// ```
/// use crsf_rx::crsf::encoder::encode_rc_channels_frame;
/// use crsf_rx::crsf::protocol::CRSF_ADDRESS_FLIGHT_CONTROLLER;
///
/// let frame = encode_rc_channels_frame(CRSF_ADDRESS_FLIGHT_CONTROLLER, &[992u16; 16]);
/// assert_eq!(frame.len(), 26);
/// ```
pub fn encode_rc_channels_frame(address: u8, channels: &RcChannels) -> Vec<u8> {
    let payload = encode_rc_channels_payload(channels);

    let mut frame = Vec::with_capacity(CRSF_RC_CHANNELS_FRAME_LENGTH as usize + 2);
    frame.push(address);
    frame.push(CRSF_RC_CHANNELS_FRAME_LENGTH);
    frame.push(CRSF_FRAMETYPE_RC_CHANNELS_PACKED);
    frame.extend_from_slice(&payload);
    frame.push(crc8_dvb_s2(&frame[2..]));

    frame
}

/// Pack 16 channels (11 bits each, LSB first) into a 22-byte payload
///
/// Values above 2047 are clamped.
pub fn encode_rc_channels_payload(channels: &RcChannels) -> [u8; CRSF_RC_CHANNELS_PAYLOAD_SIZE] {
    let mut payload = [0u8; CRSF_RC_CHANNELS_PAYLOAD_SIZE];
    let mut bit_index = 0;

    for &channel in channels.iter() {
        let value = channel.min(CRSF_CHANNEL_VALUE_MAX);

        for bit in 0..CRSF_CHANNEL_BITS {
            if (value >> bit) & 1 == 1 {
                payload[bit_index / 8] |= 1 << (bit_index % 8);
            }
            bit_index += 1;
        }
    }

    payload
}
