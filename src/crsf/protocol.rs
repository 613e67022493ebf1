//! # CRSF Protocol Constants and Types
//!
//! Wire-level definitions for CRSF frames as received from an RC receiver.
//!
//! ```text
//! [address] [length] [type] [payload ...] [crc]
//!            length = type + payload + crc
//! ```

/// Maximum total frame size on the wire (address through CRC)
pub const CRSF_FRAME_SIZE_MAX: usize = 64;

/// Maximum payload size (frame minus address, length, type and crc)
pub const CRSF_MAX_PAYLOAD_SIZE: usize = CRSF_FRAME_SIZE_MAX - 4;

/// Smallest usable frame: address + length + type + crc
pub const CRSF_MIN_FRAME_SIZE: usize = 4;

/// Device address of the flight controller (target of RC channel frames)
pub const CRSF_ADDRESS_FLIGHT_CONTROLLER: u8 = 0xC8;

/// Device address of a CRSF transmitter module
pub const CRSF_ADDRESS_CRSF_TRANSMITTER: u8 = 0xEE;

/// RC Channels packet type
pub const CRSF_FRAMETYPE_RC_CHANNELS_PACKED: u8 = 0x16;

/// Link Statistics packet type (recognised, not decoded)
pub const CRSF_FRAMETYPE_LINK_STATISTICS: u8 = 0x14;

/// RC channels payload size (22 bytes for 16 channels × 11 bits)
pub const CRSF_RC_CHANNELS_PAYLOAD_SIZE: usize = 22;

/// RC channels frame length field (type + payload + crc)
pub const CRSF_RC_CHANNELS_FRAME_LENGTH: u8 = 0x18; // 24 bytes

/// Number of RC channels
pub const CRSF_NUM_CHANNELS: usize = 16;

/// Bits per packed channel
pub const CRSF_CHANNEL_BITS: u32 = 11;

/// Raw channel value range (11-bit: 0-2047)
pub const CRSF_CHANNEL_VALUE_MIN: u16 = 0;
pub const CRSF_CHANNEL_VALUE_MAX: u16 = 2047;

/// Nominal raw values sent by transmitters at stick extremes and center
pub const CRSF_CHANNEL_VALUE_1000: u16 = 172;
pub const CRSF_CHANNEL_VALUE_MID: u16 = 992;
pub const CRSF_CHANNEL_VALUE_2000: u16 = 1811;

/// Worst-case time for a full frame to arrive at 420 kbaud
pub const CRSF_FRAME_TIMEOUT_US: u32 = 1750;

/// Receiver UART baud rate
pub const CRSF_BAUD_RATE: u32 = 420_000;

/// Channel array type (16 channels)
pub type RcChannels = [u16; CRSF_NUM_CHANNELS];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_constants() {
        assert_eq!(CRSF_FRAME_SIZE_MAX, 64);
        assert_eq!(CRSF_MAX_PAYLOAD_SIZE, 60);
        assert_eq!(CRSF_ADDRESS_FLIGHT_CONTROLLER, 0xC8);
        assert_eq!(CRSF_FRAMETYPE_RC_CHANNELS_PACKED, 0x16);
        assert_eq!(CRSF_FRAMETYPE_LINK_STATISTICS, 0x14);
    }

    #[test]
    fn test_rc_channels_layout() {
        // 16 channels × 11 bits = 176 bits = 22 bytes
        let bits = CRSF_NUM_CHANNELS as u32 * CRSF_CHANNEL_BITS;
        assert_eq!(bits as usize / 8, CRSF_RC_CHANNELS_PAYLOAD_SIZE);

        // type + payload + crc
        assert_eq!(CRSF_RC_CHANNELS_FRAME_LENGTH as usize, CRSF_RC_CHANNELS_PAYLOAD_SIZE + 2);
    }

    #[test]
    fn test_channel_value_ranges() {
        assert_eq!(CRSF_CHANNEL_VALUE_MAX, (1 << CRSF_CHANNEL_BITS) - 1);
        assert!(CRSF_CHANNEL_VALUE_1000 < CRSF_CHANNEL_VALUE_MID);
        assert!(CRSF_CHANNEL_VALUE_MID < CRSF_CHANNEL_VALUE_2000);
    }
}
