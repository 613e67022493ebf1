//! # CRC8-DVB-S2 Implementation
//!
//! Frame integrity check for CRSF. The checksum covers the type byte and
//! the payload, never the address or length bytes.
//!
//! **Polynomial**: 0xD5 (x^8 + x^7 + x^6 + x^4 + x^2 + 1)
//! **Initial Value**: 0x00, no reflection, no final XOR

/// CRC-8-DVB-S2 polynomial
const CRC8_POLY: u8 = 0xD5;

/// Precomputed CRC8 lookup table
const CRC8_TABLE: [u8; 256] = generate_crc8_table();

const fn generate_crc8_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;

    while i < 256 {
        table[i] = crc8_update(0, i as u8);
        i += 1;
    }

    table
}

/// Fold one byte into a running CRC, bit at a time
///
/// XOR the byte in, then shift left eight times, applying the polynomial
/// whenever the high bit was set before the shift.
pub const fn crc8_update(crc: u8, byte: u8) -> u8 {
    let mut crc = crc ^ byte;
    let mut bit = 0;

    while bit < 8 {
        if (crc & 0x80) != 0 {
            crc = (crc << 1) ^ CRC8_POLY;
        } else {
            crc <<= 1;
        }
        bit += 1;
    }

    crc
}

/// Calculate CRC8-DVB-S2 checksum using the lookup table
///
/// # Arguments
///
/// * `data` - Type byte followed by the payload
///
/// # Examples
///
/// ```
/// use crsf_rx::crsf::crc::crc8_dvb_s2;
///
/// assert_eq!(crc8_dvb_s2(b"123456789"), 0xBC);
/// ```
pub fn crc8_dvb_s2(data: &[u8]) -> u8 {
    data.iter()
        .fold(0, |crc, &byte| CRC8_TABLE[(crc ^ byte) as usize])
}
