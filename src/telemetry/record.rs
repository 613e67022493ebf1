//! Channel output records

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::crsf::decoder::{ChannelSnapshot, DecoderStats};
use crate::crsf::protocol::CRSF_NUM_CHANNELS;
use crate::error::Result;

/// One JSON Lines record
#[derive(Debug, Clone, Serialize)]
pub struct ChannelRecord {
    pub timestamp: DateTime<Utc>,
    pub connected: bool,
    pub channels: Vec<u16>,
    pub stats: DecoderStats,
}

impl ChannelRecord {
    /// Build a record from the first `shown` channels of a snapshot
    pub fn new(snapshot: &ChannelSnapshot, connected: bool, shown: usize, timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            connected,
            channels: snapshot.channels[..shown.min(CRSF_NUM_CHANNELS)].to_vec(),
            stats: snapshot.stats,
        }
    }
}

/// Format the first `shown` channels as a fixed-width text line
///
/// # Examples
///
/// ```
/// use crsf_rx::crsf::decoder::ChannelSnapshot;
/// use crsf_rx::telemetry::format_text;
///
/// let snapshot = ChannelSnapshot::default();
/// assert_eq!(format_text(&snapshot, 2), "CH:    0    0");
/// ```
pub fn format_text(snapshot: &ChannelSnapshot, shown: usize) -> String {
    let mut line = String::from("CH:");
    for value in snapshot.channels.iter().take(shown) {
        line.push_str(&format!(" {:4}", value));
    }
    line
}

/// Serialize one JSON Lines record (no trailing newline)
pub fn format_jsonl(record: &ChannelRecord) -> Result<String> {
    Ok(serde_json::to_string(record)?)
}
