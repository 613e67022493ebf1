//! # Telemetry Module
//!
//! Channel consumer side: turns decoder snapshots into output lines.
//!
//! This module handles:
//! - Plain text channel lines (`CH: 1500 1500 ...`)
//! - JSON Lines records with UTC timestamps and decoder counters
//! - Link connected/lost transition tracking

pub mod record;

pub use record::{format_jsonl, format_text, ChannelRecord};

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::crsf::decoder::ChannelSnapshot;
use crate::error::Result;

/// Output line format of the channel monitor
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Jsonl,
}

/// Link state change reported by [`LinkState::update`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkTransition {
    Acquired,
    Lost,
}

/// Remembers the last connectivity state to report edges only
#[derive(Debug, Default)]
pub struct LinkState {
    connected: bool,
}

impl LinkState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the current state, returning a transition if it changed
    pub fn update(&mut self, connected: bool) -> Option<LinkTransition> {
        if connected == self.connected {
            return None;
        }

        self.connected = connected;
        Some(if connected {
            LinkTransition::Acquired
        } else {
            LinkTransition::Lost
        })
    }
}

/// Render one monitor line for the current snapshot
///
/// Text lines are only produced while connected, since the channel values
/// are stale otherwise. JSONL records are always produced and carry the
/// link state in `connected`.
pub fn render_line(
    format: OutputFormat,
    snapshot: &ChannelSnapshot,
    connected: bool,
    shown: usize,
    timestamp: DateTime<Utc>,
) -> Result<Option<String>> {
    match format {
        OutputFormat::Text if connected => Ok(Some(format_text(snapshot, shown))),
        OutputFormat::Text => Ok(None),
        OutputFormat::Jsonl => {
            let record = ChannelRecord::new(snapshot, connected, shown, timestamp);
            format_jsonl(&record).map(Some)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_link_state_starts_disconnected() {
        let mut state = LinkState::new();
        assert_eq!(state.update(false), None);
    }

    #[test]
    fn test_link_state_reports_edges_once() {
        let mut state = LinkState::new();

        assert_eq!(state.update(true), Some(LinkTransition::Acquired));
        assert_eq!(state.update(true), None);
        assert_eq!(state.update(false), Some(LinkTransition::Lost));
        assert_eq!(state.update(false), None);
        assert_eq!(state.update(true), Some(LinkTransition::Acquired));
    }

    #[test]
    fn test_render_text_only_while_connected() {
        let snapshot = ChannelSnapshot::default();
        let now = Utc::now();

        let line = render_line(OutputFormat::Text, &snapshot, true, 2, now).unwrap();
        assert_eq!(line.as_deref(), Some("CH:    0    0"));

        let line = render_line(OutputFormat::Text, &snapshot, false, 2, now).unwrap();
        assert_eq!(line, None);
    }

    #[test]
    fn test_render_jsonl_reports_link_state() {
        let snapshot = ChannelSnapshot::default();
        let timestamp = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

        for connected in [true, false] {
            let line = render_line(OutputFormat::Jsonl, &snapshot, connected, 4, timestamp)
                .unwrap()
                .expect("JSONL records are emitted in both link states");

            let value: serde_json::Value = serde_json::from_str(&line).unwrap();
            assert_eq!(value["connected"], connected);
            assert_eq!(value["channels"], serde_json::json!([0, 0, 0, 0]));
        }
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Text);
    }
}
