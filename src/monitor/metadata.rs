/*
 * Copyright 2025 Security Union LLC
 *
 * Licensed under either of
 *
 * * Apache License, Version 2.0
 *   (http://www.apache.org/licenses/LICENSE-2.0)
 * * MIT license
 *   (http://opensource.org/licenses/MIT)
 *
 * at your option.
 *
 * Unless you explicitly state otherwise, any contribution intentionally
 * submitted for inclusion in the work by you, as defined in the Apache-2.0
 * license, shall be dual licensed as above, without any additional terms or
 * conditions.
 */

use crate::source::PlaybackSource;
use serde::Serialize;

/// `HTMLMediaElement.readyState`, labelled for log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReadyState {
    #[serde(rename = "HAVE_NOTHING")]
    Nothing,
    #[serde(rename = "HAVE_METADATA")]
    Metadata,
    #[serde(rename = "HAVE_CURRENT_DATA")]
    CurrentData,
    #[serde(rename = "HAVE_FUTURE_DATA")]
    FutureData,
    #[serde(rename = "HAVE_ENOUGH_DATA")]
    EnoughData,
}

impl ReadyState {
    pub fn from_ordinal(value: u16) -> Option<Self> {
        match value {
            0 => Some(ReadyState::Nothing),
            1 => Some(ReadyState::Metadata),
            2 => Some(ReadyState::CurrentData),
            3 => Some(ReadyState::FutureData),
            4 => Some(ReadyState::EnoughData),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ReadyState::Nothing => "HAVE_NOTHING",
            ReadyState::Metadata => "HAVE_METADATA",
            ReadyState::CurrentData => "HAVE_CURRENT_DATA",
            ReadyState::FutureData => "HAVE_FUTURE_DATA",
            ReadyState::EnoughData => "HAVE_ENOUGH_DATA",
        }
    }
}

/// `HTMLMediaElement.networkState`, labelled for log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NetworkState {
    #[serde(rename = "NETWORK_EMPTY")]
    Empty,
    #[serde(rename = "NETWORK_IDLE")]
    Idle,
    #[serde(rename = "NETWORK_LOADING")]
    Loading,
    #[serde(rename = "NETWORK_NO_SOURCE")]
    NoSource,
}

impl NetworkState {
    pub fn from_ordinal(value: u16) -> Option<Self> {
        match value {
            0 => Some(NetworkState::Empty),
            1 => Some(NetworkState::Idle),
            2 => Some(NetworkState::Loading),
            3 => Some(NetworkState::NoSource),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            NetworkState::Empty => "NETWORK_EMPTY",
            NetworkState::Idle => "NETWORK_IDLE",
            NetworkState::Loading => "NETWORK_LOADING",
            NetworkState::NoSource => "NETWORK_NO_SOURCE",
        }
    }
}

/// `MediaError` code and message, as reported by the element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaErrorInfo {
    pub code: u16,
    pub message: String,
}

/// Point-in-time structured read of a source's playback status.
///
/// Attached to every stalled/waiting/paused log line and to every delayed
/// warning. Unknown ordinals and a missing error serialize as `null` rather
/// than failing the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetadataSnapshot {
    #[serde(rename = "currentTime")]
    pub current_time: f64,
    #[serde(rename = "readyState")]
    pub ready_state: Option<ReadyState>,
    #[serde(rename = "networkState")]
    pub network_state: Option<NetworkState>,
    pub paused: bool,
    pub ended: bool,
    pub muted: bool,
    pub volume: f64,
    pub error: Option<MediaErrorInfo>,
}

impl MetadataSnapshot {
    /// Sample the source right now. Position is rounded to two decimals.
    pub fn sample(source: &dyn PlaybackSource) -> Self {
        Self {
            current_time: round_to_centis(source.current_time()),
            ready_state: ReadyState::from_ordinal(source.ready_state()),
            network_state: NetworkState::from_ordinal(source.network_state()),
            paused: source.paused(),
            ended: source.ended(),
            muted: source.muted(),
            volume: source.volume(),
            error: source.playback_error(),
        }
    }

    /// Pretty JSON rendering used in log lines.
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

fn round_to_centis(value: f64) -> f64 {
    if value.is_finite() {
        (value * 100.0).round() / 100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinals_map_to_labels() {
        assert_eq!(ReadyState::from_ordinal(0), Some(ReadyState::Nothing));
        assert_eq!(ReadyState::from_ordinal(4), Some(ReadyState::EnoughData));
        assert_eq!(ReadyState::from_ordinal(9), None);
        assert_eq!(NetworkState::from_ordinal(3), Some(NetworkState::NoSource));
        assert_eq!(NetworkState::from_ordinal(7), None);
        assert_eq!(ReadyState::EnoughData.label(), "HAVE_ENOUGH_DATA");
        assert_eq!(NetworkState::Idle.label(), "NETWORK_IDLE");
    }

    #[test]
    fn position_rounds_to_two_decimals() {
        assert_eq!(round_to_centis(1.23456), 1.23);
        assert_eq!(round_to_centis(59.999), 60.0);
        assert_eq!(round_to_centis(f64::NAN), 0.0);
    }

    #[test]
    fn snapshot_serializes_with_dom_field_names() {
        let snapshot = MetadataSnapshot {
            current_time: 12.34,
            ready_state: Some(ReadyState::EnoughData),
            network_state: Some(NetworkState::Idle),
            paused: false,
            ended: false,
            muted: true,
            volume: 0.5,
            error: None,
        };
        let json = snapshot.to_pretty_json();
        assert!(json.contains("\"currentTime\": 12.34"));
        assert!(json.contains("\"readyState\": \"HAVE_ENOUGH_DATA\""));
        assert!(json.contains("\"networkState\": \"NETWORK_IDLE\""));
        assert!(json.contains("\"error\": null"));
    }

    #[test]
    fn media_error_serializes_code_and_message() {
        let snapshot = MetadataSnapshot {
            current_time: 0.0,
            ready_state: None,
            network_state: None,
            paused: true,
            ended: false,
            muted: false,
            volume: 1.0,
            error: Some(MediaErrorInfo {
                code: 3,
                message: "decode failure".to_string(),
            }),
        };
        let json = snapshot.to_pretty_json();
        assert!(json.contains("\"readyState\": null"));
        assert!(json.contains("\"code\": 3"));
        assert!(json.contains("\"message\": \"decode failure\""));
    }
}
