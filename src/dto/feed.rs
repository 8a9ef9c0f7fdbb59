//! Messages received on the streaming scoreboard feed.

use serde::Deserialize;
use serde_with::{DefaultOnNull, serde_as};

use crate::state::board::{ScoreBoard, ScoreChangeLog, Team};

/// Payload of a `COMPETITION_DATA_CHANGE` message.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotPayload {
    /// Replacement snapshot.
    pub score_board: ScoreBoard,
    /// Complete replacement history.
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub score_histories: Vec<ScoreChangeLog>,
}

/// Payload of a `SCORE_UPDATE` message.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreDeltaPayload {
    /// Replacement team list.
    pub teams: Vec<Team>,
    /// History entries to append.
    #[serde(default)]
    #[serde_as(deserialize_as = "DefaultOnNull")]
    pub score_histories: Vec<ScoreChangeLog>,
}

/// Decoded feed message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedMessage {
    /// Replaces the whole board, team list and history.
    FullSnapshot(SnapshotPayload),
    /// Replaces the team list and appends history.
    ScoreDelta(ScoreDeltaPayload),
    /// Connection keepalive without payload.
    Keepalive,
    /// Anything that is not valid JSON or does not match a known shape.
    Unrecognized {
        /// Value of the `type` field when one could be read.
        kind: Option<String>,
        /// Why decoding failed.
        reason: String,
    },
}

/// Feed frame as it appears on the wire: `{"type": ..., "payload": ...}`.
#[derive(Deserialize)]
#[serde(tag = "type", content = "payload")]
enum WireMessage {
    #[serde(rename = "COMPETITION_DATA_CHANGE")]
    DataChange(SnapshotPayload),
    #[serde(rename = "SCORE_UPDATE")]
    ScoreUpdate(ScoreDeltaPayload),
    #[serde(rename = "KEEPALIVE", alias = "PING", alias = "HEARTBEAT")]
    Keepalive,
    #[serde(other)]
    Unknown,
}

/// Just the discriminator, read again when a frame fails to decode.
#[derive(Deserialize)]
struct WireType {
    #[serde(rename = "type", default)]
    kind: Option<String>,
}

impl FeedMessage {
    /// Decode one text frame. Never fails: bad input becomes [`FeedMessage::Unrecognized`].
    pub fn decode(text: &str) -> Self {
        match serde_json::from_str::<WireMessage>(text) {
            Ok(WireMessage::DataChange(payload)) => Self::FullSnapshot(payload),
            Ok(WireMessage::ScoreUpdate(payload)) => Self::ScoreDelta(payload),
            Ok(WireMessage::Keepalive) => Self::Keepalive,
            Ok(WireMessage::Unknown) => Self::unrecognized(text, "unknown message type".into()),
            Err(err) => Self::unrecognized(text, err.to_string()),
        }
    }

    /// Short label used in logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::FullSnapshot(_) => "full_snapshot",
            Self::ScoreDelta(_) => "score_delta",
            Self::Keepalive => "keepalive",
            Self::Unrecognized { .. } => "unrecognized",
        }
    }

    fn unrecognized(text: &str, reason: String) -> Self {
        let kind = serde_json::from_str::<WireType>(text)
            .ok()
            .and_then(|wire| wire.kind);
        Self::Unrecognized { kind, reason }
    }
}
