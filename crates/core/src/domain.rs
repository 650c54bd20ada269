//! Grenade lineup domain types.

use serde::{Deserialize, Serialize};

/// Competitive map pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CsMap {
    Ancient,
    Anubis,
    Cache,
    Dust2,
    Inferno,
    Mirage,
    Nuke,
    Overpass,
    Train,
    Vertigo,
}

impl CsMap {
    /// Canonical uppercase name, used in captions and hashtags.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ancient => "ANCIENT",
            Self::Anubis => "ANUBIS",
            Self::Cache => "CACHE",
            Self::Dust2 => "DUST2",
            Self::Inferno => "INFERNO",
            Self::Mirage => "MIRAGE",
            Self::Nuke => "NUKE",
            Self::Overpass => "OVERPASS",
            Self::Train => "TRAIN",
            Self::Vertigo => "VERTIGO",
        }
    }
}

/// Grenade kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GrenadeKind {
    He,
    Flash,
    Molotov,
    Smoke,
    Decoy,
}

impl GrenadeKind {
    /// Canonical uppercase name, used in captions and hashtags.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::He => "HE",
            Self::Flash => "FLASH",
            Self::Molotov => "MOLOTOV",
            Self::Smoke => "SMOKE",
            Self::Decoy => "DECOY",
        }
    }
}

/// Team side the lineup is thrown from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Side {
    Ct,
    T,
}

impl Side {
    /// Canonical uppercase name, used in captions and hashtags.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ct => "CT",
            Self::T => "T",
        }
    }
}

/// Platform file references for the media bundle, already uploaded upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRefs {
    /// Lineup clip.
    pub video: String,
    /// Photo of the throw setup.
    pub setup_photo: String,
    /// Photo of the grenade landing.
    pub finish_photo: String,
}

/// Fully assembled input to the publish choreography.
///
/// Built and validated entirely by the upstream data-collection flow;
/// immutable once enqueued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishPayload {
    /// Content record id; doubles as the job idempotency key component.
    pub content_id: i64,
    pub map: CsMap,
    pub grenade: GrenadeKind,
    pub side: Side,
    /// 1 (easy) to 3 (hard).
    pub difficulty: u8,
    /// Throw position name.
    pub from_position: String,
    /// Landing position name.
    pub to_position: String,
    /// Movement/throw key combination, e.g. "W + LMB".
    pub key_combo: String,
    /// Seconds from round start when the throw lands best.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_timing: Option<u32>,
    /// Free-text notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub media: MediaRefs,
    /// Live post id, set for edit jobs only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_id: Option<i64>,
}

/// Message identifiers created by a publish, persisted back onto the
/// content record by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishResult {
    /// Id of the first bundle item; the channel post that carries the caption.
    pub post_id: i64,
    /// Id of the setup photo message.
    pub setup_photo_msg_id: i64,
    /// Id of the finish photo message.
    pub finish_photo_msg_id: i64,
}

/// Public links rendered into every post footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelLinks {
    /// Companion bot URL.
    pub bot_url: String,
    /// Channel URL.
    pub channel_url: String,
}
