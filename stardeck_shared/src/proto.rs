//! Wire protocol.
//!
//! The relay speaks named events with JSON payloads. Each direction is a
//! tagged enum here, so malformed or missing fields are defaulted at the
//! deserialization boundary instead of being probed for in scene logic.
//! Event and field names are pinned to the relay contract and must not
//! change.

use anyhow::Context;
use bytes::Bytes;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::anim::AnimId;

/// Scene key the transition trigger asks the relay to progress everyone to.
pub const NEXT_SCENE: &str = "DesertScene";

/// Unique identifier the transport assigns to each connected session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        SessionId(s.to_string())
    }
}

/// One player's state as carried by `updatePlayers` in either direction.
///
/// Outbound snapshots omit `id` (the relay stamps it); inbound entries carry
/// it. `animation` is the pose currently playing, `key` the category label
/// peers use for flip/terminal decisions, absent only in the terminal
/// knockdown snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<SessionId>,
    pub posx: f32,
    pub posy: f32,
    pub velocityx: f32,
    pub velocityy: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<AnimId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<AnimId>,
}

/// Payload of the scene-progress approval broadcast.
///
/// The scene forwards it to the next scene after stamping its own session id
/// and slot into it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneHandoff {
    #[serde(rename = "mapaActual")]
    pub mapa_actual: String,
    #[serde(rename = "socketId", default, skip_serializing_if = "Option::is_none")]
    pub socket_id: Option<SessionId>,
    #[serde(rename = "myNumber", default, skip_serializing_if = "Option::is_none")]
    pub my_number: Option<u32>,
}

/// Events delivered by the relay to this client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    /// Synthesized by the connection adapter once the transport has assigned
    /// a session id.
    #[serde(rename = "connect")]
    Connect { id: SessionId },
    #[serde(rename = "initialCoordinates")]
    InitialCoordinates { x: f32, y: f32 },
    #[serde(rename = "firstPlayer")]
    FirstPlayer(bool),
    #[serde(rename = "playerNumber")]
    PlayerNumber(u32),
    #[serde(rename = "goToDesert")]
    GoToDesert(SceneHandoff),
    #[serde(rename = "updatePlayers")]
    UpdatePlayers(Vec<PlayerSnapshot>),
    #[serde(rename = "playerDisconnected")]
    PlayerDisconnected(SessionId),
}

/// Events this client emits to the relay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ClientEvent {
    #[serde(rename = "updatePlayers")]
    UpdatePlayers(PlayerSnapshot),
    #[serde(rename = "goToDesert")]
    GoToDesert {
        #[serde(rename = "mapaActual")]
        mapa_actual: String,
    },
}

impl ClientEvent {
    /// The progress request the transition affordance sends.
    pub fn go_to_next_scene() -> Self {
        ClientEvent::GoToDesert {
            mapa_actual: NEXT_SCENE.to_string(),
        }
    }
}

/// Convenience codec helpers.
pub fn encode_event<T: Serialize>(ev: &T) -> anyhow::Result<Bytes> {
    let payload = serde_json::to_vec(ev).context("serialize event")?;
    Ok(Bytes::from(payload))
}

pub fn decode_event<T: DeserializeOwned>(b: &[u8]) -> anyhow::Result<T> {
    serde_json::from_slice(b).context("deserialize event")
}
