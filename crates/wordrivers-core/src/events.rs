use serde::{Deserialize, Serialize};

/// Open-ended analytics attributes. Values are restricted to JSON.
pub type Attributes = serde_json::Map<String, serde_json::Value>;

/// Message type sent by the game host when a level is finished.
pub const RIVER_CLEARED: &str = "riverCleared";

/// Message type sent by the game host once the game is playable.
pub const GAME_LOADED: &str = "gameLoaded";

/// Analytics event names emitted by the site.
pub mod names {
    pub const WORD_CHAIN_COMPLETE: &str = "word_chain_complete";
    pub const GAME_START: &str = "game_start";
    /// The page asked the visitor to rotate to landscape.
    pub const ORIENTATION_PROMPT: &str = "orientation_prompt";
}

/// Inbound message from an embedded game frame. Untrusted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeEvent {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl BridgeEvent {
    /// `data.level` when it is a non-zero number, otherwise level 1.
    pub fn level(&self) -> serde_json::Value {
        self.data
            .as_ref()
            .and_then(|d| d.get("level"))
            .filter(|v| v.as_f64().is_some_and(|n| n != 0.0))
            .cloned()
            .unwrap_or_else(|| serde_json::Value::from(1))
    }
}

/// Analytics events the site knows how to derive from frame messages.
#[derive(Debug, Clone, PartialEq)]
pub enum GameSignal {
    RiverCleared { level: serde_json::Value },
    GameLoaded,
}

impl GameSignal {
    /// Map a frame message to a signal. Unknown types map to `None`.
    pub fn from_event(event: &BridgeEvent) -> Option<Self> {
        match event.kind.as_str() {
            RIVER_CLEARED => Some(Self::RiverCleared {
                level: event.level(),
            }),
            GAME_LOADED => Some(Self::GameLoaded),
            _ => None,
        }
    }

    pub fn analytics_name(&self) -> &'static str {
        match self {
            Self::RiverCleared { .. } => names::WORD_CHAIN_COMPLETE,
            Self::GameLoaded => names::GAME_START,
        }
    }

    pub fn into_attributes(self) -> Attributes {
        let mut attrs = Attributes::new();
        if let Self::RiverCleared { level } = self {
            attrs.insert("level".to_string(), level);
        }
        attrs
    }
}
