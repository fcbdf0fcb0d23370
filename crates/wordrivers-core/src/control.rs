use serde::{Deserialize, Serialize};

/// One-way commands posted from the page to the embedded game frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ControlMessage {
    #[serde(rename = "setMute")]
    SetMute { value: bool },
}

/// Page-owned mute state for the embedded game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MuteControl {
    muted: bool,
}

impl MuteControl {
    pub fn new(muted: bool) -> Self {
        Self { muted }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Flip the state and return the command that tells the frame about it.
    pub fn toggle(&mut self) -> ControlMessage {
        self.muted = !self.muted;
        ControlMessage::SetMute { value: self.muted }
    }

    /// Set an explicit state. `None` when nothing changed.
    pub fn set(&mut self, muted: bool) -> Option<ControlMessage> {
        if self.muted == muted {
            return None;
        }
        self.muted = muted;
        Some(ControlMessage::SetMute { value: muted })
    }

    /// Accessible label for the mute button.
    pub fn button_label(&self) -> &'static str {
        if self.muted { "Unmute game" } else { "Mute game" }
    }
}
