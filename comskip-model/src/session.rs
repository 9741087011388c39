use crate::ids::SessionKey;

/// Command name a client advertises when it can show on-screen messages.
pub const DISPLAY_MESSAGE_COMMAND: &str = "DisplayMessage";

/// Capability snapshot of a connected playback session.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionInfo {
    pub key: SessionKey,
    pub device_id: String,
    pub supports_remote_control: bool,
    pub supported_commands: Vec<String>,
}

impl SessionInfo {
    pub fn supports_display_message(&self) -> bool {
        self.supported_commands
            .iter()
            .any(|command| command == DISPLAY_MESSAGE_COMMAND)
    }
}
