use serde::{Deserialize, Serialize};

use super::config::{CodecMode, VoiceConfig};

/// Identity of a voice session.
///
/// Serializable for export to host-side diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceSessionInfo {
    pub id: String,
    pub mode: CodecMode,
    pub link_frame_len: usize,
    pub started_at: String,
}

impl VoiceSessionInfo {
    pub(crate) fn new(config: &VoiceConfig) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            mode: config.mode,
            link_frame_len: config.link_frame_len,
            started_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Counters describing a voice link's data flow, snapshotted on request.
///
/// The wireless stack polls this instead of the core pushing periodic
/// statistics into the producer callback path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkDiagnostics {
    /// Compressed frames delivered by the wireless stack.
    pub downlink_frames: u64,
    /// Frames the decoder rejected; dropped, never fatal.
    pub decode_failures: u64,
    /// Uplink frames handed back to the wireless stack.
    pub uplink_frames: u64,
    /// Downlink deliveries that found no uplink data ready.
    pub uplink_empty_pulls: u64,
    /// Encoded capture frames accepted into the voice-input buffer.
    pub capture_frames: u64,
    /// Encoded capture frames rejected by flow control.
    pub capture_dropped: u64,
}
