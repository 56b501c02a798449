use crate::models::config::CodecMode;
use crate::models::error::GatewayError;

/// What a decoder reported about a decoded frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeInfo {
    pub sample_rate: u32,
    pub channels: u16,
}

/// One decoded PCM frame plus the decoder's report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedFrame {
    pub pcm: Vec<u8>,
    pub info: DecodeInfo,
}

/// Streaming decoder handle for one voice session. Closing is dropping.
pub trait VoiceDecoder: Send {
    /// Decode one compressed link frame to 16-bit PCM.
    fn decode(&mut self, frame: &[u8]) -> Result<DecodedFrame, GatewayError>;
}

/// Streaming encoder handle for one voice session. Closing is dropping.
pub trait VoiceEncoder: Send {
    /// Encode one PCM frame to a compressed link frame.
    fn encode(&mut self, pcm: &[u8]) -> Result<Vec<u8>, GatewayError>;
}

/// The external voice codec service, treated as a black box.
///
/// The core only sizes buffers around it and handles its failures; the
/// bit-stream format is the engine's business. Handles are opened per
/// session and closed by drop.
pub trait CodecEngine: Send + Sync {
    fn open_decoder(&self, mode: CodecMode) -> Result<Box<dyn VoiceDecoder>, GatewayError>;

    fn open_encoder(&self, mode: CodecMode) -> Result<Box<dyn VoiceEncoder>, GatewayError>;
}
