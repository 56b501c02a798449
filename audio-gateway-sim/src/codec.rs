//! Transparent codec engine.
//!
//! Frames pass through unchanged in both directions, which makes loopback
//! assertions trivial: what the link delivers is what the speaker path
//! plays, and what the microphone path captures is what the link sends.

use audio_gateway_core::{
    CodecEngine, CodecMode, DecodeInfo, DecodedFrame, GatewayError, VoiceDecoder, VoiceEncoder,
};

struct TransparentDecoder {
    info: DecodeInfo,
}

impl VoiceDecoder for TransparentDecoder {
    fn decode(&mut self, frame: &[u8]) -> Result<DecodedFrame, GatewayError> {
        if frame.is_empty() {
            return Err(GatewayError::Codec("empty frame".into()));
        }
        Ok(DecodedFrame {
            pcm: frame.to_vec(),
            info: self.info,
        })
    }
}

struct TransparentEncoder;

impl VoiceEncoder for TransparentEncoder {
    fn encode(&mut self, pcm: &[u8]) -> Result<Vec<u8>, GatewayError> {
        Ok(pcm.to_vec())
    }
}

/// Pass-through stand-in for the external voice codec service.
#[derive(Clone, Default)]
pub struct SimCodecEngine {
    refuse_open: bool,
}

impl SimCodecEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// An engine whose open calls fail, for session-start failure tests.
    pub fn unavailable() -> Self {
        Self { refuse_open: true }
    }
}

impl CodecEngine for SimCodecEngine {
    fn open_decoder(&self, mode: CodecMode) -> Result<Box<dyn VoiceDecoder>, GatewayError> {
        if self.refuse_open {
            return Err(GatewayError::Codec("decoder unavailable".into()));
        }
        log::info!("sim decoder opened ({:?})", mode);
        Ok(Box::new(TransparentDecoder {
            info: DecodeInfo {
                sample_rate: mode.sample_rate(),
                channels: 1,
            },
        }))
    }

    fn open_encoder(&self, mode: CodecMode) -> Result<Box<dyn VoiceEncoder>, GatewayError> {
        if self.refuse_open {
            return Err(GatewayError::Codec("encoder unavailable".into()));
        }
        log::info!("sim encoder opened ({:?})", mode);
        Ok(Box::new(TransparentEncoder))
    }
}
