//! # audio-gateway-core
//!
//! Platform-agnostic streaming core of a hands-free audio gateway.
//!
//! Moves audio bytes between an asynchronous, callback-driven wireless
//! source and a synchronous, fixed-cadence hardware interface without ever
//! blocking the callback side. Platform backends implement the
//! `AudioOutput`/`AudioInput` and `CodecEngine` traits and plug into the
//! generic `AudioPipeline`.
//!
//! ## Architecture
//!
//! ```text
//! audio-gateway-core (this crate)
//! ├── traits/       ← AudioOutput, AudioInput, CodecEngine, VoiceDecoder, VoiceEncoder
//! ├── models/       ← GatewayError, FlowMode, OutputOwner, configs, session info
//! ├── processing/   ← FlowBuffer (flow-controlled ring), PCM slot conversions
//! └── session/      ← AudioPipeline, worker tasks, output arbiter, VoiceLink
//! ```
//!
//! ## Data flow
//!
//! ```text
//! wireless stack ─decode→ [voice-out FlowBuffer] → voice-out worker → hardware out
//! hardware in → voice-in worker ─encode→ [voice-in FlowBuffer] ─pull→ wireless stack
//! wireless stack ───────→ [media-out FlowBuffer] → media-out worker → hardware out
//! ```
//!
//! The two session types are mutually exclusive on the hardware output;
//! `AudioPipeline` arbitrates ownership and tears sessions down through a
//! cooperative stop handshake so no worker ever touches a reclaimed buffer.

pub mod models;
pub mod processing;
pub mod session;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use models::config::{
    ClockConfig, CodecMode, HardwareFormat, MediaFormat, PipelineConfig, SlotConfig, SlotMode,
    VoiceConfig,
};
pub use models::error::GatewayError;
pub use models::session_info::{LinkDiagnostics, VoiceSessionInfo};
pub use models::state::{FlowMode, OutputOwner};
pub use processing::flow_buffer::{BufferStats, FlowBuffer};
pub use session::arbiter::{OutputArbiter, OutputClaim};
pub use session::link::VoiceLink;
pub use session::pipeline::{AudioPipeline, MediaFeed};
pub use traits::audio_channel::{AudioInput, AudioOutput};
pub use traits::codec_engine::{CodecEngine, DecodeInfo, DecodedFrame, VoiceDecoder, VoiceEncoder};
