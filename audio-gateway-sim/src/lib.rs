//! # audio-gateway-sim
//!
//! Simulated hardware backend for the audio gateway core.
//!
//! Provides:
//! - `SimOutput` — software output channel collecting written PCM
//! - `SimInput` — paced capture channel synthesizing 32-bit capture words
//! - `SimCodecEngine` — transparent codec for loopback validation
//!
//! A real firmware target supplies an I2S/DMA backend behind the same
//! traits; this crate stands in for it on the host, where the session and
//! flow-control behavior can be exercised end to end.
//!
//! ## Usage
//! ```ignore
//! use audio_gateway_core::{AudioPipeline, PipelineConfig, VoiceConfig};
//! use audio_gateway_sim::{SimCodecEngine, SimInput, SimOutput};
//!
//! let output = SimOutput::new();
//! let input = SimInput::paced();
//! let mut pipeline = AudioPipeline::new(
//!     output.clone(),
//!     input,
//!     SimCodecEngine::new(),
//!     PipelineConfig::default(),
//! )?;
//! let link = pipeline.start_voice(VoiceConfig::wideband())?;
//! ```

pub mod codec;
pub mod input;
pub mod output;

pub use codec::SimCodecEngine;
pub use input::SimInput;
pub use output::SimOutput;
