use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Channel layout of a hardware audio channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotMode {
    Mono,
    Stereo,
}

impl SlotMode {
    pub fn channels(self) -> u16 {
        match self {
            Self::Mono => 1,
            Self::Stereo => 2,
        }
    }
}

/// Clock configuration of a hardware channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockConfig {
    pub sample_rate: u32,
}

/// Slot (frame layout) configuration of a hardware channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotConfig {
    pub bit_width: u16,
    pub mode: SlotMode,
}

/// Complete clock + slot shape of a hardware channel.
///
/// Applied through `reconfigure`, which is only valid while the channel is
/// disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardwareFormat {
    pub clock: ClockConfig,
    pub slot: SlotConfig,
}

impl HardwareFormat {
    /// Output shape for the media (streaming) path.
    pub fn media(format: MediaFormat) -> Self {
        Self {
            clock: ClockConfig {
                sample_rate: format.sample_rate,
            },
            slot: SlotConfig {
                bit_width: 16,
                mode: format.slot_mode,
            },
        }
    }

    /// Output shape for the voice path: 16-bit mono at the codec rate.
    pub fn voice_output(mode: CodecMode) -> Self {
        Self {
            clock: ClockConfig {
                sample_rate: mode.sample_rate(),
            },
            slot: SlotConfig {
                bit_width: 16,
                mode: SlotMode::Mono,
            },
        }
    }

    /// Input shape for the voice path. The capture hardware delivers 32-bit
    /// words with the 24-bit sample left-aligned.
    pub fn voice_input(mode: CodecMode) -> Self {
        Self {
            clock: ClockConfig {
                sample_rate: mode.sample_rate(),
            },
            slot: SlotConfig {
                bit_width: 32,
                mode: SlotMode::Mono,
            },
        }
    }
}

/// Negotiated codec mode of the wireless voice link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodecMode {
    Narrowband,
    Wideband,
}

impl CodecMode {
    pub fn sample_rate(self) -> u32 {
        match self {
            Self::Narrowband => 8_000,
            Self::Wideband => 16_000,
        }
    }

    /// PCM samples per codec frame (7.5 ms at the mode's rate).
    pub fn frame_samples(self) -> usize {
        match self {
            Self::Narrowband => 60,
            Self::Wideband => 120,
        }
    }

    /// Encoded frame size the link uses unless negotiation says otherwise.
    pub fn default_link_frame_len(self) -> usize {
        match self {
            Self::Narrowband => 120,
            Self::Wideband => 57,
        }
    }
}

/// Format of the media path, renegotiated by the wireless stack at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaFormat {
    pub sample_rate: u32,
    pub slot_mode: SlotMode,
}

impl Default for MediaFormat {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            slot_mode: SlotMode::Stereo,
        }
    }
}

/// Parameters of a voice session, carried by the wireless stack's
/// audio-connected signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceConfig {
    pub mode: CodecMode,
    /// Negotiated maximum frame size of the voice link. Uplink frames are
    /// capped to this many bytes.
    pub link_frame_len: usize,
}

impl VoiceConfig {
    pub fn narrowband() -> Self {
        Self::for_mode(CodecMode::Narrowband)
    }

    pub fn wideband() -> Self {
        Self::for_mode(CodecMode::Wideband)
    }

    pub fn for_mode(mode: CodecMode) -> Self {
        Self {
            mode,
            link_frame_len: mode.default_link_frame_len(),
        }
    }
}

/// Tuning knobs of the pipeline. The defaults mirror the shipped firmware:
/// a 32 KiB media buffer prefetched at 20 KiB, voice buffers holding 32
/// frames prefetched at 20, and a 40 ms prefetch poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Media buffer capacity in bytes.
    pub media_capacity: usize,
    /// Media fill level at which prefetching hands over to processing.
    pub media_prefetch_level: usize,
    /// Bytes moved to the output per media worker iteration, sized to the
    /// hardware's DMA transfer granularity.
    pub media_chunk: usize,
    /// Voice buffer capacity, in codec frames.
    pub voice_buffered_frames: usize,
    /// Voice prefetch level, in codec frames.
    pub voice_prefetch_frames: usize,
    /// How long a worker sleeps between polls while its buffer prefetches.
    pub prefetch_poll: Duration,
    /// Upper bound on a single hardware read or write.
    pub io_timeout: Duration,
    /// Upper bound on waiting for a worker's stop acknowledgment.
    pub stop_timeout: Duration,
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.media_capacity == 0 {
            return Err("media capacity must be positive".into());
        }
        if self.media_prefetch_level >= self.media_capacity {
            return Err("media prefetch level must be below capacity".into());
        }
        if self.media_chunk == 0 || self.media_chunk > self.media_capacity {
            return Err(format!(
                "media chunk size {} out of range",
                self.media_chunk
            ));
        }
        if self.voice_buffered_frames == 0 {
            return Err("voice buffer must hold at least one frame".into());
        }
        if self.voice_prefetch_frames >= self.voice_buffered_frames {
            return Err("voice prefetch level must be below capacity".into());
        }
        if self.prefetch_poll.is_zero() {
            return Err("prefetch poll interval must be positive".into());
        }
        Ok(())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            media_capacity: 32 * 1024,
            media_prefetch_level: 20 * 1024,
            media_chunk: 240 * 6,
            voice_buffered_frames: 32,
            voice_prefetch_frames: 20,
            prefetch_poll: Duration::from_millis(40),
            io_timeout: Duration::from_millis(100),
            stop_timeout: Duration::from_secs(1),
        }
    }
}
