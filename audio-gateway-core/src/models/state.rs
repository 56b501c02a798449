use serde::{Deserialize, Serialize};

/// Backpressure mode of a `FlowBuffer`.
///
/// Mode transitions:
/// ```text
/// prefetching ──(fill >= prefetch level)─────────────→ processing
/// processing ───(push would exceed capacity)─────────→ dropping
/// dropping ─────(fill <= prefetch level, at a push)──→ processing
/// processing/dropping ──(pull finds buffer empty)────→ prefetching
/// ```
///
/// `Dropping` rejects the newest incoming data with no copy, so buffered
/// bytes keep their original order with forward gaps, never reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowMode {
    /// Buffering incoming audio, the consumer is draining.
    Processing,
    /// Building backlog before the consumer touches hardware.
    Prefetching,
    /// Full; incoming audio is rejected until the backlog drains.
    Dropping,
}

impl FlowMode {
    pub fn is_processing(self) -> bool {
        matches!(self, Self::Processing)
    }

    pub fn is_prefetching(self) -> bool {
        matches!(self, Self::Prefetching)
    }

    pub fn is_dropping(self) -> bool {
        matches!(self, Self::Dropping)
    }
}

/// Which session currently drives the shared hardware output path.
///
/// At most one owner at a time. `Voice` additionally owns the input path;
/// `Media` never does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputOwner {
    None,
    Media,
    Voice,
}

impl OutputOwner {
    pub fn is_none(self) -> bool {
        matches!(self, Self::None)
    }
}
