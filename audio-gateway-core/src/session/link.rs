//! Bridge between the wireless voice link and the hardware path buffers.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::models::session_info::LinkDiagnostics;
use crate::processing::flow_buffer::FlowBuffer;
use crate::traits::codec_engine::VoiceDecoder;

struct LinkShared {
    decoder: Mutex<Box<dyn VoiceDecoder>>,
    /// Voice-output buffer: decoded PCM on its way to the hardware.
    downlink: Arc<FlowBuffer>,
    /// Voice-input buffer: encoded capture frames on their way to the link.
    uplink: Arc<FlowBuffer>,
    link_frame_len: usize,
    connected: AtomicBool,
    downlink_frames: AtomicU64,
    decode_failures: AtomicU64,
    uplink_frames: AtomicU64,
    uplink_empty_pulls: AtomicU64,
}

/// The wireless profile stack's handle to an active voice session.
///
/// The stack calls `on_downlink_frame` from its own execution context for
/// every inbound compressed frame; the call decodes into the playback path
/// and, in the same breath, hands back at most one uplink frame to send.
/// Nothing here blocks and nothing here fails upward.
///
/// After the session stops the handle is inert: deliveries return `None`
/// without touching the codec.
#[derive(Clone)]
pub struct VoiceLink {
    shared: Arc<LinkShared>,
}

impl VoiceLink {
    pub(crate) fn new(
        decoder: Box<dyn VoiceDecoder>,
        downlink: Arc<FlowBuffer>,
        uplink: Arc<FlowBuffer>,
        link_frame_len: usize,
    ) -> Self {
        Self {
            shared: Arc::new(LinkShared {
                decoder: Mutex::new(decoder),
                downlink,
                uplink,
                link_frame_len,
                connected: AtomicBool::new(true),
                downlink_frames: AtomicU64::new(0),
                decode_failures: AtomicU64::new(0),
                uplink_frames: AtomicU64::new(0),
                uplink_empty_pulls: AtomicU64::new(0),
            }),
        }
    }

    /// Accept one compressed downlink frame and return at most one uplink
    /// frame, capped to the link's negotiated frame size.
    ///
    /// A decode failure drops the frame and the session continues; the
    /// uplink side still gets its paired pull. The pull is zero-wait, so
    /// this never stalls the wireless stack's callback context.
    pub fn on_downlink_frame(&self, frame: &[u8]) -> Option<Vec<u8>> {
        let shared = &self.shared;
        if !shared.connected.load(Ordering::Acquire) {
            return None;
        }
        shared.downlink_frames.fetch_add(1, Ordering::Relaxed);

        match shared.decoder.lock().decode(frame) {
            Ok(decoded) => {
                shared.downlink.push(&decoded.pcm);
            }
            Err(e) => {
                shared.decode_failures.fetch_add(1, Ordering::Relaxed);
                log::warn!("downlink decode failed, frame dropped: {}", e);
            }
        }

        let uplink = shared.uplink.pull(shared.link_frame_len, Duration::ZERO);
        if uplink.is_empty() {
            shared.uplink_empty_pulls.fetch_add(1, Ordering::Relaxed);
            return None;
        }
        shared.uplink_frames.fetch_add(1, Ordering::Relaxed);
        Some(uplink)
    }

    pub fn is_connected(&self) -> bool {
        self.shared.connected.load(Ordering::Acquire)
    }

    /// Snapshot of the link's flow counters.
    pub fn diagnostics(&self) -> LinkDiagnostics {
        let shared = &self.shared;
        let capture = shared.uplink.stats();
        LinkDiagnostics {
            downlink_frames: shared.downlink_frames.load(Ordering::Relaxed),
            decode_failures: shared.decode_failures.load(Ordering::Relaxed),
            uplink_frames: shared.uplink_frames.load(Ordering::Relaxed),
            uplink_empty_pulls: shared.uplink_empty_pulls.load(Ordering::Relaxed),
            capture_frames: capture.accepted,
            capture_dropped: capture.dropped,
        }
    }

    /// Mark the session gone. Called by the pipeline before teardown so a
    /// retained handle cannot keep feeding a dying path.
    pub(crate) fn disconnect(&self) {
        self.shared.connected.store(false, Ordering::Release);
    }
}
