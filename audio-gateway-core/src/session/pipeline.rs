//! Session-lifecycle controller for the shared hardware audio path.
//!
//! `AudioPipeline` owns every flow buffer, worker handle, and hardware
//! claim; nothing in this crate lives in process-wide state. The wireless
//! stack drives it from its event context: media streams on the transport's
//! start/stop signals, voice sessions on the audio-connected transitions.

use std::sync::Arc;

use crate::models::config::{CodecMode, HardwareFormat, MediaFormat, PipelineConfig, VoiceConfig};
use crate::models::error::GatewayError;
use crate::models::session_info::VoiceSessionInfo;
use crate::models::state::{FlowMode, OutputOwner};
use crate::processing::flow_buffer::FlowBuffer;
use crate::session::arbiter::{OutputArbiter, OutputClaim};
use crate::session::link::VoiceLink;
use crate::session::worker::{
    spawn_capture_worker, spawn_output_worker, CaptureWorkerParams, OutputWorkerParams,
    WorkerHandle,
};
use crate::traits::audio_channel::{AudioInput, AudioOutput};
use crate::traits::codec_engine::CodecEngine;

/// Producer handle for the media path.
///
/// Handed to the wireless stack's media data callback; `write` never
/// blocks, flow control rejects what the buffer cannot take.
#[derive(Clone)]
pub struct MediaFeed {
    buffer: Arc<FlowBuffer>,
}

impl MediaFeed {
    /// Enqueue media audio. Returns whether the bytes were accepted.
    pub fn write(&self, data: &[u8]) -> bool {
        self.buffer.push(data)
    }

    pub fn mode(&self) -> FlowMode {
        self.buffer.mode()
    }

    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }
}

struct MediaStream {
    buffer: Arc<FlowBuffer>,
    worker: WorkerHandle,
    claim: Arc<OutputClaim>,
    format: MediaFormat,
}

struct VoiceSession {
    link: VoiceLink,
    downlink: Arc<FlowBuffer>,
    uplink: Arc<FlowBuffer>,
    tx_worker: WorkerHandle,
    rx_worker: WorkerHandle,
    info: VoiceSessionInfo,
}

/// Orchestrates the two mutually exclusive audio sessions over one hardware
/// output path.
///
/// Voice sessions additionally own the input path. Ownership moves only
/// through this controller; workers observe their claim and never mutate
/// hardware configuration.
pub struct AudioPipeline {
    output: Arc<dyn AudioOutput>,
    input: Arc<dyn AudioInput>,
    engine: Box<dyn CodecEngine>,
    config: PipelineConfig,
    arbiter: Arc<OutputArbiter>,
    media: Option<MediaStream>,
    voice: Option<VoiceSession>,
}

impl AudioPipeline {
    pub fn new(
        output: impl AudioOutput + 'static,
        input: impl AudioInput + 'static,
        engine: impl CodecEngine + 'static,
        config: PipelineConfig,
    ) -> Result<Self, GatewayError> {
        config.validate().map_err(GatewayError::InvalidConfig)?;
        Ok(Self {
            output: Arc::new(output),
            input: Arc::new(input),
            engine: Box::new(engine),
            config,
            arbiter: Arc::new(OutputArbiter::new()),
            media: None,
            voice: None,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Current owner of the shared output path.
    pub fn owner(&self) -> OutputOwner {
        self.arbiter.owner()
    }

    pub fn media_format(&self) -> Option<MediaFormat> {
        self.media.as_ref().map(|stream| stream.format)
    }

    pub fn voice_session(&self) -> Option<&VoiceSessionInfo> {
        self.voice.as_ref().map(|session| &session.info)
    }

    pub fn voice_link(&self) -> Option<VoiceLink> {
        self.voice.as_ref().map(|session| session.link.clone())
    }

    /// Open the media path and return its producer handle.
    ///
    /// If voice currently owns the output the stream starts passive: its
    /// worker drains the buffer without touching hardware until ownership
    /// reverts on voice stop.
    pub fn start_media(&mut self, format: MediaFormat) -> Result<MediaFeed, GatewayError> {
        if self.media.is_some() {
            return Err(GatewayError::SessionConflict(
                "media stream already started".into(),
            ));
        }

        let buffer = Arc::new(FlowBuffer::new(
            "media-out",
            self.config.media_capacity,
            self.config.media_prefetch_level,
        ));
        let claim = self.arbiter.register(OutputOwner::Media);

        let activate = self.arbiter.owner().is_none();
        if activate {
            self.apply_output_format(&HardwareFormat::media(format))?;
        }

        let worker = spawn_output_worker(OutputWorkerParams {
            name: "media-out",
            buffer: Arc::clone(&buffer),
            output: Arc::clone(&self.output),
            arbiter: Arc::clone(&self.arbiter),
            claim: Arc::clone(&claim),
            chunk_len: self.config.media_chunk,
            swap_pairs: false,
            prefetch_poll: self.config.prefetch_poll,
            io_timeout: self.config.io_timeout,
        });
        let worker = match worker {
            Ok(worker) => worker,
            Err(e) => {
                log::error!("media stream start aborted: {}", e);
                if activate {
                    let _ = self.output.disable();
                }
                return Err(e);
            }
        };

        if activate {
            self.arbiter.activate(&claim);
        } else {
            log::info!(
                "output path held by {:?}, media stream starts passive",
                self.arbiter.owner()
            );
        }

        log::info!(
            "media stream started ({} Hz, {:?})",
            format.sample_rate,
            format.slot_mode
        );
        self.media = Some(MediaStream {
            buffer: Arc::clone(&buffer),
            worker,
            claim,
            format,
        });
        Ok(MediaFeed { buffer })
    }

    /// Apply a renegotiated media format (sample rate or channel change).
    ///
    /// Touches hardware only while media owns the output; otherwise the new
    /// format is applied when ownership reverts.
    pub fn set_media_format(&mut self, format: MediaFormat) -> Result<(), GatewayError> {
        if self.media.is_none() {
            return Err(GatewayError::SessionConflict(
                "no media stream to reconfigure".into(),
            ));
        }
        if let Some(stream) = self.media.as_mut() {
            stream.format = format;
        }
        if self.arbiter.owner() == OutputOwner::Media {
            self.apply_output_format(&HardwareFormat::media(format))?;
        }
        Ok(())
    }

    pub fn stop_media(&mut self) -> Result<(), GatewayError> {
        let Some(stream) = self.media.take() else {
            return Err(GatewayError::SessionConflict(
                "no media stream to stop".into(),
            ));
        };
        let MediaStream {
            buffer,
            worker,
            claim: _claim,
            format: _,
        } = stream;

        worker.signal_stop();
        let result = worker.join(self.config.stop_timeout);
        // handshake seen (or the task is detached and keeps its own Arc):
        // the buffer may be reclaimed now
        drop(buffer);

        if self.arbiter.owner() == OutputOwner::Media {
            self.arbiter.vacate();
            if let Err(e) = self.output.disable() {
                log::warn!("output channel disable failed: {}", e);
                return result.and(Err(e));
            }
        }
        log::info!("media stream stopped");
        result
    }

    /// Start a voice session with the negotiated codec mode, taking the
    /// output path from whoever holds it and the input path with it.
    ///
    /// Any failure aborts the start, releases what was acquired and leaves
    /// the previous owner in place.
    pub fn start_voice(&mut self, voice_config: VoiceConfig) -> Result<VoiceLink, GatewayError> {
        if self.voice.is_some() {
            return Err(GatewayError::SessionConflict(
                "voice session already active".into(),
            ));
        }
        if voice_config.link_frame_len == 0 {
            return Err(GatewayError::InvalidConfig(
                "link frame length must be positive".into(),
            ));
        }

        let mode = voice_config.mode;
        let frame_bytes = mode.frame_samples() * 2;

        let decoder = match self.engine.open_decoder(mode) {
            Ok(decoder) => decoder,
            Err(e) => {
                log::error!("voice session start aborted, decoder open failed: {}", e);
                return Err(e);
            }
        };
        let encoder = match self.engine.open_encoder(mode) {
            Ok(encoder) => encoder,
            Err(e) => {
                log::error!("voice session start aborted, encoder open failed: {}", e);
                return Err(e);
            }
        };

        // both directions start prefetching
        let downlink = Arc::new(FlowBuffer::new(
            "voice-out",
            self.config.voice_buffered_frames * frame_bytes,
            self.config.voice_prefetch_frames * frame_bytes,
        ));
        let uplink = Arc::new(FlowBuffer::new(
            "voice-in",
            self.config.voice_buffered_frames * voice_config.link_frame_len,
            self.config.voice_prefetch_frames * voice_config.link_frame_len,
        ));

        if let Err(e) = self.apply_output_format(&HardwareFormat::voice_output(mode)) {
            log::error!("voice session start aborted, output reshape failed: {}", e);
            self.abort_voice_start();
            return Err(e);
        }
        if let Err(e) = self.bring_up_input(mode) {
            log::error!("voice session start aborted, input bring-up failed: {}", e);
            self.abort_voice_start();
            return Err(e);
        }

        let claim = self.arbiter.register(OutputOwner::Voice);

        let tx_worker = match spawn_output_worker(OutputWorkerParams {
            name: "voice-out",
            buffer: Arc::clone(&downlink),
            output: Arc::clone(&self.output),
            arbiter: Arc::clone(&self.arbiter),
            claim: Arc::clone(&claim),
            chunk_len: frame_bytes,
            swap_pairs: true,
            prefetch_poll: self.config.prefetch_poll,
            io_timeout: self.config.io_timeout,
        }) {
            Ok(worker) => worker,
            Err(e) => {
                log::error!("voice session start aborted: {}", e);
                self.abort_voice_start();
                return Err(e);
            }
        };

        let rx_worker = match spawn_capture_worker(CaptureWorkerParams {
            name: "voice-in",
            buffer: Arc::clone(&uplink),
            input: Arc::clone(&self.input),
            encoder,
            frame_samples: mode.frame_samples(),
            io_timeout: self.config.io_timeout,
        }) {
            Ok(worker) => worker,
            Err(e) => {
                log::error!("voice session start aborted: {}", e);
                tx_worker.signal_stop();
                let _ = tx_worker.join(self.config.stop_timeout);
                self.abort_voice_start();
                return Err(e);
            }
        };

        // ownership flips last so a failed start leaves the previous owner
        // untouched
        self.arbiter.activate(&claim);

        let info = VoiceSessionInfo::new(&voice_config);
        log::info!(
            "voice session {} started ({:?}, {} byte link frames)",
            info.id,
            mode,
            voice_config.link_frame_len
        );

        let link = VoiceLink::new(
            decoder,
            Arc::clone(&downlink),
            Arc::clone(&uplink),
            voice_config.link_frame_len,
        );
        self.voice = Some(VoiceSession {
            link: link.clone(),
            downlink,
            uplink,
            tx_worker,
            rx_worker,
            info,
        });
        Ok(link)
    }

    /// Stop the active voice session.
    ///
    /// Two-phase teardown: both workers are signaled, both stop
    /// acknowledgments are awaited (bounded), and only then are the buffers
    /// reclaimed, the input disabled and the codec handles dropped. The
    /// output returns to the media stream if one is open, else goes idle.
    pub fn stop_voice(&mut self) -> Result<(), GatewayError> {
        let Some(session) = self.voice.take() else {
            return Err(GatewayError::SessionConflict(
                "no active voice session".into(),
            ));
        };
        let VoiceSession {
            link,
            downlink,
            uplink,
            tx_worker,
            rx_worker,
            info,
        } = session;

        // a retained link handle must not keep feeding the dying path
        link.disconnect();

        tx_worker.signal_stop();
        rx_worker.signal_stop();
        let mut result = tx_worker.join(self.config.stop_timeout);
        result = result.and(rx_worker.join(self.config.stop_timeout));

        // both handshakes seen (or the stragglers keep their own Arcs):
        // the session buffers may be reclaimed now
        drop(downlink);
        drop(uplink);

        if let Err(e) = self.input.disable() {
            log::warn!("input channel disable failed: {}", e);
            result = result.and(Err(e));
        }

        // codec handles close as the link and capture worker drop

        let pending_media = self
            .media
            .as_ref()
            .map(|stream| (stream.format, Arc::clone(&stream.claim)));
        if let Some((format, claim)) = pending_media {
            match self.apply_output_format(&HardwareFormat::media(format)) {
                Ok(()) => {
                    self.arbiter.activate(&claim);
                    log::info!("output path returned to the media stream");
                }
                Err(e) => {
                    log::warn!("media format restore failed: {}", e);
                    self.arbiter.vacate();
                    let _ = self.output.disable();
                    result = result.and(Err(e));
                }
            }
        } else {
            self.arbiter.vacate();
            if let Err(e) = self.output.disable() {
                log::warn!("output channel disable failed: {}", e);
                result = result.and(Err(e));
            }
        }

        log::info!("voice session {} stopped", info.id);
        result
    }

    /// Reconfiguration is only legal while the channel is disabled.
    fn apply_output_format(&self, format: &HardwareFormat) -> Result<(), GatewayError> {
        self.output.disable()?;
        self.output.reconfigure(format)?;
        self.output.enable()
    }

    fn bring_up_input(&self, mode: CodecMode) -> Result<(), GatewayError> {
        self.input.reconfigure(&HardwareFormat::voice_input(mode))?;
        self.input.enable()
    }

    /// Best-effort unwind of a failed voice start: input released, output
    /// returned to the media shape if media still owns it, else disabled.
    fn abort_voice_start(&self) {
        let _ = self.input.disable();
        if let Some(stream) = &self.media {
            if self.arbiter.owner() == OutputOwner::Media {
                if self
                    .apply_output_format(&HardwareFormat::media(stream.format))
                    .is_err()
                {
                    let _ = self.output.disable();
                }
                return;
            }
        }
        let _ = self.output.disable();
    }
}

impl Drop for AudioPipeline {
    fn drop(&mut self) {
        if self.voice.is_some() {
            let _ = self.stop_voice();
        }
        if self.media.is_some() {
            let _ = self.stop_media();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::{CodecMode, SlotMode};
    use crate::processing::pcm;
    use crate::traits::codec_engine::{DecodeInfo, DecodedFrame, VoiceDecoder, VoiceEncoder};
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use std::thread;
    use std::time::{Duration, Instant};

    #[derive(Default)]
    struct OutputState {
        enabled: bool,
        format: Option<HardwareFormat>,
        written: Vec<u8>,
        fail_reconfigure: bool,
    }

    #[derive(Clone, Default)]
    struct MockOutput {
        state: Arc<Mutex<OutputState>>,
    }

    impl MockOutput {
        fn written(&self) -> Vec<u8> {
            self.state.lock().written.clone()
        }

        fn format(&self) -> Option<HardwareFormat> {
            self.state.lock().format
        }

        fn is_enabled(&self) -> bool {
            self.state.lock().enabled
        }

        fn fail_reconfigure(&self, fail: bool) {
            self.state.lock().fail_reconfigure = fail;
        }
    }

    impl AudioOutput for MockOutput {
        fn write(&self, data: &[u8], _timeout: Duration) -> Result<usize, GatewayError> {
            let mut state = self.state.lock();
            if !state.enabled {
                return Err(GatewayError::Hardware("output channel disabled".into()));
            }
            state.written.extend_from_slice(data);
            Ok(data.len())
        }

        fn enable(&self) -> Result<(), GatewayError> {
            self.state.lock().enabled = true;
            Ok(())
        }

        fn disable(&self) -> Result<(), GatewayError> {
            self.state.lock().enabled = false;
            Ok(())
        }

        fn reconfigure(&self, format: &HardwareFormat) -> Result<(), GatewayError> {
            let mut state = self.state.lock();
            if state.enabled {
                return Err(GatewayError::Hardware(
                    "reconfigure while enabled".into(),
                ));
            }
            if state.fail_reconfigure {
                return Err(GatewayError::Hardware("forced reconfigure failure".into()));
            }
            state.format = Some(*format);
            Ok(())
        }
    }

    #[derive(Default)]
    struct InputState {
        enabled: bool,
        format: Option<HardwareFormat>,
        frames: VecDeque<Vec<u8>>,
    }

    #[derive(Clone, Default)]
    struct MockInput {
        state: Arc<Mutex<InputState>>,
    }

    impl MockInput {
        fn preload(&self, frame: Vec<u8>) {
            self.state.lock().frames.push_back(frame);
        }

        fn is_enabled(&self) -> bool {
            self.state.lock().enabled
        }
    }

    impl AudioInput for MockInput {
        fn read(&self, buf: &mut [u8], timeout: Duration) -> Result<usize, GatewayError> {
            let frame = {
                let mut state = self.state.lock();
                if !state.enabled {
                    return Err(GatewayError::Hardware("input channel disabled".into()));
                }
                state.frames.pop_front()
            };
            match frame {
                Some(frame) => {
                    let n = frame.len().min(buf.len());
                    buf[..n].copy_from_slice(&frame[..n]);
                    Ok(n)
                }
                None => {
                    thread::sleep(timeout.min(Duration::from_millis(1)));
                    Ok(0)
                }
            }
        }

        fn enable(&self) -> Result<(), GatewayError> {
            self.state.lock().enabled = true;
            Ok(())
        }

        fn disable(&self) -> Result<(), GatewayError> {
            self.state.lock().enabled = false;
            Ok(())
        }

        fn reconfigure(&self, format: &HardwareFormat) -> Result<(), GatewayError> {
            let mut state = self.state.lock();
            if state.enabled {
                return Err(GatewayError::Hardware(
                    "reconfigure while enabled".into(),
                ));
            }
            state.format = Some(*format);
            Ok(())
        }
    }

    struct IdentityDecoder;

    impl VoiceDecoder for IdentityDecoder {
        fn decode(&mut self, frame: &[u8]) -> Result<DecodedFrame, GatewayError> {
            Ok(DecodedFrame {
                pcm: frame.to_vec(),
                info: DecodeInfo {
                    sample_rate: 16_000,
                    channels: 1,
                },
            })
        }
    }

    struct IdentityEncoder;

    impl VoiceEncoder for IdentityEncoder {
        fn encode(&mut self, pcm: &[u8]) -> Result<Vec<u8>, GatewayError> {
            Ok(pcm.to_vec())
        }
    }

    #[derive(Clone, Default)]
    struct MockEngine {
        fail_encoder_open: bool,
    }

    impl CodecEngine for MockEngine {
        fn open_decoder(&self, _mode: CodecMode) -> Result<Box<dyn VoiceDecoder>, GatewayError> {
            Ok(Box::new(IdentityDecoder))
        }

        fn open_encoder(&self, _mode: CodecMode) -> Result<Box<dyn VoiceEncoder>, GatewayError> {
            if self.fail_encoder_open {
                return Err(GatewayError::Codec("encoder unavailable".into()));
            }
            Ok(Box::new(IdentityEncoder))
        }
    }

    fn test_config() -> PipelineConfig {
        PipelineConfig {
            media_capacity: 64,
            media_prefetch_level: 16,
            media_chunk: 16,
            voice_buffered_frames: 4,
            voice_prefetch_frames: 1,
            prefetch_poll: Duration::from_millis(1),
            io_timeout: Duration::from_millis(5),
            stop_timeout: Duration::from_secs(1),
        }
    }

    fn test_pipeline() -> (AudioPipeline, MockOutput, MockInput) {
        let output = MockOutput::default();
        let input = MockInput::default();
        let pipeline = AudioPipeline::new(
            output.clone(),
            input.clone(),
            MockEngine::default(),
            test_config(),
        )
        .unwrap();
        (pipeline, output, input)
    }

    fn wait_for(what: &str, condition: impl Fn() -> bool) {
        let deadline = Instant::now() + Duration::from_secs(2);
        while Instant::now() < deadline {
            if condition() {
                return;
            }
            thread::sleep(Duration::from_millis(1));
        }
        panic!("timed out waiting for {}", what);
    }

    #[test]
    fn voice_session_claims_and_releases_both_paths() {
        let (mut pipeline, output, input) = test_pipeline();

        pipeline.start_voice(VoiceConfig::wideband()).unwrap();
        assert_eq!(pipeline.owner(), OutputOwner::Voice);
        assert!(output.is_enabled());
        assert!(input.is_enabled());
        assert_eq!(
            output.format(),
            Some(HardwareFormat::voice_output(CodecMode::Wideband))
        );
        assert!(pipeline.voice_session().is_some());

        pipeline.stop_voice().unwrap();
        assert_eq!(pipeline.owner(), OutputOwner::None);
        assert!(!output.is_enabled());
        assert!(!input.is_enabled());
        assert!(pipeline.voice_session().is_none());
    }

    #[test]
    fn second_voice_session_rejected() {
        let (mut pipeline, _output, _input) = test_pipeline();
        pipeline.start_voice(VoiceConfig::wideband()).unwrap();
        assert!(matches!(
            pipeline.start_voice(VoiceConfig::narrowband()),
            Err(GatewayError::SessionConflict(_))
        ));
        pipeline.stop_voice().unwrap();
    }

    #[test]
    fn stop_without_session_errors() {
        let (mut pipeline, _output, _input) = test_pipeline();
        assert!(matches!(
            pipeline.stop_voice(),
            Err(GatewayError::SessionConflict(_))
        ));
        assert!(matches!(
            pipeline.stop_media(),
            Err(GatewayError::SessionConflict(_))
        ));
    }

    #[test]
    fn codec_open_failure_leaves_owner_unchanged() {
        let output = MockOutput::default();
        let input = MockInput::default();
        let mut pipeline = AudioPipeline::new(
            output.clone(),
            input.clone(),
            MockEngine {
                fail_encoder_open: true,
            },
            test_config(),
        )
        .unwrap();

        let media_format = MediaFormat::default();
        pipeline.start_media(media_format).unwrap();
        assert_eq!(pipeline.owner(), OutputOwner::Media);

        assert!(matches!(
            pipeline.start_voice(VoiceConfig::wideband()),
            Err(GatewayError::Codec(_))
        ));
        assert_eq!(pipeline.owner(), OutputOwner::Media);
        assert_eq!(output.format(), Some(HardwareFormat::media(media_format)));
        assert!(!input.is_enabled());
    }

    #[test]
    fn output_reshape_failure_surfaces_and_restores_media() {
        let (mut pipeline, output, _input) = test_pipeline();
        let media_format = MediaFormat::default();
        pipeline.start_media(media_format).unwrap();

        output.fail_reconfigure(true);
        assert!(matches!(
            pipeline.start_voice(VoiceConfig::wideband()),
            Err(GatewayError::Hardware(_))
        ));
        output.fail_reconfigure(false);
        assert_eq!(pipeline.owner(), OutputOwner::Media);
    }

    #[test]
    fn media_stream_passive_while_voice_owns_output() {
        let (mut pipeline, output, _input) = test_pipeline();

        pipeline.start_voice(VoiceConfig::wideband()).unwrap();
        let media_format = MediaFormat {
            sample_rate: 48_000,
            slot_mode: SlotMode::Stereo,
        };
        pipeline.start_media(media_format).unwrap();
        assert_eq!(pipeline.owner(), OutputOwner::Voice);

        pipeline.stop_voice().unwrap();
        assert_eq!(pipeline.owner(), OutputOwner::Media);
        assert_eq!(output.format(), Some(HardwareFormat::media(media_format)));
        assert!(output.is_enabled());

        pipeline.stop_media().unwrap();
        assert_eq!(pipeline.owner(), OutputOwner::None);
    }

    #[test]
    fn media_feed_reaches_hardware() {
        let (mut pipeline, output, _input) = test_pipeline();
        let feed = pipeline.start_media(MediaFormat::default()).unwrap();

        let payload: Vec<u8> = (0u8..32).collect();
        assert!(feed.write(&payload));
        wait_for("media bytes at the output", || {
            output.written().len() >= payload.len()
        });
        assert_eq!(&output.written()[..payload.len()], &payload[..]);

        pipeline.stop_media().unwrap();
    }

    #[test]
    fn voice_downlink_is_pair_swapped_at_hardware() {
        let (mut pipeline, output, _input) = test_pipeline();
        let link = pipeline.start_voice(VoiceConfig::wideband()).unwrap();

        // one wideband frame of ramp PCM crosses the prefetch level
        let frame: Vec<u8> = (0..240).map(|i| i as u8).collect();
        link.on_downlink_frame(&frame);

        let mut expected = frame.clone();
        pcm::swap_sample_pairs(&mut expected);
        wait_for("voice bytes at the output", || {
            output.written().len() >= expected.len()
        });
        assert_eq!(&output.written()[..expected.len()], &expected[..]);

        pipeline.stop_voice().unwrap();
    }

    #[test]
    fn uplink_flows_from_capture_to_link() {
        let output = MockOutput::default();
        let input = MockInput::default();
        let mut pipeline = AudioPipeline::new(
            output.clone(),
            input.clone(),
            MockEngine::default(),
            test_config(),
        )
        .unwrap();

        // one frame of capture words carrying an i16 ramp
        let mut words = Vec::with_capacity(120 * 4);
        let mut expected_pcm = Vec::with_capacity(240);
        for i in 0..120i16 {
            let bytes = i.to_le_bytes();
            words.extend_from_slice(&[0, 0, bytes[0], bytes[1]]);
            expected_pcm.extend_from_slice(&bytes);
        }
        input.preload(words);

        let link = pipeline
            .start_voice(VoiceConfig {
                mode: CodecMode::Wideband,
                link_frame_len: 240,
            })
            .unwrap();

        wait_for("capture frame in the uplink buffer", || {
            link.diagnostics().capture_frames >= 1
        });

        let uplink = link.on_downlink_frame(&[0u8; 240]).unwrap();
        assert_eq!(uplink, expected_pcm);

        pipeline.stop_voice().unwrap();
    }
}
