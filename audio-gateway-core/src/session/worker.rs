//! Hardware-adjacent worker tasks, one per buffered direction.
//!
//! Workers are cooperatively stopped: the pipeline clears the running flag
//! and the worker, on its next loop iteration, sends a one-shot stop
//! acknowledgment and returns. The pipeline must see that acknowledgment
//! before it reclaims the worker's buffer or reconfigures the channel the
//! worker was driving.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver};

use crate::models::error::GatewayError;
use crate::processing::flow_buffer::FlowBuffer;
use crate::processing::pcm;
use crate::session::arbiter::{OutputArbiter, OutputClaim};
use crate::traits::audio_channel::{AudioInput, AudioOutput};
use crate::traits::codec_engine::VoiceEncoder;

/// Running worker thread plus its teardown handshake.
pub(crate) struct WorkerHandle {
    name: &'static str,
    running: Arc<AtomicBool>,
    stopped: Receiver<()>,
    thread: Option<thread::JoinHandle<()>>,
}

impl WorkerHandle {
    /// Ask the worker to stop. Returns immediately; pair with `join`.
    pub(crate) fn signal_stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Wait up to `timeout` for the stop acknowledgment, then reap the
    /// thread. On timeout the thread is left detached; resources it still
    /// references are reclaimed only when its own handles drop.
    pub(crate) fn join(mut self, timeout: Duration) -> Result<(), GatewayError> {
        self.running.store(false, Ordering::SeqCst);
        match self.stopped.recv_timeout(timeout) {
            Ok(()) => {
                if let Some(handle) = self.thread.take() {
                    let _ = handle.join();
                }
                Ok(())
            }
            Err(_) => {
                log::error!(
                    "{}: no stop acknowledgment within {:?}, leaving task detached",
                    self.name,
                    timeout
                );
                Err(GatewayError::StopTimeout)
            }
        }
    }
}

pub(crate) struct OutputWorkerParams {
    pub name: &'static str,
    pub buffer: Arc<FlowBuffer>,
    pub output: Arc<dyn AudioOutput>,
    pub arbiter: Arc<OutputArbiter>,
    pub claim: Arc<OutputClaim>,
    /// Bytes per hardware write, sized to the DMA transfer granularity.
    pub chunk_len: usize,
    /// Swap 16-bit sample pairs before the write (voice slot layout).
    pub swap_pairs: bool,
    pub prefetch_poll: Duration,
    pub io_timeout: Duration,
}

/// Spawn a worker that drains a flow buffer into the hardware output.
pub(crate) fn spawn_output_worker(
    params: OutputWorkerParams,
) -> Result<WorkerHandle, GatewayError> {
    let name = params.name;
    let running = Arc::new(AtomicBool::new(true));
    let (stopped_tx, stopped_rx) = bounded(1);

    let task_running = Arc::clone(&running);
    let handle = thread::Builder::new()
        .name(name.into())
        .spawn(move || {
            output_loop(&params, &task_running);
            // release the teardown handshake, then terminate
            let _ = stopped_tx.send(());
            log::info!("{}: stopped", name);
        })
        .map_err(|e| GatewayError::SpawnFailed(e.to_string()))?;

    Ok(WorkerHandle {
        name,
        running,
        stopped: stopped_rx,
        thread: Some(handle),
    })
}

fn output_loop(params: &OutputWorkerParams, running: &AtomicBool) {
    while running.load(Ordering::SeqCst) {
        if params.buffer.mode().is_prefetching() {
            // give the producer time to build backlog
            thread::sleep(params.prefetch_poll);
            continue;
        }

        let mut chunk = params.buffer.pull(params.chunk_len, Duration::ZERO);
        if chunk.is_empty() {
            // underflow; the buffer has flipped to prefetching
            continue;
        }

        if !params.arbiter.is_current(&params.claim) {
            // drain without driving stale audio while another session owns
            // the output
            continue;
        }

        if params.swap_pairs {
            pcm::swap_sample_pairs(&mut chunk);
        }

        match params.output.write(&chunk, params.io_timeout) {
            Ok(written) if written < chunk.len() => {
                log::debug!(
                    "{}: short write, {} of {} bytes",
                    params.name,
                    written,
                    chunk.len()
                );
            }
            Ok(_) => {}
            Err(e) => {
                log::warn!("{}: hardware write failed, chunk skipped: {}", params.name, e);
            }
        }
    }
}

pub(crate) struct CaptureWorkerParams {
    pub name: &'static str,
    pub buffer: Arc<FlowBuffer>,
    pub input: Arc<dyn AudioInput>,
    pub encoder: Box<dyn VoiceEncoder>,
    /// Samples per codec frame; one hardware read fetches one frame of
    /// 32-bit capture words.
    pub frame_samples: usize,
    pub io_timeout: Duration,
}

/// Spawn a worker that reads capture words, converts and encodes them, and
/// feeds the voice-input flow buffer.
pub(crate) fn spawn_capture_worker(
    params: CaptureWorkerParams,
) -> Result<WorkerHandle, GatewayError> {
    let name = params.name;
    let running = Arc::new(AtomicBool::new(true));
    let (stopped_tx, stopped_rx) = bounded(1);

    let task_running = Arc::clone(&running);
    let handle = thread::Builder::new()
        .name(name.into())
        .spawn(move || {
            capture_loop(params, &task_running);
            let _ = stopped_tx.send(());
            log::info!("{}: stopped", name);
        })
        .map_err(|e| GatewayError::SpawnFailed(e.to_string()))?;

    Ok(WorkerHandle {
        name,
        running,
        stopped: stopped_rx,
        thread: Some(handle),
    })
}

fn capture_loop(params: CaptureWorkerParams, running: &AtomicBool) {
    let CaptureWorkerParams {
        name,
        buffer,
        input,
        mut encoder,
        frame_samples,
        io_timeout,
    } = params;

    let mut word_buf = vec![0u8; frame_samples * 4];

    while running.load(Ordering::SeqCst) {
        match input.read(&mut word_buf, io_timeout) {
            Ok(0) => continue, // timed out, nothing captured
            Ok(n) => {
                let frame = pcm::capture_words_to_pcm(&word_buf[..n]);
                match encoder.encode(&frame) {
                    Ok(encoded) if !encoded.is_empty() => {
                        buffer.push(&encoded);
                    }
                    Ok(_) => {}
                    Err(e) => {
                        log::warn!("{}: encode failed, frame dropped: {}", name, e);
                    }
                }
            }
            Err(e) => {
                log::warn!("{}: hardware read failed: {}", name, e);
                thread::sleep(io_timeout);
            }
        }
    }
}
