//! Software capture channel.
//!
//! Synthesizes 32-bit capture words the way the gateway's microphone
//! hardware delivers them: a 16-bit ramp left-aligned into the top bytes of
//! each little-endian word. Optionally paces reads at the configured sample
//! rate so worker loops see a realistic cadence.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;

use audio_gateway_core::{AudioInput, GatewayError, HardwareFormat};

struct State {
    enabled: bool,
    format: Option<HardwareFormat>,
    next_sample: i16,
    read_calls: u64,
}

/// Simulated capture channel. Clones share the same channel state.
#[derive(Clone)]
pub struct SimInput {
    state: Arc<Mutex<State>>,
    paced: bool,
}

impl SimInput {
    /// Reads sleep for the captured frame's real duration.
    pub fn paced() -> Self {
        Self::with_pacing(true)
    }

    /// Reads return immediately; useful for fast tests.
    pub fn unpaced() -> Self {
        Self::with_pacing(false)
    }

    fn with_pacing(paced: bool) -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                enabled: false,
                format: None,
                next_sample: 0,
                read_calls: 0,
            })),
            paced,
        }
    }

    pub fn read_calls(&self) -> u64 {
        self.state.lock().read_calls
    }

    pub fn is_enabled(&self) -> bool {
        self.state.lock().enabled
    }
}

impl AudioInput for SimInput {
    fn read(&self, buf: &mut [u8], _timeout: Duration) -> Result<usize, GatewayError> {
        let (sample_rate, samples) = {
            let mut state = self.state.lock();
            if !state.enabled {
                return Err(GatewayError::Hardware("input channel disabled".into()));
            }
            state.read_calls += 1;

            let samples = buf.len() / 4;
            for word in buf.chunks_exact_mut(4) {
                let bytes = state.next_sample.to_le_bytes();
                word.copy_from_slice(&[0, 0, bytes[0], bytes[1]]);
                state.next_sample = state.next_sample.wrapping_add(1);
            }
            let rate = state
                .format
                .map(|f| f.clock.sample_rate)
                .unwrap_or(16_000);
            (rate, samples)
        };

        if self.paced && sample_rate > 0 {
            thread::sleep(Duration::from_micros(
                samples as u64 * 1_000_000 / sample_rate as u64,
            ));
        }
        Ok(samples * 4)
    }

    fn enable(&self) -> Result<(), GatewayError> {
        let mut state = self.state.lock();
        if !state.enabled {
            log::info!("sim input enabled");
            state.enabled = true;
        }
        Ok(())
    }

    fn disable(&self) -> Result<(), GatewayError> {
        let mut state = self.state.lock();
        if state.enabled {
            log::info!("sim input disabled");
            state.enabled = false;
        }
        Ok(())
    }

    fn reconfigure(&self, format: &HardwareFormat) -> Result<(), GatewayError> {
        let mut state = self.state.lock();
        if state.enabled {
            return Err(GatewayError::Hardware(
                "reconfigure while enabled".into(),
            ));
        }
        log::info!(
            "sim input reconfigured: {} Hz, {}-bit {:?}",
            format.clock.sample_rate,
            format.slot.bit_width,
            format.slot.mode
        );
        state.format = Some(*format);
        Ok(())
    }
}
