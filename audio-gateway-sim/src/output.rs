//! Software output channel.
//!
//! Honors the hardware channel contract (writes only while enabled,
//! reconfiguration only while disabled) and collects everything written so
//! tests can assert on the byte stream that would have reached the DAC.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use audio_gateway_core::{AudioOutput, GatewayError, HardwareFormat};

#[derive(Default)]
struct State {
    enabled: bool,
    format: Option<HardwareFormat>,
    written: Vec<u8>,
    write_calls: u64,
}

/// Simulated output channel. Clones share the same channel state.
#[derive(Clone, Default)]
pub struct SimOutput {
    state: Arc<Mutex<State>>,
}

impl SimOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written since creation (or the last `clear`).
    pub fn written(&self) -> Vec<u8> {
        self.state.lock().written.clone()
    }

    pub fn written_len(&self) -> usize {
        self.state.lock().written.len()
    }

    pub fn write_calls(&self) -> u64 {
        self.state.lock().write_calls
    }

    pub fn clear(&self) {
        self.state.lock().written.clear();
    }

    pub fn format(&self) -> Option<HardwareFormat> {
        self.state.lock().format
    }

    pub fn is_enabled(&self) -> bool {
        self.state.lock().enabled
    }
}

impl AudioOutput for SimOutput {
    fn write(&self, data: &[u8], _timeout: Duration) -> Result<usize, GatewayError> {
        let mut state = self.state.lock();
        if !state.enabled {
            return Err(GatewayError::Hardware("output channel disabled".into()));
        }
        state.written.extend_from_slice(data);
        state.write_calls += 1;
        Ok(data.len())
    }

    fn enable(&self) -> Result<(), GatewayError> {
        let mut state = self.state.lock();
        if !state.enabled {
            log::info!("sim output enabled");
            state.enabled = true;
        }
        Ok(())
    }

    fn disable(&self) -> Result<(), GatewayError> {
        let mut state = self.state.lock();
        if state.enabled {
            log::info!("sim output disabled");
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
            "sim output reconfigured: {} Hz, {}-bit {:?}",
            format.clock.sample_rate,
            format.slot.bit_width,
            format.slot.mode
        );
        state.format = Some(*format);
        Ok(())
    }
}
