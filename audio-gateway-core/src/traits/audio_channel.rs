use std::time::Duration;

use crate::models::config::HardwareFormat;
use crate::models::error::GatewayError;

/// The shared playback channel of the hardware audio interface.
///
/// Implemented by platform backends (I2S/DMA on a real target, `SimOutput`
/// in the simulated backend). Data flows through `write` from exactly one
/// worker thread at a time; enable/disable/reconfigure are driven by the
/// session controller from its own thread, so implementations synchronize
/// internally and every method takes `&self`.
pub trait AudioOutput: Send + Sync {
    /// Write PCM bytes to the hardware, blocking at most `timeout`.
    ///
    /// Returns the number of bytes the hardware accepted.
    fn write(&self, data: &[u8], timeout: Duration) -> Result<usize, GatewayError>;

    fn enable(&self) -> Result<(), GatewayError>;

    fn disable(&self) -> Result<(), GatewayError>;

    /// Apply a new clock/slot shape. Only valid while the channel is
    /// disabled.
    fn reconfigure(&self, format: &HardwareFormat) -> Result<(), GatewayError>;
}

/// The capture channel of the hardware audio interface.
///
/// Delivers raw capture words; the core converts them to PCM. Only the
/// voice path ever owns this channel.
pub trait AudioInput: Send + Sync {
    /// Read capture words into `buf`, blocking at most `timeout`.
    ///
    /// Returns the number of bytes read; zero means the wait timed out.
    fn read(&self, buf: &mut [u8], timeout: Duration) -> Result<usize, GatewayError>;

    fn enable(&self) -> Result<(), GatewayError>;

    fn disable(&self) -> Result<(), GatewayError>;

    /// Apply a new clock/slot shape. Only valid while the channel is
    /// disabled.
    fn reconfigure(&self, format: &HardwareFormat) -> Result<(), GatewayError>;
}
