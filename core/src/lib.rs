//! Signal-conditioning and detection core for FMCW radar frames.
//!
//! Raw ADC frames are conditioned (mean removal, windowing), transformed into
//! range spectra and range-Doppler maps, optionally clutter-filtered, searched
//! for peaks, and resolved in angle by monopulse or digital beamforming.
//! All frame buffers are caller-owned; only the MTI history and the cached
//! transform plans outlive a single call.

pub mod interface;
pub mod math;
pub mod prelude;
pub mod processing;
pub mod telemetry;

pub use prelude::{DspError, DspResult};
