pub mod angle;
pub mod doppler;
pub mod mean;
pub mod mti;
pub mod peaks;
pub mod range;
pub mod shift;
pub mod window;

pub use angle::{angle_beamform, angle_monopulse, SteeringMatrix};
pub use doppler::DopplerProcessor;
pub use mean::remove_mean;
pub use mti::MtiFilter;
pub use peaks::{find_peaks, PeakSearchOptions};
pub use range::RangeProcessor;
pub use shift::{fftshift, fftshift_rows, flip, rotate};
pub use window::{Window, WindowKind};
