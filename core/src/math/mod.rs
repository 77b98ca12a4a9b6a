pub mod fft;
pub mod matrix;
pub mod stats;
pub mod trig;

pub use fft::{ComplexPlan, FftBackend, RealPlan};
pub use matrix::MatrixHelper;
pub use stats::StatsHelper;
