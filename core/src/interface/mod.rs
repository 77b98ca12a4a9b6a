pub mod detection;
pub mod params;

pub use detection::Detection;
pub use params::{ChirpParameters, FrameGeometry};
