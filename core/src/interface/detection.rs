use serde::{Deserialize, Serialize};

/// Target candidate extracted from one range-Doppler map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub frame_index: usize,
    pub range_bin: usize,
    pub doppler_bin: usize,
    pub magnitude: f32,
    pub range_m: f32,
    pub velocity_m_s: f32,
    /// Monopulse estimate from the first antenna pair, radians.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monopulse_angle_rad: Option<f32>,
    /// Steered angle with the strongest beamformed response, radians.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beamformed_angle_rad: Option<f32>,
}

impl Detection {
    pub fn new(
        frame_index: usize,
        range_bin: usize,
        doppler_bin: usize,
        magnitude: f32,
        range_m: f32,
        velocity_m_s: f32,
    ) -> Self {
        Self {
            frame_index,
            range_bin,
            doppler_bin,
            magnitude,
            range_m,
            velocity_m_s,
            monopulse_angle_rad: None,
            beamformed_angle_rad: None,
        }
    }
}
