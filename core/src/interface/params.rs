//! FMCW radar parameter relations.

use serde::{Deserialize, Serialize};

/// Speed of light in vacuum, metres per second.
pub const LIGHT_SPEED_M_S: f32 = 299_792_458.0;

pub fn range_resolution(bandwidth_hz: f32) -> f32 {
    LIGHT_SPEED_M_S / (2.0 * bandwidth_hz)
}

/// Range resolution for the bandwidth actually swept while sampling.
pub fn range_resolution_ex(num_samples: usize, sample_rate_hz: f32, freq_slope_hz_s: f32) -> f32 {
    let bandwidth = (freq_slope_hz_s / sample_rate_hz) * num_samples as f32;
    range_resolution(bandwidth)
}

pub fn max_range(sample_rate_hz: f32, freq_slope_hz_s: f32) -> f32 {
    (sample_rate_hz * LIGHT_SPEED_M_S) / (2.0 * freq_slope_hz_s)
}

pub fn doppler_resolution(bandwidth_hz: f32, frame_time_s: f32) -> f32 {
    LIGHT_SPEED_M_S / (bandwidth_hz * frame_time_s)
}

pub fn max_doppler(bandwidth_hz: f32, chirp_time_s: f32) -> f32 {
    LIGHT_SPEED_M_S / (2.0 * bandwidth_hz * chirp_time_s)
}

/// Shape of one radar frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameGeometry {
    pub samples_per_chirp: usize,
    pub chirps_per_frame: usize,
    pub num_antennas: usize,
}

impl FrameGeometry {
    /// Range bins kept from a real-input range FFT.
    pub fn real_range_bins(&self) -> usize {
        self.samples_per_chirp / 2
    }
}

/// Chirp timing and sweep settings of the sensor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChirpParameters {
    pub sample_rate_hz: f32,
    pub freq_slope_hz_s: f32,
    pub chirp_time_s: f32,
    pub center_frequency_hz: f32,
}

impl ChirpParameters {
    pub fn wavelength_m(&self) -> f32 {
        LIGHT_SPEED_M_S / self.center_frequency_hz
    }

    pub fn sampled_bandwidth_hz(&self, num_samples: usize) -> f32 {
        (self.freq_slope_hz_s / self.sample_rate_hz) * num_samples as f32
    }

    pub fn range_resolution_m(&self, num_samples: usize) -> f32 {
        range_resolution_ex(num_samples, self.sample_rate_hz, self.freq_slope_hz_s)
    }

    pub fn max_range_m(&self) -> f32 {
        max_range(self.sample_rate_hz, self.freq_slope_hz_s)
    }

    /// Velocity spanned by one Doppler bin for a frame of `num_chirps` chirps.
    pub fn velocity_resolution_m_s(&self, num_chirps: usize) -> f32 {
        self.wavelength_m() / (2.0 * num_chirps as f32 * self.chirp_time_s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_gigahertz_sweep_resolves_fifteen_centimetres() {
        assert!((range_resolution(1.0e9) - 0.149_896).abs() < 1e-5);
        assert!((range_resolution_ex(100, 1.0e6, 1.0e13) - 0.149_896).abs() < 1e-5);
    }

    #[test]
    fn max_range_and_doppler_relations() {
        assert!((max_range(2.0e6, 1.0e13) - 29.979_246).abs() < 1e-3);
        assert!((max_doppler(1.0e9, 0.1) - 1.498_962).abs() < 1e-4);
        assert!((doppler_resolution(1.0e9, 0.1) - 2.997_924).abs() < 1e-4);
    }

    #[test]
    fn chirp_parameters_derive_geometry_quantities() {
        let chirp = ChirpParameters {
            sample_rate_hz: 2.0e6,
            freq_slope_hz_s: 1.0e13,
            chirp_time_s: 1.0e-4,
            center_frequency_hz: 60.0e9,
        };
        assert!((chirp.wavelength_m() - 0.004_996_54).abs() < 1e-7);
        assert!((chirp.sampled_bandwidth_hz(64) / 3.2e8 - 1.0).abs() < 1e-6);
        assert!((chirp.max_range_m() - 29.979_246).abs() < 1e-3);
        let geometry = FrameGeometry {
            samples_per_chirp: 128,
            chirps_per_frame: 32,
            num_antennas: 3,
        };
        assert_eq!(geometry.real_range_bins(), 64);
    }
}
