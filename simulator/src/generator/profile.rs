use anyhow::{ensure, Context};
use fmcwcore::interface::params::LIGHT_SPEED_M_S;
use fmcwcore::interface::{ChirpParameters, FrameGeometry};
use ndarray::Array2;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Point reflector in the synthetic scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    pub range_m: f32,
    #[serde(default)]
    pub velocity_m_s: f32,
    #[serde(default)]
    pub angle_rad: f32,
    #[serde(default = "default_amplitude")]
    pub amplitude: f32,
}

fn default_amplitude() -> f32 {
    1.0
}

/// Configuration for generating synthetic ADC frames.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub targets: Vec<TargetConfig>,
    pub noise: f32,
    pub dc_offset: f32,
    pub seed: u64,
    /// Antenna spacing as a fraction of the wavelength.
    pub spacing_wavelengths: f32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            targets: vec![
                TargetConfig {
                    range_m: 4.7,
                    velocity_m_s: 1.5,
                    angle_rad: 0.3,
                    amplitude: 1.0,
                },
                TargetConfig {
                    range_m: 9.4,
                    velocity_m_s: 0.0,
                    angle_rad: -0.2,
                    amplitude: 0.8,
                },
            ],
            noise: 0.05,
            dc_offset: 0.4,
            seed: 7,
            spacing_wavelengths: 0.5,
        }
    }
}

/// One radar frame: a real `[chirps][samples]` ADC matrix per antenna.
#[derive(Debug, Clone)]
pub struct SyntheticFrame {
    pub index: usize,
    pub antennas: Vec<Array2<f32>>,
}

/// Stateful frame source; consecutive frames keep slow-time phase continuity.
pub struct FrameGenerator {
    config: GeneratorConfig,
    geometry: FrameGeometry,
    chirp: ChirpParameters,
    rng: StdRng,
    next_index: usize,
}

impl FrameGenerator {
    pub fn new(
        config: GeneratorConfig,
        geometry: FrameGeometry,
        chirp: ChirpParameters,
    ) -> anyhow::Result<Self> {
        ensure!(geometry.num_antennas >= 2, "at least two antennas are required");
        ensure!(config.noise >= 0.0, "noise level must not be negative");
        geometry
            .samples_per_chirp
            .checked_mul(geometry.chirps_per_frame)
            .and_then(|n| n.checked_mul(geometry.num_antennas))
            .context("overflow computing synthetic frame size")?;

        let rng = StdRng::seed_from_u64(config.seed);
        Ok(Self {
            config,
            geometry,
            chirp,
            rng,
            next_index: 0,
        })
    }

    pub fn next_frame(&mut self) -> SyntheticFrame {
        let index = self.next_index;
        self.next_index += 1;

        let FrameGeometry {
            samples_per_chirp,
            chirps_per_frame,
            num_antennas,
        } = self.geometry;
        let wavelength = self.chirp.wavelength_m();
        let frame_start = (index * chirps_per_frame) as f32 * self.chirp.chirp_time_s;

        let mut antennas = Vec::with_capacity(num_antennas);
        for antenna in 0..num_antennas {
            let mut adc = Array2::from_elem((chirps_per_frame, samples_per_chirp), self.config.dc_offset);
            for target in &self.config.targets {
                let beat_hz = 2.0 * self.chirp.freq_slope_hz_s * target.range_m / LIGHT_SPEED_M_S;
                let fast_step = 2.0 * PI * beat_hz / self.chirp.sample_rate_hz;
                let spatial = 2.0
                    * PI
                    * self.config.spacing_wavelengths
                    * target.angle_rad.sin()
                    * antenna as f32;
                let doppler_hz = 2.0 * target.velocity_m_s / wavelength;

                for ((chirp_idx, n), value) in adc.indexed_iter_mut() {
                    let t = frame_start + chirp_idx as f32 * self.chirp.chirp_time_s;
                    let slow = 2.0 * PI * (doppler_hz * t).fract();
                    *value += target.amplitude * (fast_step * n as f32 + slow + spatial).cos();
                }
            }
            if self.config.noise > 0.0 {
                let noise = self.config.noise;
                adc.mapv_inplace(|v| v + self.rng.gen_range(-noise..noise));
            }
            antennas.push(adc);
        }

        SyntheticFrame { index, antennas }
    }
}
