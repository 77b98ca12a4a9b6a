use crate::generator::profile::GeneratorConfig;
use anyhow::{ensure, Context};
use fmcwcore::interface::{ChirpParameters, FrameGeometry};
use fmcwcore::processing::{PeakSearchOptions, WindowKind};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub geometry: FrameGeometry,
    pub chirp: ChirpParameters,
    pub frames: usize,
    pub range_window: Option<WindowKind>,
    pub doppler_window: Option<WindowKind>,
    pub mean_removal: bool,
    pub mti_alpha: f32,
    pub peak_search: PeakSearchOptions,
    pub max_detections: usize,
    pub angle_range_rad: f32,
    pub num_angles: usize,
    pub scene: GeneratorConfig,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            geometry: FrameGeometry {
                samples_per_chirp: 64,
                chirps_per_frame: 32,
                num_antennas: 3,
            },
            chirp: ChirpParameters {
                sample_rate_hz: 2.0e6,
                freq_slope_hz_s: 1.0e13,
                chirp_time_s: 1.0e-4,
                center_frequency_hz: 60.0e9,
            },
            frames: 4,
            range_window: Some(WindowKind::BlackmanHarris),
            doppler_window: Some(WindowKind::Hann),
            mean_removal: true,
            mti_alpha: 0.5,
            peak_search: PeakSearchOptions {
                height: 40.0,
                distance: 2,
                ..Default::default()
            },
            max_detections: 8,
            angle_range_rad: 1.2,
            num_angles: 121,
            scene: GeneratorConfig::default(),
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        config
            .validate()
            .with_context(|| format!("validating workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(samples_per_chirp: usize, chirps_per_frame: usize, frames: usize) -> Self {
        let mut config = Self::default();
        config.geometry.samples_per_chirp = samples_per_chirp;
        config.geometry.chirps_per_frame = chirps_per_frame;
        config.frames = frames;
        config
    }

    /// Rejects settings the core would treat as contract violations.
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            (0.0..=1.0).contains(&self.mti_alpha),
            "mti_alpha {} outside [0, 1]",
            self.mti_alpha
        );
        ensure!(self.geometry.num_antennas >= 2, "need at least two antennas");
        ensure!(self.num_angles >= 2, "need at least two steering angles");
        ensure!(
            self.angle_range_rad > 0.0 && self.angle_range_rad <= std::f32::consts::FRAC_PI_2,
            "angle_range_rad must be in (0, pi/2]"
        );
        ensure!(self.peak_search.distance >= 1, "peak distance must be at least 1");
        ensure!(self.scene.spacing_wavelengths > 0.0, "antenna spacing must be positive");
        ensure!(self.chirp.center_frequency_hz > 0.0, "center frequency must be positive");
        Ok(())
    }
}
