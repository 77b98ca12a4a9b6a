use crate::generator::profile::FrameGenerator;
use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use fmcwcore::interface::Detection;
use fmcwcore::prelude::Complex32;
use fmcwcore::processing::{
    angle_beamform, angle_monopulse, fftshift_rows, find_peaks, DopplerProcessor, MtiFilter,
    RangeProcessor, SteeringMatrix, Window,
};
use fmcwcore::telemetry::LogManager;
use log::warn;
use ndarray::Array2;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct WorkflowResult {
    pub frames: usize,
    pub detections: Vec<Detection>,
    /// MTI-filtered range profile of the last frame (max over Doppler).
    pub range_profile: Vec<f32>,
    pub range_plan_rebuilds: usize,
    pub doppler_plan_rebuilds: usize,
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> anyhow::Result<WorkflowResult> {
        let cfg = &self.config;
        cfg.validate().context("validating workflow config")?;
        let logger = LogManager::new("simulator");

        let geometry = cfg.geometry;
        let chirps = geometry.chirps_per_frame;
        let range_bins = geometry.real_range_bins();
        let antennas = geometry.num_antennas;
        let map_len = range_bins * chirps;

        let range_window = cfg
            .range_window
            .map(|kind| Window::generate(kind, geometry.samples_per_chirp))
            .transpose()
            .context("generating range window")?;
        let doppler_window = cfg
            .doppler_window
            .map(|kind| Window::generate(kind, chirps))
            .transpose()
            .context("generating Doppler window")?;

        let wavelength = cfg.chirp.wavelength_m();
        let spacing = cfg.scene.spacing_wavelengths * wavelength;
        let steering = SteeringMatrix::generate(
            cfg.angle_range_rad,
            cfg.num_angles,
            spacing,
            wavelength,
            antennas,
        );
        let range_resolution = cfg.chirp.range_resolution_m(geometry.samples_per_chirp);
        let velocity_resolution = cfg.chirp.velocity_resolution_m_s(chirps);

        let mut generator = FrameGenerator::new(cfg.scene.clone(), geometry, cfg.chirp)
            .context("creating frame generator")?;
        let mut range_stage = RangeProcessor::new();
        let mut doppler_stage = DopplerProcessor::new();
        // Complex MTI as two real filters so moving targets keep their phase history.
        let mut mti_re = MtiFilter::new(cfg.mti_alpha, map_len);
        let mut mti_im = MtiFilter::new(cfg.mti_alpha, map_len);

        let mut range = Array2::<Complex32>::zeros((chirps, range_bins));
        let mut maps = vec![Array2::<Complex32>::zeros((range_bins, chirps)); antennas];
        let mut re_in = vec![0.0; map_len];
        let mut im_in = vec![0.0; map_len];
        let mut re_out = vec![0.0; map_len];
        let mut im_out = vec![0.0; map_len];
        let mut profile = vec![0.0; range_bins];
        let mut peaks = vec![0; cfg.max_detections];
        let mut column = Array2::<Complex32>::zeros((antennas, 1));
        let mut beams = Array2::<Complex32>::zeros((steering.num_angles(), 1));
        let mut detections = Vec::new();

        for _ in 0..cfg.frames {
            let mut frame = generator.next_frame();

            for (adc, map) in frame.antennas.iter_mut().zip(maps.iter_mut()) {
                range_stage
                    .range_fft(
                        adc.view_mut(),
                        range.view_mut(),
                        cfg.mean_removal,
                        range_window.as_deref(),
                    )
                    .with_context(|| format!("range FFT of frame {}", frame.index))?;
                doppler_stage
                    .doppler_cfft(
                        range.view(),
                        map.view_mut(),
                        cfg.mean_removal,
                        doppler_window.as_deref(),
                    )
                    .with_context(|| format!("Doppler FFT of frame {}", frame.index))?;
                fftshift_rows(map.view_mut());
            }

            for ((re, im), value) in re_in.iter_mut().zip(im_in.iter_mut()).zip(maps[0].iter()) {
                *re = value.re;
                *im = value.im;
            }
            mti_re.apply(&re_in, &mut re_out);
            mti_im.apply(&im_in, &mut im_out);
            let filtered = |idx: usize| Complex32::new(re_out[idx], im_out[idx]).norm();

            for (bin, slot) in profile.iter_mut().enumerate() {
                let start = bin * chirps;
                *slot = (start..start + chirps).map(filtered).fold(0.0, f32::max);
            }

            let count = find_peaks(&profile, Some(&cfg.peak_search), &mut peaks);
            for &range_bin in &peaks[..count] {
                let start = range_bin * chirps;
                let doppler_bin = (0..chirps)
                    .max_by(|&a, &b| filtered(start + a).total_cmp(&filtered(start + b)))
                    .unwrap_or(0);

                let mut detection = Detection::new(
                    frame.index,
                    range_bin,
                    doppler_bin,
                    profile[range_bin],
                    range_bin as f32 * range_resolution,
                    (doppler_bin as f32 - (chirps / 2) as f32) * velocity_resolution,
                );

                let cell = [range_bin, doppler_bin];
                let mut angle = [0.0];
                match angle_monopulse(
                    &[maps[1][cell]],
                    &[maps[0][cell]],
                    wavelength,
                    spacing,
                    &mut angle,
                ) {
                    Ok(()) => detection.monopulse_angle_rad = Some(angle[0]),
                    Err(err) => warn!("monopulse failed at {:?}: {}", cell, err),
                }

                for (slot, map) in column.iter_mut().zip(&maps) {
                    *slot = map[cell];
                }
                angle_beamform(column.view(), steering.weights(), beams.view_mut())
                    .context("beamforming detection cell")?;
                detection.beamformed_angle_rad = beams
                    .iter()
                    .enumerate()
                    .max_by(|a, b| a.1.norm().total_cmp(&b.1.norm()))
                    .map(|(idx, _)| steering.angles()[idx]);

                detections.push(detection);
            }

            logger.record(&format!("frame {} detections {}", frame.index, count));
        }

        Ok(WorkflowResult {
            frames: cfg.frames,
            detections,
            range_profile: profile,
            range_plan_rebuilds: range_stage.backend().plan_rebuilds(),
            doppler_plan_rebuilds: doppler_stage.backend().plan_rebuilds(),
        })
    }
}
