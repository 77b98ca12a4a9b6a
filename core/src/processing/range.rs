use crate::math::fft::FftBackend;
use crate::math::stats::StatsHelper;
use crate::prelude::{check_shape, Complex32, DspError, DspResult};
use crate::processing::mean::remove_mean;
use crate::telemetry::log::LogManager;
use ndarray::ArrayViewMut2;
use rustfft::num_traits::Zero;
use std::ops::{Div, MulAssign, SubAssign};

/// Range-processing stage transforming each chirp of a frame along fast time.
///
/// The stage owns its transform backend, so its cached plans are
/// independent from any other processor.
pub struct RangeProcessor {
    backend: FftBackend,
    logger: LogManager,
    last_rms: f32,
}

impl RangeProcessor {
    pub fn new() -> Self {
        Self {
            backend: FftBackend::new(),
            logger: LogManager::new("range"),
            last_rms: 0.0,
        }
    }

    /// Range FFT of a real frame of shape `[chirps][samples]`.
    ///
    /// `frame` is conditioned in place (mean removal, windowing) before the
    /// transform. `range` receives bins `0..samples / 2` of every chirp with
    /// the imaginary part of the DC bin forced to zero. The backend packs the
    /// Nyquist bin into that slot, so it is discarded here.
    pub fn range_fft(
        &mut self,
        mut frame: ArrayViewMut2<f32>,
        mut range: ArrayViewMut2<Complex32>,
        mean_removal: bool,
        window: Option<&[f32]>,
    ) -> DspResult<()> {
        let (chirps, samples) = frame.dim();
        let plan = self.backend.real_plan(samples)?;
        check_shape("range spectrum", (chirps, samples / 2), range.dim())?;
        check_window(window, samples)?;

        let mut rms_sum = 0.0;
        for (mut chirp, mut bins) in frame.rows_mut().into_iter().zip(range.rows_mut()) {
            let chirp = contiguous(chirp.as_slice_mut(), "frame")?;
            let bins = contiguous(bins.as_slice_mut(), "range spectrum")?;
            condition(chirp, mean_removal, window);
            rms_sum += StatsHelper::rms(chirp);
            plan.process(chirp, bins);
            bins[0].im = 0.0;
        }

        self.last_rms = if chirps == 0 { 0.0 } else { rms_sum / chirps as f32 };
        self.backend.metrics().record_processed(chirps);
        self.logger.trace(&format!(
            "real range FFT over {} chirps x {} samples, RMS {:.4}",
            chirps, samples, self.last_rms
        ));
        Ok(())
    }

    /// Range FFT of a complex frame of shape `[chirps][samples]`, replacing
    /// each chirp by its spectrum.
    pub fn range_cfft_in_place(
        &mut self,
        mut frame: ArrayViewMut2<Complex32>,
        mean_removal: bool,
        window: Option<&[f32]>,
    ) -> DspResult<()> {
        let (chirps, samples) = frame.dim();
        let plan = self.backend.complex_plan(samples)?;
        check_window(window, samples)?;

        for mut chirp in frame.rows_mut() {
            let chirp = contiguous(chirp.as_slice_mut(), "frame")?;
            condition(chirp, mean_removal, window);
            plan.process(chirp);
        }

        self.backend.metrics().record_processed(chirps);
        self.logger.trace(&format!(
            "complex range FFT over {} chirps x {} samples",
            chirps, samples
        ));
        Ok(())
    }

    pub fn backend(&self) -> &FftBackend {
        &self.backend
    }

    /// Mean per-chirp RMS of the conditioned samples of the last real frame.
    pub fn last_rms(&self) -> f32 {
        self.last_rms
    }
}

impl Default for RangeProcessor {
    fn default() -> Self {
        Self::new()
    }
}

/// Optional mean removal followed by optional element-wise windowing.
pub(crate) fn condition<T>(samples: &mut [T], mean_removal: bool, window: Option<&[f32]>)
where
    T: Copy + Zero + Div<f32, Output = T> + SubAssign + MulAssign<f32>,
{
    if mean_removal {
        remove_mean(samples);
    }
    if let Some(window) = window {
        for (sample, &weight) in samples.iter_mut().zip(window) {
            *sample *= weight;
        }
    }
}

pub(crate) fn check_window(window: Option<&[f32]>, len: usize) -> DspResult<()> {
    match window {
        Some(window) if window.len() != len => Err(DspError::ShapeMismatch(format!(
            "window has {} coefficients, transform length is {}",
            window.len(),
            len
        ))),
        _ => Ok(()),
    }
}

pub(crate) fn contiguous<'a, T>(slice: Option<&'a mut [T]>, what: &str) -> DspResult<&'a mut [T]> {
    slice.ok_or_else(|| DspError::ShapeMismatch(format!("{} rows must be contiguous", what)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::fft::ComplexPlan;
    use crate::processing::window::{Window, WindowKind};
    use ndarray::Array2;
    use std::f32::consts::PI;

    fn tone_frame(chirps: usize, samples: usize, bin: usize, offset: f32) -> Array2<f32> {
        Array2::from_shape_fn((chirps, samples), |(_, n)| {
            offset + (2.0 * PI * bin as f32 * n as f32 / samples as f32).cos()
        })
    }

    fn strongest_bin(row: &[Complex32]) -> usize {
        row.iter()
            .enumerate()
            .max_by(|a, b| a.1.norm().total_cmp(&b.1.norm()))
            .map(|(idx, _)| idx)
            .unwrap()
    }

    #[test]
    fn real_range_fft_locates_tone_and_clears_dc_imaginary() {
        let mut frame = tone_frame(4, 32, 5, 2.0);
        let mut range = Array2::zeros((4, 16));
        let mut stage = RangeProcessor::new();

        stage
            .range_fft(frame.view_mut(), range.view_mut(), true, None)
            .unwrap();

        for row in range.rows() {
            let row = row.as_slice().unwrap();
            assert_eq!(strongest_bin(row), 5);
            assert_eq!(row[0].im, 0.0);
            assert!(row[0].re.abs() < 1e-3, "mean removal should cancel DC");
        }
    }

    #[test]
    fn nyquist_packed_into_dc_slot_is_discarded() {
        let alternating =
            Array2::from_shape_fn((2, 16), |(_, n)| if n % 2 == 0 { 1.0_f32 } else { -1.0 });

        let mut packed = [Complex32::zero(); 8];
        let mut plan = crate::math::fft::RealPlan::new(16).unwrap();
        plan.process(alternating.row(0).as_slice().unwrap(), &mut packed);
        assert!((packed[0].im - 16.0).abs() < 1e-4);

        let mut frame = alternating.clone();
        let mut range = Array2::zeros((2, 8));
        RangeProcessor::new()
            .range_fft(frame.view_mut(), range.view_mut(), false, None)
            .unwrap();

        for row in range.rows() {
            assert_eq!(row[0].im, 0.0);
            assert!(row[0].re.abs() < 1e-4);
            assert!(row.iter().all(|bin| bin.norm() < 1e-4));
        }
    }

    #[test]
    fn tracks_rms_of_conditioned_chirps() {
        let mut stage = RangeProcessor::new();
        let mut range = Array2::zeros((3, 8));

        let mut frame = Array2::from_elem((3, 16), 2.0_f32);
        stage
            .range_fft(frame.view_mut(), range.view_mut(), false, None)
            .unwrap();
        assert!((stage.last_rms() - 2.0).abs() < 1e-6);

        let mut frame = Array2::from_elem((3, 16), 2.0_f32);
        stage
            .range_fft(frame.view_mut(), range.view_mut(), true, None)
            .unwrap();
        assert!(stage.last_rms() < 1e-6);
    }

    #[test]
    fn windowing_mutates_frame_in_place() {
        let mut frame = Array2::from_elem((2, 8), 1.0_f32);
        let mut range = Array2::zeros((2, 4));
        let window = Window::generate(WindowKind::Hann, 8).unwrap();

        RangeProcessor::new()
            .range_fft(frame.view_mut(), range.view_mut(), false, Some(window.as_slice()))
            .unwrap();

        assert_eq!(frame.row(0).to_vec(), window.to_vec());
    }

    #[test]
    fn rejects_unsupported_length_and_mismatched_window() {
        let mut stage = RangeProcessor::new();
        let mut frame = Array2::zeros((2, 12));
        let mut range = Array2::zeros((2, 6));
        assert_eq!(
            stage.range_fft(frame.view_mut(), range.view_mut(), false, None),
            Err(DspError::UnsupportedLength(12))
        );

        let mut frame = Array2::zeros((2, 8));
        let mut range = Array2::zeros((2, 4));
        let window = [1.0; 6];
        assert!(matches!(
            stage.range_fft(frame.view_mut(), range.view_mut(), false, Some(window.as_slice())),
            Err(DspError::ShapeMismatch(_))
        ));
    }

    #[test]
    fn complex_range_fft_round_trips_through_inverse() {
        let original = Array2::from_shape_fn((3, 16), |(c, n)| {
            Complex32::new((n as f32 * 0.3 + c as f32).sin(), n as f32 * 0.1)
        });
        let mut frame = original.clone();

        RangeProcessor::new()
            .range_cfft_in_place(frame.view_mut(), false, None)
            .unwrap();

        let mut inverse = ComplexPlan::inverse(16).unwrap();
        for (mut row, expected) in frame.rows_mut().into_iter().zip(original.rows()) {
            let row = row.as_slice_mut().unwrap();
            inverse.process(row);
            for (restored, want) in row.iter().zip(expected.iter()) {
                assert!((restored / 16.0 - want).norm() < 1e-4);
            }
        }
    }

    #[test]
    fn repeated_frames_reuse_the_cached_plan() {
        let mut stage = RangeProcessor::new();
        for _ in 0..3 {
            let mut frame = tone_frame(2, 16, 3, 0.0);
            let mut range = Array2::zeros((2, 8));
            stage
                .range_fft(frame.view_mut(), range.view_mut(), false, None)
                .unwrap();
        }
        assert_eq!(stage.backend().plan_rebuilds(), 1);
        assert_eq!(stage.backend().metrics().snapshot().processed, 6);
    }
}
