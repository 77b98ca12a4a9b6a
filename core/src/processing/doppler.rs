use crate::math::fft::FftBackend;
use crate::math::matrix::MatrixHelper;
use crate::prelude::{Complex32, DspResult};
use crate::processing::range::{check_window, condition, contiguous};
use crate::telemetry::log::LogManager;
use ndarray::{ArrayView2, ArrayViewMut2};

/// Doppler stage transforming each range bin along slow time (across chirps).
pub struct DopplerProcessor {
    backend: FftBackend,
    logger: LogManager,
}

impl DopplerProcessor {
    pub fn new() -> Self {
        Self {
            backend: FftBackend::new(),
            logger: LogManager::new("doppler"),
        }
    }

    /// Builds a range-Doppler map from a range spectrum of shape
    /// `[chirps][range_bins]`.
    ///
    /// `doppler` must have shape `[range_bins][chirps]`; it receives the
    /// transpose of `range`, which is then conditioned and transformed row
    /// by row with transform length `chirps`. `range` is left untouched.
    pub fn doppler_cfft(
        &mut self,
        range: ArrayView2<Complex32>,
        mut doppler: ArrayViewMut2<Complex32>,
        mean_removal: bool,
        window: Option<&[f32]>,
    ) -> DspResult<()> {
        let (chirps, range_bins) = range.dim();
        let plan = self.backend.complex_plan(chirps)?;
        check_window(window, chirps)?;
        MatrixHelper::transpose_into(range, doppler.view_mut())?;

        for mut row in doppler.rows_mut() {
            let bins = contiguous(row.as_slice_mut(), "range-Doppler map")?;
            condition(bins, mean_removal, window);
            plan.process(bins);
        }

        self.backend.metrics().record_processed(range_bins);
        self.logger.trace(&format!(
            "Doppler FFT over {} range bins x {} chirps",
            range_bins, chirps
        ));
        Ok(())
    }

    pub fn backend(&self) -> &FftBackend {
        &self.backend
    }
}

impl Default for DopplerProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::DspError;
    use crate::processing::window::{Window, WindowKind};
    use ndarray::Array2;
    use std::f32::consts::PI;

    #[test]
    fn moving_target_lands_in_its_doppler_bin() {
        let chirps = 16;
        let range_bins = 4;
        let velocity_bin = 3;
        let range = Array2::from_shape_fn((chirps, range_bins), |(c, r)| {
            if r == 2 {
                let phase = 2.0 * PI * velocity_bin as f32 * c as f32 / chirps as f32;
                Complex32::new(phase.cos(), phase.sin())
            } else {
                Complex32::new(0.0, 0.0)
            }
        });
        let mut doppler = Array2::zeros((range_bins, chirps));

        DopplerProcessor::new()
            .doppler_cfft(range.view(), doppler.view_mut(), false, None)
            .unwrap();

        let target = doppler.row(2);
        assert!((target[velocity_bin].norm() - chirps as f32).abs() < 1e-3);
        for (bin, value) in target.iter().enumerate() {
            if bin != velocity_bin {
                assert!(value.norm() < 1e-3);
            }
        }
        assert!(doppler.row(0).iter().all(|v| v.norm() < 1e-6));
    }

    #[test]
    fn mean_removal_cancels_static_returns() {
        let range = Array2::from_elem((8, 2), Complex32::new(3.0, -1.0));
        let mut doppler = Array2::zeros((2, 8));
        let window = Window::generate(WindowKind::Hamming, 8).unwrap();

        DopplerProcessor::new()
            .doppler_cfft(range.view(), doppler.view_mut(), true, Some(window.as_slice()))
            .unwrap();

        assert!(doppler.iter().all(|v| v.norm() < 1e-4));
    }

    #[test]
    fn rejects_misshaped_output_and_bad_lengths() {
        let mut stage = DopplerProcessor::new();
        let range = Array2::<Complex32>::zeros((8, 4));
        let mut doppler = Array2::zeros((8, 4));
        assert!(matches!(
            stage.doppler_cfft(range.view(), doppler.view_mut(), false, None),
            Err(DspError::ShapeMismatch(_))
        ));

        let range = Array2::<Complex32>::zeros((6, 4));
        let mut doppler = Array2::zeros((4, 6));
        assert_eq!(
            stage.doppler_cfft(range.view(), doppler.view_mut(), false, None),
            Err(DspError::UnsupportedLength(6))
        );
    }
}
