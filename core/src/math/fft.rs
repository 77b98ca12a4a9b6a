use crate::prelude::{Complex32, DspError, DspResult};
use crate::telemetry::{LogManager, MetricsRecorder};
use rustfft::{num_traits::Zero, Fft, FftDirection, FftPlanner};
use std::sync::Arc;

pub const MIN_FFT_LEN: usize = 2;
pub const MAX_FFT_LEN: usize = 4096;

/// Lengths the backend can build a plan for: powers of two in `[2, 4096]`.
pub fn is_supported_length(len: usize) -> bool {
    (MIN_FFT_LEN..=MAX_FFT_LEN).contains(&len) && len.is_power_of_two()
}

/// Complex-to-complex transform of one fixed length.
pub struct ComplexPlan {
    fft: Arc<dyn Fft<f32>>,
    scratch: Vec<Complex32>,
}

impl ComplexPlan {
    pub fn forward(len: usize) -> DspResult<Self> {
        Self::with_direction(len, FftDirection::Forward)
    }

    /// Unnormalized inverse: `inverse(forward(x)) == len * x`.
    pub fn inverse(len: usize) -> DspResult<Self> {
        Self::with_direction(len, FftDirection::Inverse)
    }

    fn with_direction(len: usize, direction: FftDirection) -> DspResult<Self> {
        if !is_supported_length(len) {
            return Err(DspError::UnsupportedLength(len));
        }
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft(len, direction);
        let scratch = vec![Complex32::zero(); fft.get_inplace_scratch_len()];
        Ok(Self { fft, scratch })
    }

    pub fn fft_len(&self) -> usize {
        self.fft.len()
    }

    /// Transforms `buffer` in place. `buffer.len()` must equal the plan length.
    pub fn process(&mut self, buffer: &mut [Complex32]) {
        assert_eq!(buffer.len(), self.fft_len(), "buffer length differs from plan");
        self.fft.process_with_scratch(buffer, &mut self.scratch);
    }
}

/// Real-to-complex forward transform backed by a complex plan and a
/// plan-owned staging buffer, so executing it never allocates.
pub struct RealPlan {
    inner: ComplexPlan,
    staging: Vec<Complex32>,
}

impl RealPlan {
    pub fn new(len: usize) -> DspResult<Self> {
        let inner = ComplexPlan::forward(len)?;
        Ok(Self {
            inner,
            staging: vec![Complex32::zero(); len],
        })
    }

    pub fn fft_len(&self) -> usize {
        self.inner.fft_len()
    }

    /// Writes bins `0..len / 2` of the spectrum of `input` in packed form:
    /// the imaginary slot of bin 0 carries the real part of the Nyquist bin,
    /// which is otherwise dropped.
    pub fn process(&mut self, input: &[f32], output: &mut [Complex32]) {
        let len = self.fft_len();
        let half = len / 2;
        assert_eq!(input.len(), len, "input length differs from plan");
        assert_eq!(output.len(), half, "output must hold len / 2 bins");

        for (slot, &sample) in self.staging.iter_mut().zip(input) {
            *slot = Complex32::new(sample, 0.0);
        }
        self.inner.process(&mut self.staging);
        output.copy_from_slice(&self.staging[..half]);
        output[0].im = self.staging[half].re;
    }
}

/// Transform adapter holding at most one cached plan per family.
///
/// Asking for a length other than the cached one evicts the old plan and
/// builds a new one, so alternating between two lengths rebuilds on every
/// call. Streams of different lengths should use separate backends.
pub struct FftBackend {
    complex: Option<ComplexPlan>,
    real: Option<RealPlan>,
    metrics: MetricsRecorder,
    logger: LogManager,
}

impl FftBackend {
    pub fn new() -> Self {
        Self {
            complex: None,
            real: None,
            metrics: MetricsRecorder::new(),
            logger: LogManager::new("fft-backend"),
        }
    }

    pub fn complex_plan(&mut self, len: usize) -> DspResult<&mut ComplexPlan> {
        if self.complex.as_ref().map(ComplexPlan::fft_len) != Some(len) {
            let plan = ComplexPlan::forward(len).map_err(|err| self.fail(err))?;
            self.rebuilt("complex", len);
            self.complex = Some(plan);
        }
        self.complex
            .as_mut()
            .ok_or(DspError::UnsupportedLength(len))
    }

    pub fn real_plan(&mut self, len: usize) -> DspResult<&mut RealPlan> {
        if self.real.as_ref().map(RealPlan::fft_len) != Some(len) {
            let plan = RealPlan::new(len).map_err(|err| self.fail(err))?;
            self.rebuilt("real", len);
            self.real = Some(plan);
        }
        self.real.as_mut().ok_or(DspError::UnsupportedLength(len))
    }

    /// Forward complex transform of `buffer` in place.
    pub fn transform_complex(&mut self, buffer: &mut [Complex32]) -> DspResult<()> {
        self.complex_plan(buffer.len())?.process(buffer);
        Ok(())
    }

    /// Forward real-to-complex transform; see [`RealPlan::process`].
    pub fn transform_real_to_complex(
        &mut self,
        input: &[f32],
        output: &mut [Complex32],
    ) -> DspResult<()> {
        self.real_plan(input.len())?.process(input, output);
        Ok(())
    }

    pub fn cached_complex_len(&self) -> Option<usize> {
        self.complex.as_ref().map(ComplexPlan::fft_len)
    }

    pub fn cached_real_len(&self) -> Option<usize> {
        self.real.as_ref().map(RealPlan::fft_len)
    }

    pub fn plan_rebuilds(&self) -> usize {
        self.metrics.snapshot().plan_rebuilds
    }

    pub fn metrics(&self) -> &MetricsRecorder {
        &self.metrics
    }

    fn rebuilt(&self, family: &str, len: usize) {
        self.metrics.record_plan_rebuild();
        self.logger
            .trace(&format!("built {} plan for length {}", family, len));
    }

    fn fail(&self, err: DspError) -> DspError {
        self.metrics.record_error();
        err
    }
}

impl Default for FftBackend {
    fn default() -> Self {
        Self::new()
    }
}
