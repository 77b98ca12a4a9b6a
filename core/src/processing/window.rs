use crate::prelude::{DspError, DspResult};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::ops::Deref;

const BLACKMAN_HARRIS: [f32; 4] = [0.35875, 0.48829, 0.14128, 0.01168];

/// Symmetric tapering windows from the raised-cosine family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowKind {
    Blackman,
    BlackmanHarris,
    Hamming,
    Hann,
}

impl WindowKind {
    /// Coefficient `n` of a window of `len` samples, where `m = 1 / (len - 1)`.
    fn coefficient(self, n: usize, m: f32) -> f32 {
        let phase = 2.0 * PI * n as f32 * m;
        match self {
            WindowKind::Blackman => 0.42 - 0.5 * phase.cos() + 0.08 * (2.0 * phase).cos(),
            WindowKind::BlackmanHarris => {
                let [a0, a1, a2, a3] = BLACKMAN_HARRIS;
                a0 - a1 * phase.cos() + a2 * (2.0 * phase).cos() - a3 * (3.0 * phase).cos()
            }
            WindowKind::Hamming => 0.54 - 0.46 * phase.cos(),
            WindowKind::Hann => 0.5 * (1.0 - phase.cos()),
        }
    }

    /// Fills a caller-owned buffer; its length is the window length.
    pub fn fill(self, coefficients: &mut [f32]) -> DspResult<()> {
        let len = coefficients.len();
        if len <= 1 {
            return Err(DspError::InvalidLength(len));
        }
        let m = 1.0 / (len as f32 - 1.0);
        for (n, value) in coefficients.iter_mut().enumerate() {
            *value = self.coefficient(n, m);
        }
        Ok(())
    }
}

/// Read-only window coefficients, generated once and applied to many frames.
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    coefficients: Vec<f32>,
}

impl Window {
    pub fn generate(kind: WindowKind, len: usize) -> DspResult<Self> {
        let mut coefficients = vec![0.0; len];
        kind.fill(&mut coefficients)?;
        Ok(Self { coefficients })
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.coefficients
    }
}

impl Deref for Window {
    type Target = [f32];

    fn deref(&self) -> &[f32] {
        &self.coefficients
    }
}
