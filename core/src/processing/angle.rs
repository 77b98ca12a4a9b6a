use crate::math::matrix::MatrixHelper;
use crate::math::trig::{arcsin, checked_atan2};
use crate::prelude::{check_shape, Complex32, DspError, DspResult};
use ndarray::{Array2, ArrayView2, ArrayViewMut2};
use std::f32::consts::{FRAC_PI_2, PI};

const TWO_PI: f32 = 2.0 * PI;

/// Angle of arrival from the phase difference between two receive channels.
///
/// Writes one angle in radians per sample into `angles`. Every sample is
/// processed even when one fails; the call then reports `ArgumentError` and
/// the failing samples hold 0.
pub fn angle_monopulse(
    rx1: &[Complex32],
    rx2: &[Complex32],
    wavelength: f32,
    antenna_spacing: f32,
    angles: &mut [f32],
) -> DspResult<()> {
    assert!(!rx1.is_empty(), "monopulse needs at least one sample");
    assert!(wavelength > 0.0, "wavelength must be positive");
    assert!(antenna_spacing > 0.0, "antenna spacing must be positive");
    assert_eq!(rx1.len(), rx2.len(), "receive channel lengths differ");
    assert_eq!(rx1.len(), angles.len(), "angle buffer length");

    let ratio = wavelength / antenna_spacing / TWO_PI;
    let mut first_error = None;

    for ((a, b), angle) in rx1.iter().zip(rx2).zip(angles.iter_mut()) {
        let estimate = phase_difference(*a, *b).and_then(|delta| arcsin(delta * ratio));
        *angle = match estimate {
            Ok(value) => value,
            Err(err) => {
                if first_error.is_none() {
                    first_error = Some(err);
                }
                0.0
            }
        };
    }

    match first_error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Phase of `a` minus phase of `b`, wrapped once into `(-π, π]`.
fn phase_difference(a: Complex32, b: Complex32) -> DspResult<f32> {
    let mut delta = checked_atan2(a.im, a.re)? - checked_atan2(b.im, b.re)?;
    if delta <= -PI {
        delta += TWO_PI;
    } else if delta > PI {
        delta -= TWO_PI;
    }
    Ok(delta)
}

/// Conjugated steering vectors for a uniform linear array, one row per
/// steered angle and one column per antenna.
#[derive(Debug, Clone)]
pub struct SteeringMatrix {
    weights: Array2<Complex32>,
    angles: Vec<f32>,
}

impl SteeringMatrix {
    /// Steers `num_angles` evenly spaced angles across `[-angle_range, angle_range]`.
    ///
    /// Entry `(k, j)` is `exp(i·phase)` with
    /// `phase = -π · (2·spacing / wavelength) · j · sin(angle_k)`.
    pub fn generate(
        angle_range: f32,
        num_angles: usize,
        antenna_spacing: f32,
        wavelength: f32,
        num_antennas: usize,
    ) -> Self {
        assert!(
            angle_range > 0.0 && angle_range <= FRAC_PI_2,
            "angle range must be in (0, pi/2] radians"
        );
        assert!(num_angles > 1, "at least two steering angles are required");
        assert!(num_antennas > 1, "at least two antennas are required");
        assert!(wavelength > 0.0, "wavelength must be positive");
        assert!(antenna_spacing > 0.0, "antenna spacing must be positive");

        let resolution = 2.0 * angle_range / (num_angles as f32 - 1.0);
        let angles: Vec<f32> = (0..num_angles)
            .map(|k| -angle_range + k as f32 * resolution)
            .collect();
        let coefficient = -PI * (2.0 * antenna_spacing / wavelength);

        let weights = Array2::from_shape_fn((num_angles, num_antennas), |(k, j)| {
            let phase = coefficient * j as f32 * angles[k].sin();
            Complex32::new(phase.cos(), phase.sin())
        });

        Self { weights, angles }
    }

    pub fn weights(&self) -> ArrayView2<'_, Complex32> {
        self.weights.view()
    }

    /// Steered angles in radians, ascending.
    pub fn angles(&self) -> &[f32] {
        &self.angles
    }

    pub fn num_angles(&self) -> usize {
        self.weights.nrows()
    }
}

/// Digital beamforming: `output = steering × input`.
///
/// `input` is `[antennas][samples]`, `steering` is `[angles][antennas]` and
/// `output` must be `[angles][samples]`.
pub fn angle_beamform(
    input: ArrayView2<Complex32>,
    steering: ArrayView2<Complex32>,
    output: ArrayViewMut2<Complex32>,
) -> DspResult<()> {
    if steering.ncols() != input.nrows() {
        return Err(DspError::ShapeMismatch(format!(
            "steering matrix covers {} antennas, input has {}",
            steering.ncols(),
            input.nrows()
        )));
    }
    check_shape(
        "beamformed output",
        (steering.nrows(), input.ncols()),
        output.dim(),
    )?;
    MatrixHelper::multiply_into(steering, input, output)
}
