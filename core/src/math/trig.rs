//! Scalar primitives with explicit failure reporting.
//!
//! `sqrt` of a negative or NaN radicand and `atan2` of non-finite inputs
//! report `ArgumentError` instead of propagating NaN.

use crate::prelude::{DspError, DspResult};
use std::f32::consts::FRAC_PI_2;

pub fn checked_sqrt(x: f32) -> DspResult<f32> {
    if x >= 0.0 {
        Ok(x.sqrt())
    } else {
        Err(DspError::ArgumentError(format!("sqrt of {}", x)))
    }
}

pub fn checked_atan2(y: f32, x: f32) -> DspResult<f32> {
    if y.is_finite() && x.is_finite() {
        Ok(y.atan2(x))
    } else {
        Err(DspError::ArgumentError(format!("atan2({}, {})", y, x)))
    }
}

/// Inverse sine built from `atan2` and `sqrt`, saturating to ±π/2 for |x| ≥ 1.
pub fn arcsin(x: f32) -> DspResult<f32> {
    if x >= 1.0 {
        Ok(FRAC_PI_2)
    } else if x <= -1.0 {
        Ok(-FRAC_PI_2)
    } else {
        let y = checked_sqrt(1.0 - x * x)?;
        checked_atan2(x, y)
    }
}
