use crate::math::stats::StatsHelper;
use std::ops::{Div, SubAssign};

use rustfft::num_traits::Zero;

/// Subtracts the arithmetic mean from every element of `buffer` in place.
///
/// Works for `f32` and `Complex32`. The buffer must not be empty.
pub fn remove_mean<T>(buffer: &mut [T])
where
    T: Copy + Zero + Div<f32, Output = T> + SubAssign,
{
    assert!(!buffer.is_empty(), "mean removal on an empty buffer");
    let mean = StatsHelper::mean(buffer);
    for value in buffer.iter_mut() {
        *value -= mean;
    }
}
