use std::ops::Div;

use rustfft::num_traits::Zero;

pub struct StatsHelper;

impl StatsHelper {
    /// Arithmetic mean of a non-empty sequence of reals or complex values.
    pub fn mean<T>(samples: &[T]) -> T
    where
        T: Copy + Zero + Div<f32, Output = T>,
    {
        debug_assert!(!samples.is_empty(), "mean of an empty buffer");
        let sum = samples.iter().fold(T::zero(), |acc, &v| acc + v);
        sum / samples.len() as f32
    }

    /// Root mean square; zero for an empty sequence.
    pub fn rms(samples: &[f32]) -> f32 {
        if samples.is_empty() {
            return 0.0;
        }
        let sum_sq: f32 = samples.iter().map(|&v| v * v).sum();
        (sum_sq / samples.len() as f32).sqrt()
    }
}
