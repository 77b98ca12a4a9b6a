use serde::{Deserialize, Serialize};

/// Constraints applied by [`find_peaks`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeakSearchOptions {
    /// Minimum absolute value; samples at or below it are never peaks.
    pub height: f32,
    /// Minimum rise above both immediate neighbours.
    pub threshold: f32,
    /// Minimum index separation (>= 1) between consecutive accepted peaks.
    pub distance: usize,
    /// Minimum width in samples, measured at half prominence. Checked only when > 1.
    pub width: usize,
}

impl Default for PeakSearchOptions {
    fn default() -> Self {
        Self {
            height: f32::NEG_INFINITY,
            threshold: f32::EPSILON,
            distance: 1,
            width: 1,
        }
    }
}

/// Greedy single-pass local-maximum search over `x[1..len - 1]`.
///
/// Accepted indices are written to `peaks`, whose length is the maximum
/// number of peaks; the count found is returned. A candidate closer than
/// `distance` to the last accepted peak either replaces it (when larger) or
/// is dropped. Only the last accepted peak is compared, never earlier ones.
/// `None` options means [`PeakSearchOptions::default`].
pub fn find_peaks(x: &[f32], options: Option<&PeakSearchOptions>, peaks: &mut [usize]) -> usize {
    let options = options.copied().unwrap_or_default();
    debug_assert!(options.distance >= 1, "peak distance must be at least 1");

    let max_peaks = peaks.len();
    if max_peaks == 0 || x.len() < 3 {
        return 0;
    }

    let mut count = 0;
    for i in 1..x.len() - 1 {
        if x[i] <= options.height {
            continue;
        }

        let raised = x[i] - options.threshold;
        if raised < x[i - 1] || raised < x[i + 1] {
            continue;
        }

        let mut replace = false;
        if count > 0 {
            let last = peaks[count - 1];
            if i - last < options.distance {
                if x[last] < x[i] {
                    replace = true;
                } else {
                    continue;
                }
            }
        }

        if options.width > 1 {
            let half_prominence = 0.5 * prominence(x, i);
            if peak_width(x, i, half_prominence) < options.width as isize {
                continue;
            }
        }

        if replace {
            peaks[count - 1] = i;
        } else {
            peaks[count] = i;
            count += 1;
        }

        if count >= max_peaks {
            break;
        }
    }
    count
}

/// Topographic prominence: height above the higher of the two bases found
/// by walking outwards until a sample exceeds the peak.
pub fn prominence(x: &[f32], peak: usize) -> f32 {
    let value = x[peak];

    let mut min_left = value;
    for &sample in x[..peak].iter().rev() {
        if sample > value {
            break;
        }
        min_left = min_left.min(sample);
    }

    let mut min_right = value;
    for &sample in &x[peak + 1..] {
        if sample > value {
            break;
        }
        min_right = min_right.min(sample);
    }

    value - min_left.max(min_right)
}

/// Width in samples between the first crossings below `x[peak] - drop` on
/// either side. A side without a crossing contributes index 0.
pub fn peak_width(x: &[f32], peak: usize, drop: f32) -> isize {
    let level = x[peak] - drop;

    let right = (peak + 1..x.len())
        .find(|&i| x[i] < level)
        .map_or(0, |i| i as isize);
    let left = (0..peak)
        .rev()
        .find(|&i| x[i] < level)
        .map_or(0, |i| i as isize);

    right - left
}
