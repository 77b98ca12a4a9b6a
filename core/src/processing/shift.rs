//! In-place sequence rearrangement used to re-centre spectra.

use ndarray::{ArrayViewMut1, ArrayViewMut2};

pub fn flip<T>(values: &mut [T]) {
    values.reverse();
}

/// Rotates left by `k` positions; `k` larger than the length wraps around.
pub fn rotate<T>(values: &mut [T], k: usize) {
    if values.is_empty() {
        return;
    }
    let shift = k % values.len();
    values.rotate_left(shift);
}

/// Moves the zero-frequency bin to the centre (`len / 2`) of the sequence.
pub fn fftshift<T>(values: &mut [T]) {
    let len = values.len();
    rotate(values, (len + 1) / 2);
}

/// Applies [`fftshift`] to every row of a matrix.
pub fn fftshift_rows<T>(mut matrix: ArrayViewMut2<T>) {
    for mut row in matrix.rows_mut() {
        if let Some(values) = row.as_slice_mut() {
            fftshift(values);
            continue;
        }
        // Strided row: rotate by three reversals.
        let len = row.len();
        let shift = (len + 1) / 2;
        reverse_range(&mut row, 0, shift);
        reverse_range(&mut row, shift, len);
        reverse_range(&mut row, 0, len);
    }
}

fn reverse_range<T>(row: &mut ArrayViewMut1<T>, mut lo: usize, mut hi: usize) {
    while hi > lo + 1 {
        hi -= 1;
        row.swap(lo, hi);
        lo += 1;
    }
}
