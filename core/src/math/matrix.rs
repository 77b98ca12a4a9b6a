use crate::prelude::{check_shape, Complex32, DspError, DspResult};
use ndarray::linalg::general_mat_mul;
use ndarray::{Array2, ArrayView2, ArrayViewMut2};
use rustfft::num_traits::{One, Zero};

/// Complex matrix operations with the shape contract checked up front.
pub struct MatrixHelper;

impl MatrixHelper {
    /// `lhs × rhs` into a freshly allocated matrix.
    pub fn multiply(
        lhs: ArrayView2<Complex32>,
        rhs: ArrayView2<Complex32>,
    ) -> DspResult<Array2<Complex32>> {
        Self::check_inner(&lhs, &rhs)?;
        Ok(lhs.dot(&rhs))
    }

    /// `lhs × rhs` written into caller-owned `out` of shape `lhs.rows × rhs.cols`.
    pub fn multiply_into(
        lhs: ArrayView2<Complex32>,
        rhs: ArrayView2<Complex32>,
        mut out: ArrayViewMut2<Complex32>,
    ) -> DspResult<()> {
        Self::check_inner(&lhs, &rhs)?;
        check_shape("product", (lhs.nrows(), rhs.ncols()), out.dim())?;
        general_mat_mul(Complex32::one(), &lhs, &rhs, Complex32::zero(), &mut out);
        Ok(())
    }

    /// Writes the transpose of `input` into `out`, which must have swapped dimensions.
    pub fn transpose_into(
        input: ArrayView2<Complex32>,
        mut out: ArrayViewMut2<Complex32>,
    ) -> DspResult<()> {
        check_shape("transpose", (input.ncols(), input.nrows()), out.dim())?;
        out.assign(&input.t());
        Ok(())
    }

    fn check_inner(lhs: &ArrayView2<Complex32>, rhs: &ArrayView2<Complex32>) -> DspResult<()> {
        if lhs.ncols() != rhs.nrows() {
            return Err(DspError::ShapeMismatch(format!(
                "cannot multiply {}x{} by {}x{}",
                lhs.nrows(),
                lhs.ncols(),
                rhs.nrows(),
                rhs.ncols()
            )));
        }
        Ok(())
    }
}
