pub use num_complex::Complex32;

/// Recoverable failures reported by the processing core.
///
/// Violated preconditions (non-positive wavelength, alpha outside `[0, 1]`,
/// empty buffers) are programmer errors and panic instead.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum DspError {
    #[error("invalid length {0}: at least 2 elements are required")]
    InvalidLength(usize),
    #[error("unsupported transform length {0}")]
    UnsupportedLength(usize),
    #[error("argument error: {0}")]
    ArgumentError(String),
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),
}

pub type DspResult<T> = Result<T, DspError>;

/// Builds a `ShapeMismatch` error when `actual` differs from `expected`.
pub(crate) fn check_shape(
    what: &str,
    expected: (usize, usize),
    actual: (usize, usize),
) -> DspResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(DspError::ShapeMismatch(format!(
            "{} expected {}x{}, got {}x{}",
            what, expected.0, expected.1, actual.0, actual.1
        )))
    }
}
