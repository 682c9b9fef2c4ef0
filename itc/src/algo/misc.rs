//! Linear interpolation over tabulated curves.
//!
//! Every wavelength-indexed table in the crate (tabulated SEDs, transmission
//! curves, background emission files) is evaluated through these helpers.

use thiserror::Error;

/// Errors that can occur during interpolation operations.
#[derive(Error, Debug)]
pub enum InterpError {
    #[error("Value {0} is out of bounds for interpolation range [{1}, {2}]")]
    OutOfBounds(f64, f64, f64),
    #[error("Input vectors must have at least 2 points")]
    InsufficientData,
    #[error("Input vectors must have the same length")]
    MismatchedLengths,
}

/// Linear interpolation on 1D data using binary search.
///
/// `xs` must be strictly ascending. Callers construct their tables through
/// validating constructors, so ordering is not re-checked here.
///
/// # Examples
///
/// ```rust
/// use itc::algo::misc::interp;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let wavelengths = vec![400.0, 500.0, 600.0];
/// let flux = vec![1.0, 3.0, 2.0];
///
/// assert_eq!(interp(450.0, &wavelengths, &flux)?, 2.0);
/// assert_eq!(interp(600.0, &wavelengths, &flux)?, 2.0);
/// # Ok(())
/// # }
/// ```
pub fn interp(x: f64, xs: &[f64], ys: &[f64]) -> Result<f64, InterpError> {
    if xs.len() != ys.len() {
        return Err(InterpError::MismatchedLengths);
    }

    if xs.len() < 2 {
        return Err(InterpError::InsufficientData);
    }

    let min_x = xs[0];
    let max_x = xs[xs.len() - 1];

    if !(min_x..=max_x).contains(&x) {
        return Err(InterpError::OutOfBounds(x, min_x, max_x));
    }

    // First index whose abscissa is >= x
    let idx = xs.partition_point(|candidate| *candidate < x);
    if xs[idx] == x {
        return Ok(ys[idx]);
    }

    let (x1, x2) = (xs[idx - 1], xs[idx]);
    let (y1, y2) = (ys[idx - 1], ys[idx]);

    let t = (x - x1) / (x2 - x1);
    Ok(y1 + t * (y2 - y1))
}

/// Like [`interp`], but evaluates to 0.0 anywhere the table is undefined.
pub fn interp_or_zero(x: f64, xs: &[f64], ys: &[f64]) -> f64 {
    interp(x, xs, ys).unwrap_or(0.0)
}
