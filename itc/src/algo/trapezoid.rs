//! Trapezoidal integration utility

use thiserror::Error;

/// Errors that can occur during trapezoidal integration
#[derive(Debug, Error)]
pub enum TrapezoidError {
    #[error("Insufficient points for integration, need at least 2 points")]
    InsufficientPoints,

    #[error("Points must be in ascending order")]
    NotAscending,
}

/// Performs trapezoidal integration of a function over a set of points.
///
/// # Arguments
///
/// * `corners` - The x coordinates of the trapezoid corners in ascending order
/// * `to_integrate` - The function to integrate
///
/// # Returns
///
/// The result of the trapezoidal integration or an error if the input is invalid.
pub fn trap_integrate<F>(corners: &[f64], to_integrate: F) -> Result<f64, TrapezoidError>
where
    F: Fn(f64) -> f64,
{
    if corners.len() < 2 {
        return Err(TrapezoidError::InsufficientPoints);
    }

    if corners.windows(2).any(|pair| pair[1] <= pair[0]) {
        return Err(TrapezoidError::NotAscending);
    }

    // ∫[x₁,x₂] f(x)dx ≈ (x₂-x₁) × (f(x₁)+f(x₂))/2
    let integral = corners
        .windows(2)
        .map(|pair| (pair[1] - pair[0]) * (to_integrate(pair[0]) + to_integrate(pair[1])) / 2.0)
        .sum();

    Ok(integral)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_trap_integrate() {
        // (1-0)(0+1)/2 + (2-1)(1+4)/2 + (3-2)(4+9)/2 = 0.5 + 2.5 + 6.5
        let corners = [0.0, 1.0, 2.0, 3.0];
        let result = trap_integrate(&corners, |x| x * x).unwrap();

        assert_relative_eq!(result, 9.5, epsilon = 1e-12);
    }

    #[test]
    fn test_linear_is_exact() {
        let corners = [400.0, 450.0, 700.0];
        let result = trap_integrate(&corners, |x| 2.0 * x + 1.0).unwrap();

        assert_relative_eq!(result, (700.0f64.powi(2) + 700.0) - (400.0f64.powi(2) + 400.0));
    }

    #[test]
    fn test_insufficient_points() {
        let result = trap_integrate(&[1.0], |x| x);

        assert!(matches!(result, Err(TrapezoidError::InsufficientPoints)));
    }

    #[test]
    fn test_not_ascending() {
        let result = trap_integrate(&[0.0, 2.0, 1.0, 3.0], |x| x);

        assert!(matches!(result, Err(TrapezoidError::NotAscending)));
    }
}
