//! Redshift as a pure wavelength-axis stretch

use crate::error::SedError;
use crate::photometry::SampledSpectrum;

use super::SpectrumStage;

/// Stretch wavelengths by (1 + z); samples are not touched or resampled
#[derive(Debug, Clone, Copy)]
pub struct Redshift {
    z: f64,
}

impl Redshift {
    pub fn new(z: f64) -> Result<Self, SedError> {
        if !z.is_finite() || z <= -1.0 {
            return Err(SedError::InvalidParameter(format!(
                "Redshift must be greater than -1, got {z}"
            )));
        }
        Ok(Self { z })
    }

    pub fn factor(&self) -> f64 {
        1.0 + self.z
    }
}

impl SpectrumStage for Redshift {
    fn name(&self) -> &'static str {
        "redshift"
    }

    fn apply(&self, spectrum: &mut SampledSpectrum) -> Result<(), SedError> {
        if self.z != 0.0 {
            spectrum.rescale_wavelength(self.factor());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_bounds_scale_and_counts_invariant() {
        for z in [0.0, 0.1, 1.0, 3.5] {
            let mut spectrum =
                SampledSpectrum::from_window(400.0, 900.0, 0.5, |wl| (wl / 100.0).cos() + 2.0)
                    .unwrap();
            let (start, end, total) = (spectrum.start(), spectrum.end(), spectrum.sum());

            spectrum.accept(&Redshift::new(z).unwrap()).unwrap();

            assert_relative_eq!(spectrum.start(), start * (1.0 + z), max_relative = 1e-12);
            assert_relative_eq!(spectrum.end(), end * (1.0 + z), max_relative = 1e-12);
            assert_relative_eq!(spectrum.sum(), total, max_relative = 1e-12);
            assert_eq!(spectrum.len(), 1000);
        }
    }

    #[test]
    fn test_blueshift_allowed_above_minus_one() {
        let mut spectrum = SampledSpectrum::new(vec![1.0, 2.0], 500.0, 1.0).unwrap();
        spectrum.accept(&Redshift::new(-0.5).unwrap()).unwrap();
        assert_relative_eq!(spectrum.start(), 250.0);
        assert!(Redshift::new(-1.0).is_err());
    }
}
