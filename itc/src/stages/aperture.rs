//! Telescope aperture scaling

use crate::error::SedError;
use crate::photometry::SampledSpectrum;

use super::SpectrumStage;

/// Multiply a per-m² flux by the collecting area.
///
/// photons s⁻¹ m⁻² nm⁻¹ in, photons s⁻¹ nm⁻¹ out.
#[derive(Debug, Clone, Copy)]
pub struct TelescopeAperture {
    area_m2: f64,
}

impl TelescopeAperture {
    pub fn new(area_m2: f64) -> Result<Self, SedError> {
        if !area_m2.is_finite() || area_m2 <= 0.0 {
            return Err(SedError::InvalidParameter(format!(
                "Collecting area must be positive, got {area_m2}m²"
            )));
        }
        Ok(Self { area_m2 })
    }
}

impl SpectrumStage for TelescopeAperture {
    fn name(&self) -> &'static str {
        "telescope aperture"
    }

    fn apply(&self, spectrum: &mut SampledSpectrum) -> Result<(), SedError> {
        spectrum.scale(self.area_m2);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scales_by_area() {
        let mut spectrum = SampledSpectrum::new(vec![1.0, 2.0], 500.0, 1.0).unwrap();
        spectrum.accept(&TelescopeAperture::new(50.0).unwrap()).unwrap();
        assert_eq!(spectrum.flux(), &[50.0, 100.0]);
        assert!(TelescopeAperture::new(-1.0).is_err());
    }
}
