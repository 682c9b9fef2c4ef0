//! Radiometric normalization

use crate::error::SedError;
use crate::photometry::{BrightnessUnit, SampledSpectrum, Waveband};

use super::SpectrumStage;

/// Scale a spectrum so its integral over a band matches a requested
/// brightness.
///
/// The brightness is converted to a mean photon flux density ρ at the band
/// center (photons s⁻¹ m⁻² nm⁻¹); after scaling the integral over the band
/// is ρ times the band width.
#[derive(Debug, Clone)]
pub struct Normalize {
    band: Waveband,
    target_integral: f64,
}

impl Normalize {
    pub fn new(band: Waveband, value: f64, unit: BrightnessUnit) -> Result<Self, SedError> {
        let density = unit.photon_flux_density(value, &band)?;
        let target_integral = density * band.width();
        log::debug!(
            "Normalizing to {value} {unit:?} in {}: {density:.4e} photons/s/m²/nm",
            band.name
        );
        Ok(Self {
            band,
            target_integral,
        })
    }

    /// Band integral the spectrum will have after normalization
    pub fn target_integral(&self) -> f64 {
        self.target_integral
    }
}

impl SpectrumStage for Normalize {
    fn name(&self) -> &'static str {
        "normalization"
    }

    fn apply(&self, spectrum: &mut SampledSpectrum) -> Result<(), SedError> {
        if self.band.start_nm < spectrum.start() || self.band.end_nm > spectrum.end() {
            return Err(SedError::OutOfRange(format!(
                "Normalization band {} ({}..{}nm) lies outside the spectrum ({:.3}..{:.3}nm)",
                self.band.name,
                self.band.start_nm,
                self.band.end_nm,
                spectrum.start(),
                spectrum.end()
            )));
        }

        let current = spectrum.integral(self.band.start_nm, self.band.end_nm)?;
        if !current.is_finite() || current <= 0.0 {
            return Err(SedError::InvalidParameter(format!(
                "Spectrum carries no flux in normalization band {}",
                self.band.name
            )));
        }

        spectrum.scale(self.target_integral / current);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn band() -> Waveband {
        Waveband::from_nm_bounds(500.0, 600.0).unwrap()
    }

    #[test]
    fn test_integral_matches_target() {
        let mut spectrum =
            SampledSpectrum::from_window(400.0, 900.0, 1.0, |wl| (wl / 300.0).powi(3)).unwrap();
        let stage =
            Normalize::new(band(), 10.0, BrightnessUnit::PhotonsPerSecondPerSquareMeterPerNm)
                .unwrap();
        spectrum.accept(&stage).unwrap();

        let integral = spectrum.integral(500.0, 600.0).unwrap();
        assert_relative_eq!(integral, 1000.0, max_relative = 1e-12);
        assert_relative_eq!(integral, stage.target_integral(), max_relative = 1e-12);
    }

    #[test]
    fn test_idempotent() {
        let mut spectrum = SampledSpectrum::from_window(400.0, 900.0, 0.7, |wl| wl).unwrap();
        let stage = Normalize::new(band(), 21.0, BrightnessUnit::AbMagnitude).unwrap();
        spectrum.accept(&stage).unwrap();
        let once = spectrum.clone();
        spectrum.accept(&stage).unwrap();

        for (a, b) in once.flux().iter().zip(spectrum.flux()) {
            assert_relative_eq!(*a, *b, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_band_outside_spectrum() {
        let mut spectrum = SampledSpectrum::from_window(400.0, 900.0, 1.0, |_| 1.0).unwrap();
        let untouched = spectrum.clone();
        let stage = Normalize::new(
            Waveband::from_nm_bounds(1000.0, 1100.0).unwrap(),
            10.0,
            BrightnessUnit::PhotonsPerSecondPerSquareMeterPerNm,
        )
        .unwrap();

        assert!(matches!(
            spectrum.accept(&stage),
            Err(SedError::OutOfRange(_))
        ));
        assert_eq!(spectrum, untouched);
    }

    #[test]
    fn test_zero_flux_band() {
        let mut spectrum = SampledSpectrum::from_window(400.0, 900.0, 1.0, |_| 0.0).unwrap();
        let stage = Normalize::new(band(), 10.0, BrightnessUnit::Jansky).unwrap();
        assert!(matches!(
            spectrum.accept(&stage),
            Err(SedError::InvalidParameter(_))
        ));
    }
}
