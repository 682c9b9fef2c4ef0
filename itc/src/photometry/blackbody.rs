//! Planck-law source spectra

use crate::error::SedError;

use super::sampled::SampledSpectrum;
use super::spectrum::SI;

/// Blackbody photon spectrum with an arbitrary amplitude.
///
/// The amplitude is fixed later by normalization; only the shape matters.
#[derive(Debug, Clone)]
pub struct BlackbodySpectrum {
    temperature_k: f64,
}

impl BlackbodySpectrum {
    /// Create a blackbody at the given temperature in Kelvin
    pub fn new(temperature_k: f64) -> Result<Self, SedError> {
        if !temperature_k.is_finite() || temperature_k <= 0.0 {
            return Err(SedError::InvalidParameter(format!(
                "Blackbody temperature must be positive, got {temperature_k}K"
            )));
        }
        Ok(Self { temperature_k })
    }

    pub fn temperature(&self) -> f64 {
        self.temperature_k
    }

    /// Relative photon flux density at `wavelength_nm`
    ///
    /// N_λ ∝ λ⁻⁴ / (exp(hc/λkT) − 1), with λ scaled to microns to keep the
    /// numbers near unity.
    pub fn photon_flux(&self, wavelength_nm: f64) -> f64 {
        if wavelength_nm <= 0.0 {
            return 0.0;
        }
        let x = SI::SECOND_RADIATION_CONSTANT_NM_K / (wavelength_nm * self.temperature_k);
        let wavelength_um = wavelength_nm * 1e-3;
        1.0 / (wavelength_um.powi(4) * x.exp_m1())
    }

    /// Wavelength of peak photon flux density, λ·T = 3.6697e6 nm·K
    pub fn photon_peak_wavelength(&self) -> f64 {
        3.669_7e6 / self.temperature_k
    }

    /// Sample over the half-open window `[start_nm, end_nm)`
    pub fn sampled(
        &self,
        start_nm: f64,
        end_nm: f64,
        interval_nm: f64,
    ) -> Result<SampledSpectrum, SedError> {
        SampledSpectrum::from_window(start_nm, end_nm, interval_nm, |wl| self.photon_flux(wl))
    }
}
