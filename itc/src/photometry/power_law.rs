//! Power-law source spectra

use crate::error::SedError;

use super::sampled::SampledSpectrum;

/// f(λ) ∝ λ^index, with λ in microns
#[derive(Debug, Clone)]
pub struct PowerLawSpectrum {
    index: f64,
}

impl PowerLawSpectrum {
    pub fn new(index: f64) -> Result<Self, SedError> {
        if !index.is_finite() {
            return Err(SedError::InvalidParameter(format!(
                "Power law index must be finite, got {index}"
            )));
        }
        Ok(Self { index })
    }

    pub fn flux(&self, wavelength_nm: f64) -> f64 {
        (wavelength_nm * 1e-3).powf(self.index)
    }

    /// Sample over the half-open window `[start_nm, end_nm)`
    pub fn sampled(
        &self,
        start_nm: f64,
        end_nm: f64,
        interval_nm: f64,
    ) -> Result<SampledSpectrum, SedError> {
        SampledSpectrum::from_window(start_nm, end_nm, interval_nm, |wl| self.flux(wl))
    }
}
