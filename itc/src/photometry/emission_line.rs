//! Emission line on a flat continuum
//!
//! Unlike the other analytic sources this one carries absolute units:
//! the line flux and continuum are converted straight into photons
//! s⁻¹ m⁻² nm⁻¹ and the spectrum is never normalized afterwards.

use crate::error::SedError;

use super::sampled::SampledSpectrum;
use super::spectrum::SI;
use super::units::{ContinuumUnit, LineFluxUnit};

/// FWHM = 2√(2 ln 2) σ
const FWHM_PER_SIGMA: f64 = 2.354_820_045_030_949;

/// Gaussian emission line plus flat continuum
#[derive(Debug, Clone)]
pub struct EmissionLineSpectrum {
    wavelength_nm: f64,
    sigma_nm: f64,
    line_photon_flux: f64,
    continuum: f64,
    continuum_unit: ContinuumUnit,
}

impl EmissionLineSpectrum {
    /// # Arguments
    ///
    /// * `wavelength_nm` - Rest wavelength of the line center
    /// * `width_km_s` - Line FWHM as a velocity
    /// * `line_flux` / `line_unit` - Integrated line flux
    /// * `continuum` / `continuum_unit` - Continuum flux density
    pub fn new(
        wavelength_nm: f64,
        width_km_s: f64,
        line_flux: f64,
        line_unit: LineFluxUnit,
        continuum: f64,
        continuum_unit: ContinuumUnit,
    ) -> Result<Self, SedError> {
        if !wavelength_nm.is_finite() || wavelength_nm <= 0.0 {
            return Err(SedError::InvalidParameter(format!(
                "Line wavelength must be positive, got {wavelength_nm}nm"
            )));
        }
        if !width_km_s.is_finite() || width_km_s <= 0.0 {
            return Err(SedError::InvalidParameter(format!(
                "Line width must be positive, got {width_km_s}km/s"
            )));
        }
        if [line_flux, continuum]
            .iter()
            .any(|flux| !flux.is_finite() || *flux < 0.0)
        {
            return Err(SedError::InvalidParameter(format!(
                "Line and continuum fluxes must be finite and not negative, got {line_flux} and {continuum}"
            )));
        }

        let fwhm_nm = wavelength_nm * width_km_s / SI::SPEED_OF_LIGHT_KM_S;
        Ok(Self {
            wavelength_nm,
            sigma_nm: fwhm_nm / FWHM_PER_SIGMA,
            line_photon_flux: line_unit.photon_flux(line_flux, wavelength_nm),
            continuum,
            continuum_unit,
        })
    }

    /// Line center in nm
    pub fn wavelength(&self) -> f64 {
        self.wavelength_nm
    }

    /// Gaussian sigma in nm
    pub fn sigma(&self) -> f64 {
        self.sigma_nm
    }

    /// Photon flux density at `wavelength_nm`, photons s⁻¹ m⁻² nm⁻¹
    pub fn photon_flux_density(&self, wavelength_nm: f64) -> f64 {
        let offset = (wavelength_nm - self.wavelength_nm) / self.sigma_nm;
        let line = self.line_photon_flux / (self.sigma_nm * (2.0 * std::f64::consts::PI).sqrt())
            * (-0.5 * offset * offset).exp();
        let continuum = self
            .continuum_unit
            .photon_flux_density(self.continuum, wavelength_nm);
        line + continuum
    }

    /// Sample over the half-open window `[start_nm, end_nm)`
    pub fn sampled(
        &self,
        start_nm: f64,
        end_nm: f64,
        interval_nm: f64,
    ) -> Result<SampledSpectrum, SedError> {
        SampledSpectrum::from_window(start_nm, end_nm, interval_nm, |wl| {
            self.photon_flux_density(wl)
        })
    }
}
