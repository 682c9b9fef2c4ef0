//! Brightness units and their conversion to photon flux densities
//!
//! Every conversion lands in photons s⁻¹ m⁻² nm⁻¹ at a given wavelength,
//! the unit the pipeline normalizes into.

use serde::{Deserialize, Serialize};

use crate::error::SedError;

use super::spectrum::{photon_energy_joules, Waveband, CGS};

/// erg s⁻¹ cm⁻² expressed in W m⁻²
const ERG_S_CM2_IN_W_M2: f64 = 1e-3;

/// Units a source normalization value can be given in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrightnessUnit {
    /// Vega magnitude, requires a band with a known zero point
    VegaMagnitude,
    /// AB magnitude
    AbMagnitude,
    /// Jansky (1e-26 W m⁻² Hz⁻¹)
    Jansky,
    /// W m⁻² µm⁻¹
    WattsPerSquareMeterPerMicron,
    /// erg s⁻¹ cm⁻² Å⁻¹
    ErgsPerSecondPerSquareCmPerAngstrom,
    /// erg s⁻¹ cm⁻² Hz⁻¹
    ErgsPerSecondPerSquareCmPerHz,
    /// photons s⁻¹ m⁻² nm⁻¹, taken as-is
    PhotonsPerSecondPerSquareMeterPerNm,
}

/// Units for the integrated flux of an emission line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineFluxUnit {
    /// W m⁻²
    WattsPerSquareMeter,
    /// erg s⁻¹ cm⁻²
    ErgsPerSecondPerSquareCm,
}

/// Units for the continuum under an emission line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContinuumUnit {
    /// W m⁻² µm⁻¹
    WattsPerSquareMeterPerMicron,
    /// erg s⁻¹ cm⁻² Å⁻¹
    ErgsPerSecondPerSquareCmPerAngstrom,
}

/// Convert F_ν in erg s⁻¹ cm⁻² Hz⁻¹ to F_λ in W m⁻² nm⁻¹
///
/// F_λ = F_ν c / λ², with λ in cm; then per cm → per nm and CGS → SI.
fn f_nu_cgs_to_f_lambda_si(f_nu: f64, wavelength_nm: f64) -> f64 {
    let wavelength_cm = wavelength_nm * 1e-7;
    let f_lambda_per_cm = f_nu * CGS::SPEED_OF_LIGHT / (wavelength_cm * wavelength_cm);
    f_lambda_per_cm * 1e-7 * ERG_S_CM2_IN_W_M2
}

/// Convert F_λ in W m⁻² nm⁻¹ to photons s⁻¹ m⁻² nm⁻¹
fn watts_to_photons(f_lambda: f64, wavelength_nm: f64) -> f64 {
    f_lambda / photon_energy_joules(wavelength_nm)
}

impl BrightnessUnit {
    /// Whether larger values mean fainter sources
    pub fn is_magnitude(&self) -> bool {
        matches!(self, Self::VegaMagnitude | Self::AbMagnitude)
    }

    /// Photon flux density (photons s⁻¹ m⁻² nm⁻¹) at the center of `band`
    /// for a source of brightness `value` in this unit
    pub fn photon_flux_density(&self, value: f64, band: &Waveband) -> Result<f64, SedError> {
        if !value.is_finite() {
            return Err(SedError::InvalidParameter(format!(
                "Normalization value must be finite, got {value}"
            )));
        }
        if !self.is_magnitude() && value < 0.0 {
            return Err(SedError::InvalidParameter(format!(
                "Normalization flux must not be negative, got {value}"
            )));
        }

        let wavelength_nm = band.center();
        let f_lambda = match self {
            Self::VegaMagnitude => {
                let zero_point = band.vega_zero_point.ok_or_else(|| {
                    SedError::InvalidParameter(format!(
                        "Band {} has no Vega zero point; use AB magnitudes or a flux unit",
                        band.name
                    ))
                })?;
                // erg s⁻¹ cm⁻² Å⁻¹ → W m⁻² nm⁻¹ is a factor of 1e-2
                zero_point * 10f64.powf(-0.4 * value) * 1e-2
            }
            Self::AbMagnitude => f_nu_cgs_to_f_lambda_si(
                CGS::AB_ZERO_POINT_FLUX_DENSITY * 10f64.powf(-0.4 * value),
                wavelength_nm,
            ),
            Self::Jansky => f_nu_cgs_to_f_lambda_si(value * CGS::JANSKY_IN_CGS, wavelength_nm),
            Self::WattsPerSquareMeterPerMicron => value * 1e-3,
            Self::ErgsPerSecondPerSquareCmPerAngstrom => value * 1e-2,
            Self::ErgsPerSecondPerSquareCmPerHz => f_nu_cgs_to_f_lambda_si(value, wavelength_nm),
            Self::PhotonsPerSecondPerSquareMeterPerNm => return Ok(value),
        };

        Ok(watts_to_photons(f_lambda, wavelength_nm))
    }
}

impl LineFluxUnit {
    /// Integrated line flux in photons s⁻¹ m⁻² for a line at `wavelength_nm`
    pub fn photon_flux(&self, value: f64, wavelength_nm: f64) -> f64 {
        let watts = match self {
            Self::WattsPerSquareMeter => value,
            Self::ErgsPerSecondPerSquareCm => value * ERG_S_CM2_IN_W_M2,
        };
        watts / photon_energy_joules(wavelength_nm)
    }
}

impl ContinuumUnit {
    /// Continuum photon flux density (photons s⁻¹ m⁻² nm⁻¹) at `wavelength_nm`
    pub fn photon_flux_density(&self, value: f64, wavelength_nm: f64) -> f64 {
        let f_lambda = match self {
            Self::WattsPerSquareMeterPerMicron => value * 1e-3,
            Self::ErgsPerSecondPerSquareCmPerAngstrom => value * 1e-2,
        };
        watts_to_photons(f_lambda, wavelength_nm)
    }
}
