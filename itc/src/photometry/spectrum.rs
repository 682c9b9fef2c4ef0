//! Physical constants, photon energies and normalization wavebands
//!
//! Wavelengths are in nanometers throughout the crate. Internal flux units
//! after normalization are photons s⁻¹ m⁻² nm⁻¹, and photons s⁻¹ nm⁻¹ once
//! the telescope aperture has been applied.

use serde::{Deserialize, Serialize};

use crate::error::SedError;

/// Constants in CGS units
pub struct CGS {}

impl CGS {
    /// AB magnitude system zero-point flux density
    /// Units: 3631e-23 erg s⁻¹ cm⁻² Hz⁻¹
    pub const AB_ZERO_POINT_FLUX_DENSITY: f64 = 3631e-23;

    /// 1 Jansky in CGS units
    /// Units: 1e-23 erg s⁻¹ cm⁻² Hz⁻¹
    pub const JANSKY_IN_CGS: f64 = 1e-23;

    /// Speed of light in vacuum
    /// Units: 2.99792458e10 cm/s (centimeters per second in CGS)
    pub const SPEED_OF_LIGHT: f64 = 2.99792458e10;
}

/// Constants in SI units
pub struct SI {}

impl SI {
    /// Planck's constant, J⋅s
    pub const PLANCK_CONSTANT: f64 = 6.62607015e-34;

    /// Speed of light in vacuum, m/s
    pub const SPEED_OF_LIGHT: f64 = 2.99792458e8;

    /// Speed of light in vacuum, km/s
    pub const SPEED_OF_LIGHT_KM_S: f64 = 2.99792458e5;

    /// Boltzmann constant, J/K
    pub const BOLTZMANN_CONSTANT: f64 = 1.380649e-23;

    /// Second radiation constant hc/k expressed in nm⋅K
    pub const SECOND_RADIATION_CONSTANT_NM_K: f64 =
        Self::PLANCK_CONSTANT * Self::SPEED_OF_LIGHT / Self::BOLTZMANN_CONSTANT * 1e9;
}

/// Energy of one photon at the given wavelength, in joules
///
/// E = h * c / λ, with λ converted from nm to m
pub fn photon_energy_joules(wavelength_nm: f64) -> f64 {
    SI::PLANCK_CONSTANT * SI::SPEED_OF_LIGHT / (wavelength_nm * 1e-9)
}

/// Standard photometric bands: name, center (nm), width (nm), and the Vega
/// zero point flux density in erg s⁻¹ cm⁻² Å⁻¹ (Bessell et al. 1998).
const STANDARD_BANDS: [(&str, f64, f64, f64); 10] = [
    ("U", 366.0, 65.0, 4.175e-9),
    ("B", 438.0, 98.0, 6.32e-9),
    ("V", 545.0, 85.0, 3.631e-9),
    ("R", 641.0, 156.0, 2.177e-9),
    ("I", 798.0, 154.0, 1.126e-9),
    ("J", 1220.0, 213.0, 3.147e-10),
    ("H", 1630.0, 307.0, 1.138e-10),
    ("K", 2190.0, 390.0, 3.961e-11),
    ("L", 3450.0, 472.0, 7.08e-12),
    ("M", 4750.0, 460.0, 2.12e-12),
];

/// A wavelength interval over which a source's flux is pinned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waveband {
    /// Display name ("V", "K", or a description of a custom range)
    pub name: String,

    /// Lower wavelength bound in nanometers
    pub start_nm: f64,

    /// Upper wavelength bound in nanometers
    pub end_nm: f64,

    /// Vega zero point in erg s⁻¹ cm⁻² Å⁻¹, known only for standard bands
    #[serde(default)]
    pub vega_zero_point: Option<f64>,
}

impl Waveband {
    /// Create a custom band directly from lower and upper bounds
    ///
    /// # Arguments
    ///
    /// * `start_nm` - Lower wavelength bound in nanometers
    /// * `end_nm` - Upper wavelength bound in nanometers
    pub fn from_nm_bounds(start_nm: f64, end_nm: f64) -> Result<Self, SedError> {
        if !start_nm.is_finite() || !end_nm.is_finite() {
            return Err(SedError::InvalidParameter(
                "Waveband bounds cannot contain non-finite values".to_string(),
            ));
        }
        if start_nm <= 0.0 || start_nm >= end_nm {
            return Err(SedError::InvalidParameter(format!(
                "Invalid waveband: start must be positive and less than end, got {start_nm}..{end_nm}"
            )));
        }

        Ok(Self {
            name: format!("{start_nm}-{end_nm}nm"),
            start_nm,
            end_nm,
            vega_zero_point: None,
        })
    }

    /// Look up one of the standard U through M photometric bands by name
    pub fn standard(name: &str) -> Option<Self> {
        STANDARD_BANDS
            .iter()
            .find(|(band, ..)| band.eq_ignore_ascii_case(name))
            .map(|&(band, center, width, zero_point)| Self {
                name: band.to_string(),
                start_nm: center - width / 2.0,
                end_nm: center + width / 2.0,
                vega_zero_point: Some(zero_point),
            })
    }

    /// Width of the band in nanometers
    pub fn width(&self) -> f64 {
        self.end_nm - self.start_nm
    }

    /// Center of the band in nanometers
    pub fn center(&self) -> f64 {
        (self.start_nm + self.end_nm) / 2.0
    }
}
