//! Source definitions: spectral shape, redshift and normalization

use serde::{Deserialize, Serialize};

use crate::error::SedError;
use crate::photometry::{BrightnessUnit, ContinuumUnit, LineFluxUnit, Waveband};

/// Spectral shape of the source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Distribution {
    Blackbody {
        temperature_k: f64,
    },
    EmissionLine {
        wavelength_nm: f64,
        width_km_s: f64,
        line_flux: f64,
        line_flux_unit: LineFluxUnit,
        continuum: f64,
        continuum_unit: ContinuumUnit,
    },
    PowerLaw {
        index: f64,
    },
    /// Named SED from the data library
    Library {
        name: String,
    },
    /// User uploaded SED, addressed as a data library resource
    UserDefined {
        resource: String,
        #[serde(default)]
        interval_nm: Option<f64>,
    },
}

impl Distribution {
    /// Whether the source carries a physical normalization band whose
    /// coverage must be checked after redshifting
    pub fn has_normalization_band(&self) -> bool {
        !matches!(
            self,
            Distribution::Blackbody { .. } | Distribution::EmissionLine { .. }
        )
    }

    /// Emission lines are given in absolute units and never normalized
    pub fn is_normalized(&self) -> bool {
        !matches!(self, Distribution::EmissionLine { .. })
    }

    /// Tabulated sources get the wavelength correction after resampling
    pub fn is_tabulated(&self) -> bool {
        matches!(
            self,
            Distribution::Library { .. } | Distribution::UserDefined { .. }
        )
    }
}

/// Everything needed to build and normalize a source spectrum
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceDefinition {
    pub distribution: Distribution,
    #[serde(default)]
    pub redshift: f64,
    pub norm_band: Waveband,
    pub normalization: f64,
    pub units: BrightnessUnit,
}

impl SourceDefinition {
    pub fn new(
        distribution: Distribution,
        redshift: f64,
        norm_band: Waveband,
        normalization: f64,
        units: BrightnessUnit,
    ) -> Result<Self, SedError> {
        let source = Self {
            distribution,
            redshift,
            norm_band,
            normalization,
            units,
        };
        source.validate()?;
        Ok(source)
    }

    /// Check scalar fields of a deserialized instance
    pub fn validate(&self) -> Result<(), SedError> {
        if !self.redshift.is_finite() || self.redshift <= -1.0 {
            return Err(SedError::InvalidParameter(format!(
                "Redshift must be greater than -1, got {}",
                self.redshift
            )));
        }
        if let Distribution::UserDefined {
            interval_nm: Some(interval),
            ..
        } = self.distribution
        {
            if !interval.is_finite() || interval <= 0.0 {
                return Err(SedError::InvalidParameter(format!(
                    "User sampling interval must be positive, got {interval}"
                )));
            }
        }
        Ok(())
    }
}
