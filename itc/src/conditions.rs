//! Site, spectral band and sky condition categories
//!
//! The sky-condition enums follow the Gemini percentile conventions; the
//! legacy numeric "buckets" they map to are what the background and
//! transmission libraries are keyed by.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SedError;

/// Observatory site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Site {
    /// Gemini North, Mauna Kea
    #[serde(rename = "GN")]
    GeminiNorth,
    /// Gemini South, Cerro Pachón
    #[serde(rename = "GS")]
    GeminiSouth,
}

impl Site {
    /// Data library directory prefix for this site
    pub fn directory(&self) -> &'static str {
        match self {
            Site::GeminiNorth => "mk",
            Site::GeminiSouth => "cp",
        }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Site::GeminiNorth => write!(f, "GN"),
            Site::GeminiSouth => write!(f, "GS"),
        }
    }
}

/// Broad spectral regime of an observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpectralBand {
    Visible,
    NearIr,
    MidIr,
}

impl SpectralBand {
    /// Tag used in requests and in data library paths
    pub fn tag(&self) -> &'static str {
        match self {
            SpectralBand::Visible => "visible",
            SpectralBand::NearIr => "nearIR",
            SpectralBand::MidIr => "midIR",
        }
    }
}

impl FromStr for SpectralBand {
    type Err = SedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "visible" => Ok(SpectralBand::Visible),
            "nearIR" => Ok(SpectralBand::NearIr),
            "midIR" => Ok(SpectralBand::MidIr),
            other => Err(SedError::UnsupportedBand(other.to_string())),
        }
    }
}

impl fmt::Display for SpectralBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Cloud cover percentile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CloudCover {
    #[serde(rename = "CC50")]
    Percent50,
    #[serde(rename = "CC70")]
    Percent70,
    #[serde(rename = "CC80")]
    Percent80,
    #[serde(rename = "CCAny")]
    Any,
}

impl CloudCover {
    /// Grey extinction by clouds in magnitudes
    pub fn extinction_mag(&self) -> f64 {
        match self {
            CloudCover::Percent50 => 0.0,
            CloudCover::Percent70 => 0.3,
            CloudCover::Percent80 => 1.0,
            CloudCover::Any => 3.0,
        }
    }

    /// Fraction of light transmitted, 10^(-0.4 A)
    pub fn transmission(&self) -> f64 {
        10f64.powf(-0.4 * self.extinction_mag())
    }
}

/// Water vapor percentile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaterVapor {
    #[serde(rename = "WV20")]
    Percent20,
    #[serde(rename = "WV50")]
    Percent50,
    #[serde(rename = "WV80")]
    Percent80,
    #[serde(rename = "WVAny")]
    Any,
}

/// Sky background percentile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkyBackground {
    #[serde(rename = "SB20")]
    Percent20,
    #[serde(rename = "SB50")]
    Percent50,
    #[serde(rename = "SB80")]
    Percent80,
    #[serde(rename = "SBAny")]
    Any,
}

/// Atmospheric conditions for an observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservingConditions {
    pub cloud_cover: CloudCover,
    pub water_vapor: WaterVapor,
    pub sky_background: SkyBackground,
    /// Path length through the atmosphere relative to zenith
    pub airmass: f64,
}

impl ObservingConditions {
    pub fn new(
        cloud_cover: CloudCover,
        water_vapor: WaterVapor,
        sky_background: SkyBackground,
        airmass: f64,
    ) -> Result<Self, SedError> {
        let conditions = Self {
            cloud_cover,
            water_vapor,
            sky_background,
            airmass,
        };
        conditions.validate()?;
        Ok(conditions)
    }

    /// Check scalar fields of a deserialized instance
    pub fn validate(&self) -> Result<(), SedError> {
        if !self.airmass.is_finite() || self.airmass < 1.0 {
            return Err(SedError::InvalidParameter(format!(
                "Airmass must be at least 1.0, got {}",
                self.airmass
            )));
        }
        Ok(())
    }

    /// Water vapor bucket, 1 (driest) to 4
    pub fn sky_transparency_water_category(&self) -> u8 {
        match self.water_vapor {
            WaterVapor::Percent20 => 1,
            WaterVapor::Percent50 => 2,
            WaterVapor::Percent80 => 3,
            WaterVapor::Any => 4,
        }
    }

    /// Sky background bucket, 1 (darkest) to 4
    pub fn sky_background_category(&self) -> u8 {
        match self.sky_background {
            SkyBackground::Percent20 => 1,
            SkyBackground::Percent50 => 2,
            SkyBackground::Percent80 => 3,
            SkyBackground::Any => 4,
        }
    }

    /// Airmass bucket: "10" up to 1.25, "15" up to 1.75, "20" beyond
    pub fn airmass_category(&self) -> &'static str {
        if self.airmass <= 1.25 {
            "10"
        } else if self.airmass <= 1.75 {
            "15"
        } else {
            "20"
        }
    }
}
