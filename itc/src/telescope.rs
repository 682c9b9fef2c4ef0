//! Telescope configuration

use serde::{Deserialize, Serialize};

use crate::error::SedError;

/// Gemini primary mirror diameter in meters
pub const GEMINI_PRIMARY_DIAMETER_M: f64 = 8.1;

/// Diameter of the central obscuration in meters
pub const GEMINI_OBSCURATION_DIAMETER_M: f64 = 1.0;

/// Mirror coating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MirrorCoating {
    Aluminium,
    Silver,
}

impl MirrorCoating {
    /// Short name used in data library paths
    pub fn file_key(&self) -> &'static str {
        match self {
            MirrorCoating::Aluminium => "al",
            MirrorCoating::Silver => "ag",
        }
    }
}

/// Instrument support structure port the instrument is mounted on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssPort {
    UpLooking,
    SideLooking,
}

impl IssPort {
    /// Short name used in data library paths
    pub fn file_key(&self) -> &'static str {
        match self {
            IssPort::UpLooking => "up",
            IssPort::SideLooking => "side",
        }
    }
}

/// Telescope configuration relevant to throughput and thermal emission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelescopeParameters {
    pub coating: MirrorCoating,
    pub port: IssPort,

    /// Unobscured collecting area in m²
    #[serde(default = "gemini_collecting_area_m2")]
    pub collecting_area_m2: f64,
}

/// Collecting area of the Gemini primary less its central obscuration
pub fn gemini_collecting_area_m2() -> f64 {
    std::f64::consts::PI / 4.0
        * (GEMINI_PRIMARY_DIAMETER_M.powi(2) - GEMINI_OBSCURATION_DIAMETER_M.powi(2))
}

impl TelescopeParameters {
    /// Gemini telescope with the given coating and port
    pub fn gemini(coating: MirrorCoating, port: IssPort) -> Self {
        Self {
            coating,
            port,
            collecting_area_m2: gemini_collecting_area_m2(),
        }
    }

    pub fn validate(&self) -> Result<(), SedError> {
        if !self.collecting_area_m2.is_finite() || self.collecting_area_m2 <= 0.0 {
            return Err(SedError::InvalidParameter(format!(
                "Collecting area must be positive, got {}m²",
                self.collecting_area_m2
            )));
        }
        Ok(())
    }
}

impl Default for TelescopeParameters {
    fn default() -> Self {
        Self::gemini(MirrorCoating::Silver, IssPort::SideLooking)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_gemini_area() {
        let telescope = TelescopeParameters::default();
        assert_relative_eq!(telescope.collecting_area_m2, 50.74, max_relative = 1e-3);
        assert!(telescope.validate().is_ok());
    }

    #[test]
    fn test_area_defaults_when_missing() {
        let parsed: TelescopeParameters =
            serde_json::from_str(r#"{"coating":"aluminium","port":"up_looking"}"#).unwrap();
        assert_eq!(parsed.coating.file_key(), "al");
        assert_eq!(parsed.port.file_key(), "up");
        assert_relative_eq!(parsed.collecting_area_m2, gemini_collecting_area_m2());
    }

    #[test]
    fn test_invalid_area() {
        let mut telescope = TelescopeParameters::default();
        telescope.collecting_area_m2 = 0.0;
        assert!(matches!(
            telescope.validate(),
            Err(SedError::InvalidParameter(_))
        ));
    }
}
