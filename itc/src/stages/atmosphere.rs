//! Atmospheric extinction stages

use crate::conditions::{CloudCover, ObservingConditions, Site, SpectralBand};
use crate::error::SedError;
use crate::library::{water_transmission_path, DataLibrary};
use crate::photometry::{SampledSpectrum, Transmission};

use super::SpectrumStage;

/// Grey cloud extinction for a cloud cover percentile
#[derive(Debug, Clone, Copy)]
pub struct CloudTransmission {
    cloud_cover: CloudCover,
}

impl CloudTransmission {
    pub fn new(cloud_cover: CloudCover) -> Self {
        Self { cloud_cover }
    }

    pub fn factor(&self) -> f64 {
        self.cloud_cover.transmission()
    }
}

impl SpectrumStage for CloudTransmission {
    fn name(&self) -> &'static str {
        "cloud transmission"
    }

    fn apply(&self, spectrum: &mut SampledSpectrum) -> Result<(), SedError> {
        spectrum.scale(self.factor());
        Ok(())
    }
}

/// Water vapor absorption from a tabulated transmission curve
#[derive(Debug, Clone)]
pub struct WaterTransmission {
    curve: Transmission,
}

impl WaterTransmission {
    pub fn new(curve: Transmission) -> Self {
        Self { curve }
    }

    /// Load the curve for the water vapor and airmass buckets of
    /// `conditions` at a site and band
    pub fn load(
        library: &dyn DataLibrary,
        conditions: &ObservingConditions,
        band: SpectralBand,
        site: Site,
    ) -> Result<Self, SedError> {
        let resource = water_transmission_path(site, band, conditions);
        let table = library.load_table(&resource)?;
        Ok(Self::new(Transmission::from_tabulated(&resource, &table)?))
    }

    pub fn curve(&self) -> &Transmission {
        &self.curve
    }
}

impl SpectrumStage for WaterTransmission {
    fn name(&self) -> &'static str {
        "water transmission"
    }

    fn apply(&self, spectrum: &mut SampledSpectrum) -> Result<(), SedError> {
        self.curve.apply_to(spectrum);
        Ok(())
    }
}
