//! Instrument capabilities consumed by the pipeline
//!
//! The pipeline needs four things from an instrument: its sampling grid,
//! its observing window, its own background emission, and the response of
//! its optical components. Detector geometry, read modes and overheads
//! live elsewhere.

use serde::{Deserialize, Serialize};

use crate::error::SedError;
use crate::photometry::sampled::window_sample_count;
use crate::photometry::{SampledSpectrum, TabulatedData, Transmission};

/// Physical instrument families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstrumentFamily {
    Gmos,
    Gnirs,
    Michelle,
    Trecs,
    Nifs,
    Niri,
    Flamingos2,
}

impl InstrumentFamily {
    /// Reads the single near-IR sky library regardless of site and band
    pub fn uses_near_ir_background_lookup(&self) -> bool {
        matches!(self, InstrumentFamily::Flamingos2)
    }

    /// Telescope thermal emission is added before telescope transmission
    pub fn background_before_transmission(&self) -> bool {
        matches!(self, InstrumentFamily::Flamingos2)
    }
}

/// Instrument behavior the SED pipeline depends on
pub trait Instrument: Send + Sync {
    fn name(&self) -> &str;

    fn family(&self) -> InstrumentFamily;

    /// Sample spacing in nm
    fn sampling(&self) -> f64;

    /// Lower edge of the observing window in nm
    fn observing_start(&self) -> f64;

    /// Upper edge of the observing window in nm (exclusive)
    fn observing_end(&self) -> f64;

    /// Add the instrument's own emission to the sky background
    fn add_background(&self, sky: &mut SampledSpectrum) -> Result<(), SedError>;

    /// Bring a spectrum onto the instrument grid and apply the
    /// filter/grating/detector response
    fn convolve_components(&self, spectrum: &mut SampledSpectrum) -> Result<(), SedError>;
}

/// Instrument assembled from tabulated component curves
///
/// Serves every family: the family only selects pipeline branches, the
/// component list carries the optical configuration.
#[derive(Debug, Clone)]
pub struct ConfiguredInstrument {
    name: String,
    family: InstrumentFamily,
    sampling_nm: f64,
    observing_start_nm: f64,
    observing_end_nm: f64,
    components: Vec<Transmission>,
    background: Option<TabulatedData>,
}

impl ConfiguredInstrument {
    pub fn new(
        name: impl Into<String>,
        family: InstrumentFamily,
        sampling_nm: f64,
        observing_start_nm: f64,
        observing_end_nm: f64,
    ) -> Result<Self, SedError> {
        if observing_start_nm <= 0.0 {
            return Err(SedError::InvalidParameter(format!(
                "Observing window must start above 0nm, got {observing_start_nm}"
            )));
        }
        // Validates sampling and window ordering
        window_sample_count(observing_start_nm, observing_end_nm, sampling_nm)?;

        Ok(Self {
            name: name.into(),
            family,
            sampling_nm,
            observing_start_nm,
            observing_end_nm,
            components: Vec::new(),
            background: None,
        })
    }

    /// Add a filter, grating or detector response
    pub fn with_component(mut self, component: Transmission) -> Self {
        self.components.push(component);
        self
    }

    /// Set the instrument's additive background emission
    pub fn with_background(mut self, background: TabulatedData) -> Self {
        self.background = Some(background);
        self
    }

    pub fn components(&self) -> &[Transmission] {
        &self.components
    }

    /// Number of samples on the instrument grid
    pub fn sample_count(&self) -> usize {
        ((self.observing_end_nm - self.observing_start_nm) / self.sampling_nm).round() as usize
    }
}

impl Instrument for ConfiguredInstrument {
    fn name(&self) -> &str {
        &self.name
    }

    fn family(&self) -> InstrumentFamily {
        self.family
    }

    fn sampling(&self) -> f64 {
        self.sampling_nm
    }

    fn observing_start(&self) -> f64 {
        self.observing_start_nm
    }

    fn observing_end(&self) -> f64 {
        self.observing_end_nm
    }

    fn add_background(&self, sky: &mut SampledSpectrum) -> Result<(), SedError> {
        if let Some(background) = &self.background {
            sky.map_samples(|wavelength, flux| flux + background.value_at(wavelength));
        }
        Ok(())
    }

    fn convolve_components(&self, spectrum: &mut SampledSpectrum) -> Result<(), SedError> {
        let mut on_grid =
            spectrum.resampled(self.observing_start_nm, self.sample_count(), self.sampling_nm)?;
        for component in &self.components {
            component.apply_to(&mut on_grid);
        }
        *spectrum = on_grid;
        Ok(())
    }
}
