//! JSON request documents naming every input of a pipeline run

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::conditions::{ObservingConditions, Site, SpectralBand};
use crate::error::SedError;
use crate::instrument::{ConfiguredInstrument, InstrumentFamily};
use crate::library::DataLibrary;
use crate::photometry::Transmission;
use crate::pipeline::{PlotParameters, SedPipeline, SourceResult};
use crate::source::SourceDefinition;
use crate::telescope::TelescopeParameters;

/// Instrument description in a request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentConfig {
    pub name: String,
    pub family: InstrumentFamily,
    pub sampling_nm: f64,
    pub observing_start_nm: f64,
    pub observing_end_nm: f64,

    /// Filter, grating and detector throughput resources, applied in order
    #[serde(default)]
    pub components: Vec<String>,

    /// Additive instrument emission resource
    #[serde(default)]
    pub background: Option<String>,
}

/// One complete SED calculation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineRequest {
    pub site: Site,

    /// Spectral band tag: "visible", "nearIR" or "midIR"
    pub band: String,

    pub source: SourceDefinition,
    pub conditions: ObservingConditions,

    #[serde(default)]
    pub telescope: TelescopeParameters,

    pub instrument: InstrumentConfig,

    #[serde(default)]
    pub plot: Option<PlotParameters>,
}

impl PipelineRequest {
    /// Parsed spectral band
    pub fn band(&self) -> Result<SpectralBand, SedError> {
        self.band.parse()
    }

    /// Check every scalar field and the band tag
    pub fn validate(&self) -> Result<(), SedError> {
        self.band()?;
        self.source.validate()?;
        self.conditions.validate()?;
        self.telescope.validate()
    }

    /// Assemble the instrument, loading component curves from `library`
    pub fn build_instrument(
        &self,
        library: &dyn DataLibrary,
    ) -> Result<ConfiguredInstrument, SedError> {
        let config = &self.instrument;
        let mut instrument = ConfiguredInstrument::new(
            config.name.clone(),
            config.family,
            config.sampling_nm,
            config.observing_start_nm,
            config.observing_end_nm,
        )?;

        for resource in &config.components {
            let table = library.load_table(resource)?;
            instrument =
                instrument.with_component(Transmission::from_tabulated(resource, &table)?);
        }
        if let Some(resource) = &config.background {
            instrument = instrument.with_background(library.load_table(resource)?);
        }

        Ok(instrument)
    }

    /// Run the pipeline for this request against `library`
    pub fn run(&self, library: &dyn DataLibrary) -> Result<SourceResult, SedError> {
        self.validate()?;
        let instrument = self.build_instrument(library)?;
        SedPipeline::new(library).calculate(
            &instrument,
            self.site,
            self.band()?,
            &self.source,
            &self.conditions,
            &self.telescope,
            self.plot.as_ref(),
        )
    }

    /// Save to JSON file
    pub fn save_to_file(&self, path: &Path) -> Result<(), std::io::Error> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, json)
    }

    /// Load from JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, SedError> {
        let resource = path.display().to_string();
        let json = std::fs::read_to_string(path).map_err(|source| match source.kind() {
            std::io::ErrorKind::NotFound => SedError::MissingResource(resource.clone()),
            _ => SedError::Io {
                resource: resource.clone(),
                source,
            },
        })?;
        serde_json::from_str(&json)
            .map_err(|e| SedError::malformed(&resource, e.line(), e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditions::{CloudCover, SkyBackground, WaterVapor};
    use crate::instrument::Instrument;
    use crate::library::MemoryLibrary;
    use crate::photometry::{BrightnessUnit, Waveband};
    use crate::source::Distribution;

    fn request() -> PipelineRequest {
        PipelineRequest {
            site: Site::GeminiSouth,
            band: "nearIR".to_string(),
            source: SourceDefinition::new(
                Distribution::PowerLaw { index: -2.0 },
                0.1,
                Waveband::standard("H").unwrap(),
                18.0,
                BrightnessUnit::VegaMagnitude,
            )
            .unwrap(),
            conditions: ObservingConditions::new(
                CloudCover::Percent70,
                WaterVapor::Percent80,
                SkyBackground::Any,
                1.3,
            )
            .unwrap(),
            telescope: TelescopeParameters {
                collecting_area_m2: 50.0,
                ..TelescopeParameters::default()
            },
            instrument: InstrumentConfig {
                name: "GNIRS".to_string(),
                family: InstrumentFamily::Gnirs,
                sampling_nm: 0.5,
                observing_start_nm: 1000.0,
                observing_end_nm: 2500.0,
                components: vec!["/instruments/gnirs/h_filter.dat".to_string()],
                background: None,
            },
            plot: Some(PlotParameters::user(1400.0, 1900.0)),
        }
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("request.json");

        let original = request();
        original.save_to_file(&path).unwrap();
        let loaded = PipelineRequest::load_from_file(&path).unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("request.json");
        assert!(matches!(
            PipelineRequest::load_from_file(&path),
            Err(SedError::MissingResource(_))
        ));

        std::fs::write(&path, "{\n  \"site\": \"GN\",\n  oops\n}").unwrap();
        assert!(matches!(
            PipelineRequest::load_from_file(&path),
            Err(SedError::MalformedData { line: 3, .. })
        ));
    }

    #[test]
    fn test_unknown_band_tag() {
        let mut bad = request();
        bad.band = "ultraviolet".to_string();
        assert!(matches!(bad.validate(), Err(SedError::UnsupportedBand(_))));
    }

    #[test]
    fn test_build_instrument() {
        let library = MemoryLibrary::new().with(
            "/instruments/gnirs/h_filter.dat",
            "1400 0.0\n1500 0.9\n1800 0.9\n1900 0.0\n",
        );
        let instrument = request().build_instrument(&library).unwrap();
        assert_eq!(instrument.name(), "GNIRS");
        assert_eq!(instrument.components().len(), 1);
        assert_eq!(instrument.sample_count(), 3000);

        let empty = MemoryLibrary::new();
        assert!(matches!(
            request().build_instrument(&empty),
            Err(SedError::MissingResource(_))
        ));
    }
}
