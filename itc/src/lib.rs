//! Spectral energy distributions for integration time calculations
//!
//! Builds the source and sky background spectra seen by an instrument on a
//! Gemini telescope: an analytic or tabulated source shape is redshifted,
//! normalized and carried through clouds, water vapor, the telescope and
//! the instrument optics, while the sky emission follows a parallel chain
//! through the telescope into the instrument.

pub mod algo;
pub mod conditions;
pub mod config;
pub mod error;
pub mod instrument;
pub mod library;
pub mod photometry;
pub mod pipeline;
pub mod source;
pub mod stages;
pub mod telescope;

pub use conditions::{ObservingConditions, Site, SpectralBand};
pub use config::PipelineRequest;
pub use error::SedError;
pub use instrument::{ConfiguredInstrument, Instrument, InstrumentFamily};
pub use library::{DataLibrary, DirectoryLibrary, MemoryLibrary};
pub use photometry::SampledSpectrum;
pub use pipeline::{PlotParameters, SedPipeline, SourceResult};
pub use source::{Distribution, SourceDefinition};
pub use telescope::TelescopeParameters;
