//! Spectrum models, physical source shapes and unit conversions

pub mod blackbody;
pub mod emission_line;
pub mod power_law;
pub mod response;
pub mod sampled;
pub mod spectrum;
pub mod tabulated;
pub mod units;

pub use blackbody::BlackbodySpectrum;
pub use emission_line::EmissionLineSpectrum;
pub use power_law::PowerLawSpectrum;
pub use response::Transmission;
pub use sampled::SampledSpectrum;
pub use spectrum::{photon_energy_joules, Waveband, CGS, SI};
pub use tabulated::TabulatedData;
pub use units::{BrightnessUnit, ContinuumUnit, LineFluxUnit};
