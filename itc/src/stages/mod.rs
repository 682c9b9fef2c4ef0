//! Transformation stages applied to sampled spectra
//!
//! Each stage reads its parameters at construction time and then adjusts a
//! spectrum in place over its existing grid. Stages hold no reference to
//! anything they were applied to, so one instance can be applied to the
//! source and the sky in turn.

pub mod aperture;
pub mod atmosphere;
pub mod normalize;
pub mod redshift;
pub mod telescope;

pub use aperture::TelescopeAperture;
pub use atmosphere::{CloudTransmission, WaterTransmission};
pub use normalize::Normalize;
pub use redshift::Redshift;
pub use telescope::{TelescopeBackground, TelescopeTransmission};

use crate::error::SedError;
use crate::photometry::SampledSpectrum;

/// A single-purpose operation over a sampled spectrum
pub trait SpectrumStage: Send + Sync {
    /// Short label for logging
    fn name(&self) -> &'static str;

    /// Adjust `spectrum` in place
    fn apply(&self, spectrum: &mut SampledSpectrum) -> Result<(), SedError>;
}
