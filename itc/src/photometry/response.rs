//! Throughput curves for atmosphere, telescope and instrument components

use crate::error::SedError;

use super::sampled::SampledSpectrum;
use super::spectrum::Waveband;
use super::tabulated::TabulatedData;

/// Fractional throughput (0.0 to 1.0) as a function of wavelength
///
/// Stores wavelength-throughput pairs and linearly interpolates between
/// them. Outside the tabulated range the throughput is 0.0.
#[derive(Debug, Clone)]
pub struct Transmission {
    /// Wavelengths in nanometers (nm)
    wavelengths: Vec<f64>,

    /// Throughput values (0.0 to 1.0) corresponding to each wavelength
    throughputs: Vec<f64>,
}

impl Transmission {
    /// Create a top-hat transmission over `band`
    ///
    /// # Arguments
    ///
    /// * `band` - Band that the notch applies to
    /// * `throughput` - Throughput value (0.0 to 1.0) inside the notch
    pub fn from_notch(band: &Waveband, throughput: f64) -> Result<Self, SedError> {
        // Small compared to any filter edge we model, large enough not to
        // vanish into the ULPs of a wavelength in nm
        let smol = 1e-8;

        let wavelengths = vec![
            band.start_nm - smol,
            band.start_nm,
            band.end_nm,
            band.end_nm + smol,
        ];
        let throughputs = vec![0.0, throughput, throughput, 0.0];

        Self::from_table(wavelengths, throughputs)
    }

    /// Create a transmission from wavelength and throughput tables
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if:
    /// - The vectors have different lengths or fewer than two points
    /// - Wavelengths are not in ascending order
    /// - Any throughput is outside the range [0.0, 1.0]
    pub fn from_table(wavelengths: Vec<f64>, throughputs: Vec<f64>) -> Result<Self, SedError> {
        if wavelengths.len() != throughputs.len() || wavelengths.len() < 2 {
            return Err(SedError::InvalidParameter(
                "Transmission needs matching wavelength and throughput columns of at least two points"
                    .to_string(),
            ));
        }

        if wavelengths.windows(2).any(|pair| pair[1] <= pair[0]) {
            return Err(SedError::InvalidParameter(
                "Transmission wavelengths must be in ascending order".to_string(),
            ));
        }

        if let Some(bad) = throughputs.iter().find(|t| !(0.0..=1.0).contains(*t)) {
            return Err(SedError::InvalidParameter(format!(
                "Throughput values must be between 0.0 and 1.0, got {bad}"
            )));
        }

        Ok(Self {
            wavelengths,
            throughputs,
        })
    }

    /// Create a transmission from a parsed tabulated resource
    pub fn from_tabulated(resource: &str, data: &TabulatedData) -> Result<Self, SedError> {
        if let Some((i, bad)) = data
            .values()
            .iter()
            .enumerate()
            .find(|(_, t)| !(0.0..=1.0).contains(*t))
        {
            return Err(SedError::malformed(
                resource,
                i + 1,
                format!("throughput {bad} at {}nm is outside 0..1", data.wavelengths()[i]),
            ));
        }

        Self::from_table(data.wavelengths().to_vec(), data.values().to_vec())
    }

    /// Wavelength-independent transmission over the whole positive axis
    pub fn flat(throughput: f64) -> Result<Self, SedError> {
        Self::from_table(vec![0.0, f64::MAX], vec![throughput, throughput])
    }

    /// Throughput at a specific wavelength, 0.0 outside the defined range
    pub fn at(&self, wavelength: f64) -> f64 {
        crate::algo::interp_or_zero(wavelength, &self.wavelengths, &self.throughputs)
    }

    /// Multiply every sample of `spectrum` by the throughput at its wavelength
    pub fn apply_to(&self, spectrum: &mut SampledSpectrum) {
        spectrum.map_samples(|wavelength, flux| flux * self.at(wavelength));
    }
}
