//! Telescope throughput and thermal emission

use crate::conditions::{Site, SpectralBand};
use crate::error::SedError;
use crate::library::{telescope_background_path, telescope_transmission_path, DataLibrary};
use crate::photometry::{SampledSpectrum, TabulatedData, Transmission};
use crate::telescope::TelescopeParameters;

use super::SpectrumStage;

/// Mirror train throughput for a coating and port
#[derive(Debug, Clone)]
pub struct TelescopeTransmission {
    curve: Transmission,
}

impl TelescopeTransmission {
    pub fn new(curve: Transmission) -> Self {
        Self { curve }
    }

    pub fn load(
        library: &dyn DataLibrary,
        telescope: &TelescopeParameters,
    ) -> Result<Self, SedError> {
        let resource = telescope_transmission_path(telescope);
        let table = library.load_table(&resource)?;
        Ok(Self::new(Transmission::from_tabulated(&resource, &table)?))
    }

    pub fn curve(&self) -> &Transmission {
        &self.curve
    }
}

impl SpectrumStage for TelescopeTransmission {
    fn name(&self) -> &'static str {
        "telescope transmission"
    }

    fn apply(&self, spectrum: &mut SampledSpectrum) -> Result<(), SedError> {
        self.curve.apply_to(spectrum);
        Ok(())
    }
}

/// Additive thermal self-emission of the telescope
///
/// Emission is tabulated per m² like the sky, so it is added before the
/// aperture scaling.
#[derive(Debug, Clone)]
pub struct TelescopeBackground {
    emission: TabulatedData,
}

impl TelescopeBackground {
    pub fn new(emission: TabulatedData) -> Self {
        Self { emission }
    }

    pub fn load(
        library: &dyn DataLibrary,
        telescope: &TelescopeParameters,
        site: Site,
        band: SpectralBand,
    ) -> Result<Self, SedError> {
        let resource = telescope_background_path(telescope, site, band);
        Ok(Self::new(library.load_table(&resource)?))
    }
}

impl SpectrumStage for TelescopeBackground {
    fn name(&self) -> &'static str {
        "telescope background"
    }

    fn apply(&self, spectrum: &mut SampledSpectrum) -> Result<(), SedError> {
        spectrum.map_samples(|wavelength, flux| flux + self.emission.value_at(wavelength));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::MemoryLibrary;
    use crate::telescope::{IssPort, MirrorCoating};
    use approx::assert_relative_eq;

    #[test]
    fn test_transmission_by_coating_and_port() {
        let library = MemoryLibrary::new()
            .with("/HI-RES/telescope/ag_side.dat", "300 0.9\n3000 0.9\n")
            .with("/HI-RES/telescope/al_up.dat", "300 0.8\n3000 0.8\n");

        let silver = TelescopeTransmission::load(&library, &TelescopeParameters::default()).unwrap();
        let aluminium = TelescopeTransmission::load(
            &library,
            &TelescopeParameters::gemini(MirrorCoating::Aluminium, IssPort::UpLooking),
        )
        .unwrap();

        let mut spectrum = SampledSpectrum::from_window(400.0, 900.0, 1.0, |_| 1.0).unwrap();
        spectrum.accept(&silver).unwrap();
        spectrum.accept(&aluminium).unwrap();
        assert!(spectrum.flux().iter().all(|&f| (f - 0.72).abs() < 1e-12));
    }

    #[test]
    fn test_background_adds_emission() {
        let library = MemoryLibrary::new().with(
            "/HI-RES/cpnearIR/telescope_background/ag_side.dat",
            "1000 0.0\n2000 10.0\n",
        );
        let stage = TelescopeBackground::load(
            &library,
            &TelescopeParameters::default(),
            Site::GeminiSouth,
            SpectralBand::NearIr,
        )
        .unwrap();

        let mut sky = SampledSpectrum::from_window(500.0, 2500.0, 10.0, |_| 1.0).unwrap();
        sky.accept(&stage).unwrap();
        // Outside the tabulated range nothing is added
        assert_relative_eq!(sky.value_at(600.0), 1.0);
        assert_relative_eq!(sky.value_at(1500.0), 6.0);
        assert_relative_eq!(sky.value_at(2400.0), 1.0);
    }

    #[test]
    fn test_background_missing() {
        let library = MemoryLibrary::new();
        assert!(matches!(
            TelescopeBackground::load(
                &library,
                &TelescopeParameters::default(),
                Site::GeminiNorth,
                SpectralBand::MidIr,
            ),
            Err(SedError::MissingResource(_))
        ));
    }
}
