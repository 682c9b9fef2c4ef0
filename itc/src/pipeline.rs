//! Source and sky spectral energy distributions seen through the telescope
//!
//! [`SedPipeline::calculate`] builds the source spectrum and the sky
//! background spectrum for one observation and carries both through the
//! atmosphere, the telescope and the instrument. Each call owns its two
//! buffers outright and runs the two chains side by side on the rayon pool;
//! the pipeline itself only holds a shared reference to the data library,
//! so one pipeline can serve many threads.

use serde::{Deserialize, Serialize};

use crate::conditions::{ObservingConditions, Site, SpectralBand};
use crate::error::SedError;
use crate::instrument::{Instrument, InstrumentFamily};
use crate::library::{library_sed_path, sky_background_path, DataLibrary};
use crate::photometry::{
    BlackbodySpectrum, EmissionLineSpectrum, PowerLawSpectrum, SampledSpectrum,
};
use crate::source::{Distribution, SourceDefinition};
use crate::stages::{
    CloudTransmission, Normalize, Redshift, SpectrumStage, TelescopeAperture,
    TelescopeBackground, TelescopeTransmission, WaterTransmission,
};
use crate::telescope::TelescopeParameters;

/// Wavelength limits requested for plotting the result
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PlotLimits {
    /// Plot the full observing window
    Auto,
    /// Plot `[lower_nm, upper_nm]`
    User { lower_nm: f64, upper_nm: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotParameters {
    pub limits: PlotLimits,
}

impl PlotParameters {
    pub fn auto() -> Self {
        Self {
            limits: PlotLimits::Auto,
        }
    }

    pub fn user(lower_nm: f64, upper_nm: f64) -> Self {
        Self {
            limits: PlotLimits::User { lower_nm, upper_nm },
        }
    }

    /// Fail unless user limits overlap `[start_nm, end_nm]`
    pub fn check_overlap(&self, start_nm: f64, end_nm: f64) -> Result<(), SedError> {
        let PlotLimits::User { lower_nm, upper_nm } = self.limits else {
            return Ok(());
        };

        if lower_nm.is_nan() || upper_nm.is_nan() || lower_nm >= upper_nm {
            return Err(SedError::InvalidParameter(format!(
                "Plot limits {lower_nm}..{upper_nm}nm are empty"
            )));
        }
        if upper_nm < start_nm || lower_nm > end_nm {
            return Err(SedError::OutOfRange(format!(
                "Plot limits {lower_nm}..{upper_nm}nm do not overlap the observing range {start_nm}..{end_nm}nm"
            )));
        }
        Ok(())
    }
}

/// Signal and background spectra on the instrument grid, photons s⁻¹ nm⁻¹
#[derive(Debug, Clone, PartialEq)]
pub struct SourceResult {
    signal: SampledSpectrum,
    background: SampledSpectrum,
}

impl SourceResult {
    pub fn signal(&self) -> &SampledSpectrum {
        &self.signal
    }

    pub fn background(&self) -> &SampledSpectrum {
        &self.background
    }

    pub fn into_parts(self) -> (SampledSpectrum, SampledSpectrum) {
        (self.signal, self.background)
    }
}

/// Apply `stages` in order, stopping at the first failure
fn run_stages(
    spectrum: &mut SampledSpectrum,
    stages: &[&dyn SpectrumStage],
) -> Result<(), SedError> {
    for stage in stages {
        spectrum.accept(*stage)?;
    }
    Ok(())
}

/// Inputs and stages shared by the source and sky chains of one calculation
struct ChainContext<'c> {
    instrument: &'c dyn Instrument,
    site: Site,
    band: SpectralBand,
    conditions: &'c ObservingConditions,
    telescope: &'c TelescopeParameters,
    aperture: TelescopeAperture,
    telescope_transmission: TelescopeTransmission,
}

/// Driver for the source and sky background chains
#[derive(Clone, Copy)]
pub struct SedPipeline<'a> {
    library: &'a dyn DataLibrary,
}

impl<'a> SedPipeline<'a> {
    pub fn new(library: &'a dyn DataLibrary) -> Self {
        Self { library }
    }

    /// Raw, un-normalized source spectrum for an instrument
    pub fn sed_for_instrument(
        &self,
        source: &SourceDefinition,
        instrument: &dyn Instrument,
    ) -> Result<SampledSpectrum, SedError> {
        self.sed_for_window(
            source,
            instrument.sampling(),
            instrument.observing_start(),
            instrument.observing_end(),
        )
    }

    /// Raw, un-normalized source spectrum for an explicit sampling and
    /// observing window
    ///
    /// Analytic shapes are sampled over the window moved to the rest frame,
    /// so the redshift stage lands them back on the requested grid.
    /// Tabulated shapes are resampled over their own range and converted
    /// from energy to photon density.
    pub fn sed_for_window(
        &self,
        source: &SourceDefinition,
        sampling_nm: f64,
        start_nm: f64,
        end_nm: f64,
    ) -> Result<SampledSpectrum, SedError> {
        source.validate()?;
        let stretch = 1.0 + source.redshift;
        let (rest_start, rest_end, rest_interval) =
            (start_nm / stretch, end_nm / stretch, sampling_nm / stretch);

        let mut spectrum = match &source.distribution {
            Distribution::Blackbody { temperature_k } => BlackbodySpectrum::new(*temperature_k)?
                .sampled(rest_start, rest_end, rest_interval),
            Distribution::EmissionLine {
                wavelength_nm,
                width_km_s,
                line_flux,
                line_flux_unit,
                continuum,
                continuum_unit,
            } => EmissionLineSpectrum::new(
                *wavelength_nm,
                *width_km_s,
                *line_flux,
                *line_flux_unit,
                *continuum,
                *continuum_unit,
            )?
            .sampled(rest_start, rest_end, rest_interval),
            Distribution::PowerLaw { index } => {
                PowerLawSpectrum::new(*index)?.sampled(rest_start, rest_end, rest_interval)
            }
            Distribution::Library { name } => self
                .library
                .load_table(&library_sed_path(name))?
                .to_sampled(sampling_nm),
            Distribution::UserDefined {
                resource,
                interval_nm,
            } => {
                let table = self.library.load_user_table(resource)?;
                let interval = interval_nm
                    .or(table.declared_interval())
                    .unwrap_or(sampling_nm);
                table.to_sampled(interval)
            }
        }?;

        if source.distribution.is_tabulated() {
            spectrum.apply_wavelength_correction();
        }
        Ok(spectrum)
    }

    /// Raw sky background for an instrument family, band, site and
    /// conditions, sampled at `sampling_nm`
    pub fn sky_background(
        &self,
        family: InstrumentFamily,
        band: SpectralBand,
        site: Site,
        conditions: &ObservingConditions,
        sampling_nm: f64,
    ) -> Result<SampledSpectrum, SedError> {
        let resource = sky_background_path(family, band, site, conditions);
        self.library.load_table(&resource)?.to_sampled(sampling_nm)
    }

    /// Compute the signal and background spectra for one observation
    ///
    /// # Errors
    ///
    /// * `OutOfRange` - the redshifted spectrum does not cover the
    ///   normalization band, or the plot limits miss the observing range
    /// * `MalformedData` - a tabulated resource failed to parse
    /// * `MissingResource` - a referenced resource does not exist
    /// * `InvalidParameter` - a scalar input is outside its domain
    #[allow(clippy::too_many_arguments)]
    pub fn calculate(
        &self,
        instrument: &dyn Instrument,
        site: Site,
        band: SpectralBand,
        source: &SourceDefinition,
        conditions: &ObservingConditions,
        telescope: &TelescopeParameters,
        plot: Option<&PlotParameters>,
    ) -> Result<SourceResult, SedError> {
        log::info!(
            "Calculating SED for {} ({:?}) at {site}, {band} band",
            instrument.name(),
            instrument.family()
        );
        source.validate()?;
        conditions.validate()?;
        telescope.validate()?;

        // Coverage and plot failures are reported before any telescope or
        // sky resource is touched
        let signal = self.prepared_source(instrument, source, plot)?;

        let context = ChainContext {
            instrument,
            site,
            band,
            conditions,
            telescope,
            aperture: TelescopeAperture::new(telescope.collecting_area_m2)?,
            telescope_transmission: TelescopeTransmission::load(self.library, telescope)?,
        };

        // The two chains share nothing mutable; a source failure is reported
        // ahead of a sky failure
        let (signal, background) = rayon::join(
            || self.signal_chain(&context, signal),
            || self.background_chain(&context),
        );
        let (signal, background) = (signal?, background?);

        log::info!(
            "SED complete: {} signal samples, {} background samples from {:.3}nm",
            signal.len(),
            background.len(),
            signal.start()
        );

        Ok(SourceResult { signal, background })
    }

    /// Raw source spectrum, redshifted, checked against the normalization
    /// band and plot limits, then normalized
    fn prepared_source(
        &self,
        instrument: &dyn Instrument,
        source: &SourceDefinition,
        plot: Option<&PlotParameters>,
    ) -> Result<SampledSpectrum, SedError> {
        let mut signal = self.sed_for_instrument(source, instrument)?;

        signal.accept(&Redshift::new(source.redshift)?)?;

        if source.distribution.has_normalization_band() {
            let norm = &source.norm_band;
            if norm.start_nm < signal.start() || norm.end_nm > signal.end() {
                return Err(SedError::OutOfRange(format!(
                    "Shifted spectrum ({:.3}..{:.3}nm) does not cover normalization band {} ({}..{}nm)",
                    signal.start(),
                    signal.end(),
                    norm.name,
                    norm.start_nm,
                    norm.end_nm
                )));
            }
        }

        if let Some(plot) = plot {
            plot.check_overlap(instrument.observing_start(), instrument.observing_end())?;
        }

        if source.distribution.is_normalized() {
            signal.accept(&Normalize::new(
                source.norm_band.clone(),
                source.normalization,
                source.units,
            )?)?;
        }
        Ok(signal)
    }

    fn signal_chain(
        &self,
        context: &ChainContext<'_>,
        mut signal: SampledSpectrum,
    ) -> Result<SampledSpectrum, SedError> {
        let instrument = context.instrument;
        let family = instrument.family();

        // Flamingos-2 reference outputs were produced with the Gemini North
        // water curves whatever the requested site
        let water_site = if family == InstrumentFamily::Flamingos2 {
            if context.site != Site::GeminiNorth {
                log::warn!(
                    "{family:?} uses {} water transmission instead of {}",
                    Site::GeminiNorth,
                    context.site
                );
            }
            Site::GeminiNorth
        } else {
            context.site
        };
        let water =
            WaterTransmission::load(self.library, context.conditions, context.band, water_site)?;

        run_stages(
            &mut signal,
            &[
                &context.aperture,
                &CloudTransmission::new(context.conditions.cloud_cover),
                &water,
                &context.telescope_transmission,
            ],
        )?;
        instrument.convolve_components(&mut signal)?;
        Ok(signal)
    }

    fn background_chain(&self, context: &ChainContext<'_>) -> Result<SampledSpectrum, SedError> {
        let instrument = context.instrument;
        let family = instrument.family();
        let mut background = self.sky_background(
            family,
            context.band,
            context.site,
            context.conditions,
            instrument.sampling(),
        )?;

        if family.background_before_transmission() {
            // Flamingos-2 thermal emission always comes from the Gemini
            // South near-IR tables
            let telescope_background = TelescopeBackground::load(
                self.library,
                context.telescope,
                Site::GeminiSouth,
                SpectralBand::NearIr,
            )?;
            run_stages(
                &mut background,
                &[
                    &telescope_background,
                    &context.telescope_transmission,
                    &context.aperture,
                ],
            )?;
        } else {
            let telescope_background = TelescopeBackground::load(
                self.library,
                context.telescope,
                context.site,
                context.band,
            )?;
            run_stages(
                &mut background,
                &[
                    &context.telescope_transmission,
                    &telescope_background,
                    &context.aperture,
                ],
            )?;
        }

        instrument.add_background(&mut background)?;
        instrument.convolve_components(&mut background)?;
        Ok(background)
    }
}
