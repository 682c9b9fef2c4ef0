//! Evenly sampled spectra
//!
//! [`SampledSpectrum`] is the buffer every pipeline stage operates on: a run
//! of flux samples over a uniform wavelength grid. No wavelength array is
//! stored; sample `i` sits at `start + i * interval`.

use std::fmt::Write as _;
use std::io::Write;

use crate::algo::trap_integrate;
use crate::error::SedError;
use crate::stages::SpectrumStage;

/// Upper bound on the samples of one spectrum, 80 MB of flux
pub const MAX_SAMPLES: usize = 10_000_000;

/// Flux samples over a uniform wavelength grid (nanometers).
#[derive(Debug, Clone, PartialEq)]
pub struct SampledSpectrum {
    flux: Vec<f64>,
    start_nm: f64,
    interval_nm: f64,
}

impl SampledSpectrum {
    /// Create a spectrum from explicit flux samples
    ///
    /// # Arguments
    ///
    /// * `flux` - Flux samples, at least one
    /// * `start_nm` - Wavelength of the first sample
    /// * `interval_nm` - Spacing between samples, must be positive
    pub fn new(flux: Vec<f64>, start_nm: f64, interval_nm: f64) -> Result<Self, SedError> {
        if flux.is_empty() {
            return Err(SedError::InvalidParameter(
                "A sampled spectrum needs at least one sample".to_string(),
            ));
        }
        if !interval_nm.is_finite() || interval_nm <= 0.0 {
            return Err(SedError::InvalidParameter(format!(
                "Sample interval must be positive, got {interval_nm}"
            )));
        }
        if !start_nm.is_finite() {
            return Err(SedError::InvalidParameter(format!(
                "Start wavelength must be finite, got {start_nm}"
            )));
        }

        Ok(Self {
            flux,
            start_nm,
            interval_nm,
        })
    }

    /// Sample `f(λ)` over the half-open window `[start_nm, end_nm)`.
    ///
    /// The window holds `round((end - start) / interval)` samples.
    pub fn from_window<F>(
        start_nm: f64,
        end_nm: f64,
        interval_nm: f64,
        f: F,
    ) -> Result<Self, SedError>
    where
        F: Fn(f64) -> f64,
    {
        let count = window_sample_count(start_nm, end_nm, interval_nm)?;
        let flux = (0..count)
            .map(|i| f(start_nm + i as f64 * interval_nm))
            .collect();
        Self::new(flux, start_nm, interval_nm)
    }

    /// Wavelength of the first sample
    pub fn start(&self) -> f64 {
        self.start_nm
    }

    /// Wavelength of the last sample
    pub fn end(&self) -> f64 {
        self.wavelength(self.flux.len() - 1)
    }

    /// Spacing between samples
    pub fn interval(&self) -> f64 {
        self.interval_nm
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.flux.len()
    }

    /// Always false; a spectrum holds at least one sample
    pub fn is_empty(&self) -> bool {
        self.flux.is_empty()
    }

    pub fn flux(&self) -> &[f64] {
        &self.flux
    }

    /// Wavelength of sample `index`
    pub fn wavelength(&self, index: usize) -> f64 {
        self.start_nm + index as f64 * self.interval_nm
    }

    /// Iterator over (wavelength, flux) pairs
    pub fn samples(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.flux
            .iter()
            .enumerate()
            .map(|(i, &flux)| (self.wavelength(i), flux))
    }

    /// Linearly interpolated flux at a wavelength, 0.0 outside the grid
    pub fn value_at(&self, wavelength_nm: f64) -> f64 {
        if wavelength_nm < self.start() || wavelength_nm > self.end() {
            return 0.0;
        }

        let position = (wavelength_nm - self.start_nm) / self.interval_nm;
        let index = position.floor() as usize;
        if index + 1 >= self.flux.len() {
            return self.flux[self.flux.len() - 1];
        }

        let t = position - index as f64;
        self.flux[index] * (1.0 - t) + self.flux[index + 1] * t
    }

    /// Stretch the wavelength axis by `factor`, leaving the samples untouched
    pub fn rescale_wavelength(&mut self, factor: f64) {
        self.start_nm *= factor;
        self.interval_nm *= factor;
    }

    /// Multiply every sample by `factor`
    pub fn scale(&mut self, factor: f64) {
        self.flux.iter_mut().for_each(|flux| *flux *= factor);
    }

    /// Replace every sample with `f(wavelength, flux)`
    pub fn map_samples<F>(&mut self, f: F)
    where
        F: Fn(f64, f64) -> f64,
    {
        let (start, interval) = (self.start_nm, self.interval_nm);
        for (i, flux) in self.flux.iter_mut().enumerate() {
            *flux = f(start + i as f64 * interval, *flux);
        }
    }

    /// Trapezoid integral of flux over `[lower_nm, upper_nm]`
    ///
    /// The interval must lie inside the spectrum.
    pub fn integral(&self, lower_nm: f64, upper_nm: f64) -> Result<f64, SedError> {
        if lower_nm >= upper_nm {
            return Err(SedError::InvalidParameter(format!(
                "Integration range {lower_nm}..{upper_nm} is empty"
            )));
        }
        if lower_nm < self.start() || upper_nm > self.end() {
            return Err(SedError::OutOfRange(format!(
                "Range {lower_nm}..{upper_nm}nm lies outside spectrum {}..{}nm",
                self.start(),
                self.end()
            )));
        }

        // Band edges plus every grid point strictly between them
        let mut corners = vec![lower_nm];
        corners.extend(
            self.samples()
                .map(|(wavelength, _)| wavelength)
                .filter(|&wavelength| wavelength > lower_nm && wavelength < upper_nm),
        );
        corners.push(upper_nm);

        trap_integrate(&corners, |wavelength| self.value_at(wavelength))
            .map_err(|e| SedError::InvalidParameter(e.to_string()))
    }

    /// Mean flux over `[lower_nm, upper_nm]`
    pub fn average(&self, lower_nm: f64, upper_nm: f64) -> Result<f64, SedError> {
        Ok(self.integral(lower_nm, upper_nm)? / (upper_nm - lower_nm))
    }

    /// Sum of all samples
    pub fn sum(&self) -> f64 {
        self.flux.iter().sum()
    }

    /// Wavelength and flux of the brightest sample
    pub fn peak(&self) -> (f64, f64) {
        self.samples()
            .fold((self.start_nm, f64::NEG_INFINITY), |best, sample| {
                if sample.1 > best.1 {
                    sample
                } else {
                    best
                }
            })
    }

    /// Resample onto a new grid by linear interpolation; zero outside this spectrum
    pub fn resampled(
        &self,
        start_nm: f64,
        count: usize,
        interval_nm: f64,
    ) -> Result<SampledSpectrum, SedError> {
        let flux = (0..count)
            .map(|i| self.value_at(start_nm + i as f64 * interval_nm))
            .collect();
        SampledSpectrum::new(flux, start_nm, interval_nm)
    }

    /// Convert energy-density samples to photon-proportional samples
    ///
    /// Each sample is weighted by its own wavelength (N ∝ E·λ/hc).
    pub fn apply_wavelength_correction(&mut self) {
        self.map_samples(|wavelength, flux| flux * wavelength);
    }

    /// Apply a pipeline stage to this spectrum in place
    pub fn accept(&mut self, stage: &dyn SpectrumStage) -> Result<(), SedError> {
        log::debug!(
            "Applying {} to spectrum {:.3}..{:.3}nm ({} samples)",
            stage.name(),
            self.start(),
            self.end(),
            self.len()
        );
        stage.apply(self)
    }

    /// Render in the two-column tabulated format
    pub fn to_table(&self) -> String {
        let mut table = String::from("# wavelength (nm)  flux\n");
        for (wavelength, flux) in self.samples() {
            // Writing into a String cannot fail
            let _ = writeln!(table, "{wavelength:.6} {flux:.10e}");
        }
        table
    }

    /// Write the two-column tabulated format to `writer` and flush it
    pub fn write_table<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        writer.write_all(self.to_table().as_bytes())?;
        writer.flush()
    }
}

/// Number of samples covering the half-open window `[start_nm, end_nm)`
pub fn window_sample_count(start_nm: f64, end_nm: f64, interval_nm: f64) -> Result<usize, SedError> {
    if !interval_nm.is_finite() || interval_nm <= 0.0 {
        return Err(SedError::InvalidParameter(format!(
            "Sample interval must be positive, got {interval_nm}"
        )));
    }
    if !start_nm.is_finite() || !end_nm.is_finite() || start_nm >= end_nm {
        return Err(SedError::InvalidParameter(format!(
            "Invalid wavelength window {start_nm}..{end_nm}nm"
        )));
    }

    let count = checked_sample_count(((end_nm - start_nm) / interval_nm).round())?;
    if count == 0 {
        return Err(SedError::InvalidParameter(format!(
            "Window {start_nm}..{end_nm}nm is narrower than one {interval_nm}nm sample"
        )));
    }
    Ok(count)
}

/// Convert a computed sample count, rejecting grids beyond [`MAX_SAMPLES`]
pub fn checked_sample_count(count: f64) -> Result<usize, SedError> {
    if !count.is_finite() || count > MAX_SAMPLES as f64 {
        return Err(SedError::InvalidParameter(format!(
            "Grid of {count} samples exceeds the limit of {MAX_SAMPLES}"
        )));
    }
    Ok(count as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ramp() -> SampledSpectrum {
        // flux = wavelength / 100 over 400..=700nm at 1nm
        SampledSpectrum::from_window(400.0, 701.0, 1.0, |wl| wl / 100.0).unwrap()
    }

    #[test]
    fn test_grid_accessors() {
        let spectrum = ramp();
        assert_eq!(spectrum.len(), 301);
        assert_relative_eq!(spectrum.start(), 400.0);
        assert_relative_eq!(spectrum.end(), 700.0);
        assert_relative_eq!(spectrum.wavelength(150), 550.0);
    }

    #[test]
    fn test_window_is_half_open() {
        let spectrum = SampledSpectrum::from_window(400.0, 900.0, 1.0, |_| 1.0).unwrap();
        assert_eq!(spectrum.len(), 500);
        assert_relative_eq!(spectrum.end(), 899.0);
    }

    #[test]
    fn test_invalid_construction() {
        assert!(matches!(
            SampledSpectrum::new(vec![], 400.0, 1.0),
            Err(SedError::InvalidParameter(_))
        ));
        assert!(matches!(
            SampledSpectrum::new(vec![1.0], 400.0, 0.0),
            Err(SedError::InvalidParameter(_))
        ));
        assert!(matches!(
            SampledSpectrum::from_window(500.0, 400.0, 1.0, |_| 1.0),
            Err(SedError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_value_at_interpolates() {
        let spectrum = ramp();
        assert_relative_eq!(spectrum.value_at(450.5), 4.505, epsilon = 1e-12);
        assert_relative_eq!(spectrum.value_at(700.0), 7.0, epsilon = 1e-12);
        assert_eq!(spectrum.value_at(399.0), 0.0);
        assert_eq!(spectrum.value_at(700.5), 0.0);
    }

    #[test]
    fn test_integral_of_linear_flux() {
        let spectrum = ramp();
        // ∫ λ/100 dλ from 500 to 600 = (600² - 500²) / 200
        let integral = spectrum.integral(500.0, 600.0).unwrap();
        assert_relative_eq!(integral, 550.0, epsilon = 1e-9);

        // Off-grid bounds
        let integral = spectrum.integral(500.25, 600.75).unwrap();
        assert_relative_eq!(
            integral,
            (600.75f64.powi(2) - 500.25f64.powi(2)) / 200.0,
            epsilon = 1e-9
        );
        assert_relative_eq!(spectrum.average(500.0, 600.0).unwrap(), 5.5, epsilon = 1e-12);
    }

    #[test]
    fn test_integral_outside_spectrum() {
        let spectrum = ramp();
        assert!(matches!(
            spectrum.integral(300.0, 500.0),
            Err(SedError::OutOfRange(_))
        ));
        assert!(matches!(
            spectrum.integral(600.0, 800.0),
            Err(SedError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_rescale_wavelength_keeps_samples() {
        let mut spectrum = ramp();
        let sum = spectrum.sum();
        spectrum.rescale_wavelength(1.5);

        assert_relative_eq!(spectrum.start(), 600.0);
        assert_relative_eq!(spectrum.end(), 1050.0);
        assert_relative_eq!(spectrum.interval(), 1.5);
        assert_eq!(spectrum.sum(), sum);
    }

    #[test]
    fn test_peak() {
        let spectrum =
            SampledSpectrum::from_window(400.0, 500.0, 1.0, |wl| -(wl - 432.0).powi(2)).unwrap();
        let (wavelength, flux) = spectrum.peak();
        assert_relative_eq!(wavelength, 432.0);
        assert_relative_eq!(flux, 0.0);
    }

    #[test]
    fn test_resampled_is_zero_outside() {
        let spectrum = ramp();
        let resampled = spectrum.resampled(350.0, 100, 2.0).unwrap();
        assert_eq!(resampled.len(), 100);
        assert_eq!(resampled.flux()[0], 0.0);
        assert_relative_eq!(resampled.value_at(450.0), 4.5, epsilon = 1e-12);
    }

    #[test]
    fn test_wavelength_correction() {
        let mut spectrum = SampledSpectrum::new(vec![1.0, 1.0, 1.0], 500.0, 10.0).unwrap();
        spectrum.apply_wavelength_correction();
        assert_eq!(spectrum.flux(), &[500.0, 510.0, 520.0]);
    }

    #[test]
    fn test_to_table_lists_every_sample() {
        let spectrum = SampledSpectrum::new(vec![1.0, 2.0], 500.0, 0.5).unwrap();
        let table = spectrum.to_table();
        let rows: Vec<&str> = table.lines().filter(|l| !l.starts_with('#')).collect();
        assert_eq!(rows.len(), 2);
        assert!(rows[1].starts_with("500.500000"));
    }

    struct FullDevice;

    impl Write for FullDevice {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("no space left"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_table_surfaces_buffered_errors() {
        let spectrum = SampledSpectrum::new(vec![1.0, 2.0], 500.0, 0.5).unwrap();
        let result = spectrum.write_table(std::io::BufWriter::new(FullDevice));
        assert!(result.is_err());

        let mut out = Vec::new();
        spectrum.write_table(std::io::BufWriter::new(&mut out)).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), spectrum.to_table());
    }

    #[test]
    fn test_oversized_window_rejected() {
        assert!(matches!(
            SampledSpectrum::from_window(400.0, 800.0, 1e-13, |_| 1.0),
            Err(SedError::InvalidParameter(_))
        ));
        assert!(matches!(
            checked_sample_count(f64::INFINITY),
            Err(SedError::InvalidParameter(_))
        ));
        assert_eq!(checked_sample_count(MAX_SAMPLES as f64).unwrap(), MAX_SAMPLES);
    }
}
