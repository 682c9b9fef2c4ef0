//! Two-column tabulated spectra
//!
//! Rows hold a wavelength in nm and a value in arbitrary units, separated by
//! whitespace or commas. Lines starting with `#` are comments. User supplied
//! files may open with a single value giving their sampling interval in nm:
//!
//! ```text
//! # Wavelength sampling size in nm
//! 0.5
//! # The data, wavelengths are in nm, flux units unknown
//!  115.0  0.181751
//!  115.5  0.203323
//!  116.0  0.142062
//! ```

use crate::algo::interp_or_zero;
use crate::error::SedError;

use super::sampled::{checked_sample_count, SampledSpectrum};

/// Guards against `floor` dropping the last row when the span is an exact
/// multiple of the interval but rounds a hair below it.
const GRID_EPSILON: f64 = 1e-9;

/// Parsed (wavelength, value) rows with strictly ascending wavelengths.
#[derive(Debug, Clone, PartialEq)]
pub struct TabulatedData {
    wavelengths: Vec<f64>,
    values: Vec<f64>,
    declared_interval: Option<f64>,
}

impl TabulatedData {
    /// Parse a library or background table.
    ///
    /// `resource` only labels errors.
    pub fn parse(resource: &str, text: &str) -> Result<Self, SedError> {
        Self::parse_rows(resource, text, false)
    }

    /// Parse a user supplied table, which may declare its sampling interval
    /// on the first non-comment line.
    pub fn parse_user(resource: &str, text: &str) -> Result<Self, SedError> {
        Self::parse_rows(resource, text, true)
    }

    /// Build from explicit columns
    pub fn from_columns(
        resource: &str,
        wavelengths: Vec<f64>,
        values: Vec<f64>,
    ) -> Result<Self, SedError> {
        if wavelengths.len() != values.len() {
            return Err(SedError::malformed(
                resource,
                0,
                "wavelength and value columns differ in length",
            ));
        }
        if wavelengths.len() < 2 {
            return Err(SedError::malformed(
                resource,
                0,
                "a table needs at least two rows",
            ));
        }
        if let Some(i) = wavelengths.windows(2).position(|pair| pair[1] <= pair[0]) {
            return Err(SedError::malformed(
                resource,
                i + 2,
                format!(
                    "wavelengths must ascend, {} follows {}",
                    wavelengths[i + 1],
                    wavelengths[i]
                ),
            ));
        }

        Ok(Self {
            wavelengths,
            values,
            declared_interval: None,
        })
    }

    fn parse_rows(resource: &str, text: &str, allow_interval: bool) -> Result<Self, SedError> {
        let mut wavelengths = Vec::new();
        let mut values = Vec::new();
        let mut declared_interval = None;
        let mut first_row = true;
        let mut last_line = 0;

        for (index, raw) in text.lines().enumerate() {
            let line_number = index + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            last_line = line_number;

            let fields: Vec<&str> = line
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|field| !field.is_empty())
                .collect();

            let numbers = fields
                .iter()
                .map(|field| field.parse::<f64>())
                .collect::<Result<Vec<f64>, _>>()
                .map_err(|e| {
                    SedError::malformed(resource, line_number, format!("{e}: {line:?}"))
                })?;

            match numbers.as_slice() {
                [interval] if allow_interval && first_row => {
                    if !interval.is_finite() || *interval <= 0.0 {
                        return Err(SedError::malformed(
                            resource,
                            line_number,
                            format!("sampling interval must be positive, got {interval}"),
                        ));
                    }
                    declared_interval = Some(*interval);
                }
                [wavelength, value] => {
                    wavelengths.push(*wavelength);
                    values.push(*value);
                }
                _ => {
                    return Err(SedError::malformed(
                        resource,
                        line_number,
                        format!("expected two numeric fields, found {}", numbers.len()),
                    ));
                }
            }
            first_row = false;
        }

        let mut data = Self::from_columns(resource, wavelengths, values).map_err(|e| match e {
            SedError::MalformedData {
                resource,
                line: 0,
                reason,
            } => SedError::MalformedData {
                resource,
                line: last_line,
                reason,
            },
            other => other,
        })?;
        data.declared_interval = declared_interval;
        Ok(data)
    }

    pub fn wavelengths(&self) -> &[f64] {
        &self.wavelengths
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Sampling interval declared by a user file header, if any
    pub fn declared_interval(&self) -> Option<f64> {
        self.declared_interval
    }

    /// First tabulated wavelength
    pub fn start(&self) -> f64 {
        self.wavelengths[0]
    }

    /// Last tabulated wavelength
    pub fn end(&self) -> f64 {
        self.wavelengths[self.wavelengths.len() - 1]
    }

    /// Linearly interpolated value, 0.0 outside the table
    pub fn value_at(&self, wavelength_nm: f64) -> f64 {
        interp_or_zero(wavelength_nm, &self.wavelengths, &self.values)
    }

    /// Resample onto a uniform grid from the first tabulated wavelength,
    /// covering the table inclusively at `interval_nm`.
    pub fn to_sampled(&self, interval_nm: f64) -> Result<SampledSpectrum, SedError> {
        if !interval_nm.is_finite() || interval_nm <= 0.0 {
            return Err(SedError::InvalidParameter(format!(
                "Sample interval must be positive, got {interval_nm}"
            )));
        }

        let start = self.start();
        let count =
            checked_sample_count(((self.end() - start) / interval_nm + GRID_EPSILON).floor())? + 1;
        let flux = (0..count)
            .map(|i| self.value_at(start + i as f64 * interval_nm))
            .collect();
        SampledSpectrum::new(flux, start, interval_nm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_whitespace_and_commas() {
        let text = "# comment\n400.0 1.0\n401.0,2.0\n\n402.0 ,  3.0\n";
        let data = TabulatedData::parse("test", text).unwrap();
        assert_eq!(data.wavelengths(), &[400.0, 401.0, 402.0]);
        assert_eq!(data.values(), &[1.0, 2.0, 3.0]);
        assert_eq!(data.declared_interval(), None);
    }

    #[test]
    fn test_parse_user_interval() {
        let text = "# Wavelength sampling size in nm\n0.5\n# data\n115.0 0.181751\n115.5 0.203323\n116.0 0.142062\n";
        let data = TabulatedData::parse_user("user", text).unwrap();
        assert_eq!(data.declared_interval(), Some(0.5));
        assert_eq!(data.wavelengths().len(), 3);
    }

    #[test]
    fn test_interval_line_rejected_for_library_files() {
        let text = "0.5\n115.0 0.18\n115.5 0.20\n";
        let err = TabulatedData::parse("library", text).unwrap_err();
        assert!(matches!(err, SedError::MalformedData { line: 1, .. }));
    }

    #[test]
    fn test_unparsable_row() {
        let text = "400.0 1.0\n401.0 abc\n402.0 3.0\n";
        let err = TabulatedData::parse("bad", text).unwrap_err();
        match err {
            SedError::MalformedData { resource, line, .. } => {
                assert_eq!(resource, "bad");
                assert_eq!(line, 2);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_three_columns_rejected() {
        let text = "400.0 1.0 7.0\n401.0 2.0\n";
        assert!(matches!(
            TabulatedData::parse("bad", text),
            Err(SedError::MalformedData { line: 1, .. })
        ));
    }

    #[test]
    fn test_descending_rows_rejected() {
        let text = "400.0 1.0\n399.0 2.0\n";
        assert!(matches!(
            TabulatedData::parse("bad", text),
            Err(SedError::MalformedData { .. })
        ));
    }

    #[test]
    fn test_too_few_rows() {
        assert!(matches!(
            TabulatedData::parse("empty", "# nothing\n"),
            Err(SedError::MalformedData { .. })
        ));
    }

    #[test]
    fn test_to_sampled_covers_table() {
        let data = TabulatedData::parse("t", "400 0\n410 10\n").unwrap();
        let spectrum = data.to_sampled(0.5).unwrap();
        assert_eq!(spectrum.len(), 21);
        assert_relative_eq!(spectrum.end(), 410.0);
        assert_relative_eq!(spectrum.flux()[3], 1.5, epsilon = 1e-12);
    }

    #[test]
    fn test_tiny_declared_interval_rejected() {
        let data = TabulatedData::parse_user("user", "1e-13\n400 1\n800 1\n").unwrap();
        assert_eq!(data.declared_interval(), Some(1e-13));
        assert!(matches!(
            data.to_sampled(1e-13),
            Err(SedError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_table_round_trip() {
        let original =
            SampledSpectrum::from_window(600.0, 700.0, 0.25, |wl| (wl / 40.0).sin() + 2.0)
                .unwrap();
        let data = TabulatedData::parse("round-trip", &original.to_table()).unwrap();
        let restored = data.to_sampled(original.interval()).unwrap();

        assert_eq!(restored.len(), original.len());
        assert_relative_eq!(restored.start(), original.start());
        for (a, b) in original.flux().iter().zip(restored.flux()) {
            assert_relative_eq!(*a, *b, max_relative = 1e-9);
        }
    }
}
