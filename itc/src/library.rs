//! Data library access and resource path construction
//!
//! Tabulated SEDs, sky backgrounds and transmission curves are addressed by
//! slash-separated resource names such as
//! `/HI-RES/mknearIR/sky_emiss/nearIR_skybg_2_15.dat`. A [`DataLibrary`]
//! resolves those names to file contents; the pipeline never touches the
//! filesystem directly.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::conditions::{ObservingConditions, Site, SpectralBand};
use crate::error::SedError;
use crate::instrument::InstrumentFamily;
use crate::photometry::TabulatedData;
use crate::telescope::TelescopeParameters;

/// Environment variable naming the data library root
pub const DATA_DIR_ENV: &str = "ITC_DATA_DIR";

pub const HI_RES: &str = "/HI-RES";
pub const SKY_BACKGROUND_LIB: &str = "/sky_emiss";
pub const OPTICAL_SKY_BACKGROUND_FILENAME_BASE: &str = "optical_sky_background";
pub const NEAR_IR_SKY_BACKGROUND_FILENAME_BASE: &str = "nearIR_skybg";
pub const MID_IR_SKY_BACKGROUND_FILENAME_BASE: &str = "midIR_skybg";
pub const SED_LIB: &str = "/sed";
pub const SED_SUFFIX: &str = ".nm";
pub const DATA_SUFFIX: &str = ".dat";

/// Source of tabulated resources
pub trait DataLibrary: Send + Sync {
    /// Read the full text of a resource
    fn read(&self, resource: &str) -> Result<String, SedError>;

    /// Read and parse a two-column table
    fn load_table(&self, resource: &str) -> Result<TabulatedData, SedError> {
        log::debug!("Loading table {resource}");
        TabulatedData::parse(resource, &self.read(resource)?)
    }

    /// Read and parse a user supplied table (optional interval header)
    fn load_user_table(&self, resource: &str) -> Result<TabulatedData, SedError> {
        log::debug!("Loading user table {resource}");
        TabulatedData::parse_user(resource, &self.read(resource)?)
    }
}

/// Resource names are rooted at the library; a leading slash is optional
fn relative_name(resource: &str) -> &str {
    resource.trim_start_matches('/')
}

/// Data library rooted at a directory on disk
#[derive(Debug, Clone)]
pub struct DirectoryLibrary {
    root_path: PathBuf,
}

impl DirectoryLibrary {
    /// Create a library with a custom root path
    pub fn with_path(root_path: impl Into<PathBuf>) -> Self {
        Self {
            root_path: root_path.into(),
        }
    }

    /// Root from `ITC_DATA_DIR`, or `./data` when unset
    pub fn from_env() -> Self {
        let root = std::env::var_os(DATA_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("data"));
        Self::with_path(root)
    }

    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    /// Filesystem path a resource name resolves to
    pub fn resolve(&self, resource: &str) -> PathBuf {
        self.root_path.join(relative_name(resource))
    }
}

impl DataLibrary for DirectoryLibrary {
    fn read(&self, resource: &str) -> Result<String, SedError> {
        let path = self.resolve(resource);
        std::fs::read_to_string(&path).map_err(|source| match source.kind() {
            std::io::ErrorKind::NotFound => {
                SedError::MissingResource(format!("{resource} ({})", path.display()))
            }
            _ => SedError::Io {
                resource: resource.to_string(),
                source,
            },
        })
    }
}

/// In-memory data library, for embedding callers and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryLibrary {
    entries: HashMap<String, String>,
}

impl MemoryLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a resource
    pub fn insert(&mut self, resource: &str, contents: impl Into<String>) {
        self.entries
            .insert(relative_name(resource).to_string(), contents.into());
    }

    /// Builder form of [`MemoryLibrary::insert`]
    pub fn with(mut self, resource: &str, contents: impl Into<String>) -> Self {
        self.insert(resource, contents);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl DataLibrary for MemoryLibrary {
    fn read(&self, resource: &str) -> Result<String, SedError> {
        self.entries
            .get(relative_name(resource))
            .cloned()
            .ok_or_else(|| SedError::MissingResource(resource.to_string()))
    }
}

/// Prefix of the water transmission files for a band
pub fn water_transmission_prefix(band: SpectralBand) -> &'static str {
    match band {
        SpectralBand::Visible => "skytrans_",
        SpectralBand::NearIr => "nearIR_trans_",
        SpectralBand::MidIr => "midIR_trans_",
    }
}

/// Directory holding per-site, per-band high resolution data
fn site_band_dir(site: Site, band: SpectralBand) -> String {
    format!("{HI_RES}/{}{}", site.directory(), band.tag())
}

/// Atmospheric water transmission curve
pub fn water_transmission_path(
    site: Site,
    band: SpectralBand,
    conditions: &ObservingConditions,
) -> String {
    format!(
        "{}/transmission/{}{}_{}{DATA_SUFFIX}",
        site_band_dir(site, band),
        water_transmission_prefix(band),
        conditions.sky_transparency_water_category(),
        conditions.airmass_category(),
    )
}

/// Telescope throughput for a coating and port
pub fn telescope_transmission_path(telescope: &TelescopeParameters) -> String {
    format!(
        "{HI_RES}/telescope/{}_{}{DATA_SUFFIX}",
        telescope.coating.file_key(),
        telescope.port.file_key(),
    )
}

/// Telescope thermal emission for a coating and port at a site and band
pub fn telescope_background_path(
    telescope: &TelescopeParameters,
    site: Site,
    band: SpectralBand,
) -> String {
    format!(
        "{}/telescope_background/{}_{}{DATA_SUFFIX}",
        site_band_dir(site, band),
        telescope.coating.file_key(),
        telescope.port.file_key(),
    )
}

/// Library SED by name
pub fn library_sed_path(name: &str) -> String {
    format!("{SED_LIB}/{name}{SED_SUFFIX}")
}

/// Sky background file for an instrument family, band, site and conditions
///
/// Flamingos-2 reads a single near-IR library that is not split by site;
/// every other family uses the band-specific libraries.
pub fn sky_background_path(
    family: InstrumentFamily,
    band: SpectralBand,
    site: Site,
    conditions: &ObservingConditions,
) -> String {
    let water = conditions.sky_transparency_water_category();
    let airmass = conditions.airmass_category();

    if family.uses_near_ir_background_lookup() {
        return format!(
            "{SKY_BACKGROUND_LIB}/{NEAR_IR_SKY_BACKGROUND_FILENAME_BASE}_{water}_{airmass}{DATA_SUFFIX}"
        );
    }

    match band {
        SpectralBand::Visible => format!(
            "{SKY_BACKGROUND_LIB}/{OPTICAL_SKY_BACKGROUND_FILENAME_BASE}_{}_{airmass}{DATA_SUFFIX}",
            conditions.sky_background_category(),
        ),
        SpectralBand::NearIr => format!(
            "{}{SKY_BACKGROUND_LIB}/{NEAR_IR_SKY_BACKGROUND_FILENAME_BASE}_{water}_{airmass}{DATA_SUFFIX}",
            site_band_dir(site, band),
        ),
        SpectralBand::MidIr => format!(
            "{}{SKY_BACKGROUND_LIB}/{MID_IR_SKY_BACKGROUND_FILENAME_BASE}_{water}_{airmass}{DATA_SUFFIX}",
            site_band_dir(site, band),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditions::{CloudCover, SkyBackground, WaterVapor};
    use crate::telescope::{IssPort, MirrorCoating};

    fn conditions() -> ObservingConditions {
        ObservingConditions::new(
            CloudCover::Percent50,
            WaterVapor::Percent50,
            SkyBackground::Percent80,
            1.5,
        )
        .unwrap()
    }

    #[test]
    fn test_sky_paths_by_band() {
        let c = conditions();
        assert_eq!(
            sky_background_path(InstrumentFamily::Gmos, SpectralBand::Visible, Site::GeminiNorth, &c),
            "/sky_emiss/optical_sky_background_3_15.dat"
        );
        assert_eq!(
            sky_background_path(InstrumentFamily::Gnirs, SpectralBand::NearIr, Site::GeminiNorth, &c),
            "/HI-RES/mknearIR/sky_emiss/nearIR_skybg_2_15.dat"
        );
        assert_eq!(
            sky_background_path(InstrumentFamily::Michelle, SpectralBand::MidIr, Site::GeminiSouth, &c),
            "/HI-RES/cpmidIR/sky_emiss/midIR_skybg_2_15.dat"
        );
    }

    #[test]
    fn test_flamingos2_sky_path_ignores_site_and_band() {
        let c = conditions();
        let north = sky_background_path(
            InstrumentFamily::Flamingos2,
            SpectralBand::NearIr,
            Site::GeminiNorth,
            &c,
        );
        let south = sky_background_path(
            InstrumentFamily::Flamingos2,
            SpectralBand::Visible,
            Site::GeminiSouth,
            &c,
        );
        assert_eq!(north, "/sky_emiss/nearIR_skybg_2_15.dat");
        assert_eq!(north, south);
    }

    #[test]
    fn test_transmission_paths() {
        let c = conditions();
        assert_eq!(
            water_transmission_path(Site::GeminiSouth, SpectralBand::Visible, &c),
            "/HI-RES/cpvisible/transmission/skytrans_2_15.dat"
        );
        let telescope = TelescopeParameters::gemini(MirrorCoating::Aluminium, IssPort::UpLooking);
        assert_eq!(
            telescope_transmission_path(&telescope),
            "/HI-RES/telescope/al_up.dat"
        );
        assert_eq!(
            telescope_background_path(&telescope, Site::GeminiNorth, SpectralBand::MidIr),
            "/HI-RES/mkmidIR/telescope_background/al_up.dat"
        );
        assert_eq!(library_sed_path("KOIII"), "/sed/KOIII.nm");
    }

    #[test]
    fn test_memory_library() {
        let library = MemoryLibrary::new().with("/sed/flat.nm", "400 1\n500 1\n");
        assert_eq!(library.len(), 1);
        assert!(library.load_table("sed/flat.nm").is_ok());
        assert!(matches!(
            library.read("/sed/missing.nm"),
            Err(SedError::MissingResource(_))
        ));
    }

    #[test]
    fn test_directory_library() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("sed")).unwrap();
        std::fs::write(dir.path().join("sed/flat.nm"), "400 1\n500 1\n").unwrap();

        let library = DirectoryLibrary::with_path(dir.path());
        let table = library.load_table(&library_sed_path("flat")).unwrap();
        assert_eq!(table.wavelengths(), &[400.0, 500.0]);

        assert!(matches!(
            library.read(&library_sed_path("absent")),
            Err(SedError::MissingResource(_))
        ));
    }
}
