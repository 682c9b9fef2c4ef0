//! Compute source and sky background spectra for an observation request
//!
//! Reads a JSON request naming the source, conditions, telescope and
//! instrument, runs the SED pipeline against a data library on disk, and
//! optionally writes the two result spectra as two-column tables.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use clap::Parser;
use itc::{DirectoryLibrary, PipelineRequest, SampledSpectrum};

#[derive(Parser, Debug)]
#[command(
    name = "SED Calculator",
    about = "Computes signal and sky background spectra on an instrument grid",
    long_about = None
)]
struct Args {
    /// JSON request file
    #[arg(long)]
    request: PathBuf,

    /// Data library root (defaults to $ITC_DATA_DIR, then ./data)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Directory to write signal.dat and background.dat into
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Print sample counts, wavelength range and peak of each spectrum
    #[arg(long)]
    summary: bool,
}

fn print_summary(label: &str, spectrum: &SampledSpectrum) {
    let (peak_wavelength, peak_flux) = spectrum.peak();
    println!(
        "{:<12} {:>8} samples  {:>10.3}..{:<10.3}nm  peak {:.4e} at {:.3}nm  total {:.4e}",
        label,
        spectrum.len(),
        spectrum.start(),
        spectrum.end(),
        peak_flux,
        peak_wavelength,
        spectrum.sum() * spectrum.interval()
    );
}

fn write_spectrum(path: PathBuf, spectrum: &SampledSpectrum) -> std::io::Result<()> {
    log::info!("Writing {}", path.display());
    spectrum.write_table(BufWriter::new(File::create(path)?))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let library = match args.data_dir {
        Some(dir) => DirectoryLibrary::with_path(dir),
        None => DirectoryLibrary::from_env(),
    };
    log::info!("Using data library at {}", library.root_path().display());

    let request = PipelineRequest::load_from_file(&args.request)?;
    let result = request.run(&library)?;

    if args.summary {
        println!(
            "{} ({:?}) at {}, {} band",
            request.instrument.name, request.instrument.family, request.site, request.band
        );
        print_summary("Signal", result.signal());
        print_summary("Background", result.background());
    }

    if let Some(dir) = args.output_dir {
        std::fs::create_dir_all(&dir)?;
        write_spectrum(dir.join("signal.dat"), result.signal())?;
        write_spectrum(dir.join("background.dat"), result.background())?;
    }

    Ok(())
}
