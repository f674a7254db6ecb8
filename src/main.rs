//! dngpatch - inspect and patch raw CFA sensor pixels in TIFF/DNG files.
//!
//! This binary is the file-I/O glue around the library: it loads the
//! input into memory, runs the requested operation, and writes result
//! bytes back to disk.

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use dngpatch::{
    demosaic_to_png, pixel_report, raw_to_png, Cli, Command, DemosaicArgs, ExportArgs, FileInfo,
    FillArgs, InfoArgs, PatchArgs, PixelArgs, TiffFile,
};

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Info(args) => run_info(args),
        Command::Export(args) => run_export(args),
        Command::Demosaic(args) => run_demosaic(args),
        Command::Patch(args) => run_patch(args),
        Command::Pixel(args) => run_pixel(args),
        Command::Fill(args) => run_fill(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Initialize tracing with an env-filter; `-v` raises the default level
/// to debug, `RUST_LOG` overrides everything.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Read and parse a DNG/TIFF file.
fn load(path: &Path) -> Result<TiffFile, Box<dyn std::error::Error>> {
    let bytes = fs::read(path)?;
    info!(path = %path.display(), size = bytes.len(), "loaded file");
    Ok(TiffFile::parse(bytes)?)
}

// =============================================================================
// Commands
// =============================================================================

fn run_info(args: InfoArgs) -> CliResult {
    let file = load(&args.input)?;
    let summary = FileInfo::from_file(&file);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{summary}");
    }
    Ok(())
}

fn run_export(args: ExportArgs) -> CliResult {
    let file = load(&args.input)?;
    let index = file
        .first_cfa_directory()
        .ok_or("no CFA raw data found in file")?;
    let layout = file.cfa_layout(index)?;
    let grid = layout.pixel_grid(file.buffer())?;

    let png = raw_to_png(&grid, &layout, args.grayscale)?;
    fs::write(&args.output, png)?;
    info!(path = %args.output.display(), "wrote raw PNG");
    Ok(())
}

fn run_demosaic(args: DemosaicArgs) -> CliResult {
    let file = load(&args.input)?;
    let index = file
        .first_cfa_directory()
        .ok_or("no CFA raw data found in file")?;
    let layout = file.cfa_layout(index)?;
    let grid = layout.pixel_grid(file.buffer())?;

    let png = demosaic_to_png(&grid, &layout)?;
    fs::write(&args.output, png)?;
    info!(path = %args.output.display(), "wrote demosaiced PNG");
    Ok(())
}

fn run_patch(args: PatchArgs) -> CliResult {
    let mut file = load(&args.input)?;
    let index = file
        .first_cfa_directory()
        .ok_or("no CFA raw data found in file")?;
    let layout = file.cfa_layout(index)?;

    let before = layout.pixel(file.buffer(), args.x, args.y)?;
    layout.set_pixel(file.buffer_mut(), args.x, args.y, args.value)?;
    let after = layout.pixel(file.buffer(), args.x, args.y)?;
    info!(x = args.x, y = args.y, before, after, "patched pixel");

    let output = args.output.as_deref().unwrap_or(&args.input);
    fs::write(output, file.as_bytes())?;
    info!(path = %output.display(), "saved file");
    Ok(())
}

fn run_pixel(args: PixelArgs) -> CliResult {
    let file = load(&args.input)?;
    let index = file
        .first_cfa_directory()
        .ok_or("no CFA raw data found in file")?;
    let layout = file.cfa_layout(index)?;

    let report = pixel_report(&layout, file.buffer(), args.x, args.y)?;
    println!("{report}");
    Ok(())
}

fn run_fill(args: FillArgs) -> CliResult {
    let mut file = load(&args.input)?;
    let index = file
        .first_cfa_directory()
        .ok_or("no CFA raw data found in file")?;
    let layout = file.cfa_layout(index)?;

    layout.fill(file.buffer_mut(), args.white)?;
    info!(white = args.white, "reset all CFA pixels");

    let output = args.output.as_deref().unwrap_or(&args.input);
    fs::write(output, file.as_bytes())?;
    info!(path = %output.display(), "saved file");
    Ok(())
}
