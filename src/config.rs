//! Command-line interface definition.
//!
//! All file I/O lives at this layer: the CLI reads the input file into
//! memory, runs the requested operation through the library, and writes
//! result bytes back out. The library itself never opens file handles.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// dngpatch - inspect and patch raw CFA sensor pixels in TIFF/DNG files.
#[derive(Parser, Debug)]
#[command(name = "dngpatch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose (debug) logging.
    #[arg(short, long, global = true, env = "DNGPATCH_VERBOSE")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the directory structure and DNG metadata of a file.
    Info(InfoArgs),

    /// Export the raw CFA mosaic to a PNG, without demosaicing.
    Export(ExportArgs),

    /// Demosaic the raw data into a preview PNG.
    Demosaic(DemosaicArgs),

    /// Overwrite the value of one CFA pixel and save the file.
    Patch(PatchArgs),

    /// Show one CFA pixel and its same-color neighborhood.
    Pixel(PixelArgs),

    /// Reset every CFA pixel to fully black or fully white and save.
    Fill(FillArgs),
}

#[derive(Args, Debug)]
pub struct InfoArgs {
    /// The DNG/TIFF file to inspect.
    pub input: PathBuf,

    /// Emit machine-readable JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// The DNG/TIFF file to read.
    pub input: PathBuf,

    /// The PNG file to write.
    pub output: PathBuf,

    /// Render grayscale intensities instead of CFA-colorized pixels.
    #[arg(long)]
    pub grayscale: bool,
}

#[derive(Args, Debug)]
pub struct DemosaicArgs {
    /// The DNG/TIFF file to read.
    pub input: PathBuf,

    /// The PNG file to write.
    pub output: PathBuf,
}

#[derive(Args, Debug)]
pub struct PatchArgs {
    /// The DNG/TIFF file to patch.
    pub input: PathBuf,

    /// 0-based x coordinate of the pixel.
    pub x: u32,

    /// 0-based y coordinate of the pixel.
    pub y: u32,

    /// New intensity value (masked to the image's bit depth).
    pub value: u32,

    /// Where to write the patched file; defaults to in-place.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct PixelArgs {
    /// The DNG/TIFF file to inspect.
    pub input: PathBuf,

    /// 0-based x coordinate of the pixel.
    pub x: u32,

    /// 0-based y coordinate of the pixel.
    pub y: u32,
}

#[derive(Args, Debug)]
pub struct FillArgs {
    /// The DNG/TIFF file to modify.
    pub input: PathBuf,

    /// Fill with 0xFF (fully white) instead of 0x00.
    #[arg(long)]
    pub white: bool,

    /// Where to write the result; defaults to in-place.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

// =============================================================================
// Tests
// =============================================================================
