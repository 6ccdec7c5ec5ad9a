// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line definitions (clap derive).

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Quick Converter — local image, document and text tools.
#[derive(Parser, Debug)]
#[command(name = "quickconv")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Directory holding config.json (defaults to the user data directory)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resize an image to an exact size
    Resize(ResizeArgs),

    /// Re-encode an image smaller, fitting the long edge to the configured limit
    Compress(CompressArgs),

    /// Adjust brightness, contrast and saturation
    Enhance(EnhanceArgs),

    /// Crop a photo to a passport or visa preset
    Passport(PassportArgs),

    /// Rasterise an SVG document
    #[command(name = "svg-to-image")]
    SvgToImage(SvgToImageArgs),

    /// Wrap a raster image in an SVG container
    #[command(name = "image-to-svg")]
    ImageToSvg(InputArgs),

    /// Print an image as a base64 data URL
    #[command(name = "image-to-url")]
    ImageToUrl(ImageToUrlArgs),

    /// Combine images into a PDF, one per page
    #[command(name = "images-to-pdf")]
    ImagesToPdf(ImagesToPdfArgs),

    /// Export every page of a PDF as a JPEG
    #[command(name = "pdf-to-images")]
    PdfToImages(PdfToImagesArgs),

    /// Remove the background from a photo with the AI service
    #[command(name = "remove-bg")]
    RemoveBg(InputArgs),

    /// Hash text or a file
    Hash(HashArgs),

    /// Change the case of text
    Case(CaseArgs),

    /// Convert a colour between HEX, RGB and HSL
    Color(ColorArgs),
}

/// Where results are written.
#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Directory to save into; existing files are never overwritten
    #[arg(short = 'o', long = "out-dir", default_value = ".")]
    pub out_dir: PathBuf,

    /// File name stem for the result (defaults to one derived from the input)
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(Args, Debug)]
pub struct InputArgs {
    pub input: PathBuf,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
pub struct ResizeArgs {
    pub input: PathBuf,

    /// Target width (in --unit)
    #[arg(short = 'W', long)]
    pub width: Option<f64>,

    /// Target height (in --unit)
    #[arg(short = 'H', long)]
    pub height: Option<f64>,

    /// Unit for width and height: px, in, mm
    #[arg(long, default_value = "px")]
    pub unit: String,

    /// Resolution used for in and mm
    #[arg(long, default_value_t = 300.0)]
    pub dpi: f64,

    /// Allow width and height to change the aspect ratio
    #[arg(long)]
    pub no_keep_ratio: bool,

    /// Output format: jpeg, png, webp (defaults to the input's)
    #[arg(short = 'f', long)]
    pub format: Option<String>,

    /// Quality from 0 to 1
    #[arg(short = 'q', long)]
    pub quality: Option<f32>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
pub struct CompressArgs {
    pub input: PathBuf,

    /// Quality from 0 to 1
    #[arg(short = 'q', long, default_value_t = 0.7)]
    pub quality: f32,

    /// Output format: jpeg, png, webp (defaults to the input's)
    #[arg(short = 'f', long)]
    pub format: Option<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
pub struct EnhanceArgs {
    pub input: PathBuf,

    /// Brightness percentage (100 = unchanged)
    #[arg(long, default_value_t = 100.0)]
    pub brightness: f32,

    /// Contrast percentage (100 = unchanged)
    #[arg(long, default_value_t = 100.0)]
    pub contrast: f32,

    /// Saturation percentage (100 = unchanged)
    #[arg(long, default_value_t = 100.0)]
    pub saturation: f32,

    /// Quality from 0 to 1
    #[arg(short = 'q', long)]
    pub quality: Option<f32>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
pub struct PassportArgs {
    /// Photo to crop (omit with --list)
    #[arg(required_unless_present = "list")]
    pub input: Option<PathBuf>,

    /// Preset name, as shown by --list
    #[arg(short = 'p', long)]
    pub preset: Option<String>,

    /// Crop box in image pixels as x,y,width,height (defaults to centred)
    #[arg(long)]
    pub crop: Option<String>,

    /// Size of the preview the crop box was drawn on, as width,height
    #[arg(long, requires = "crop")]
    pub preview: Option<String>,

    /// List the built-in presets and exit
    #[arg(long)]
    pub list: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
pub struct SvgToImageArgs {
    pub input: PathBuf,

    /// Multiplier on the SVG's own size
    #[arg(short = 's', long)]
    pub scale: Option<f32>,

    /// Output format: jpeg, png, webp
    #[arg(short = 'f', long, default_value = "jpeg")]
    pub format: String,

    /// Leave the background transparent (PNG and WebP only)
    #[arg(long)]
    pub transparent: bool,

    /// Quality from 0 to 1
    #[arg(short = 'q', long, default_value_t = 0.9)]
    pub quality: f32,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
pub struct ImageToUrlArgs {
    pub input: PathBuf,
}

#[derive(Args, Debug)]
pub struct ImagesToPdfArgs {
    /// Images in page order
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Page size: a4, a3, a5, letter, legal, tabloid
    #[arg(long)]
    pub page_size: Option<String>,

    /// Landscape pages
    #[arg(long)]
    pub landscape: bool,

    /// Margin in millimetres
    #[arg(long)]
    pub margin: Option<f32>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
pub struct PdfToImagesArgs {
    pub input: PathBuf,

    /// Render scale relative to the page's natural size
    #[arg(short = 's', long, default_value_t = 1.5)]
    pub scale: f32,

    /// JPEG quality from 0 to 1
    #[arg(short = 'q', long, default_value_t = 0.9)]
    pub quality: f32,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
pub struct HashArgs {
    /// Text to hash
    #[arg(conflicts_with = "file", required_unless_present = "file")]
    pub text: Option<String>,

    /// Hash a file's bytes instead of text
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// SHA-1, SHA-256 or SHA-512
    #[arg(short = 'a', long, default_value = "SHA-256")]
    pub algorithm: String,
}

#[derive(Args, Debug)]
pub struct CaseArgs {
    /// upper, lower, sentence, title or toggle
    pub mode: String,

    pub text: String,
}

#[derive(Args, Debug)]
pub struct ColorArgs {
    /// A HEX colour such as #3a7bd5
    #[arg(long, conflicts_with_all = ["rgb", "hsl"], required_unless_present_any = ["rgb", "hsl"])]
    pub hex: Option<String>,

    /// RGB as r,g,b
    #[arg(long, conflicts_with = "hsl")]
    pub rgb: Option<String>,

    /// HSL as h,s,l
    #[arg(long)]
    pub hsl: Option<String>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}
