//! Command-line front end: inpaint one PNG or every masked PNG in a directory
//!
//! Inputs come in pairs: `<stem>.png` and its mask `<stem>_mask.png`, where any
//! non-zero mask pixel is filled. The result is written to `<stem>_result.png`
//! next to the input.

use clap::{Parser, ValueEnum};
use ndarray::Array2;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

use crate::algorithm::executor::{ExemplarInpainter, InpaintConfig};
use crate::algorithm::marching::inpaint_fast_marching;
use crate::io::configuration::{
    DEFAULT_MAX_THRESH, DEFAULT_RADIUS, DEFAULT_WINDOW, GREY_LEVELS, MASK_SUFFIX, OUTPUT_SUFFIX,
};
use crate::io::error::{InpaintError, Result, invalid_parameter};
use crate::io::image::{export_grayscale, load_grayscale, load_mask};
use crate::io::progress::ProgressManager;
use crate::spatial::padding::{crop_padding, pad_for_window};

/// Inpainting engine
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Method {
    /// Copy best-matching patches, strongest structure first
    Exemplar,
    /// Diffuse known intensities inward in order of distance
    FastMarching,
}

/// Fill masked regions of grayscale images from their own texture
#[derive(Parser, Debug)]
#[command(name = "patchfill", author, version, about)]
pub struct Cli {
    /// PNG image or directory of images; each needs a `<stem>_mask.png` beside it
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Patch width for the exemplar engine
    #[arg(short, long, default_value_t = DEFAULT_WINDOW)]
    pub window: usize,

    /// Masked SSD at or below which a source patch is taken without further search
    #[arg(short = 't', long, default_value_t = DEFAULT_MAX_THRESH)]
    pub max_thresh: f64,

    /// Engine used to fill the mask
    #[arg(short, long, value_enum, default_value_t = Method::Exemplar)]
    pub method: Method,

    /// Neighbourhood radius for the fast-marching engine
    #[arg(short, long, default_value_t = DEFAULT_RADIUS)]
    pub radius: usize,

    /// Hide progress bars and skip notices
    #[arg(short, long)]
    pub quiet: bool,

    /// Overwrite results that already exist
    #[arg(short, long)]
    pub no_skip: bool,
}

impl Cli {
    /// Whether inputs with an existing result are left alone
    pub const fn skip_existing(&self) -> bool {
        !self.no_skip
    }

    /// Whether progress bars are drawn
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Exemplar engine parameters from the arguments
    pub const fn inpaint_config(&self) -> InpaintConfig {
        InpaintConfig {
            window: self.window,
            max_thresh: self.max_thresh,
        }
    }
}

/// Runs the selected engine over every input the target names
pub struct FileProcessor {
    cli: Cli,
    progress: Option<ProgressManager>,
}

impl FileProcessor {
    /// Processor for parsed arguments
    pub fn new(cli: Cli) -> Self {
        let progress = cli.should_show_progress().then(ProgressManager::new);
        Self { cli, progress }
    }

    /// Inpaint every selected input and write its result
    ///
    /// Engine parameters are checked before any file is touched. Processing
    /// stops at the first failing file.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters are invalid, the target cannot be
    /// read, or any input fails to load, inpaint or save
    pub fn process(&mut self) -> Result<()> {
        self.cli.inpaint_config().validate()?;
        if self.cli.radius == 0 {
            return Err(invalid_parameter("radius", &0, &"must be positive"));
        }

        let inputs = self.collect_files()?;
        if inputs.is_empty() {
            return Ok(());
        }

        if let Some(progress) = self.progress.as_mut() {
            progress.initialize(inputs.len());
        }
        for (index, input) in inputs.iter().enumerate() {
            self.process_file(input, index)?;
        }
        if let Some(progress) = &self.progress {
            progress.finish();
        }

        Ok(())
    }

    /// Inputs selected by the target, sorted by path
    ///
    /// A directory contributes every PNG that has a mask and is not itself a
    /// mask or a result. Inputs whose result already exists are dropped unless
    /// skipping is disabled.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The target is neither a PNG file nor a directory
    /// - A single-file target has no mask
    /// - The directory cannot be listed
    pub fn collect_files(&self) -> Result<Vec<PathBuf>> {
        let target = &self.cli.target;

        let mut inputs = if target.is_file() {
            Self::single_input(target)?
        } else if target.is_dir() {
            Self::directory_inputs(target)?
        } else {
            return Err(invalid_parameter(
                "target",
                &target.display(),
                &"must be a PNG file or a directory",
            ));
        };

        inputs.retain(|input| self.needs_processing(input));
        inputs.sort();
        Ok(inputs)
    }

    fn single_input(target: &Path) -> Result<Vec<PathBuf>> {
        if !is_png(target) {
            return Err(invalid_parameter(
                "target",
                &target.display(),
                &"must be a PNG image",
            ));
        }

        let expected = Self::get_mask_path(target);
        if expected.exists() {
            Ok(vec![target.to_path_buf()])
        } else {
            Err(InpaintError::MissingMask {
                image: target.to_path_buf(),
                expected,
            })
        }
    }

    fn directory_inputs(dir: &Path) -> Result<Vec<PathBuf>> {
        let entries = std::fs::read_dir(dir).map_err(|source| InpaintError::FileSystem {
            path: dir.to_path_buf(),
            operation: "read directory",
            source,
        })?;

        let mut inputs = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if is_png(&path) && !is_derived_file(&path) && Self::get_mask_path(&path).exists() {
                inputs.push(path);
            }
        }
        Ok(inputs)
    }

    fn needs_processing(&self, input: &Path) -> bool {
        if !self.cli.skip_existing() || !Self::get_output_path(input).exists() {
            return true;
        }

        // Skip notices are user feedback, not diagnostics
        #[allow(clippy::print_stderr)]
        if !self.cli.quiet {
            eprintln!("Skipping {}: result already exists", input.display());
        }
        false
    }

    fn process_file(&self, input: &Path, index: usize) -> Result<()> {
        let started = Instant::now();
        let output = Self::get_output_path(input);

        let image = load_grayscale(input)?;
        let mask = load_mask(Self::get_mask_path(input))?;
        let unknown = mask.iter().filter(|&&m| m).count();

        if let Some(progress) = &self.progress {
            progress.start_file(index, input, unknown);
        }

        let filled = match self.cli.method {
            Method::Exemplar => self.exemplar(&image, &mask, index)?,
            Method::FastMarching => self.fast_marching(&image, &mask)?,
        };
        export_grayscale(&filled, &output)?;

        if let Some(progress) = &self.progress {
            progress.complete_file(index);
        }

        info!(
            input = %input.display(),
            output = %output.display(),
            method = ?self.cli.method,
            unknown,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "file inpainted"
        );
        Ok(())
    }

    fn exemplar(
        &self,
        image: &Array2<f64>,
        mask: &Array2<bool>,
        index: usize,
    ) -> Result<Array2<f64>> {
        let config = self.cli.inpaint_config();
        let (padded_image, padded_mask) = pad_for_window(image, mask, config.window)?;

        let mut inpainter = ExemplarInpainter::new(padded_image, padded_mask, config)?;
        if let Some(bar) = self.progress.as_ref().and_then(|p| p.file_bar(index)) {
            inpainter = inpainter.with_progress(Box::new(move |filled: usize, _total: usize| {
                bar.set_position(filled as u64);
            }));
        }

        let padded = inpainter.run()?;
        crop_padding(&padded, config.window, image.dim())
    }

    /// Runs on grey levels so the gradient correction keeps its scale
    fn fast_marching(&self, image: &Array2<f64>, mask: &Array2<bool>) -> Result<Array2<f64>> {
        let levels = image.mapv(|v| v * GREY_LEVELS);
        let filled = inpaint_fast_marching(&levels, mask, self.cli.radius)?;
        Ok(filled.mapv(|v| v / GREY_LEVELS))
    }

    /// Mask file expected beside an input
    pub fn get_mask_path(input: &Path) -> PathBuf {
        companion_path(input, MASK_SUFFIX)
    }

    /// Result file written beside an input
    pub fn get_output_path(input: &Path) -> PathBuf {
        companion_path(input, OUTPUT_SUFFIX)
    }
}

/// `dir/<stem><suffix>.<ext>` for `dir/<stem>.<ext>`
fn companion_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let mut name = format!("{stem}{suffix}");
    if let Some(extension) = input.extension() {
        name.push('.');
        name.push_str(&extension.to_string_lossy());
    }
    input.with_file_name(name)
}

fn is_png(path: &Path) -> bool {
    path.extension().is_some_and(|extension| extension == "png")
}

/// Masks and results live beside the inputs but are never inputs themselves
fn is_derived_file(path: &Path) -> bool {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .is_some_and(|stem| stem.ends_with(MASK_SUFFIX) || stem.ends_with(OUTPUT_SUFFIX))
}
