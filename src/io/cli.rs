//! Command-line interface for batch engraving of PNG files

use crate::engrave::{EngravingPlan, Pipeline, PipelineObserver, StackMerger};
use crate::io::configuration::{
    BAND_SUFFIX, DEFAULT_PATTERN_DIR, DEFAULT_ROTATIONS, DEFAULT_THRESHOLDS, ENGRAVING_SUFFIX,
    OUTPUT_SUFFIX, default_pattern_ids,
};
use crate::io::error::{PipelineStage, Result, WithStage};
use crate::io::image::{export_bands, export_result, load_source_image};
use crate::io::patterns::PatternLibrary;
use crate::io::progress::{FileProgress, ProgressManager};
use crate::raster::{Channel, Interpolation, SourceImage};
use clap::{ArgAction, Parser};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "engraving")]
#[command(
    author,
    version,
    about = "Fake an engraving from luminance bands and rotated line patterns"
)]
/// Command-line arguments for the engraving tool
// CLI tools commonly need multiple boolean flags for various features and user preferences
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Input PNG file or directory to process
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Directory holding the pattern PNGs (`waves0.png` ...)
    #[arg(short, long, default_value = DEFAULT_PATTERN_DIR)]
    pub patterns: PathBuf,

    /// Comma-separated threshold fractions, darkest cut first
    #[arg(short, long, value_delimiter = ',')]
    pub thresholds: Option<Vec<f64>>,

    /// Comma-separated tile rotations in degrees, one per threshold
    #[arg(short, long, value_delimiter = ',', allow_hyphen_values = true)]
    pub rotations: Option<Vec<f64>>,

    /// Comma-separated pattern ids, one per threshold
    #[arg(long = "pattern-ids", value_delimiter = ',')]
    pub pattern_ids: Option<Vec<String>>,

    /// Channel thresholded into bands
    #[arg(short, long, value_enum, default_value_t = Channel::Red)]
    pub channel: Channel,

    /// Resampling used for rotated tiles
    #[arg(short, long, value_parser = parse_interpolation, default_value = "nearest")]
    pub interpolation: Interpolation,

    /// Render bands one after another instead of in parallel
    #[arg(long)]
    pub sequential: bool,

    /// Also write every masked band layer (`<input>_band<N>.png`)
    #[arg(short, long)]
    pub export_bands: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Process files even if output exists
    #[arg(short, long)]
    pub no_skip: bool,

    /// Increase log verbosity (repeatable)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Parse an interpolation name (`nearest`, `bilinear` or `bicubic`)
///
/// # Errors
///
/// Returns a message naming the accepted values for anything else.
pub fn parse_interpolation(value: &str) -> std::result::Result<Interpolation, String> {
    match value.to_ascii_lowercase().as_str() {
        "nearest" => Ok(Interpolation::Nearest),
        "bilinear" => Ok(Interpolation::Bilinear),
        "bicubic" => Ok(Interpolation::Bicubic),
        other => Err(format!(
            "unknown interpolation '{other}', expected nearest, bilinear or bicubic"
        )),
    }
}

impl Cli {
    /// Check if existing output files should be skipped
    pub const fn skip_existing(&self) -> bool {
        !self.no_skip
    }

    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Build the engraving plan, filling omitted lists with the defaults
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationMismatch` if the lists differ in length, or
    /// `InvalidParameter` for an out-of-range threshold
    pub fn plan(&self) -> Result<EngravingPlan> {
        let thresholds = self
            .thresholds
            .clone()
            .unwrap_or_else(|| DEFAULT_THRESHOLDS.to_vec());
        let rotations = self
            .rotations
            .clone()
            .unwrap_or_else(|| DEFAULT_ROTATIONS.to_vec());
        let pattern_ids = self.pattern_ids.clone().unwrap_or_else(default_pattern_ids);

        Ok(
            EngravingPlan::from_parts(&thresholds, &rotations, &pattern_ids)?
                .with_channel(self.channel)
                .with_interpolation(self.interpolation)
                .with_parallel(!self.sequential),
        )
    }
}

/// Orchestrates batch processing of PNG files with progress tracking
pub struct FileProcessor {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl FileProcessor {
    /// Create a new file processor with the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Process files according to CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if target validation, plan construction, pattern
    /// loading or file processing fails
    pub fn process(&mut self) -> Result<()> {
        let files = self.collect_files()?;

        if files.is_empty() {
            tracing::info!(path = %self.cli.target.display(), "nothing to process");
            return Ok(());
        }

        let plan = self.cli.plan().with_stage(PipelineStage::Configuration)?;
        let patterns = PatternLibrary::from_directory(&self.cli.patterns)?;

        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(files.len());
        }

        for file in &files {
            self.process_file(file, &plan, &patterns)?;
        }

        if let Some(ref pm) = self.progress_manager {
            pm.finish();
        }

        Ok(())
    }

    fn collect_files(&self) -> Result<Vec<PathBuf>> {
        if self.cli.target.is_file() {
            if self.cli.target.extension().and_then(|s| s.to_str()) == Some("png") {
                if self.should_process_file(&self.cli.target) {
                    Ok(vec![self.cli.target.clone()])
                } else {
                    Ok(vec![])
                }
            } else {
                Err(crate::io::error::io_error(
                    "Target file must be a PNG image",
                ))
            }
        } else if self.cli.target.is_dir() {
            let mut files = Vec::new();
            for entry in std::fs::read_dir(&self.cli.target)? {
                let path = entry?.path();
                if path.extension().and_then(|s| s.to_str()) == Some("png")
                    && !Self::is_generated_output(&path)
                    && self.should_process_file(&path)
                {
                    files.push(path);
                }
            }
            files.sort();
            Ok(files)
        } else {
            Err(crate::io::error::io_error(
                "Target must be a PNG file or directory",
            ))
        }
    }

    fn should_process_file(&self, input_path: &Path) -> bool {
        if !self.cli.skip_existing() {
            return true;
        }

        let output_path = Self::get_output_path(input_path);
        let exists = output_path.exists();
        if exists {
            tracing::info!(output = %output_path.display(), "skipping, output exists");
        }
        !exists
    }

    fn process_file(
        &self,
        input_path: &Path,
        plan: &EngravingPlan,
        patterns: &PatternLibrary,
    ) -> Result<()> {
        tracing::info!(input = %input_path.display(), bands = plan.len(), "engraving file");

        let source = load_source_image(input_path)?;
        let progress = self
            .progress_manager
            .as_ref()
            .map(|pm| pm.start_file(input_path, plan.len()));

        let outcome =
            self.render_and_export(input_path, &source, plan, patterns, progress.as_ref());

        if let (Some(pm), Some(file_progress)) = (&self.progress_manager, &progress) {
            if outcome.is_ok() {
                pm.complete_file(file_progress);
            } else {
                pm.abandon_file(file_progress);
            }
        }

        outcome
    }

    fn render_and_export(
        &self,
        input_path: &Path,
        source: &SourceImage,
        plan: &EngravingPlan,
        patterns: &PatternLibrary,
        progress: Option<&FileProgress>,
    ) -> Result<()> {
        let observer: &dyn PipelineObserver = match progress {
            Some(file_progress) => file_progress,
            None => &(),
        };
        let pipeline = Pipeline::new(plan.clone()).with_observer(observer);

        let result = if self.cli.export_bands {
            let layers = pipeline.render_bands(source, patterns)?;
            export_bands(&layers, |index| Self::get_band_path(input_path, index))?;
            StackMerger::merge(layers, source.canvas()).with_stage(PipelineStage::StackMerge)?
        } else {
            pipeline.run(source, patterns)?
        };

        export_result(
            &result,
            &Self::get_output_path(input_path),
            &Self::get_engraving_path(input_path),
        )
    }

    // Outputs written next to their inputs must not be picked up as inputs.
    // A name only counts as generated while its source file sits beside it.
    fn is_generated_output(path: &Path) -> bool {
        let stem = path.file_stem().unwrap_or_default().to_string_lossy();
        let base = stem
            .strip_suffix(OUTPUT_SUFFIX)
            .or_else(|| stem.strip_suffix(ENGRAVING_SUFFIX))
            .or_else(|| {
                stem.rsplit_once(BAND_SUFFIX).and_then(|(base, index)| {
                    (!index.is_empty() && index.chars().all(|c| c.is_ascii_digit()))
                        .then_some(base)
                })
            })
            .filter(|base| !base.is_empty());

        let Some(base) = base else {
            return false;
        };
        let source = path.with_file_name(format!("{base}.png"));
        let generated = source.is_file();
        if generated {
            tracing::info!(
                path = %path.display(),
                source = %source.display(),
                "skipping generated output"
            );
        }
        generated
    }

    fn sibling_path(input_path: &Path, suffix: &str) -> PathBuf {
        let stem = input_path.file_stem().unwrap_or_default();
        let name = format!("{}{suffix}.png", stem.to_string_lossy());

        if let Some(parent) = input_path.parent() {
            parent.join(name)
        } else {
            PathBuf::from(name)
        }
    }

    /// Path of the flattened output for `input_path`
    pub fn get_output_path(input_path: &Path) -> PathBuf {
        Self::sibling_path(input_path, OUTPUT_SUFFIX)
    }

    /// Path of the engraving-only output for `input_path`
    pub fn get_engraving_path(input_path: &Path) -> PathBuf {
        Self::sibling_path(input_path, ENGRAVING_SUFFIX)
    }

    /// Path of band `index` for `input_path`
    pub fn get_band_path(input_path: &Path, index: usize) -> PathBuf {
        Self::sibling_path(input_path, &format!("{BAND_SUFFIX}{index}"))
    }
}
