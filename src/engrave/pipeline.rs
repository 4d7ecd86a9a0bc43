//! Band decomposition and masked pattern compositing, end to end
//!
//! A run moves strictly through `Init -> BandsExtracted -> Masked -> Merged
//! -> Done`. Intermediate buffers live in a scoped workspace that is
//! released on every exit path; a failing stage aborts the run and no
//! partial result escapes.

use crate::engrave::bands::BandExtractor;
use crate::engrave::compositor::{MaskCompositor, MaskedLayer};
use crate::engrave::merger::{EngravedResult, StackMerger};
use crate::engrave::tiles::TileGenerator;
use crate::io::configuration::{DEFAULT_ROTATIONS, DEFAULT_THRESHOLDS, default_pattern_ids};
use crate::io::error::{EngravingError, PipelineStage, Result, WithStage, invalid_parameter};
use crate::io::patterns::PatternRegistry;
use crate::raster::{BandMask, Canvas, Channel, Interpolation, SourceImage};
use rayon::prelude::*;

/// One band of the effect: where to cut, which pattern, at what angle
#[derive(Debug, Clone, PartialEq)]
pub struct EngravingStep {
    /// Threshold as a fraction of full-scale intensity
    pub threshold: f64,
    /// Tile rotation in degrees, positive clockwise
    pub rotation: f64,
    /// Id of the pattern filling this band
    pub pattern_id: String,
}

impl EngravingStep {
    /// Build a step
    pub fn new(threshold: f64, rotation: f64, pattern_id: impl Into<String>) -> Self {
        Self {
            threshold,
            rotation,
            pattern_id: pattern_id.into(),
        }
    }

    fn validate(&self, index: usize) -> Result<()> {
        // 0 would select every pixel and 1 only pure white
        if !self.threshold.is_finite() || self.threshold <= 0.0 || self.threshold >= 1.0 {
            return Err(invalid_parameter(
                "threshold",
                &self.threshold,
                &format!("step {index}: must be a fraction strictly between 0 and 1"),
            ));
        }
        if !self.rotation.is_finite() {
            return Err(invalid_parameter(
                "rotation",
                &self.rotation,
                &format!("step {index}: must be a finite angle in degrees"),
            ));
        }
        Ok(())
    }
}

/// Ordered steps plus the settings shared by all of them
#[derive(Debug, Clone, PartialEq)]
pub struct EngravingPlan {
    steps: Vec<EngravingStep>,
    channel: Channel,
    interpolation: Interpolation,
    parallel: bool,
}

impl Default for EngravingPlan {
    fn default() -> Self {
        let steps = DEFAULT_THRESHOLDS
            .iter()
            .zip(DEFAULT_ROTATIONS)
            .zip(default_pattern_ids())
            .map(|((&threshold, rotation), pattern_id)| {
                EngravingStep::new(threshold, rotation, pattern_id)
            })
            .collect();
        Self {
            steps,
            channel: Channel::default(),
            interpolation: Interpolation::Nearest,
            parallel: true,
        }
    }
}

impl EngravingPlan {
    /// Plan from explicit steps, bottom band first
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if a threshold is outside `[0, 1]` or not
    /// finite, or a rotation is not finite
    pub fn new(steps: Vec<EngravingStep>) -> Result<Self> {
        for (index, step) in steps.iter().enumerate() {
            step.validate(index)?;
        }
        Ok(Self {
            steps,
            ..Self::default()
        })
    }

    /// Plan from parallel threshold, rotation and pattern id lists
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The three lists differ in length (`ConfigurationMismatch`)
    /// - A threshold or rotation is invalid (`InvalidParameter`)
    pub fn from_parts<S: AsRef<str>>(
        thresholds: &[f64],
        rotations: &[f64],
        pattern_ids: &[S],
    ) -> Result<Self> {
        if thresholds.len() != rotations.len() || thresholds.len() != pattern_ids.len() {
            return Err(EngravingError::ConfigurationMismatch {
                thresholds: thresholds.len(),
                rotations: rotations.len(),
                pattern_ids: pattern_ids.len(),
            });
        }
        let steps = thresholds
            .iter()
            .zip(rotations)
            .zip(pattern_ids)
            .map(|((&threshold, &rotation), pattern_id)| {
                EngravingStep::new(threshold, rotation, pattern_id.as_ref())
            })
            .collect();
        Self::new(steps)
    }

    /// Read intensities from `channel` instead of red
    #[must_use]
    pub fn with_channel(mut self, channel: Channel) -> Self {
        self.channel = channel;
        self
    }

    /// Resample rotated tiles with `interpolation`
    #[must_use]
    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// Render steps on the rayon pool (`true`) or one after another
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Steps, bottom band first
    pub fn steps(&self) -> &[EngravingStep] {
        &self.steps
    }

    /// Thresholds in step order
    pub fn thresholds(&self) -> Vec<f64> {
        self.steps.iter().map(|step| step.threshold).collect()
    }

    /// Number of steps
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// True when the plan renders no bands
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Channel thresholded into bands
    pub const fn channel(&self) -> Channel {
        self.channel
    }

    /// Resampling for rotated tiles
    pub const fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    /// Whether steps render in parallel
    pub const fn is_parallel(&self) -> bool {
        self.parallel
    }
}

/// Position of a run in its linear state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// Workspace acquired, nothing computed
    Init,
    /// All band masks exist
    BandsExtracted,
    /// This many steps have been tiled and masked
    Masked {
        /// Completed step count
        completed: usize,
    },
    /// Masked layers merged and backing added
    Merged,
    /// Result handed to the caller
    Done,
}

/// Receives progress notifications from a running pipeline
///
/// Step notifications may arrive from worker threads and out of order.
pub trait PipelineObserver: Sync {
    /// A step finished tiling and masking
    fn step_completed(&self, _index: usize, _total: usize) {}
}

impl PipelineObserver for () {}

/// Scoped owner of a run's intermediate buffers
///
/// Dropping it releases whatever the run still holds; a drop before
/// `finish` marks the run as aborted.
struct Workspace {
    state: PipelineState,
    masks: Vec<BandMask>,
    layers: Vec<MaskedLayer>,
}

impl Workspace {
    fn acquire() -> Self {
        tracing::trace!("acquired engraving workspace");
        Self {
            state: PipelineState::Init,
            masks: Vec::new(),
            layers: Vec::new(),
        }
    }

    fn advance(&mut self, state: PipelineState) {
        tracing::debug!(from = ?self.state, to = ?state, "pipeline state change");
        self.state = state;
    }

    fn finish(mut self) {
        self.advance(PipelineState::Done);
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        let masks = self.masks.len();
        let layers = self.layers.len();
        self.masks.clear();
        self.layers.clear();
        if self.state == PipelineState::Done {
            tracing::trace!("released engraving workspace");
        } else {
            tracing::warn!(
                state = ?self.state,
                masks,
                layers,
                "engraving aborted, released working buffers"
            );
        }
    }
}

/// Runs an [`EngravingPlan`] against a source image and a pattern registry
pub struct Pipeline<'a> {
    plan: EngravingPlan,
    observer: &'a dyn PipelineObserver,
}

impl Pipeline<'static> {
    /// Pipeline without progress reporting
    pub fn new(plan: EngravingPlan) -> Self {
        Self {
            plan,
            observer: &(),
        }
    }
}

impl Pipeline<'_> {
    /// Report step completion to `observer`
    pub fn with_observer<'b>(self, observer: &'b dyn PipelineObserver) -> Pipeline<'b> {
        Pipeline {
            plan: self.plan,
            observer,
        }
    }

    /// Plan this pipeline executes
    pub const fn plan(&self) -> &EngravingPlan {
        &self.plan
    }

    /// Render the full effect: merged engraving above the backing
    ///
    /// # Errors
    ///
    /// Returns the first failure wrapped with its stage and step index:
    /// - `PatternNotFound` for an unregistered pattern id, before any work
    /// - `InvalidDimensions` if a tile cannot be allocated
    /// - `DimensionMismatch` if a masked layer does not match the canvas
    pub fn run<R>(&self, source: &SourceImage, patterns: &R) -> Result<EngravedResult>
    where
        R: PatternRegistry + Sync + ?Sized,
    {
        let _span = tracing::info_span!(
            "engrave",
            width = source.width(),
            height = source.height(),
            steps = self.plan.len()
        )
        .entered();

        let mut workspace = Workspace::acquire();
        self.render_into(&mut workspace, source, patterns)?;

        let layers = std::mem::take(&mut workspace.layers);
        let result =
            StackMerger::merge(layers, source.canvas()).with_stage(PipelineStage::StackMerge)?;
        workspace.advance(PipelineState::Merged);
        workspace.finish();

        tracing::info!(layers = result.layer_count(), "engraving complete");
        Ok(result)
    }

    /// Render every band as its own masked layer, without merging
    ///
    /// # Errors
    ///
    /// Same failures as [`Pipeline::run`] up to the merge stage
    pub fn render_bands<R>(&self, source: &SourceImage, patterns: &R) -> Result<Vec<MaskedLayer>>
    where
        R: PatternRegistry + Sync + ?Sized,
    {
        let mut workspace = Workspace::acquire();
        self.render_into(&mut workspace, source, patterns)?;
        let layers = std::mem::take(&mut workspace.layers);
        workspace.finish();
        Ok(layers)
    }

    fn render_into<R>(
        &self,
        workspace: &mut Workspace,
        source: &SourceImage,
        patterns: &R,
    ) -> Result<()>
    where
        R: PatternRegistry + Sync + ?Sized,
    {
        self.check_patterns(patterns)?;

        let thresholds = self.plan.thresholds();
        workspace.masks = BandExtractor::new(self.plan.channel()).extract(source, &thresholds);
        workspace.advance(PipelineState::BandsExtracted);

        let masks = std::mem::take(&mut workspace.masks);
        workspace.layers = self.mask_tiles(masks, source.canvas(), patterns)?;
        workspace.advance(PipelineState::Masked {
            completed: workspace.layers.len(),
        });
        Ok(())
    }

    // Fail before any pixel work when a pattern id is unknown
    fn check_patterns<R>(&self, patterns: &R) -> Result<()>
    where
        R: PatternRegistry + ?Sized,
    {
        for (index, step) in self.plan.steps().iter().enumerate() {
            patterns
                .require(&step.pattern_id)
                .map(|_| ())
                .at_step(PipelineStage::Configuration, index)?;
        }
        Ok(())
    }

    fn mask_tiles<R>(
        &self,
        masks: Vec<BandMask>,
        canvas: Canvas,
        patterns: &R,
    ) -> Result<Vec<MaskedLayer>>
    where
        R: PatternRegistry + Sync + ?Sized,
    {
        let generator = TileGenerator::new(patterns, self.plan.interpolation());
        let total = self.plan.len();
        let jobs: Vec<(usize, (&EngravingStep, BandMask))> = self
            .plan
            .steps()
            .iter()
            .zip(masks)
            .enumerate()
            .collect();

        if self.plan.is_parallel() {
            jobs.into_par_iter()
                .map(|(index, (step, mask))| {
                    self.mask_step(&generator, index, step, mask, canvas, total)
                })
                .collect()
        } else {
            jobs.into_iter()
                .map(|(index, (step, mask))| {
                    self.mask_step(&generator, index, step, mask, canvas, total)
                })
                .collect()
        }
    }

    fn mask_step<R>(
        &self,
        generator: &TileGenerator<'_, R>,
        index: usize,
        step: &EngravingStep,
        mask: BandMask,
        canvas: Canvas,
        total: usize,
    ) -> Result<MaskedLayer>
    where
        R: PatternRegistry + ?Sized,
    {
        let tile = generator
            .generate(
                canvas.width(),
                canvas.height(),
                &step.pattern_id,
                step.rotation,
            )
            .at_step(PipelineStage::TileGeneration, index)?;
        let layer = MaskCompositor::composite(&tile, &mask, canvas);
        tracing::debug!(
            index,
            pattern_id = %step.pattern_id,
            visible = layer.visible_pixels(),
            "masked band layer"
        );
        self.observer.step_completed(index, total);
        Ok(layer)
    }
}

/// Render the effect from parallel threshold, rotation and pattern id lists
///
/// Step `i` pairs `thresholds[i]` with `rotations[i]` and `pattern_ids[i]`;
/// step 0 is the bottom band.
///
/// # Errors
///
/// Returns `ConfigurationMismatch` if the lists differ in length, plus any
/// failure of [`Pipeline::run`]
pub fn run<R, S>(
    source: &SourceImage,
    thresholds: &[f64],
    rotations: &[f64],
    pattern_ids: &[S],
    patterns: &R,
) -> Result<EngravedResult>
where
    R: PatternRegistry + Sync + ?Sized,
    S: AsRef<str>,
{
    let plan = EngravingPlan::from_parts(thresholds, rotations, pattern_ids)
        .with_stage(PipelineStage::Configuration)?;
    Pipeline::new(plan).run(source, patterns)
}
