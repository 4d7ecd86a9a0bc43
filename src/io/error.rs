//! Error types and stage context for engraving operations

use std::fmt;
use std::path::PathBuf;

/// Pipeline stage in which an error surfaced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    /// Validation of the step sequence and pattern ids before any work
    Configuration,
    /// Thresholding of the source channel into band masks
    BandExtraction,
    /// Allocation, pattern fill and rotation of a pattern tile
    TileGeneration,
    /// Application of a band mask to its tile
    MaskCompositing,
    /// Alpha-over merge of the masked layers and backing creation
    StackMerge,
}

impl PipelineStage {
    /// Stable lowercase name used in messages and log fields
    pub const fn name(self) -> &'static str {
        match self {
            Self::Configuration => "configuration",
            Self::BandExtraction => "band extraction",
            Self::TileGeneration => "tile generation",
            Self::MaskCompositing => "mask compositing",
            Self::StackMerge => "stack merge",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Main error type for all engraving operations
#[derive(Debug)]
pub enum EngravingError {
    /// Canvas or buffer dimensions are zero or exceed the allocation limit
    InvalidDimensions {
        /// Requested width in pixels
        width: u64,
        /// Requested height in pixels
        height: u64,
    },

    /// A pattern id was requested that the registry does not hold
    PatternNotFound {
        /// The unknown pattern id
        pattern_id: String,
    },

    /// A layer reaching the merge does not match the canvas size
    DimensionMismatch {
        /// Position of the offending layer in the stack
        index: usize,
        /// Canvas dimensions (width, height)
        expected: (u32, u32),
        /// Layer dimensions (width, height)
        found: (u32, u32),
    },

    /// Thresholds, rotations and pattern ids differ in length
    ConfigurationMismatch {
        /// Number of thresholds supplied
        thresholds: usize,
        /// Number of rotations supplied
        rotations: usize,
        /// Number of pattern ids supplied
        pattern_ids: usize,
    },

    /// A parameter value failed validation
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Failed to load an image from the filesystem
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Failed to save an image to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The global log subscriber could not be installed
    Logging {
        /// Description of the failure
        reason: String,
    },

    /// Wraps an error with the stage (and step index) where it occurred
    Stage {
        /// Stage that failed
        stage: PipelineStage,
        /// Step index, when the stage runs once per step
        index: Option<usize>,
        /// The underlying error
        source: Box<EngravingError>,
    },
}

impl EngravingError {
    /// Innermost error with all stage context removed
    pub fn root_cause(&self) -> &Self {
        let mut current = self;
        while let Self::Stage { source, .. } = current {
            current = source.as_ref();
        }
        current
    }

    /// Outermost stage context, if any was attached
    pub const fn stage(&self) -> Option<PipelineStage> {
        match self {
            Self::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// Step index of the outermost stage context, if any
    pub const fn index(&self) -> Option<usize> {
        match self {
            Self::Stage { index, .. } => *index,
            _ => None,
        }
    }
}

impl fmt::Display for EngravingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDimensions { width, height } => {
                write!(f, "Invalid canvas dimensions {width}x{height}")
            }
            Self::PatternNotFound { pattern_id } => {
                write!(f, "Pattern '{pattern_id}' is not registered")
            }
            Self::DimensionMismatch {
                index,
                expected,
                found,
            } => {
                write!(
                    f,
                    "Layer {index} is {}x{} but the canvas is {}x{}",
                    found.0, found.1, expected.0, expected.1
                )
            }
            Self::ConfigurationMismatch {
                thresholds,
                rotations,
                pattern_ids,
            } => {
                write!(
                    f,
                    "Configuration mismatch: {thresholds} thresholds, {rotations} rotations, {pattern_ids} pattern ids"
                )
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::Logging { reason } => write!(f, "Failed to initialise logging: {reason}"),
            Self::Stage {
                stage,
                index: Some(index),
                source,
            } => write!(f, "{stage} failed at step {index}: {source}"),
            Self::Stage {
                stage,
                index: None,
                source,
            } => write!(f, "{stage} failed: {source}"),
        }
    }
}

impl std::error::Error for EngravingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            Self::Stage { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

/// Convenience type alias for engraving results
pub type Result<T> = std::result::Result<T, EngravingError>;

/// Attaches pipeline stage context to errors
pub trait WithStage<T> {
    /// Tag the error with the stage it occurred in
    ///
    /// # Errors
    ///
    /// Propagates the original error wrapped in stage context
    fn with_stage(self, stage: PipelineStage) -> Result<T>;

    /// Tag the error with the stage and the step index it occurred at
    ///
    /// # Errors
    ///
    /// Propagates the original error wrapped in stage and index context
    fn at_step(self, stage: PipelineStage, index: usize) -> Result<T>;
}

impl<T, E> WithStage<T> for std::result::Result<T, E>
where
    E: Into<EngravingError>,
{
    fn with_stage(self, stage: PipelineStage) -> Result<T> {
        self.map_err(|e| EngravingError::Stage {
            stage,
            index: None,
            source: Box::new(e.into()),
        })
    }

    fn at_step(self, stage: PipelineStage, index: usize) -> Result<T> {
        self.map_err(|e| EngravingError::Stage {
            stage,
            index: Some(index),
            source: Box::new(e.into()),
        })
    }
}

impl From<image::ImageError> for EngravingError {
    fn from(err: image::ImageError) -> Self {
        Self::ImageLoad {
            path: PathBuf::from("<unknown>"),
            source: err,
        }
    }
}

impl From<std::io::Error> for EngravingError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> EngravingError {
    EngravingError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a path-related error for targets the CLI cannot handle
pub fn io_error(msg: &str) -> EngravingError {
    EngravingError::InvalidParameter {
        parameter: "path",
        value: String::new(),
        reason: msg.to_string(),
    }
}
