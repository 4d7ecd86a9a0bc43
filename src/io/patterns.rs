//! Named pattern registry backed by PNG assets

use crate::io::error::{EngravingError, Result};
use image::RgbaImage;
use std::collections::HashMap;
use std::path::Path;

/// Source of tileable pattern images looked up by id
///
/// Implementations must never substitute a default for an unknown id.
pub trait PatternRegistry {
    /// Pattern image registered under `id`
    fn pattern(&self, id: &str) -> Option<&RgbaImage>;

    /// Pattern image registered under `id`, or `PatternNotFound`
    ///
    /// # Errors
    ///
    /// Returns `PatternNotFound` if no pattern is registered under `id`
    fn require(&self, id: &str) -> Result<&RgbaImage> {
        self.pattern(id)
            .ok_or_else(|| EngravingError::PatternNotFound {
                pattern_id: id.to_string(),
            })
    }
}

/// In-memory pattern library keyed by id
#[derive(Debug, Clone, Default)]
pub struct PatternLibrary {
    patterns: HashMap<String, RgbaImage>,
}

// Asset files are named `waves0.png`; ids may be given with or without it
fn normalize_id(id: &str) -> &str {
    id.strip_suffix(".png").unwrap_or(id)
}

impl PatternLibrary {
    /// Create an empty library
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `pattern` under `id`, replacing any previous entry
    ///
    /// # Errors
    ///
    /// Returns `InvalidDimensions` if the pattern has no pixels
    pub fn register(&mut self, id: impl Into<String>, pattern: RgbaImage) -> Result<()> {
        if pattern.width() == 0 || pattern.height() == 0 {
            return Err(EngravingError::InvalidDimensions {
                width: u64::from(pattern.width()),
                height: u64::from(pattern.height()),
            });
        }
        let id = id.into();
        self.patterns.insert(normalize_id(&id).to_string(), pattern);
        Ok(())
    }

    /// Load every PNG in `dir`, keyed by file stem
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The directory cannot be read
    /// - A PNG file cannot be decoded
    /// - A PNG file has no pixels
    pub fn from_directory(dir: &Path) -> Result<Self> {
        let entries = std::fs::read_dir(dir).map_err(|e| EngravingError::FileSystem {
            path: dir.to_path_buf(),
            operation: "read pattern directory",
            source: e,
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| EngravingError::FileSystem {
                    path: dir.to_path_buf(),
                    operation: "read pattern directory",
                    source: e,
                })?
                .path();
            if path.extension().and_then(|s| s.to_str()) == Some("png") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut library = Self::new();
        for path in paths {
            let Some(stem) = path.file_stem().map(|s| s.to_string_lossy().to_string()) else {
                continue;
            };
            let pattern = image::open(&path)
                .map_err(|e| EngravingError::ImageLoad {
                    path: path.clone(),
                    source: e,
                })?
                .to_rgba8();
            library.register(stem, pattern)?;
        }

        tracing::debug!(
            dir = %dir.display(),
            count = library.len(),
            "loaded pattern library"
        );
        Ok(library)
    }

    /// Registered ids in sorted order
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.patterns.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Number of registered patterns
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// True when no pattern is registered
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl PatternRegistry for PatternLibrary {
    fn pattern(&self, id: &str) -> Option<&RgbaImage> {
        self.patterns.get(normalize_id(id))
    }
}
