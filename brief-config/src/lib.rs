//! Shared configuration loader for brief.
//!
//! `defaults/brief.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`BriefConfig`].

use brief_editor::analytics::TrackerOptions;
use brief_editor::assets::{AssetPolicy, OptimizeOptions};
use brief_editor::{ContentMode, EditorOptions};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/brief.default.toml");

/// Top-level configuration consumed by brief applications.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BriefConfig {
    pub editor: EditorConfig,
    pub assets: AssetsConfig,
    pub analytics: AnalyticsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EditorConfig {
    pub placeholder: String,
    pub initial_content_mode: ContentMode,
    pub history_depth: usize,
}

impl From<EditorConfig> for EditorOptions {
    fn from(config: EditorConfig) -> Self {
        EditorOptions {
            placeholder: config.placeholder,
            initial_content_mode: config.initial_content_mode,
            history_depth: config.history_depth,
        }
    }
}

/// Upload limits and storage settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AssetsConfig {
    pub bucket: String,
    pub max_file_size: u64,
    pub accepted_types: Vec<String>,
    pub generate_thumbnails: bool,
    pub success_linger_ms: u64,
    pub gallery_limit: usize,
    pub optimize: OptimizeConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OptimizeConfig {
    pub max_width: u32,
    pub max_height: u32,
    pub quality: f32,
}

impl From<OptimizeConfig> for OptimizeOptions {
    fn from(config: OptimizeConfig) -> Self {
        OptimizeOptions {
            max_width: config.max_width,
            max_height: config.max_height,
            quality: config.quality.clamp(0.0, 1.0),
        }
    }
}

impl From<AssetsConfig> for AssetPolicy {
    fn from(config: AssetsConfig) -> Self {
        AssetPolicy {
            bucket: config.bucket,
            max_file_size: config.max_file_size,
            accepted_types: config.accepted_types,
            generate_thumbnails: config.generate_thumbnails,
            success_linger_ms: config.success_linger_ms,
            gallery_limit: config.gallery_limit,
            optimize: config.optimize.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalyticsConfig {
    pub enabled: bool,
    pub session_key: String,
    pub view_marker_prefix: String,
}

impl From<AnalyticsConfig> for TrackerOptions {
    fn from(config: AnalyticsConfig) -> Self {
        TrackerOptions {
            enabled: config.enabled,
            session_key: config.session_key,
            view_marker_prefix: config.view_marker_prefix,
        }
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<BriefConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<BriefConfig, ConfigError> {
    Loader::new().build()
}
