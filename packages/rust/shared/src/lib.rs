//! Shared types, error model, and configuration for BrandPitch.
//!
//! This crate is the foundation depended on by all other BrandPitch crates.
//! It provides:
//! - [`BrandPitchError`]: the unified error type
//! - Domain types ([`BrandProfile`], [`IndustryTemplate`], [`ChannelPlan`],
//!   [`GeneratedCopy`], [`ContentRecord`])
//! - Configuration ([`AppConfig`], [`ModelSettings`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, BrandfetchConfig, CatalogConfig, ModelSettings, OpenRouterConfig, config_dir,
    config_file_path, init_config, load_config, load_config_from,
};
pub use error::{BrandPitchError, Result};
pub use types::{
    BrandColor, BrandProfile, CHANNEL_LABELS, CONFIDENCE_THRESHOLD, ChannelKey, ChannelPlan,
    ContentRecord, FALLBACK_CONFIDENCE, FALLBACK_INDUSTRY, FALLBACK_USE_CASE, GeneratedCopy,
    IndustryDetermination, IndustryTemplate, RunId, TemplateStep, TemplateSteps,
};
