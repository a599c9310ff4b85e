//! Core pipeline and domain logic for BrandPitch.
//!
//! This crate ties brand lookup, industry classification, journey expansion
//! and copy generation together into the [`Pipeline`] entry points.

pub mod catalog;
pub mod classifier;
pub mod generator;
pub mod journey;
pub mod pipeline;

#[cfg(test)]
pub(crate) mod testing;

pub use catalog::Catalog;
pub use generator::BrandBrief;
pub use pipeline::{Pipeline, ProgressReporter, SilentProgress};
