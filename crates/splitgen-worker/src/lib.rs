//! Split-screen variant generator.
//!
//! This crate provides:
//! - Request processing: probe, frame, sample, render, upload
//! - Packaging of uploaded variants into a zip archive
//! - Per-request scratch space and input fetching
//! - Structured request logging
//! - The Lambda handler

pub mod config;
pub mod error;
pub mod handler;
pub mod inputs;
pub mod logging;
pub mod packager;
pub mod processor;
pub mod sampler;
pub mod scratch;

pub use config::WorkerConfig;
pub use error::{WorkerError, WorkerResult};
pub use handler::handle;
pub use logging::{init_tracing, RequestLogger};
pub use packager::{Packager, VariantUpload};
pub use processor::SplitProcessor;
pub use sampler::{sample_offset, VariantSampler};
pub use scratch::ScratchDir;
