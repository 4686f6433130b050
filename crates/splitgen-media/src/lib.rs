//! FFmpeg CLI wrapper for split-screen variant rendering.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building with multiple inputs
//! - Progress parsing from `-progress pipe:2`
//! - FFprobe-based input normalization
//! - Primary and secondary track framing
//! - Three-layer composition plans rendered in a single FFmpeg pass

pub mod backend;
pub mod command;
pub mod composite;
pub mod error;
pub mod framing;
pub mod probe;
pub mod progress;

pub use backend::{FfmpegBackend, MediaBackend};
pub use command::{check_ffmpeg, check_ffprobe, FfmpegCommand, FfmpegInput, FfmpegRunner};
pub use composite::{AudioMix, BackgroundLayer, CompositionPlan, Position};
pub use error::{MediaError, MediaResult};
pub use framing::{frame_primary, frame_secondary, FramePlan, FramedTrack, HorizontalFit};
pub use probe::{probe_video, VideoHandle, VideoInfo};
pub use progress::FfmpegProgress;
