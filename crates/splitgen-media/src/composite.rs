//! Variant composition.
//!
//! A [`CompositionPlan`] stacks three layers on the canvas: a black
//! background, the primary track at the top and a subclip of the secondary
//! track in the lower band. The plan is pure data; [`CompositionPlan::to_command`]
//! turns it into a single FFmpeg invocation.

use std::path::Path;

use splitgen_models::{Dimensions, EncodingConfig, SECONDARY_OFFSET_Y};

use crate::command::{FfmpegCommand, FfmpegInput};
use crate::error::{MediaError, MediaResult};
use crate::framing::FramedTrack;

/// Tolerance for float drift between probed durations and drawn offsets.
const DURATION_EPSILON: f64 = 1e-6;

/// Solid-color background layer.
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundLayer {
    pub size: Dimensions,
    pub color: &'static str,
    pub duration: f64,
}

impl BackgroundLayer {
    /// Black canvas-sized layer.
    pub fn black(duration: f64) -> Self {
        Self {
            size: Dimensions::CANVAS,
            color: "black",
            duration,
        }
    }

    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = duration;
        self
    }
}

/// Placement of a layer's top-left corner on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub x: u32,
    pub y: u32,
}

/// Where the primary track's audio and the secondary's audio end up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioMix {
    Silent,
    PrimaryOnly,
    SecondaryOnly,
    Both,
}

/// Everything needed to render one variant.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositionPlan {
    pub background: BackgroundLayer,
    pub primary: FramedTrack,
    pub primary_position: Position,
    pub secondary: FramedTrack,
    pub secondary_position: Position,
    /// Start of the secondary subclip in seconds
    pub secondary_start: f64,
    /// Output duration (primary duration)
    pub duration: f64,
    /// Output frame rate (primary integer rate)
    pub fps: u32,
}

impl CompositionPlan {
    /// Plan a variant using the secondary subclip starting at `start_offset`.
    pub fn new(
        primary: &FramedTrack,
        secondary: &FramedTrack,
        start_offset: f64,
    ) -> MediaResult<Self> {
        let duration = primary.duration;

        if !start_offset.is_finite() || start_offset < 0.0 {
            return Err(MediaError::invalid_composition(format!(
                "subclip start {} is negative",
                start_offset
            )));
        }
        if start_offset + duration > secondary.duration + DURATION_EPSILON {
            return Err(MediaError::invalid_composition(format!(
                "subclip [{:.3}, {:.3}) exceeds secondary duration {:.3}",
                start_offset,
                start_offset + duration,
                secondary.duration
            )));
        }

        // Background starts out lasting "fps" seconds and is stretched to
        // the primary duration when the layers are assembled.
        let background = BackgroundLayer::black(primary.fps as f64).with_duration(duration);

        Ok(Self {
            background,
            primary: primary.clone(),
            primary_position: Position { x: 0, y: 0 },
            secondary: secondary.clone(),
            secondary_position: Position {
                x: 0,
                y: SECONDARY_OFFSET_Y,
            },
            secondary_start: start_offset,
            duration,
            fps: primary.fps,
        })
    }

    /// End of the secondary subclip in seconds.
    pub fn secondary_end(&self) -> f64 {
        self.secondary_start + self.duration
    }

    pub fn audio_mix(&self) -> AudioMix {
        match (self.primary.has_audio, self.secondary.has_audio) {
            (true, true) => AudioMix::Both,
            (true, false) => AudioMix::PrimaryOnly,
            (false, true) => AudioMix::SecondaryOnly,
            (false, false) => AudioMix::Silent,
        }
    }

    /// lavfi source for the background input.
    pub fn background_source(&self) -> String {
        format!(
            "color=c={}:s={}:r={}:d={:.3}",
            self.background.color, self.background.size, self.fps, self.background.duration
        )
    }

    /// Filter graph over inputs 0 (primary), 1 (secondary subclip) and
    /// 2 (background). Produces `[v]` and, when mixing, `[a]`.
    pub fn filter_graph(&self) -> String {
        let mut graph = format!(
            "[0:v]{},setpts=PTS-STARTPTS[primary];\
             [1:v]{},setpts=PTS-STARTPTS[secondary];\
             [2:v][primary]overlay={}:{}:eof_action=pass[base];\
             [base][secondary]overlay={}:{}:eof_action=pass[v]",
            self.primary.plan.filter_chain(),
            self.secondary.plan.filter_chain(),
            self.primary_position.x,
            self.primary_position.y,
            self.secondary_position.x,
            self.secondary_position.y,
        );

        if self.audio_mix() == AudioMix::Both {
            // Tracks are summed at full level, not averaged.
            graph.push_str(
                ";[0:a][1:a]amix=inputs=2:duration=longest:dropout_transition=0:normalize=0[a]",
            );
        }

        graph
    }

    /// Build the FFmpeg command rendering this plan to `output`.
    pub fn to_command(&self, output: impl AsRef<Path>, encoding: &EncodingConfig) -> FfmpegCommand {
        let cmd = FfmpegCommand::new(output)
            .input(FfmpegInput::file(&self.primary.path))
            .input(
                FfmpegInput::file(&self.secondary.path)
                    .seek(self.secondary_start)
                    .duration(self.duration),
            )
            .input(FfmpegInput::lavfi(self.background_source()))
            .filter_complex(self.filter_graph())
            .map("[v]");

        let cmd = match self.audio_mix() {
            AudioMix::Both => cmd.map("[a]"),
            AudioMix::PrimaryOnly => cmd.map("0:a"),
            AudioMix::SecondaryOnly => cmd.map("1:a"),
            AudioMix::Silent => cmd.output_arg("-an"),
        };

        cmd.output_duration(self.duration)
            .frame_rate(self.fps)
            .output_args(encoding.to_ffmpeg_args())
    }
}
