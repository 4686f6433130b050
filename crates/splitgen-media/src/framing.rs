//! Track framing.
//!
//! Framers turn a probed source into a [`FramedTrack`]: the resize and
//! horizontal fit needed to place it on the 1080-wide canvas. Nothing is
//! encoded here; the plan is rendered as an FFmpeg filter chain when the
//! variant is composited.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

use splitgen_models::{
    Dimensions, FramingStyle, CANVAS_HEIGHT, CANVAS_WIDTH, SECONDARY_BAND_HEIGHT, SHRINK_HEIGHT,
};

use crate::probe::VideoHandle;

/// Horizontal adjustment applied after resizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HorizontalFit {
    /// Keep `CANVAS_WIDTH` columns starting at `x`
    Crop { x: u32 },
    /// Center a narrower frame on `CANVAS_WIDTH` black columns, content at `x`
    Pad { x: u32 },
}

/// Geometry for one track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FramePlan {
    /// Source frame size
    pub source: Dimensions,
    /// Size after resizing
    pub resized: Dimensions,
    /// Crop or pad to canvas width, if the resized width differs
    pub fit: Option<HorizontalFit>,
    /// Whether the track's audio survives framing
    pub keep_audio: bool,
}

impl FramePlan {
    /// Final frame size of the track.
    pub fn output(&self) -> Dimensions {
        match self.fit {
            Some(_) => Dimensions::new(CANVAS_WIDTH, self.resized.height),
            None => self.resized,
        }
    }

    /// FFmpeg filter chain realising this plan.
    pub fn filter_chain(&self) -> String {
        let mut chain = format!(
            "scale={}:{},setsar=1",
            self.resized.width, self.resized.height
        );

        match self.fit {
            Some(HorizontalFit::Crop { x }) => {
                chain.push_str(&format!(
                    ",crop={}:{}:{}:0",
                    CANVAS_WIDTH, self.resized.height, x
                ));
            }
            Some(HorizontalFit::Pad { x }) => {
                chain.push_str(&format!(
                    ",pad={}:{}:{}:0:black",
                    CANVAS_WIDTH, self.resized.height, x
                ));
            }
            None => {}
        }

        chain
    }
}

/// A track ready to be placed on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct FramedTrack {
    /// Source file
    pub path: PathBuf,
    /// Geometry
    pub plan: FramePlan,
    /// Duration in seconds
    pub duration: f64,
    /// Integer frame rate (truncated source rate)
    pub fps: u32,
    /// Whether the framed track carries audio
    pub has_audio: bool,
}

impl FramedTrack {
    pub fn width(&self) -> u32 {
        self.plan.output().width
    }

    pub fn height(&self) -> u32 {
        self.plan.output().height
    }
}

/// Frame the primary track.
///
/// `Overlay` keeps the aspect ratio at full canvas height; any other style
/// is a fixed resize to 1080×1440. Both then share one horizontal fit step,
/// so the output is always exactly canvas width.
pub fn frame_primary(handle: &VideoHandle, style: FramingStyle) -> FramedTrack {
    let source = handle.info.dimensions();
    let resized = match style {
        FramingStyle::Overlay => source.scale_to_height(CANVAS_HEIGHT),
        FramingStyle::Shrink => Dimensions::new(CANVAS_WIDTH, SHRINK_HEIGHT),
    };

    let plan = FramePlan {
        source,
        resized,
        fit: fit_to_canvas_width(resized),
        keep_audio: true,
    };

    debug!(
        style = %style,
        source = %source,
        output = %plan.output(),
        "Framed primary track"
    );

    FramedTrack {
        path: handle.path.clone(),
        plan,
        duration: handle.info.duration,
        fps: truncate_fps(handle.info.fps),
        has_audio: handle.info.has_audio,
    }
}

/// Frame the secondary track into the lower band.
///
/// Wide sources are center-cropped to canvas width and lose their audio;
/// narrow sources are stretched (aspect-preserving) to canvas width, which
/// makes them taller than the band.
pub fn frame_secondary(handle: &VideoHandle) -> FramedTrack {
    let source = handle.info.dimensions();
    let band = source.scale_to_height(SECONDARY_BAND_HEIGHT);

    let plan = if band.width > CANVAS_WIDTH {
        FramePlan {
            source,
            resized: band,
            fit: Some(HorizontalFit::Crop {
                x: (band.width - CANVAS_WIDTH) / 2,
            }),
            keep_audio: false,
        }
    } else {
        FramePlan {
            source,
            resized: band.scale_to_width(CANVAS_WIDTH),
            fit: None,
            keep_audio: true,
        }
    };

    debug!(
        source = %source,
        output = %plan.output(),
        keep_audio = plan.keep_audio,
        "Framed secondary track"
    );

    FramedTrack {
        path: handle.path.clone(),
        plan,
        duration: handle.info.duration,
        fps: truncate_fps(handle.info.fps),
        has_audio: handle.info.has_audio && plan.keep_audio,
    }
}

/// Shared crop step: anything not exactly canvas width is centered on it.
fn fit_to_canvas_width(resized: Dimensions) -> Option<HorizontalFit> {
    if resized.width > CANVAS_WIDTH {
        Some(HorizontalFit::Crop {
            x: (resized.width - CANVAS_WIDTH) / 2,
        })
    } else if resized.width < CANVAS_WIDTH {
        Some(HorizontalFit::Pad {
            x: (CANVAS_WIDTH - resized.width) / 2,
        })
    } else {
        None
    }
}

fn truncate_fps(fps: f64) -> u32 {
    if fps.is_finite() && fps >= 1.0 {
        fps.floor() as u32
    } else {
        1
    }
}
