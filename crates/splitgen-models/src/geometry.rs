//! Canvas geometry.
//!
//! All tracks are composited onto a fixed portrait canvas. The secondary
//! track occupies a band across the lower 40% of the canvas.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Output canvas width in pixels.
pub const CANVAS_WIDTH: u32 = 1080;
/// Output canvas height in pixels.
pub const CANVAS_HEIGHT: u32 = 1920;
/// Height of the secondary band (40% of canvas height).
pub const SECONDARY_BAND_HEIGHT: u32 = CANVAS_HEIGHT * 2 / 5;
/// Primary track height for non-overlay styles (75% of canvas height).
pub const SHRINK_HEIGHT: u32 = CANVAS_HEIGHT * 3 / 4;
/// Vertical offset of the secondary band (60% of canvas height).
pub const SECONDARY_OFFSET_Y: u32 = CANVAS_HEIGHT * 3 / 5;

/// Pixel dimensions of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub const CANVAS: Dimensions = Dimensions {
        width: CANVAS_WIDTH,
        height: CANVAS_HEIGHT,
    };

    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Aspect-preserving resize to the given height.
    pub fn scale_to_height(self, height: u32) -> Self {
        Self {
            width: scale_edge(self.width, height, self.height),
            height,
        }
    }

    /// Aspect-preserving resize to the given width.
    pub fn scale_to_width(self, width: u32) -> Self {
        Self {
            width,
            height: scale_edge(self.height, width, self.width),
        }
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Scale `edge` by `target / reference`, rounded, never below one pixel.
fn scale_edge(edge: u32, target: u32, reference: u32) -> u32 {
    if reference == 0 {
        return target.max(1);
    }
    let scaled = (edge as f64 * target as f64 / reference as f64).round();
    (scaled as u32).max(1)
}
