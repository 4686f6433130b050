//! Framing style for the primary track.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How the primary track is fitted onto the canvas.
///
/// Only the exact string `"overlay"` selects [`FramingStyle::Overlay`];
/// every other value falls back to [`FramingStyle::Shrink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FramingStyle {
    /// Resize to full canvas height, keeping aspect ratio
    Overlay,
    /// Fixed resize to canvas width by 75% of canvas height
    #[default]
    Shrink,
}

impl FramingStyle {
    /// Returns the style name as used in logs and serialized output.
    pub fn as_str(&self) -> &'static str {
        match self {
            FramingStyle::Overlay => "overlay",
            FramingStyle::Shrink => "shrink",
        }
    }
}

impl From<&str> for FramingStyle {
    fn from(s: &str) -> Self {
        if s == "overlay" {
            FramingStyle::Overlay
        } else {
            FramingStyle::Shrink
        }
    }
}

impl From<String> for FramingStyle {
    fn from(s: String) -> Self {
        FramingStyle::from(s.as_str())
    }
}

impl From<FramingStyle> for String {
    fn from(style: FramingStyle) -> Self {
        style.as_str().to_string()
    }
}

impl fmt::Display for FramingStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_is_exact_match() {
        assert_eq!(FramingStyle::from("overlay"), FramingStyle::Overlay);
        assert_eq!(FramingStyle::from("Overlay"), FramingStyle::Shrink);
        assert_eq!(FramingStyle::from("stacked"), FramingStyle::Shrink);
        assert_eq!(FramingStyle::from(""), FramingStyle::Shrink);
    }

    #[test]
    fn test_serde_accepts_any_string() {
        let style: FramingStyle = serde_json::from_str("\"overlay\"").unwrap();
        assert_eq!(style, FramingStyle::Overlay);

        let style: FramingStyle = serde_json::from_str("\"side_by_side\"").unwrap();
        assert_eq!(style, FramingStyle::Shrink);
        assert_eq!(serde_json::to_string(&style).unwrap(), "\"shrink\"");
    }
}
