//! Image sizing for transformation previews.

use serde::{Deserialize, Serialize};

/// Size used when nothing better is known.
pub const DEFAULT_IMAGE_SIZE: u32 = 1000;

/// Transformation kind that fills the canvas to an aspect ratio.
pub const FILL: &str = "fill";

/// A preset output aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AspectRatio {
    pub key: &'static str,
    pub label: &'static str,
    pub width: u32,
    pub height: u32,
}

/// Known aspect-ratio presets.
pub const ASPECT_RATIOS: &[AspectRatio] = &[
    AspectRatio {
        key: "1:1",
        label: "Square (1:1)",
        width: 1000,
        height: 1000,
    },
    AspectRatio {
        key: "3:4",
        label: "Standard Portrait (3:4)",
        width: 1000,
        height: 1334,
    },
    AspectRatio {
        key: "9:16",
        label: "Phone Portrait (9:16)",
        width: 1000,
        height: 1778,
    },
];

impl AspectRatio {
    /// Looks up a preset by key, e.g. `"3:4"`.
    pub fn from_key(key: &str) -> Option<Self> {
        ASPECT_RATIOS.iter().find(|r| r.key == key).copied()
    }

    /// Returns the requested dimension.
    pub fn get(&self, dimension: Dimension) -> u32 {
        match dimension {
            Dimension::Width => self.width,
            Dimension::Height => self.height,
        }
    }
}

/// Which side of an image to measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Width,
    Height,
}

/// Stored size information for an image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageDimensions {
    #[serde(default)]
    pub aspect_ratio: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

impl ImageDimensions {
    fn get(&self, dimension: Dimension) -> Option<u32> {
        match dimension {
            Dimension::Width => self.width,
            Dimension::Height => self.height,
        }
    }
}

/// Returns the display size of `image` along `dimension`.
///
/// `fill` transformations use the aspect-ratio preset; anything else uses the
/// image's own size. Falls back to [`DEFAULT_IMAGE_SIZE`].
pub fn image_size(kind: &str, image: &ImageDimensions, dimension: Dimension) -> u32 {
    let size = if kind == FILL {
        image
            .aspect_ratio
            .as_deref()
            .and_then(AspectRatio::from_key)
            .map(|ratio| ratio.get(dimension))
    } else {
        image.get(dimension)
    };
    size.filter(|&s| s > 0).unwrap_or(DEFAULT_IMAGE_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(aspect_ratio: Option<&str>, width: Option<u32>, height: Option<u32>) -> ImageDimensions {
        ImageDimensions {
            aspect_ratio: aspect_ratio.map(str::to_string),
            width,
            height,
        }
    }

    #[test]
    fn test_fill_uses_aspect_ratio() {
        let portrait = image(Some("9:16"), Some(400), Some(300));
        assert_eq!(image_size("fill", &portrait, Dimension::Width), 1000);
        assert_eq!(image_size("fill", &portrait, Dimension::Height), 1778);

        let standard = image(Some("3:4"), None, None);
        assert_eq!(image_size("fill", &standard, Dimension::Height), 1334);
    }

    #[test]
    fn test_fill_unknown_ratio_defaults() {
        let img = image(Some("2:1"), Some(400), Some(300));
        assert_eq!(image_size("fill", &img, Dimension::Height), DEFAULT_IMAGE_SIZE);
        assert_eq!(image_size("fill", &image(None, None, None), Dimension::Width), DEFAULT_IMAGE_SIZE);
    }

    #[test]
    fn test_other_kinds_use_own_size() {
        let img = image(Some("1:1"), Some(640), None);
        assert_eq!(image_size("restore", &img, Dimension::Width), 640);
        assert_eq!(image_size("restore", &img, Dimension::Height), DEFAULT_IMAGE_SIZE);
    }

    #[test]
    fn test_deserialize_camel_case() {
        let img: ImageDimensions = serde_json::from_str(r#"{"aspectRatio":"3:4","width":10}"#).unwrap();
        assert_eq!(img, image(Some("3:4"), Some(10), None));
    }
}
