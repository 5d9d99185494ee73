//! Image type resolution from upload file names.
//!
//! Matching is suffix-based on the lowercased input: anything ending in `png`
//! is PNG, anything ending in `jpg` or `jpeg` is JPEG. A name such as `xpng`
//! therefore resolves to PNG; callers that need a strict extension should
//! split it off first (see [`extension_of`]).

use std::fmt;

use image::ImageFormat;

use crate::error::ImageTypeError;

/// Supported image encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageType {
    Png,
    Jpg,
}

impl ImageType {
    /// Resolve an image type from a file name or extension, case-insensitively.
    pub fn from_name(name: &str) -> Result<Self, ImageTypeError> {
        let lower = name.to_lowercase();

        if lower.ends_with("png") {
            Ok(ImageType::Png)
        } else if lower.ends_with("jpg") || lower.ends_with("jpeg") {
            Ok(ImageType::Jpg)
        } else {
            Err(ImageTypeError::Unsupported {
                name: name.to_string(),
            })
        }
    }

    /// Canonical short name ("png" or "jpg").
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageType::Png => "png",
            ImageType::Jpg => "jpg",
        }
    }

    /// Decoder format for this type.
    pub fn image_format(&self) -> ImageFormat {
        match self {
            ImageType::Png => ImageFormat::Png,
            ImageType::Jpg => ImageFormat::Jpeg,
        }
    }
}

impl fmt::Display for ImageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Return the text after the last `.` in a file name, or `None` if there is none.
///
/// `"photo.tar.png"` yields `"png"`; `"photo"` and `"photo."` yield `None`.
pub fn extension_of(filename: &str) -> Option<&str> {
    match filename.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => Some(ext),
        _ => None,
    }
}
