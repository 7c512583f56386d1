//! Error types for the cropper boundary.

use thiserror::Error;

/// Errors raised where the engine meets its collaborators.
///
/// The geometry and gesture reducers never fail; these come from image-size
/// lookup and from operations that need a measured container.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CropperError {
    /// The image-size provider failed.
    #[error("Image size lookup failed: {0}")]
    ImageSize(String),

    /// The provider returned an unusable natural size.
    #[error("Invalid image size: {width}x{height}")]
    InvalidImageSize { width: u32, height: u32 },

    /// The container has not been laid out yet.
    #[error("Container has not been measured")]
    ContainerNotMeasured,

    /// Encoded bytes could not be read.
    #[error("Could not read image header: {0}")]
    Decode(String),
}
