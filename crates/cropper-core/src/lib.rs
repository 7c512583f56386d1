//! Cropper Core - Interactive crop geometry and gesture engine
//!
//! This crate keeps three coordinate spaces consistent while the user drags a
//! crop box and pans or pinches the image under it: the container (the
//! viewport), the crop box (display coordinates) and the image layout (the
//! image at scale 1). On completion it reports the crop region in source-image
//! pixels.
//!
//! # Components
//!
//! - [`geometry`]: pure fit, aspect-ratio and clamp helpers
//! - [`frame`]: cumulative-to-incremental gesture trackers
//! - [`animation`]: shared values with host-driven transitions
//! - [`crop_box`]: handle-drag state machine
//! - [`image_view`]: pan / pinch state machine
//! - [`cropper`]: the orchestrator wiring both together
//! - [`overlay`]: per-frame presentation derivations
//! - [`size`]: natural image size lookup
//!
//! The engine renders nothing and owns no clock. The host forwards gesture
//! events, calls `tick` every frame and draws from the display values.

pub mod animation;
pub mod config;
pub mod crop_box;
pub mod cropper;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod gesture;
pub mod image_view;
pub mod overlay;
pub mod size;
pub mod timer;
pub mod types;

pub use config::{AspectRatio, CropperConfig, ScreenMetrics};
pub use crop_box::{CropBox, CropBoxFit, CropBoxNotice};
pub use cropper::{Cropper, CropperEvent, FooterState};
pub use error::CropperError;
pub use geometry::{clamp, create_aspect_ratio_rectangle, min_cropper_size, resize, ResizeMode, Resized};
pub use gesture::{GestureEvent, GestureState, Handle};
pub use image_view::{ImageNotice, ImageTransform, ImageView};
pub use overlay::Overlay;
pub use size::{image_size_from_bytes, BytesImageSize, ImageSizeProvider, Orientation};
pub use types::{Edges, ImageSize, Point, Rect, Size};
