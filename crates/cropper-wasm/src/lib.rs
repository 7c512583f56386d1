//! Cropper WASM - WebAssembly bindings for the crop engine
//!
//! This crate exposes cropper-core to a JavaScript view layer. The view layer
//! renders the image and overlay and runs the gesture recognizers; the engine
//! keeps the geometry consistent and reports the final crop.
//!
//! # Module Structure
//!
//! - `cropper` - `JsCropper`, one crop session
//! - `geometry` - Fit and clamp helpers
//! - `size` - Image size from encoded bytes
//! - `types` - Parsing of plain JavaScript inputs
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsCropper } from '@cropper/wasm';
//!
//! await init();
//!
//! const cropper = new JsCropper(uri, { aspectRatio: 4 / 3 }, getImageSize);
//! cropper.onContainerLayout(0, 0, 390, 700);
//! ```

use wasm_bindgen::prelude::*;

mod cropper;
mod geometry;
mod size;
mod types;

// Re-export public types
pub use cropper::JsCropper;
pub use geometry::{clamp, create_aspect_ratio_rectangle, resize};
pub use size::image_size_from_bytes;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
