//! Geometry helper bindings.
//!
//! Exposes the pure fit helpers so the view layer can size its own elements
//! the same way the engine does.

use cropper_core::geometry;
use wasm_bindgen::prelude::*;

use crate::types::resize_mode_from_str;

/// Fit a `width` x `height` box into a container.
///
/// # Arguments
/// * `mode` - `"contain"` (default) or `"cover"`
///
/// # Returns
/// `{ width, height, scale }`
#[wasm_bindgen]
pub fn resize(
    container_width: f64,
    container_height: f64,
    width: f64,
    height: f64,
    mode: &str,
) -> Result<JsValue, JsValue> {
    let resized = geometry::resize(
        container_width,
        container_height,
        width,
        height,
        resize_mode_from_str(mode),
    );
    serde_wasm_bindgen::to_value(&resized).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Rectangle with `aspect_ratio`, constrained by the smaller side.
///
/// # Returns
/// `{ width, height }`
#[wasm_bindgen(js_name = createAspectRatioRectangle)]
pub fn create_aspect_ratio_rectangle(
    width: f64,
    height: f64,
    aspect_ratio: f64,
) -> Result<JsValue, JsValue> {
    let size = geometry::create_aspect_ratio_rectangle(width, height, aspect_ratio);
    serde_wasm_bindgen::to_value(&size).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Clamp `value` into `[min, max]`; `max` wins when the range is inverted.
#[wasm_bindgen]
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    geometry::clamp(value, min, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(3.0, 0.0, 2.0), 2.0);
        assert_eq!(clamp(-1.0, 0.0, 2.0), 0.0);
        assert_eq!(clamp(1.5, 0.0, 2.0), 1.5);
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use cropper_core::{Resized, Size};
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_resize_contain() {
        let value = resize(100.0, 100.0, 500.0, 250.0, "contain").unwrap();
        let resized: Resized = serde_wasm_bindgen::from_value(value).unwrap();
        assert_eq!((resized.width, resized.height, resized.scale), (100.0, 50.0, 0.2));
    }

    #[wasm_bindgen_test]
    fn test_create_aspect_ratio_rectangle() {
        let value = create_aspect_ratio_rectangle(100.0, 50.0, 1.0).unwrap();
        let size: Size = serde_wasm_bindgen::from_value(value).unwrap();
        assert_eq!(size, Size::new(50.0, 50.0));
    }
}
