//! Image size bindings.
//!
//! Hosts that hold the file bytes can build their `getImageSize` on top of
//! [`image_size_from_bytes`]:
//!
//! ```typescript
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const size = imageSizeFromBytes(bytes); // { width, height }, EXIF rotation applied
//! const cropper = new JsCropper(uri, config, () => size);
//! ```

use cropper_core::size;
use wasm_bindgen::prelude::*;

/// Read the displayed dimensions of a JPEG or PNG without decoding pixels.
///
/// # Errors
/// Returns error if the header cannot be read
#[wasm_bindgen(js_name = imageSizeFromBytes)]
pub fn image_size_from_bytes(bytes: &[u8]) -> Result<JsValue, JsValue> {
    let size = size::image_size_from_bytes(bytes).map_err(|e| JsValue::from_str(&e.to_string()))?;
    serde_wasm_bindgen::to_value(&size).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_invalid_bytes() {
        assert!(image_size_from_bytes(&[0x00, 0x01, 0x02]).is_err());
    }
}
