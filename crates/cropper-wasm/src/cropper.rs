//! Crop session bindings.
//!
//! [`JsCropper`] wraps a core `Cropper` for a JavaScript view layer. The host
//! forwards container layouts and recognizer events, calls `tick` from
//! `requestAnimationFrame` and reads `overlay()` / `imageTransform()` to draw.
//!
//! # Example
//!
//! ```typescript
//! const cropper = new JsCropper(uri, { aspectRatio: 'original' }, (uri) => sizes[uri]);
//! cropper.onContainerLayout(0, 0, width, height);
//!
//! cropper.panGesture({ state: 'active', translationX: 12, translationY: -3 });
//! cropper.tick(16);
//!
//! cropper.done();
//! for (const event of cropper.drainEvents()) {
//!   if (event.type === 'done') upload(event.rect);
//! }
//! ```

use cropper_core::{
    Cropper, CropperConfig, CropperError, GestureEvent, ImageSize, ImageSizeProvider, Rect,
};
use wasm_bindgen::prelude::*;

use crate::types::{duration_from_ms, handle_from_str};

/// Size provider calling a synchronous JavaScript `getImageSize(uri)`.
///
/// The function must return `{ width, height }` already corrected for EXIF
/// rotation.
pub(crate) struct JsImageSize {
    get_image_size: js_sys::Function,
}

impl ImageSizeProvider for JsImageSize {
    fn image_size(&mut self, uri: &str) -> Result<ImageSize, CropperError> {
        let result = self
            .get_image_size
            .call1(&JsValue::NULL, &JsValue::from_str(uri))
            .map_err(|e| {
                web_sys::console::error_1(&e);
                CropperError::ImageSize(format!("getImageSize threw for {uri}"))
            })?;

        serde_wasm_bindgen::from_value(result).map_err(|e| CropperError::ImageSize(e.to_string()))
    }
}

/// A crop session for JavaScript.
#[wasm_bindgen]
pub struct JsCropper {
    inner: Cropper<JsImageSize>,
}

#[wasm_bindgen]
impl JsCropper {
    /// Create a session.
    ///
    /// # Arguments
    /// * `uri` - Opaque image identifier handed to `getImageSize`
    /// * `config` - `{ aspectRatio?, rounded?, scaleMax?, hideFooter?, screen? }`
    /// * `get_image_size` - `(uri) => ({ width, height })`
    ///
    /// # Errors
    /// Returns error if `config` cannot be deserialized
    #[wasm_bindgen(constructor)]
    pub fn new(
        uri: String,
        config: JsValue,
        get_image_size: js_sys::Function,
    ) -> Result<JsCropper, JsValue> {
        let config: CropperConfig = if config.is_undefined() || config.is_null() {
            CropperConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Invalid cropper config: {}", e)))?
        };

        Ok(JsCropper {
            inner: Cropper::new(uri, config, JsImageSize { get_image_size }),
        })
    }

    /// True once the image size is known and the layout is computed.
    #[wasm_bindgen(getter, js_name = isReady)]
    pub fn is_ready(&self) -> bool {
        self.inner.is_ready()
    }

    /// Report the measured container. Starts the session on the first
    /// non-empty layout.
    #[wasm_bindgen(js_name = onContainerLayout)]
    pub fn on_container_layout(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.inner
            .on_container_layout(Rect::new(x, y, width, height));
        if self.inner.container().is_some() && !self.inner.is_ready() {
            web_sys::console::error_1(&JsValue::from_str(
                "cropper: initialization failed, see the log for details",
            ));
        }
    }

    /// Forward a handle drag event.
    ///
    /// # Arguments
    /// * `handle` - `"topLeft"`, `"top"`, ... (unknown names are ignored)
    /// * `event` - `{ state, translationX, translationY }`
    #[wasm_bindgen(js_name = cropBoxGesture)]
    pub fn crop_box_gesture(&mut self, handle: &str, event: JsValue) -> Result<(), JsValue> {
        let event = gesture_from_js(event)?;
        self.inner.crop_box_gesture(handle_from_str(handle), &event);
        Ok(())
    }

    /// Forward an image pan event (`{ state, translationX, translationY, velocityX, velocityY }`).
    #[wasm_bindgen(js_name = panGesture)]
    pub fn pan_gesture(&mut self, event: JsValue) -> Result<(), JsValue> {
        let event = gesture_from_js(event)?;
        self.inner.pan_gesture(&event);
        Ok(())
    }

    /// Forward an image pinch event (`{ state, scale, focalX, focalY }`).
    #[wasm_bindgen(js_name = pinchGesture)]
    pub fn pinch_gesture(&mut self, event: JsValue) -> Result<(), JsValue> {
        let event = gesture_from_js(event)?;
        self.inner.pinch_gesture(&event);
        Ok(())
    }

    /// Advance animations and the settle timer by `ms` milliseconds.
    pub fn tick(&mut self, ms: f64) {
        self.inner.tick(duration_from_ms(ms));
    }

    pub fn done(&mut self) {
        self.inner.done();
    }

    pub fn reset(&mut self) {
        self.inner.reset();
    }

    pub fn cancel(&mut self) {
        self.inner.cancel();
    }

    /// Backdrop, grid and handle rectangles for the current frame.
    pub fn overlay(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.overlay())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// `{ translateX, translateY, scale, width, height }` of the image.
    #[wasm_bindgen(js_name = imageTransform)]
    pub fn image_transform(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.image_transform())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// `{ doneActive, resetActive, hidden }`.
    #[wasm_bindgen(js_name = footerState)]
    pub fn footer_state(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.footer_state())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Take every queued `{ type, rect? }` event.
    #[wasm_bindgen(js_name = drainEvents)]
    pub fn drain_events(&mut self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.drain_events())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

fn gesture_from_js(event: JsValue) -> Result<GestureEvent, JsValue> {
    serde_wasm_bindgen::from_value(event)
        .map_err(|e| JsValue::from_str(&format!("Invalid gesture event: {}", e)))
}
