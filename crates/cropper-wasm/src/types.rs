//! Conversions between JavaScript inputs and core types.
//!
//! Plain strings and numbers are parsed here without touching `JsValue`, so
//! they can be tested natively. Object inputs go through
//! `serde-wasm-bindgen` at the call sites.

use std::time::Duration;

use cropper_core::{Handle, ResizeMode};

/// Parse a handle name (`"topLeft"`, `"right"`, ...).
///
/// Unknown names map to `None`, which the crop box ignores.
pub(crate) fn handle_from_str(name: &str) -> Handle {
    match name {
        "topLeft" => Handle::TopLeft,
        "topRight" => Handle::TopRight,
        "bottomLeft" => Handle::BottomLeft,
        "bottomRight" => Handle::BottomRight,
        "top" => Handle::Top,
        "left" => Handle::Left,
        "right" => Handle::Right,
        "bottom" => Handle::Bottom,
        _ => Handle::None,
    }
}

/// Parse a resize mode. Anything other than `"cover"` is `Contain`.
pub(crate) fn resize_mode_from_str(mode: &str) -> ResizeMode {
    match mode {
        "cover" => ResizeMode::Cover,
        _ => ResizeMode::Contain,
    }
}

/// Convert a frame delta in milliseconds. Negative or non-finite values
/// become zero.
pub(crate) fn duration_from_ms(ms: f64) -> Duration {
    if ms.is_finite() && ms > 0.0 {
        Duration::from_secs_f64(ms / 1000.0)
    } else {
        Duration::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_from_str() {
        assert_eq!(handle_from_str("topLeft"), Handle::TopLeft);
        assert_eq!(handle_from_str("bottomRight"), Handle::BottomRight);
        assert_eq!(handle_from_str("left"), Handle::Left);
        assert_eq!(handle_from_str("middle"), Handle::None);
    }

    #[test]
    fn test_every_handle_parses() {
        let names = [
            "topLeft",
            "topRight",
            "bottomLeft",
            "bottomRight",
            "top",
            "left",
            "right",
            "bottom",
        ];
        let parsed: Vec<Handle> = names.iter().map(|name| handle_from_str(name)).collect();
        assert_eq!(parsed, Handle::ALL.to_vec());
    }

    #[test]
    fn test_resize_mode_from_str() {
        assert_eq!(resize_mode_from_str("cover"), ResizeMode::Cover);
        assert_eq!(resize_mode_from_str("contain"), ResizeMode::Contain);
        assert_eq!(resize_mode_from_str(""), ResizeMode::Contain);
    }

    #[test]
    fn test_duration_from_ms() {
        assert_eq!(duration_from_ms(16.0), Duration::from_millis(16));
        assert_eq!(duration_from_ms(-5.0), Duration::ZERO);
        assert_eq!(duration_from_ms(f64::NAN), Duration::ZERO);
        assert_eq!(duration_from_ms(f64::INFINITY), Duration::ZERO);
    }
}
