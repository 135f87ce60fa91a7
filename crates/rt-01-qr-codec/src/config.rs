//! Visual rendering configuration for QR labels.
//!
//! These parameters affect only how the payload bytes are rendered into a
//! 2D barcode image by the (external) renderer; they carry no semantics and
//! never influence encode/decode.

use serde::{Deserialize, Serialize};

/// Error-correction level of the rendered barcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EcLevel {
    L,
    M,
    Q,
    H,
}

/// Rendering configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QrRenderConfig {
    /// Rendered image width in pixels.
    pub width_px: u32,
    /// Quiet-zone margin in modules.
    pub margin_modules: u32,
    /// Error-correction level.
    pub error_correction: EcLevel,
    /// Dark module color, `#rrggbb`.
    pub dark_color: String,
    /// Light module color, `#rrggbb`.
    pub light_color: String,
}

impl Default for QrRenderConfig {
    fn default() -> Self {
        Self {
            width_px: 200,
            margin_modules: 2,
            error_correction: EcLevel::M,
            dark_color: "#22c55e".to_string(),
            light_color: "#ffffff".to_string(),
        }
    }
}
