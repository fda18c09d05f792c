#![forbid(unsafe_code)]

//! Headless chord diagram rendering.
//!
//! [`DiagramRenderer`] owns a persistent [`Surface`] and redraws it from a weight matrix on every
//! [`DiagramRenderer::update_diagram`] call. Geometry comes from a [`LayoutEngine`]; the default
//! [`D3LayoutEngine`] reproduces d3-chord and d3-shape output.

pub mod color;
pub mod engine;
pub mod format;
pub mod model;
pub mod renderer;
pub mod settings;
pub mod surface;

pub use color::{OrdinalScale, Rgb, scheme};
pub use engine::{D3LayoutEngine, LayoutEngine};
pub use format::PrefixFormat;
pub use model::{ChordDiagramLayout, GroupLayout, RibbonLayout, TickLayout};
pub use renderer::DiagramRenderer;
pub use settings::{DiagramSettings, Radii};
pub use surface::{Element, Surface};

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Input(#[from] chordgram_core::Error),
    #[error(transparent)]
    Layout(#[from] chordgram_layout::Error),
    #[error("viewport must be finite and positive, got {width}x{height}")]
    InvalidViewport { width: f64, height: f64 },
    #[error("invalid number format specifier: {specifier:?}")]
    InvalidFormatSpecifier { specifier: String },
    #[error("unknown color palette: {name}")]
    UnknownPalette { name: String },
    #[error("invalid color: {color:?}")]
    InvalidColor { color: String },
    #[error("invalid setting `{key}`: {message}")]
    InvalidSetting { key: String, message: String },
    #[error("layout JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Pixel size of the drawing area. The diagram is centered on the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 960.0,
        }
    }
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Result<Self> {
        let ok = |v: f64| v.is_finite() && v > 0.0;
        if !(ok(width) && ok(height)) {
            return Err(Error::InvalidViewport { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn min_side(&self) -> f64 {
        self.width.min(self.height)
    }
}
