use std::collections::BTreeMap;

use palette::{Hsl, IntoColor, Srgb};
use serde::{Deserialize, Serialize};

/// 8-bit sRGB colour used throughout the pipeline.
pub type Rgb8 = Srgb<u8>;

// ---------------------------------------------------------------------------
// Palettes
// ---------------------------------------------------------------------------

/// Plotly's ten-colour "G10" qualitative sequence.
const G10: [(u8, u8, u8); 10] = [
    (0x33, 0x66, 0xCC),
    (0xDC, 0x39, 0x12),
    (0xFF, 0x99, 0x00),
    (0x10, 0x96, 0x18),
    (0x99, 0x00, 0x99),
    (0x00, 0x99, 0xC6),
    (0xDD, 0x44, 0x77),
    (0x66, 0xAA, 0x00),
    (0xB8, 0x2E, 0x2E),
    (0x31, 0x63, 0x95),
];

/// Which palette assigns category colours.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaletteKind {
    /// Fixed qualitative sequence, cycled when categories outnumber it.
    #[default]
    G10,
    /// Evenly spaced hues, one per category.
    Hsl,
}

impl PaletteKind {
    /// Colours for `n` categories in sorted order.
    pub fn colors(self, n: usize) -> Vec<Rgb8> {
        match self {
            PaletteKind::G10 => G10
                .iter()
                .cycle()
                .take(n)
                .map(|&(r, g, b)| Srgb::new(r, g, b))
                .collect(),
            PaletteKind::Hsl => generate_palette(n),
        }
    }
}

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Rgb8> {
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            let out: Rgb8 = rgb.into_format();
            out
        })
        .collect()
}

/// `#RRGGBB` notation.
pub fn to_hex(c: Rgb8) -> String {
    format!("#{:02X}{:02X}{:02X}", c.red, c.green, c.blue)
}

// ---------------------------------------------------------------------------
// Color mapping: category → colour
// ---------------------------------------------------------------------------

/// Maps category values to distinct colours, assigned in sorted category
/// order.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Rgb8>,
    default_color: Rgb8,
}

impl ColorMap {
    /// `categories` must already be sorted and distinct.
    pub fn new(categories: &[String], palette: PaletteKind) -> Self {
        let mapping = categories
            .iter()
            .cloned()
            .zip(palette.colors(categories.len()))
            .collect();

        ColorMap {
            mapping,
            default_color: Srgb::new(0xA0, 0xA0, 0xA0),
        }
    }

    /// Look up the colour of a category; unknown categories are grey.
    pub fn color_for(&self, category: &str) -> Rgb8 {
        self.mapping
            .get(category)
            .copied()
            .unwrap_or(self.default_color)
    }
}
