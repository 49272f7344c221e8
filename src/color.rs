use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Mix, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

fn to_color32(hsl: Hsl) -> Color32 {
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0) as u8,
    )
}

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            to_color32(Hsl::new(hue, 0.75, 0.55))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Continuous scale: price → Color32
// ---------------------------------------------------------------------------

/// Maps a value within `[lo, hi]` onto a blue → yellow gradient.
#[derive(Debug, Clone, Copy)]
pub struct PriceScale {
    lo: f64,
    hi: f64,
}

impl PriceScale {
    pub fn new(lo: f64, hi: f64) -> Self {
        PriceScale { lo, hi }
    }

    pub fn color_for(&self, value: f64) -> Color32 {
        let span = self.hi - self.lo;
        let t = if span > 0.0 {
            ((value - self.lo) / span).clamp(0.0, 1.0) as f32
        } else {
            0.0
        };
        let cold = Hsl::new(240.0, 0.70, 0.45);
        let hot = Hsl::new(55.0, 0.90, 0.55);
        to_color32(cold.mix(hot, t))
    }
}

// ---------------------------------------------------------------------------
// Categorical mapping: bedroom count → Color32
// ---------------------------------------------------------------------------

/// Maps each distinct bedroom count to a distinct colour.
#[derive(Debug, Clone)]
pub struct BedroomColors {
    mapping: BTreeMap<u32, Color32>,
    default_color: Color32,
}

impl BedroomColors {
    /// Build the map from the bedroom counts present in the data.
    pub fn new(counts: impl IntoIterator<Item = u32>) -> Self {
        let unique: BTreeSet<u32> = counts.into_iter().collect();
        let palette = generate_palette(unique.len());
        let mapping = unique.into_iter().zip(palette).collect();

        BedroomColors {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    pub fn color_for(&self, bedrooms: u32) -> Color32 {
        self.mapping
            .get(&bedrooms)
            .copied()
            .unwrap_or(self.default_color)
    }
}
