use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

/// Line colour of the single-group view.
pub const SINGLE_VIEW_COLOR: Color32 = Color32::from_rgb(31, 119, 180);

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: group label → Color32
// ---------------------------------------------------------------------------

/// Colours for the groups of one comparison, assigned in selection order.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// One palette colour per group; the first group gets hue 0.
    pub fn new(groups: &[String]) -> Self {
        let mapping = groups
            .iter()
            .zip(generate_palette(groups.len()))
            .map(|(g, c)| (g.clone(), c))
            .collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Every group drawn in the same colour.
    pub fn uniform(groups: &[String], color: Color32) -> Self {
        ColorMap {
            mapping: groups.iter().map(|g| (g.clone(), color)).collect(),
            default_color: color,
        }
    }

    /// Look up the colour for a group label.
    pub fn color_for(&self, group: &str) -> Color32 {
        self.mapping
            .get(group)
            .copied()
            .unwrap_or(self.default_color)
    }
}
