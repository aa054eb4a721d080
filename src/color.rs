use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

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
// Color mapping: model id → Color32
// ---------------------------------------------------------------------------

/// Maps model ids to distinct prediction-line colours, fixed at startup so a
/// model keeps its colour as others are toggled on and off. The ground-truth
/// line is always [`ColorMap::GROUND_TRUTH`].
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Solid black, like the actual-values trace of the source dashboards.
    pub const GROUND_TRUTH: Color32 = Color32::BLACK;

    /// Build a colour map over all known model ids.
    pub fn new<'a>(model_ids: impl Iterator<Item = &'a str>) -> Self {
        let ids: Vec<&str> = model_ids.collect();
        let palette = generate_palette(ids.len());
        let mapping: BTreeMap<String, Color32> = ids
            .into_iter()
            .zip(palette)
            .map(|(id, c)| (id.to_string(), c))
            .collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a model id.
    pub fn color_for(&self, model_id: &str) -> Color32 {
        self.mapping
            .get(model_id)
            .copied()
            .unwrap_or(self.default_color)
    }
}
