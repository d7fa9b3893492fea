use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::filter::STAGE_COUNT;

pub const APPROVED: Color32 = Color32::from_rgb(46, 160, 67);
pub const REJECTED: Color32 = Color32::from_rgb(207, 34, 46);
pub const ARROW: Color32 = Color32::from_rgb(192, 192, 192);

// ---------------------------------------------------------------------------
// Stage palette
// ---------------------------------------------------------------------------

/// `n` visually distinct colours on evenly spaced hues.
fn hue_ring(n: usize, saturation: f32, lightness: f32) -> Vec<Color32> {
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let rgb: Srgb = Hsl::new(hue, saturation, lightness).into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// One accent colour per pipeline stage, used for headings and chart labels.
#[derive(Debug, Clone)]
pub struct StagePalette {
    colors: Vec<Color32>,
}

impl Default for StagePalette {
    fn default() -> Self {
        Self {
            colors: hue_ring(STAGE_COUNT, 0.6, 0.45),
        }
    }
}

impl StagePalette {
    pub fn color_for(&self, stage: usize) -> Color32 {
        self.colors.get(stage).copied().unwrap_or(Color32::GRAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_distinct_colour_per_stage() {
        let p = StagePalette::default();
        let colors: Vec<Color32> = (0..STAGE_COUNT).map(|i| p.color_for(i)).collect();
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_eq!(p.color_for(STAGE_COUNT), Color32::GRAY);
    }
}
