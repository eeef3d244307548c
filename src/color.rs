use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Colour of the first series in paired plots.
pub const SERIES_A: Color32 = Color32::from_rgb(66, 110, 230);
/// Colour of the second series in paired plots.
pub const SERIES_B: Color32 = Color32::from_rgb(220, 60, 60);

fn hsl_to_color32(hue: f32, saturation: f32, lightness: f32) -> Color32 {
    let hsl = Hsl::new(hue, saturation, lightness);
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| hsl_to_color32((i as f32 / n as f32) * 360.0, 0.65, 0.65))
        .collect()
}

/// `n` colours sweeping linearly from hue `from` to hue `to` (degrees),
/// one per histogram bin.
pub fn hue_gradient(n: usize, from: f32, to: f32) -> Vec<Color32> {
    match n {
        0 => Vec::new(),
        1 => vec![hsl_to_color32(from, 0.7, 0.55)],
        _ => (0..n)
            .map(|i| {
                let t = i as f32 / (n - 1) as f32;
                hsl_to_color32(from + (to - from) * t, 0.7, 0.55)
            })
            .collect(),
    }
}

/// Red → yellow → green, for grades where higher is better.
pub fn red_to_green(n: usize) -> Vec<Color32> {
    hue_gradient(n, 0.0, 120.0)
}

/// Blue → red, for scores without a good/bad direction.
pub fn cool_to_warm(n: usize) -> Vec<Color32> {
    hue_gradient(n, 220.0, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palettes_have_requested_length() {
        assert!(generate_palette(0).is_empty());
        assert_eq!(generate_palette(7).len(), 7);
        assert_eq!(red_to_green(10).len(), 10);
        assert_eq!(cool_to_warm(1).len(), 1);
    }

    #[test]
    fn gradient_ends_at_its_hues() {
        let colors = red_to_green(5);
        let first = colors[0];
        let last = colors[4];
        assert!(first.r() > first.g());
        assert!(last.g() > last.r());
    }
}
