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
            let hsl = Hsl::new(hue, 0.65, 0.5);
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
// Chart colours
// ---------------------------------------------------------------------------

/// Chart series drawn on the dashboard, one colour each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Series {
    OriginCountries,
    DestinationCountries,
    OriginCities,
    DestinationCities,
    OriginAirports,
    DestinationAirports,
    Hours,
    Weekdays,
    Passengers,
    OriginPoints,
    DestinationPoints,
}

impl Series {
    const ALL: [Series; 11] = [
        Series::OriginCountries,
        Series::DestinationCountries,
        Series::OriginCities,
        Series::DestinationCities,
        Series::OriginAirports,
        Series::DestinationAirports,
        Series::Hours,
        Series::Weekdays,
        Series::Passengers,
        Series::OriginPoints,
        Series::DestinationPoints,
    ];
}

/// Fixed colour per dashboard series, generated once.
#[derive(Debug, Clone)]
pub struct ChartColors {
    colors: Vec<Color32>,
}

impl Default for ChartColors {
    fn default() -> Self {
        ChartColors {
            colors: generate_palette(Series::ALL.len()),
        }
    }
}

impl ChartColors {
    pub fn color_for(&self, series: Series) -> Color32 {
        self.colors
            .get(series as usize)
            .copied()
            .unwrap_or(Color32::LIGHT_BLUE)
    }
}
