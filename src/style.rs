//! Colours and font descriptions shared by the layout engine and the renderer.

/// Conversion factor from typographic points to millimetres.
pub const PT_TO_MM: f64 = 25.4 / 72.0;

/// An 8-bit RGB colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    /// Accent blue used for categories and the score.
    pub const ACCENT: Rgb = Rgb(59, 130, 246);
    /// Muted grey used for the footer.
    pub const MUTED: Rgb = Rgb(107, 114, 128);
    /// Card outline.
    pub const BORDER: Rgb = Rgb(229, 231, 235);

    /// Returns the components scaled into the `0.0..=1.0` range.
    pub fn to_unit(self) -> (f64, f64, f64) {
        (
            f64::from(self.0) / 255.0,
            f64::from(self.1) / 255.0,
            f64::from(self.2) / 255.0,
        )
    }
}

/// Font weights available in the report.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FontWeight {
    #[default]
    Regular,
    Bold,
}

/// Everything needed to measure and draw a run of text.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FontSpec {
    pub weight: FontWeight,
    pub size_pt: f64,
    /// Multiplier applied to the font size to get the line advance.
    pub line_height: f64,
    pub color: Rgb,
}

impl FontSpec {
    pub const fn regular(size_pt: f64, line_height: f64) -> Self {
        Self {
            weight: FontWeight::Regular,
            size_pt,
            line_height,
            color: Rgb::BLACK,
        }
    }

    pub const fn bold(size_pt: f64, line_height: f64) -> Self {
        Self {
            weight: FontWeight::Bold,
            size_pt,
            line_height,
            color: Rgb::BLACK,
        }
    }

    pub const fn with_color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    /// Vertical distance between consecutive lines, in millimetres.
    pub fn line_advance(&self) -> f64 {
        self.size_pt * self.line_height * PT_TO_MM
    }

    /// Font size expressed in millimetres.
    pub fn size_mm(&self) -> f64 {
        self.size_pt * PT_TO_MM
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_advance_scales_with_size_and_multiplier() {
        let spec = FontSpec::regular(12.0, 1.2);
        assert!((spec.line_advance() - 12.0 * 1.2 * 25.4 / 72.0).abs() < 1e-9);
    }

    #[test]
    fn unit_components() {
        assert_eq!(Rgb::WHITE.to_unit(), (1.0, 1.0, 1.0));
        assert_eq!(Rgb::BLACK.to_unit(), (0.0, 0.0, 0.0));
    }
}
