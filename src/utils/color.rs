// src/utils/color.rs

/// Straight (non-premultiplied) RGBA colour, channels in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// 8-bit channels, e.g. `Rgba::rgb8(0xFF, 0x22, 0x00)` for "#FF2200".
    pub const fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0, 1.0)
    }

    pub const fn rgba8(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self::new(r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0, a)
    }

    pub fn with_alpha(self, a: f64) -> Self {
        Self { a: a.clamp(0.0, 1.0), ..self }
    }

    /// Multiplies the alpha channel, used to apply a global alpha.
    pub fn fade(self, factor: f64) -> Self {
        self.with_alpha(self.a * factor)
    }

    pub fn rgb(&self) -> (f64, f64, f64) {
        (self.r, self.g, self.b)
    }

    /// "#RRGGBB" form (alpha dropped), used for GTK markup.
    pub fn to_hex(&self) -> String {
        let c = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02X}{:02X}{:02X}", c(self.r), c(self.g), c(self.b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_round_trip_of_catalog_color() {
        assert_eq!(Rgba::rgb8(0x7A, 0x00, 0xFF).to_hex(), "#7A00FF");
    }

    #[test]
    fn test_fade_clamps() {
        let c = Rgba::WHITE.with_alpha(0.5).fade(4.0);
        assert_eq!(c.a, 1.0);
    }
}
