//! HSB color swatches and the HSB→HSL conversion used for display.
//!
//! The experiment presents colors in an HSB-like model (hue in degrees,
//! saturation and brightness as percentages) but backgrounds and swatch
//! rendering use CSS `hsl(...)` strings, so everything funnels through one
//! conversion function.

use std::fmt;

use serde::Serialize;

/// A color in the HSB model: hue in degrees `[0, 360]`, saturation and
/// brightness as percentages `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColorSwatch {
    pub hue: f64,
    pub saturation: f64,
    pub brightness: f64,
}

impl ColorSwatch {
    pub fn new(hue: f64, saturation: f64, brightness: f64) -> Self {
        Self {
            hue,
            saturation,
            brightness,
        }
    }

    /// The HSL form of this swatch.
    pub fn to_hsl(&self) -> Hsl {
        hsb_to_hsl(self.hue, self.saturation, self.brightness)
    }
}

/// Formats as the experiment's color-log text, e.g. `hsb(60, 33.3%, 99.9%)`.
impl fmt::Display for ColorSwatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hsb({}, {}%, {}%)",
            Num(self.hue),
            Num(self.saturation),
            Num(self.brightness)
        )
    }
}

/// A color in the HSL model, all components stored unrounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

/// Formats as a CSS color string, e.g. `hsl(240, 1.5228426395939085%, 10.835%)`.
impl fmt::Display for Hsl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hsl({}, {}%, {}%)", Num(self.h), Num(self.s), Num(self.l))
    }
}

/// Convert an HSB color to HSL.
///
/// Takes hue in degrees `[0, 360]` and saturation/brightness as percentages
/// `[0, 100]`. Saturation and brightness are normalized to `[0, 1]`, then
/// `l = (2 - s) * b / 2` and `sl = s * b / (2l)` for `l < 0.5`, otherwise
/// `sl = s * b / (2 - 2l)`. All arithmetic stays in f64 with no rounding.
///
/// The raw formula has a zero denominator at `l` of exactly 0 or 1; such
/// colors carry no chroma, and their saturation is defined as 0.
pub fn hsb_to_hsl(h: f64, s: f64, b: f64) -> Hsl {
    let s = s / 100.0;
    let b = b / 100.0;

    let l = (2.0 - s) * b / 2.0;
    let sl = if l < 0.5 {
        s * b / (l * 2.0)
    } else {
        s * b / (2.0 - l * 2.0)
    };
    let sl = if sl.is_finite() { sl } else { 0.0 };

    Hsl {
        h,
        s: sl * 100.0,
        l: l * 100.0,
    }
}

/// f64 display that mirrors JavaScript number-to-string output: integral
/// values print without a decimal point, everything else prints the
/// shortest round-trip representation.
struct Num(f64);

impl fmt::Display for Num {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_finite() && self.0 == self.0.trunc() {
            write!(f, "{}", self.0 as i64)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-12,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_white_has_zero_saturation() {
        let hsl = hsb_to_hsl(0.0, 0.0, 100.0);
        assert_eq!(hsl.h, 0.0);
        assert_eq!(hsl.s, 0.0);
        assert_eq!(hsl.l, 100.0);
    }

    #[test]
    fn test_light_background_triple() {
        let hsl = hsb_to_hsl(240.0, 2.0, 97.0);
        assert_eq!(hsl.h, 240.0);
        assert_close(hsl.s, 24.433249370277036);
        assert_close(hsl.l, 96.02999999999999);
    }

    #[test]
    fn test_dark_background_triple() {
        let hsl = hsb_to_hsl(240.0, 3.0, 11.0);
        assert_eq!(hsl.h, 240.0);
        assert_close(hsl.s, 1.5228426395939085);
        assert_close(hsl.l, 10.835);
    }

    #[test]
    fn test_mid_background_triple() {
        let hsl = hsb_to_hsl(240.0, 3.0, 57.0);
        assert_eq!(hsl.h, 240.0);
        assert_close(hsl.s, 1.9496066583057796);
        assert_close(hsl.l, 56.14499999999999);
    }

    #[test]
    fn test_black_has_zero_saturation() {
        // b = 0 drives l to 0, the other degenerate denominator.
        let hsl = hsb_to_hsl(120.0, 50.0, 0.0);
        assert_eq!(hsl.s, 0.0);
        assert_eq!(hsl.l, 0.0);
    }

    #[test]
    fn test_swatch_display_text() {
        let swatch = ColorSwatch::new(60.0, 33.3, 99.9);
        assert_eq!(swatch.to_string(), "hsb(60, 33.3%, 99.9%)");

        let swatch = ColorSwatch::new(360.0, 99.9, 66.7);
        assert_eq!(swatch.to_string(), "hsb(360, 99.9%, 66.7%)");
    }

    #[test]
    fn test_hsl_display_text() {
        let hsl = hsb_to_hsl(240.0, 3.0, 11.0);
        assert_eq!(
            hsl.to_string(),
            "hsl(240, 1.5228426395939085%, 10.835%)"
        );
    }

    #[test]
    fn test_swatch_to_hsl_matches_free_function() {
        let swatch = ColorSwatch::new(180.0, 66.7, 33.3);
        let direct = hsb_to_hsl(180.0, 66.7, 33.3);
        assert_eq!(swatch.to_hsl(), direct);
    }
}
