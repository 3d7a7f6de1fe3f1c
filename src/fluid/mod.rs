//! Fluid `clamp()` sizes interpolated between a mobile and a desktop value.

use serde::Deserialize;

pub const ROOT_FONT_SIZE_PX: f64 = 16.0;
pub const DEFAULT_VIEWPORT_MIN_PX: f64 = 640.0;
pub const DEFAULT_VIEWPORT_MAX_PX: f64 = 1440.0;

/// Viewport widths the fluid value interpolates across.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewportRange {
    pub min: f64,
    pub max: f64,
}

impl Default for ViewportRange {
    fn default() -> Self {
        Self {
            min: DEFAULT_VIEWPORT_MIN_PX,
            max: DEFAULT_VIEWPORT_MAX_PX,
        }
    }
}

impl ViewportRange {
    /// Returns `None` unless `0 <= min < max` and both bounds are finite.
    pub fn new(min: f64, max: f64) -> Option<Self> {
        let range = Self { min, max };
        range.is_valid().then_some(range)
    }

    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min >= 0.0 && self.min < self.max
    }
}

/// Builds `clamp(<min>rem, calc(<min>rem + (1vw - <offset>px) * <slope>), <max>rem)`.
///
/// `min_px` is not required to be smaller than `max_px`; callers pass the
/// mobile value as the minimum.
pub fn fluid_size(min_px: f64, max_px: f64, viewport: ViewportRange) -> String {
    let min_rem = normalize_zero(min_px / ROOT_FONT_SIZE_PX);
    let max_rem = normalize_zero(max_px / ROOT_FONT_SIZE_PX);

    let offset = fixed4(viewport.min / 100.0);
    let slope = fixed4((max_px - min_px) / (viewport.max - viewport.min) * 100.0);
    let preferred = format!("calc({min_rem}rem + (1vw - {offset}px) * {slope})");

    format!("clamp({min_rem}rem, {preferred}, {max_rem}rem)")
}

/// Desktop/mobile pair helper: desktop is the upper bound, mobile the lower.
pub fn responsive_size(desktop_px: f64, mobile_px: f64, viewport: ViewportRange) -> String {
    fluid_size(mobile_px, desktop_px, viewport)
}

// Fifth-decimal ties are exact doubles; 30 digits always tells them apart
// from their neighbours.
const EXACT_DIGITS: usize = 30;

/// Four decimals, ties rounded away from zero (`Number.prototype.toFixed`).
///
/// `{:.4}` alone rounds exact ties to even, turning `0.03125` into `0.0312`.
fn fixed4(value: f64) -> String {
    let value = normalize_zero(value);
    if !value.is_finite() {
        return format!("{value:.4}");
    }

    let exact = format!("{:.*}", EXACT_DIGITS, value.abs());
    let (int_part, frac) = exact.split_once('.').unwrap_or((exact.as_str(), ""));
    let mut digits: Vec<char> = int_part.chars().chain(frac.chars().take(4)).collect();
    if frac.chars().nth(4).is_some_and(|digit| digit >= '5') {
        round_up(&mut digits);
    }

    let split = digits.len() - 4;
    let sign = if value < 0.0 { "-" } else { "" };
    let whole: String = digits[..split].iter().collect();
    let fraction: String = digits[split..].iter().collect();
    format!("{sign}{whole}.{fraction}")
}

fn round_up(digits: &mut Vec<char>) {
    for digit in digits.iter_mut().rev() {
        if *digit == '9' {
            *digit = '0';
        } else {
            *digit = char::from(*digit as u8 + 1);
            return;
        }
    }
    digits.insert(0, '1');
}

// `-0` would otherwise render as "-0" / "-0.0000".
fn normalize_zero(value: f64) -> f64 {
    if value == 0.0 {
        0.0
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn equal_bounds_yield_one_rem_and_zero_slope() {
        assert_eq!(
            fluid_size(16.0, 16.0, ViewportRange::default()),
            "clamp(1rem, calc(1rem + (1vw - 6.4000px) * 0.0000), 1rem)"
        );
    }

    #[test]
    fn mobile_to_desktop_spacing_interpolates() {
        assert_eq!(
            fluid_size(12.0, 16.0, ViewportRange::default()),
            "clamp(0.75rem, calc(0.75rem + (1vw - 6.4000px) * 0.5000), 1rem)"
        );
    }

    #[test]
    fn slope_is_rounded_to_four_digits() {
        // 7 / 800 * 100
        assert_eq!(
            fluid_size(40.0, 47.0, ViewportRange::default()),
            "clamp(2.5rem, calc(2.5rem + (1vw - 6.4000px) * 0.8750), 2.9375rem)"
        );
        // 4 / 840 * 100 = 0.47619...
        let narrow = ViewportRange::new(360.0, 1200.0).unwrap();
        assert_eq!(
            fluid_size(14.0, 18.0, narrow),
            "clamp(0.875rem, calc(0.875rem + (1vw - 3.6000px) * 0.4762), 1.125rem)"
        );
    }

    #[test]
    fn slope_ties_round_away_from_zero() {
        // 0.25 / 800 * 100 = 0.03125 exactly
        let viewport = ViewportRange::default();
        assert_eq!(
            responsive_size(0.25, 0.0, viewport),
            "clamp(0rem, calc(0rem + (1vw - 6.4000px) * 0.0313), 0.015625rem)"
        );
        assert!(responsive_size(0.0, 0.25, viewport).contains("* -0.0313)"));
    }

    #[test]
    fn fixed4_matches_to_fixed() {
        assert_eq!(fixed4(0.03125), "0.0313");
        assert_eq!(fixed4(-0.03125), "-0.0313");
        assert_eq!(fixed4(6.4), "6.4000");
        assert_eq!(fixed4(0.0), "0.0000");
        assert_eq!(fixed4(-0.0), "0.0000");
        assert_eq!(fixed4(0.476190476), "0.4762");
        assert_eq!(fixed4(0.00004), "0.0000");
        assert_eq!(fixed4(9.99996), "10.0000");
        assert_eq!(fixed4(-2.5), "-2.5000");
        assert_eq!(fixed4(1234.5), "1234.5000");
    }

    #[test]
    fn reversed_bounds_produce_negative_slope() {
        assert_eq!(
            fluid_size(16.0, 8.0, ViewportRange::default()),
            "clamp(1rem, calc(1rem + (1vw - 6.4000px) * -1.0000), 0.5rem)"
        );
    }

    #[test]
    fn responsive_size_treats_desktop_as_max() {
        let viewport = ViewportRange::default();
        assert_eq!(
            responsive_size(16.0, 12.0, viewport),
            fluid_size(12.0, 16.0, viewport)
        );
    }

    #[test]
    fn zero_lower_bound_renders_without_sign() {
        assert_eq!(
            fluid_size(-0.0, 0.0, ViewportRange::default()),
            "clamp(0rem, calc(0rem + (1vw - 6.4000px) * 0.0000), 0rem)"
        );
    }

    #[test]
    fn viewport_range_rejects_inverted_or_empty_ranges() {
        assert!(ViewportRange::new(640.0, 1440.0).is_some());
        assert!(ViewportRange::new(1440.0, 640.0).is_none());
        assert!(ViewportRange::new(800.0, 800.0).is_none());
        assert!(ViewportRange::new(-1.0, 800.0).is_none());
        assert!(ViewportRange::new(f64::NAN, 800.0).is_none());
    }

    proptest! {
        #[test]
        fn output_has_clamp_shape(min in 0u32..400, max in 0u32..400, vmin in 0u32..1000, width in 1u32..2000) {
            let (min, max) = (f64::from(min), f64::from(max));
            let viewport = ViewportRange::new(f64::from(vmin), f64::from(vmin + width)).unwrap();
            let value = fluid_size(min, max, viewport);

            let lower = format!("{}rem", min / 16.0);
            let upper = format!("{}rem", max / 16.0);
            let offset = format!("{:.4}px", f64::from(vmin) / 100.0);
            let prefix = format!("clamp({lower}, calc({lower} + (1vw - {offset}) * ");
            let suffix = format!("), {upper})");
            prop_assert!(value.starts_with(&prefix), "{} should start with {}", value, prefix);
            prop_assert!(value.ends_with(&suffix), "{} should end with {}", value, suffix);
        }
    }
}
