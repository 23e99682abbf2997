use super::models::point::Rgb;

const BLUE: Rgb = Rgb::new(0, 0, 255);
const WHITE: Rgb = Rgb::new(255, 255, 255);
const RED: Rgb = Rgb::new(255, 0, 0);

/// Blend offset of the anti-correlated (blue to white) segment.
pub const NEGATIVE_BLEND_OFFSET: f64 = 0.75;
/// Blend offset of the correlated (white to red) segment.
pub const POSITIVE_BLEND_OFFSET: f64 = 0.25;

/// Maps a correlation coefficient to a diverging blue-white-red color.
///
/// Two independent linear blends meet at zero:
///
/// - `value < 0`: `t = value + 0.75`, color `= blue * (1 - t) + white * t`
/// - `value >= 0`: `t = value + 0.25`, color `= red * t + white * (1 - t)`
///
/// The blends are not continuous at zero (`-0.0` and `+0.0` both take the second
/// branch and give `(255, 191, 191)`, while values just below zero give
/// `(191, 191, 255)`). `t` itself is never clamped, so values beyond `±0.75` push a
/// channel outside `[0, 255]`; each channel is clamped to that range before rounding.
/// Non-finite input maps to black.
pub fn correlation_color(value: f64) -> Rgb {
    if value < 0.0 {
        let t = value + NEGATIVE_BLEND_OFFSET;
        blend(BLUE, WHITE, t)
    } else {
        let t = value + POSITIVE_BLEND_OFFSET;
        blend(WHITE, RED, t)
    }
}

/// `from * (1 - t) + to * t`, per channel.
fn blend(from: Rgb, to: Rgb, t: f64) -> Rgb {
    Rgb::new(
        channel(from.r, to.r, t),
        channel(from.g, to.g, t),
        channel(from.b, to.b, t),
    )
}

fn channel(from: u8, to: u8, t: f64) -> u8 {
    let mixed = f64::from(from) * (1.0 - t) + f64::from(to) * t;
    if mixed.is_nan() {
        return 0;
    }
    mixed.clamp(0.0, 255.0).round() as u8
}
