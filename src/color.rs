use crate::core::Rgb8;

/// Subtractive mixture of two colors: invert the normalized additive sum.
///
/// The channel-wise sum is scaled by the single largest channel when the peak
/// exceeds 255 (rather than clamping per channel), which preserves the hue
/// ratios of the additive sum before inversion. Every downstream consumer of
/// the mixed color depends on that property.
///
/// Rounding uses `f64::round` (ties away from zero); the scale step keeps
/// every channel in `[0, 255]` before inversion.
pub fn mix_subtractive(a: Rgb8, b: Rgb8) -> Rgb8 {
    let sum = [
        f64::from(a.r) + f64::from(b.r),
        f64::from(a.g) + f64::from(b.g),
        f64::from(a.b) + f64::from(b.b),
    ];

    let peak = sum[0].max(sum[1]).max(sum[2]);
    let scale = if peak <= 255.0 { 1.0 } else { 255.0 / peak };

    let invert = |c: f64| (255.0 - c * scale).round().clamp(0.0, 255.0) as u8;
    Rgb8::new(invert(sum[0]), invert(sum[1]), invert(sum[2]))
}
