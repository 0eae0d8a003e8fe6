//! Magnetic reference line ("Linha Magnética").

/// Calculates the magnetic reference line for each index of `trend`.
///
/// While the trend is rising the line sits below it, otherwise above it, by
/// `dispersion * std_mult + force_mag`. Direction at index 0 compares the trend
/// with itself and is therefore never "up".
///
/// `trend` and `dispersion` must be the same length; the output matches it.
pub fn reference_line(
    trend: &[f64],
    dispersion: &[f64],
    std_mult: f64,
    force_mag: f64,
) -> Vec<f64> {
    debug_assert_eq!(trend.len(), dispersion.len());

    trend
        .iter()
        .zip(dispersion)
        .enumerate()
        .map(|(i, (&value, &std_dev))| {
            let is_up = value > trend[i.saturating_sub(1)];
            let deviation = std_dev * std_mult;

            let raw = if is_up { value - deviation } else { value + deviation };
            if is_up { raw - force_mag } else { raw + force_mag }
        })
        .collect()
}
