/// Formats a number the way query values are written: integral values
/// without a fractional part, everything else in shortest form.
///
/// # Arguments
///
/// * `value` - The number to format.
///
/// # Returns
///
/// `"1500"` for `1500.0`, `"0.25"` for `0.25`.
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Parses a string into a boolean value.
///
/// # Arguments
///
/// * `s` - The string to parse ("1", "true" for true, anything else for false).
///
/// # Returns
///
/// `true` if the string is "1" or "true" (case-insensitive), `false` otherwise.
pub fn parse_boolean(s: &str) -> bool {
    matches!(s.trim().to_lowercase().as_str(), "1" | "true")
}

/// Parses an aspect ratio written as `"W:H"` into `W / H`.
///
/// Returns `None` for malformed input or a non-positive height.
pub fn parse_aspect_ratio(ar: &str) -> Option<f64> {
    let (w, h) = ar.split_once(':')?;
    let w = w.trim().parse::<f64>().ok()?;
    let h = h.trim().parse::<f64>().ok()?;
    if w <= 0.0 || h <= 0.0 {
        return None;
    }
    Some(w / h)
}
