/// Multipliers for the recognized damage unit codes, keyed by uppercase letter.
const UNIT_MULTIPLIERS: [(&str, f64); 3] = [
    ("K", 1_000.0),
    ("M", 1_000_000.0),
    ("B", 1_000_000_000.0),
];

/// Scale factor for a unit code. Unknown, empty or numeric codes mean the
/// magnitude is already in dollars.
pub fn unit_multiplier(unit_code: &str) -> f64 {
    UNIT_MULTIPLIERS
        .iter()
        .find(|(code, _)| code.eq_ignore_ascii_case(unit_code))
        .map(|&(_, multiplier)| multiplier)
        .unwrap_or(1.0)
}

/// Converts a damage magnitude and its unit code into dollars.
///
/// The magnitude is trusted as-is: negative or non-finite values are scaled
/// like any other number instead of being rejected.
pub fn normalize(magnitude: f64, unit_code: &str) -> f64 {
    magnitude * unit_multiplier(unit_code)
}
