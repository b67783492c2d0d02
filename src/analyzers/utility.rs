/// Computes the arithmetic mean of a slice of values. Returns `None` for empty input.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

pub fn min(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::min)
}

pub fn max(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

/// Rounds to two decimal places from the exact decimal expansion of `value`.
/// Exact ties go to the even hundredth, so `0.125` becomes `0.12` and
/// `0.375` becomes `0.38`.
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let magnitude = value.abs();
    let exact = format!("{:.30}", magnitude);
    let Some((int, frac)) = exact.split_once('.') else {
        return value;
    };

    let tie = frac.as_bytes()[2] == b'5' && frac.bytes().skip(3).all(|b| b == b'0');
    let truncated: Option<u64> = format!("{}{}", int, &frac[..2]).parse().ok();
    let rounded = match truncated {
        Some(cents) if tie => (cents + cents % 2) as f64 / 100.0,
        _ => format!("{:.2}", magnitude).parse().unwrap_or(magnitude),
    };
    rounded.copysign(value)
}

/// Formats a ratio in [0, 1] as a one-decimal percentage, e.g. `"33.3%"`.
pub fn percent(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[1.0, 3.0]), Some(2.0));
    }

    #[test]
    fn test_min_max() {
        let v = [2.5, 0.5, 1.75];
        assert_eq!(min(&v), Some(0.5));
        assert_eq!(max(&v), Some(2.5));
        assert_eq!(min(&[]), None);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(0.6 * (8.0 / 24.0) + 0.4), 0.6);
        assert_eq!(round2(0.6 * 0.25), 0.15);
        assert_eq!(round2(0.123), 0.12);
    }

    #[test]
    fn test_round2_uses_exact_binary_value() {
        // 0.6 * 82/240 + 0.4 is just below 0.605 in binary
        assert_eq!(round2(0.6 * (82.0 / 240.0) + 0.4), 0.60);
        assert_eq!(round2(0.6 * (122.0 / 240.0)), 0.30);
        assert_eq!(round2(0.6 * (14.0 / 240.0) + 0.4), 0.43);
    }

    #[test]
    fn test_round2_exact_ties_go_to_even() {
        assert_eq!(round2(0.125), 0.12);
        assert_eq!(round2(0.375), 0.38);
        assert_eq!(round2(0.625), 0.62);
        assert_eq!(round2(0.875), 0.88);
        assert_eq!(round2(-0.125), -0.12);
    }

    #[test]
    fn test_round2_passes_through_non_finite() {
        assert!(round2(f64::NAN).is_nan());
        assert_eq!(round2(f64::INFINITY), f64::INFINITY);
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(1.0 / 3.0), "33.3%");
        assert_eq!(percent(0.0), "0.0%");
        assert_eq!(percent(1.0), "100.0%");
    }
}
