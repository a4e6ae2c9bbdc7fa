//! Pace arithmetic and `m:ss.hh` formatting.

pub const DEFAULT_PACE_BASIS_M: u32 = 100;

/// Seconds per `basis_m` meters: `(time / distance) * basis`.
///
/// Any non-positive input yields `None`; a pace is never invented.
pub fn pace_per(distance_m: f64, time_sec: f64, basis_m: f64) -> Option<f64> {
    if !(distance_m > 0.0 && time_sec > 0.0 && basis_m > 0.0) {
        return None;
    }
    Some((time_sec / distance_m) * basis_m)
}

/// Round to two decimals, ties to even (`6.125` → `6.12`).
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Mean of `sum` over `count` items, rounded to two decimals; `None` when empty.
pub fn mean2(sum: f64, count: usize) -> Option<f64> {
    if count == 0 {
        return None;
    }
    Some(round2(sum / count as f64))
}

/// Format seconds as `m:ss.hh`, e.g. `78.14` → `"1:18.14"`.
///
/// The value is rounded to whole hundredths before it is split, so a carry
/// moves into the seconds and minutes (`59.995` → `"1:00.00"`).
pub fn format_seconds(seconds: Option<f64>) -> Option<String> {
    let seconds = seconds?;
    if !seconds.is_finite() || seconds < 0.0 {
        return None;
    }

    let total_hundredths = (seconds * 100.0).round() as u64;
    let minutes = total_hundredths / 6000;
    let rem = total_hundredths % 6000;
    let secs = rem / 100;
    let hundredths = rem % 100;

    Some(format!("{}:{:02}.{:02}", minutes, secs, hundredths))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pace_formula() {
        assert_eq!(pace_per(400.0, 300.0, 100.0), Some(75.0));
        assert_eq!(pace_per(400.0, 300.0, 50.0), Some(37.5));
    }

    #[test]
    fn pace_is_none_on_zero_inputs() {
        assert_eq!(pace_per(0.0, 300.0, 100.0), None);
        assert_eq!(pace_per(400.0, 0.0, 100.0), None);
        assert_eq!(pace_per(400.0, 300.0, 0.0), None);
    }

    #[test]
    fn format_examples() {
        assert_eq!(format_seconds(Some(78.14)).as_deref(), Some("1:18.14"));
        assert_eq!(format_seconds(Some(5.07)).as_deref(), Some("0:05.07"));
        assert_eq!(format_seconds(Some(0.0)).as_deref(), Some("0:00.00"));
        assert_eq!(format_seconds(Some(600.5)).as_deref(), Some("10:00.50"));
        assert_eq!(format_seconds(None), None);
    }

    #[test]
    fn format_carries_after_rounding() {
        assert_eq!(format_seconds(Some(59.995)).as_deref(), Some("1:00.00"));
        assert_eq!(format_seconds(Some(119.999)).as_deref(), Some("2:00.00"));
    }

    #[test]
    fn mean_of_nothing_is_none() {
        assert_eq!(mean2(10.0, 0), None);
        assert_eq!(mean2(547.0, 10), Some(54.7));
        assert_eq!(mean2(433.0, 8), Some(54.12));
    }
}
