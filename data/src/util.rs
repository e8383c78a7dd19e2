use serde::{Deserialize, Deserializer};

/// Deserializes a field, falling back to `T::default()` when the stored value
/// does not fit the expected shape.
pub fn ok_or_default<'de, T, D>(deserializer: D) -> Result<T, D::Error>
where
    T: Deserialize<'de> + Default,
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

pub fn abbr_large_numbers(value: f64, max_decimals: Option<usize>) -> String {
    let abs_value = value.abs();
    let sign = if value < 0.0 { "-" } else { "" };

    match abs_value {
        v if v >= 1_000_000_000.0 => format!("{}{:.2}b", sign, v / 1_000_000_000.0),
        v if v >= 1_000_000.0 => format!("{}{:.2}m", sign, v / 1_000_000.0),
        v if v >= 1_000.0 => format!("{}{:.1}k", sign, v / 1_000.0),
        v if v >= 100.0 => format!("{}{:.0}", sign, v),
        v if v >= 10.0 => format!("{}{:.1}", sign, v),
        v if v >= 1.0 => format!("{}{:.2}", sign, v),
        _ => {
            let precision = max_decimals.unwrap_or(3);
            let rounded = (abs_value * 10_f64.powi(precision as i32)).round();
            if rounded == 0.0 {
                "0".to_string()
            } else {
                format!("{}{:.precision$}", sign, abs_value, precision = precision)
            }
        }
    }
}

/// Number of decimals needed to print multiples of `step` without losing digits.
pub fn decimals_for_step(step: f64) -> usize {
    if !step.is_finite() || step <= 0.0 || step >= 1.0 {
        return 0;
    }

    (-step.log10().floor()).max(0.0) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abbreviates_by_magnitude() {
        assert_eq!(abbr_large_numbers(1_500_000.0, None), "1.50m");
        assert_eq!(abbr_large_numbers(-2_500.0, None), "-2.5k");
        assert_eq!(abbr_large_numbers(150.0, None), "150");
        assert_eq!(abbr_large_numbers(0.0001, Some(2)), "0");
    }

    #[test]
    fn decimals_follow_step_magnitude() {
        assert_eq!(decimals_for_step(50.0), 0);
        assert_eq!(decimals_for_step(0.5), 1);
        assert_eq!(decimals_for_step(0.02), 2);
        assert_eq!(decimals_for_step(0.0), 0);
    }
}
