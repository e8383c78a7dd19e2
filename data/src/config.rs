use serde::{Deserialize, Serialize};

pub const MIN_RATIO_BOUND: f64 = 0.01;
pub const MAX_RATIO_BOUND: f64 = 0.95;

/// Layout and interaction tunables for a chart surface.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartConfig {
    pub left_margin: f64,
    pub top_margin: f64,
    /// Width of the price/indicator scale strips on the right.
    pub price_scale_width: f64,
    /// Height of the time scale strip at the bottom.
    pub time_scale_height: f64,
    pub divider_thickness: f64,
    pub divider_hit_tolerance: f64,
    pub min_indicator_ratio: f64,
    pub max_indicator_ratio: f64,
    pub default_indicator_ratio: f64,
    pub scale_drag_sensitivity: f64,
    pub wheel_zoom_in: f64,
    pub wheel_zoom_out: f64,
    pub hit_tolerance: f64,
    pub fit_padding: f64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            left_margin: 10.0,
            top_margin: 10.0,
            price_scale_width: 70.0,
            time_scale_height: 30.0,
            divider_thickness: 6.0,
            divider_hit_tolerance: 4.0,
            min_indicator_ratio: 0.1,
            max_indicator_ratio: 0.5,
            default_indicator_ratio: 0.25,
            scale_drag_sensitivity: 0.005,
            wheel_zoom_in: 0.9,
            wheel_zoom_out: 1.1,
            hit_tolerance: 5.0,
            fit_padding: 1.2,
        }
    }
}

impl ChartConfig {
    /// Parses a config, repairing values that would break layout math.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: ChartConfig = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    pub fn sanitized(self) -> Self {
        let defaults = ChartConfig::default();

        let non_negative = |value: f64, fallback: f64| {
            if value.is_finite() && value >= 0.0 {
                value
            } else {
                fallback
            }
        };
        let positive = |value: f64, fallback: f64| {
            if value.is_finite() && value > 0.0 {
                value
            } else {
                fallback
            }
        };

        let ratio = |value: f64, fallback: f64| {
            if value.is_finite() {
                value.clamp(MIN_RATIO_BOUND, MAX_RATIO_BOUND)
            } else {
                fallback
            }
        };

        let mut min_ratio = ratio(self.min_indicator_ratio, defaults.min_indicator_ratio);
        let mut max_ratio = ratio(self.max_indicator_ratio, defaults.max_indicator_ratio);
        if min_ratio > max_ratio {
            log::warn!(
                "Indicator ratio bounds swapped ({min_ratio} > {max_ratio}), reordering"
            );
            std::mem::swap(&mut min_ratio, &mut max_ratio);
        }

        let default_ratio = ratio(
            self.default_indicator_ratio,
            defaults.default_indicator_ratio,
        )
        .clamp(min_ratio, max_ratio);

        Self {
            left_margin: non_negative(self.left_margin, defaults.left_margin),
            top_margin: non_negative(self.top_margin, defaults.top_margin),
            price_scale_width: non_negative(self.price_scale_width, defaults.price_scale_width),
            time_scale_height: non_negative(self.time_scale_height, defaults.time_scale_height),
            divider_thickness: non_negative(self.divider_thickness, defaults.divider_thickness),
            divider_hit_tolerance: non_negative(
                self.divider_hit_tolerance,
                defaults.divider_hit_tolerance,
            ),
            min_indicator_ratio: min_ratio,
            max_indicator_ratio: max_ratio,
            default_indicator_ratio: default_ratio,
            scale_drag_sensitivity: positive(
                self.scale_drag_sensitivity,
                defaults.scale_drag_sensitivity,
            ),
            wheel_zoom_in: positive(self.wheel_zoom_in, defaults.wheel_zoom_in),
            wheel_zoom_out: positive(self.wheel_zoom_out, defaults.wheel_zoom_out),
            hit_tolerance: non_negative(self.hit_tolerance, defaults.hit_tolerance),
            fit_padding: positive(self.fit_padding, defaults.fit_padding),
        }
    }

    pub fn clamp_indicator_ratio(&self, ratio: f64) -> f64 {
        if ratio.is_finite() {
            ratio.clamp(self.min_indicator_ratio, self.max_indicator_ratio)
        } else {
            self.default_indicator_ratio
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_use_defaults() {
        let config = ChartConfig::from_json(r#"{ "priceScaleWidth": 80.0 }"#).unwrap();

        assert_eq!(config.price_scale_width, 80.0);
        assert_eq!(config.top_margin, ChartConfig::default().top_margin);
        assert_eq!(config.wheel_zoom_out, 1.1);
    }

    #[test]
    fn swapped_ratio_bounds_are_repaired() {
        let config = ChartConfig::from_json(
            r#"{ "minIndicatorRatio": 0.6, "maxIndicatorRatio": 0.2, "defaultIndicatorRatio": 0.9 }"#,
        )
        .unwrap();

        assert_eq!(config.min_indicator_ratio, 0.2);
        assert_eq!(config.max_indicator_ratio, 0.6);
        assert_eq!(config.default_indicator_ratio, 0.6);
    }

    #[test]
    fn negative_margins_fall_back() {
        let config = ChartConfig {
            left_margin: -5.0,
            wheel_zoom_in: 0.0,
            ..ChartConfig::default()
        }
        .sanitized();

        assert_eq!(config.left_margin, 10.0);
        assert_eq!(config.wheel_zoom_in, 0.9);
    }

    #[test]
    fn ratio_clamp_uses_bounds() {
        let config = ChartConfig::default();

        assert_eq!(config.clamp_indicator_ratio(0.03), 0.1);
        assert_eq!(config.clamp_indicator_ratio(0.9), 0.5);
        assert_eq!(config.clamp_indicator_ratio(f64::NAN), 0.25);
    }
}
