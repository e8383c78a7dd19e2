use serde::{Deserialize, Deserializer, Serialize};

use super::{ToolId, ToolKind, color_or, default_thickness, default_true, thickness_or_default};
use crate::chart::ChartPoint;
use crate::color::{Color, LineStyle};
use crate::util::ok_or_default;

/// A price level spanning the whole visible time range.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HorizontalLine {
    #[serde(default)]
    pub id: ToolId,
    pub price: f64,
    #[serde(
        default = "HorizontalLine::default_color",
        deserialize_with = "deserialize_color"
    )]
    pub color: Color,
    #[serde(
        default = "default_thickness",
        deserialize_with = "thickness_or_default"
    )]
    pub thickness: f32,
    #[serde(default, deserialize_with = "ok_or_default")]
    pub line_style: LineStyle,
    #[serde(default = "default_true")]
    pub is_visible: bool,
    #[serde(skip, default = "default_true")]
    pub needs_redraw: bool,
}

impl HorizontalLine {
    pub fn new(price: f64) -> Self {
        Self {
            id: ToolId::new(),
            price,
            color: Self::default_color(),
            thickness: default_thickness(),
            line_style: LineStyle::default(),
            is_visible: true,
            needs_redraw: true,
        }
    }

    fn default_color() -> Color {
        ToolKind::HorizontalLine.default_color()
    }

    pub(super) fn update_position(&mut self, point: ChartPoint) {
        self.price = point.price;
    }

    pub(super) fn update_control_point(&mut self, index: usize, point: ChartPoint) -> bool {
        match index {
            0 => {
                self.price = point.price;
                true
            }
            _ => false,
        }
    }
}

fn deserialize_color<'de, D>(deserializer: D) -> Result<Color, D::Error>
where
    D: Deserializer<'de>,
{
    color_or(deserializer, ToolKind::HorizontalLine)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::millis_to_time;

    #[test]
    fn moving_keeps_only_the_price() {
        let mut line = HorizontalLine::new(100.0);

        line.update_position(ChartPoint::new(millis_to_time(5_000), 105.5));
        assert_eq!(line.price, 105.5);

        assert!(line.update_control_point(0, ChartPoint::new(millis_to_time(0), 99.0)));
        assert_eq!(line.price, 99.0);

        assert!(!line.update_control_point(1, ChartPoint::new(millis_to_time(0), 1.0)));
        assert_eq!(line.price, 99.0);
    }
}
