use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::{
    ToolId, ToolKind, color_or, default_thickness, default_true, shift_span, thickness_or_default,
};
use crate::chart::ChartPoint;
use crate::color::{Color, LineStyle};
use crate::util::ok_or_default;

/// Axis-aligned box between two opposite corners, in either order.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rectangle {
    #[serde(default)]
    pub id: ToolId,
    pub start_time: DateTime<Utc>,
    pub start_price: f64,
    pub end_time: DateTime<Utc>,
    pub end_price: f64,
    #[serde(
        default = "Rectangle::default_color",
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

impl Rectangle {
    pub fn new(start: ChartPoint, end: ChartPoint) -> Self {
        Self {
            id: ToolId::new(),
            start_time: start.time,
            start_price: start.price,
            end_time: end.time,
            end_price: end.price,
            color: Self::default_color(),
            thickness: default_thickness(),
            line_style: LineStyle::default(),
            is_visible: true,
            needs_redraw: true,
        }
    }

    fn default_color() -> Color {
        ToolKind::Rectangle.default_color()
    }

    pub fn min_time(&self) -> DateTime<Utc> {
        self.start_time.min(self.end_time)
    }

    pub fn max_time(&self) -> DateTime<Utc> {
        self.start_time.max(self.end_time)
    }

    pub fn min_price(&self) -> f64 {
        self.start_price.min(self.end_price)
    }

    pub fn max_price(&self) -> f64 {
        self.start_price.max(self.end_price)
    }

    pub fn centroid(&self) -> ChartPoint {
        ChartPoint::new(self.start_time, self.start_price)
            .midpoint(ChartPoint::new(self.end_time, self.end_price))
    }

    /// Corners as `(time, price)`: `(start, start)`, `(end, start)`,
    /// `(end, end)`, `(start, end)`. Index `i` is diagonal to `(i + 2) % 4`.
    pub fn control_points(&self) -> [ChartPoint; 4] {
        [
            ChartPoint::new(self.start_time, self.start_price),
            ChartPoint::new(self.end_time, self.start_price),
            ChartPoint::new(self.end_time, self.end_price),
            ChartPoint::new(self.start_time, self.end_price),
        ]
    }

    pub(super) fn update_position(&mut self, point: ChartPoint) {
        let centroid = self.centroid();
        let delta_time = point.time - centroid.time;
        let delta_price = point.price - centroid.price;

        shift_span(&mut self.start_time, &mut self.end_time, delta_time);
        self.start_price += delta_price;
        self.end_price += delta_price;
    }

    pub(super) fn update_control_point(&mut self, index: usize, point: ChartPoint) -> bool {
        match index {
            0 => {
                self.start_time = point.time;
                self.start_price = point.price;
            }
            1 => {
                self.end_time = point.time;
                self.start_price = point.price;
            }
            2 => {
                self.end_time = point.time;
                self.end_price = point.price;
            }
            3 => {
                self.start_time = point.time;
                self.end_price = point.price;
            }
            _ => return false,
        }
        true
    }
}

fn deserialize_color<'de, D>(deserializer: D) -> Result<Color, D::Error>
where
    D: Deserializer<'de>,
{
    color_or(deserializer, ToolKind::Rectangle)
}
