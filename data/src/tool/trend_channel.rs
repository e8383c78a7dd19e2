use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::{
    ToolId, ToolKind, color_or, default_thickness, default_true, shift_span, thickness_or_default,
};
use crate::chart::ChartPoint;
use crate::color::{Color, LineStyle};
use crate::util::ok_or_default;

pub const PARALLEL_START: usize = 2;
pub const PARALLEL_END: usize = 3;
pub const PARALLEL_MIDPOINT: usize = 4;
pub const BASE_MIDPOINT: usize = 5;

/// Two parallel segments over the same time span. The second line is the
/// base line shifted by `parallel_offset` in price.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendChannel {
    #[serde(default)]
    pub id: ToolId,
    pub start_time: DateTime<Utc>,
    pub start_price: f64,
    pub end_time: DateTime<Utc>,
    pub end_price: f64,
    #[serde(default)]
    pub parallel_offset: f64,
    #[serde(
        default = "TrendChannel::default_color",
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

impl TrendChannel {
    pub fn new(start: ChartPoint, end: ChartPoint, parallel_offset: f64) -> Self {
        Self {
            id: ToolId::new(),
            start_time: start.time,
            start_price: start.price,
            end_time: end.time,
            end_price: end.price,
            parallel_offset,
            color: Self::default_color(),
            thickness: default_thickness(),
            line_style: LineStyle::default(),
            is_visible: true,
            needs_redraw: true,
        }
    }

    fn default_color() -> Color {
        ToolKind::TrendChannel.default_color()
    }

    /// Base line as `(start, end)`.
    pub fn base_line(&self) -> (ChartPoint, ChartPoint) {
        (
            ChartPoint::new(self.start_time, self.start_price),
            ChartPoint::new(self.end_time, self.end_price),
        )
    }

    /// Parallel line as `(start, end)`.
    pub fn parallel_line(&self) -> (ChartPoint, ChartPoint) {
        (
            ChartPoint::new(self.start_time, self.start_price + self.parallel_offset),
            ChartPoint::new(self.end_time, self.end_price + self.parallel_offset),
        )
    }

    pub fn base_midpoint(&self) -> ChartPoint {
        let (start, end) = self.base_line();
        start.midpoint(end)
    }

    pub fn parallel_midpoint(&self) -> ChartPoint {
        let (start, end) = self.parallel_line();
        start.midpoint(end)
    }

    /// Center of all four corners.
    pub fn centroid(&self) -> ChartPoint {
        self.base_midpoint().midpoint(self.parallel_midpoint())
    }

    /// Base start, base end, parallel start, parallel end, parallel midpoint,
    /// base midpoint.
    pub fn control_points(&self) -> [ChartPoint; 6] {
        let (base_start, base_end) = self.base_line();
        let (parallel_start, parallel_end) = self.parallel_line();

        [
            base_start,
            base_end,
            parallel_start,
            parallel_end,
            self.parallel_midpoint(),
            self.base_midpoint(),
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
                self.end_price = point.price;
            }
            PARALLEL_START => {
                self.start_time = point.time;
                self.parallel_offset = point.price - self.start_price;
            }
            PARALLEL_END => {
                self.end_time = point.time;
                self.parallel_offset = point.price - self.end_price;
            }
            PARALLEL_MIDPOINT => {
                let midpoint_price = (self.start_price + self.end_price) / 2.0;
                self.parallel_offset = point.price - midpoint_price;
            }
            BASE_MIDPOINT => {
                // the parallel line keeps its price, so the offset absorbs the shift
                let delta = point.price - self.base_midpoint().price;
                self.start_price += delta;
                self.end_price += delta;
                self.parallel_offset -= delta;
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
    color_or(deserializer, ToolKind::TrendChannel)
}
