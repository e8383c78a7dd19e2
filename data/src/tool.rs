pub mod horizontal_line;
pub mod rectangle;
pub mod trend_channel;
pub mod trend_line;

pub use horizontal_line::HorizontalLine;
pub use rectangle::Rectangle;
pub use trend_channel::TrendChannel;
pub use trend_line::TrendLine;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::chart::ChartPoint;
use crate::color::{Color, LineStyle};

pub const DEFAULT_THICKNESS: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ToolId(Uuid);

impl ToolId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ToolId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ToolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum ToolKind {
    HorizontalLine,
    TrendLine,
    TrendChannel,
    Rectangle,
}

impl ToolKind {
    pub const ALL: [ToolKind; 4] = [
        ToolKind::HorizontalLine,
        ToolKind::TrendLine,
        ToolKind::TrendChannel,
        ToolKind::Rectangle,
    ];

    /// Clicks needed to place a tool of this kind.
    pub fn required_points(self) -> usize {
        match self {
            ToolKind::HorizontalLine => 1,
            ToolKind::TrendLine | ToolKind::Rectangle => 2,
            ToolKind::TrendChannel => 3,
        }
    }

    pub fn default_color(self) -> Color {
        match self {
            ToolKind::HorizontalLine => Color::ORANGE,
            ToolKind::TrendLine => Color::BLUE,
            ToolKind::TrendChannel => Color::PURPLE,
            ToolKind::Rectangle => Color::GREEN,
        }
    }

    /// Builds the finished tool once every anchor has been placed.
    pub fn build(self, anchors: &[ChartPoint]) -> Option<Tool> {
        if anchors.len() < self.required_points() {
            return None;
        }

        self.from_anchors(anchors)
    }

    /// Builds a tool from the anchors placed so far plus the cursor position,
    /// for display while the user is still clicking.
    pub fn preview(self, anchors: &[ChartPoint], cursor: ChartPoint) -> Option<Tool> {
        let mut points = anchors.to_vec();
        points.push(cursor);

        let mut tool = match self {
            ToolKind::TrendChannel if points.len() == 2 => {
                Tool::TrendChannel(TrendChannel::new(points[0], points[1], 0.0))
            }
            _ => self.from_anchors(&points)?,
        };

        tool.set_line_style(LineStyle::Dashed);
        tool.set_color(tool.color().scale_alpha(0.6));
        Some(tool)
    }

    fn from_anchors(self, anchors: &[ChartPoint]) -> Option<Tool> {
        match (self, anchors) {
            (ToolKind::HorizontalLine, [point, ..]) => {
                Some(Tool::HorizontalLine(HorizontalLine::new(point.price)))
            }
            (ToolKind::TrendLine, [start, end, ..]) => {
                Some(Tool::TrendLine(TrendLine::new(*start, *end)))
            }
            (ToolKind::Rectangle, [start, end, ..]) => {
                Some(Tool::Rectangle(Rectangle::new(*start, *end)))
            }
            (ToolKind::TrendChannel, [start, end, offset_point, ..]) => {
                let midpoint_price = (start.price + end.price) / 2.0;
                Some(Tool::TrendChannel(TrendChannel::new(
                    *start,
                    *end,
                    offset_point.price - midpoint_price,
                )))
            }
            _ => None,
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ToolKind::HorizontalLine => write!(f, "Horizontal Line"),
            ToolKind::TrendLine => write!(f, "Trend Line"),
            ToolKind::TrendChannel => write!(f, "Trend Channel"),
            ToolKind::Rectangle => write!(f, "Rectangle"),
        }
    }
}

/// An annotation drawn over the price pane.
///
/// Persisted as a JSON object whose `type` field names the variant.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type")]
pub enum Tool {
    HorizontalLine(HorizontalLine),
    TrendLine(TrendLine),
    TrendChannel(TrendChannel),
    Rectangle(Rectangle),
}

macro_rules! each_tool {
    ($tool:expr, $inner:ident => $body:expr) => {
        match $tool {
            Tool::HorizontalLine($inner) => $body,
            Tool::TrendLine($inner) => $body,
            Tool::TrendChannel($inner) => $body,
            Tool::Rectangle($inner) => $body,
        }
    };
}

impl Tool {
    pub fn kind(&self) -> ToolKind {
        match self {
            Tool::HorizontalLine(_) => ToolKind::HorizontalLine,
            Tool::TrendLine(_) => ToolKind::TrendLine,
            Tool::TrendChannel(_) => ToolKind::TrendChannel,
            Tool::Rectangle(_) => ToolKind::Rectangle,
        }
    }

    pub fn id(&self) -> ToolId {
        each_tool!(self, tool => tool.id)
    }

    pub fn color(&self) -> Color {
        each_tool!(self, tool => tool.color)
    }

    pub fn set_color(&mut self, color: Color) {
        each_tool!(self, tool => tool.color = color);
        self.mark_for_redraw();
    }

    pub fn thickness(&self) -> f32 {
        each_tool!(self, tool => tool.thickness)
    }

    pub fn set_thickness(&mut self, thickness: f32) {
        if thickness.is_finite() && thickness > 0.0 {
            each_tool!(self, tool => tool.thickness = thickness);
            self.mark_for_redraw();
        }
    }

    pub fn line_style(&self) -> LineStyle {
        each_tool!(self, tool => tool.line_style)
    }

    pub fn set_line_style(&mut self, line_style: LineStyle) {
        each_tool!(self, tool => tool.line_style = line_style);
        self.mark_for_redraw();
    }

    pub fn is_visible(&self) -> bool {
        each_tool!(self, tool => tool.is_visible)
    }

    pub fn set_visible(&mut self, visible: bool) {
        each_tool!(self, tool => tool.is_visible = visible);
        self.mark_for_redraw();
    }

    pub fn needs_redraw(&self) -> bool {
        each_tool!(self, tool => tool.needs_redraw)
    }

    pub fn mark_for_redraw(&mut self) {
        each_tool!(self, tool => tool.needs_redraw = true);
    }

    pub fn clear_redraw(&mut self) {
        each_tool!(self, tool => tool.needs_redraw = false);
    }

    /// Draggable handles in chart space, indexed as `update_control_point` expects.
    ///
    /// A horizontal line has no time coordinate, so its single handle (index 0)
    /// is the line itself and is resolved in view space.
    pub fn control_points(&self) -> Vec<ChartPoint> {
        match self {
            Tool::HorizontalLine(_) => Vec::new(),
            Tool::TrendLine(line) => line.control_points().to_vec(),
            Tool::TrendChannel(channel) => channel.control_points().to_vec(),
            Tool::Rectangle(rectangle) => rectangle.control_points().to_vec(),
        }
    }

    /// Center of the defining points; `None` for shapes without a time anchor.
    pub fn centroid(&self) -> Option<ChartPoint> {
        match self {
            Tool::HorizontalLine(_) => None,
            Tool::TrendLine(line) => Some(line.centroid()),
            Tool::TrendChannel(channel) => Some(channel.centroid()),
            Tool::Rectangle(rectangle) => Some(rectangle.centroid()),
        }
    }

    /// Moves the whole shape so its centroid lands on `point`.
    pub fn update_position(&mut self, point: ChartPoint) {
        each_tool!(self, tool => tool.update_position(point));
        self.mark_for_redraw();
    }

    pub fn update_control_point(&mut self, index: usize, point: ChartPoint) {
        let updated = each_tool!(self, tool => tool.update_control_point(index, point));

        if updated {
            self.mark_for_redraw();
        } else {
            log::debug!(
                "Ignoring control point {index} for {} {}",
                self.kind(),
                self.id()
            );
        }
    }

    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Tool, Error> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Serializes tools as a JSON array, in drawing order.
pub fn to_json(tools: &[Tool]) -> Result<String, Error> {
    Ok(serde_json::to_string_pretty(tools)?)
}

/// Parses a JSON array of tools. Elements that fail to parse are skipped
/// so a single bad entry does not discard the rest.
pub fn from_json(json: &str) -> Result<Vec<Tool>, Error> {
    let values: Vec<serde_json::Value> = serde_json::from_str(json)?;

    let tools = values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match Tool::deserialize(value) {
            Ok(tool) => Some(tool),
            Err(err) => {
                log::warn!("Skipping annotation #{index}: {err}");
                None
            }
        })
        .collect();

    Ok(tools)
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid annotation JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Shifts both ends by `delta`, or neither when either would leave the
/// representable time range.
pub(crate) fn shift_span(
    start: &mut DateTime<Utc>,
    end: &mut DateTime<Utc>,
    delta: chrono::Duration,
) -> bool {
    match (start.checked_add_signed(delta), end.checked_add_signed(delta)) {
        (Some(new_start), Some(new_end)) => {
            *start = new_start;
            *end = new_end;
            true
        }
        _ => {
            log::debug!("Time shift by {delta} out of range, keeping times");
            false
        }
    }
}

pub(crate) fn default_thickness() -> f32 {
    DEFAULT_THICKNESS
}

pub(crate) fn default_true() -> bool {
    true
}

pub(crate) fn thickness_or_default<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;

    match value.as_f64() {
        Some(thickness) if thickness.is_finite() && thickness > 0.0 => Ok(thickness as f32),
        _ => {
            log::warn!("Invalid line thickness {value}, using {DEFAULT_THICKNESS}");
            Ok(DEFAULT_THICKNESS)
        }
    }
}

pub(crate) fn color_or<'de, D>(deserializer: D, kind: ToolKind) -> Result<Color, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;

    match value.as_str().map(str::parse::<Color>) {
        Some(Ok(color)) => Ok(color),
        Some(Err(err)) => {
            log::warn!("{kind}: {err}, using default color");
            Ok(kind.default_color())
        }
        None => Ok(kind.default_color()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::millis_to_time;
    use quickcheck_macros::quickcheck;

    const HOUR_MS: u64 = 3_600_000;

    fn point(hours: u64, price: f64) -> ChartPoint {
        ChartPoint::new(millis_to_time(1_700_000_000_000 + hours * HOUR_MS), price)
    }

    fn sample_tools() -> Vec<Tool> {
        let mut dashed = TrendLine::new(point(0, 100.0), point(10, 200.0));
        dashed.line_style = LineStyle::Dashed;
        dashed.thickness = 3.5;

        let mut hidden = Rectangle::new(point(2, 150.25), point(8, 120.75));
        hidden.is_visible = false;
        hidden.color = Color::from_argb8(0x40, 1, 2, 3);

        vec![
            Tool::HorizontalLine(HorizontalLine::new(101.125)),
            Tool::TrendLine(dashed),
            Tool::TrendChannel(TrendChannel::new(point(1, 100.0), point(5, 110.0), -12.5)),
            Tool::Rectangle(hidden),
        ]
    }

    fn assert_same(a: &Tool, b: &Tool) {
        assert_eq!(a.kind(), b.kind());
        assert_eq!(a.id(), b.id());
        assert_eq!(a.color(), b.color());
        assert_eq!(a.thickness(), b.thickness());
        assert_eq!(a.line_style(), b.line_style());
        assert_eq!(a.is_visible(), b.is_visible());

        match (a, b) {
            (Tool::HorizontalLine(a), Tool::HorizontalLine(b)) => {
                assert!((a.price - b.price).abs() <= 1e-9);
            }
            (Tool::TrendLine(a), Tool::TrendLine(b)) => {
                assert_eq!(a.start_time, b.start_time);
                assert_eq!(a.end_time, b.end_time);
                assert!((a.start_price - b.start_price).abs() <= 1e-9);
                assert!((a.end_price - b.end_price).abs() <= 1e-9);
            }
            (Tool::TrendChannel(a), Tool::TrendChannel(b)) => {
                assert_eq!(a.start_time, b.start_time);
                assert_eq!(a.end_time, b.end_time);
                assert!((a.start_price - b.start_price).abs() <= 1e-9);
                assert!((a.end_price - b.end_price).abs() <= 1e-9);
                assert!((a.parallel_offset - b.parallel_offset).abs() <= 1e-9);
            }
            (Tool::Rectangle(a), Tool::Rectangle(b)) => {
                assert_eq!(a.start_time, b.start_time);
                assert_eq!(a.end_time, b.end_time);
                assert!((a.start_price - b.start_price).abs() <= 1e-9);
                assert!((a.end_price - b.end_price).abs() <= 1e-9);
            }
            _ => panic!("kind mismatch"),
        }
    }

    #[test]
    fn each_tool_roundtrips_through_json() {
        for tool in sample_tools() {
            let json = tool.to_json().unwrap();
            let parsed = Tool::from_json(&json).unwrap();

            assert_same(&tool, &parsed);
        }
    }

    #[quickcheck]
    fn channel_json_keeps_geometry(hours: (u16, u16), prices: (i32, i32), offset: i32) -> bool {
        let start = point(u64::from(hours.0), f64::from(prices.0));
        let end = point(u64::from(hours.1), f64::from(prices.1));
        let tool = Tool::TrendChannel(TrendChannel::new(start, end, f64::from(offset) / 8.0));

        Tool::from_json(&tool.to_json().unwrap()).is_ok_and(|parsed| parsed == tool)
    }

    #[test]
    fn array_roundtrip_keeps_order() {
        let tools = sample_tools();
        let parsed = from_json(&to_json(&tools).unwrap()).unwrap();

        assert_eq!(parsed.len(), tools.len());
        for (a, b) in tools.iter().zip(&parsed) {
            assert_same(a, b);
        }
    }

    #[test]
    fn persisted_format_uses_type_tag_and_hex_color() {
        let tool = Tool::HorizontalLine(HorizontalLine::new(42.0));
        let value: serde_json::Value = serde_json::from_str(&tool.to_json().unwrap()).unwrap();

        assert_eq!(value["type"], "HorizontalLine");
        assert_eq!(value["color"], "#FFFFA500");
        assert_eq!(value["lineStyle"], "Solid");
        assert_eq!(value["isVisible"], true);
        assert!(value.get("needsRedraw").is_none());
    }

    #[test]
    fn timestamps_are_iso_8601() {
        let tool = Tool::TrendLine(TrendLine::new(point(0, 1.0), point(1, 2.0)));
        let value: serde_json::Value = serde_json::from_str(&tool.to_json().unwrap()).unwrap();

        let start = value["startTime"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(start).is_ok());
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let json = r#"{
            "type": "TrendLine",
            "startTime": "2024-01-01T00:00:00Z",
            "startPrice": 100.0,
            "endTime": "2024-01-02T00:00:00Z",
            "endPrice": 110.0
        }"#;

        let tool = Tool::from_json(json).unwrap();

        assert_eq!(tool.kind(), ToolKind::TrendLine);
        assert_eq!(tool.color(), ToolKind::TrendLine.default_color());
        assert_eq!(tool.thickness(), DEFAULT_THICKNESS);
        assert_eq!(tool.line_style(), LineStyle::Solid);
        assert!(tool.is_visible());
        assert!(tool.needs_redraw());
    }

    #[test]
    fn unparseable_color_uses_type_default() {
        let json = r#"{
            "type": "Rectangle",
            "startTime": "2024-01-01T00:00:00Z",
            "startPrice": 100.0,
            "endTime": "2024-01-02T00:00:00Z",
            "endPrice": 110.0,
            "color": "not-a-color",
            "thickness": -4,
            "lineStyle": "Wavy",
            "someFutureField": [1, 2, 3]
        }"#;

        let tool = Tool::from_json(json).unwrap();

        assert_eq!(tool.color(), ToolKind::Rectangle.default_color());
        assert_eq!(tool.thickness(), DEFAULT_THICKNESS);
        assert_eq!(tool.line_style(), LineStyle::Solid);
    }

    #[test]
    fn malformed_elements_are_skipped() {
        let json = r#"[
            { "type": "HorizontalLine", "price": 10.0 },
            { "type": "Spiral", "price": 10.0 },
            { "type": "TrendLine", "startPrice": 1.0 },
            { "type": "HorizontalLine", "price": 20.0 }
        ]"#;

        let tools = from_json(json).unwrap();

        assert_eq!(tools.len(), 2);
        assert!(from_json("{ not json").is_err());
    }

    #[test]
    fn build_requires_all_anchors() {
        let anchors = [point(0, 100.0), point(4, 120.0)];

        assert!(ToolKind::TrendChannel.build(&anchors).is_none());
        assert!(ToolKind::TrendLine.build(&anchors).is_some());
        assert!(ToolKind::HorizontalLine.build(&anchors[..1]).is_some());
    }

    #[test]
    fn channel_third_anchor_sets_offset_from_midpoint() {
        let anchors = [point(0, 100.0), point(4, 120.0), point(2, 150.0)];

        let Some(Tool::TrendChannel(channel)) = ToolKind::TrendChannel.build(&anchors) else {
            panic!("expected a channel");
        };

        assert_eq!(channel.parallel_offset, 40.0);
    }

    #[test]
    fn preview_of_channel_with_one_anchor_is_flat_channel() {
        let preview = ToolKind::TrendChannel
            .preview(&[point(0, 100.0)], point(2, 105.0))
            .unwrap();

        let Tool::TrendChannel(channel) = &preview else {
            panic!("expected a channel");
        };
        assert_eq!(channel.parallel_offset, 0.0);
        assert_eq!(preview.line_style(), LineStyle::Dashed);
    }

    #[test]
    fn setters_mark_for_redraw() {
        let mut tool = Tool::HorizontalLine(HorizontalLine::new(1.0));
        tool.clear_redraw();

        tool.set_thickness(-1.0);
        assert!(!tool.needs_redraw());

        tool.set_visible(false);
        assert!(tool.needs_redraw());
    }
}
