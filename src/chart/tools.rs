//! View-space behaviour of annotation tools and the ordered tool collection.
//!
//! Tools store chart coordinates only. Everything here takes a projection
//! `Fn(ChartPoint) -> ViewPoint` and the current [`Viewport`], so it can be
//! exercised with any camera or a hand-written projector.

mod horizontal_line;
mod rectangle;
mod trend_channel;
mod trend_line;

use data::chart::ChartPoint;
use data::tool::{self, Tool, ToolId, trend_channel::{BASE_MIDPOINT, PARALLEL_MIDPOINT}};
use data::{Color, LineStyle};
use ordered_float::OrderedFloat;

use super::camera::Viewport;
use super::coords::ViewPoint;
use super::frame::{Frame, Stroke};

pub const HANDLE_RADIUS: f64 = 4.0;

fn stroke(color: Color, thickness: f32, style: LineStyle) -> Stroke {
    Stroke::new(color, thickness).with_style(style)
}

/// Draws `tool`. Invisible tools and tools with a non-finite projected point
/// are skipped entirely.
pub fn draw(
    tool: &Tool,
    frame: &mut impl Frame,
    project: impl Fn(ChartPoint) -> ViewPoint,
    viewport: &Viewport,
) {
    if !tool.is_visible() {
        return;
    }

    match tool {
        Tool::HorizontalLine(line) => horizontal_line::draw(line, frame, project, viewport),
        Tool::TrendLine(line) => trend_line::draw(line, frame, project),
        Tool::TrendChannel(channel) => trend_channel::draw(channel, frame, project),
        Tool::Rectangle(rectangle) => rectangle::draw(rectangle, frame, project),
    }
}

pub fn hit_test(
    tool: &Tool,
    point: ViewPoint,
    project: impl Fn(ChartPoint) -> ViewPoint,
    viewport: &Viewport,
    tolerance: f64,
) -> bool {
    if !tool.is_visible() || !point.is_finite() {
        return false;
    }

    match tool {
        Tool::HorizontalLine(line) => {
            horizontal_line::hit_test(line, point, project, viewport, tolerance)
        }
        Tool::TrendLine(line) => trend_line::hit_test(line, point, project, tolerance),
        Tool::TrendChannel(channel) => trend_channel::hit_test(channel, point, project, tolerance),
        Tool::Rectangle(rectangle) => rectangle::hit_test(rectangle, point, project, tolerance),
    }
}

/// Handle positions in view space, paired with their control point index.
pub fn handles(
    tool: &Tool,
    project: impl Fn(ChartPoint) -> ViewPoint,
    viewport: &Viewport,
) -> Vec<(usize, ViewPoint)> {
    match tool {
        Tool::HorizontalLine(line) => vec![(0, horizontal_line::handle(line, project, viewport))],
        _ => tool
            .control_points()
            .into_iter()
            .map(project)
            .enumerate()
            .collect(),
    }
}

/// Lower ranks win when several handles are within reach.
fn handle_rank(tool: &Tool, index: usize) -> u8 {
    match tool {
        Tool::TrendChannel(_) if matches!(index, PARALLEL_MIDPOINT | BASE_MIDPOINT) => 0,
        _ => 1,
    }
}

/// Index of the handle under `point`, if any is within `tolerance`.
///
/// Channel midpoint handles take priority over corners; otherwise the nearest
/// handle wins.
pub fn control_point_index(
    tool: &Tool,
    point: ViewPoint,
    project: impl Fn(ChartPoint) -> ViewPoint,
    viewport: &Viewport,
    tolerance: f64,
) -> Option<usize> {
    if !tool.is_visible() || !point.is_finite() {
        return None;
    }

    handles(tool, project, viewport)
        .into_iter()
        .filter(|(_, handle)| handle.is_finite())
        .map(|(index, handle)| (index, handle.distance_to(point)))
        .filter(|(_, distance)| *distance <= tolerance)
        .min_by_key(|(index, distance)| (handle_rank(tool, *index), OrderedFloat(*distance)))
        .map(|(index, _)| index)
}

pub fn draw_handles(
    tool: &Tool,
    frame: &mut impl Frame,
    project: impl Fn(ChartPoint) -> ViewPoint,
    viewport: &Viewport,
) {
    if !tool.is_visible() {
        return;
    }

    for (_, handle) in handles(tool, project, viewport) {
        if handle.is_finite() {
            frame.fill_ellipse(handle, HANDLE_RADIUS + 1.0, HANDLE_RADIUS + 1.0, Color::WHITE);
            frame.fill_ellipse(handle, HANDLE_RADIUS, HANDLE_RADIUS, tool.color());
        }
    }
}

/// Tools in drawing order: later tools are drawn on top and hit first.
#[derive(Debug, Default, Clone)]
pub struct AnnotationManager {
    tools: Vec<Tool>,
}

impl AnnotationManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_tool(&mut self, tool: Tool) -> ToolId {
        let id = tool.id();
        log::debug!("Added {} {id}", tool.kind());

        self.tools.push(tool);
        id
    }

    pub fn remove_tool(&mut self, id: ToolId) -> Option<Tool> {
        let index = self.tools.iter().position(|tool| tool.id() == id)?;
        let tool = self.tools.remove(index);

        log::debug!("Removed {} {id}", tool.kind());
        self.mark_all_for_redraw();
        Some(tool)
    }

    pub fn clear(&mut self) {
        self.tools.clear();
    }

    pub fn get(&self, id: ToolId) -> Option<&Tool> {
        self.tools.iter().find(|tool| tool.id() == id)
    }

    pub fn get_mut(&mut self, id: ToolId) -> Option<&mut Tool> {
        self.tools.iter_mut().find(|tool| tool.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tool> {
        self.tools.iter()
    }

    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Top-most visible tool whose outline is within `tolerance` of `point`.
    pub fn tool_at_point(
        &self,
        point: ViewPoint,
        project: impl Fn(ChartPoint) -> ViewPoint,
        viewport: &Viewport,
        tolerance: f64,
    ) -> Option<ToolId> {
        self.tools
            .iter()
            .rev()
            .find(|tool| hit_test(tool, point, &project, viewport, tolerance))
            .map(Tool::id)
    }

    /// Top-most tool with a handle under `point`, with the handle index.
    pub fn control_point_at(
        &self,
        point: ViewPoint,
        project: impl Fn(ChartPoint) -> ViewPoint,
        viewport: &Viewport,
        tolerance: f64,
    ) -> Option<(ToolId, usize)> {
        self.tools.iter().rev().find_map(|tool| {
            control_point_index(tool, point, &project, viewport, tolerance)
                .map(|index| (tool.id(), index))
        })
    }

    pub fn mark_all_for_redraw(&mut self) {
        self.tools.iter_mut().for_each(Tool::mark_for_redraw);
    }

    /// Full repaint. Redraw flags are left untouched.
    pub fn draw_all(
        &self,
        frame: &mut impl Frame,
        project: impl Fn(ChartPoint) -> ViewPoint,
        viewport: &Viewport,
    ) {
        for tool in &self.tools {
            draw(tool, frame, &project, viewport);
        }
    }

    /// Partial repaint of tools flagged for redraw; clears their flags.
    /// Returns how many tools were drawn.
    pub fn draw_dirty(
        &mut self,
        frame: &mut impl Frame,
        project: impl Fn(ChartPoint) -> ViewPoint,
        viewport: &Viewport,
    ) -> usize {
        let mut drawn = 0;

        for tool in self.tools.iter_mut().filter(|tool| tool.needs_redraw()) {
            if tool.is_visible() {
                draw(tool, frame, &project, viewport);
                drawn += 1;
            }
            tool.clear_redraw();
        }

        drawn
    }

    pub fn to_json(&self) -> Result<String, tool::Error> {
        tool::to_json(&self.tools)
    }

    /// Replaces the collection with the tools in `json`.
    pub fn load_json(&mut self, json: &str) -> Result<usize, tool::Error> {
        self.tools = tool::from_json(json)?;
        log::info!("Loaded {} annotations", self.tools.len());
        Ok(self.tools.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::frame::Recorder;
    use chrono::{DateTime, Duration, Utc};
    use data::tool::{HorizontalLine, Rectangle, TrendChannel, TrendLine};

    fn origin() -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn point(hours: i64, price: f64) -> ChartPoint {
        ChartPoint::new(origin() + Duration::hours(hours), price)
    }

    /// One hour is 10 px, one price unit is 1 px, y grows downward from 500.
    fn project(point: ChartPoint) -> ViewPoint {
        let hours = (point.time - origin()).num_seconds() as f64 / 3_600.0;
        ViewPoint::new(hours * 10.0, 500.0 - point.price)
    }

    fn viewport() -> Viewport {
        Viewport {
            min_time: origin(),
            max_time: origin() + Duration::hours(100),
            min_price: 0.0,
            max_price: 500.0,
        }
    }

    #[test]
    fn segment_hit_uses_perpendicular_distance() {
        let tool = Tool::TrendLine(TrendLine::new(point(0, 100.0), point(20, 300.0)));
        let midpoint = project(point(10, 200.0));

        assert!(hit_test(&tool, midpoint, project, &viewport(), 5.0));

        // 100 px along the normal of a 45 degree line
        let offset = 100.0 / 2f64.sqrt();
        let far = ViewPoint::new(midpoint.x + offset, midpoint.y + offset);
        assert!(!hit_test(&tool, far, project, &viewport(), 5.0));
    }

    #[test]
    fn horizontal_line_hits_on_vertical_distance() {
        let tool = Tool::HorizontalLine(HorizontalLine::new(250.0));

        assert!(hit_test(&tool, ViewPoint::new(300.0, 253.0), project, &viewport(), 5.0));
        assert!(!hit_test(&tool, ViewPoint::new(300.0, 260.0), project, &viewport(), 5.0));
        assert_eq!(
            control_point_index(&tool, ViewPoint::new(500.0, 251.0), project, &viewport(), 5.0),
            Some(0)
        );
    }

    #[test]
    fn rectangle_interior_is_not_a_hit() {
        let tool = Tool::Rectangle(Rectangle::new(point(0, 100.0), point(20, 300.0)));

        assert!(hit_test(&tool, ViewPoint::new(100.0, 202.0), project, &viewport(), 5.0));
        assert!(!hit_test(&tool, ViewPoint::new(100.0, 300.0), project, &viewport(), 5.0));
    }

    #[test]
    fn channel_hits_either_edge() {
        let tool = Tool::TrendChannel(TrendChannel::new(point(0, 100.0), point(20, 100.0), 50.0));

        assert!(hit_test(&tool, ViewPoint::new(100.0, 400.0), project, &viewport(), 5.0));
        assert!(hit_test(&tool, ViewPoint::new(100.0, 350.0), project, &viewport(), 5.0));
        assert!(!hit_test(&tool, ViewPoint::new(100.0, 375.0), project, &viewport(), 5.0));
    }

    #[test]
    fn channel_draws_dashed_midline() {
        let tool = Tool::TrendChannel(TrendChannel::new(point(0, 100.0), point(20, 100.0), 50.0));
        let mut frame = Recorder::new();

        draw(&tool, &mut frame, project, &viewport());

        let patterns: Vec<_> = frame.lines().map(|(_, _, stroke)| stroke.dash_pattern()).collect();
        assert_eq!(patterns.len(), 3);
        assert_eq!(patterns.iter().filter(|pattern| pattern.is_empty()).count(), 2);
        assert!(patterns.contains(&LineStyle::Dashed.dash_pattern()));
    }

    #[test]
    fn channel_midpoint_wins_over_nearby_corner() {
        // a one-hour channel puts the midpoints 5 px from the ends
        let tool = Tool::TrendChannel(TrendChannel::new(point(0, 100.0), point(1, 100.0), 50.0));
        let near_start = ViewPoint::new(1.0, 400.0);

        assert_eq!(
            control_point_index(&tool, near_start, project, &viewport(), 5.0),
            Some(BASE_MIDPOINT)
        );
        assert_eq!(
            control_point_index(&tool, near_start, project, &viewport(), 2.0),
            Some(0)
        );
    }

    #[test]
    fn invisible_tools_never_hit() {
        let mut tool = Tool::TrendLine(TrendLine::new(point(0, 100.0), point(20, 300.0)));
        tool.set_visible(false);

        let start = project(point(0, 100.0));
        assert!(!hit_test(&tool, start, project, &viewport(), 5.0));
        assert_eq!(control_point_index(&tool, start, project, &viewport(), 5.0), None);

        let mut frame = Recorder::new();
        draw(&tool, &mut frame, project, &viewport());
        assert!(frame.is_empty());
    }

    #[test]
    fn non_finite_projection_skips_the_tool() {
        let tool = Tool::Rectangle(Rectangle::new(point(0, 100.0), point(20, 300.0)));
        let broken = |point: ChartPoint| {
            let view = project(point);
            if point.price > 200.0 {
                ViewPoint::new(f64::NAN, view.y)
            } else {
                view
            }
        };

        let mut frame = Recorder::new();
        draw(&tool, &mut frame, broken, &viewport());

        assert!(frame.is_empty());
        assert!(!hit_test(&tool, ViewPoint::new(0.0, 400.0), broken, &viewport(), 5.0));
    }

    #[test]
    fn topmost_tool_wins() {
        let mut manager = AnnotationManager::new();
        let below = manager.add_tool(Tool::HorizontalLine(HorizontalLine::new(200.0)));
        let above = manager.add_tool(Tool::HorizontalLine(HorizontalLine::new(202.0)));

        let hit = manager.tool_at_point(ViewPoint::new(50.0, 299.0), project, &viewport(), 5.0);
        assert_eq!(hit, Some(above));

        manager.remove_tool(above);
        let hit = manager.tool_at_point(ViewPoint::new(50.0, 299.0), project, &viewport(), 5.0);
        assert_eq!(hit, Some(below));
    }

    #[test]
    fn draw_dirty_clears_flags() {
        let mut manager = AnnotationManager::new();
        manager.add_tool(Tool::TrendLine(TrendLine::new(point(0, 100.0), point(20, 300.0))));
        manager.add_tool(Tool::HorizontalLine(HorizontalLine::new(50.0)));

        let mut frame = Recorder::new();
        assert_eq!(manager.draw_dirty(&mut frame, project, &viewport()), 2);
        assert_eq!(manager.draw_dirty(&mut frame, project, &viewport()), 0);

        manager.mark_all_for_redraw();
        assert!(manager.iter().all(Tool::needs_redraw));

        let before = frame.len();
        manager.draw_all(&mut frame, project, &viewport());
        assert!(frame.len() > before);
        assert!(manager.iter().all(Tool::needs_redraw));
    }

    #[test]
    fn json_load_replaces_tools() {
        let mut manager = AnnotationManager::new();
        manager.add_tool(Tool::HorizontalLine(HorizontalLine::new(1.0)));
        manager.add_tool(Tool::TrendLine(TrendLine::new(point(0, 1.0), point(1, 2.0))));
        let json = manager.to_json().unwrap();

        let mut loaded = AnnotationManager::new();
        loaded.add_tool(Tool::HorizontalLine(HorizontalLine::new(9.0)));

        assert_eq!(loaded.load_json(&json).unwrap(), 2);
        let ids: Vec<_> = loaded.iter().map(Tool::id).collect();
        let expected: Vec<_> = manager.iter().map(Tool::id).collect();
        assert_eq!(ids, expected);
    }
}
