use data::chart::ChartPoint;
use data::tool::HorizontalLine;

use super::stroke;
use crate::chart::camera::Viewport;
use crate::chart::coords::ViewPoint;
use crate::chart::frame::{Alignment, Frame, Text};
use crate::chart::scale;

const LABEL_SIZE: f32 = 11.0;

fn endpoints(
    line: &HorizontalLine,
    project: impl Fn(ChartPoint) -> ViewPoint,
    viewport: &Viewport,
) -> Option<(ViewPoint, ViewPoint)> {
    let start = project(ChartPoint::new(viewport.min_time, line.price));
    let end = project(ChartPoint::new(viewport.max_time, line.price));

    (start.is_finite() && end.is_finite()).then_some((start, end))
}

pub(super) fn draw(
    line: &HorizontalLine,
    frame: &mut impl Frame,
    project: impl Fn(ChartPoint) -> ViewPoint,
    viewport: &Viewport,
) {
    let Some((start, end)) = endpoints(line, project, viewport) else {
        return;
    };

    frame.stroke_line(start, end, stroke(line.color, line.thickness, line.line_style));

    let step = scale::optimal_value_step(viewport.price_span()).unwrap_or(1.0);
    frame.fill_text(Text {
        content: scale::format_value(line.price, step / 10.0),
        position: ViewPoint::new(end.x - 4.0, end.y - 2.0),
        color: line.color,
        size: LABEL_SIZE,
        align_x: Alignment::End,
        align_y: Alignment::End,
    });
}

pub(super) fn hit_test(
    line: &HorizontalLine,
    point: ViewPoint,
    project: impl Fn(ChartPoint) -> ViewPoint,
    viewport: &Viewport,
    tolerance: f64,
) -> bool {
    endpoints(line, project, viewport)
        .is_some_and(|(start, end)| {
            (point.y - start.y).abs() <= tolerance
                && point.x >= start.x.min(end.x) - tolerance
                && point.x <= start.x.max(end.x) + tolerance
        })
}

/// The single handle sits at the horizontal middle of the viewport.
pub(super) fn handle(
    line: &HorizontalLine,
    project: impl Fn(ChartPoint) -> ViewPoint,
    viewport: &Viewport,
) -> ViewPoint {
    project(ChartPoint::new(viewport.mid_time(), line.price))
}
