use data::chart::ChartPoint;
use data::tool::TrendLine;

use super::stroke;
use crate::chart::coords::{ViewPoint, segment_distance};
use crate::chart::frame::Frame;

fn segment(line: &TrendLine, project: impl Fn(ChartPoint) -> ViewPoint) -> Option<(ViewPoint, ViewPoint)> {
    let start = project(line.start());
    let end = project(line.end());

    (start.is_finite() && end.is_finite()).then_some((start, end))
}

pub(super) fn draw(line: &TrendLine, frame: &mut impl Frame, project: impl Fn(ChartPoint) -> ViewPoint) {
    if let Some((start, end)) = segment(line, project) {
        frame.stroke_line(start, end, stroke(line.color, line.thickness, line.line_style));
    }
}

pub(super) fn hit_test(
    line: &TrendLine,
    point: ViewPoint,
    project: impl Fn(ChartPoint) -> ViewPoint,
    tolerance: f64,
) -> bool {
    segment(line, project).is_some_and(|(start, end)| segment_distance(point, start, end) <= tolerance)
}
