use data::chart::ChartPoint;
use data::tool::Rectangle;

use super::stroke;
use crate::chart::coords::{Rect, ViewPoint, segment_distance};
use crate::chart::frame::Frame;

const FILL_ALPHA: f32 = 0.125;

fn corners(rectangle: &Rectangle, project: impl Fn(ChartPoint) -> ViewPoint) -> Option<[ViewPoint; 4]> {
    let corners = rectangle.control_points().map(project);

    corners.iter().all(|corner| corner.is_finite()).then_some(corners)
}

pub(super) fn draw(
    rectangle: &Rectangle,
    frame: &mut impl Frame,
    project: impl Fn(ChartPoint) -> ViewPoint,
) {
    let Some(corners) = corners(rectangle, project) else {
        return;
    };

    let bounds = Rect::from_corners(corners[0], corners[2]);

    frame.fill_rectangle(bounds, rectangle.color.scale_alpha(FILL_ALPHA));
    frame.stroke_rectangle(
        bounds,
        stroke(rectangle.color, rectangle.thickness, rectangle.line_style),
    );
}

/// Edges only; the interior is not a hit.
pub(super) fn hit_test(
    rectangle: &Rectangle,
    point: ViewPoint,
    project: impl Fn(ChartPoint) -> ViewPoint,
    tolerance: f64,
) -> bool {
    corners(rectangle, project).is_some_and(|corners| {
        (0..4).any(|i| segment_distance(point, corners[i], corners[(i + 1) % 4]) <= tolerance)
    })
}
