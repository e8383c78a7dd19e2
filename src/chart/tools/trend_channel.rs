use data::LineStyle;
use data::chart::ChartPoint;
use data::tool::TrendChannel;

use super::stroke;
use crate::chart::coords::{ViewPoint, segment_distance};
use crate::chart::frame::Frame;

struct Projected {
    base: (ViewPoint, ViewPoint),
    parallel: (ViewPoint, ViewPoint),
}

impl Projected {
    fn midline(&self) -> (ViewPoint, ViewPoint) {
        let mid = |a: ViewPoint, b: ViewPoint| ViewPoint::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0);

        (
            mid(self.base.0, self.parallel.0),
            mid(self.base.1, self.parallel.1),
        )
    }
}

fn project_channel(
    channel: &TrendChannel,
    project: impl Fn(ChartPoint) -> ViewPoint,
) -> Option<Projected> {
    let (base_start, base_end) = channel.base_line();
    let (parallel_start, parallel_end) = channel.parallel_line();

    let projected = Projected {
        base: (project(base_start), project(base_end)),
        parallel: (project(parallel_start), project(parallel_end)),
    };

    [
        projected.base.0,
        projected.base.1,
        projected.parallel.0,
        projected.parallel.1,
    ]
    .iter()
    .all(|point| point.is_finite())
    .then_some(projected)
}

pub(super) fn draw(
    channel: &TrendChannel,
    frame: &mut impl Frame,
    project: impl Fn(ChartPoint) -> ViewPoint,
) {
    let Some(projected) = project_channel(channel, project) else {
        return;
    };

    let edge = stroke(channel.color, channel.thickness, channel.line_style);
    frame.stroke_line(projected.base.0, projected.base.1, edge);
    frame.stroke_line(projected.parallel.0, projected.parallel.1, edge);

    let (mid_start, mid_end) = projected.midline();
    let midline = stroke(
        channel.color.scale_alpha(0.5),
        (channel.thickness / 2.0).max(1.0),
        LineStyle::Dashed,
    );
    frame.stroke_line(mid_start, mid_end, midline);
}

pub(super) fn hit_test(
    channel: &TrendChannel,
    point: ViewPoint,
    project: impl Fn(ChartPoint) -> ViewPoint,
    tolerance: f64,
) -> bool {
    project_channel(channel, project).is_some_and(|projected| {
        segment_distance(point, projected.base.0, projected.base.1) <= tolerance
            || segment_distance(point, projected.parallel.0, projected.parallel.1) <= tolerance
    })
}
