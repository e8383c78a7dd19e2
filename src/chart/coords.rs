//! Conversions between the three coordinate spaces of a chart.
//!
//! - **Chart** ([`ChartPoint`]): `(time, price)`, the space candles live in
//! - **World** ([`WorldPoint`]): seconds and price units from a fixed origin
//! - **View** ([`ViewPoint`]): pixels from the top-left of the surface
//!
//! [`Transform`] is a `Copy` snapshot of the camera and pane geometry, so it can
//! be captured by projection closures without borrowing the chart.

use chrono::{DateTime, Utc};
use data::chart::{ChartPoint, duration_secs, offset_time};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WorldPoint {
    /// Seconds from the world origin time.
    pub x: f64,
    /// Price units from the world origin price.
    pub y: f64,
}

impl WorldPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewPoint {
    pub x: f64,
    pub y: f64,
}

impl ViewPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn distance_to(self, other: ViewPoint) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Axis-aligned rectangle in view space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Smallest rectangle containing both points.
    pub fn from_corners(a: ViewPoint, b: ViewPoint) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (a.x - b.x).abs(),
            height: (a.y - b.y).abs(),
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> ViewPoint {
        ViewPoint::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn top_left(&self) -> ViewPoint {
        ViewPoint::new(self.x, self.y)
    }

    pub fn contains(&self, point: ViewPoint) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }

    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// Distance from `point` to the segment `a..b`.
///
/// The projection parameter is clamped to the segment, so points beyond an end
/// measure to that end. A zero-length segment measures to `a`.
pub fn segment_distance(point: ViewPoint, a: ViewPoint, b: ViewPoint) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let length_squared = dx * dx + dy * dy;

    if length_squared <= f64::EPSILON {
        return point.distance_to(a);
    }

    let t = (((point.x - a.x) * dx + (point.y - a.y) * dy) / length_squared).clamp(0.0, 1.0);

    point.distance_to(ViewPoint::new(a.x + t * dx, a.y + t * dy))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub origin_time: DateTime<Utc>,
    pub origin_price: f64,
    pub camera: WorldPoint,
    pub time_range_secs: f64,
    pub price_range: f64,
    pub indicator_camera_y: f64,
    pub indicator_range: f64,
    pub main_pane: Rect,
    pub indicator_pane: Rect,
}

impl Transform {
    /// True when a division by one of the ranges or pane sizes would not
    /// produce finite coordinates. Rendering and hit-testing must be skipped.
    pub fn is_degenerate(&self) -> bool {
        !(self.time_range_secs.is_finite()
            && self.time_range_secs > 0.0
            && self.price_range.is_finite()
            && self.price_range > 0.0
            && self.main_pane.width > 0.0
            && self.main_pane.height > 0.0)
    }

    /// Same as [`is_degenerate`](Self::is_degenerate) for the indicator pane.
    pub fn is_indicator_degenerate(&self) -> bool {
        !(self.indicator_range.is_finite()
            && self.indicator_range > 0.0
            && self.indicator_pane.height > 0.0
            && self.main_pane.width > 0.0
            && self.time_range_secs > 0.0)
    }

    pub fn pixels_per_second(&self) -> f64 {
        self.main_pane.width / self.time_range_secs
    }

    pub fn pixels_per_price(&self) -> f64 {
        self.main_pane.height / self.price_range
    }

    pub fn pixels_per_indicator_unit(&self) -> f64 {
        self.indicator_pane.height / self.indicator_range
    }

    pub fn chart_to_world(&self, point: ChartPoint) -> WorldPoint {
        WorldPoint {
            x: duration_secs(point.time - self.origin_time),
            y: point.price - self.origin_price,
        }
    }

    pub fn world_to_chart(&self, point: WorldPoint) -> ChartPoint {
        ChartPoint {
            time: offset_time(self.origin_time, point.x),
            price: point.y + self.origin_price,
        }
    }

    pub fn world_to_view(&self, point: WorldPoint) -> ViewPoint {
        let center = self.main_pane.center();

        ViewPoint {
            x: center.x + (point.x - self.camera.x) * self.pixels_per_second(),
            y: center.y - (point.y - self.camera.y) * self.pixels_per_price(),
        }
    }

    pub fn view_to_world(&self, point: ViewPoint) -> WorldPoint {
        let center = self.main_pane.center();

        WorldPoint {
            x: self.camera.x + (point.x - center.x) / self.pixels_per_second(),
            y: self.camera.y - (point.y - center.y) / self.pixels_per_price(),
        }
    }

    pub fn chart_to_view(&self, point: ChartPoint) -> ViewPoint {
        self.world_to_view(self.chart_to_world(point))
    }

    pub fn view_to_chart(&self, point: ViewPoint) -> ChartPoint {
        self.world_to_chart(self.view_to_world(point))
    }

    pub fn time_to_x(&self, time: DateTime<Utc>) -> f64 {
        let world_x = duration_secs(time - self.origin_time);
        self.main_pane.center().x + (world_x - self.camera.x) * self.pixels_per_second()
    }

    pub fn x_to_time(&self, x: f64) -> DateTime<Utc> {
        let world_x = self.camera.x + (x - self.main_pane.center().x) / self.pixels_per_second();
        offset_time(self.origin_time, world_x)
    }

    pub fn price_to_y(&self, price: f64) -> f64 {
        let world_y = price - self.origin_price;
        self.main_pane.center().y - (world_y - self.camera.y) * self.pixels_per_price()
    }

    pub fn indicator_to_view(&self, time: DateTime<Utc>, value: f64) -> ViewPoint {
        ViewPoint {
            x: self.time_to_x(time),
            y: self.indicator_value_to_y(value),
        }
    }

    pub fn view_to_indicator(&self, point: ViewPoint) -> (DateTime<Utc>, f64) {
        let center_y = self.indicator_pane.center().y;
        let value = self.indicator_camera_y - (point.y - center_y) / self.pixels_per_indicator_unit();

        (self.x_to_time(point.x), value)
    }

    pub fn indicator_value_to_y(&self, value: f64) -> f64 {
        self.indicator_pane.center().y
            - (value - self.indicator_camera_y) * self.pixels_per_indicator_unit()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    pub(crate) fn transform() -> Transform {
        Transform {
            origin_time: DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap(),
            origin_price: 100.0,
            camera: WorldPoint::new(3_600.0, 5.0),
            time_range_secs: 86_400.0,
            price_range: 50.0,
            indicator_camera_y: 50.0,
            indicator_range: 100.0,
            main_pane: Rect::new(10.0, 10.0, 800.0, 500.0),
            indicator_pane: Rect::new(10.0, 516.0, 800.0, 150.0),
        }
    }

    fn close(a: f64, b: f64, tolerance: f64) -> bool {
        (a - b).abs() <= tolerance
    }

    #[quickcheck]
    fn view_world_roundtrip(x: i32, y: i32, range_scale: u16) -> bool {
        let mut transform = transform();
        transform.time_range_secs = 60.0 + f64::from(range_scale) * 97.0;
        transform.price_range = 0.01 + f64::from(range_scale) * 0.37;

        let world = WorldPoint::new(f64::from(x) / 100.0, f64::from(y) / 1_000.0);
        let back = transform.view_to_world(transform.world_to_view(world));

        close(back.x, world.x, 1e-6) && close(back.y, world.y, 1e-6)
    }

    #[quickcheck]
    fn world_chart_roundtrip(x: i32, y: i32) -> bool {
        let transform = transform();
        let world = WorldPoint::new(f64::from(x) / 1_000.0, f64::from(y) / 1_000.0);
        let back = transform.chart_to_world(transform.world_to_chart(world));

        close(back.x, world.x, 1e-6) && close(back.y, world.y, 1e-6)
    }

    #[test]
    fn camera_position_maps_to_pane_center() {
        let transform = transform();
        let center = transform.world_to_view(transform.camera);

        assert_eq!(center, transform.main_pane.center());
    }

    #[test]
    fn higher_price_is_higher_on_screen() {
        let transform = transform();
        let time = transform.origin_time;

        let low = transform.chart_to_view(ChartPoint::new(time, 100.0));
        let high = transform.chart_to_view(ChartPoint::new(time, 110.0));

        assert!(high.y < low.y);
        assert!(close(low.y - high.y, 10.0 * transform.pixels_per_price(), 1e-9));
    }

    #[test]
    fn indicator_axis_is_independent() {
        let transform = transform();
        let time = transform.origin_time;

        let mid = transform.indicator_to_view(time, 50.0);
        assert!(close(mid.y, transform.indicator_pane.center().y, 1e-9));

        let top = transform.indicator_to_view(time, 100.0);
        assert!(close(top.y, transform.indicator_pane.y, 1e-9));

        let (back_time, back_value) = transform.view_to_indicator(ViewPoint::new(mid.x, top.y));
        assert_eq!(back_time, time);
        assert!(close(back_value, 100.0, 1e-9));
    }

    #[test]
    fn zero_range_is_degenerate() {
        let mut transform = transform();
        assert!(!transform.is_degenerate());

        transform.price_range = 0.0;
        assert!(transform.is_degenerate());

        let mut transform = self::transform();
        transform.main_pane.height = 0.0;
        assert!(transform.is_degenerate());
    }

    #[test]
    fn segment_distance_clamps_to_ends() {
        let a = ViewPoint::new(0.0, 0.0);
        let b = ViewPoint::new(10.0, 0.0);

        assert_eq!(segment_distance(ViewPoint::new(5.0, 3.0), a, b), 3.0);
        assert_eq!(segment_distance(ViewPoint::new(-3.0, 4.0), a, b), 5.0);
        assert_eq!(segment_distance(ViewPoint::new(13.0, -4.0), a, b), 5.0);
        assert_eq!(segment_distance(ViewPoint::new(3.0, 4.0), a, a), 5.0);
    }

    #[test]
    fn rect_from_corners_is_order_independent() {
        let rect = Rect::from_corners(ViewPoint::new(30.0, 5.0), ViewPoint::new(10.0, 25.0));

        assert_eq!(rect, Rect::new(10.0, 5.0, 20.0, 20.0));
        assert!(rect.contains(ViewPoint::new(20.0, 20.0)));
        assert!(!rect.contains(ViewPoint::new(31.0, 20.0)));
    }
}
