//! Pan and zoom state for the price pane and the indicator pane.
//!
//! Both panes share the time axis. Every range is clamped on write, so zoom
//! reports the factor it actually applied and focus points stay under the
//! cursor even when a limit is hit.

use chrono::{DateTime, Duration, Utc};
use data::ChartConfig;
use data::chart::{ChartPoint, duration_secs, offset_time, secs_duration, shift_time};

use super::coords::{Transform, ViewPoint, WorldPoint};
use super::layout::PaneGeometry;

pub const MIN_TIME_RANGE_SECS: f64 = 60.0;
pub const MAX_TIME_RANGE_SECS: f64 = 3_650.0 * 86_400.0;
pub const MIN_PRICE_RANGE: f64 = 0.01;
pub const MAX_PRICE_RANGE: f64 = 1_000_000.0;
pub const MIN_INDICATOR_RANGE: f64 = 1.0;
pub const MAX_INDICATOR_RANGE: f64 = 10_000.0;
/// Furthest the camera may sit from the world origin, in seconds.
pub const MAX_WORLD_SECS: f64 = 1e11;

const DEFAULT_TIME_RANGE_SECS: f64 = 86_400.0;
const DEFAULT_PRICE_RANGE: f64 = 100.0;
const DEFAULT_INDICATOR_RANGE: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    /// World coordinates shown at the center of the main pane.
    pub position: WorldPoint,
    pub time_range: Duration,
    pub price_range: f64,
    pub origin_time: DateTime<Utc>,
    pub origin_price: f64,
    /// Indicator value shown at the vertical center of the indicator pane.
    pub indicator_camera_y: f64,
    pub indicator_range: f64,
    pub indicator_ratio: f64,
}

/// Visible extents of the main pane, recomputed after every camera change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub min_time: DateTime<Utc>,
    pub max_time: DateTime<Utc>,
    pub min_price: f64,
    pub max_price: f64,
}

impl Viewport {
    pub fn is_degenerate(&self) -> bool {
        !(self.min_time < self.max_time && self.min_price < self.max_price)
    }

    pub fn time_span(&self) -> Duration {
        self.max_time - self.min_time
    }

    pub fn price_span(&self) -> f64 {
        self.max_price - self.min_price
    }

    pub fn contains_time(&self, time: DateTime<Utc>) -> bool {
        time >= self.min_time && time <= self.max_time
    }

    pub fn mid_time(&self) -> DateTime<Utc> {
        self.min_time + self.time_span() / 2
    }
}

pub struct Camera {
    state: CameraState,
    viewport: Viewport,
    config: ChartConfig,
}

impl Camera {
    pub fn new(config: ChartConfig) -> Self {
        let state = CameraState {
            position: WorldPoint::default(),
            time_range: secs_duration(DEFAULT_TIME_RANGE_SECS),
            price_range: DEFAULT_PRICE_RANGE,
            origin_time: DateTime::<Utc>::default(),
            origin_price: 0.0,
            indicator_camera_y: DEFAULT_INDICATOR_RANGE / 2.0,
            indicator_range: DEFAULT_INDICATOR_RANGE,
            indicator_ratio: config.default_indicator_ratio,
        };

        let mut camera = Self {
            state,
            viewport: Viewport {
                min_time: state.origin_time,
                max_time: state.origin_time,
                min_price: 0.0,
                max_price: 0.0,
            },
            config,
        };
        camera.update_viewport();
        camera
    }

    pub fn state(&self) -> &CameraState {
        &self.state
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn indicator_ratio(&self) -> f64 {
        self.state.indicator_ratio
    }

    pub fn time_range_secs(&self) -> f64 {
        duration_secs(self.state.time_range)
    }

    /// Chart point at the center of the main pane.
    pub fn position(&self) -> ChartPoint {
        ChartPoint {
            time: offset_time(self.state.origin_time, self.state.position.x),
            price: self.state.origin_price + self.state.position.y,
        }
    }

    pub fn transform(&self, geometry: &PaneGeometry) -> Transform {
        Transform {
            origin_time: self.state.origin_time,
            origin_price: self.state.origin_price,
            camera: self.state.position,
            time_range_secs: self.time_range_secs(),
            price_range: self.state.price_range,
            indicator_camera_y: self.state.indicator_camera_y,
            indicator_range: self.state.indicator_range,
            main_pane: geometry.main_pane,
            indicator_pane: geometry.indicator_pane,
        }
    }

    fn update_viewport(&mut self) {
        let half_time = secs_duration(self.time_range_secs() / 2.0);
        let center = self.position();
        let half_price = self.state.price_range / 2.0;

        self.viewport = Viewport {
            min_time: shift_time(center.time, -half_time),
            max_time: shift_time(center.time, half_time),
            min_price: center.price - half_price,
            max_price: center.price + half_price,
        };
    }

    fn clamp_time_range(secs: f64) -> f64 {
        clamp_logged("time range", secs, MIN_TIME_RANGE_SECS, MAX_TIME_RANGE_SECS)
    }

    fn clamp_price_range(range: f64) -> f64 {
        clamp_logged("price range", range, MIN_PRICE_RANGE, MAX_PRICE_RANGE)
    }

    fn clamp_indicator_range(range: f64) -> f64 {
        clamp_logged("indicator range", range, MIN_INDICATOR_RANGE, MAX_INDICATOR_RANGE)
    }

    fn set_world_x(&mut self, x: f64) {
        self.state.position.x = clamp_logged("camera x", x, -MAX_WORLD_SECS, MAX_WORLD_SECS);
    }

    /// Moves the camera by a world delta.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        if !(dx.is_finite() && dy.is_finite()) {
            log::trace!("Ignoring non-finite pan ({dx}, {dy})");
            return;
        }

        self.set_world_x(self.state.position.x + dx);
        self.state.position.y += dy;
        self.update_viewport();
    }

    /// Drags the content by a pixel delta: content follows the pointer.
    pub fn pan_by_pixels(&mut self, dx: f64, dy: f64, geometry: &PaneGeometry) {
        let transform = self.transform(geometry);
        if transform.is_degenerate() {
            return;
        }

        self.pan(
            -dx / transform.pixels_per_second(),
            dy / transform.pixels_per_price(),
        );
    }

    /// Scales both ranges around `focus` (world coordinates, camera position
    /// when `None`). Returns the factors actually applied after clamping.
    pub fn zoom(
        &mut self,
        time_factor: f64,
        price_factor: f64,
        focus: Option<WorldPoint>,
    ) -> (f64, f64) {
        let valid = |factor: f64| factor.is_finite() && factor > 0.0;
        if !(valid(time_factor) && valid(price_factor)) {
            log::trace!("Ignoring zoom by ({time_factor}, {price_factor})");
            return (1.0, 1.0);
        }

        let focus = focus
            .filter(|focus| focus.is_finite())
            .unwrap_or(self.state.position);

        let old_time = self.time_range_secs();
        let new_time = Self::clamp_time_range(old_time * time_factor);
        self.state.time_range = secs_duration(new_time);
        let effective_time = self.time_range_secs() / old_time;

        let old_price = self.state.price_range;
        self.state.price_range = Self::clamp_price_range(old_price * price_factor);
        let effective_price = self.state.price_range / old_price;

        let position = self.state.position;
        self.set_world_x(focus.x - (focus.x - position.x) * effective_time);
        self.state.position.y = focus.y - (focus.y - position.y) * effective_price;

        self.update_viewport();
        (effective_time, effective_price)
    }

    /// Zooms both axes keeping the chart point under `point` fixed on screen.
    pub fn zoom_at_screen_point(&mut self, point: ViewPoint, factor: f64, geometry: &PaneGeometry) {
        let transform = self.transform(geometry);
        if transform.is_degenerate() || !point.is_finite() {
            return;
        }

        let focus = transform.view_to_world(point);
        self.zoom(factor, factor, Some(focus));
    }

    /// Zooms the time axis only, keeping the time under `x` fixed.
    pub fn zoom_time_at_screen_x(&mut self, x: f64, factor: f64, geometry: &PaneGeometry) {
        let transform = self.transform(geometry);
        if transform.is_degenerate() || !x.is_finite() {
            return;
        }

        let focus_x = transform
            .view_to_world(ViewPoint::new(x, geometry.main_pane.center().y))
            .x;
        self.zoom(
            factor,
            1.0,
            Some(WorldPoint::new(focus_x, self.state.position.y)),
        );
    }

    /// Zooms each axis about the camera position.
    pub fn zoom_axis(&mut self, time_factor: f64, price_factor: f64) -> (f64, f64) {
        self.zoom(time_factor, price_factor, None)
    }

    pub fn zoom_indicator_axis(&mut self, factor: f64) -> f64 {
        if !(factor.is_finite() && factor > 0.0) {
            return 1.0;
        }

        let old = self.state.indicator_range;
        self.state.indicator_range = Self::clamp_indicator_range(old * factor);
        self.state.indicator_range / old
    }

    pub fn pan_indicator_by_pixels(&mut self, dy: f64, geometry: &PaneGeometry) {
        let transform = self.transform(geometry);
        if transform.is_indicator_degenerate() || !dy.is_finite() {
            return;
        }

        self.state.indicator_camera_y += dy / transform.pixels_per_indicator_unit();
    }

    /// Centers the indicator axis on `[min, max]` with padding.
    pub fn fit_indicator(&mut self, min: f64, max: f64) {
        if !(min.is_finite() && max.is_finite()) || min > max {
            return;
        }

        self.state.indicator_camera_y = (min + max) / 2.0;
        self.state.indicator_range = Self::clamp_indicator_range((max - min) * self.config.fit_padding);
    }

    /// Re-anchors the world at `(begin, mid price)` and frames the data:
    /// the last candle at the right edge, the price range centered.
    pub fn initialize(&mut self, begin: DateTime<Utc>, end: DateTime<Utc>, min_price: f64, max_price: f64) {
        if !(min_price.is_finite() && max_price.is_finite()) {
            log::warn!("Cannot initialize camera on non-finite prices ({min_price}, {max_price})");
            return;
        }

        self.state.origin_time = begin;
        self.state.origin_price = (min_price + max_price) / 2.0;
        self.state.position = WorldPoint::default();

        self.fit_to_data(begin, end, min_price, max_price);
    }

    /// Sets both ranges to the padded data extents and places `end` at the
    /// right edge. The price center is kept as is.
    pub fn fit_to_data(&mut self, begin: DateTime<Utc>, end: DateTime<Utc>, min_price: f64, max_price: f64) {
        let padding = self.config.fit_padding;
        let time_span = duration_secs(end - begin);
        let price_span = max_price - min_price;

        if !(time_span.is_finite() && price_span.is_finite()) {
            return;
        }

        self.state.time_range = secs_duration(Self::clamp_time_range(time_span * padding));
        self.state.price_range = Self::clamp_price_range(price_span * padding);

        self.position_to_last_candle(end);
    }

    /// Pans horizontally so `time` sits at the right edge of the main pane.
    pub fn position_to_last_candle(&mut self, time: DateTime<Utc>) {
        let x = duration_secs(time - self.state.origin_time) - self.time_range_secs() / 2.0;
        self.set_world_x(x);
        self.update_viewport();
    }

    pub fn center_on_time(&mut self, time: DateTime<Utc>) {
        self.set_world_x(duration_secs(time - self.state.origin_time));
        self.update_viewport();
    }

    pub fn center_on_price(&mut self, price: f64) {
        if price.is_finite() {
            self.state.position.y = price - self.state.origin_price;
            self.update_viewport();
        }
    }

    pub fn set_time_range(&mut self, range: Duration) {
        self.state.time_range = secs_duration(Self::clamp_time_range(duration_secs(range)));
        self.update_viewport();
    }

    pub fn set_price_range(&mut self, range: f64) {
        if range.is_finite() {
            self.state.price_range = Self::clamp_price_range(range);
            self.update_viewport();
        }
    }

    pub fn set_indicator_range(&mut self, range: f64) {
        if range.is_finite() {
            self.state.indicator_range = Self::clamp_indicator_range(range);
        }
    }

    pub fn set_indicator_ratio(&mut self, ratio: f64) {
        self.state.indicator_ratio = self.config.clamp_indicator_ratio(ratio);
    }
}

fn clamp_logged(what: &str, value: f64, min: f64, max: f64) -> f64 {
    let clamped = value.clamp(min, max);
    if clamped != value {
        log::trace!("Clamped {what} {value} to {clamped}");
    }
    clamped
}
