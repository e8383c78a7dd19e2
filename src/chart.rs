pub mod camera;
pub mod coords;
pub mod frame;
pub mod interaction;
pub mod layout;
pub mod scale;
pub mod tools;

pub use camera::{Camera, CameraState, Viewport};
pub use coords::{Rect, Transform, ViewPoint, WorldPoint};
pub use frame::{Alignment, Frame, Recorder, Stroke, Text};
pub use interaction::{CursorHint, Handle, Interaction, Key, MouseButton, Session};
pub use layout::{PaneGeometry, PaneLayout, Region};
pub use tools::AnnotationManager;

use chrono::{DateTime, Duration, Utc};
use data::chart::kline::price_bounds;
use data::chart::{ChartPoint, millis_to_time, secs_duration, time_to_millis};
use data::tool::{Tool, ToolId, ToolKind};
use data::{ChartConfig, Color, Kline, LineStyle, Timeframe};
use interaction::{Hover, PointerState};

/// Candle body width as a share of one timeframe cell.
const CANDLE_WIDTH_RATIO: f64 = 0.8;
const LABEL_SIZE: f32 = 11.0;
const LABEL_PADDING: f64 = 4.0;

/// One externally computed indicator value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorPoint {
    /// Unix milliseconds, aligned with kline times.
    pub time: u64,
    pub value: f64,
}

/// A candlestick surface with a price pane, an indicator pane and annotations.
///
/// The host feeds pointer, wheel, key and resize events in and calls
/// [`Chart::draw`] with its renderer. Every input method applies its change
/// and recomputes the viewport before returning.
pub struct Chart {
    config: ChartConfig,
    camera: Camera,
    layout: PaneLayout,
    pointer: PointerState,
    session: Session,
    annotations: AnnotationManager,
    selected: Option<ToolId>,
    hover: Hover,
    klines: Vec<Kline>,
    timeframe: Option<Timeframe>,
    indicator: Vec<IndicatorPoint>,
    initialized: bool,
}

impl Chart {
    pub fn new(config: ChartConfig) -> Self {
        let config = config.sanitized();

        Self {
            config,
            camera: Camera::new(config),
            layout: PaneLayout::new(config),
            pointer: PointerState::default(),
            session: Session::Idle,
            annotations: AnnotationManager::new(),
            selected: None,
            hover: Hover::default(),
            klines: Vec::new(),
            timeframe: None,
            indicator: Vec::new(),
            initialized: false,
        }
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Runs `f` on the camera, then refreshes everything that depends on it.
    pub fn update_camera(&mut self, f: impl FnOnce(&mut Camera)) {
        f(&mut self.camera);
        self.annotations.mark_all_for_redraw();
    }

    pub fn geometry(&self) -> PaneGeometry {
        self.layout.geometry(self.camera.indicator_ratio())
    }

    pub fn transform(&self) -> Transform {
        self.camera.transform(&self.geometry())
    }

    pub fn viewport(&self) -> &Viewport {
        self.camera.viewport()
    }

    pub fn camera_position(&self) -> ChartPoint {
        self.camera.position()
    }

    pub fn interaction(&self) -> Interaction {
        self.pointer.interaction()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn cursor_hint(&self) -> CursorHint {
        interaction::cursor_hint(self.pointer.interaction(), &self.session, self.hover)
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.layout.resize(width, height);
        self.annotations.mark_all_for_redraw();
    }

    pub fn klines(&self) -> &[Kline] {
        &self.klines
    }

    pub fn timeframe(&self) -> Option<Timeframe> {
        self.timeframe
    }

    /// Replaces the candle data. The first non-empty load frames the camera on
    /// it; later loads leave the camera where the user put it.
    pub fn load_klines(&mut self, timeframe: Timeframe, mut klines: Vec<Kline>) {
        klines.sort_by_key(|kline| kline.time);
        klines.dedup_by_key(|kline| kline.time);

        log::debug!("Loaded {} {timeframe} candles", klines.len());
        self.klines = klines;
        self.timeframe = Some(timeframe);

        if !self.initialized && self.reset_view() {
            self.initialized = true;
        }
        self.annotations.mark_all_for_redraw();
    }

    /// Re-anchors the camera on the loaded data. Returns `false` without data.
    pub fn reset_view(&mut self) -> bool {
        let Some((begin, end, low, high)) = self.data_bounds() else {
            return false;
        };

        log::info!(
            "Framing {} candles from {begin} to {end}, price {low}..{high}",
            self.klines.len()
        );
        self.camera.initialize(begin, end, low, high);
        self.annotations.mark_all_for_redraw();
        true
    }

    /// Fits both ranges to the loaded data, keeping the price center.
    pub fn fit_to_data(&mut self) {
        if let Some((begin, end, low, high)) = self.data_bounds() {
            log::info!("Fitting view to {begin}..{end}");
            self.camera.fit_to_data(begin, end, low, high);
            self.annotations.mark_all_for_redraw();
        }
    }

    fn data_bounds(&self) -> Option<(DateTime<Utc>, DateTime<Utc>, f64, f64)> {
        let first = self.klines.first()?;
        let last = self.klines.last()?;
        let (low, high) = price_bounds(&self.klines)?;

        Some((millis_to_time(first.time), millis_to_time(last.time), low, high))
    }

    /// Candles overlapping the viewport, plus one on each side.
    pub fn visible_klines(&self) -> &[Kline] {
        let viewport = self.camera.viewport();
        let min = time_to_millis(viewport.min_time);
        let max = time_to_millis(viewport.max_time);

        let start = self.klines.partition_point(|kline| kline.time < min);
        let end = self.klines.partition_point(|kline| kline.time <= max);

        &self.klines[start.saturating_sub(1)..(end + 1).min(self.klines.len())]
    }

    pub fn indicator_series(&self) -> &[IndicatorPoint] {
        &self.indicator
    }

    /// Replaces the indicator series. The indicator axis is fitted to the
    /// values when the pane was empty.
    pub fn set_indicator_series(&mut self, mut series: Vec<IndicatorPoint>) {
        series.sort_by_key(|point| point.time);

        let was_empty = self.indicator.is_empty();
        self.indicator = series;

        if was_empty {
            self.fit_indicator();
        }
    }

    pub fn fit_indicator(&mut self) {
        let (min, max) = self
            .indicator
            .iter()
            .map(|point| point.value)
            .filter(|value| value.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), value| {
                (min.min(value), max.max(value))
            });

        self.camera.fit_indicator(min, max);
    }

    /// Candle body width for the current zoom, at least one pixel. Zero when
    /// nothing can be drawn.
    pub fn candle_width_pixels(&self) -> f64 {
        let transform = self.transform();
        let Some(timeframe) = self.timeframe else {
            return 0.0;
        };
        if transform.is_degenerate() {
            return 0.0;
        }

        (timeframe.to_seconds() * transform.pixels_per_second() * CANDLE_WIDTH_RATIO).max(1.0)
    }

    pub fn optimal_time_interval(&self) -> Option<Duration> {
        scale::optimal_time_step(self.camera.time_range_secs()).map(Duration::seconds)
    }

    pub fn optimal_price_interval(&self) -> Option<f64> {
        scale::optimal_value_step(self.camera.state().price_range)
    }

    pub fn optimal_indicator_interval(&self) -> Option<f64> {
        scale::optimal_value_step(self.camera.state().indicator_range)
    }

    pub fn tools(&self) -> &AnnotationManager {
        &self.annotations
    }

    pub fn add_tool(&mut self, tool: Tool) -> ToolId {
        self.annotations.add_tool(tool)
    }

    pub fn remove_tool(&mut self, id: ToolId) -> Option<Tool> {
        if self.selected == Some(id) {
            self.selected = None;
        }
        if self.session.editing_tool() == Some(id) {
            self.session = Session::Idle;
        }
        self.annotations.remove_tool(id)
    }

    pub fn clear_tools(&mut self) {
        self.annotations.clear();
        self.selected = None;
        if !self.session.is_creating() {
            self.session = Session::Idle;
        }
    }

    pub fn selected_tool(&self) -> Option<&Tool> {
        self.annotations.get(self.selected?)
    }

    /// Style edits go through here so the tool is repainted.
    pub fn selected_tool_mut(&mut self) -> Option<&mut Tool> {
        let tool = self.annotations.get_mut(self.selected?)?;
        tool.mark_for_redraw();
        Some(tool)
    }

    pub fn select(&mut self, id: Option<ToolId>) {
        self.selected = id.filter(|id| self.annotations.get(*id).is_some());
    }

    pub fn annotations_json(&self) -> Result<String, crate::Error> {
        Ok(self.annotations.to_json()?)
    }

    pub fn load_annotations(&mut self, json: &str) -> Result<usize, crate::Error> {
        let count = self.annotations.load_json(json)?;
        self.selected = None;
        self.session = Session::Idle;
        Ok(count)
    }

    pub fn start_creating(&mut self, kind: ToolKind) {
        log::debug!("Placing {kind}");
        self.pointer.on_up();
        self.session = Session::creating(kind);
        self.selected = None;
    }

    pub fn cancel_creating(&mut self) {
        if self.session.is_creating() {
            log::debug!("Placement cancelled");
            self.session = Session::Idle;
        }
    }

    /// Returns `true` when the event was consumed.
    pub fn on_pointer_down(&mut self, point: ViewPoint, button: MouseButton) -> bool {
        if !point.is_finite() {
            return false;
        }

        let geometry = self.geometry();
        let transform = self.camera.transform(&geometry);
        let region = geometry.region_at(point, self.config.divider_hit_tolerance);

        if self.session.is_creating() {
            return self.place_anchor(point, button, region, &transform);
        }

        if button == MouseButton::Left && region == Region::MainPane && !transform.is_degenerate() {
            if self.begin_editing(point, &transform) {
                return true;
            }
            self.selected = None;
        }

        self.pointer.on_down(point, button, &self.camera, &self.layout)
    }

    fn place_anchor(
        &mut self,
        point: ViewPoint,
        button: MouseButton,
        region: Region,
        transform: &Transform,
    ) -> bool {
        if button == MouseButton::Right {
            self.cancel_creating();
            return true;
        }
        if button != MouseButton::Left || region != Region::MainPane || transform.is_degenerate() {
            return false;
        }

        let anchor = transform.view_to_chart(point);
        let Session::Creating { kind, anchors, .. } = &mut self.session else {
            return false;
        };
        anchors.push(anchor);

        if let Some(tool) = kind.build(anchors) {
            let id = self.annotations.add_tool(tool);
            self.selected = Some(id);
            self.session = Session::Idle;
        }
        true
    }

    fn begin_editing(&mut self, point: ViewPoint, transform: &Transform) -> bool {
        let project = |chart_point| transform.chart_to_view(chart_point);
        let viewport = *self.camera.viewport();
        let tolerance = self.config.hit_tolerance;

        let handle = if let Some((id, index)) =
            self.annotations.control_point_at(point, project, &viewport, tolerance)
        {
            Some((id, Handle::ControlPoint(index)))
        } else {
            self.annotations
                .tool_at_point(point, project, &viewport, tolerance)
                .and_then(|id| {
                    let tool = self.annotations.get(id)?;
                    let grab = transform.view_to_chart(point);
                    Some((id, Handle::body(grab, grab_anchor(tool, grab))))
                })
        };

        let Some((id, handle)) = handle else {
            return false;
        };

        log::debug!("Editing {id} with {handle:?}");
        self.selected = Some(id);
        self.session = Session::Editing { tool: id, handle };
        true
    }

    /// Returns `true` when the frame needs repainting.
    pub fn on_pointer_move(&mut self, point: ViewPoint) -> bool {
        if !point.is_finite() {
            return false;
        }

        let transform = self.transform();

        match &mut self.session {
            Session::Creating { cursor, .. } => {
                if transform.is_degenerate() {
                    return false;
                }
                *cursor = Some(transform.view_to_chart(point));
                true
            }
            Session::Editing { tool, handle } => {
                let (id, handle) = (*tool, *handle);
                if transform.is_degenerate() {
                    return false;
                }
                let pointer = transform.view_to_chart(point);

                let Some(tool) = self.annotations.get_mut(id) else {
                    self.session = Session::Idle;
                    return false;
                };

                match handle {
                    Handle::ControlPoint(index) => tool.update_control_point(index, pointer),
                    Handle::Body { .. } => {
                        if let Some(target) = handle.centroid_target(pointer) {
                            tool.update_position(target);
                        }
                    }
                }
                true
            }
            Session::Idle => {
                if self.pointer.interaction().is_idle() {
                    self.hover = self.hover_at(point, &transform);
                    return false;
                }

                let changed = self.pointer.on_move(point, &mut self.camera, &self.layout);
                if changed {
                    self.annotations.mark_all_for_redraw();
                }
                true
            }
        }
    }

    fn hover_at(&self, point: ViewPoint, transform: &Transform) -> Hover {
        let region = self.geometry().region_at(point, self.config.divider_hit_tolerance);

        if region != Region::MainPane || transform.is_degenerate() {
            return Hover::Region(region);
        }

        let project = |chart_point| transform.chart_to_view(chart_point);
        let viewport = self.camera.viewport();
        let tolerance = self.config.hit_tolerance;

        if self
            .annotations
            .control_point_at(point, project, viewport, tolerance)
            .is_some()
        {
            Hover::ControlPoint
        } else if self
            .annotations
            .tool_at_point(point, project, viewport, tolerance)
            .is_some()
        {
            Hover::Tool
        } else {
            Hover::Region(region)
        }
    }

    pub fn on_pointer_up(&mut self, _point: ViewPoint, _button: MouseButton) {
        if let Session::Editing { tool, .. } = self.session {
            log::debug!("Finished editing {tool}");
            self.session = Session::Idle;
        }
        self.pointer.on_up();
    }

    /// Returns `true` when the camera changed.
    pub fn on_wheel(&mut self, point: ViewPoint, delta: f64) -> bool {
        if !(point.is_finite() && delta.is_finite()) {
            return false;
        }

        let changed = self.pointer.on_wheel(point, delta, &mut self.camera, &self.layout);
        if changed {
            self.annotations.mark_all_for_redraw();
        }
        changed
    }

    /// Escape cancels placement or deselects; Delete removes the selection.
    pub fn on_key(&mut self, key: Key) -> bool {
        match key {
            Key::Escape if self.session.is_creating() => {
                self.cancel_creating();
                true
            }
            Key::Escape => self.selected.take().is_some(),
            Key::Delete | Key::Backspace => match self.selected {
                Some(id) => self.remove_tool(id).is_some(),
                None => false,
            },
            Key::Other => false,
        }
    }

    /// Emits the whole frame: grid, candles, indicator, divider, annotations,
    /// selection handles, placement preview and axis labels.
    pub fn draw(&self, frame: &mut impl Frame) {
        let geometry = self.geometry();
        let transform = self.camera.transform(&geometry);

        if transform.is_degenerate() {
            log::debug!("Skipping draw, degenerate view: {transform:?}");
            return;
        }

        let viewport = self.camera.viewport();
        let project = |point: ChartPoint| transform.chart_to_view(point);

        self.draw_grid(frame, &transform, &geometry);
        self.draw_candles(frame, &transform);
        self.draw_indicator(frame, &transform);

        frame.fill_rectangle(geometry.divider(), Color::GRID);

        self.annotations.draw_all(frame, project, viewport);

        if let Some(tool) = self.selected_tool() {
            tools::draw_handles(tool, frame, project, viewport);
        }

        if let Session::Creating {
            kind,
            anchors,
            cursor,
        } = &self.session
        {
            if let Some(preview) = cursor.and_then(|cursor| kind.preview(anchors, cursor)) {
                tools::draw(&preview, frame, project, viewport);
            }
            for anchor in anchors {
                let point = project(*anchor);
                if point.is_finite() {
                    frame.fill_ellipse(point, tools::HANDLE_RADIUS, tools::HANDLE_RADIUS, kind.default_color());
                }
            }
        }

        self.draw_labels(frame, &transform, &geometry);
    }

    /// Repaints only annotations flagged since the last call.
    pub fn draw_dirty_tools(&mut self, frame: &mut impl Frame) -> usize {
        let transform = self.transform();
        if transform.is_degenerate() {
            return 0;
        }

        let viewport = *self.camera.viewport();
        self.annotations
            .draw_dirty(frame, |point| transform.chart_to_view(point), &viewport)
    }

    fn draw_grid(&self, frame: &mut impl Frame, transform: &Transform, geometry: &PaneGeometry) {
        let viewport = self.camera.viewport();
        let grid = Stroke::new(Color::GRID, 1.0);
        let main = geometry.main_pane;
        let indicator = geometry.indicator_pane;

        for (_, label) in scale::time_labels(viewport, transform) {
            frame.stroke_line(
                ViewPoint::new(label.position, main.y),
                ViewPoint::new(label.position, main.bottom()),
                grid,
            );
            if !indicator.is_empty() {
                frame.stroke_line(
                    ViewPoint::new(label.position, indicator.y),
                    ViewPoint::new(label.position, indicator.bottom()),
                    grid,
                );
            }
        }

        for label in scale::price_labels(viewport, transform) {
            frame.stroke_line(
                ViewPoint::new(main.x, label.position),
                ViewPoint::new(main.right(), label.position),
                grid,
            );
        }

        for label in scale::indicator_labels(transform) {
            frame.stroke_line(
                ViewPoint::new(indicator.x, label.position),
                ViewPoint::new(indicator.right(), label.position),
                grid.with_style(LineStyle::Dotted),
            );
        }
    }

    fn draw_candles(&self, frame: &mut impl Frame, transform: &Transform) {
        let width = self.candle_width_pixels();

        for kline in self.visible_klines() {
            let x = transform.time_to_x(millis_to_time(kline.time));
            let high = transform.price_to_y(kline.high);
            let low = transform.price_to_y(kline.low);
            let open = transform.price_to_y(kline.open);
            let close = transform.price_to_y(kline.close);

            if ![x, high, low, open, close].iter().all(|value| value.is_finite()) {
                continue;
            }

            let color = if kline.is_bullish() {
                Color::GREEN
            } else {
                Color::RED
            };

            frame.stroke_line(ViewPoint::new(x, high), ViewPoint::new(x, low), Stroke::new(color, 1.0));

            let top = open.min(close);
            let body = Rect::new(x - width / 2.0, top, width, (open - close).abs().max(1.0));
            frame.fill_rectangle(body, color);
        }
    }

    fn draw_indicator(&self, frame: &mut impl Frame, transform: &Transform) {
        if transform.is_indicator_degenerate() || self.indicator.len() < 2 {
            return;
        }

        let viewport = self.camera.viewport();
        let margin = self
            .timeframe
            .map_or(Duration::zero(), |timeframe| secs_duration(timeframe.to_seconds()));
        let min = time_to_millis(viewport.min_time - margin);
        let max = time_to_millis(viewport.max_time + margin);

        let stroke = Stroke::new(Color::TEAL, 1.5);

        for pair in self.indicator.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if b.time < min || a.time > max {
                continue;
            }

            let from = transform.indicator_to_view(millis_to_time(a.time), a.value);
            let to = transform.indicator_to_view(millis_to_time(b.time), b.value);

            if from.is_finite() && to.is_finite() {
                frame.stroke_line(from, to, stroke);
            }
        }
    }

    fn draw_labels(&self, frame: &mut impl Frame, transform: &Transform, geometry: &PaneGeometry) {
        let viewport = self.camera.viewport();
        let color = Color::WHITE.scale_alpha(0.7);

        let text = |content: String, position: ViewPoint, align_x: Alignment| Text {
            content,
            position,
            color,
            size: LABEL_SIZE,
            align_x,
            align_y: Alignment::Center,
        };

        let price_x = geometry.price_scale.x + LABEL_PADDING;
        for label in scale::price_labels(viewport, transform) {
            frame.fill_text(text(
                label.content,
                ViewPoint::new(price_x, label.position),
                Alignment::Start,
            ));
        }

        for label in scale::indicator_labels(transform) {
            frame.fill_text(text(
                label.content,
                ViewPoint::new(price_x, label.position),
                Alignment::Start,
            ));
        }

        let time_y = geometry.time_scale.center().y;
        for (_, label) in scale::time_labels(viewport, transform) {
            frame.fill_text(text(
                label.content,
                ViewPoint::new(label.position, time_y),
                Alignment::Center,
            ));
        }
    }
}

/// Point a body drag keeps at a fixed offset from the pointer. Horizontal
/// lines have no time anchor, so the grab time stands in.
fn grab_anchor(tool: &Tool, grab: ChartPoint) -> ChartPoint {
    match tool {
        Tool::HorizontalLine(line) => ChartPoint::new(grab.time, line.price),
        _ => tool.centroid().unwrap_or(grab),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR_MS: u64 = 3_600_000;
    const START_MS: u64 = 1_700_000_000_000;

    fn klines(count: u64) -> Vec<Kline> {
        (0..count)
            .map(|i| {
                let open = 100.0 + (i % 7) as f64;
                Kline {
                    time: START_MS + i * 4 * HOUR_MS,
                    open,
                    high: open + 3.0,
                    low: open - 2.0,
                    close: open + 1.0,
                    volume: 10.0,
                }
            })
            .collect()
    }

    fn chart() -> Chart {
        let mut chart = Chart::new(ChartConfig::default());
        chart.resize(1000.0, 800.0);
        chart.load_klines(Timeframe::H4, klines(50));
        chart
    }

    #[test]
    fn first_load_frames_later_loads_keep_camera() {
        let mut chart = chart();
        assert_eq!(chart.viewport().max_time, millis_to_time(START_MS + 49 * 4 * HOUR_MS));

        chart.on_wheel(ViewPoint::new(300.0, 200.0), 1.0);
        let viewport = *chart.viewport();

        chart.load_klines(Timeframe::H4, klines(60));
        assert_eq!(*chart.viewport(), viewport);
    }

    #[test]
    fn visible_klines_cover_viewport() {
        let mut chart = chart();
        assert_eq!(chart.visible_klines().len(), 50);

        let last = millis_to_time(chart.klines()[49].time);
        chart.update_camera(|camera| {
            camera.set_time_range(Duration::hours(20));
            camera.position_to_last_candle(last);
        });
        let visible = chart.visible_klines();

        assert!(visible.len() < 50);
        assert_eq!(visible.last(), chart.klines().last());
    }

    #[test]
    fn candle_width_tracks_zoom() {
        let mut chart = chart();
        let width = chart.candle_width_pixels();
        assert!(width >= 1.0);

        chart.update_camera(|camera| {
            camera.zoom_axis(0.5, 1.0);
        });
        assert!((chart.candle_width_pixels() - width * 2.0).abs() < 1e-6);
    }

    #[test]
    fn escape_and_right_click_cancel_placement() {
        let mut chart = chart();

        chart.start_creating(ToolKind::TrendLine);
        assert!(chart.on_key(Key::Escape));
        assert!(chart.session().is_idle());

        chart.start_creating(ToolKind::TrendLine);
        chart.on_pointer_down(ViewPoint::new(200.0, 200.0), MouseButton::Left);
        chart.on_pointer_down(ViewPoint::new(300.0, 200.0), MouseButton::Right);
        assert!(chart.session().is_idle());
        assert!(chart.tools().is_empty());
    }

    #[test]
    fn delete_removes_selection() {
        let mut chart = chart();
        chart.start_creating(ToolKind::HorizontalLine);
        chart.on_pointer_down(ViewPoint::new(300.0, 300.0), MouseButton::Left);
        assert_eq!(chart.tools().len(), 1);
        assert!(chart.selected_tool().is_some());

        assert!(chart.on_key(Key::Delete));
        assert!(chart.tools().is_empty());
        assert!(!chart.on_key(Key::Delete));
    }

    #[test]
    fn draw_emits_candles_and_labels() {
        let chart = chart();
        let mut frame = Recorder::new();

        chart.draw(&mut frame);

        let rectangles = frame
            .commands
            .iter()
            .filter(|command| matches!(command, super::frame::Command::FillRectangle { .. }))
            .count();
        // one body per candle plus the divider
        assert_eq!(rectangles, 51);
        assert!(frame.texts().count() > 0);
    }

    #[test]
    fn camera_changes_mark_tools_dirty() {
        let mut chart = chart();
        chart.add_tool(Tool::HorizontalLine(data::tool::HorizontalLine::new(100.0)));

        let mut frame = Recorder::new();
        assert_eq!(chart.draw_dirty_tools(&mut frame), 1);
        assert_eq!(chart.draw_dirty_tools(&mut frame), 0);

        chart.on_wheel(ViewPoint::new(300.0, 200.0), -1.0);
        assert_eq!(chart.draw_dirty_tools(&mut frame), 1);
    }
}
