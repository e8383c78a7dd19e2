//! Pointer-driven camera interactions and the annotation editing session.
//!
//! [`PointerState`] owns exactly one [`Interaction`] at a time. A pointer-down
//! picks the mode from the region under the pointer; moves are routed to the
//! matching camera or layout operation until the pointer is released.

use chrono::Duration;
use data::chart::ChartPoint;
use data::tool::{ToolId, ToolKind};

use super::camera::Camera;
use super::coords::ViewPoint;
use super::layout::{PaneLayout, Region};

/// Bounds of a single scale-drag step.
const MIN_DRAG_FACTOR: f64 = 0.5;
const MAX_DRAG_FACTOR: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Delete,
    Backspace,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    Time,
    Price,
    Indicator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Main,
    Indicator,
}

#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub enum Interaction {
    #[default]
    Idle,
    Panning {
        last: ViewPoint,
        pane: Pane,
    },
    ScaleZooming {
        scale: Scale,
        last: ViewPoint,
    },
    DraggingDivider {
        /// Pointer y minus divider top at pointer-down.
        grab_offset: f64,
    },
}

impl Interaction {
    pub fn is_idle(&self) -> bool {
        matches!(self, Interaction::Idle)
    }
}

/// Zoom factor for a scale-strip drag of `delta` pixels.
pub fn scale_drag_factor(delta: f64, sensitivity: f64) -> f64 {
    if !delta.is_finite() {
        return 1.0;
    }
    (1.0 + delta * sensitivity).clamp(MIN_DRAG_FACTOR, MAX_DRAG_FACTOR)
}

/// Zoom factor for one wheel step: scrolling down (negative delta) zooms out.
pub fn wheel_factor(delta: f64, zoom_in: f64, zoom_out: f64) -> Option<f64> {
    if delta < 0.0 {
        Some(zoom_out)
    } else if delta > 0.0 {
        Some(zoom_in)
    } else {
        None
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PointerState {
    interaction: Interaction,
}

impl PointerState {
    pub fn interaction(&self) -> Interaction {
        self.interaction
    }

    /// Starts a drag. Returns `true` when the event was captured.
    pub fn on_down(
        &mut self,
        point: ViewPoint,
        button: MouseButton,
        camera: &Camera,
        layout: &PaneLayout,
    ) -> bool {
        if button != MouseButton::Left {
            return false;
        }

        let geometry = layout.geometry(camera.indicator_ratio());
        let region = geometry.region_at(point, layout.config().divider_hit_tolerance);

        self.interaction = match region {
            Region::Divider => Interaction::DraggingDivider {
                grab_offset: point.y - geometry.divider_y,
            },
            Region::TimeScale => Interaction::ScaleZooming {
                scale: Scale::Time,
                last: point,
            },
            Region::PriceScale => Interaction::ScaleZooming {
                scale: Scale::Price,
                last: point,
            },
            Region::IndicatorScale => Interaction::ScaleZooming {
                scale: Scale::Indicator,
                last: point,
            },
            Region::MainPane => Interaction::Panning {
                last: point,
                pane: Pane::Main,
            },
            Region::IndicatorPane => Interaction::Panning {
                last: point,
                pane: Pane::Indicator,
            },
            Region::Outside => Interaction::Idle,
        };

        !self.interaction.is_idle()
    }

    /// Applies one move step. Returns `true` when the main camera changed.
    pub fn on_move(&mut self, point: ViewPoint, camera: &mut Camera, layout: &PaneLayout) -> bool {
        if !point.is_finite() {
            return false;
        }

        let config = layout.config();
        let geometry = layout.geometry(camera.indicator_ratio());

        match &mut self.interaction {
            Interaction::Idle => false,
            Interaction::Panning { last, pane } => {
                let dx = point.x - last.x;
                let dy = point.y - last.y;
                *last = point;

                match pane {
                    Pane::Main => camera.pan_by_pixels(dx, dy, &geometry),
                    Pane::Indicator => {
                        camera.pan_by_pixels(dx, 0.0, &geometry);
                        camera.pan_indicator_by_pixels(dy, &geometry);
                    }
                }
                true
            }
            Interaction::ScaleZooming { scale, last } => {
                let delta = match scale {
                    Scale::Time => -(point.x - last.x),
                    Scale::Price | Scale::Indicator => point.y - last.y,
                };
                *last = point;

                let factor = scale_drag_factor(delta, config.scale_drag_sensitivity);
                match scale {
                    Scale::Time => {
                        camera.zoom_axis(factor, 1.0);
                        true
                    }
                    Scale::Price => {
                        camera.zoom_axis(1.0, factor);
                        true
                    }
                    Scale::Indicator => {
                        camera.zoom_indicator_axis(factor);
                        false
                    }
                }
            }
            Interaction::DraggingDivider { grab_offset } => {
                let ratio = layout.ratio_for_divider(point.y - *grab_offset, camera.indicator_ratio());
                camera.set_indicator_ratio(ratio);
                true
            }
        }
    }

    pub fn on_up(&mut self) {
        self.interaction = Interaction::Idle;
    }

    /// One-shot zoom. Over the indicator pane only the time axis zooms.
    /// Returns `true` when the camera changed.
    pub fn on_wheel(
        &self,
        point: ViewPoint,
        delta: f64,
        camera: &mut Camera,
        layout: &PaneLayout,
    ) -> bool {
        let config = layout.config();
        let Some(factor) = wheel_factor(delta, config.wheel_zoom_in, config.wheel_zoom_out) else {
            return false;
        };

        let geometry = layout.geometry(camera.indicator_ratio());

        match geometry.region_at(point, config.divider_hit_tolerance) {
            Region::IndicatorPane | Region::IndicatorScale | Region::TimeScale => {
                camera.zoom_time_at_screen_x(point.x, factor, &geometry);
                true
            }
            Region::MainPane | Region::PriceScale => {
                camera.zoom_at_screen_point(point, factor, &geometry);
                true
            }
            Region::Divider | Region::Outside => false,
        }
    }
}

/// Which part of a tool is being dragged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Handle {
    ControlPoint(usize),
    /// Offset from the pointer to the tool centroid at grab time.
    Body {
        time_offset: Duration,
        price_offset: f64,
    },
}

impl Handle {
    /// Body handle that keeps `centroid` at the same offset from `grab`.
    pub fn body(grab: ChartPoint, centroid: ChartPoint) -> Self {
        Handle::Body {
            time_offset: centroid.time - grab.time,
            price_offset: centroid.price - grab.price,
        }
    }

    /// Where the centroid goes when the pointer is at `pointer`.
    pub fn centroid_target(&self, pointer: ChartPoint) -> Option<ChartPoint> {
        match self {
            Handle::ControlPoint(_) => None,
            Handle::Body {
                time_offset,
                price_offset,
            } => Some(ChartPoint::new(
                pointer.time + *time_offset,
                pointer.price + price_offset,
            )),
        }
    }
}

/// Annotation placement or editing in progress.
#[derive(Debug, Default, Clone, PartialEq)]
pub enum Session {
    #[default]
    Idle,
    Creating {
        kind: ToolKind,
        anchors: Vec<ChartPoint>,
        cursor: Option<ChartPoint>,
    },
    Editing {
        tool: ToolId,
        handle: Handle,
    },
}

impl Session {
    pub fn creating(kind: ToolKind) -> Self {
        Session::Creating {
            kind,
            anchors: Vec::new(),
            cursor: None,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Session::Idle)
    }

    pub fn is_creating(&self) -> bool {
        matches!(self, Session::Creating { .. })
    }

    pub fn editing_tool(&self) -> Option<ToolId> {
        match self {
            Session::Editing { tool, .. } => Some(*tool),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorHint {
    Default,
    Crosshair,
    Grab,
    Grabbing,
    ResizingHorizontally,
    ResizingVertically,
    Pointer,
    Move,
}

/// What the pointer is over when nothing is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hover {
    Region(Region),
    ControlPoint,
    Tool,
}

impl Default for Hover {
    fn default() -> Self {
        Hover::Region(Region::Outside)
    }
}

pub fn cursor_hint(interaction: Interaction, session: &Session, hover: Hover) -> CursorHint {
    match session {
        Session::Creating { .. } => return CursorHint::Crosshair,
        Session::Editing { handle, .. } => {
            return match handle {
                Handle::ControlPoint(_) => CursorHint::Move,
                Handle::Body { .. } => CursorHint::Grabbing,
            };
        }
        Session::Idle => {}
    }

    match interaction {
        Interaction::Panning { .. } => CursorHint::Grabbing,
        Interaction::ScaleZooming {
            scale: Scale::Time, ..
        } => CursorHint::ResizingHorizontally,
        Interaction::ScaleZooming { .. } | Interaction::DraggingDivider { .. } => {
            CursorHint::ResizingVertically
        }
        Interaction::Idle => match hover {
            Hover::ControlPoint => CursorHint::Pointer,
            Hover::Tool => CursorHint::Move,
            Hover::Region(Region::Divider | Region::PriceScale | Region::IndicatorScale) => {
                CursorHint::ResizingVertically
            }
            Hover::Region(Region::TimeScale) => CursorHint::ResizingHorizontally,
            Hover::Region(Region::MainPane) => CursorHint::Crosshair,
            Hover::Region(Region::IndicatorPane) => CursorHint::Grab,
            Hover::Region(Region::Outside) => CursorHint::Default,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use data::ChartConfig;

    fn setup() -> (Camera, PaneLayout) {
        let config = ChartConfig::default();
        let mut layout = PaneLayout::new(config);
        layout.resize(1000.0, 646.0);

        let mut camera = Camera::new(config);
        let begin = DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap();
        camera.initialize(begin, begin + Duration::hours(100), 90.0, 110.0);

        (camera, layout)
    }

    #[test]
    fn down_selects_mode_by_region() {
        let (camera, layout) = setup();
        let mut pointer = PointerState::default();

        assert!(pointer.on_down(ViewPoint::new(100.0, 100.0), MouseButton::Left, &camera, &layout));
        assert!(matches!(
            pointer.interaction(),
            Interaction::Panning { pane: Pane::Main, .. }
        ));

        assert!(pointer.on_down(ViewPoint::new(500.0, 630.0), MouseButton::Left, &camera, &layout));
        assert!(matches!(
            pointer.interaction(),
            Interaction::ScaleZooming { scale: Scale::Time, .. }
        ));

        assert!(pointer.on_down(ViewPoint::new(950.0, 500.0), MouseButton::Left, &camera, &layout));
        assert!(matches!(
            pointer.interaction(),
            Interaction::ScaleZooming { scale: Scale::Indicator, .. }
        ));

        assert!(pointer.on_down(ViewPoint::new(500.0, 462.0), MouseButton::Left, &camera, &layout));
        assert!(matches!(pointer.interaction(), Interaction::DraggingDivider { .. }));

        pointer.on_up();
        assert!(!pointer.on_down(ViewPoint::new(100.0, 100.0), MouseButton::Right, &camera, &layout));
        assert!(pointer.interaction().is_idle());
    }

    #[test]
    fn price_scale_drag_only_touches_price_axis() {
        let (mut camera, layout) = setup();
        let mut pointer = PointerState::default();
        let time_range = camera.time_range_secs();
        let price_range = camera.state().price_range;

        pointer.on_down(ViewPoint::new(950.0, 100.0), MouseButton::Left, &camera, &layout);
        pointer.on_move(ViewPoint::new(950.0, 140.0), &mut camera, &layout);

        assert_eq!(camera.time_range_secs(), time_range);
        assert!((camera.state().price_range - price_range * 1.2).abs() < 1e-9);
    }

    #[test]
    fn time_scale_drag_zooms_in_right_out_left() {
        let (mut camera, layout) = setup();
        let mut pointer = PointerState::default();
        let time_range = camera.time_range_secs();

        pointer.on_down(ViewPoint::new(500.0, 630.0), MouseButton::Left, &camera, &layout);
        pointer.on_move(ViewPoint::new(1_000.0, 630.0), &mut camera, &layout);
        assert!((camera.time_range_secs() - time_range * 0.5).abs() < 1e-3);

        pointer.on_move(ViewPoint::new(0.0, 630.0), &mut camera, &layout);
        assert!((camera.time_range_secs() - time_range).abs() < 1e-3);
    }

    #[test]
    fn indicator_pane_drag_pans_time_and_indicator_axis() {
        let (mut camera, layout) = setup();
        let mut pointer = PointerState::default();
        let geometry = layout.geometry(camera.indicator_ratio());
        let transform = camera.transform(&geometry);
        let before = *camera.state();

        assert!(pointer.on_down(ViewPoint::new(300.0, 520.0), MouseButton::Left, &camera, &layout));
        assert!(pointer.on_move(ViewPoint::new(340.0, 550.0), &mut camera, &layout));

        let after = camera.state();
        let expected_y = before.indicator_camera_y + 30.0 / transform.pixels_per_indicator_unit();
        let expected_x = before.position.x - 40.0 / transform.pixels_per_second();
        assert!((after.indicator_camera_y - expected_y).abs() < 1e-9);
        assert!((after.position.x - expected_x).abs() < 1e-6);
        assert_eq!(after.position.y, before.position.y);
        assert_eq!(after.price_range, before.price_range);
    }

    #[test]
    fn indicator_scale_drag_only_touches_indicator_range() {
        let (mut camera, layout) = setup();
        let mut pointer = PointerState::default();
        let before = *camera.state();

        pointer.on_down(ViewPoint::new(950.0, 500.0), MouseButton::Left, &camera, &layout);
        assert!(!pointer.on_move(ViewPoint::new(950.0, 540.0), &mut camera, &layout));

        let after = camera.state();
        assert!((after.indicator_range - before.indicator_range * 1.2).abs() < 1e-9);
        assert_eq!(after.time_range, before.time_range);
        assert_eq!(after.price_range, before.price_range);
        assert_eq!(after.position, before.position);
        assert_eq!(after.indicator_camera_y, before.indicator_camera_y);
    }

    #[test]
    fn divider_drag_is_clamped() {
        let (mut camera, layout) = setup();
        let mut pointer = PointerState::default();

        pointer.on_down(ViewPoint::new(500.0, 460.0), MouseButton::Left, &camera, &layout);
        pointer.on_move(ViewPoint::new(500.0, 600.0), &mut camera, &layout);
        assert_eq!(camera.indicator_ratio(), 0.1);

        pointer.on_move(ViewPoint::new(500.0, 20.0), &mut camera, &layout);
        assert_eq!(camera.indicator_ratio(), 0.5);

        pointer.on_up();
        assert!(pointer.interaction().is_idle());
    }

    #[test]
    fn wheel_over_indicator_keeps_price_range() {
        let (mut camera, layout) = setup();
        let pointer = PointerState::default();
        let price_range = camera.state().price_range;
        let time_range = camera.time_range_secs();

        assert!(pointer.on_wheel(ViewPoint::new(300.0, 520.0), 1.0, &mut camera, &layout));

        assert_eq!(camera.state().price_range, price_range);
        assert!((camera.time_range_secs() - time_range * 0.9).abs() < 1e-3);
        assert!(!pointer.on_wheel(ViewPoint::new(300.0, 520.0), 0.0, &mut camera, &layout));
    }

    #[test]
    fn factors() {
        assert_eq!(scale_drag_factor(1_000.0, 0.005), 2.0);
        assert_eq!(scale_drag_factor(-1_000.0, 0.005), 0.5);
        assert_eq!(scale_drag_factor(f64::NAN, 0.005), 1.0);

        assert_eq!(wheel_factor(-3.0, 0.9, 1.1), Some(1.1));
        assert_eq!(wheel_factor(2.0, 0.9, 1.1), Some(0.9));
        assert_eq!(wheel_factor(0.0, 0.9, 1.1), None);
    }

    #[test]
    fn cursor_follows_state_then_hover() {
        let session = Session::Idle;

        assert_eq!(
            cursor_hint(Interaction::Idle, &session, Hover::Region(Region::TimeScale)),
            CursorHint::ResizingHorizontally
        );
        assert_eq!(
            cursor_hint(Interaction::Idle, &session, Hover::ControlPoint),
            CursorHint::Pointer
        );
        assert_eq!(
            cursor_hint(
                Interaction::Panning {
                    last: ViewPoint::default(),
                    pane: Pane::Main
                },
                &session,
                Hover::Tool
            ),
            CursorHint::Grabbing
        );
        assert_eq!(
            cursor_hint(
                Interaction::Idle,
                &Session::creating(ToolKind::Rectangle),
                Hover::Tool
            ),
            CursorHint::Crosshair
        );
    }
}
