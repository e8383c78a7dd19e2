use data::ChartConfig;

use super::coords::{Rect, ViewPoint};

/// Rectangles of every region on the chart surface for one frame.
///
/// Top to bottom: main plot, divider, indicator plot, time scale. The price and
/// indicator scales sit to the right of their plots.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PaneGeometry {
    pub surface: Rect,
    pub main_pane: Rect,
    pub indicator_pane: Rect,
    pub price_scale: Rect,
    pub indicator_scale: Rect,
    pub time_scale: Rect,
    /// Top edge of the divider strip.
    pub divider_y: f64,
    pub divider_thickness: f64,
    /// Indicator share of the space left after the divider.
    pub indicator_ratio: f64,
}

impl PaneGeometry {
    pub fn divider(&self) -> Rect {
        Rect::new(
            self.main_pane.x,
            self.divider_y,
            self.main_pane.width + self.price_scale.width,
            self.divider_thickness,
        )
    }

    /// Divider strip grown by `tolerance` above and below.
    pub fn divider_hit_zone(&self, tolerance: f64) -> Rect {
        let divider = self.divider();

        Rect::new(
            divider.x,
            divider.y - tolerance,
            divider.width,
            divider.height + 2.0 * tolerance,
        )
    }

    /// Region directly under `point`. The divider zone wins over the panes it
    /// overlaps.
    pub fn region_at(&self, point: ViewPoint, divider_tolerance: f64) -> Region {
        if !point.is_finite() {
            return Region::Outside;
        }

        if self.divider_hit_zone(divider_tolerance).contains(point) {
            Region::Divider
        } else if self.time_scale.contains(point) {
            Region::TimeScale
        } else if self.price_scale.contains(point) {
            Region::PriceScale
        } else if self.indicator_scale.contains(point) {
            Region::IndicatorScale
        } else if self.main_pane.contains(point) {
            Region::MainPane
        } else if self.indicator_pane.contains(point) {
            Region::IndicatorPane
        } else {
            Region::Outside
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    MainPane,
    IndicatorPane,
    PriceScale,
    IndicatorScale,
    TimeScale,
    Divider,
    Outside,
}

/// Splits the surface into panes according to the current size and the
/// indicator ratio stored in the camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaneLayout {
    config: ChartConfig,
    width: f64,
    height: f64,
}

impl PaneLayout {
    pub fn new(config: ChartConfig) -> Self {
        Self {
            config,
            width: 0.0,
            height: 0.0,
        }
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        let sanitize = |value: f64| if value.is_finite() { value.max(0.0) } else { 0.0 };

        self.width = sanitize(width);
        self.height = sanitize(height);
    }

    fn plot_width(&self) -> f64 {
        (self.width - self.config.left_margin - self.config.price_scale_width).max(0.0)
    }

    /// Height shared by both panes and the divider.
    fn plot_height(&self) -> f64 {
        (self.height - self.config.top_margin - self.config.time_scale_height).max(0.0)
    }

    fn divider_thickness(&self) -> f64 {
        self.config.divider_thickness.min(self.plot_height())
    }

    pub fn geometry(&self, indicator_ratio: f64) -> PaneGeometry {
        let config = &self.config;
        let ratio = config.clamp_indicator_ratio(indicator_ratio);

        let left = config.left_margin;
        let top = config.top_margin;
        let plot_width = self.plot_width();
        let divider_thickness = self.divider_thickness();
        let available = (self.plot_height() - divider_thickness).max(0.0);

        let indicator_height = available * ratio;
        let main_height = available - indicator_height;

        let divider_y = top + main_height;
        let indicator_top = divider_y + divider_thickness;
        let indicator_bottom = indicator_top + indicator_height;

        let scale_x = left + plot_width;
        let scale_width = (self.width - scale_x).max(0.0);

        PaneGeometry {
            surface: Rect::new(0.0, 0.0, self.width, self.height),
            main_pane: Rect::new(left, top, plot_width, main_height),
            indicator_pane: Rect::new(left, indicator_top, plot_width, indicator_height),
            price_scale: Rect::new(scale_x, top, scale_width, main_height),
            indicator_scale: Rect::new(scale_x, indicator_top, scale_width, indicator_height),
            time_scale: Rect::new(
                0.0,
                indicator_bottom,
                self.width,
                (self.height - indicator_bottom).max(0.0),
            ),
            divider_y,
            divider_thickness,
            indicator_ratio: ratio,
        }
    }

    /// Indicator ratio that puts the top of the divider at `divider_y`,
    /// clamped to the configured bounds.
    pub fn ratio_for_divider(&self, divider_y: f64, current_ratio: f64) -> f64 {
        let available = self.plot_height() - self.divider_thickness();

        if available <= 0.0 || !divider_y.is_finite() {
            return self.config.clamp_indicator_ratio(current_ratio);
        }

        let main_height = divider_y - self.config.top_margin;
        let ratio = 1.0 - main_height / available;
        let clamped = self.config.clamp_indicator_ratio(ratio);
        if clamped != ratio {
            log::trace!("Clamped indicator ratio {ratio} to {clamped}");
        }
        clamped
    }
}
