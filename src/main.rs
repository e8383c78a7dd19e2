//! Headless session: loads synthetic candles, replays a short sequence of
//! pointer input and prints the resulting annotations as JSON.
//!
//! Pass a file path to load annotations from it first and save them back.

use std::{fs, path::PathBuf};

use chartsurface::Chart;
use chartsurface::chart::{IndicatorPoint, MouseButton, Recorder, ViewPoint};
use chartsurface::data::{ChartConfig, Kline, Timeframe, ToolKind};

const CANDLES: u64 = 200;
const START_MS: u64 = 1_735_689_600_000; // 2025-01-01
const MOMENTUM_PERIOD: usize = 14;

fn main() {
    chartsurface::logger::setup(cfg!(debug_assertions)).expect("Failed to initialize logger");

    if let Err(err) = run(std::env::args().nth(1).map(PathBuf::from)) {
        log::error!("{err}");
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run(annotations_path: Option<PathBuf>) -> Result<(), chartsurface::Error> {
    let mut chart = Chart::new(ChartConfig::default());
    chart.resize(1280.0, 720.0);

    let klines = synthetic_klines(Timeframe::H4);
    let timeframe = Timeframe::infer(&klines).unwrap_or(Timeframe::H4);
    chart.set_indicator_series(momentum(&klines));
    chart.load_klines(timeframe, klines);

    if let Some(path) = annotations_path.as_ref().filter(|path| path.exists()) {
        let count = chart.load_annotations(&fs::read_to_string(path)?)?;
        log::info!("Loaded {count} annotations from {}", path.display());
    }

    replay_input(&mut chart);

    let mut frame = Recorder::new();
    chart.draw(&mut frame);
    let dashed = frame
        .lines()
        .filter(|(_, _, stroke)| !stroke.dash_pattern().is_empty())
        .count();
    log::info!(
        "Frame has {} draw calls ({dashed} dashed lines), candle width {:.1}px, {} visible candles",
        frame.len(),
        chart.candle_width_pixels(),
        chart.visible_klines().len()
    );

    let json = chart.annotations_json()?;
    if let Some(path) = annotations_path {
        fs::write(&path, &json)?;
        log::info!("Saved annotations to {}", path.display());
    }
    println!("{json}");

    Ok(())
}

/// Zoom, pan, resize the indicator pane, then place and drag a trend line.
fn replay_input(chart: &mut Chart) {
    let center = chart.geometry().main_pane.center();

    chart.on_wheel(center, 1.0);

    chart.on_pointer_down(center, MouseButton::Left);
    chart.on_pointer_move(ViewPoint::new(center.x - 120.0, center.y + 15.0));
    chart.on_pointer_up(center, MouseButton::Left);

    let divider = chart.geometry().divider().center();
    chart.on_pointer_down(divider, MouseButton::Left);
    chart.on_pointer_move(ViewPoint::new(divider.x, divider.y - 60.0));
    chart.on_pointer_up(divider, MouseButton::Left);

    let start = ViewPoint::new(center.x - 200.0, center.y + 80.0);
    let end = ViewPoint::new(center.x + 150.0, center.y - 60.0);
    chart.start_creating(ToolKind::TrendLine);
    chart.on_pointer_down(start, MouseButton::Left);
    chart.on_pointer_move(end);
    chart.on_pointer_down(end, MouseButton::Left);

    chart.on_pointer_down(end, MouseButton::Left);
    chart.on_pointer_move(ViewPoint::new(end.x + 40.0, end.y - 20.0));
    chart.on_pointer_up(end, MouseButton::Left);

    chart.start_creating(ToolKind::HorizontalLine);
    chart.on_pointer_down(ViewPoint::new(center.x, center.y - 100.0), MouseButton::Left);
}

fn synthetic_klines(timeframe: Timeframe) -> Vec<Kline> {
    let step = timeframe.to_milliseconds();
    let mut close = 100.0;

    (0..CANDLES)
        .map(|i| {
            let t = i as f64;
            let open = close;
            close = open + (t / 9.0).sin() * 1.5 + (t / 3.0).cos() * 0.6;
            let wick = 0.4 + (t / 5.0).sin().abs();

            Kline {
                time: START_MS + i * step,
                open,
                high: open.max(close) + wick,
                low: open.min(close) - wick,
                close,
                volume: 1_000.0 + t * 3.0,
            }
        })
        .collect()
}

/// Percent change over [`MOMENTUM_PERIOD`] candles.
fn momentum(klines: &[Kline]) -> Vec<IndicatorPoint> {
    klines
        .windows(MOMENTUM_PERIOD + 1)
        .map(|window| {
            let first = window[0].close;
            let last = window[MOMENTUM_PERIOD];
            IndicatorPoint {
                time: last.time,
                value: (last.close - first) / first * 100.0,
            }
        })
        .collect()
}
