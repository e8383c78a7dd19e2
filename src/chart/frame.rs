//! Drawing contract between the chart and a concrete renderer.

use data::{Color, LineStyle};

use super::coords::{Rect, ViewPoint};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f32,
    pub style: LineStyle,
}

impl Stroke {
    pub fn new(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            style: LineStyle::Solid,
        }
    }

    pub fn with_style(self, style: LineStyle) -> Self {
        Self { style, ..self }
    }

    pub fn dash_pattern(&self) -> &'static [f32] {
        self.style.dash_pattern()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Start,
    Center,
    End,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub content: String,
    pub position: ViewPoint,
    pub color: Color,
    pub size: f32,
    pub align_x: Alignment,
    pub align_y: Alignment,
}

/// Sink for draw calls, implemented by the host's renderer.
pub trait Frame {
    fn stroke_line(&mut self, from: ViewPoint, to: ViewPoint, stroke: Stroke);

    fn stroke_rectangle(&mut self, rect: Rect, stroke: Stroke);

    fn fill_rectangle(&mut self, rect: Rect, color: Color);

    fn fill_ellipse(&mut self, center: ViewPoint, radius_x: f64, radius_y: f64, color: Color);

    fn fill_text(&mut self, text: Text);
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Line {
        from: ViewPoint,
        to: ViewPoint,
        stroke: Stroke,
    },
    StrokeRectangle {
        rect: Rect,
        stroke: Stroke,
    },
    FillRectangle {
        rect: Rect,
        color: Color,
    },
    FillEllipse {
        center: ViewPoint,
        radius_x: f64,
        radius_y: f64,
        color: Color,
    },
    Text(Text),
}

/// A [`Frame`] that keeps every call, for headless hosts and snapshot tests.
#[derive(Debug, Default, Clone)]
pub struct Recorder {
    pub commands: Vec<Command>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn lines(&self) -> impl Iterator<Item = (ViewPoint, ViewPoint, Stroke)> + '_ {
        self.commands.iter().filter_map(|command| match command {
            Command::Line { from, to, stroke } => Some((*from, *to, *stroke)),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &Text> {
        self.commands.iter().filter_map(|command| match command {
            Command::Text(text) => Some(text),
            _ => None,
        })
    }
}

impl Frame for Recorder {
    fn stroke_line(&mut self, from: ViewPoint, to: ViewPoint, stroke: Stroke) {
        self.commands.push(Command::Line { from, to, stroke });
    }

    fn stroke_rectangle(&mut self, rect: Rect, stroke: Stroke) {
        self.commands.push(Command::StrokeRectangle { rect, stroke });
    }

    fn fill_rectangle(&mut self, rect: Rect, color: Color) {
        self.commands.push(Command::FillRectangle { rect, color });
    }

    fn fill_ellipse(&mut self, center: ViewPoint, radius_x: f64, radius_y: f64, color: Color) {
        self.commands.push(Command::FillEllipse {
            center,
            radius_x,
            radius_y,
            color,
        });
    }

    fn fill_text(&mut self, text: Text) {
        self.commands.push(Command::Text(text));
    }
}
