//! A [`DrawSession`] that records the ordered sequence of drawing calls.
//!
//! Each primitive is stored with the transform it was drawn under and its effective opacity (the
//! product of all open layers), so two recordings compare equal exactly when they would produce
//! the same picture on any surface.

use crate::foundation::core::{Affine, Color, Point, Rect};
use crate::session::{DrawSession, TextFormat};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCall {
    PushLayer {
        opacity: f32,
    },
    PopLayer,
    Draw {
        primitive: Primitive,
        transform: Affine,
        opacity: f32,
    },
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Primitive {
    FillRect {
        rect: Rect,
        color: Color,
    },
    StrokeRect {
        rect: Rect,
        color: Color,
        width: f64,
    },
    FillCircle {
        center: Point,
        radius: f64,
        color: Color,
    },
    StrokeCircle {
        center: Point,
        radius: f64,
        color: Color,
        width: f64,
    },
    Line {
        from: Point,
        to: Point,
        color: Color,
        width: f64,
    },
    Text {
        text: String,
        origin: Point,
        color: Color,
        family: String,
        size: f64,
    },
}

#[derive(Debug)]
pub struct RecordingSession {
    calls: Vec<DrawCall>,
    transform: Affine,
    layers: Vec<f32>,
}

impl Default for RecordingSession {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingSession {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            transform: Affine::IDENTITY,
            layers: Vec::new(),
        }
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    pub fn into_calls(self) -> Vec<DrawCall> {
        self.calls
    }

    /// Number of layers pushed and not yet popped.
    pub fn open_layers(&self) -> usize {
        self.layers.len()
    }

    /// Only the drawn primitives, in order, without layer bookkeeping.
    pub fn primitives(&self) -> impl Iterator<Item = &Primitive> {
        self.calls.iter().filter_map(|c| match c {
            DrawCall::Draw { primitive, .. } => Some(primitive),
            _ => None,
        })
    }

    fn effective_opacity(&self) -> f32 {
        self.layers.iter().product()
    }

    fn record(&mut self, primitive: Primitive) {
        let call = DrawCall::Draw {
            primitive,
            transform: self.transform,
            opacity: self.effective_opacity(),
        };
        self.calls.push(call);
    }
}

impl DrawSession for RecordingSession {
    fn set_transform(&mut self, transform: Affine) {
        self.transform = transform;
    }

    fn push_opacity_layer(&mut self, opacity: f32) {
        self.layers.push(opacity);
        self.calls.push(DrawCall::PushLayer { opacity });
    }

    fn pop_layer(&mut self) {
        self.layers.pop();
        self.calls.push(DrawCall::PopLayer);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.record(Primitive::FillRect { rect, color });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f64) {
        self.record(Primitive::StrokeRect { rect, color, width });
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Color) {
        self.record(Primitive::FillCircle {
            center,
            radius,
            color,
        });
    }

    fn stroke_circle(&mut self, center: Point, radius: f64, color: Color, width: f64) {
        self.record(Primitive::StrokeCircle {
            center,
            radius,
            color,
            width,
        });
    }

    fn draw_line(&mut self, from: Point, to: Point, color: Color, width: f64) {
        self.record(Primitive::Line {
            from,
            to,
            color,
            width,
        });
    }

    fn draw_text(&mut self, text: &str, origin: Point, color: Color, format: TextFormat<'_>) {
        self.record(Primitive::Text {
            text: text.to_string(),
            origin,
            color,
            family: format.family.to_string(),
            size: format.size,
        });
    }
}
