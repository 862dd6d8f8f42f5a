//! Drawing sessions: the surface a document draws into.

pub mod cpu;
pub mod recording;
pub(crate) mod text;

use std::ops::{Deref, DerefMut};

use crate::foundation::core::{Affine, Color, Point, Rect};

/// Font selection for [`DrawSession::draw_text`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextFormat<'a> {
    /// Family name as written in the document. May be empty.
    pub family: &'a str,
    /// Font size in document units.
    pub size: f64,
}

/// Immediate-mode 2D drawing surface.
///
/// Primitives are drawn in the coordinate space given by the last [`set_transform`] call.
/// Opacity layers nest: everything drawn between a push and its matching pop is composited with
/// the layer's opacity, multiplied with every enclosing layer.
///
/// [`set_transform`]: DrawSession::set_transform
pub trait DrawSession {
    fn set_transform(&mut self, transform: Affine);
    fn push_opacity_layer(&mut self, opacity: f32);
    fn pop_layer(&mut self);

    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f64);
    fn fill_circle(&mut self, center: Point, radius: f64, color: Color);
    fn stroke_circle(&mut self, center: Point, radius: f64, color: Color, width: f64);
    fn draw_line(&mut self, from: Point, to: Point, color: Color, width: f64);
    fn draw_text(&mut self, text: &str, origin: Point, color: Color, format: TextFormat<'_>);
}

/// An open opacity layer. The layer is popped when the guard is dropped, including while
/// unwinding.
pub struct OpacityLayer<'s> {
    session: &'s mut dyn DrawSession,
}

impl<'s> OpacityLayer<'s> {
    pub fn push(session: &'s mut dyn DrawSession, opacity: f64) -> Self {
        session.push_opacity_layer(opacity as f32);
        Self { session }
    }
}

impl<'s> Deref for OpacityLayer<'s> {
    type Target = dyn DrawSession + 's;

    fn deref(&self) -> &Self::Target {
        &*self.session
    }
}

impl DerefMut for OpacityLayer<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.session
    }
}

impl Drop for OpacityLayer<'_> {
    fn drop(&mut self) {
        self.session.pop_layer();
    }
}
