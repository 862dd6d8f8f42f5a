//! Draw pass: walk a parsed tree and issue drawing-session calls.
//!
//! Transforms compose as `parent * own`, so a node's own transform is applied first in its local
//! space and the parent's afterwards. Every drawable node draws inside an opacity layer holding its
//! opacity; the page itself does not.

use crate::document::model::{Canvas, Circle, Line, Node, Page, Rectangle, Text};
use crate::foundation::core::{Affine, Color};
use crate::session::{DrawSession, OpacityLayer, TextFormat};

impl Page {
    /// Clear the page area to white and draw every child with `transform` as parent transform.
    ///
    /// The page must have been parsed successfully; drawing an unparsed page draws with default
    /// geometry.
    pub fn draw(&self, session: &mut dyn DrawSession, transform: Affine) {
        session.set_transform(transform);
        session.fill_rect(self.size.to_rect(), Color::WHITE);
        for child in &self.items {
            child.draw(session, transform);
        }
    }
}

impl Node {
    pub fn draw(&self, session: &mut dyn DrawSession, parent: Affine) {
        match self {
            Self::Canvas(n) => n.draw(session, parent),
            Self::Circle(n) => n.draw(session, parent),
            Self::Text(n) => n.draw(session, parent),
            Self::Line(n) => n.draw(session, parent),
            Self::Rectangle(n) => n.draw(session, parent),
        }
    }
}

impl Canvas {
    fn draw(&self, session: &mut dyn DrawSession, parent: Affine) {
        let mut layer = OpacityLayer::push(session, self.placement.opacity);
        let local = parent * self.placement.matrix;
        for child in &self.items {
            child.draw(&mut *layer, local);
        }
    }
}

impl Circle {
    fn draw(&self, session: &mut dyn DrawSession, parent: Affine) {
        let mut layer = OpacityLayer::push(session, self.placement.opacity);
        layer.set_transform(parent * self.placement.matrix);
        if self.fill.is_some() {
            layer.fill_circle(self.center_pt, self.radius, self.fill_color);
        }
        if self.stroke.is_some() && self.stroke_width > 0.0 {
            layer.stroke_circle(
                self.center_pt,
                self.radius,
                self.stroke_color,
                self.stroke_width,
            );
        }
    }
}

impl Text {
    fn draw(&self, session: &mut dyn DrawSession, parent: Affine) {
        let mut layer = OpacityLayer::push(session, self.placement.opacity);
        layer.set_transform(parent * self.placement.matrix);
        layer.draw_text(
            &self.string,
            self.origin_pt,
            self.text_color,
            TextFormat {
                family: &self.font,
                size: self.size,
            },
        );
    }
}

impl Line {
    fn draw(&self, session: &mut dyn DrawSession, parent: Affine) {
        let mut layer = OpacityLayer::push(session, self.placement.opacity);
        layer.set_transform(parent * self.placement.matrix);
        // Drawn even without a Color attribute; the resolved color is then transparent.
        layer.draw_line(
            self.endpoints[0],
            self.endpoints[1],
            self.line_color,
            self.width,
        );
    }
}

impl Rectangle {
    fn draw(&self, session: &mut dyn DrawSession, parent: Affine) {
        let mut layer = OpacityLayer::push(session, self.placement.opacity);
        layer.set_transform(parent * self.placement.matrix);
        if self.fill.is_some() {
            layer.fill_rect(self.rect, self.fill_color);
        }
        if self.stroke.is_some() && self.stroke_width > 0.0 {
            layer.stroke_rect(self.rect, self.stroke_color, self.stroke_width);
        }
    }
}
