//! Parse pass: decode raw string attributes into cached numeric fields.
//!
//! Each node decodes its own attributes, then containers recurse into their children in document
//! order. The first failure aborts the whole pass; the error carries the path of the failing
//! attribute.

use crate::document::model::{Canvas, Circle, Line, Node, Page, Placement, Rectangle, Text};
use crate::document::values::{parse_color, parse_matrix, parse_reals, parse_rect, parse_vector};
use crate::foundation::core::{Point, Size};
use crate::foundation::error::{PdlError, PdlResult};

impl Page {
    /// Decode every attribute in the tree.
    ///
    /// Calling this twice is harmless. On error the tree may be partially decoded and must not be
    /// drawn; [`crate::load`] enforces that by consuming the page.
    pub fn parse(&mut self) -> PdlResult<()> {
        self.parse_inner().map_err(|e| e.within("Page"))
    }

    fn parse_inner(&mut self) -> PdlResult<()> {
        let dims = self
            .dimensions
            .as_deref()
            .ok_or_else(|| PdlError::format("missing required attribute"))
            .and_then(parse_reals::<2>)
            .map_err(|e| e.at_attribute("Dimensions"))?;
        self.size = Size::new(dims[0], dims[1]);

        parse_children(&mut self.items)
    }
}

fn parse_children(items: &mut [Node]) -> PdlResult<()> {
    for (i, child) in items.iter_mut().enumerate() {
        child
            .parse()
            .map_err(|e| e.within(&format!("{}[{i}]", child.tag())))?;
    }
    Ok(())
}

fn placement(transform: Option<&str>, opacity: Option<f64>) -> PdlResult<Placement> {
    Ok(Placement {
        matrix: parse_matrix(transform).map_err(|e| e.at_attribute("Transform"))?,
        // An explicit 0 is a real value; only an absent attribute defaults.
        opacity: opacity.unwrap_or(1.0),
    })
}

fn attr<T>(result: PdlResult<T>, name: &str) -> PdlResult<T> {
    result.map_err(|e| e.at_attribute(name))
}

impl Node {
    /// Decode this node and, for containers, its whole subtree.
    pub fn parse(&mut self) -> PdlResult<()> {
        match self {
            Self::Canvas(n) => n.parse(),
            Self::Circle(n) => n.parse(),
            Self::Text(n) => n.parse(),
            Self::Line(n) => n.parse(),
            Self::Rectangle(n) => n.parse(),
        }
    }
}

impl Canvas {
    fn parse(&mut self) -> PdlResult<()> {
        self.placement = placement(self.transform.as_deref(), self.opacity)?;
        parse_children(&mut self.items)
    }
}

impl Circle {
    fn parse(&mut self) -> PdlResult<()> {
        self.placement = placement(self.transform.as_deref(), self.opacity)?;
        self.center_pt = attr(parse_vector(self.center.as_deref()), "Center")?;
        self.fill_color = attr(parse_color(self.fill.as_deref()), "Fill")?;
        self.stroke_color = attr(parse_color(self.stroke.as_deref()), "Stroke")?;
        Ok(())
    }
}

impl Text {
    fn parse(&mut self) -> PdlResult<()> {
        self.placement = placement(self.transform.as_deref(), self.opacity)?;
        self.origin_pt = attr(parse_vector(self.origin.as_deref()), "Origin")?;
        self.text_color = attr(parse_color(self.color.as_deref()), "Color")?;
        Ok(())
    }
}

impl Line {
    fn parse(&mut self) -> PdlResult<()> {
        self.placement = placement(self.transform.as_deref(), self.opacity)?;
        let [x1, y1, x2, y2] = attr(
            self.points
                .as_deref()
                .ok_or_else(|| PdlError::format("missing required attribute"))
                .and_then(parse_reals::<4>),
            "Points",
        )?;
        self.endpoints = [Point::new(x1, y1), Point::new(x2, y2)];
        self.line_color = attr(parse_color(self.color.as_deref()), "Color")?;
        Ok(())
    }
}

impl Rectangle {
    fn parse(&mut self) -> PdlResult<()> {
        self.placement = placement(self.transform.as_deref(), self.opacity)?;
        self.rect = attr(parse_rect(self.points.as_deref()), "Points")?;
        self.fill_color = attr(parse_color(self.fill.as_deref()), "Fill")?;
        self.stroke_color = attr(parse_color(self.stroke.as_deref()), "Stroke")?;
        Ok(())
    }
}
