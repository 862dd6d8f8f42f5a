pub use kurbo::{Affine, Point, Rect, Vec2};

/// Straight (non-premultiplied) ARGB8 color, as written in documents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Color {
    pub a: u8,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const TRANSPARENT: Self = Self::argb(0, 0, 0, 0);
    pub const WHITE: Self = Self::argb(0xFF, 0xFF, 0xFF, 0xFF);
    pub const BLACK: Self = Self::argb(0xFF, 0, 0, 0);
    pub const BEIGE: Self = Self::argb(0xFF, 0xF5, 0xF5, 0xDC);

    pub const fn argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self { a, r, g, b }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::argb(0xFF, r, g, b)
    }

    /// Fully transparent; painting with it has no effect.
    pub fn is_transparent(self) -> bool {
        self.a == 0
    }
}

/// Page size in document units.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn to_rect(self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}
