//! CPU raster session powered by `vello_cpu`.

use std::path::Path;

use kurbo::Shape;

use crate::foundation::core::{Affine, Color, Point, Rect};
use crate::foundation::error::{PdlError, PdlResult};
use crate::session::text::{TextBrushRgba8, TextLayoutEngine};
use crate::session::{DrawSession, TextFormat};

const PATH_TOLERANCE: f64 = 0.1;

/// A rendered frame as RGBA8 pixels.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Copy of the pixels with alpha un-premultiplied, as image encoders expect.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        if !self.premultiplied {
            return self.data.clone();
        }
        let mut out = self.data.clone();
        for px in out.chunks_exact_mut(4) {
            let a = u16::from(px[3]);
            if a == 0 || a == 255 {
                continue;
            }
            for c in &mut px[..3] {
                *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
            }
        }
        out
    }

    /// Straight RGBA8 pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let mut px = [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ];
        if self.premultiplied && px[3] != 0 && px[3] != 255 {
            let a = u16::from(px[3]);
            for c in &mut px[..3] {
                *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
            }
        }
        Some(px)
    }
}

/// Options for [`CpuSession`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuSessionOpts {
    pub(crate) clear: Option<Color>,
}

impl CpuSessionOpts {
    /// Return options with a color the whole surface is filled with before any drawing.
    pub fn with_clear(mut self, clear: Option<Color>) -> Self {
        self.clear = clear;
        self
    }
}

/// Rasterizing [`DrawSession`].
///
/// Text is shaped with Parley using only fonts registered through [`CpuSession::register_font`];
/// without any registered font, text calls are skipped.
pub struct CpuSession {
    ctx: vello_cpu::RenderContext,
    width: u16,
    height: u16,
    transform: Affine,
    text: TextLayoutEngine,
    warned_no_fonts: bool,
}

impl CpuSession {
    pub fn new(width: u32, height: u32, opts: CpuSessionOpts) -> PdlResult<Self> {
        let width_u16: u16 = width
            .try_into()
            .map_err(|_| PdlError::render("surface width exceeds u16"))?;
        let height_u16: u16 = height
            .try_into()
            .map_err(|_| PdlError::render("surface height exceeds u16"))?;
        if width_u16 == 0 || height_u16 == 0 {
            return Err(PdlError::render("surface width/height must be > 0"));
        }

        let mut session = Self {
            ctx: vello_cpu::RenderContext::new(width_u16, height_u16),
            width: width_u16,
            height: height_u16,
            transform: Affine::IDENTITY,
            text: TextLayoutEngine::new(),
            warned_no_fonts: false,
        };
        if let Some(clear) = opts.clear {
            session.clear(clear);
        }
        Ok(session)
    }

    pub fn width(&self) -> u32 {
        u32::from(self.width)
    }

    pub fn height(&self) -> u32 {
        u32::from(self.height)
    }

    /// Fill the whole surface, ignoring the current transform.
    pub fn clear(&mut self, color: Color) {
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.set_paint(color);
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(self.width),
            f64::from(self.height),
        ));
        self.ctx.set_transform(affine_to_cpu(self.transform));
    }

    /// Register font bytes (TTF/OTF). Returns the family names found.
    pub fn register_font(&mut self, font_bytes: Vec<u8>) -> PdlResult<Vec<String>> {
        self.text.register_font(font_bytes)
    }

    pub fn register_font_file(&mut self, path: &Path) -> PdlResult<Vec<String>> {
        let bytes = std::fs::read(path).map_err(|e| PdlError::io(path, e))?;
        self.register_font(bytes)
    }

    /// Rasterize everything drawn so far.
    pub fn finish(mut self) -> FrameRGBA {
        self.ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.render_to_pixmap(&mut pixmap);
        FrameRGBA {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        }
    }

    fn set_paint(&mut self, color: Color) {
        self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        ));
    }

    fn fill_shape(&mut self, shape: &impl Shape, color: Color) {
        if color.is_transparent() {
            return;
        }
        self.set_paint(color);
        self.ctx.fill_path(&shape_to_cpu(shape));
    }

    fn stroke_shape(&mut self, shape: &impl Shape, color: Color, width: f64) {
        if color.is_transparent() {
            return;
        }
        self.set_paint(color);
        self.ctx.set_stroke(vello_cpu::kurbo::Stroke::new(width));
        self.ctx.stroke_path(&shape_to_cpu(shape));
    }
}

impl DrawSession for CpuSession {
    fn set_transform(&mut self, transform: Affine) {
        self.transform = transform;
        self.ctx.set_transform(affine_to_cpu(transform));
    }

    fn push_opacity_layer(&mut self, opacity: f32) {
        self.ctx.push_opacity_layer(opacity);
    }

    fn pop_layer(&mut self) {
        self.ctx.pop_layer();
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.fill_shape(&rect, color);
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f64) {
        self.stroke_shape(&rect, color, width);
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Color) {
        self.fill_shape(&kurbo::Circle::new(center, radius), color);
    }

    fn stroke_circle(&mut self, center: Point, radius: f64, color: Color, width: f64) {
        self.stroke_shape(&kurbo::Circle::new(center, radius), color, width);
    }

    fn draw_line(&mut self, from: Point, to: Point, color: Color, width: f64) {
        self.stroke_shape(&kurbo::Line::new(from, to), color, width);
    }

    fn draw_text(&mut self, text: &str, origin: Point, color: Color, format: TextFormat<'_>) {
        if text.is_empty() || color.is_transparent() {
            return;
        }
        if !self.text.has_fonts() {
            if !self.warned_no_fonts {
                tracing::warn!("no fonts registered, text is not rendered");
                self.warned_no_fonts = true;
            }
            return;
        }
        let Some(font) = self.text.resolve(format.family).cloned() else {
            return;
        };

        let brush = TextBrushRgba8 {
            r: color.r,
            g: color.g,
            b: color.b,
            a: color.a,
        };
        let layout = match self
            .text
            .layout_plain(text, &font.family, format.size as f32, brush)
        {
            Ok(layout) => layout,
            Err(err) => {
                tracing::warn!(error = %err, "skipping text run");
                return;
            }
        };

        // Glyph positions are relative to the layout's top-left corner, which sits at `origin`.
        let placed = self.transform * Affine::translate(origin.to_vec2());
        self.ctx.set_transform(affine_to_cpu(placed));
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                self.ctx
                    .glyph_run(&font.data)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        self.ctx.set_transform(affine_to_cpu(self.transform));
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn shape_to_cpu(shape: &impl Shape) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let point = |p: Point| vello_cpu::kurbo::Point::new(p.x, p.y);
    let mut out = vello_cpu::kurbo::BezPath::new();
    for el in shape.path_elements(PATH_TOLERANCE) {
        match el {
            PathEl::MoveTo(p) => out.move_to(point(p)),
            PathEl::LineTo(p) => out.line_to(point(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point(p1), point(p2)),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(point(p1), point(p2), point(p3)),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oversized_surface_is_rejected() {
        assert!(CpuSession::new(70_000, 10, CpuSessionOpts::default()).is_err());
        assert!(CpuSession::new(0, 10, CpuSessionOpts::default()).is_err());
    }

    #[test]
    fn clear_color_fills_surface() {
        let session =
            CpuSession::new(8, 4, CpuSessionOpts::default().with_clear(Some(Color::BEIGE)))
                .unwrap();
        let frame = session.finish();
        assert_eq!(frame.data.len(), 8 * 4 * 4);
        assert_eq!(frame.pixel(3, 2), Some([0xF5, 0xF5, 0xDC, 0xFF]));
        assert_eq!(frame.pixel(8, 0), None);
    }

    #[test]
    fn straight_conversion_undoes_premultiplication() {
        let frame = FrameRGBA {
            width: 1,
            height: 1,
            data: vec![64, 0, 0, 128],
            premultiplied: true,
        };
        assert_eq!(frame.to_straight_rgba8(), vec![128, 0, 0, 128]);
    }

    #[test]
    fn half_opacity_layer_blends_over_background() {
        let mut session =
            CpuSession::new(4, 4, CpuSessionOpts::default().with_clear(Some(Color::WHITE)))
                .unwrap();
        session.push_opacity_layer(0.5);
        session.fill_rect(Rect::new(0.0, 0.0, 4.0, 4.0), Color::BLACK);
        session.pop_layer();
        let px = session.finish().pixel(1, 1).unwrap();
        assert!((120..=136).contains(&px[0]), "got {px:?}");
        assert_eq!(px[3], 255);
    }

    #[test]
    fn transparent_paint_leaves_surface_untouched() {
        let mut session =
            CpuSession::new(4, 4, CpuSessionOpts::default().with_clear(Some(Color::WHITE)))
                .unwrap();
        session.fill_rect(Rect::new(0.0, 0.0, 4.0, 4.0), Color::TRANSPARENT);
        session.draw_line(
            Point::new(0.0, 2.0),
            Point::new(4.0, 2.0),
            Color::TRANSPARENT,
            2.0,
        );
        let frame = session.finish();
        assert!(frame.data.chunks_exact(4).all(|px| px == [255, 255, 255, 255]));
    }
}
