use crate::foundation::error::{PdlError, PdlResult};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub(crate) struct TextBrushRgba8 {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

/// A font registered with the layout engine, kept alongside the bytes the rasterizer needs.
#[derive(Clone)]
pub(crate) struct RegisteredFont {
    pub(crate) family: String,
    pub(crate) data: vello_cpu::peniko::FontData,
}

/// Stateful helper for building Parley text layouts from registered font files.
///
/// Fonts are never discovered from the system; only explicitly registered font bytes are used.
/// Families are matched case-insensitively and the first registered family is the fallback.
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    fonts: Vec<RegisteredFont>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    pub(crate) fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            fonts: Vec::new(),
        }
    }

    /// Register every family found in `font_bytes`. Returns the family names.
    pub(crate) fn register_font(&mut self, font_bytes: Vec<u8>) -> PdlResult<Vec<String>> {
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.clone()), None);
        if families.is_empty() {
            return Err(PdlError::render("no font families found in font data"));
        }

        let data =
            vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes), 0);
        let mut names = Vec::with_capacity(families.len());
        for (id, _) in families {
            let family = self
                .font_ctx
                .collection
                .family_name(id)
                .ok_or_else(|| PdlError::render("registered font family has no name"))?
                .to_string();
            tracing::debug!(family = %family, "registered font family");
            self.fonts.push(RegisteredFont {
                family: family.clone(),
                data: data.clone(),
            });
            names.push(family);
        }
        Ok(names)
    }

    pub(crate) fn has_fonts(&self) -> bool {
        !self.fonts.is_empty()
    }

    /// The registered font for `family`, or the fallback font.
    pub(crate) fn resolve(&self, family: &str) -> Option<&RegisteredFont> {
        self.fonts
            .iter()
            .find(|f| f.family.eq_ignore_ascii_case(family))
            .or_else(|| self.fonts.first())
    }

    /// Shape and lay out a single unwrapped run of plain text.
    pub(crate) fn layout_plain(
        &mut self,
        text: &str,
        family: &str,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> PdlResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(PdlError::render("text size must be finite and > 0"));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family.to_string())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}
