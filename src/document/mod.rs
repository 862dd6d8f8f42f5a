//! The page-description document model.

mod draw;
pub mod json;
pub mod model;
mod parse;
pub mod values;
pub mod xml;

use std::path::Path;

use crate::foundation::core::{Affine, Size};
use crate::foundation::error::PdlResult;
use crate::session::DrawSession;

use model::Page;

/// A page whose parse pass completed successfully. Only parsed documents can be rendered.
#[derive(Clone, Debug)]
pub struct ParsedDocument {
    page: Page,
}

impl ParsedDocument {
    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn size(&self) -> Size {
        self.page.size()
    }

    /// Draw the document. Infallible; repeated calls issue identical call sequences.
    pub fn draw(&self, session: &mut dyn DrawSession, transform: Affine) {
        self.page.draw(session, transform);
    }
}

/// Run the parse pass over a raw tree.
///
/// The page is consumed: on failure it is dropped together with whatever it had cached, so no
/// partially parsed tree can reach the draw pass.
#[tracing::instrument(skip(page), fields(nodes = page.node_count()))]
pub fn load(mut page: Page) -> PdlResult<ParsedDocument> {
    page.parse()?;
    tracing::debug!(
        width = page.size().width,
        height = page.size().height,
        "document parsed"
    );
    Ok(ParsedDocument { page })
}

/// Structurally load and parse an XML document.
pub fn load_xml_str(source: &str) -> PdlResult<ParsedDocument> {
    load(xml::from_str(source)?)
}

/// Read, structurally load and parse an XML document file.
pub fn load_xml_path(path: &Path) -> PdlResult<ParsedDocument> {
    load(xml::from_path(path)?)
}

/// Draw `document` into `session` with `transform` as the outermost parent transform.
#[tracing::instrument(level = "trace", skip_all)]
pub fn render(document: &ParsedDocument, session: &mut dyn DrawSession, transform: Affine) {
    document.draw(session, transform);
}
