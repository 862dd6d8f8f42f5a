//! Headless document viewer.
//!
//! Holds the currently loaded document and reproduces the observable behavior of an interactive
//! host: only one load may be in flight at a time, the held document is dropped as soon as a new
//! load starts, a failed load leaves the viewer empty with a message naming the file, and an empty
//! viewer draws a prompt banner instead of a page.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use crate::config::ViewerConfig;
use crate::document::model::Page;
use crate::document::{self, ParsedDocument};
use crate::foundation::core::{Affine, Color, Point, Rect};
use crate::foundation::error::{PdlError, PdlResult};
use crate::session::cpu::{CpuSession, CpuSessionOpts, FrameRGBA};
use crate::session::{DrawSession, TextFormat};

/// Result of a [`Viewer`] load request.
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded,
    Failed(LoadFailure),
    /// Another load was still in flight; nothing changed.
    Busy,
}

impl LoadOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded)
    }
}

/// A failed load, with the user-facing message for it.
#[derive(Debug)]
pub struct LoadFailure {
    pub file_name: String,
    pub error: PdlError,
}

impl LoadFailure {
    pub const TITLE: &'static str = "Load failure";

    /// The same message is shown for structural and format failures.
    pub fn message(&self) -> String {
        format!(
            "I couldn't parse the contents of {}. Are you sure it is a SimplePDL?",
            self.file_name
        )
    }
}

/// Releases the load latch when dropped.
struct LoadLatch<'a>(&'a AtomicBool);

impl<'a> LoadLatch<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for LoadLatch<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct Viewer {
    config: ViewerConfig,
    font_bytes: Vec<Vec<u8>>,
    document: RwLock<Option<Arc<ParsedDocument>>>,
    loading: AtomicBool,
}

impl Viewer {
    /// Create an empty viewer. Font files named by the config are read up front.
    pub fn new(config: ViewerConfig) -> PdlResult<Self> {
        config.validate()?;
        let font_bytes = config
            .fonts
            .iter()
            .map(|p| std::fs::read(p).map_err(|e| PdlError::io(p, e)))
            .collect::<PdlResult<Vec<_>>>()?;
        Ok(Self {
            config,
            font_bytes,
            document: RwLock::new(None),
            loading: AtomicBool::new(false),
        })
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// The document currently held, if any.
    pub fn document(&self) -> Option<Arc<ParsedDocument>> {
        self.document
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    /// Load an XML document file, replacing the held document.
    pub fn load_path(&self, path: &Path) -> LoadOutcome {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.load_with(&file_name, || document::xml::from_path(path))
    }

    /// Load a raw tree produced by `read`, replacing the held document.
    ///
    /// `file_name` is only used in the failure message.
    #[tracing::instrument(skip(self, read))]
    pub fn load_with(
        &self,
        file_name: &str,
        read: impl FnOnce() -> PdlResult<Page>,
    ) -> LoadOutcome {
        let Some(_latch) = LoadLatch::acquire(&self.loading) else {
            tracing::debug!("load already in flight, ignoring request");
            return LoadOutcome::Busy;
        };

        // The previous document is dropped before the new one is read.
        self.replace_document(None);

        match read().and_then(document::load) {
            Ok(doc) => {
                tracing::info!(nodes = doc.page().node_count(), "document loaded");
                self.replace_document(Some(Arc::new(doc)));
                LoadOutcome::Loaded
            }
            Err(error) => {
                tracing::warn!(error = %error, "document failed to load");
                LoadOutcome::Failed(LoadFailure {
                    file_name: file_name.to_string(),
                    error,
                })
            }
        }
    }

    fn replace_document(&self, doc: Option<Arc<ParsedDocument>>) {
        *self
            .document
            .write()
            .unwrap_or_else(PoisonError::into_inner) = doc;
    }

    /// Pixel size of the surface the current state draws into.
    ///
    /// Not clamped: a page too large for the raster session yields a size it rejects.
    pub fn surface_size(&self) -> (u32, u32) {
        self.surface_size_for(self.document().as_deref())
    }

    fn surface_size_for(&self, doc: Option<&ParsedDocument>) -> (u32, u32) {
        match doc {
            Some(doc) => {
                let size = doc.size();
                // `as` saturates, so oversized pages stay oversized.
                let px = |v: f64| (v * self.config.scale).ceil().max(1.0) as u32;
                (px(size.width), px(size.height))
            }
            None => (self.config.empty_width, self.config.empty_height),
        }
    }

    /// Draw the current state: background, then the page or the prompt banner.
    pub fn draw(&self, session: &mut dyn DrawSession) {
        let doc = self.document();
        self.draw_snapshot(session, doc.as_deref());
    }

    /// Draw one snapshot of the held document, so the background and the page always agree.
    fn draw_snapshot(&self, session: &mut dyn DrawSession, doc: Option<&ParsedDocument>) {
        let (width, height) = self.surface_size_for(doc);
        session.set_transform(Affine::IDENTITY);
        session.fill_rect(
            Rect::new(0.0, 0.0, f64::from(width), f64::from(height)),
            self.config.background,
        );

        match doc {
            Some(doc) => document::render(doc, session, Affine::scale(self.config.scale)),
            None => {
                let prompt = &self.config.prompt;
                session.draw_text(
                    &prompt.text,
                    Point::new(prompt.x, prompt.y),
                    Color::BLACK,
                    TextFormat {
                        family: &prompt.family,
                        size: prompt.size,
                    },
                );
            }
        }
    }

    /// Rasterize the current state with the CPU session.
    pub fn render_frame(&self) -> PdlResult<FrameRGBA> {
        let doc = self.document();
        let (width, height) = self.surface_size_for(doc.as_deref());
        let mut session = CpuSession::new(width, height, CpuSessionOpts::default())?;
        for bytes in &self.font_bytes {
            session.register_font(bytes.clone())?;
        }
        self.draw_snapshot(&mut session, doc.as_deref());
        Ok(session.finish())
    }
}
