#![forbid(unsafe_code)]

pub mod config;
pub mod document;
mod foundation;
pub mod session;
pub mod viewer;

pub use config::{PromptConfig, ViewerConfig};
pub use document::model::{Canvas, Circle, Line, Node, Page, Rectangle, Text};
pub use document::{ParsedDocument, load, load_xml_path, load_xml_str, render};
pub use foundation::core::{Affine, Color, Point, Rect, Size, Vec2};
pub use foundation::error::{PdlError, PdlResult};
pub use session::cpu::{CpuSession, CpuSessionOpts, FrameRGBA};
pub use session::recording::{DrawCall, Primitive, RecordingSession};
pub use session::{DrawSession, OpacityLayer, TextFormat};
pub use viewer::{LoadFailure, LoadOutcome, Viewer};
