//! Viewer configuration.
//!
//! Loaded from a JSON file; every field is optional and falls back to the defaults below. The
//! `SIMPLEPDL_FONT_PATH` environment variable appends one more font file.

use std::path::{Path, PathBuf};

use crate::foundation::core::Color;
use crate::foundation::error::{PdlError, PdlResult};

pub const FONT_PATH_ENV: &str = "SIMPLEPDL_FONT_PATH";

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    /// Surface color behind the page (and behind the prompt when nothing is loaded).
    pub background: Color,
    /// Uniform scale from document units to pixels.
    pub scale: f64,
    /// Surface size used when no document is loaded.
    pub empty_width: u32,
    pub empty_height: u32,
    /// Font files (TTF/OTF) registered with the raster session, in order. The first family found
    /// is the fallback for unknown family names.
    pub fonts: Vec<PathBuf>,
    pub prompt: PromptConfig,
}

/// Banner drawn when no document is loaded.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PromptConfig {
    pub text: String,
    pub family: String,
    pub size: f64,
    pub x: f64,
    pub y: f64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            background: Color::BEIGE,
            scale: 1.0,
            empty_width: 640,
            empty_height: 480,
            fonts: Vec::new(),
            prompt: PromptConfig::default(),
        }
    }
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            text: "Click anywhere to open a file...".to_string(),
            family: "Arial".to_string(),
            size: 24.0,
            x: 100.0,
            y: 100.0,
        }
    }
}

impl ViewerConfig {
    pub fn from_path(path: &Path) -> PdlResult<Self> {
        let source = std::fs::read_to_string(path).map_err(|e| PdlError::io(path, e))?;
        let config: Self = serde_json::from_str(&source).map_err(|e| {
            PdlError::Other(
                anyhow::Error::new(e).context(format!("parse config '{}'", path.display())),
            )
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Append the font named by `SIMPLEPDL_FONT_PATH`, if set and non-empty.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(path) = std::env::var_os(FONT_PATH_ENV)
            .map(PathBuf::from)
            .filter(|p| !p.as_os_str().is_empty())
        {
            self.fonts.push(path);
        }
        self
    }

    pub fn validate(&self) -> PdlResult<()> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(PdlError::Other(anyhow::anyhow!(
                "config scale must be finite and > 0"
            )));
        }
        if self.empty_width == 0 || self.empty_height == 0 {
            return Err(PdlError::Other(anyhow::anyhow!(
                "config empty_width/empty_height must be > 0"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_host_shell() {
        let cfg = ViewerConfig::default();
        assert_eq!(cfg.background, Color::BEIGE);
        assert_eq!(cfg.prompt.text, "Click anywhere to open a file...");
        assert_eq!(cfg.prompt.size, 24.0);
        cfg.validate().unwrap();
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: ViewerConfig =
            serde_json::from_str(r#"{"scale":2.0,"prompt":{"size":10}}"#).unwrap();
        assert_eq!(cfg.scale, 2.0);
        assert_eq!(cfg.prompt.size, 10.0);
        assert_eq!(cfg.prompt.family, "Arial");
        assert_eq!(cfg.background, Color::BEIGE);
    }

    #[test]
    fn validate_rejects_bad_scale() {
        let cfg = ViewerConfig {
            scale: 0.0,
            ..ViewerConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(serde_json::from_str::<ViewerConfig>(r#"{"colour":1}"#).is_err());
    }
}
