use std::path::PathBuf;

pub type PdlResult<T> = Result<T, PdlError>;

#[derive(thiserror::Error, Debug)]
pub enum PdlError {
    /// A string attribute did not decode (wrong arity, bad number, bad color).
    #[error("format error: {reason}{}", location_suffix(.location))]
    Format {
        reason: String,
        location: Option<String>,
    },

    /// The document is not well-formed XML/JSON or does not match the vocabulary.
    #[error("structural error: {0}")]
    Structural(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn location_suffix(location: &Option<String>) -> String {
    match location {
        Some(loc) => format!(" (at {loc})"),
        None => String::new(),
    }
}

impl PdlError {
    pub fn format(reason: impl Into<String>) -> Self {
        Self::Format {
            reason: reason.into(),
            location: None,
        }
    }

    pub fn structural(msg: impl Into<String>) -> Self {
        Self::Structural(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Attach the attribute name to a format error that has no location yet.
    pub(crate) fn at_attribute(self, attribute: &str) -> Self {
        match self {
            Self::Format {
                reason,
                location: None,
            } => Self::Format {
                reason,
                location: Some(format!("@{attribute}")),
            },
            other => other,
        }
    }

    /// Prefix the location of a format error with an enclosing node segment.
    ///
    /// Segments accumulate while the error unwinds out of the parse pass, so the innermost node
    /// ends up last: `Page/ctCanvas[0]/ctCircle[1]@Fill`.
    pub(crate) fn within(self, segment: &str) -> Self {
        match self {
            Self::Format { reason, location } => {
                let location = match location {
                    Some(loc) if loc.starts_with('@') => format!("{segment}{loc}"),
                    Some(loc) => format!("{segment}/{loc}"),
                    None => segment.to_string(),
                };
                Self::Format {
                    reason,
                    location: Some(location),
                }
            }
            other => other,
        }
    }

    pub fn is_format(&self) -> bool {
        matches!(self, Self::Format { .. })
    }

    pub fn is_structural(&self) -> bool {
        matches!(self, Self::Structural(_))
    }

    pub fn location(&self) -> Option<&str> {
        match self {
            Self::Format { location, .. } => location.as_deref(),
            _ => None,
        }
    }
}
