/// Convenience result type used across layerpress.
pub type LayerpressResult<T> = Result<T, LayerpressError>;

/// Top-level error taxonomy used by the compositing engine and run loop.
#[derive(thiserror::Error, Debug)]
pub enum LayerpressError {
    /// The run is misconfigured (bad format, color space, backend combination, ...).
    ///
    /// Raised before any job renders and always aborts the whole run.
    #[error("config error: {0}")]
    Config(String),

    /// A background or overlay source is missing or cannot be decoded.
    #[error("asset error: {0}")]
    Asset(String),

    /// An overlay producer failed (font, glyph, QR capacity, templating).
    #[error("render error: {0}")]
    Render(String),

    /// The external image tool could not be spawned or exited unsuccessfully.
    #[error("subprocess error: {0}")]
    Subprocess(String),

    /// The final canvas could not be serialized.
    #[error("encode error: {0}")]
    Encode(String),

    /// Writing an output or temporary file failed.
    #[error("io error: {0}")]
    Io(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LayerpressError {
    /// Build a [`LayerpressError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`LayerpressError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`LayerpressError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`LayerpressError::Subprocess`] value.
    pub fn subprocess(msg: impl Into<String>) -> Self {
        Self::Subprocess(msg.into())
    }

    /// Build a [`LayerpressError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`LayerpressError::Io`] value.
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    /// Prefix the message with `ctx`, keeping the error kind.
    pub fn context(self, ctx: impl std::fmt::Display) -> Self {
        match self {
            Self::Config(m) => Self::Config(format!("{ctx}: {m}")),
            Self::Asset(m) => Self::Asset(format!("{ctx}: {m}")),
            Self::Render(m) => Self::Render(format!("{ctx}: {m}")),
            Self::Subprocess(m) => Self::Subprocess(format!("{ctx}: {m}")),
            Self::Encode(m) => Self::Encode(format!("{ctx}: {m}")),
            Self::Io(m) => Self::Io(format!("{ctx}: {m}")),
            Self::Other(e) => Self::Other(e.context(ctx.to_string())),
        }
    }

    /// Whether this error invalidates the whole run rather than a single job.
    pub fn is_run_fatal(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
