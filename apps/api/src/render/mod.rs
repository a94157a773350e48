// Render stage: tailored resume → HTML (tera) → PDF (headless Chromium).
// Nothing here touches persistent state; a failure leaves the history untouched.

pub mod pdf;
pub mod template;

use std::time::Duration;

use thiserror::Error;

use crate::errors::AppError;

pub use pdf::{ChromiumCompositor, PdfCompositor};
pub use template::ResumeRenderer;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template error: {0}")]
    Template(String),

    #[error("failed to launch rendering engine: {0}")]
    Launch(String),

    #[error("rendering engine exited with {status}: {stderr}")]
    EngineFailed { status: String, stderr: String },

    #[error("rendering engine timed out after {0:?}")]
    Timeout(Duration),

    #[error("rendering engine produced no PDF output")]
    InvalidOutput,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<tera::Error> for RenderError {
    fn from(e: tera::Error) -> Self {
        // tera nests the useful message in the source chain
        let mut message = e.to_string();
        let mut source = std::error::Error::source(&e);
        while let Some(inner) = source {
            message.push_str(": ");
            message.push_str(&inner.to_string());
            source = inner.source();
        }
        RenderError::Template(message)
    }
}

impl From<RenderError> for AppError {
    fn from(e: RenderError) -> Self {
        AppError::Render(e.to_string())
    }
}
