//! PDF Compositor: prints a rendered HTML document to PDF with headless Chromium.
//!
//! Every call is a scoped session: a private scratch directory (`TempDir`) and
//! one browser process spawned with `kill_on_drop`. Returning, failing, timing
//! out, or having the request future dropped all tear both down, so no browser
//! process or scratch file outlives the request.
//!
//! Page geometry (A4, 12mm margins) and colour reproduction come from the
//! document's own `@page` / `print-color-adjust` rules.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::process::Command;
use tracing::{debug, info};

use crate::render::RenderError;

const PDF_MAGIC: &[u8] = b"%PDF-";
/// Cap on captured stderr in error messages.
const STDERR_LIMIT: usize = 2048;

#[async_trait]
pub trait PdfCompositor: Send + Sync {
    async fn compose(&self, html: &str) -> Result<Vec<u8>, RenderError>;
}

/// Headless Chromium (or Chrome) invoked through its `--print-to-pdf` mode.
pub struct ChromiumCompositor {
    chrome_bin: String,
    timeout: Duration,
}

impl ChromiumCompositor {
    pub fn new(chrome_bin: impl Into<String>, timeout: Duration) -> Self {
        Self {
            chrome_bin: chrome_bin.into(),
            timeout,
        }
    }

    fn command(&self, workdir: &Path, input: &Path, output: &Path) -> Command {
        let mut command = Command::new(&self.chrome_bin);
        command
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--no-first-run")
            .arg("--no-pdf-header-footer")
            .arg("--run-all-compositor-stages-before-draw")
            .arg(format!("--user-data-dir={}", workdir.join("profile").display()))
            .arg(format!("--print-to-pdf={}", output.display()))
            .arg(format!("file://{}", input.display()))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        command
    }
}

#[async_trait]
impl PdfCompositor for ChromiumCompositor {
    async fn compose(&self, html: &str) -> Result<Vec<u8>, RenderError> {
        let session: TempDir = tempfile::Builder::new()
            .prefix("tailor-render-")
            .tempdir()?;
        let input = session.path().join("resume.html");
        let output = session.path().join("resume.pdf");
        tokio::fs::write(&input, html).await?;

        let child = self
            .command(session.path(), &input, &output)
            .spawn()
            .map_err(|e| RenderError::Launch(format!("{}: {e}", self.chrome_bin)))?;
        debug!("Spawned {} (pid {:?})", self.chrome_bin, child.id());

        // On timeout the pending future owns the child and drops it, which kills it.
        let result = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| RenderError::Timeout(self.timeout))??;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(RenderError::EngineFailed {
                status: result.status.to_string(),
                stderr: truncate(stderr.trim(), STDERR_LIMIT).to_string(),
            });
        }

        let pdf = match tokio::fs::read(&output).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(RenderError::InvalidOutput)
            }
            Err(e) => return Err(e.into()),
        };
        if !is_pdf(&pdf) {
            return Err(RenderError::InvalidOutput);
        }

        info!("Composed PDF: {} bytes", pdf.len());
        Ok(pdf)
    }
}

pub fn is_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(PDF_MAGIC)
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_pdf_checks_magic_header() {
        assert!(is_pdf(b"%PDF-1.7\n%\xE2\xE3\xCF\xD3"));
        assert!(!is_pdf(b"<html></html>"));
        assert!(!is_pdf(b""));
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("résumé", 2), "ré");
        assert_eq!(truncate("short", 100), "short");
    }

    #[test]
    fn test_command_prints_document_to_pdf() {
        let compositor = ChromiumCompositor::new("chromium", Duration::from_secs(5));
        let dir = Path::new("/tmp/session");
        let command = compositor.command(dir, &dir.join("in.html"), &dir.join("out.pdf"));
        let args: Vec<String> = command
            .as_std()
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();

        assert!(args.contains(&"--headless=new".to_string()));
        assert!(args.contains(&"--no-pdf-header-footer".to_string()));
        assert!(args.contains(&"--print-to-pdf=/tmp/session/out.pdf".to_string()));
        assert_eq!(args.last().unwrap(), "file:///tmp/session/in.html");
    }

    #[tokio::test]
    async fn test_missing_engine_is_launch_error() {
        let compositor =
            ChromiumCompositor::new("/nonexistent/tailor-chromium", Duration::from_secs(5));
        let result = compositor.compose("<html></html>").await;
        assert!(matches!(result, Err(RenderError::Launch(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_engine_without_output_is_rejected() {
        // `true` accepts any arguments, exits 0 and writes nothing.
        let compositor = ChromiumCompositor::new("true", Duration::from_secs(5));
        let result = compositor.compose("<html></html>").await;
        assert!(matches!(result, Err(RenderError::InvalidOutput)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_engine_is_reported() {
        let compositor = ChromiumCompositor::new("false", Duration::from_secs(5));
        let result = compositor.compose("<html></html>").await;
        assert!(matches!(result, Err(RenderError::EngineFailed { .. })));
    }
}
