//! Optical text recognition boundary.
//!
//! The engine never looks inside an OCR implementation: it hands over image bytes and a
//! [`ProgressReporter`], then gets back either the recognised text or a [`RecognitionError`].
//! A failed recognition yields no partial text.
//!
//! [`TesseractRecognizer`] drives the `tesseract` command-line program.
//!
//! # Requirements
//! - `tesseract` installed and on `PATH` (or configured via `SPLITSNAP_TESSERACT_BIN`)
//! - the configured language pack (`eng` by default)
//! - a writable temporary directory for staging the image

use crate::config::CoreConfig;
use crate::scan::ProgressReporter;
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum RecognitionError {
    #[error("image payload is empty")]
    EmptyImage,
    #[error("failed to stage image for recognition: {0}")]
    TempFile(std::io::Error),
    #[error("failed to start OCR engine '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("OCR engine exited with status {code:?}: {stderr}")]
    Exited { code: Option<i32>, stderr: String },
    #[error("OCR output is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
    #[error("{0}")]
    Other(String),
}

/// An asynchronous producer of text from an image.
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    /// Recognises the text in `image`, reporting zero or more progress values on the way.
    async fn recognize(
        &self,
        image: &[u8],
        progress: ProgressReporter,
    ) -> Result<String, RecognitionError>;
}

/// Runs `tesseract <image> stdout -l <language>`.
#[derive(Clone, Debug)]
pub struct TesseractRecognizer {
    program: PathBuf,
    language: String,
}

impl TesseractRecognizer {
    pub fn new(program: impl Into<PathBuf>, language: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            language: language.into(),
        }
    }

    pub fn from_config(config: &CoreConfig) -> Self {
        Self::new(config.tesseract_bin(), config.ocr_language())
    }
}

#[async_trait]
impl TextRecognizer for TesseractRecognizer {
    async fn recognize(
        &self,
        image: &[u8],
        progress: ProgressReporter,
    ) -> Result<String, RecognitionError> {
        if image.is_empty() {
            return Err(RecognitionError::EmptyImage);
        }
        progress.report(0);

        // Tesseract reads from a path; the file is removed when `staged` drops.
        let staged = tempfile::Builder::new()
            .prefix("splitsnap-receipt-")
            .tempfile()
            .map_err(RecognitionError::TempFile)?;
        tokio::fs::write(staged.path(), image)
            .await
            .map_err(RecognitionError::TempFile)?;
        progress.report(10);

        debug!(
            program = %self.program.display(),
            language = %self.language,
            bytes = image.len(),
            "running OCR engine"
        );

        let output = Command::new(&self.program)
            .arg(staged.path())
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| RecognitionError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(RecognitionError::Exited {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let text = String::from_utf8(output.stdout)?;
        progress.report(100);
        debug!(chars = text.len(), "OCR engine finished");
        Ok(text)
    }
}
