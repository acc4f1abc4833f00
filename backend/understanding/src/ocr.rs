//! Optical formula recognition.
//!
//! Bridges the `pix2tex` command-line tool, which reads an image of an equation
//! and prints its LaTeX, optionally prefixed with the image label
//! (`sum.png: x^2`).

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info, warn};

use texplain_core::{FormulaRecognizer, TexplainError, DEFAULT_OCR_BIN, DEFAULT_OCR_TIMEOUT_SECS};

/// Runs `pix2tex <image>` as a child process.
#[derive(Debug, Clone)]
pub struct Pix2TexRecognizer {
    bin: String,
    extra_args: Vec<String>,
    timeout: Duration,
}

impl Pix2TexRecognizer {
    pub fn new() -> Self {
        Self {
            bin: DEFAULT_OCR_BIN.to_string(),
            extra_args: Vec::new(),
            timeout: Duration::from_secs(DEFAULT_OCR_TIMEOUT_SECS),
        }
    }

    pub fn with_bin(mut self, bin: impl Into<String>) -> Self {
        self.bin = bin.into();
        self
    }

    /// Arguments placed before the image path.
    pub fn with_extra_args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn bin(&self) -> &str {
        &self.bin
    }
}

impl Default for Pix2TexRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FormulaRecognizer for Pix2TexRecognizer {
    fn name(&self) -> &str {
        "pix2tex"
    }

    async fn recognize(&self, image: &Path) -> Result<String> {
        info!(bin = %self.bin, image = %image.display(), "Running formula recognition");

        let child = Command::new(&self.bin)
            .args(&self.extra_args)
            .arg(image)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| TexplainError::OcrSpawn {
                bin: self.bin.clone(),
                source,
            })?;

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Err(_) => {
                return Err(TexplainError::OcrTimeout {
                    bin: self.bin.clone(),
                    secs: self.timeout.as_secs(),
                }
                .into())
            }
            Ok(result) => result.map_err(|source| TexplainError::OcrSpawn {
                bin: self.bin.clone(),
                source,
            })?,
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!(status = ?output.status.code(), "OCR tool failed");
            return Err(TexplainError::OcrFailed {
                code: output.status.code(),
                stderr,
            }
            .into());
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        debug!(raw = %stdout.trim(), "OCR tool output");

        let latex = parse_latex_output(&stdout);
        if latex.is_empty() {
            warn!(image = %image.display(), "OCR tool produced no markup");
        }
        Ok(latex)
    }
}

/// Extract the markup from OCR stdout.
///
/// Everything after the first colon is kept, so `label: a:b` yields `a:b`.
/// Output without a colon is returned trimmed.
pub fn parse_latex_output(stdout: &str) -> String {
    let trimmed = stdout.trim();
    trimmed
        .split_once(':')
        .map_or(trimmed, |(_, markup)| markup)
        .trim()
        .to_string()
}
