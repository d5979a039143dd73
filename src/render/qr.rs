//! QR encoding through the `qrencode` command line tool.

use std::process::Command;

use super::traits::QrEncoder;

const DEFAULT_QRENCODE_BIN: &str = "qrencode";

#[derive(Debug, thiserror::Error)]
pub enum QrError {
    #[error("qrencode execution failed: {0}")]
    Io(#[source] std::io::Error),
    #[error("qrencode exited with status {code}: {stderr}")]
    Exit { code: i32, stderr: String },
    #[error("qrencode produced no image")]
    EmptyOutput,
}

/// Writes a PNG QR code to stdout via `qrencode -t PNG -o -`.
#[derive(Debug, Clone)]
pub struct QrencodeCli {
    binary: String,
}

impl Default for QrencodeCli {
    fn default() -> Self {
        Self::new(DEFAULT_QRENCODE_BIN)
    }
}

impl QrencodeCli {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl QrEncoder for QrencodeCli {
    fn encode(&self, payload: &str) -> Result<Vec<u8>, QrError> {
        let output = Command::new(&self.binary)
            .args(["-t", "PNG", "-o", "-"])
            .arg(payload)
            .output()
            .map_err(QrError::Io)?;

        if !output.status.success() {
            return Err(QrError::Exit {
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        if output.stdout.is_empty() {
            return Err(QrError::EmptyOutput);
        }
        Ok(output.stdout)
    }
}
