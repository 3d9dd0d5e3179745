//! Tesseract CLI連携
//!
//! 画像を標準入力で渡し、認識結果を標準出力から受け取る:
//! `tesseract stdin stdout -l <lang>`

use super::TextExtractor;
use crate::config::Config;
use crate::error::{ParkingScanError, Result};
use parking_scan_common::ImageDataUrl;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

#[derive(Debug, Clone)]
pub struct TesseractCli {
    command: String,
    timeout: Option<Duration>,
}

impl TesseractCli {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            timeout: None,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.tesseract_command.clone()).with_timeout(config.ocr_timeout())
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    async fn run(&self, bytes: Vec<u8>, language: &str) -> Result<String> {
        let mut child = Command::new(&self.command)
            .args(["stdin", "stdout", "-l", language])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ParkingScanError::Recognition(format!("{} 実行エラー: {}", self.command, e)))?;

        // 出力待ちと並行して画像を書き込む
        if let Some(mut stdin) = child.stdin.take() {
            tokio::spawn(async move {
                if let Err(e) = stdin.write_all(&bytes).await {
                    tracing::debug!("OCRへの画像書き込み失敗: {}", e);
                }
            });
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| ParkingScanError::Recognition(format!("{} 待機エラー: {}", self.command, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ParkingScanError::Recognition(format!(
                "{} failed (code {:?}): {}",
                self.command,
                output.status.code(),
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

impl Default for TesseractCli {
    fn default() -> Self {
        Self::new("tesseract")
    }
}

impl TextExtractor for TesseractCli {
    async fn recognize(&self, image: &ImageDataUrl, language: &str) -> Result<String> {
        let bytes = image
            .decode()
            .map_err(|e| ParkingScanError::Recognition(format!("画像デコード失敗: {}", e)))?;

        tracing::debug!("{} に {} bytes を送信 (lang={})", self.command, bytes.len(), language);

        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.run(bytes, language))
                .await
                .map_err(|_| {
                    ParkingScanError::Recognition(format!("{}秒でタイムアウト", limit.as_secs()))
                })?,
            None => self.run(bytes, language).await,
        }
    }
}
