//! 埋め込み可能な画像表現（Data URL）
//!
//! `data:<mime>;base64,<payload>` 形式。表示にもExcel埋め込みにも使える。

use crate::error::{Error, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::fmt;

const DATA_PREFIX: &str = "data:";
const BASE64_MARKER: &str = ";base64,";

/// 拡張子 → MIMEタイプ
const MIME_BY_EXTENSION: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("bmp", "image/bmp"),
    ("tif", "image/tiff"),
    ("tiff", "image/tiff"),
];

/// 不明な形式のMIMEタイプ
pub const UNKNOWN_MIME: &str = "application/octet-stream";

/// 拡張子からMIMEタイプを推定（大文字小文字は無視）
pub fn mime_for_extension(ext: &str) -> &'static str {
    let ext = ext.to_ascii_lowercase();
    MIME_BY_EXTENSION
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, mime)| *mime)
        .unwrap_or(UNKNOWN_MIME)
}

/// 画像拡張子として扱うか
pub fn is_image_extension(ext: &str) -> bool {
    mime_for_extension(ext) != UNKNOWN_MIME
}

/// Data URL形式の画像
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageDataUrl(String);

impl ImageDataUrl {
    /// バイト列からData URLを生成
    pub fn encode(mime: &str, bytes: &[u8]) -> Self {
        Self(format!(
            "{}{}{}{}",
            DATA_PREFIX,
            mime,
            BASE64_MARKER,
            STANDARD.encode(bytes)
        ))
    }

    /// 宣言されたMIMEタイプ（Data URLでなければ空文字）
    pub fn mime(&self) -> &str {
        self.0
            .strip_prefix(DATA_PREFIX)
            .and_then(|rest| rest.split_once(BASE64_MARKER))
            .map(|(mime, _)| mime)
            .unwrap_or("")
    }

    /// ペイロードをデコード
    pub fn decode(&self) -> Result<Vec<u8>> {
        let payload = self
            .0
            .strip_prefix(DATA_PREFIX)
            .and_then(|rest| rest.split_once(BASE64_MARKER))
            .map(|(_, payload)| payload)
            .ok_or_else(|| Error::DataUrl("base64 Data URLではありません".into()))?;

        STANDARD
            .decode(payload)
            .map_err(|e| Error::DataUrl(format!("base64デコード失敗: {}", e)))
    }

    /// Excel埋め込み時の画像形式
    pub fn extension(&self) -> ImageExtension {
        ImageExtension::from_mime(self.mime())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ImageDataUrl {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for ImageDataUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Excelに埋め込む画像形式
///
/// JPEG以外の宣言はすべてPNGとして扱う。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageExtension {
    Jpeg,
    Png,
}

impl ImageExtension {
    pub fn from_mime(mime: &str) -> Self {
        let mime = mime.to_ascii_lowercase();
        if mime.contains("jpeg") || mime.contains("jpg") {
            ImageExtension::Jpeg
        } else {
            ImageExtension::Png
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ImageExtension::Jpeg => "jpeg",
            ImageExtension::Png => "png",
        }
    }
}

/// 宣言されたMIMEタイプがそのまま埋め込める形式か
pub fn is_native_mime(mime: &str) -> bool {
    matches!(
        mime.to_ascii_lowercase().as_str(),
        "image/jpeg" | "image/jpg" | "image/png"
    )
}
