//! Excel生成（CLI版）
//!
//! 共通ライブラリの excel_core を使用。JPEG/PNG以外の画像は
//! 埋め込み用にPNGへ変換する（保存データはそのまま）。

use crate::error::{ParkingScanError, Result};
use parking_scan_common::data_url::is_native_mime;
use parking_scan_common::export::excel_core::{generate_excel_buffer, ImageData};
use parking_scan_common::{ImageExtension, ParsedRecord};
use image::ImageReader;
use std::io::Cursor;

/// Excelをバイト列で生成
pub fn generate_excel(records: &[ParsedRecord]) -> Result<Vec<u8>> {
    generate_excel_buffer(records, load_thumbnail).map_err(ParkingScanError::Export)
}

/// レコードの画像を埋め込み用データに変換
///
/// 変換できない画像は警告を出して `None`（行は画像なしで出力）。
pub fn load_thumbnail(record: &ParsedRecord) -> Option<ImageData> {
    match thumbnail_data(record) {
        Ok(data) => Some(data),
        Err(e) => {
            tracing::warn!("画像を埋め込めません ({}): {}", record_label(record), e);
            None
        }
    }
}

fn thumbnail_data(record: &ParsedRecord) -> Result<ImageData> {
    let bytes = record.image.decode()?;
    let mime = record.image.mime();
    let extension = record.image.extension();

    if is_native_mime(mime) && embeddable_as_is(extension, &bytes) {
        return Ok(ImageData {
            data: bytes,
            extension: extension.as_str().to_string(),
        });
    }

    // その他の形式（宣言と中身が違うものを含む）はPNGとして扱う
    let decoded = image::load_from_memory(&bytes)
        .map_err(|e| ParkingScanError::Export(format!("画像デコード失敗 ({}): {}", mime, e)))?;
    let mut png = Vec::new();
    decoded
        .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .map_err(|e| ParkingScanError::Export(format!("PNG変換失敗: {}", e)))?;

    Ok(ImageData {
        data: png,
        extension: ImageExtension::Png.as_str().to_string(),
    })
}

/// 宣言どおりの形式で、ヘッダーから画像サイズが読めるもの
fn embeddable_as_is(extension: ImageExtension, bytes: &[u8]) -> bool {
    has_signature(extension, bytes)
        && ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .is_ok_and(|reader| reader.into_dimensions().is_ok())
}

fn has_signature(extension: ImageExtension, bytes: &[u8]) -> bool {
    match extension {
        ImageExtension::Jpeg => bytes.starts_with(&[0xFF, 0xD8]),
        ImageExtension::Png => bytes.starts_with(b"\x89PNG"),
    }
}

fn record_label(record: &ParsedRecord) -> &str {
    if record.file_name.is_empty() {
        &record.date
    } else {
        &record.file_name
    }
}
