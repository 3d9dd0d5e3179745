//! OCR（テキスト抽出）モジュール
//!
//! OCRエンジンは外部のブラックボックスとして扱い、
//! `TextExtractor` トレイトで差し替え可能にする。

mod tesseract;

pub use tesseract::TesseractCli;

use crate::error::Result;
use parking_scan_common::ImageDataUrl;

/// OCRの言語指定（デフォルト）
pub const DEFAULT_LANGUAGE: &str = "eng";

/// 画像からテキストを認識する外部サービス
#[allow(async_fn_in_trait)]
pub trait TextExtractor {
    /// 認識したテキストを返す。失敗時は `Recognition` エラー
    async fn recognize(&self, image: &ImageDataUrl, language: &str) -> Result<String>;
}
