//! レシート解析結果の型定義
//!
//! - ExtractedFields: Field Parserの出力（日付・金額）
//! - ParsedRecord: 1枚のレシートの保存単位（日付・金額・元画像）

use crate::data_url::ImageDataUrl;
use serde::{Deserialize, Serialize};

/// 抽出できなかったフィールドの値
pub const NOT_FOUND: &str = "Not found";

/// OCRテキストから抽出したフィールド
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFields {
    pub date: String,
    pub cost: String,
}

impl Default for ExtractedFields {
    fn default() -> Self {
        Self {
            date: NOT_FOUND.to_string(),
            cost: NOT_FOUND.to_string(),
        }
    }
}

/// 解析済みレシート
///
/// 永続化JSONは `{"date", "cost", "image"}` の形（`fileName` は空なら省略）。
/// 作成後に変更されることはない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedRecord {
    /// "DD/MM/YY(YY) HH:MM" 形式、または "Not found"
    #[serde(default = "not_found")]
    pub date: String,

    /// "$" 付き金額、または "Not found"
    #[serde(default = "not_found")]
    pub cost: String,

    /// アップロードされた画像そのもの（再圧縮なし）
    pub image: ImageDataUrl,

    /// 元ファイル名（表示用）
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub file_name: String,
}

fn not_found() -> String {
    NOT_FOUND.to_string()
}

impl ParsedRecord {
    pub fn new(fields: ExtractedFields, image: ImageDataUrl) -> Self {
        Self {
            date: fields.date,
            cost: fields.cost,
            image,
            file_name: String::new(),
        }
    }

    /// OCR失敗時の代替レコード（両フィールドが "Not found"）
    pub fn placeholder(image: ImageDataUrl) -> Self {
        Self::new(ExtractedFields::default(), image)
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    pub fn has_date(&self) -> bool {
        self.date != NOT_FOUND
    }

    pub fn has_cost(&self) -> bool {
        self.cost != NOT_FOUND
    }
}
