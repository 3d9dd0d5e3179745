//! Parking Scan Common Library
//!
//! CLIと他のフロントエンドで共有される型とユーティリティ:
//! - OCRテキストから日付・金額を抽出するパーサー
//! - 日付パーサーと時系列ソート
//! - Data URL形式の画像表現
//! - Excel生成（`excel` feature）

pub mod types;
pub mod data_url;
pub mod dates;
pub mod error;
pub mod layout;
pub mod parser;
pub mod sorter;
pub mod export;

pub use types::{ExtractedFields, ParsedRecord, NOT_FOUND};
pub use data_url::{ImageDataUrl, ImageExtension};
pub use dates::parse_receipt_date;
pub use error::{Error, Result};
pub use parser::{clean_text, extract_cost, extract_date, parse_receipt_text};
pub use sorter::{sort_by_date, sort_records};
