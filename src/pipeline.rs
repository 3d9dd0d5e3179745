//! バッチ処理
//!
//! 画像読み込み → OCR → フィールド抽出を1枚ずつ順番に実行し、
//! 最後に時系列ソートする。1枚の失敗でバッチ全体は止めない。

use crate::error::ParkingScanError;
use crate::extractor::TextExtractor;
use crate::scanner::{self, ImageInfo};
use indicatif::ProgressBar;
use parking_scan_common::{parse_receipt_text, sort_by_date, ParsedRecord};
use std::path::PathBuf;

/// 1ファイルの失敗内容
#[derive(Debug, Clone)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: String,
    /// 代替レコードを作成したか（OCR失敗時）
    pub placeholder: bool,
}

/// バッチ処理の結果
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// 時系列ソート済みのレコード
    pub records: Vec<ParsedRecord>,
    pub failures: Vec<FileFailure>,
}

impl BatchOutcome {
    pub fn attempted(&self) -> usize {
        self.records.len() + self.failures.iter().filter(|f| !f.placeholder).count()
    }
}

/// 画像を順番に処理する
///
/// - 読み込み失敗: スキップして失敗として記録
/// - OCR失敗: 両フィールド "Not found" の代替レコードを作り、失敗として記録
pub async fn process_batch<E: TextExtractor>(
    images: &[ImageInfo],
    extractor: &E,
    language: &str,
    progress: &ProgressBar,
) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();
    progress.set_length(images.len() as u64);

    for img in images {
        progress.set_message(img.file_name.clone());

        let image = match scanner::load_image(&img.path).await {
            Ok(image) => image,
            Err(e) => {
                tracing::warn!("読み込み失敗のためスキップ: {}", e);
                outcome.failures.push(FileFailure {
                    path: img.path.clone(),
                    error: e.to_string(),
                    placeholder: false,
                });
                progress.inc(1);
                continue;
            }
        };

        let record = match extractor.recognize(&image, language).await {
            Ok(raw_text) => {
                let fields = parse_receipt_text(&raw_text);
                tracing::debug!(
                    "{}: date={} cost={} ({} chars)",
                    img.file_name,
                    fields.date,
                    fields.cost,
                    raw_text.len()
                );
                ParsedRecord::new(fields, image)
            }
            Err(e) => {
                let e = match e {
                    ParkingScanError::Recognition(_) => e,
                    other => ParkingScanError::Recognition(other.to_string()),
                };
                tracing::warn!("{}: {}", img.file_name, e);
                outcome.failures.push(FileFailure {
                    path: img.path.clone(),
                    error: e.to_string(),
                    placeholder: true,
                });
                ParsedRecord::placeholder(image)
            }
        };

        outcome.records.push(record.with_file_name(img.file_name.clone()));
        progress.inc(1);
    }

    outcome.records = sort_by_date(std::mem::take(&mut outcome.records));
    progress.finish_and_clear();

    outcome
}
