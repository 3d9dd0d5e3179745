//! バッチ処理テスト
//!
//! OCRをモックに差し替え、順次処理・失敗時の継続・ソートを検証

use indicatif::ProgressBar;
use parking_scan::error::{ParkingScanError, Result};
use parking_scan::extractor::TextExtractor;
use parking_scan::pipeline::process_batch;
use parking_scan::scanner::{collect_images, ImageInfo};
use parking_scan::store::{MemorySlot, RecordStore};
use parking_scan_common::{ImageDataUrl, NOT_FOUND};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

/// 画像の中身 → OCRテキストの対応表で応答するモック
struct MockOcr {
    texts: HashMap<Vec<u8>, String>,
    calls: RefCell<Vec<String>>,
}

impl MockOcr {
    fn new(pairs: &[(&str, &str)]) -> Self {
        Self {
            texts: pairs
                .iter()
                .map(|(content, text)| (content.as_bytes().to_vec(), text.to_string()))
                .collect(),
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl TextExtractor for MockOcr {
    async fn recognize(&self, image: &ImageDataUrl, language: &str) -> Result<String> {
        assert_eq!(language, "eng");
        let bytes = image.decode()?;
        self.calls.borrow_mut().push(String::from_utf8_lossy(&bytes).to_string());

        self.texts
            .get(&bytes)
            .cloned()
            .ok_or_else(|| ParkingScanError::Recognition("recognize failed".to_string()))
    }
}

fn write_image(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[tokio::test]
async fn test_batch_sorted_by_date() {
    let dir = tempdir().expect("Failed to create temp dir");
    let paths = vec![
        write_image(dir.path(), "late.jpg", "late"),
        write_image(dir.path(), "early.png", "early"),
    ];
    let ocr = MockOcr::new(&[
        ("late", "EXIT 15/01/24 17:30 PAID -$8.00"),
        ("early", "EXIT 01/01/24 09:15\nTOTAL -$3.50"),
    ]);

    let images = collect_images(&paths).unwrap();
    let outcome = process_batch(&images, &ocr, "eng", &ProgressBar::hidden()).await;

    assert!(outcome.failures.is_empty());
    assert_eq!(outcome.records.len(), 2);
    assert_eq!(outcome.records[0].file_name, "early.png");
    assert_eq!(outcome.records[0].date, "01/01/24 09:15");
    assert_eq!(outcome.records[0].cost, "$3.50");
    assert_eq!(outcome.records[0].image.mime(), "image/png");
    assert_eq!(outcome.records[1].file_name, "late.jpg");
    assert_eq!(outcome.records[1].cost, "$8.00");

    // 入力順に1枚ずつ呼ばれる
    assert_eq!(*ocr.calls.borrow(), vec!["late", "early"]);
}

#[tokio::test]
async fn test_recognition_failure_becomes_placeholder() {
    let dir = tempdir().expect("Failed to create temp dir");
    let paths = vec![
        write_image(dir.path(), "ok.jpg", "ok"),
        write_image(dir.path(), "broken.jpg", "broken"),
    ];
    let ocr = MockOcr::new(&[("ok", "01/02/24 -$1.00")]);

    let images = collect_images(&paths).unwrap();
    let outcome = process_batch(&images, &ocr, "eng", &ProgressBar::hidden()).await;

    assert_eq!(outcome.records.len(), 2);
    assert_eq!(outcome.failures.len(), 1);
    assert!(outcome.failures[0].placeholder);
    assert_eq!(outcome.attempted(), 2);

    let broken = outcome
        .records
        .iter()
        .find(|r| r.file_name == "broken.jpg")
        .expect("代替レコードがない");
    assert_eq!(broken.date, NOT_FOUND);
    assert_eq!(broken.cost, NOT_FOUND);
    assert_eq!(broken.image.decode().unwrap(), b"broken");
}

#[tokio::test]
async fn test_read_failure_is_skipped() {
    let dir = tempdir().expect("Failed to create temp dir");
    let ok = write_image(dir.path(), "ok.jpg", "ok");

    let images = vec![
        ImageInfo {
            path: dir.path().join("vanished.jpg"),
            file_name: "vanished.jpg".to_string(),
        },
        ImageInfo {
            path: ok,
            file_name: "ok.jpg".to_string(),
        },
    ];
    let ocr = MockOcr::new(&[("ok", "nothing useful")]);

    let outcome = process_batch(&images, &ocr, "eng", &ProgressBar::hidden()).await;

    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].file_name, "ok.jpg");
    assert_eq!(outcome.records[0].date, NOT_FOUND);
    assert_eq!(outcome.failures.len(), 1);
    assert!(!outcome.failures[0].placeholder);
    assert_eq!(outcome.attempted(), 2);
}

#[tokio::test]
async fn test_batch_then_store_replace_and_append() {
    let dir = tempdir().expect("Failed to create temp dir");
    let ocr = MockOcr::new(&[
        ("a", "10/03/24 -$2.00"),
        ("b", "05/03/24 -$4.00"),
    ]);
    let slot = MemorySlot::new();
    let mut store = RecordStore::open(&slot);

    let first = collect_images(&[write_image(dir.path(), "a.jpg", "a")]).unwrap();
    let outcome = process_batch(&first, &ocr, "eng", &ProgressBar::hidden()).await;
    store.replace(outcome.records).unwrap();

    let second = collect_images(&[write_image(dir.path(), "b.jpg", "b")]).unwrap();
    let outcome = process_batch(&second, &ocr, "eng", &ProgressBar::hidden()).await;
    store.append(outcome.records.clone()).unwrap();

    let dates: Vec<&str> = store.current().iter().map(|r| r.date.as_str()).collect();
    assert_eq!(dates, vec!["05/03/24", "10/03/24"]);

    // 置き換えでは前のバッチは残らない
    store.replace(outcome.records).unwrap();
    let reopened = RecordStore::open(&slot);
    assert_eq!(reopened.len(), 1);
    assert_eq!(reopened.current()[0].file_name, "b.jpg");
}
