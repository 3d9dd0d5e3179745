//! レコードストア
//!
//! 解析済みレシートの一覧をメモリに保持し、永続スロットにミラーする。
//! スロットは起動時に1回読み込み、変更のたびに全体を上書きする。

use crate::error::{ParkingScanError, Result};
use parking_scan_common::{sort_records, ParsedRecord};
use std::cell::RefCell;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// 保存スロットのデフォルトキー
pub const DEFAULT_STORAGE_KEY: &str = "parkingData";

/// 永続化ポート
pub trait RecordPersistence {
    /// 保存済みの一覧を読み込む（未保存なら `None`）
    fn load(&self) -> Result<Option<Vec<ParsedRecord>>>;

    /// 一覧全体を上書き保存
    fn save(&self, records: &[ParsedRecord]) -> Result<()>;

    /// 保存値を削除
    fn delete(&self) -> Result<()>;
}

/// JSONファイルのスロット（`<dir>/<key>.json`）
#[derive(Debug, Clone)]
pub struct JsonFileSlot {
    path: PathBuf,
}

impl JsonFileSlot {
    pub fn new(dir: &Path, key: &str) -> Self {
        Self {
            path: dir.join(format!("{}.json", key)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordPersistence for JsonFileSlot {
    fn load(&self) -> Result<Option<Vec<ParsedRecord>>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let records: Vec<ParsedRecord> = serde_json::from_reader(reader)
            .map_err(|e| ParkingScanError::Deserialization(format!("{}: {}", self.path.display(), e)))?;
        Ok(Some(records))
    }

    fn save(&self, records: &[ParsedRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // 一時ファイルに書いてから置き換える
        let temp_path = self.path.with_extension("json.tmp");
        {
            let file = File::create(&temp_path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer(&mut writer, records)?;
            writer.flush()?;
        }
        std::fs::rename(&temp_path, &self.path)?;
        Ok(())
    }

    fn delete(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// メモリ上のスロット（JSON文字列で保持）
#[derive(Debug, Default)]
pub struct MemorySlot {
    value: RefCell<Option<String>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// 生の保存値を指定して作成
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            value: RefCell::new(Some(raw.into())),
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.value.borrow().clone()
    }
}

impl RecordPersistence for MemorySlot {
    fn load(&self) -> Result<Option<Vec<ParsedRecord>>> {
        match self.value.borrow().as_deref() {
            Some(raw) => serde_json::from_str(raw)
                .map(Some)
                .map_err(|e| ParkingScanError::Deserialization(e.to_string())),
            None => Ok(None),
        }
    }

    fn save(&self, records: &[ParsedRecord]) -> Result<()> {
        let raw = serde_json::to_string(records)?;
        *self.value.borrow_mut() = Some(raw);
        Ok(())
    }

    fn delete(&self) -> Result<()> {
        *self.value.borrow_mut() = None;
        Ok(())
    }
}

impl<P: RecordPersistence + ?Sized> RecordPersistence for &P {
    fn load(&self) -> Result<Option<Vec<ParsedRecord>>> {
        (**self).load()
    }

    fn save(&self, records: &[ParsedRecord]) -> Result<()> {
        (**self).save(records)
    }

    fn delete(&self) -> Result<()> {
        (**self).delete()
    }
}

/// レコードストア
pub struct RecordStore<P: RecordPersistence> {
    records: Vec<ParsedRecord>,
    persistence: P,
}

impl<P: RecordPersistence> RecordStore<P> {
    /// 保存スロットから初期状態を読み込む
    ///
    /// 保存データが壊れていても失敗せず、空のストアとして開く。
    pub fn open(persistence: P) -> Self {
        let records = match persistence.load() {
            Ok(Some(records)) => {
                tracing::debug!("保存済みレコードを読み込み: {}件", records.len());
                records
            }
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("保存データを読み込めないため空で開始します: {}", e);
                Vec::new()
            }
        };

        Self {
            records,
            persistence,
        }
    }

    /// 現在の一覧
    pub fn current(&self) -> &[ParsedRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 一覧全体を置き換えて保存
    ///
    /// 保存に成功した場合のみメモリ上の一覧を更新する。
    pub fn replace(&mut self, records: Vec<ParsedRecord>) -> Result<()> {
        self.persistence.save(&records)?;
        self.records = records;
        Ok(())
    }

    /// 既存の一覧に追加し、時系列に並べ直して保存
    pub fn append(&mut self, records: Vec<ParsedRecord>) -> Result<()> {
        let mut merged = self.records.clone();
        merged.extend(records);
        sort_records(&mut merged);
        self.replace(merged)
    }

    /// 一覧を空にし、保存値も削除
    pub fn clear(&mut self) -> Result<()> {
        self.persistence.delete()?;
        self.records.clear();
        Ok(())
    }
}
