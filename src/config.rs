use crate::error::{ParkingScanError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// データディレクトリを上書きする環境変数
pub const DATA_DIR_ENV: &str = "PARKING_SCAN_DATA_DIR";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tesseract_command: String,
    pub language: String,
    pub data_dir: Option<PathBuf>,
    pub storage_key: String,
    pub ocr_timeout_seconds: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default_config())
        }
    }

    /// 読み込めない設定ファイルは警告してデフォルト値で続行
    pub fn load_or_default() -> Self {
        match Self::config_path() {
            Ok(path) => Self::load_from_or_default(&path),
            Err(e) => {
                tracing::warn!("設定ファイルの場所を特定できません。デフォルト設定を使用: {}", e);
                Self::default_config()
            }
        }
    }

    pub fn load_from_or_default(config_path: &Path) -> Self {
        Self::load_from(config_path).unwrap_or_else(|e| {
            tracing::warn!(
                "設定ファイルを読み込めません ({})。デフォルト設定を使用: {}",
                config_path.display(),
                e
            );
            Self::default_config()
        })
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| ParkingScanError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("parking-scan").join("config.json"))
    }

    fn default_config() -> Self {
        Self {
            tesseract_command: "tesseract".into(),
            language: "eng".into(),
            data_dir: None,
            storage_key: "parkingData".into(),
            ocr_timeout_seconds: None,  // 参照実装と同じくタイムアウトなし
        }
    }

    /// 保存先ディレクトリ
    pub fn resolve_data_dir(&self) -> Result<PathBuf> {
        // 環境変数を優先
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            if !dir.trim().is_empty() {
                return Ok(PathBuf::from(dir));
            }
        }

        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }

        dirs::data_dir()
            .map(|d| d.join("parking-scan"))
            .ok_or_else(|| ParkingScanError::Config("データディレクトリが見つかりません".into()))
    }

    pub fn ocr_timeout(&self) -> Option<Duration> {
        self.ocr_timeout_seconds.map(Duration::from_secs)
    }

    pub fn set_tesseract_command(&mut self, command: String) -> Result<()> {
        self.tesseract_command = command;
        self.save()
    }

    pub fn set_language(&mut self, language: String) -> Result<()> {
        self.language = language;
        self.save()
    }

    pub fn set_data_dir(&mut self, dir: PathBuf) -> Result<()> {
        self.data_dir = Some(dir);
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.tesseract_command, "tesseract");
        assert_eq!(config.language, "eng");
        assert_eq!(config.storage_key, "parkingData");
        assert!(config.ocr_timeout().is_none());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"ocr_timeout_seconds": 30}"#)
            .expect("デシリアライズ失敗");
        assert_eq!(config.language, "eng");
        assert_eq!(config.ocr_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_explicit_data_dir() {
        let config = Config {
            data_dir: Some(PathBuf::from("/tmp/parking-scan-test")),
            ..Default::default()
        };
        // 環境変数が設定されていない前提
        if std::env::var(DATA_DIR_ENV).is_err() {
            assert_eq!(
                config.resolve_data_dir().unwrap(),
                PathBuf::from("/tmp/parking-scan-test")
            );
        }
    }

    #[test]
    fn test_load_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config.tesseract_command, "tesseract");
    }

    #[test]
    fn test_corrupt_config_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(ParkingScanError::JsonParse(_))
        ));

        let config = Config::load_from_or_default(&path);
        assert_eq!(config.language, "eng");
        assert_eq!(config.storage_key, "parkingData");
    }

    #[test]
    fn test_load_from_valid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"language": "jpn"}"#).unwrap();

        let config = Config::load_from_or_default(&path);
        assert_eq!(config.language, "jpn");
        assert_eq!(config.tesseract_command, "tesseract");
    }
}
