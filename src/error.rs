use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParkingScanError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("画像が見つかりません: {0}")]
    NoImagesFound(String),

    #[error("画像読み込みエラー: {0}")]
    Read(String),

    #[error("OCRエラー: {0}")]
    Recognition(String),

    #[error("保存データの読み込みに失敗: {0}")]
    Deserialization(String),

    #[error("Excel生成エラー: {0}")]
    Export(String),

    #[error("入力エラー: {0}")]
    Prompt(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] parking_scan_common::Error),
}

pub type Result<T> = std::result::Result<T, ParkingScanError>;
