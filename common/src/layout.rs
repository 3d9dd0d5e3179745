//! Excelレイアウト定義
//!
//! 1シート3列（画像・日付・金額）。1行目がヘッダー、
//! レコード i（0始まり）はシートの i+2 行目に置く。

/// シート名
pub const SHEET_NAME: &str = "Parking Data";

/// ヘッダー行（0始まり）
pub const HEADER_ROW: u32 = 0;

/// サムネイル表示サイズ（px）
pub const THUMBNAIL_WIDTH_PX: u32 = 150;
pub const THUMBNAIL_HEIGHT_PX: u32 = 100;

/// データ行の高さ（pt）
pub const RECORD_ROW_HEIGHT_PT: f64 = 80.0;

/// 列定義
#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    pub key: &'static str,
    pub header: &'static str,
    /// Excel列幅（文字数単位）
    pub width: f64,
}

pub const COLUMNS: [ColumnSpec; 3] = [
    ColumnSpec { key: "image", header: "Image", width: 20.0 },
    ColumnSpec { key: "date", header: "Date", width: 25.0 },
    ColumnSpec { key: "cost", header: "Cost", width: 15.0 },
];

/// サムネイルを置く列
pub const IMAGE_COLUMN: u16 = 0;

/// レコードの行番号（0始まり）
pub fn record_row(index: usize) -> u32 {
    HEADER_ROW + 1 + index as u32
}
