//! Excel生成（共通ライブラリ）
//!
//! layout.rs の定義を使用して、サムネイル付きのレシート一覧を生成

use crate::layout::{
    record_row, COLUMNS, HEADER_ROW, IMAGE_COLUMN, RECORD_ROW_HEIGHT_PT, SHEET_NAME,
    THUMBNAIL_HEIGHT_PX, THUMBNAIL_WIDTH_PX,
};
use rust_xlsxwriter::*;

/// 画像データ（バイト配列）
pub struct ImageData {
    pub data: Vec<u8>,
    pub extension: String,  // "png", "jpeg"
}

/// 行データのトレイト
pub trait ReceiptRow {
    fn date(&self) -> &str;
    fn cost(&self) -> &str;
}

impl ReceiptRow for crate::types::ParsedRecord {
    fn date(&self) -> &str { &self.date }
    fn cost(&self) -> &str { &self.cost }
}

/// フィールド値を取得
fn get_field_value<'a, T: ReceiptRow>(row: &'a T, key: &str) -> Option<&'a str> {
    match key {
        "date" => Some(row.date()),
        "cost" => Some(row.cost()),
        _ => None,
    }
}

/// Excelをバッファに生成
///
/// # Arguments
/// * `records` - 行データ（ストアの順序のまま出力）
/// * `image_loader` - 画像データを取得するクロージャ。`None` なら画像なしで行だけ書く
pub fn generate_excel_buffer<T, F>(records: &[T], image_loader: F) -> Result<Vec<u8>, String>
where
    T: ReceiptRow,
    F: Fn(&T) -> Option<ImageData>,
{
    let mut workbook = Workbook::new();

    let header_format = Format::new()
        .set_bold()
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter);

    let value_format = Format::new().set_align(FormatAlign::VerticalCenter);

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)
        .map_err(|e| format!("シート名設定エラー: {}", e))?;

    // ヘッダーと列幅
    for (col, spec) in COLUMNS.iter().enumerate() {
        let col = col as u16;
        worksheet.set_column_width(col, spec.width)
            .map_err(|e| format!("列幅設定エラー: {}", e))?;
        worksheet.write_string_with_format(HEADER_ROW, col, spec.header, &header_format)
            .map_err(|e| format!("ヘッダー書き込みエラー: {}", e))?;
    }

    for (index, record) in records.iter().enumerate() {
        let row = record_row(index);

        for (col, spec) in COLUMNS.iter().enumerate() {
            if let Some(value) = get_field_value(record, spec.key) {
                worksheet.write_string_with_format(row, col as u16, value, &value_format)
                    .map_err(|e| format!("値書き込みエラー: {}", e))?;
            }
        }

        worksheet.set_row_height(row, RECORD_ROW_HEIGHT_PT)
            .map_err(|e| format!("行高さ設定エラー: {}", e))?;

        // 画像埋め込み
        if let Some(image_data) = image_loader(record) {
            let image = Image::new_from_buffer(&image_data.data)
                .map_err(|e| format!("画像読み込みエラー ({}): {}", image_data.extension, e))?
                .set_scale_to_size(THUMBNAIL_WIDTH_PX, THUMBNAIL_HEIGHT_PX, false)
                .set_object_movement(ObjectMovement::MoveButDontSizeWithCells);

            worksheet.insert_image(row, IMAGE_COLUMN, &image)
                .map_err(|e| format!("画像埋め込みエラー: {}", e))?;
        }
    }

    // バッファに書き出し
    workbook.save_to_buffer()
        .map_err(|e| format!("Excel保存エラー: {}", e))
}
