pub mod excel;

use crate::error::{ParkingScanError, Result};
use parking_scan_common::ParsedRecord;
use std::path::{Path, PathBuf};

/// 出力ファイル名
pub const EXPORT_FILE_NAME: &str = "parking_data.xlsx";

/// xlsxのMIMEタイプ
pub const XLSX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// 出力先がディレクトリ（または拡張子なし）なら既定のファイル名を付ける
pub fn output_path_for(output: &Path) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(EXPORT_FILE_NAME)
    } else {
        output.to_path_buf()
    }
}

/// レコード一覧をExcelに書き出す
///
/// 失敗してもストアには触れない。
pub fn export_records(records: &[ParsedRecord], output: &Path) -> Result<PathBuf> {
    let output_path = output_path_for(output);

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ParkingScanError::Export(format!("出力先作成エラー: {}", e)))?;
        }
    }

    let buffer = excel::generate_excel(records)?;
    std::fs::write(&output_path, buffer)
        .map_err(|e| ParkingScanError::Export(format!("{}: {}", output_path.display(), e)))?;

    tracing::info!("Excel出力: {} ({}件)", output_path.display(), records.len());
    Ok(output_path)
}
