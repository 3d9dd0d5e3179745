//! レシートの時系列ソート

use crate::dates::parse_receipt_date;
use crate::types::ParsedRecord;

/// 日付の昇順に並べ替える（安定ソート）
///
/// 日付を解釈できないレコードは末尾に、元の順序のまま置く。
pub fn sort_by_date(mut records: Vec<ParsedRecord>) -> Vec<ParsedRecord> {
    sort_records(&mut records);
    records
}

/// スライスをその場で並べ替える
pub fn sort_records(records: &mut [ParsedRecord]) {
    records.sort_by_cached_key(|r| {
        let parsed = parse_receipt_date(&r.date);
        (parsed.is_none(), parsed)
    });
}
