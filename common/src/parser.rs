//! OCRテキストパーサー
//!
//! OCRの生テキストを正規化し、日付と金額を抽出する。
//! マッチしない場合は例外ではなく "Not found" を返す。

use crate::types::{ExtractedFields, NOT_FOUND};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// 印字可能ASCII (0x20-0x7E) 以外
    static ref NON_PRINTABLE: Regex = Regex::new(r"[^\x20-\x7E]").unwrap();

    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();

    /// DD/MM/YY(YY) [HH:MM]（区切りは / - .）
    static ref DATE_PATTERN: Regex = Regex::new(
        r"(\d{2}[/\-.]\d{2}[/\-.]\d{2,4})\s*(\d{2}:\d{2})?"
    ).unwrap();

    /// ハイフン付き金額（差し引き額として印字される）
    static ref COST_PATTERN: Regex = Regex::new(r"-\s*\$?(\d+\.\d{2})").unwrap();
}

/// 印字可能ASCII以外を除去し、連続空白を1つにまとめる
///
/// # Examples
/// ```
/// use parking_scan_common::clean_text;
///
/// assert_eq!(clean_text("EXIT  12/05/24\t14:30"), "EXIT 12/05/24 14:30");
/// ```
pub fn clean_text(raw_text: &str) -> String {
    let printable = NON_PRINTABLE.replace_all(raw_text, "");
    WHITESPACE_RUN.replace_all(&printable, " ").into_owned()
}

/// 正規化済みテキストから日付を抽出
///
/// 日付部分と時刻部分を空白1つで連結してtrimする（時刻がなければ日付のみ）。
pub fn extract_date(clean: &str) -> String {
    match DATE_PATTERN.captures(clean) {
        Some(caps) => {
            let date = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
            let time = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
            format!("{} {}", date, time).trim().to_string()
        }
        None => NOT_FOUND.to_string(),
    }
}

/// 正規化済みテキストから金額を抽出（"$" を付けて返す）
pub fn extract_cost(clean: &str) -> String {
    COST_PATTERN
        .captures(clean)
        .and_then(|caps| caps.get(1))
        .map(|m| format!("${}", m.as_str()))
        .unwrap_or_else(|| NOT_FOUND.to_string())
}

/// OCRの生テキストから日付と金額を抽出
///
/// どんな入力でもパニックせず、各フィールドは抽出値か "Not found" になる。
pub fn parse_receipt_text(raw_text: &str) -> ExtractedFields {
    let clean = clean_text(raw_text);
    ExtractedFields {
        date: extract_date(&clean),
        cost: extract_cost(&clean),
    }
}
