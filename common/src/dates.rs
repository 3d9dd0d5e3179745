//! レシート日付パーサー
//!
//! 受け付ける形式を列挙した日付パーサー。常に日(DD)→月(MM)の順で解釈する。
//! 区切りの `-` と `.` は `/` として扱う。

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// 日付形式テーブルのバージョン
pub const DATE_PATTERN_VERSION: u32 = 1;

/// (年の桁数, 日付フォーマット)
pub const ACCEPTED_DATE_FORMATS: &[(usize, &str)] = &[
    (4, "%d/%m/%Y"),
    (2, "%d/%m/%y"),
];

/// 時刻フォーマット（任意）
pub const TIME_FORMAT: &str = "%H:%M";

/// 日付文字列を日時に変換
///
/// "DD/MM/YYYY", "DD/MM/YY" の後ろに任意で " HH:MM"。
/// 時刻がない場合は 00:00 とする。解釈できなければ `None`。
pub fn parse_receipt_date(value: &str) -> Option<NaiveDateTime> {
    let mut parts = value.split_whitespace();
    let date_part = parts.next()?.replace(['-', '.'], "/");
    let time_part = parts.next();
    if parts.next().is_some() {
        return None;
    }

    let year_digits = date_part.rsplit('/').next()?.len();
    let format = ACCEPTED_DATE_FORMATS
        .iter()
        .find(|(digits, _)| *digits == year_digits)
        .map(|(_, format)| *format)?;

    let date = NaiveDate::parse_from_str(&date_part, format).ok()?;
    let time = match time_part {
        Some(t) => NaiveTime::parse_from_str(t, TIME_FORMAT).ok()?,
        None => NaiveTime::MIN,
    };

    Some(date.and_time(time))
}
