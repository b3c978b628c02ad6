//! Field-name translation for the portal's JSON responses.
//!
//! The data endpoints key their JSON with short codes such as `F_AP_QT`. The
//! codes are rewritten to descriptive names on the raw text, before parsing,
//! and only inside object keys: a string in value position is left alone even
//! when it spells a code.

use crate::error::ScrapeError;
use crate::model::{DatedRecord, Mode, TranslatedRecord, UsageQuery};
use serde_json::Value;
use std::borrow::Cow;

/// Whole-key translations for the real-time summary endpoint.
pub const SIMPLE_FIELDS: &[(&str, &str)] = &[
    ("BASE_BILL_UCOST", "기본요금단가"),
    ("BASE_BILL", "기본요금"),
    ("JOJ_KW", "요금적용전력코드"),
    ("CNTR_KND_NM", "전력요금제"),
    ("END_DT", "업데이트"),
    ("DT", "시작일"),
    ("ELEC_CAR_CD", "공급코드"),
    ("ELEC_CAR_NM", "공급유형"),
    ("ET", "종료일"),
    ("F_AP_QT", "실시간사용량(kWh)"),
    ("JOJ_KW_TIME", "요금적용전력"),
    ("KWH_BILL", "전력량요금"),
    ("KWH_TYPE", "전력량요금코드"),
    ("PREDICT_BASE_BILL", "예상_기본요금단가"),
    ("PREDICT_BILL", "예상_전력량요금"),
    ("PREDICT_BILL_LEVEL", "예상_누진단계"),
    ("PREDICT_FUND_BILL", "예상_전력산업기반기금"),
    ("PREDICT_TOT", "예상_전력사용량"),
    ("PREDICT_TOTAL_CHARGE", "당월_예상_청구금액"),
    ("PREDICT_TOT_BILL", "당월_예상_사용액"),
    ("PREDICT_VAT_BILL", "당월_예상_부가세"),
    ("REAL_KWH_BILL", "실시간_전력사용량요금"),
    ("TOTAL_CHARGE", "실시간_요금"),
    ("VAT_BILL", "부가가치세"),
    ("UNIT_PRICE", "공급단가"),
    ("REAL_PREDICT_TOT_BILL", "예상_전력량요금"),
    ("START_DT", "검침시작일"),
    ("SELECT_DT", "업데이트"),
];

/// Substring translations for the time-series endpoint, applied in order.
///
/// Keys combine codes (`LDAY_F_AP_QT`), so `MR_HHMI2` must precede `MR_HHMI`
/// and the measurement codes must precede the `LDAY`/`LMONTH`/`AVG` prefixes.
pub const DETAILED_FIELDS: &[(&str, &str)] = &[
    ("F_AP_QT", "사용량(kWh)"),
    ("F_LARAP_QT", "무효전력(지상)"),
    ("F_LERAP_QT", "무효전력(진상)"),
    ("SUM_QT", "무효전력 합계"),
    ("F_LARAP_PF", "역률(지상)"),
    ("F_LERAP_PF", "역률(진상)"),
    ("MR_HHMI2", "시간(HH:mm)"),
    ("MR_HHMI", "시간(한글)"),
    ("CO2", "탄소배출량"),
    ("LDAY", "전일"),
    ("LMONTH", "전월"),
    ("AVG", "평균"),
];

fn translate_simple_key(key: &str) -> Cow<'_, str> {
    SIMPLE_FIELDS
        .iter()
        .find(|(code, _)| *code == key)
        .map(|(_, name)| Cow::Borrowed(*name))
        .unwrap_or(Cow::Borrowed(key))
}

fn translate_detailed_key(key: &str) -> Cow<'_, str> {
    DETAILED_FIELDS
        .iter()
        .fold(Cow::Borrowed(key), |acc, (code, name)| {
            if acc.contains(code) {
                Cow::Owned(acc.replace(code, name))
            } else {
                acc
            }
        })
}

/// Rewrites every object key in `text` with `translate_key`, leaving the rest
/// of the text byte-for-byte intact. Text that is not JSON passes through.
pub fn substitute_keys<F>(text: &str, translate_key: F) -> String
where
    F: for<'a> Fn(&'a str) -> Cow<'a, str>,
{
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find('"') {
        out.push_str(&rest[..open]);
        let literal = &rest[open + 1..];
        let Some(close) = closing_quote(literal) else {
            out.push_str(&rest[open..]);
            return out;
        };

        let content = &literal[..close];
        let after = &literal[close + 1..];
        out.push('"');
        if after.trim_start().starts_with(':') {
            out.push_str(&translate_key(content));
        } else {
            out.push_str(content);
        }
        out.push('"');
        rest = after;
    }

    out.push_str(rest);
    out
}

/// Byte offset of the quote that ends a JSON string literal.
fn closing_quote(literal: &str) -> Option<usize> {
    let mut escaped = false;
    for (i, byte) in literal.bytes().enumerate() {
        match byte {
            _ if escaped => escaped = false,
            b'\\' => escaped = true,
            b'"' => return Some(i),
            _ => {}
        }
    }
    None
}

/// Applies the mode's key translations to a raw response body.
pub fn translate_text(text: &str, mode: Mode) -> String {
    match mode {
        Mode::Simple => substitute_keys(text, translate_simple_key),
        Mode::Detailed => substitute_keys(text, translate_detailed_key),
    }
}

/// Translates and parses a raw data response into the record for `query`.
///
/// Detailed mode keeps exactly one record, the whole payload tagged with the
/// requested date.
pub fn translate_response(text: &str, query: &UsageQuery) -> Result<TranslatedRecord, ScrapeError> {
    let translated = translate_text(text, query.mode);
    let parsed: Value =
        serde_json::from_str(&translated).map_err(|e| ScrapeError::data_parse(text, e))?;

    match query.mode {
        Mode::Simple => Ok(TranslatedRecord::Summary(parsed)),
        Mode::Detailed => Ok(TranslatedRecord::TimeSeries([DatedRecord {
            date: query.date_string(),
            data: parsed,
        }])),
    }
}
