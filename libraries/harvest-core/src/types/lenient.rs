//! Tolerant field decoders
//!
//! Documents are written by browser forms with no schema enforcement, so a
//! numeric field may hold a number, a numeric string, `null`, or garbage.
//! These helpers turn anything unusable into `None` instead of failing the
//! whole document.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub(crate) fn number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    n.filter(|n| n.is_finite())
}

pub(crate) fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub(crate) fn timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
                return Some(ts.with_timezone(&Utc));
            }
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .map(|d| Utc.from_utc_datetime(&d.and_time(NaiveTime::MIN)))
        }
        // Epoch milliseconds, possibly stored as a float
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|ms| ms.is_finite()).map(millis_from_float))
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        _ => None,
    }
}

/// Truncate toward zero; out-of-range values saturate and are rejected by chrono
#[allow(clippy::cast_possible_truncation)]
fn millis_from_float(ms: f64) -> i64 {
    ms.trunc() as i64
}

pub(crate) fn date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|ts| ts.date_naive()))
        }
        _ => None,
    }
}

pub(crate) fn string_list(value: &Value) -> Vec<String> {
    let items: Vec<String> = match value {
        Value::Array(items) => items.iter().filter_map(text).collect(),
        Value::String(s) => s.split(',').map(str::to_string).collect(),
        _ => Vec::new(),
    };
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

pub(crate) fn string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(Option::<Value>::deserialize(d)?
        .as_ref()
        .and_then(text)
        .unwrap_or_default())
}

pub(crate) fn opt_number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    Ok(Option::<Value>::deserialize(d)?.as_ref().and_then(number))
}

pub(crate) fn opt_timestamp<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<Option<DateTime<Utc>>, D::Error> {
    Ok(Option::<Value>::deserialize(d)?.as_ref().and_then(timestamp))
}

pub(crate) fn list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    Ok(Option::<Value>::deserialize(d)?
        .as_ref()
        .map(string_list)
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numbers_accept_numeric_strings() {
        assert_eq!(number(&json!(12.5)), Some(12.5));
        assert_eq!(number(&json!(" 40 ")), Some(40.0));
        assert_eq!(number(&json!("")), None);
        assert_eq!(number(&json!("abc")), None);
        assert_eq!(number(&json!("NaN")), None);
        assert_eq!(number(&Value::Null), None);
    }

    #[test]
    fn blank_text_is_missing() {
        assert_eq!(text(&json!("   ")), None);
        assert_eq!(text(&json!("Rice")), Some("Rice".to_string()));
    }

    #[test]
    fn timestamps_from_iso_date_and_millis() {
        let iso = timestamp(&json!("2024-03-01T10:00:00.000Z")).unwrap();
        assert_eq!(iso.to_rfc3339(), "2024-03-01T10:00:00+00:00");

        let day = timestamp(&json!("2024-03-01")).unwrap();
        assert_eq!(day.to_rfc3339(), "2024-03-01T00:00:00+00:00");

        let ms = timestamp(&json!(0)).unwrap();
        assert_eq!(ms.timestamp(), 0);

        assert!(timestamp(&json!("yesterday")).is_none());
    }

    #[test]
    fn float_millis_truncate_to_whole_milliseconds() {
        let ts = timestamp(&json!(1.7e12)).unwrap();
        assert_eq!(ts.timestamp_millis(), 1_700_000_000_000);

        let fractional = timestamp(&json!(1_700_000_000_123.9)).unwrap();
        assert_eq!(fractional.timestamp_millis(), 1_700_000_000_123);

        assert!(timestamp(&json!(1e300)).is_none());
    }

    #[test]
    fn strings_accept_numbers_and_drop_other_shapes() {
        #[derive(Deserialize)]
        struct Row {
            #[serde(default, deserialize_with = "string")]
            phone: String,
        }

        let row: Row = serde_json::from_value(json!({ "phone": 9_876_543_210_u64 })).unwrap();
        assert_eq!(row.phone, "9876543210");
        let row: Row = serde_json::from_value(json!({ "phone": ["x"] })).unwrap();
        assert_eq!(row.phone, "");
        let row: Row = serde_json::from_value(json!({ "phone": null })).unwrap();
        assert_eq!(row.phone, "");
    }

    #[test]
    fn lists_from_arrays_or_comma_strings() {
        assert_eq!(string_list(&json!(["rice", " wheat ", ""])), vec!["rice", "wheat"]);
        assert_eq!(string_list(&json!("rice, wheat,,")), vec!["rice", "wheat"]);
        assert!(string_list(&json!(7)).is_empty());
    }
}
