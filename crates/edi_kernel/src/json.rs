//! Probing helpers for loosely-shaped clearinghouse payloads
//!
//! Clearinghouses emit the same logical response under several field-name
//! variants (camelCase, snake_case, legacy aliases). These helpers probe a
//! `serde_json::Value` across a list of aliases and coerce scalar types the
//! way payers actually send them: amounts as numbers or strings, dates in a
//! few common formats.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

/// Returns the first string found under any of the given keys
pub fn str_at<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|k| value.get(k).and_then(Value::as_str))
}

/// Returns the first string found under any of the given keys, owned and trimmed
pub fn string_at(value: &Value, keys: &[&str]) -> Option<String> {
    str_at(value, keys).map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Returns the first boolean found under any of the given keys,
/// accepting JSON booleans or "true"/"false"/"Y"/"N" strings
pub fn bool_at(value: &Value, keys: &[&str]) -> Option<bool> {
    keys.iter().find_map(|k| match value.get(k) {
        Some(Value::Bool(b)) => Some(*b),
        Some(Value::String(s)) => match s.as_str() {
            "true" | "Y" | "y" | "1" => Some(true),
            "false" | "N" | "n" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    })
}

/// Returns the first decimal amount found under any of the given keys,
/// accepting JSON numbers or numeric strings
pub fn decimal_at(value: &Value, keys: &[&str]) -> Option<Decimal> {
    keys.iter().find_map(|k| match value.get(k) {
        Some(Value::Number(n)) => Decimal::from_str(&n.to_string()).ok(),
        Some(Value::String(s)) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    })
}

/// Returns the first date found under any of the given keys,
/// accepting `YYYY-MM-DD`, `YYYYMMDD`, or `MM/DD/YYYY`
pub fn date_at(value: &Value, keys: &[&str]) -> Option<NaiveDate> {
    str_at(value, keys).and_then(parse_date)
}

/// Parses a date string in the formats payers commonly use
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y%m%d"))
        .or_else(|_| NaiveDate::parse_from_str(raw, "%m/%d/%Y"))
        .ok()
}

/// Returns the first array found under any of the given keys
pub fn array_at<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Vec<Value>> {
    keys.iter().find_map(|k| value.get(k).and_then(Value::as_array))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_str_at_aliases() {
        let v = json!({"actionCode": "A1"});
        assert_eq!(str_at(&v, &["action_code", "actionCode"]), Some("A1"));
        assert_eq!(str_at(&v, &["missing"]), None);
    }

    #[test]
    fn test_decimal_from_number_or_string() {
        let v = json!({"paymentAmount": 450.0, "chargeAmount": "500.00"});
        assert_eq!(decimal_at(&v, &["paymentAmount"]), Some(dec!(450)));
        assert_eq!(decimal_at(&v, &["chargeAmount"]), Some(dec!(500.00)));
    }

    #[test]
    fn test_date_formats() {
        assert_eq!(
            parse_date("2026-03-15"),
            NaiveDate::from_ymd_opt(2026, 3, 15)
        );
        assert_eq!(parse_date("20260315"), NaiveDate::from_ymd_opt(2026, 3, 15));
        assert_eq!(
            parse_date("03/15/2026"),
            NaiveDate::from_ymd_opt(2026, 3, 15)
        );
        assert_eq!(parse_date("not a date"), None);
    }

    #[test]
    fn test_bool_coercion() {
        let v = json!({"eligible": "Y", "active": true, "flag": "weird"});
        assert_eq!(bool_at(&v, &["eligible"]), Some(true));
        assert_eq!(bool_at(&v, &["active"]), Some(true));
        assert_eq!(bool_at(&v, &["flag"]), None);
    }
}
