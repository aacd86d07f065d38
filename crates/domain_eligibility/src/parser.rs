//! Eligibility response parsing
//!
//! Normalizes the clearinghouse's benefit payload into [`DentalBenefits`].
//! Every field is independently optional on the wire; coverage percentages
//! fall back to the conventional 100/80/50 split when a class is absent.

use edi_kernel::json;
use edi_kernel::{Currency, Money};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::benefits::{CoverageLevels, DentalBenefits};

/// Parses a raw benefit payload into a normalized summary
pub fn parse_eligibility_response(raw: &Value) -> DentalBenefits {
    let currency = Currency::Usd;
    let money = |keys: &[&str]| json::decimal_at(raw, keys).map(|d| Money::new(d, currency));

    let coverage_defaults = CoverageLevels::default();
    let coverage_node = raw
        .get("coverage")
        .or_else(|| raw.get("coveragePercentages"))
        .unwrap_or(raw);
    let coverage = CoverageLevels {
        preventive_percent: json::decimal_at(
            coverage_node,
            &["preventive", "preventivePercent", "preventive_percent"],
        )
        .unwrap_or(coverage_defaults.preventive_percent),
        basic_percent: json::decimal_at(coverage_node, &["basic", "basicPercent", "basic_percent"])
            .unwrap_or(coverage_defaults.basic_percent),
        major_percent: json::decimal_at(coverage_node, &["major", "majorPercent", "major_percent"])
            .unwrap_or(coverage_defaults.major_percent),
        orthodontic_percent: json::decimal_at(
            coverage_node,
            &["orthodontic", "orthodonticPercent", "orthodontic_percent", "ortho"],
        ),
    };

    DentalBenefits {
        is_eligible: json::bool_at(raw, &["isEligible", "is_eligible", "eligible", "active"])
            .unwrap_or(false),
        effective_date: json::date_at(raw, &["effectiveDate", "effective_date", "planBeginDate"]),
        termination_date: json::date_at(
            raw,
            &["terminationDate", "termination_date", "planEndDate"],
        ),
        annual_maximum: money(&["annualMaximum", "annual_maximum", "benefitMax"]),
        annual_used: money(&["annualUsed", "annual_used", "benefitUsed"]),
        annual_remaining: money(&["annualRemaining", "annual_remaining", "benefitRemaining"]),
        deductible: money(&["deductible", "deductibleAmount"]),
        deductible_met: money(&["deductibleMet", "deductible_met", "deductibleRemainingMet"]),
        out_of_pocket_max: money(&["outOfPocketMax", "out_of_pocket_max", "oopMax"]),
        out_of_pocket_met: money(&["outOfPocketMet", "out_of_pocket_met", "oopMet"]),
        coverage,
        copay: money(&["copay", "copayAmount"]),
        coinsurance_percent: json::decimal_at(
            raw,
            &["coinsurance", "coinsurancePercent", "coinsurance_percent"],
        ),
        waiting_periods: string_map(raw, &["waitingPeriods", "waiting_periods"]),
        frequency_limitations: string_map(raw, &["frequencyLimitations", "frequency_limitations"]),
    }
}

/// Reads an open-ended string-to-string map under any of the given keys
fn string_map(raw: &Value, keys: &[&str]) -> BTreeMap<String, String> {
    keys.iter()
        .find_map(|k| raw.get(k).and_then(Value::as_object))
        .map(|obj| {
            obj.iter()
                .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_parse_full_response() {
        let raw = json!({
            "isEligible": true,
            "effectiveDate": "2026-01-01",
            "annualMaximum": 1500.00,
            "annualUsed": "250.00",
            "annualRemaining": 1250.00,
            "deductible": 50.00,
            "deductibleMet": 50.00,
            "outOfPocketMax": 3000.00,
            "outOfPocketMet": 300.00,
            "coverage": {
                "preventive": 100,
                "basic": 80,
                "major": 60,
                "orthodontic": 50
            },
            "waitingPeriods": {"major": "12 months"},
            "frequencyLimitations": {"D1110": "2 per year"}
        });

        let benefits = parse_eligibility_response(&raw);
        assert!(benefits.is_eligible);
        assert_eq!(
            benefits.effective_date,
            NaiveDate::from_ymd_opt(2026, 1, 1)
        );
        assert_eq!(benefits.annual_maximum.unwrap().amount(), dec!(1500.00));
        assert_eq!(benefits.annual_used.unwrap().amount(), dec!(250.00));
        assert_eq!(benefits.coverage.major_percent, dec!(60));
        assert_eq!(benefits.coverage.orthodontic_percent, Some(dec!(50)));
        assert_eq!(
            benefits.waiting_periods.get("major").map(String::as_str),
            Some("12 months")
        );
        assert_eq!(
            benefits.frequency_limitations.get("D1110").map(String::as_str),
            Some("2 per year")
        );
    }

    #[test]
    fn test_parse_sparse_response_uses_defaults() {
        let benefits = parse_eligibility_response(&json!({"eligible": "Y"}));

        assert!(benefits.is_eligible);
        assert_eq!(benefits.coverage.preventive_percent, dec!(100));
        assert_eq!(benefits.coverage.basic_percent, dec!(80));
        assert_eq!(benefits.coverage.major_percent, dec!(50));
        assert!(benefits.coverage.orthodontic_percent.is_none());
        assert!(benefits.annual_maximum.is_none());
        assert!(benefits.waiting_periods.is_empty());
    }

    #[test]
    fn test_parse_empty_response_is_not_eligible() {
        let benefits = parse_eligibility_response(&json!({}));
        assert!(!benefits.is_eligible);
    }
}
