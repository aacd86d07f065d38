//! Eligibility request and benefit model

use chrono::NaiveDate;
use edi_kernel::{CdtCode, Money, ProcedureClass, TenantId};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Service type code for general dental care, fixed for every inquiry
pub const DENTAL_SERVICE_TYPE_CODE: &str = "35";

/// An eligibility inquiry for one subscriber against one payer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EligibilityRequest {
    pub tenant_id: TenantId,
    /// Payer identifier as registered with the clearinghouse
    pub payer_id: String,
    /// Member id on the insurance card
    pub member_id: String,
    pub subscriber_first_name: String,
    pub subscriber_last_name: String,
    /// Date of birth, `YYYY-MM-DD`
    pub subscriber_date_of_birth: String,
    /// NPI of the inquiring provider
    pub provider_npi: String,
    /// Group number, if the plan is employer-sponsored
    pub group_number: Option<String>,
}

/// Coverage percentages by procedure class
///
/// Plans quote each class independently; absent classes fall back to the
/// conventional 100/80/50 split, with orthodontic coverage unset unless the
/// plan states it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageLevels {
    pub preventive_percent: Decimal,
    pub basic_percent: Decimal,
    pub major_percent: Decimal,
    pub orthodontic_percent: Option<Decimal>,
}

impl CoverageLevels {
    /// Returns the coverage percentage for a procedure class
    ///
    /// `None` only for orthodontic procedures on plans that do not quote
    /// orthodontic coverage.
    pub fn percent_for(&self, class: ProcedureClass) -> Option<Decimal> {
        match class {
            ProcedureClass::Preventive => Some(self.preventive_percent),
            ProcedureClass::Basic => Some(self.basic_percent),
            ProcedureClass::Major => Some(self.major_percent),
            ProcedureClass::Orthodontic => self.orthodontic_percent,
        }
    }
}

impl Default for CoverageLevels {
    fn default() -> Self {
        Self {
            preventive_percent: dec!(100),
            basic_percent: dec!(80),
            major_percent: dec!(50),
            orthodontic_percent: None,
        }
    }
}

/// A normalized dental benefit summary
///
/// Immutable once received; each eligibility check produces a fresh value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DentalBenefits {
    /// Whether the plan reports the member as eligible
    pub is_eligible: bool,
    /// Plan effective date
    pub effective_date: Option<NaiveDate>,
    /// Plan termination date, when the coverage has an end
    pub termination_date: Option<NaiveDate>,
    /// Annual benefit maximum
    pub annual_maximum: Option<Money>,
    /// Annual maximum already used
    pub annual_used: Option<Money>,
    /// Annual maximum remaining
    pub annual_remaining: Option<Money>,
    /// Plan deductible
    pub deductible: Option<Money>,
    /// Deductible met to date
    pub deductible_met: Option<Money>,
    /// Out-of-pocket maximum
    pub out_of_pocket_max: Option<Money>,
    /// Out-of-pocket met to date
    pub out_of_pocket_met: Option<Money>,
    /// Coverage percentages by procedure class
    pub coverage: CoverageLevels,
    /// Flat copay, when the plan uses one
    pub copay: Option<Money>,
    /// Coinsurance percentage, when the plan uses one
    pub coinsurance_percent: Option<Decimal>,
    /// Waiting periods keyed by procedure class (e.g. "major" -> "12 months")
    pub waiting_periods: BTreeMap<String, String>,
    /// Frequency limitations keyed by procedure code (e.g. "D1110" -> "2 per year")
    pub frequency_limitations: BTreeMap<String, String>,
}

impl DentalBenefits {
    /// Returns the plan's coverage percentage for a procedure, classed by
    /// its CDT series
    pub fn coverage_percent_for(&self, code: &CdtCode) -> Option<Decimal> {
        self.coverage.percent_for(code.procedure_class())
    }

    /// Returns the waiting period quoted for a procedure's class, if any
    pub fn waiting_period_for(&self, code: &CdtCode) -> Option<&str> {
        self.waiting_periods
            .get(code.procedure_class().key())
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coverage_percent_by_cdt_series() {
        let coverage = CoverageLevels::default();
        let benefits = DentalBenefits {
            is_eligible: true,
            effective_date: None,
            termination_date: None,
            annual_maximum: None,
            annual_used: None,
            annual_remaining: None,
            deductible: None,
            deductible_met: None,
            out_of_pocket_max: None,
            out_of_pocket_met: None,
            coverage,
            copay: None,
            coinsurance_percent: None,
            waiting_periods: BTreeMap::from([(
                "major".to_string(),
                "12 months".to_string(),
            )]),
            frequency_limitations: BTreeMap::new(),
        };

        let prophylaxis = CdtCode::new("D1110").unwrap();
        let filling = CdtCode::new("D2391").unwrap();
        let implant = CdtCode::new("D6010").unwrap();
        let braces = CdtCode::new("D8080").unwrap();

        assert_eq!(benefits.coverage_percent_for(&prophylaxis), Some(dec!(100)));
        assert_eq!(benefits.coverage_percent_for(&filling), Some(dec!(80)));
        assert_eq!(benefits.coverage_percent_for(&implant), Some(dec!(50)));
        // No orthodontic coverage quoted
        assert_eq!(benefits.coverage_percent_for(&braces), None);

        assert_eq!(benefits.waiting_period_for(&implant), Some("12 months"));
        assert_eq!(benefits.waiting_period_for(&filling), None);
    }

    #[test]
    fn test_orthodontic_coverage_when_quoted() {
        let coverage = CoverageLevels {
            orthodontic_percent: Some(dec!(50)),
            ..Default::default()
        };
        assert_eq!(
            coverage.percent_for(ProcedureClass::Orthodontic),
            Some(dec!(50))
        );
    }
}
