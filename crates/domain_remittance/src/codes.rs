//! Remittance code tables and claim-status derivation

use edi_kernel::Money;
use serde::{Deserialize, Serialize};

/// Claim status as tracked by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimStatus {
    Submitted,
    Pending,
    Paid,
    PartiallyPaid,
    Denied,
}

/// ERA claim status code for a denied claim
const STATUS_CODE_DENIED: &str = "4";
/// ERA claim status code for a reversal of a previous payment
const STATUS_CODE_REVERSAL: &str = "22";

/// Derives the claim status from the ERA status code and amounts
///
/// Pure and total: explicit denial/reversal codes win, then the paid amount
/// decides between denied, paid, and partially paid.
pub fn derive_claim_status(status_code: &str, charge: Money, payment: Money) -> ClaimStatus {
    if status_code == STATUS_CODE_DENIED || status_code == STATUS_CODE_REVERSAL {
        return ClaimStatus::Denied;
    }
    if payment.is_zero() || payment.is_negative() {
        return ClaimStatus::Denied;
    }
    if payment >= charge {
        return ClaimStatus::Paid;
    }
    if payment < charge {
        return ClaimStatus::PartiallyPaid;
    }
    ClaimStatus::Pending
}

/// Human-readable description for an ERA claim status code
///
/// Used as the skip reason when a claim carries no payment.
pub fn status_description(status_code: &str) -> &'static str {
    match status_code {
        "1" => "Processed as primary",
        "2" => "Processed as secondary",
        "3" => "Processed as tertiary",
        "4" => "Denied/Adjusted",
        "19" => "Processed as primary, forwarded to additional payer",
        "20" => "Processed as secondary, forwarded to additional payer",
        "21" => "Processed as tertiary, forwarded to additional payer",
        "22" => "Reversal of previous payment",
        "23" => "Not our claim, forwarded to additional payer",
        _ => "Adjudicated",
    }
}

/// Description for an adjustment group code
pub fn adjustment_group_description(group_code: &str) -> &'static str {
    match group_code {
        "CO" => "Contractual obligation",
        "PR" => "Patient responsibility",
        "OA" => "Other adjustment",
        "PI" => "Payer initiated reduction",
        "CR" => "Correction and reversal",
        _ => "Adjustment",
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use edi_kernel::Currency;
    use proptest::prelude::*;

    proptest! {
        // The derivation is total and never yields Pending for
        // non-reversal codes with positive amounts
        #[test]
        fn derivation_is_total(
            code in "[0-9]{1,2}",
            charge in 1i64..1_000_000i64,
            payment in 0i64..1_000_000i64
        ) {
            let charge = Money::from_minor(charge, Currency::Usd);
            let payment = Money::from_minor(payment, Currency::Usd);
            let status = derive_claim_status(&code, charge, payment);

            if code == "4" || code == "22" {
                prop_assert_eq!(status, ClaimStatus::Denied);
            } else if payment.is_zero() {
                prop_assert_eq!(status, ClaimStatus::Denied);
            } else if payment >= charge {
                prop_assert_eq!(status, ClaimStatus::Paid);
            } else {
                prop_assert_eq!(status, ClaimStatus::PartiallyPaid);
            }
        }
    }
}
