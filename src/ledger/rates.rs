// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::LedgerError;
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

/// Monthly percentage rates for a debt/limit bracket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateTiers {
    pub reference: Decimal,
    pub regular: Decimal,
    pub overdue: Decimal,
}

/// Bracketed monthly rates keyed by the supplied debt or limit amount.
/// Brackets are inclusive on the lower bound, exclusive on the upper.
pub fn rate_tiers(amount: Decimal) -> RateTiers {
    let reference = Decimal::new(311, 2);
    if amount < Decimal::from(25_000u32) {
        RateTiers {
            reference,
            regular: Decimal::new(350, 2),
            overdue: Decimal::new(380, 2),
        }
    } else if amount < Decimal::from(150_000u32) {
        RateTiers {
            reference,
            regular: Decimal::new(425, 2),
            overdue: Decimal::new(455, 2),
        }
    } else {
        RateTiers {
            reference,
            regular: Decimal::new(475, 2),
            overdue: Decimal::new(505, 2),
        }
    }
}

/// Monthly cash-advance rate, independent of amount.
pub fn cash_advance_rate() -> Decimal {
    Decimal::new(500, 2)
}

/// Default minimum-payment rate (20% of current debt).
pub fn minimum_payment_rate() -> Decimal {
    Decimal::new(20, 2)
}

/// Restructuring rates: (regular, overdue), independent of amount.
pub fn restructuring_rates() -> (Decimal, Decimal) {
    (Decimal::new(311, 2), Decimal::new(530, 2))
}

/// Validates a statement/due day-of-month. Accepts 1..=30; a 30 entered
/// while `today` falls in February is coerced to 28.
///
/// Note the coercion looks at the month of `today`, not the month the
/// statement will actually land in. A card configured in March keeps its
/// 30 even though February will come around. Kept as-is deliberately;
/// callers pass `Utc::now().date_naive()`.
pub fn validate_statement_day(day: u32, today: NaiveDate) -> Result<u32, LedgerError> {
    if !(1..=30).contains(&day) {
        return Err(LedgerError::DayOutOfRange(day));
    }
    if today.month() == 2 && day == 30 {
        return Ok(28);
    }
    Ok(day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn tiers_match_brackets() {
        let low = rate_tiers(d("24999.99"));
        assert_eq!(low.regular, d("3.50"));
        assert_eq!(low.overdue, d("3.80"));

        let mid = rate_tiers(d("25000"));
        assert_eq!(mid.regular, d("4.25"));
        assert_eq!(mid.overdue, d("4.55"));

        let high = rate_tiers(d("150000"));
        assert_eq!(high.regular, d("4.75"));
        assert_eq!(high.overdue, d("5.05"));
    }

    #[test]
    fn lookup_is_pure_within_a_bracket() {
        assert_eq!(rate_tiers(d("100")), rate_tiers(d("24000")));
        assert_eq!(rate_tiers(d("25000")), rate_tiers(d("149999")));
        assert_eq!(rate_tiers(d("150000")), rate_tiers(d("9000000")));
    }

    #[test]
    fn reference_rate_is_constant() {
        for amt in ["0", "30000", "200000"] {
            assert_eq!(rate_tiers(d(amt)).reference, d("3.11"));
        }
    }

    #[test]
    fn day_30_coerced_only_in_february() {
        let feb = NaiveDate::from_ymd_opt(2025, 2, 14).unwrap();
        let mar = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        assert_eq!(validate_statement_day(30, feb).unwrap(), 28);
        assert_eq!(validate_statement_day(30, mar).unwrap(), 30);
        assert_eq!(validate_statement_day(15, feb).unwrap(), 15);
    }

    #[test]
    fn day_out_of_range_rejected() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        assert_eq!(
            validate_statement_day(0, today),
            Err(LedgerError::DayOutOfRange(0))
        );
        assert_eq!(
            validate_statement_day(31, today),
            Err(LedgerError::DayOutOfRange(31))
        );
    }
}
