// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::rates::{self, RateTiers};
use super::LedgerError;
use rust_decimal::Decimal;

/// The mutable bookkeeping state of one credit card. `current_debt` is
/// the field of record; a displayed balance is derived as its negation.
/// Invariant: `0 <= current_debt <= limit` across any operation sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct CardState {
    pub limit: Decimal,
    pub current_debt: Decimal,
    /// Explicit monthly rate override; when absent the bracketed table
    /// keyed by current debt applies.
    pub interest_rate: Option<Decimal>,
    pub min_payment_rate: Decimal,
}

impl CardState {
    pub fn new(limit: Decimal, current_debt: Decimal) -> CardState {
        CardState {
            limit,
            current_debt,
            interest_rate: None,
            min_payment_rate: rates::minimum_payment_rate(),
        }
    }

    /// Remaining spending room, floored at zero.
    pub fn available_limit(&self) -> Decimal {
        (self.limit - self.current_debt).max(Decimal::ZERO)
    }

    pub fn minimum_payment(&self) -> Decimal {
        self.current_debt * self.min_payment_rate
    }

    pub fn tiers(&self) -> RateTiers {
        rates::rate_tiers(self.current_debt)
    }

    /// Estimated interest for one month on the current debt.
    pub fn monthly_interest(&self, overdue: bool) -> Decimal {
        let rate = match self.interest_rate {
            Some(r) => r,
            None => {
                let tiers = self.tiers();
                if overdue {
                    tiers.overdue
                } else {
                    tiers.regular
                }
            }
        };
        self.current_debt * rate / Decimal::from(100u32)
    }

    /// Adds a purchase to the debt. Rejected without mutation when the
    /// amount is non-positive or would push debt past the limit.
    pub fn apply_purchase(&mut self, amount: Decimal) -> Result<(), LedgerError> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::Validation(format!(
                "Purchase amount must be positive, got {}",
                amount
            )));
        }
        let available = self.available_limit();
        if amount > available {
            return Err(LedgerError::LimitExceeded { amount, available });
        }
        self.current_debt += amount;
        Ok(())
    }

    /// Pays down the debt. Overpaying is rejected outright; the UI offers
    /// "full" as exactly `current_debt` to avoid it. Debt is clamped at
    /// zero against rounding residue.
    pub fn apply_payment(&mut self, amount: Decimal) -> Result<(), LedgerError> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::Validation(format!(
                "Payment amount must be positive, got {}",
                amount
            )));
        }
        if amount > self.current_debt {
            return Err(LedgerError::OverpaymentRejected {
                amount,
                debt: self.current_debt,
            });
        }
        self.current_debt = (self.current_debt - amount).max(Decimal::ZERO);
        Ok(())
    }
}
