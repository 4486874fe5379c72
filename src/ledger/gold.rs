// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::LedgerError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// An in-memory purchase lot. Each buy stays a discrete lot so the cost
/// basis survives partial sales; lots are never merged.
#[derive(Debug, Clone, PartialEq)]
pub struct Lot {
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub purchased_at: DateTime<Utc>,
}

/// Appends a purchase lot. Quantity must be positive, unit price
/// non-negative.
pub fn add_lot(
    lots: &mut Vec<Lot>,
    quantity: Decimal,
    unit_price: Decimal,
    purchased_at: DateTime<Utc>,
) -> Result<(), LedgerError> {
    if quantity <= Decimal::ZERO {
        return Err(LedgerError::Validation(format!(
            "Lot quantity must be positive, got {}",
            quantity
        )));
    }
    if unit_price < Decimal::ZERO {
        return Err(LedgerError::Validation(format!(
            "Lot unit price must not be negative, got {}",
            unit_price
        )));
    }
    lots.push(Lot {
        quantity,
        unit_price,
        purchased_at,
    });
    Ok(())
}

/// Consumes `quantity` from the oldest lots first and returns the sale
/// proceeds at `current_price`. Fails with `InsufficientHoldings` before
/// touching anything when the lots cannot cover the quantity; fully
/// consumed lots are dropped, a partially consumed lot keeps its place.
pub fn sell_fifo(
    lots: &mut Vec<Lot>,
    quantity: Decimal,
    current_price: Decimal,
) -> Result<Decimal, LedgerError> {
    if quantity <= Decimal::ZERO {
        return Err(LedgerError::Validation(format!(
            "Sale quantity must be positive, got {}",
            quantity
        )));
    }
    let available: Decimal = lots.iter().map(|l| l.quantity).sum();
    if quantity > available {
        return Err(LedgerError::InsufficientHoldings {
            requested: quantity,
            available,
        });
    }

    // FIFO is by purchase time, not vec order.
    lots.sort_by_key(|l| l.purchased_at);

    let mut remaining = quantity;
    for lot in lots.iter_mut() {
        if remaining.is_zero() {
            break;
        }
        if lot.quantity <= remaining {
            remaining -= lot.quantity;
            lot.quantity = Decimal::ZERO;
        } else {
            lot.quantity -= remaining;
            remaining = Decimal::ZERO;
        }
    }
    lots.retain(|l| l.quantity > Decimal::ZERO);

    Ok(quantity * current_price)
}

/// Mark-to-market valuation against cost basis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Valuation {
    pub current_value: Decimal,
    pub cost_basis: Decimal,
    pub profit_loss: Decimal,
    pub profit_loss_pct: Decimal,
}

impl Valuation {
    fn from_parts(current_value: Decimal, cost_basis: Decimal) -> Valuation {
        let profit_loss = current_value - cost_basis;
        let profit_loss_pct = if cost_basis > Decimal::ZERO {
            profit_loss / cost_basis * Decimal::from(100u32)
        } else {
            Decimal::ZERO
        };
        Valuation {
            current_value,
            cost_basis,
            profit_loss,
            profit_loss_pct,
        }
    }

    /// Aggregates by summing value and basis before recomputing the
    /// percentage. Averaging per-type percentages would overweight small
    /// holdings.
    pub fn combine<I: IntoIterator<Item = Valuation>>(parts: I) -> Valuation {
        let mut value = Decimal::ZERO;
        let mut basis = Decimal::ZERO;
        for p in parts {
            value += p.current_value;
            basis += p.cost_basis;
        }
        Valuation::from_parts(value, basis)
    }
}

/// Values one gold type's lots at the given market price.
pub fn value_lots(lots: &[Lot], market_price: Decimal) -> Valuation {
    let mut value = Decimal::ZERO;
    let mut basis = Decimal::ZERO;
    for lot in lots {
        value += lot.quantity * market_price;
        basis += lot.quantity * lot.unit_price;
    }
    Valuation::from_parts(value, basis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, day, 12, 0, 0).unwrap()
    }

    fn lot(qty: &str, price: &str, day: u32) -> Lot {
        Lot {
            quantity: d(qty),
            unit_price: d(price),
            purchased_at: at(day),
        }
    }

    #[test]
    fn sell_consumes_oldest_lots_first() {
        let mut lots = vec![lot("5", "4000", 1), lot("3", "4100", 10)];
        let proceeds = sell_fifo(&mut lots, d("6"), d("4500")).unwrap();
        assert_eq!(proceeds, d("27000"));
        assert_eq!(lots.len(), 1);
        assert_eq!(lots[0].quantity, d("2"));
        assert_eq!(lots[0].purchased_at, at(10));
    }

    #[test]
    fn sell_exact_quantity_empties_lots() {
        let mut lots = vec![lot("2", "4000", 1), lot("3", "4100", 2)];
        sell_fifo(&mut lots, d("5"), d("4200")).unwrap();
        assert!(lots.is_empty());
    }

    #[test]
    fn oversell_fails_and_leaves_lots_untouched() {
        let mut lots = vec![lot("5", "4000", 1), lot("3", "4100", 10)];
        let before = lots.clone();
        let err = sell_fifo(&mut lots, d("9"), d("4500")).unwrap_err();
        assert_eq!(
            err,
            LedgerError::InsufficientHoldings {
                requested: d("9"),
                available: d("8"),
            }
        );
        assert_eq!(lots, before);
    }

    #[test]
    fn sell_resorts_out_of_order_lots() {
        // Newer lot first in the vec; FIFO must still hit the older one.
        let mut lots = vec![lot("3", "4100", 10), lot("5", "4000", 1)];
        sell_fifo(&mut lots, d("5"), d("4500")).unwrap();
        assert_eq!(lots.len(), 1);
        assert_eq!(lots[0].unit_price, d("4100"));
    }

    #[test]
    fn non_positive_quantities_rejected() {
        let mut lots = vec![lot("5", "4000", 1)];
        assert!(matches!(
            sell_fifo(&mut lots, d("0"), d("4500")),
            Err(LedgerError::Validation(_))
        ));
        assert!(matches!(
            add_lot(&mut lots, d("-1"), d("4000"), at(2)),
            Err(LedgerError::Validation(_))
        ));
        assert!(matches!(
            add_lot(&mut lots, d("1"), d("-4000"), at(2)),
            Err(LedgerError::Validation(_))
        ));
        assert_eq!(lots.len(), 1);
    }

    #[test]
    fn valuation_marks_to_market() {
        let lots = vec![lot("10", "4000", 1)];
        let v = value_lots(&lots, d("4500"));
        assert_eq!(v.current_value, d("45000"));
        assert_eq!(v.cost_basis, d("40000"));
        assert_eq!(v.profit_loss, d("5000"));
        assert_eq!(v.profit_loss_pct, d("12.5"));
    }

    #[test]
    fn valuation_pct_zero_on_empty_basis() {
        let v = value_lots(&[], d("4500"));
        assert_eq!(v.profit_loss_pct, Decimal::ZERO);
    }

    #[test]
    fn combine_sums_before_percentage() {
        let a = value_lots(&[lot("1", "100", 1)], d("200")); // +100%
        let b = value_lots(&[lot("1", "900", 1)], d("900")); // 0%
        let agg = Valuation::combine([a, b]);
        assert_eq!(agg.current_value, d("1100"));
        assert_eq!(agg.cost_basis, d("1000"));
        assert_eq!(agg.profit_loss_pct, d("10"));
    }
}
