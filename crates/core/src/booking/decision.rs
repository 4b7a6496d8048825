//! Money/bonus split for a single purchase.

use crate::privilege::OperationType;

/// How a purchase is settled between money and bonus points.
///
/// `paid_by_bonuses + paid_by_money` always equals the requested price.
/// `balance_diff` is the amount debited for [`OperationType::DebitTheAccount`]
/// and the amount accrued for [`OperationType::FillInBalance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PurchaseDecision {
    pub paid_by_bonuses: i64,
    pub paid_by_money: i64,
    pub balance_diff: i64,
    pub operation_type: OperationType,
}

impl PurchaseDecision {
    /// Settle `price` against an account holding `balance` points.
    ///
    /// Paying from balance spends as many points as are available, up to the
    /// price. Paying with money accrues 10% of the price, rounded half-up.
    /// `price` must be positive; a negative `balance` is treated as empty.
    pub fn compute(balance: i64, price: i64, paid_from_balance: bool) -> Self {
        let available = balance.max(0);

        if paid_from_balance {
            let paid_by_bonuses = available.min(price);
            Self {
                paid_by_bonuses,
                paid_by_money: price - paid_by_bonuses,
                balance_diff: paid_by_bonuses,
                operation_type: OperationType::DebitTheAccount,
            }
        } else {
            Self {
                paid_by_bonuses: 0,
                paid_by_money: price,
                balance_diff: accrual(price),
                operation_type: OperationType::FillInBalance,
            }
        }
    }

    /// Balance after applying this decision to `balance`.
    ///
    /// Saturates at zero and `i64::MAX` instead of wrapping.
    pub fn new_balance(&self, balance: i64) -> i64 {
        let balance = balance.max(0);
        match self.operation_type {
            OperationType::DebitTheAccount => balance.saturating_sub(self.paid_by_bonuses).max(0),
            OperationType::FillInBalance => balance.saturating_add(self.balance_diff),
        }
    }
}

/// 10% of `price`, rounded half-up. Never overflows for a positive price.
fn accrual(price: i64) -> i64 {
    price / 10 + i64::from(price % 10 >= 5)
}
