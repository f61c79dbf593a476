// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Savings jar guard. Deposits may never exceed the month's free balance and
//! withdrawals may never exceed the jar; every accepted movement mirrors an
//! entry into the ledger so the monthly balance stays consistent.
//!
//! Rejections are outcomes the caller checks, not errors: nothing is mutated
//! and nothing needs unwinding.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fmt;

use crate::models::{Category, NewExpense, NewIncome, SavingsJar, Status};
use crate::utils::round2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GuardReason {
    NonPositiveAmount,
    InsufficientMonthBalance { available: Decimal },
    InsufficientJarBalance { available: Decimal },
}

impl fmt::Display for GuardReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuardReason::NonPositiveAmount => write!(f, "amount must be positive"),
            GuardReason::InsufficientMonthBalance { available } => {
                write!(f, "month balance is insufficient (available {:.2})", available)
            }
            GuardReason::InsufficientJarBalance { available } => {
                write!(f, "jar balance is insufficient (available {:.2})", available)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub enum JarOutcome<T> {
    Applied(T),
    Rejected(GuardReason),
}

#[derive(Debug, Clone)]
pub struct JarDeposit {
    pub mirror: NewExpense,
    pub new_balance: Decimal,
}

#[derive(Debug, Clone)]
pub struct JarWithdrawal {
    pub mirror: NewIncome,
    pub new_balance: Decimal,
}

/// Outcome of creating a jar with an optional initial deposit. The jar is
/// created either way; a deposit that fails the month-balance guard leaves
/// it at zero and reports the rejection.
#[derive(Debug, Clone)]
pub struct JarCreation {
    pub initial_balance: Decimal,
    pub mirror: Option<NewExpense>,
    pub rejected: Option<GuardReason>,
}

fn transfer_mirror(jar_name: &str, amount: Decimal, month: &str, today: NaiveDate) -> NewExpense {
    NewExpense {
        month: month.to_string(),
        amount,
        reason: format!("Transfer to jar: {}", jar_name),
        category: Category::Other,
        date: today,
        status: Status::Open,
        card_id: None,
        plan_id: None,
    }
}

pub fn plan_creation(
    name: &str,
    initial_deposit: Decimal,
    month: &str,
    month_balance: Decimal,
    today: NaiveDate,
) -> JarCreation {
    let deposit = round2(initial_deposit);
    if deposit <= Decimal::ZERO {
        return JarCreation {
            initial_balance: Decimal::ZERO,
            mirror: None,
            rejected: None,
        };
    }
    if deposit > month_balance {
        return JarCreation {
            initial_balance: Decimal::ZERO,
            mirror: None,
            rejected: Some(GuardReason::InsufficientMonthBalance {
                available: month_balance,
            }),
        };
    }
    JarCreation {
        initial_balance: deposit,
        mirror: Some(transfer_mirror(name, deposit, month, today)),
        rejected: None,
    }
}

pub fn plan_deposit(
    jar: &SavingsJar,
    amount: Decimal,
    month: &str,
    month_balance: Decimal,
    today: NaiveDate,
) -> JarOutcome<JarDeposit> {
    let amount = round2(amount);
    if amount <= Decimal::ZERO {
        return JarOutcome::Rejected(GuardReason::NonPositiveAmount);
    }
    if amount > month_balance {
        return JarOutcome::Rejected(GuardReason::InsufficientMonthBalance {
            available: month_balance,
        });
    }
    JarOutcome::Applied(JarDeposit {
        mirror: transfer_mirror(&jar.name, amount, month, today),
        new_balance: round2(jar.balance + amount),
    })
}

pub fn plan_withdrawal(
    jar: &SavingsJar,
    amount: Decimal,
    month: &str,
    today: NaiveDate,
) -> JarOutcome<JarWithdrawal> {
    let amount = round2(amount);
    if amount <= Decimal::ZERO {
        return JarOutcome::Rejected(GuardReason::NonPositiveAmount);
    }
    if amount > jar.balance {
        return JarOutcome::Rejected(GuardReason::InsufficientJarBalance {
            available: jar.balance,
        });
    }
    JarOutcome::Applied(JarWithdrawal {
        mirror: NewIncome {
            month: month.to_string(),
            amount,
            source: format!("Jar: {}", jar.name),
            date: today,
        },
        new_balance: round2(jar.balance - amount),
    })
}
