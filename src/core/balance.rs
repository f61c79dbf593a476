// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Monthly balance engine. Everything here is recomputed from the full
//! collections on every call; nothing is cached.

use std::collections::BTreeSet;

use rust_decimal::Decimal;

use crate::models::{
    Category, CategoryBreakdown, ExpenseEntry, IncomeEntry, MonthlyBalance, Status,
};
use crate::utils::round2;

/// Every month with any recorded activity, ascending.
pub fn known_months(incomes: &[IncomeEntry], expenses: &[ExpenseEntry]) -> Vec<String> {
    let mut months: BTreeSet<&str> = BTreeSet::new();
    for r in incomes {
        months.insert(&r.month);
    }
    for e in expenses {
        months.insert(&e.month);
    }
    months.into_iter().map(str::to_string).collect()
}

fn income_sum(month: &str, incomes: &[IncomeEntry]) -> Decimal {
    incomes
        .iter()
        .filter(|r| r.month == month)
        .map(|r| r.amount)
        .sum()
}

fn open_expense_sum(month: &str, expenses: &[ExpenseEntry]) -> Decimal {
    expenses
        .iter()
        .filter(|e| e.month == month && e.status == Status::Open)
        .map(|e| e.amount)
        .sum()
}

/// Running balance carried from the earliest known month up to and including
/// `month`. Only OPEN expenses count here: a paid expense is settled and no
/// longer an outstanding obligation, so it drops out of the carry-forward
/// even though the same month's own snapshot still counts it.
pub fn accumulated_balance(
    month: &str,
    incomes: &[IncomeEntry],
    expenses: &[ExpenseEntry],
) -> Decimal {
    let months = known_months(incomes, expenses);
    if !months.iter().any(|m| m == month) {
        return Decimal::ZERO;
    }
    let mut acc = Decimal::ZERO;
    for m in months.iter().take_while(|m| m.as_str() <= month) {
        acc += income_sum(m, incomes) - open_expense_sum(m, expenses);
    }
    round2(acc)
}

pub fn monthly_balance(
    month: &str,
    incomes: &[IncomeEntry],
    expenses: &[ExpenseEntry],
) -> MonthlyBalance {
    let total_income = income_sum(month, incomes);
    // The snapshot's own totals count open AND paid, unlike the accumulated
    // carry above.
    let month_expenses: Vec<&ExpenseEntry> =
        expenses.iter().filter(|e| e.month == month).collect();
    let total_expense: Decimal = month_expenses.iter().map(|e| e.amount).sum();

    let by_category = |c: Category| -> Decimal {
        round2(
            month_expenses
                .iter()
                .filter(|e| e.category == c)
                .map(|e| e.amount)
                .sum(),
        )
    };

    let committed = if total_income > Decimal::ZERO {
        total_expense / total_income * Decimal::from(100)
    } else {
        Decimal::ZERO
    };

    MonthlyBalance {
        month: month.to_string(),
        total_income: round2(total_income),
        total_expense: round2(total_expense),
        month_balance: round2(total_income - total_expense),
        accumulated_balance: accumulated_balance(month, incomes, expenses),
        committed_percentage: committed,
        category_breakdown: CategoryBreakdown {
            card: by_category(Category::Card),
            fixed: by_category(Category::Fixed),
            variable: by_category(Category::Variable),
            other: by_category(Category::Other),
        },
    }
}
