// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Fixed-expense recurrence: settling a fixed bill schedules next month's
//! copy, and a fixed bill can be registered for a run of months up front.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::core::error::CoreError;
use crate::core::month;
use crate::models::{Category, ExpenseEntry, NewExpense, Status};
use crate::utils::round2;

/// Next month's copy of a fixed expense that just went open -> paid, or
/// `None` when an identical fixed entry for that month already exists
/// (re-running the same transition must not duplicate it).
pub fn next_fixed_occurrence(
    paid: &ExpenseEntry,
    all: &[ExpenseEntry],
) -> Result<Option<NewExpense>, CoreError> {
    if paid.category != Category::Fixed {
        return Ok(None);
    }
    let next_month = month::add_months(&paid.month, 1)?;
    let already_scheduled = all.iter().any(|e| {
        e.category == Category::Fixed
            && e.month == next_month
            && e.reason == paid.reason
            && e.amount == paid.amount
    });
    if already_scheduled {
        return Ok(None);
    }
    Ok(Some(NewExpense {
        date: month::first_day(&next_month)?,
        month: next_month,
        amount: paid.amount,
        reason: paid.reason.clone(),
        category: Category::Fixed,
        status: Status::Open,
        card_id: None,
        plan_id: None,
    }))
}

/// A fixed bill registered for `months` consecutive months starting at
/// `start_month`. The first entry keeps the user-given date; the rest fall
/// on the first of their month.
pub fn fixed_series(
    start_month: &str,
    months: u32,
    amount: Decimal,
    reason: &str,
    date: NaiveDate,
) -> Result<Vec<NewExpense>, CoreError> {
    if months < 1 {
        return Err(CoreError::validation("Number of months must be at least 1"));
    }
    if amount <= Decimal::ZERO {
        return Err(CoreError::validation("Amount must be positive"));
    }
    let amount = round2(amount);
    let mut out = Vec::with_capacity(months as usize);
    for i in 0..months {
        let m = month::add_months(start_month, i as i32)?;
        out.push(NewExpense {
            date: if i == 0 { date } else { month::first_day(&m)? },
            month: m,
            amount,
            reason: reason.to_string(),
            category: Category::Fixed,
            status: Status::Open,
            card_id: None,
            plan_id: None,
        });
    }
    Ok(out)
}
