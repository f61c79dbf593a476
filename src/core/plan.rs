// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Installment plan generator: turns "N installments starting in month M"
//! into one dated expense per remaining installment, with the rounding
//! remainder absorbed by the last installment.

use rust_decimal::Decimal;

use crate::core::error::CoreError;
use crate::core::month;
use crate::models::{Category, ExpenseEntry, InstallmentPlan, NewExpense, NewPlan, Status};
use crate::utils::round2;

#[derive(Debug, Clone)]
pub struct PlanSpec<'a> {
    pub card_id: i64,
    pub description: &'a str,
    pub total_amount: Decimal,
    pub installment_count: u32,
    /// 1-based index of the installment the purchase is currently on.
    pub current_installment: u32,
    /// Month of installment #1.
    pub start_month: &'a str,
}

#[derive(Debug, Clone)]
pub struct PlanSchedule {
    pub plan: NewPlan,
    pub expenses: Vec<NewExpense>,
}

/// Amount of installment `i` (1-based) in a plan of `count` installments.
/// Every installment gets the rounded base amount except the last, which
/// absorbs whatever the rounding left over so the series sums to `total`.
pub fn installment_amount(total: Decimal, count: u32, i: u32) -> Decimal {
    let base = round2(total / Decimal::from(count));
    if i == count {
        round2(total - base * Decimal::from(count - 1))
    } else {
        base
    }
}

/// Generates the expense rows for every installment from
/// `current_installment` through `installment_count`.
///
/// The current installment is skipped when `existing` already holds an
/// expense for the same card, month, and description — that happens when a
/// plan is registered alongside a manually entered current-month charge.
pub fn generate_plan(
    spec: &PlanSpec,
    existing: &[ExpenseEntry],
) -> Result<PlanSchedule, CoreError> {
    let description = spec.description.trim();
    if description.is_empty() {
        return Err(CoreError::validation("Plan description must not be empty"));
    }
    if spec.installment_count < 1 {
        return Err(CoreError::validation("Installment count must be at least 1"));
    }
    if spec.current_installment < 1 || spec.current_installment > spec.installment_count {
        return Err(CoreError::Validation(format!(
            "Current installment {} outside [1, {}]",
            spec.current_installment, spec.installment_count
        )));
    }
    if spec.total_amount <= Decimal::ZERO {
        return Err(CoreError::validation("Plan total must be positive"));
    }

    let total = round2(spec.total_amount);
    let mut expenses = Vec::new();
    for i in spec.current_installment..=spec.installment_count {
        let target = month::add_months(spec.start_month, i as i32 - 1)?;
        if i == spec.current_installment {
            let already_there = existing.iter().any(|e| {
                e.card_id == Some(spec.card_id)
                    && e.month == target
                    && e.reason.contains(description)
            });
            if already_there {
                continue;
            }
        }
        expenses.push(NewExpense {
            date: month::first_day(&target)?,
            month: target,
            amount: installment_amount(total, spec.installment_count, i),
            reason: format!("{} ({}/{})", description, i, spec.installment_count),
            category: Category::Card,
            status: Status::Open,
            card_id: Some(spec.card_id),
            plan_id: None,
        });
    }

    Ok(PlanSchedule {
        plan: NewPlan {
            card_id: spec.card_id,
            description: description.to_string(),
            total_amount: total,
            installment_count: spec.installment_count,
            current_installment: spec.current_installment,
            start_month: spec.start_month.to_string(),
        },
        expenses,
    })
}

/// A plan is identified by (card, description, start month, total, count);
/// creating the same plan twice is a no-op, not an error.
pub fn find_duplicate(plan: &NewPlan, existing: &[InstallmentPlan]) -> Option<i64> {
    existing
        .iter()
        .find(|p| {
            p.card_id == plan.card_id
                && p.description == plan.description
                && p.start_month == plan.start_month
                && p.total_amount == plan.total_amount
                && p.installment_count == plan.installment_count
        })
        .map(|p| p.id)
}
