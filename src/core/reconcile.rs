// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Statement import reconciler: groups raw card-statement rows into singular
//! purchases and installment series, and reconstructs each series' plan
//! (total, size, start month, current position) from whatever rows are
//! present. The caller feeds the reconstructed plans through the plan
//! generator; this module never schedules future installments itself.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;

use crate::core::error::CoreError;
use crate::core::month;
use crate::models::{Category, NewExpense, NewPlan, Status};
use crate::utils::round2;

/// Dedicated installment fields must match exactly; anything else in the
/// field means "not an installment", never a fall-through to text scanning
/// (a date in that column must not be read as a fraction).
static FIELD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{1,2})[/-](\d{1,2})$").unwrap());

/// Free-text scan captures up to four digits on the right so that a date
/// fragment like "12/2025" is seen whole and rejected by the [2,60] bound
/// instead of being misread as "12/20".
static TEXT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d{1,2})\s*[/-]\s*(\d{1,4})\b").unwrap());

static STRIP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\(?\b\d{1,2}\s*[/-]\s*\d{1,4}\b\)?").unwrap());

const MIN_DECLARED_TOTAL: u32 = 2;
const MAX_DECLARED_TOTAL: u32 = 60;

#[derive(Debug, Clone)]
pub struct StatementRow {
    pub description: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    /// Explicit installment column, e.g. "3/12", when the statement has one.
    pub parcel_field: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstallmentTag {
    pub current: u32,
    pub total: u32,
}

#[derive(Debug, Clone, Default)]
pub struct Reconciliation {
    pub expenses: Vec<NewExpense>,
    pub plans: Vec<NewPlan>,
}

/// Classifies one row. Priority: the dedicated field when present (strict
/// full-field pattern), otherwise a bounded free-text scan of the
/// description.
pub fn detect_installment(description: &str, parcel_field: Option<&str>) -> Option<InstallmentTag> {
    if let Some(field) = parcel_field {
        let field = field.trim();
        if !field.is_empty() {
            let caps = FIELD_RE.captures(field)?;
            return tag_from(&caps[1], &caps[2], false);
        }
    }
    for caps in TEXT_RE.captures_iter(description) {
        if let Some(tag) = tag_from(&caps[1], &caps[2], true) {
            return Some(tag);
        }
    }
    None
}

fn tag_from(current: &str, total: &str, bounded: bool) -> Option<InstallmentTag> {
    let current: u32 = current.parse().ok()?;
    let total: u32 = total.parse().ok()?;
    if bounded && !(MIN_DECLARED_TOTAL..=MAX_DECLARED_TOTAL).contains(&total) {
        return None;
    }
    if current < 1 || current > total {
        return None;
    }
    Some(InstallmentTag { current, total })
}

/// Description with the "i/N" fragment removed; the grouping key for series
/// detection.
pub fn base_description(description: &str) -> String {
    let stripped = STRIP_RE.replace_all(description, " ");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn reconcile_statement(
    rows: &[StatementRow],
    card_id: i64,
    invoice_month: Option<&str>,
    today: NaiveDate,
) -> Result<Reconciliation, CoreError> {
    for (i, row) in rows.iter().enumerate() {
        if row.description.trim().is_empty() {
            return Err(CoreError::Validation(format!(
                "Row {}: description is required",
                i + 1
            )));
        }
        if row.amount <= Decimal::ZERO {
            return Err(CoreError::Validation(format!(
                "Row {}: amount must be a positive number",
                i + 1
            )));
        }
    }

    let invoice = match invoice_month {
        Some(m) => m.to_string(),
        None => most_frequent_month(rows).unwrap_or_else(|| month::month_of(today)),
    };

    let mut out = Reconciliation::default();
    // Key (base description, declared total) keeps distinct purchases with
    // the same merchant name apart; BTreeMap keeps output order stable.
    let mut groups: BTreeMap<(String, u32), Vec<(&StatementRow, InstallmentTag)>> = BTreeMap::new();

    for row in rows {
        match detect_installment(&row.description, row.parcel_field.as_deref()) {
            Some(tag) => {
                groups
                    .entry((base_description(&row.description), tag.total))
                    .or_default()
                    .push((row, tag));
            }
            // Unmarked rows are singular purchases, never grouped by
            // description alone.
            None => out.expenses.push(NewExpense {
                month: month::month_of(row.date),
                amount: round2(row.amount),
                reason: row.description.trim().to_string(),
                category: Category::Card,
                date: row.date,
                status: Status::Open,
                card_id: Some(card_id),
                plan_id: None,
            }),
        }
    }

    for ((base, _), members) in &groups {
        let (expense, plan) = reconcile_group(base, members, card_id, &invoice)?;
        out.expenses.push(expense);
        out.plans.push(plan);
    }

    Ok(out)
}

fn reconcile_group(
    base: &str,
    members: &[(&StatementRow, InstallmentTag)],
    card_id: i64,
    invoice: &str,
) -> Result<(NewExpense, NewPlan), CoreError> {
    let total_installments = members
        .iter()
        .map(|(_, t)| t.total)
        .max()
        .unwrap_or(members.len() as u32);
    let declared_index = members.iter().map(|(_, t)| t.current).max().unwrap_or(1);

    let earliest = members
        .iter()
        .map(|(r, _)| *r)
        .min_by_key(|r| r.date)
        .expect("group is never empty");

    // Two start-month candidates: one read off the statement dates, one
    // back-computed from the declared installment position. Trust the dates
    // only when they agree with the declared position.
    let from_dates = month::month_of(earliest.date);
    let back_computed = month::subtract_months(invoice, declared_index as i32 - 1)?;
    let start_month = if month::add_months(&from_dates, declared_index as i32 - 1)? == invoice {
        from_dates
    } else {
        back_computed
    };

    // The months elapsed since the start may imply we are further along than
    // the statement declares; never move backwards, never past the end.
    let elapsed_index = month::diff_months(&start_month, invoice)? + 1;
    let current = declared_index
        .max(elapsed_index.max(1) as u32)
        .min(total_installments);

    let present = members.len() as u32;
    let sum: Decimal = members.iter().map(|(r, _)| r.amount).sum();
    let total_amount = if present == total_installments {
        round2(sum)
    } else if present == 1 && total_installments > 1 {
        round2(earliest.amount * Decimal::from(total_installments))
    } else if present < total_installments {
        let average = sum / Decimal::from(present);
        round2(average * Decimal::from(total_installments))
    } else {
        round2(sum)
    };

    // One expense for the row we are actually on: prefer the row declaring
    // the resolved index, then the reference-month row, then the earliest.
    let current_row = members
        .iter()
        .find(|(_, t)| t.current == current)
        .map(|(r, _)| *r)
        .or_else(|| {
            members
                .iter()
                .map(|(r, _)| *r)
                .find(|r| month::month_of(r.date) == invoice)
        })
        .unwrap_or(earliest);

    let expense = NewExpense {
        month: invoice.to_string(),
        amount: round2(current_row.amount),
        reason: format!("{} ({}/{})", base, current, total_installments),
        category: Category::Card,
        date: current_row.date,
        status: Status::Open,
        card_id: Some(card_id),
        plan_id: None,
    };
    let plan = NewPlan {
        card_id,
        description: base.to_string(),
        total_amount,
        installment_count: total_installments,
        current_installment: current,
        start_month,
    };
    Ok((expense, plan))
}

/// Most frequent "YYYY-MM" prefix among the row dates; ties go to the
/// earliest month.
fn most_frequent_month(rows: &[StatementRow]) -> Option<String> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for row in rows {
        *counts.entry(month::month_of(row.date)).or_insert(0) += 1;
    }
    let mut best: Option<(&String, usize)> = None;
    for (m, n) in &counts {
        if best.map_or(true, |(_, bn)| *n > bn) {
            best = Some((m, *n));
        }
    }
    best.map(|(m, _)| m.clone())
}
