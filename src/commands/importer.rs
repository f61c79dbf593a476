// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::core::plan::{self, PlanSpec};
use crate::core::reconcile::{self, StatementRow};
use crate::models::{Category, NewExpense, NewIncome, Status};
use crate::store;
use crate::utils::{parse_date, parse_decimal, parse_month, round2};
use anyhow::{Context, Result, anyhow};
use csv::ReaderBuilder;
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::str::FromStr;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("statement", sub)) => import_statement(conn, sub),
        Some(("incomes", sub)) => import_incomes(conn, sub),
        Some(("expenses", sub)) => import_expenses(conn, sub),
        _ => Ok(()),
    }
}

/// Card statement import: every row lands as an expense, detected
/// installment series additionally register a plan whose remaining
/// installments are scheduled on the spot. One bad row aborts the whole
/// file.
fn import_statement(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let path = sub.get_one::<String>("path").unwrap().trim();
    let card_name = sub.get_one::<String>("card").unwrap().trim();
    let invoice_month = match sub.get_one::<String>("month") {
        Some(m) => Some(parse_month(m.trim())?),
        None => None,
    };

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path))?;

    let mut rows = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let rec = result?;
        let line = i + 1;
        let date_raw = rec
            .get(0)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .with_context(|| format!("Row {}: date missing", line))?;
        let description = rec
            .get(1)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .with_context(|| format!("Row {}: description missing", line))?;
        let amount_raw = rec
            .get(2)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .with_context(|| format!("Row {}: amount missing", line))?;
        let parcel_field = rec
            .get(3)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        rows.push(StatementRow {
            description: description.to_string(),
            amount: parse_decimal(amount_raw)
                .with_context(|| format!("Row {}: invalid amount '{}'", line, amount_raw))?,
            date: parse_date(date_raw)
                .with_context(|| format!("Row {}: invalid date '{}'", line, date_raw))?,
            parcel_field,
        });
    }
    if rows.is_empty() {
        return Err(anyhow!("Statement {} has no rows", path));
    }

    let today = chrono::Local::now().date_naive();
    let tx = conn.transaction()?;
    let card_id = store::id_for_card(&tx, card_name)?;
    let outcome =
        reconcile::reconcile_statement(&rows, card_id, invoice_month.as_deref(), today)?;

    for expense in &outcome.expenses {
        store::insert_expense(&tx, expense)?;
    }

    let mut scheduled = 0usize;
    for new_plan in &outcome.plans {
        let schedule = plan::generate_plan(
            &PlanSpec {
                card_id: new_plan.card_id,
                description: &new_plan.description,
                total_amount: new_plan.total_amount,
                installment_count: new_plan.installment_count,
                current_installment: new_plan.current_installment,
                start_month: &new_plan.start_month,
            },
            &store::list_expenses(&tx)?,
        )?;
        if plan::find_duplicate(&schedule.plan, &store::list_plans(&tx)?).is_some() {
            continue;
        }
        let plan_id = store::insert_plan(&tx, &schedule.plan)?;
        for mut expense in schedule.expenses {
            expense.plan_id = Some(plan_id);
            store::insert_expense(&tx, &expense)?;
            scheduled += 1;
        }
    }
    tx.commit()?;
    println!(
        "Imported {} expense(s) and {} plan(s) from {} ({} future installment(s) scheduled)",
        outcome.expenses.len(),
        outcome.plans.len(),
        path,
        scheduled
    );
    Ok(())
}

fn import_incomes(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let path = sub.get_one::<String>("path").unwrap().trim();
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path))?;
    let today = chrono::Local::now().date_naive();

    let tx = conn.transaction()?;
    let mut n = 0usize;
    for (i, result) in rdr.records().enumerate() {
        let rec = result?;
        let line = i + 1;
        let month = rec
            .get(0)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .with_context(|| format!("Row {}: month missing", line))?;
        let amount_raw = rec
            .get(1)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .with_context(|| format!("Row {}: amount missing", line))?;
        let source = rec
            .get(2)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .with_context(|| format!("Row {}: source missing", line))?;
        let date = match rec.get(3).map(str::trim).filter(|s| !s.is_empty()) {
            Some(d) => parse_date(d).with_context(|| format!("Row {}: invalid date", line))?,
            None => today,
        };

        let amount = round2(
            parse_decimal(amount_raw)
                .with_context(|| format!("Row {}: invalid amount '{}'", line, amount_raw))?,
        );
        if amount <= Decimal::ZERO {
            return Err(anyhow!("Row {}: amount must be positive", line));
        }
        store::insert_income(
            &tx,
            &NewIncome {
                month: parse_month(month).with_context(|| format!("Row {}: invalid month", line))?,
                amount,
                source: source.to_string(),
                date,
            },
        )?;
        n += 1;
    }
    tx.commit()?;
    println!("Imported {} income(s) from {}", n, path);
    Ok(())
}

fn import_expenses(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let path = sub.get_one::<String>("path").unwrap().trim();
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path))?;
    let today = chrono::Local::now().date_naive();

    let tx = conn.transaction()?;
    let mut n = 0usize;
    for (i, result) in rdr.records().enumerate() {
        let rec = result?;
        let line = i + 1;
        let month = rec
            .get(0)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .with_context(|| format!("Row {}: month missing", line))?;
        let amount_raw = rec
            .get(1)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .with_context(|| format!("Row {}: amount missing", line))?;
        let reason = rec
            .get(2)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .with_context(|| format!("Row {}: reason missing", line))?;
        let category_raw = rec
            .get(3)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .with_context(|| format!("Row {}: category missing", line))?;
        let status = match rec.get(4).map(str::trim).filter(|s| !s.is_empty()) {
            Some(s) => Status::from_str(s).with_context(|| format!("Row {}", line))?,
            None => Status::Open,
        };
        let date = match rec.get(5).map(str::trim).filter(|s| !s.is_empty()) {
            Some(d) => parse_date(d).with_context(|| format!("Row {}: invalid date", line))?,
            None => today,
        };

        let amount = round2(
            parse_decimal(amount_raw)
                .with_context(|| format!("Row {}: invalid amount '{}'", line, amount_raw))?,
        );
        if amount <= Decimal::ZERO {
            return Err(anyhow!("Row {}: amount must be positive", line));
        }
        store::insert_expense(
            &tx,
            &NewExpense {
                month: parse_month(month).with_context(|| format!("Row {}: invalid month", line))?,
                amount,
                reason: reason.to_string(),
                category: Category::from_str(category_raw)
                    .with_context(|| format!("Row {}", line))?,
                date,
                status,
                card_id: None,
                plan_id: None,
            },
        )?;
        n += 1;
    }
    tx.commit()?;
    println!("Imported {} expense(s) from {}", n, path);
    Ok(())
}
