// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::core::month;
use crate::core::plan::{self, PlanSpec};
use crate::core::recurrence;
use crate::models::{Category, NewExpense, Status};
use crate::store;
use crate::utils::{maybe_print_json, parse_date, parse_decimal, parse_month, pretty_table, round2};
use anyhow::{Result, anyhow};
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::str::FromStr;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("pay", sub)) => pay(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("rm", sub)) => {
            let id = sub.get_one::<String>("id").unwrap().trim().parse::<i64>()?;
            store::delete_expense(conn, id)?;
            println!("Removed expense {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn add(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let month_token = parse_month(sub.get_one::<String>("month").unwrap().trim())?;
    let amount = round2(parse_decimal(sub.get_one::<String>("amount").unwrap().trim())?);
    if amount <= Decimal::ZERO {
        return Err(anyhow!("Expense amount must be positive"));
    }
    let reason = sub.get_one::<String>("reason").unwrap().trim().to_string();
    if reason.is_empty() {
        return Err(anyhow!("Expense reason must not be empty"));
    }
    let category = Category::from_str(sub.get_one::<String>("category").unwrap())?;
    let status = match sub.get_one::<String>("status") {
        Some(s) => Status::from_str(s)?,
        None => Status::Open,
    };
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d.trim())?,
        None => chrono::Local::now().date_naive(),
    };

    if let Some(&installments) = sub.get_one::<u32>("installments") {
        if category != Category::Card {
            return Err(anyhow!("--installments only applies to card expenses"));
        }
        if installments < 2 {
            return Err(anyhow!("Number of installments must be at least 2"));
        }
        let current = sub.get_one::<u32>("current").copied().unwrap_or(1);
        let card_name = sub
            .get_one::<String>("card")
            .ok_or_else(|| anyhow!("Select a card (--card) for installment expenses"))?
            .trim();
        return add_installments(
            conn, &month_token, amount, &reason, date, card_name, installments, current,
        );
    }

    if let Some(&months) = sub.get_one::<u32>("months") {
        if category != Category::Fixed {
            return Err(anyhow!("--months only applies to fixed expenses"));
        }
        if months < 2 {
            return Err(anyhow!("Number of months must be at least 2"));
        }
        let series = recurrence::fixed_series(&month_token, months, amount, &reason, date)?;
        let tx = conn.transaction()?;
        for expense in &series {
            store::insert_expense(&tx, expense)?;
        }
        tx.commit()?;
        println!(
            "Recorded fixed expense '{}' for {} months starting {}",
            reason,
            series.len(),
            month_token
        );
        return Ok(());
    }

    let card_id = match sub.get_one::<String>("card") {
        Some(name) if category == Category::Card => Some(store::id_for_card(conn, name.trim())?),
        _ => None,
    };
    let id = store::insert_expense(
        conn,
        &NewExpense {
            month: month_token.clone(),
            amount,
            reason: reason.clone(),
            category,
            date,
            status,
            card_id,
            plan_id: None,
        },
    )?;
    println!("Recorded expense {} of {:.2} for {} ({})", id, amount, month_token, reason);
    Ok(())
}

/// Card purchase entered as "installment K of N at <amount> each": records
/// the current installment and registers the reconstructed plan, which
/// schedules the remaining ones.
fn add_installments(
    conn: &mut Connection,
    month_token: &str,
    per_installment: Decimal,
    reason: &str,
    date: chrono::NaiveDate,
    card_name: &str,
    installments: u32,
    current: u32,
) -> Result<()> {
    if current < 1 || current > installments {
        return Err(anyhow!(
            "Current installment {} outside [1, {}]",
            current,
            installments
        ));
    }
    let tx = conn.transaction()?;
    let card_id = store::id_for_card(&tx, card_name)?;

    store::insert_expense(
        &tx,
        &NewExpense {
            month: month_token.to_string(),
            amount: per_installment,
            reason: format!("{} ({}/{})", reason, current, installments),
            category: Category::Card,
            date,
            status: Status::Open,
            card_id: Some(card_id),
            plan_id: None,
        },
    )?;

    let start_month = month::subtract_months(month_token, current as i32 - 1)?;
    let schedule = plan::generate_plan(
        &PlanSpec {
            card_id,
            description: reason,
            total_amount: round2(per_installment * Decimal::from(installments)),
            installment_count: installments,
            current_installment: current,
            start_month: &start_month,
        },
        &store::list_expenses(&tx)?,
    )?;

    if plan::find_duplicate(&schedule.plan, &store::list_plans(&tx)?).is_some() {
        tx.commit()?;
        println!("Plan already registered, recorded the current installment only");
        return Ok(());
    }
    let plan_id = store::insert_plan(&tx, &schedule.plan)?;
    let scheduled = schedule.expenses.len();
    for mut expense in schedule.expenses {
        expense.plan_id = Some(plan_id);
        store::insert_expense(&tx, &expense)?;
    }
    tx.commit()?;
    println!(
        "Recorded installment {}/{} and scheduled {} more (plan {})",
        current, installments, scheduled, plan_id
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let mut expenses = store::list_expenses(conn)?;
    if let Some(m) = sub.get_one::<String>("month") {
        let m = m.trim().to_string();
        expenses.retain(|e| e.month == m);
    }
    if let Some(c) = sub.get_one::<String>("category") {
        let c = Category::from_str(c)?;
        expenses.retain(|e| e.category == c);
    }
    if !maybe_print_json(json_flag, jsonl_flag, &expenses)? {
        let rows = expenses
            .iter()
            .map(|e| {
                vec![
                    e.id.to_string(),
                    e.month.clone(),
                    format!("{:.2}", e.amount),
                    e.reason.clone(),
                    e.category.to_string(),
                    e.status.to_string(),
                    e.date.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Month", "Amount", "Reason", "Category", "Status", "Date"],
                rows
            )
        );
    }
    Ok(())
}

/// Marking a fixed bill paid schedules next month's copy unless an
/// identical one is already there.
fn pay(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap().trim().parse::<i64>()?;
    let tx = conn.transaction()?;
    let mut expense = store::get_expense(&tx, id)?;
    if expense.status == Status::Paid {
        println!("Expense {} is already paid", id);
        return Ok(());
    }
    expense.status = Status::Paid;
    store::update_expense(&tx, &expense)?;

    let all = store::list_expenses(&tx)?;
    if let Some(next) = recurrence::next_fixed_occurrence(&expense, &all)? {
        let next_month = next.month.clone();
        store::insert_expense(&tx, &next)?;
        println!("Paid expense {} and scheduled it again for {}", id, next_month);
    } else {
        println!("Paid expense {}", id);
    }
    tx.commit()?;
    Ok(())
}

fn edit(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap().trim().parse::<i64>()?;
    let tx = conn.transaction()?;
    let mut expense = store::get_expense(&tx, id)?;
    let was_open = expense.status == Status::Open;

    if let Some(m) = sub.get_one::<String>("month") {
        expense.month = parse_month(m.trim())?;
    }
    if let Some(a) = sub.get_one::<String>("amount") {
        let amount = round2(parse_decimal(a.trim())?);
        if amount <= Decimal::ZERO {
            return Err(anyhow!("Expense amount must be positive"));
        }
        expense.amount = amount;
    }
    if let Some(r) = sub.get_one::<String>("reason") {
        expense.reason = r.trim().to_string();
    }
    if let Some(c) = sub.get_one::<String>("category") {
        expense.category = Category::from_str(c)?;
    }
    if let Some(d) = sub.get_one::<String>("date") {
        expense.date = parse_date(d.trim())?;
    }
    if let Some(s) = sub.get_one::<String>("status") {
        expense.status = Status::from_str(s)?;
    }
    store::update_expense(&tx, &expense)?;

    // The open -> paid transition carries the fixed-recurrence invariant no
    // matter which command performed it.
    if was_open && expense.status == Status::Paid {
        let all = store::list_expenses(&tx)?;
        if let Some(next) = recurrence::next_fixed_occurrence(&expense, &all)? {
            store::insert_expense(&tx, &next)?;
        }
    }
    tx.commit()?;
    println!("Updated expense {}", id);
    Ok(())
}
