// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Narrow persistence gateway: typed list/insert/update/delete per entity.
//! The computation core never sees a `Connection`; commands load collections
//! here, hand them to the core, and persist what comes back.

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::models::{
    Card, Category, ExpenseEntry, IncomeEntry, InstallmentPlan, NewExpense, NewIncome, NewPlan,
    SavingsJar, Status,
};

fn parse_amount(s: &str, what: &str, id: i64) -> Result<Decimal> {
    s.parse::<Decimal>()
        .with_context(|| format!("Invalid amount '{}' on {} {}", s, what, id))
}

fn parse_day(s: &str, what: &str, id: i64) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}' on {} {}", s, what, id))
}

// ---- incomes -------------------------------------------------------------

pub fn list_incomes(conn: &Connection) -> Result<Vec<IncomeEntry>> {
    let mut stmt =
        conn.prepare("SELECT id, month, amount, source, date FROM incomes ORDER BY date, id")?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, String>(4)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (id, month, amount, source, date) = row?;
        out.push(IncomeEntry {
            id,
            month,
            amount: parse_amount(&amount, "income", id)?,
            source,
            date: parse_day(&date, "income", id)?,
        });
    }
    Ok(out)
}

pub fn insert_income(conn: &Connection, income: &NewIncome) -> Result<i64> {
    conn.execute(
        "INSERT INTO incomes(month, amount, source, date) VALUES (?1,?2,?3,?4)",
        params![
            income.month,
            income.amount.to_string(),
            income.source,
            income.date.to_string()
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn delete_income(conn: &Connection, id: i64) -> Result<()> {
    let n = conn.execute("DELETE FROM incomes WHERE id=?1", params![id])?;
    if n == 0 {
        return Err(anyhow!("Income {} not found", id));
    }
    Ok(())
}

// ---- expenses ------------------------------------------------------------

fn expense_from_row(
    (id, month, amount, reason, category, date, status, card_id, plan_id): (
        i64,
        String,
        String,
        String,
        String,
        String,
        String,
        Option<i64>,
        Option<i64>,
    ),
) -> Result<ExpenseEntry> {
    Ok(ExpenseEntry {
        id,
        month,
        amount: parse_amount(&amount, "expense", id)?,
        reason,
        category: Category::from_str(&category)?,
        date: parse_day(&date, "expense", id)?,
        status: Status::from_str(&status)?,
        card_id,
        plan_id,
    })
}

pub fn list_expenses(conn: &Connection) -> Result<Vec<ExpenseEntry>> {
    let mut stmt = conn.prepare(
        "SELECT id, month, amount, reason, category, date, status, card_id, plan_id
         FROM expenses ORDER BY date, id",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, String>(4)?,
            r.get::<_, String>(5)?,
            r.get::<_, String>(6)?,
            r.get::<_, Option<i64>>(7)?,
            r.get::<_, Option<i64>>(8)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(expense_from_row(row?)?);
    }
    Ok(out)
}

pub fn get_expense(conn: &Connection, id: i64) -> Result<ExpenseEntry> {
    let row = conn
        .query_row(
            "SELECT id, month, amount, reason, category, date, status, card_id, plan_id
             FROM expenses WHERE id=?1",
            params![id],
            |r| {
                Ok((
                    r.get::<_, i64>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, String>(2)?,
                    r.get::<_, String>(3)?,
                    r.get::<_, String>(4)?,
                    r.get::<_, String>(5)?,
                    r.get::<_, String>(6)?,
                    r.get::<_, Option<i64>>(7)?,
                    r.get::<_, Option<i64>>(8)?,
                ))
            },
        )
        .optional()?
        .ok_or_else(|| anyhow!("Expense {} not found", id))?;
    expense_from_row(row)
}

pub fn insert_expense(conn: &Connection, expense: &NewExpense) -> Result<i64> {
    conn.execute(
        "INSERT INTO expenses(month, amount, reason, category, date, status, card_id, plan_id)
         VALUES (?1,?2,?3,?4,?5,?6,?7,?8)",
        params![
            expense.month,
            expense.amount.to_string(),
            expense.reason,
            expense.category.as_str(),
            expense.date.to_string(),
            expense.status.as_str(),
            expense.card_id,
            expense.plan_id
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_expense(conn: &Connection, expense: &ExpenseEntry) -> Result<()> {
    let n = conn.execute(
        "UPDATE expenses SET month=?1, amount=?2, reason=?3, category=?4, date=?5, status=?6,
         card_id=?7, plan_id=?8 WHERE id=?9",
        params![
            expense.month,
            expense.amount.to_string(),
            expense.reason,
            expense.category.as_str(),
            expense.date.to_string(),
            expense.status.as_str(),
            expense.card_id,
            expense.plan_id,
            expense.id
        ],
    )?;
    if n == 0 {
        return Err(anyhow!("Expense {} not found", expense.id));
    }
    Ok(())
}

pub fn delete_expense(conn: &Connection, id: i64) -> Result<()> {
    let n = conn.execute("DELETE FROM expenses WHERE id=?1", params![id])?;
    if n == 0 {
        return Err(anyhow!("Expense {} not found", id));
    }
    Ok(())
}

// ---- cards ---------------------------------------------------------------

pub fn list_cards(conn: &Connection) -> Result<Vec<Card>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, network, credit_limit, closing_day, due_day FROM cards ORDER BY name",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, u8>(4)?,
            r.get::<_, u8>(5)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (id, name, network, credit_limit, closing_day, due_day) = row?;
        out.push(Card {
            id,
            name,
            network,
            credit_limit: parse_amount(&credit_limit, "card", id)?,
            closing_day,
            due_day,
        });
    }
    Ok(out)
}

pub fn id_for_card(conn: &Connection, name: &str) -> Result<i64> {
    let mut stmt = conn.prepare("SELECT id FROM cards WHERE name=?1")?;
    let id: i64 = stmt
        .query_row(params![name], |r| r.get(0))
        .with_context(|| format!("Card '{}' not found", name))?;
    Ok(id)
}

pub fn insert_card(conn: &Connection, card: &Card) -> Result<i64> {
    conn.execute(
        "INSERT INTO cards(name, network, credit_limit, closing_day, due_day)
         VALUES (?1,?2,?3,?4,?5)",
        params![
            card.name,
            card.network,
            card.credit_limit.to_string(),
            card.closing_day,
            card.due_day
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_card(conn: &Connection, card: &Card) -> Result<()> {
    let n = conn.execute(
        "UPDATE cards SET name=?1, network=?2, credit_limit=?3, closing_day=?4, due_day=?5
         WHERE id=?6",
        params![
            card.name,
            card.network,
            card.credit_limit.to_string(),
            card.closing_day,
            card.due_day,
            card.id
        ],
    )?;
    if n == 0 {
        return Err(anyhow!("Card {} not found", card.id));
    }
    Ok(())
}

/// Deleting a card does not cascade to its expenses; stale card_id
/// references stay behind and doctor reports them.
pub fn delete_card(conn: &Connection, id: i64) -> Result<()> {
    let n = conn.execute("DELETE FROM cards WHERE id=?1", params![id])?;
    if n == 0 {
        return Err(anyhow!("Card {} not found", id));
    }
    Ok(())
}

// ---- installment plans ---------------------------------------------------

pub fn list_plans(conn: &Connection) -> Result<Vec<InstallmentPlan>> {
    let mut stmt = conn.prepare(
        "SELECT id, card_id, description, total_amount, installment_count, current_installment,
         start_month FROM plans ORDER BY start_month, id",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, i64>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, u32>(4)?,
            r.get::<_, u32>(5)?,
            r.get::<_, String>(6)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (id, card_id, description, total, count, current, start_month) = row?;
        out.push(InstallmentPlan {
            id,
            card_id,
            description,
            total_amount: parse_amount(&total, "plan", id)?,
            installment_count: count,
            current_installment: current,
            start_month,
        });
    }
    Ok(out)
}

pub fn insert_plan(conn: &Connection, plan: &NewPlan) -> Result<i64> {
    conn.execute(
        "INSERT INTO plans(card_id, description, total_amount, installment_count,
         current_installment, start_month) VALUES (?1,?2,?3,?4,?5,?6)",
        params![
            plan.card_id,
            plan.description,
            plan.total_amount.to_string(),
            plan.installment_count,
            plan.current_installment,
            plan.start_month
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn delete_plan(conn: &Connection, id: i64) -> Result<()> {
    let n = conn.execute("DELETE FROM plans WHERE id=?1", params![id])?;
    if n == 0 {
        return Err(anyhow!("Plan {} not found", id));
    }
    Ok(())
}

// ---- savings jars --------------------------------------------------------

fn jar_from_row(
    (id, name, description, balance, created_at): (i64, String, Option<String>, String, String),
) -> Result<SavingsJar> {
    Ok(SavingsJar {
        id,
        name,
        description,
        balance: parse_amount(&balance, "jar", id)?,
        created_at: parse_day(&created_at, "jar", id)?,
    })
}

pub fn list_jars(conn: &Connection) -> Result<Vec<SavingsJar>> {
    let mut stmt =
        conn.prepare("SELECT id, name, description, balance, created_at FROM jars ORDER BY name")?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, Option<String>>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, String>(4)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(jar_from_row(row?)?);
    }
    Ok(out)
}

pub fn get_jar(conn: &Connection, id: i64) -> Result<SavingsJar> {
    let row = conn
        .query_row(
            "SELECT id, name, description, balance, created_at FROM jars WHERE id=?1",
            params![id],
            |r| {
                Ok((
                    r.get::<_, i64>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, Option<String>>(2)?,
                    r.get::<_, String>(3)?,
                    r.get::<_, String>(4)?,
                ))
            },
        )
        .optional()?
        .ok_or_else(|| anyhow!("Jar {} not found", id))?;
    jar_from_row(row)
}

pub fn insert_jar(
    conn: &Connection,
    name: &str,
    description: Option<&str>,
    balance: Decimal,
    created_at: NaiveDate,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO jars(name, description, balance, created_at) VALUES (?1,?2,?3,?4)",
        params![name, description, balance.to_string(), created_at.to_string()],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_jar_balance(conn: &Connection, id: i64, balance: Decimal) -> Result<()> {
    let n = conn.execute(
        "UPDATE jars SET balance=?1 WHERE id=?2",
        params![balance.to_string(), id],
    )?;
    if n == 0 {
        return Err(anyhow!("Jar {} not found", id));
    }
    Ok(())
}

pub fn delete_jar(conn: &Connection, id: i64) -> Result<()> {
    let n = conn.execute("DELETE FROM jars WHERE id=?1", params![id])?;
    if n == 0 {
        return Err(anyhow!("Jar {} not found", id));
    }
    Ok(())
}
