// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::core::balance;
use crate::core::jar::{self, JarOutcome};
use crate::store;
use crate::utils::{maybe_print_json, parse_decimal, parse_month, pretty_table};
use anyhow::{Result, anyhow};
use rusqlite::Connection;
use rust_decimal::Decimal;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("deposit", sub)) => deposit(conn, sub)?,
        Some(("withdraw", sub)) => withdraw(conn, sub)?,
        Some(("rm", sub)) => {
            let id = sub.get_one::<String>("id").unwrap().trim().parse::<i64>()?;
            store::delete_jar(conn, id)?;
            println!("Removed jar {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn add(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap().trim().to_string();
    if name.is_empty() {
        return Err(anyhow!("Jar name must not be empty"));
    }
    let description = sub
        .get_one::<String>("description")
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string());
    let deposit = match sub.get_one::<String>("deposit") {
        Some(raw) => parse_decimal(raw.trim())?,
        None => Decimal::ZERO,
    };
    let today = chrono::Local::now().date_naive();
    let month = match sub.get_one::<String>("month") {
        Some(m) => parse_month(m.trim())?,
        None => crate::core::month::month_of(today),
    };

    let tx = conn.transaction()?;
    let available = {
        let incomes = store::list_incomes(&tx)?;
        let expenses = store::list_expenses(&tx)?;
        balance::monthly_balance(&month, &incomes, &expenses).month_balance
    };
    let creation = jar::plan_creation(&name, deposit, &month, available, today);
    let id = store::insert_jar(
        &tx,
        &name,
        description.as_deref(),
        creation.initial_balance,
        today,
    )?;
    if let Some(ref mirror) = creation.mirror {
        store::insert_expense(&tx, mirror)?;
    }
    tx.commit()?;

    match creation.rejected {
        Some(reason) => println!(
            "Created jar '{}' ({}) but the initial deposit was rejected: {}",
            name, id, reason
        ),
        None if creation.initial_balance > Decimal::ZERO => println!(
            "Created jar '{}' ({}) with {:.2} from {}",
            name, id, creation.initial_balance, month
        ),
        None => println!("Created jar '{}' ({})", name, id),
    }
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let jars = store::list_jars(conn)?;
    if !maybe_print_json(json_flag, jsonl_flag, &jars)? {
        let rows = jars
            .iter()
            .map(|j| {
                vec![
                    j.id.to_string(),
                    j.name.clone(),
                    j.description.clone().unwrap_or_default(),
                    format!("{:.2}", j.balance),
                    j.created_at.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Name", "Description", "Balance", "Created"], rows)
        );
    }
    Ok(())
}

fn deposit(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap().trim().parse::<i64>()?;
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap().trim())?;
    let month = parse_month(sub.get_one::<String>("month").unwrap().trim())?;
    let today = chrono::Local::now().date_naive();

    let tx = conn.transaction()?;
    let jar = store::get_jar(&tx, id)?;
    let available = {
        let incomes = store::list_incomes(&tx)?;
        let expenses = store::list_expenses(&tx)?;
        balance::monthly_balance(&month, &incomes, &expenses).month_balance
    };
    match jar::plan_deposit(&jar, amount, &month, available, today) {
        JarOutcome::Applied(movement) => {
            store::insert_expense(&tx, &movement.mirror)?;
            store::update_jar_balance(&tx, id, movement.new_balance)?;
            tx.commit()?;
            println!(
                "Deposited {:.2} into '{}' (balance {:.2})",
                movement.mirror.amount, jar.name, movement.new_balance
            );
        }
        JarOutcome::Rejected(reason) => {
            println!("Deposit rejected: {}", reason);
        }
    }
    Ok(())
}

fn withdraw(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap().trim().parse::<i64>()?;
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap().trim())?;
    let month = parse_month(sub.get_one::<String>("month").unwrap().trim())?;
    let today = chrono::Local::now().date_naive();

    let tx = conn.transaction()?;
    let jar = store::get_jar(&tx, id)?;
    match jar::plan_withdrawal(&jar, amount, &month, today) {
        JarOutcome::Applied(movement) => {
            store::insert_income(&tx, &movement.mirror)?;
            store::update_jar_balance(&tx, id, movement.new_balance)?;
            tx.commit()?;
            println!(
                "Withdrew {:.2} from '{}' into {} (balance {:.2})",
                movement.mirror.amount, jar.name, month, movement.new_balance
            );
        }
        JarOutcome::Rejected(reason) => {
            println!("Withdrawal rejected: {}", reason);
        }
    }
    Ok(())
}
