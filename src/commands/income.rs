// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::NewIncome;
use crate::store;
use crate::utils::{maybe_print_json, parse_date, parse_decimal, parse_month, pretty_table, round2};
use anyhow::{Result, anyhow};
use rusqlite::Connection;
use rust_decimal::Decimal;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => {
            let id = sub.get_one::<String>("id").unwrap().trim().parse::<i64>()?;
            store::delete_income(conn, id)?;
            println!("Removed income {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let month = parse_month(sub.get_one::<String>("month").unwrap().trim())?;
    let amount = round2(parse_decimal(sub.get_one::<String>("amount").unwrap().trim())?);
    if amount <= Decimal::ZERO {
        return Err(anyhow!("Income amount must be positive"));
    }
    let source = sub.get_one::<String>("source").unwrap().trim().to_string();
    if source.is_empty() {
        return Err(anyhow!("Income source must not be empty"));
    }
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d.trim())?,
        None => chrono::Local::now().date_naive(),
    };

    let id = store::insert_income(
        conn,
        &NewIncome {
            month: month.clone(),
            amount,
            source: source.clone(),
            date,
        },
    )?;
    println!("Recorded income {} of {:.2} for {} ({})", id, amount, month, source);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let month = sub.get_one::<String>("month").map(|s| s.trim().to_string());

    let mut incomes = store::list_incomes(conn)?;
    if let Some(ref m) = month {
        incomes.retain(|r| &r.month == m);
    }
    if !maybe_print_json(json_flag, jsonl_flag, &incomes)? {
        let rows = incomes
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.month.clone(),
                    format!("{:.2}", r.amount),
                    r.source.clone(),
                    r.date.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Month", "Amount", "Source", "Date"], rows)
        );
    }
    Ok(())
}
