// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store;
use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("incomes", sub)) => incomes(conn, sub),
        Some(("expenses", sub)) => expenses(conn, sub),
        _ => Ok(()),
    }
}

fn incomes(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let out = sub.get_one::<String>("out").unwrap().trim();
    let mut wtr = csv::Writer::from_path(out).with_context(|| format!("Create CSV {}", out))?;
    wtr.write_record(["month", "amount", "source", "date"])?;
    let rows = store::list_incomes(conn)?;
    let n = rows.len();
    for r in rows {
        wtr.write_record([
            r.month,
            format!("{:.2}", r.amount),
            r.source,
            r.date.to_string(),
        ])?;
    }
    wtr.flush()?;
    println!("Exported {} income(s) to {}", n, out);
    Ok(())
}

fn expenses(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let out = sub.get_one::<String>("out").unwrap().trim();
    let mut wtr = csv::Writer::from_path(out).with_context(|| format!("Create CSV {}", out))?;
    wtr.write_record(["month", "amount", "reason", "category", "status", "date"])?;
    let rows = store::list_expenses(conn)?;
    let n = rows.len();
    for e in rows {
        wtr.write_record([
            e.month,
            format!("{:.2}", e.amount),
            e.reason,
            e.category.to_string(),
            e.status.to_string(),
            e.date.to_string(),
        ])?;
    }
    wtr.flush()?;
    println!("Exported {} expense(s) to {}", n, out);
    Ok(())
}
