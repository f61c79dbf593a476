// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::core::{balance, insight, month};
use crate::store;
use crate::utils::{maybe_print_json, parse_month, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("balance", sub)) => balance_report(conn, sub)?,
        Some(("compare", sub)) => compare_report(conn, sub)?,
        Some(("insights", sub)) => insights_report(conn, sub)?,
        Some(("months", sub)) => months_report(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn balance_report(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let month = parse_month(sub.get_one::<String>("month").unwrap().trim())?;

    let incomes = store::list_incomes(conn)?;
    let expenses = store::list_expenses(conn)?;
    let snapshot = balance::monthly_balance(&month, &incomes, &expenses);
    if !maybe_print_json(json_flag, jsonl_flag, &snapshot)? {
        let rows = vec![
            vec!["Income".to_string(), format!("{:.2}", snapshot.total_income)],
            vec!["Expenses".to_string(), format!("{:.2}", snapshot.total_expense)],
            vec!["Balance".to_string(), format!("{:.2}", snapshot.month_balance)],
            vec![
                "Accumulated".to_string(),
                format!("{:.2}", snapshot.accumulated_balance),
            ],
            vec![
                "Committed".to_string(),
                format!("{:.1}%", snapshot.committed_percentage),
            ],
            vec![
                "Card".to_string(),
                format!("{:.2}", snapshot.category_breakdown.card),
            ],
            vec![
                "Fixed".to_string(),
                format!("{:.2}", snapshot.category_breakdown.fixed),
            ],
            vec![
                "Variable".to_string(),
                format!("{:.2}", snapshot.category_breakdown.variable),
            ],
            vec![
                "Other".to_string(),
                format!("{:.2}", snapshot.category_breakdown.other),
            ],
        ];
        println!("{}", pretty_table(&[&month, "Amount"], rows));
    }
    Ok(())
}

fn compare_report(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let current = parse_month(sub.get_one::<String>("month").unwrap().trim())?;
    let previous = match sub.get_one::<String>("previous") {
        Some(p) => parse_month(p.trim())?,
        None => month::subtract_months(&current, 1)?,
    };

    let incomes = store::list_incomes(conn)?;
    let expenses = store::list_expenses(conn)?;
    let cur = balance::monthly_balance(&current, &incomes, &expenses);
    let prev = balance::monthly_balance(&previous, &incomes, &expenses);
    let comparison = insight::compare(&cur, &prev);
    if !maybe_print_json(json_flag, jsonl_flag, &comparison)? {
        let mut rows = vec![
            vec!["Situation".to_string(), comparison.situation.to_string()],
            vec!["Income delta".to_string(), format!("{:.2}", comparison.income_delta)],
            vec![
                "Expense delta".to_string(),
                format!("{:.2}", comparison.expense_delta),
            ],
            vec![
                "Balance delta".to_string(),
                format!("{:.2}", comparison.balance_delta),
            ],
            vec!["Card delta".to_string(), format!("{:.2}", comparison.card_delta)],
        ];
        for p in &comparison.detected_patterns {
            rows.push(vec!["Pattern".to_string(), p.clone()]);
        }
        let header = format!("{} vs {}", current, previous);
        println!("{}", pretty_table(&[&header, "Value"], rows));
    }
    Ok(())
}

fn insights_report(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let month = parse_month(sub.get_one::<String>("month").unwrap().trim())?;

    let incomes = store::list_incomes(conn)?;
    let expenses = store::list_expenses(conn)?;
    let snapshot = balance::monthly_balance(&month, &incomes, &expenses);
    let insights = insight::insights(&snapshot);
    if !maybe_print_json(json_flag, jsonl_flag, &insights)? {
        if insights.is_empty() {
            println!("No insights for {}", month);
        } else {
            let rows = insights
                .iter()
                .map(|i| vec![i.kind.to_string(), i.message.clone()])
                .collect();
            println!("{}", pretty_table(&["Kind", "Insight"], rows));
        }
    }
    Ok(())
}

fn months_report(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let incomes = store::list_incomes(conn)?;
    let expenses = store::list_expenses(conn)?;
    let mut months = balance::known_months(&incomes, &expenses);
    months.reverse();
    if !maybe_print_json(json_flag, jsonl_flag, &months)? {
        let rows = months.iter().map(|m| vec![m.clone()]).collect();
        println!("{}", pretty_table(&["Month"], rows));
    }
    Ok(())
}
