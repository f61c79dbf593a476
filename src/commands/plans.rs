// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::core::plan::{self, PlanSpec};
use crate::store;
use crate::utils::{maybe_print_json, parse_decimal, parse_month, pretty_table};
use anyhow::{Result, anyhow};
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => {
            let id = sub.get_one::<String>("id").unwrap().trim().parse::<i64>()?;
            store::delete_plan(conn, id)?;
            println!("Removed plan {} (its expenses were kept)", id);
        }
        _ => {}
    }
    Ok(())
}

fn add(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let card_name = sub.get_one::<String>("card").unwrap().trim();
    let description = sub.get_one::<String>("description").unwrap().trim();
    let total = parse_decimal(sub.get_one::<String>("total").unwrap().trim())?;
    let count = *sub.get_one::<u32>("installments").unwrap();
    let current = sub.get_one::<u32>("current").copied().unwrap_or(1);
    let start = parse_month(sub.get_one::<String>("start").unwrap().trim())?;

    let tx = conn.transaction()?;
    let card_id = store::id_for_card(&tx, card_name)?;
    let existing = store::list_expenses(&tx)?;

    let schedule = plan::generate_plan(
        &PlanSpec {
            card_id,
            description,
            total_amount: total,
            installment_count: count,
            current_installment: current,
            start_month: &start,
        },
        &existing,
    )?;

    if let Some(id) = plan::find_duplicate(&schedule.plan, &store::list_plans(&tx)?) {
        println!("Plan already registered ({}), nothing to do", id);
        return Ok(());
    }

    let plan_id = store::insert_plan(&tx, &schedule.plan)?;
    let generated = schedule.expenses.len();
    for mut expense in schedule.expenses {
        expense.plan_id = Some(plan_id);
        store::insert_expense(&tx, &expense)?;
    }
    tx.commit()?;
    println!(
        "Registered plan {} '{}' on {}: {} installment(s) scheduled",
        plan_id, description, card_name, generated
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let mut plans = store::list_plans(conn)?;
    let cards = store::list_cards(conn)?;
    if let Some(card_name) = sub.get_one::<String>("card") {
        let card_name = card_name.trim();
        let card = cards
            .iter()
            .find(|c| c.name == card_name)
            .ok_or_else(|| anyhow!("Card '{}' not found", card_name))?;
        plans.retain(|p| p.card_id == card.id);
    }
    if !maybe_print_json(json_flag, jsonl_flag, &plans)? {
        let rows = plans
            .iter()
            .map(|p| {
                let card = cards
                    .iter()
                    .find(|c| c.id == p.card_id)
                    .map(|c| c.name.clone())
                    .unwrap_or_else(|| format!("(card {})", p.card_id));
                vec![
                    p.id.to_string(),
                    card,
                    p.description.clone(),
                    format!("{:.2}", p.total_amount),
                    format!("{}/{}", p.current_installment, p.installment_count),
                    p.start_month.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Card", "Description", "Total", "Progress", "Start"],
                rows
            )
        );
    }
    Ok(())
}
