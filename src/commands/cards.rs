// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Card;
use crate::store;
use crate::utils::{maybe_print_json, parse_decimal, pretty_table, round2};
use anyhow::{Result, anyhow};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("rm", sub)) => {
            let id = sub.get_one::<String>("id").unwrap().trim().parse::<i64>()?;
            store::delete_card(conn, id)?;
            println!("Removed card {} (its expenses were kept)", id);
        }
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap().trim().to_string();
    if name.is_empty() {
        return Err(anyhow!("Card name must not be empty"));
    }
    let card = Card {
        id: 0,
        name: name.clone(),
        network: sub.get_one::<String>("network").unwrap().trim().to_string(),
        credit_limit: round2(parse_decimal(sub.get_one::<String>("limit").unwrap().trim())?),
        closing_day: *sub.get_one::<u8>("closing-day").unwrap(),
        due_day: *sub.get_one::<u8>("due-day").unwrap(),
    };
    let id = store::insert_card(conn, &card)?;
    println!("Added card '{}' ({})", name, id);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let cards = store::list_cards(conn)?;
    if !maybe_print_json(json_flag, jsonl_flag, &cards)? {
        let rows = cards
            .iter()
            .map(|c| {
                vec![
                    c.id.to_string(),
                    c.name.clone(),
                    c.network.clone(),
                    format!("{:.2}", c.credit_limit),
                    c.closing_day.to_string(),
                    c.due_day.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Name", "Network", "Limit", "Closing", "Due"],
                rows
            )
        );
    }
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap().trim().parse::<i64>()?;
    let cards = store::list_cards(conn)?;
    let mut card = cards
        .into_iter()
        .find(|c| c.id == id)
        .ok_or_else(|| anyhow!("Card {} not found", id))?;

    if let Some(name) = sub.get_one::<String>("name") {
        card.name = name.trim().to_string();
    }
    if let Some(network) = sub.get_one::<String>("network") {
        card.network = network.trim().to_string();
    }
    if let Some(limit) = sub.get_one::<String>("limit") {
        card.credit_limit = round2(parse_decimal(limit.trim())?);
    }
    if let Some(day) = sub.get_one::<u8>("closing-day") {
        card.closing_day = *day;
    }
    if let Some(day) = sub.get_one::<u8>("due-day") {
        card.due_day = *day;
    }
    store::update_card(conn, &card)?;
    println!("Updated card {}", id);
    Ok(())
}
